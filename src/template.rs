use std::path::{Path, PathBuf};

use crate::journal::JournalFamily;

/// Reference document used to style the converted output for a journal family.
pub fn template_file_name(family: JournalFamily) -> &'static str {
    match family {
        JournalFamily::Elsevier => "elsevier-template.docx",
        JournalFamily::SpringerNature => "springer-template.docx",
        JournalFamily::Ieee => "ieee-template.docx",
        JournalFamily::Acm => "acm-template.docx",
        JournalFamily::Generic => "generic-template.docx",
    }
}

/// Path of the family's template inside `templates_dir`, if the file exists.
///
/// A missing template means "convert without one", not an error.
pub fn select_template(family: JournalFamily, templates_dir: &Path) -> Option<PathBuf> {
    let path = templates_dir.join(template_file_name(family));
    if path.is_file() {
        tracing::debug!(template = %path.display(), "selected template");
        Some(path)
    } else {
        tracing::debug!(template = %path.display(), "template not present");
        None
    }
}
