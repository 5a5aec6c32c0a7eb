//! Pipeline tying the pieces together: scan a project, pick the main
//! document, classify it, check its assets and choose an output template.
//!
//! Missing assets never abort a run; they become warnings on the report
//! unless [`PreflightOptions::strict`] is set.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tempfile::TempDir;

use crate::assets::{self, AssetKind, AssetReferenceSet, AssetValidationReport, MissingAsset};
use crate::error::PreflightError;
use crate::journal::{self, ClassifierOptions, DetectionResult, DEFAULT_LINE_LIMIT};
use crate::manifest::{self, FileManifest};
use crate::template;
use crate::text::decode_text;
use crate::warning::{PreflightWarning, WarningCode};
use crate::zip_utils;

pub const TEMPLATES_DIR_ENV: &str = "TEXPREP_TEMPLATES_DIR";
pub const MAX_ARCHIVE_BYTES_ENV: &str = "TEXPREP_MAX_ARCHIVE_BYTES";

/// Options controlling a preflight run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightOptions {
    /// Directory holding the per-family template files.
    pub templates_dir: Option<PathBuf>,
    /// Main document, relative to the project root. Auto-detected when unset.
    pub main_document: Option<PathBuf>,
    /// Leading lines inspected by the classifier. `None` scans everything.
    pub line_limit: Option<usize>,
    /// Hard cap for the total uncompressed size of an uploaded archive.
    pub max_archive_bytes: usize,
    /// If true, unresolved figures fail the run instead of producing warnings.
    pub strict: bool,
}

impl Default for PreflightOptions {
    fn default() -> Self {
        Self {
            templates_dir: None,
            main_document: None,
            line_limit: Some(DEFAULT_LINE_LIMIT),
            max_archive_bytes: 200 * 1024 * 1024, // 200 MB
            strict: false,
        }
    }
}

impl PreflightOptions {
    /// Defaults overlaid with `TEXPREP_TEMPLATES_DIR` and `TEXPREP_MAX_ARCHIVE_BYTES`.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(dir) = std::env::var_os(TEMPLATES_DIR_ENV) {
            options.templates_dir = Some(PathBuf::from(dir));
        }
        if let Ok(raw) = std::env::var(MAX_ARCHIVE_BYTES_ENV) {
            match raw.trim().parse() {
                Ok(limit) => options.max_archive_bytes = limit,
                Err(_) => tracing::warn!("ignoring invalid {MAX_ARCHIVE_BYTES_ENV}={raw}"),
            }
        }
        options
    }
}

/// Everything known about a project before handing it to the converter.
#[derive(Debug, Serialize)]
pub struct PreflightReport {
    pub root: PathBuf,
    pub main_document: PathBuf,
    pub detection: DetectionResult,
    /// Template file name for the detected family, whether or not it exists on disk.
    pub template_name: &'static str,
    /// Resolved template path, when a templates directory holds it.
    pub template: Option<PathBuf>,
    pub references: AssetReferenceSet,
    pub validation: AssetValidationReport,
    pub warnings: Vec<PreflightWarning>,
    /// Keeps an extracted archive alive for as long as the report.
    #[serde(skip)]
    workspace: Option<TempDir>,
}

impl PreflightReport {
    /// Main document path relative to the project root.
    pub fn main_document_relative(&self) -> &Path {
        self.main_document
            .strip_prefix(&self.root)
            .unwrap_or(&self.main_document)
    }
}

/// Run the preflight over an extracted project directory.
pub fn preflight_dir(
    root: impl AsRef<Path>,
    options: &PreflightOptions,
) -> Result<PreflightReport, PreflightError> {
    let root = root.as_ref();
    let manifest = FileManifest::from_dir(root)?;

    let (main_document, warnings) = match &options.main_document {
        Some(main) => {
            if !is_inside_root(main) {
                return Err(PreflightError::MainDocumentOutsideRoot { path: main.clone() });
            }
            let path = root.join(main);
            if !path.is_file() {
                return Err(PreflightError::MainDocumentNotFound {
                    root: root.to_path_buf(),
                });
            }
            (path, Vec::new())
        }
        None => {
            let found = manifest::find_main_document(&manifest)?;
            (found.path, found.warnings)
        }
    };

    analyze(&manifest, main_document, warnings, options)
}

/// Run the preflight over a single `.tex` file. Its directory is the project root.
pub fn preflight_file(
    path: impl AsRef<Path>,
    options: &PreflightOptions,
) -> Result<PreflightReport, PreflightError> {
    let path = path.as_ref();
    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| PreflightError::UnsupportedInput {
            path: path.to_path_buf(),
        })?;

    let options = PreflightOptions {
        main_document: Some(PathBuf::from(file_name)),
        ..options.clone()
    };
    preflight_dir(root, &options)
}

/// Extract an uploaded project archive into a fresh temporary directory and run the preflight.
///
/// The directory lives as long as the returned report.
pub fn preflight_archive(
    data: &[u8],
    options: &PreflightOptions,
) -> Result<PreflightReport, PreflightError> {
    let workspace = tempfile::tempdir()?;
    zip_utils::extract_archive(data, workspace.path(), options.max_archive_bytes)?;
    let mut report = preflight_dir(workspace.path(), options)?;
    report.workspace = Some(workspace);
    Ok(report)
}

/// Only plain relative paths stay under the root; `..` and absolute paths may not.
fn is_inside_root(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn analyze(
    manifest: &FileManifest,
    main_document: PathBuf,
    mut warnings: Vec<PreflightWarning>,
    options: &PreflightOptions,
) -> Result<PreflightReport, PreflightError> {
    let location = manifest.relative(&main_document).display().to_string();
    let data = std::fs::read(&main_document)?;
    let (text, decode_warning) = decode_text(&data);
    if let Some(w) = decode_warning {
        warnings.push(w.at(location.clone()));
    }

    let detection = journal::classify_with(
        &text,
        &ClassifierOptions {
            line_limit: options.line_limit,
        },
    );
    tracing::info!(
        main = %location,
        family = %detection.journal_family,
        class = %detection.document_class,
        score = detection.confidence_score,
        "classified document"
    );

    let references = assets::extract_references(&text);
    let base_dir = main_document.parent().unwrap_or(manifest.root());
    let validation = assets::validate(&references, base_dir, manifest.files());
    tracing::debug!(
        references = references.len(),
        resolved = validation.resolved.len(),
        "validated assets"
    );

    for missing in validation
        .missing_required
        .iter()
        .chain(&validation.missing_optional)
    {
        tracing::warn!(kind = ?missing.kind, reference = %missing.reference, "asset not found");
        warnings.push(missing_asset_warning(missing).at(location.clone()));
    }

    if options.strict && !validation.missing_required.is_empty() {
        return Err(PreflightError::MissingAssets {
            references: validation
                .missing_required
                .iter()
                .map(|m| m.reference.clone())
                .collect(),
        });
    }

    let template_name = template::template_file_name(detection.journal_family);
    let template = options.templates_dir.as_deref().and_then(|dir| {
        let selected = template::select_template(detection.journal_family, dir);
        if selected.is_none() {
            warnings.push(PreflightWarning::new(
                WarningCode::TemplateUnavailable,
                format!(
                    "template {template_name} not found in {}; converting without one",
                    dir.display()
                ),
            ));
        }
        selected
    });

    Ok(PreflightReport {
        root: manifest.root().to_path_buf(),
        main_document,
        detection,
        template_name,
        template,
        references,
        validation,
        warnings,
        workspace: None,
    })
}

fn missing_asset_warning(missing: &MissingAsset) -> PreflightWarning {
    let (code, what) = match missing.kind {
        AssetKind::Figure => (WarningCode::MissingFigure, "figure"),
        AssetKind::SubDocument => (WarningCode::MissingSubDocument, "included file"),
        AssetKind::Bibliography => (WarningCode::MissingBibliography, "bibliography"),
    };
    PreflightWarning::new(code, format!("{what} not found: {}", missing.reference))
}
