use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::PreflightError;
use crate::text::decode_text;
use crate::warning::{PreflightWarning, WarningCode};

/// Directory names that never contain project sources.
const EXCLUDED_DIRS: &[&str] = &["__MACOSX", "node_modules", "build", "dist", "out"];

const DOCUMENT_CLASS: &str = r"\documentclass";
const PREFERRED_MAIN: &str = "main.tex";

/// Flat listing of the files in an extracted LaTeX project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileManifest {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl FileManifest {
    /// Walk `root` recursively, skipping hidden entries and build-artifact directories.
    ///
    /// Unreadable entries are skipped; only a missing or unreadable root is an error.
    pub fn from_dir(root: impl AsRef<Path>) -> Result<Self, PreflightError> {
        let root = root.as_ref();
        if !std::fs::metadata(root)?.is_dir() {
            return Err(PreflightError::UnsupportedInput {
                path: root.to_path_buf(),
            });
        }

        let files = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_excluded(e))
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::debug!("skipping unreadable entry: {err}");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .map(DirEntry::into_path)
            .collect::<Vec<_>>();

        tracing::debug!(root = %root.display(), files = files.len(), "scanned project");
        Ok(Self {
            root: root.to_path_buf(),
            files,
        })
    }

    /// Build a manifest from an already-known file list.
    pub fn from_paths(root: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// All `.tex` files in manifest order.
    pub fn tex_files(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .map(PathBuf::as_path)
            .filter(|p| has_extension(p, "tex"))
    }

    /// Path relative to the manifest root, for display.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

fn is_excluded(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    entry.file_type().is_dir() && EXCLUDED_DIRS.contains(&&*name)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// The chosen main document plus any warnings raised while choosing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainDocument {
    pub path: PathBuf,
    pub warnings: Vec<PreflightWarning>,
}

/// Locate the main LaTeX document in a manifest.
///
/// Candidates are `.tex` files declaring a `\documentclass`. A candidate named
/// `main.tex` wins; otherwise the shallowest one, then the first by path order.
/// Without any candidate, a class-less `main.tex` is accepted.
pub fn find_main_document(manifest: &FileManifest) -> Result<MainDocument, PreflightError> {
    let mut candidates = Vec::new();
    for path in manifest.tex_files() {
        match std::fs::read(path) {
            Ok(data) => {
                let (text, _) = decode_text(&data);
                if text.contains(DOCUMENT_CLASS) {
                    candidates.push(path);
                }
            }
            Err(err) => tracing::debug!(path = %path.display(), "cannot read: {err}"),
        }
    }

    let depth = |p: &Path| manifest.relative(p).components().count();
    let is_preferred = |p: &Path| p.file_name().is_some_and(|n| n == PREFERRED_MAIN);

    let chosen = candidates
        .iter()
        .copied()
        .min_by(|a: &&Path, b: &&Path| {
            is_preferred(*b)
                .cmp(&is_preferred(*a))
                .then_with(|| depth(*a).cmp(&depth(*b)))
                .then_with(|| a.cmp(b))
        })
        .or_else(|| manifest.tex_files().find(|p| is_preferred(*p)));

    let Some(path) = chosen else {
        return Err(PreflightError::MainDocumentNotFound {
            root: manifest.root().to_path_buf(),
        });
    };

    let mut warnings = Vec::new();
    if candidates.len() > 1 {
        let others: Vec<String> = candidates
            .iter()
            .filter(|c| **c != path)
            .map(|c| manifest.relative(c).display().to_string())
            .collect();
        tracing::warn!(chosen = %path.display(), "multiple documents declare a class");
        warnings.push(
            PreflightWarning::new(
                WarningCode::AmbiguousMainDocument,
                format!(
                    "several files declare \\documentclass; also found: {}",
                    others.join(", ")
                ),
            )
            .at(manifest.relative(path).display().to_string()),
        );
    }

    Ok(MainDocument {
        path: path.to_path_buf(),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_from_dir_skips_hidden_and_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "main.tex", "\\documentclass{article}");
        write(dir.path(), "figs/a.png", "");
        write(dir.path(), ".git/config", "");
        write(dir.path(), ".DS_Store", "");
        write(dir.path(), "__MACOSX/figs/._a.png", "");
        write(dir.path(), "build/main.aux", "");

        let manifest = FileManifest::from_dir(dir.path()).unwrap();
        let rel: Vec<_> = manifest
            .files()
            .iter()
            .map(|p| manifest.relative(p).to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![PathBuf::from("figs/a.png"), PathBuf::from("main.tex")]
        );
    }

    #[test]
    fn test_from_dir_missing_root_is_error() {
        let result = FileManifest::from_dir("/definitely/not/here");
        assert!(matches!(result, Err(PreflightError::Io(_))));
    }

    #[test]
    fn test_main_tex_preferred() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.tex", "\\documentclass{article}");
        write(dir.path(), "src/main.tex", "\\documentclass{article}");
        let manifest = FileManifest::from_dir(dir.path()).unwrap();
        let main = find_main_document(&manifest).unwrap();
        assert!(main.path.ends_with("src/main.tex"));
        assert_eq!(main.warnings.len(), 1);
        assert_eq!(main.warnings[0].code, WarningCode::AmbiguousMainDocument);
    }

    #[test]
    fn test_shallowest_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "paper.tex", "\\documentclass{IEEEtran}");
        write(dir.path(), "sections/intro.tex", "\\section{Intro}");
        write(dir.path(), "old/draft.tex", "\\documentclass{article}");
        let manifest = FileManifest::from_dir(dir.path()).unwrap();
        let main = find_main_document(&manifest).unwrap();
        assert!(main.path.ends_with("paper.tex"));
    }

    #[test]
    fn test_single_candidate_has_no_warning() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ms.tex", "\\documentclass{acmart}");
        write(dir.path(), "intro.tex", "Text");
        let manifest = FileManifest::from_dir(dir.path()).unwrap();
        let main = find_main_document(&manifest).unwrap();
        assert!(main.path.ends_with("ms.tex"));
        assert!(main.warnings.is_empty());
    }

    #[test]
    fn test_classless_main_tex_fallback() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "main.tex", "\\input{preamble}");
        let manifest = FileManifest::from_dir(dir.path()).unwrap();
        let main = find_main_document(&manifest).unwrap();
        assert!(main.path.ends_with("main.tex"));
    }

    #[test]
    fn test_no_main_document() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "notes.txt", "nothing");
        let manifest = FileManifest::from_dir(dir.path()).unwrap();
        assert!(matches!(
            find_main_document(&manifest),
            Err(PreflightError::MainDocumentNotFound { .. })
        ));
    }
}
