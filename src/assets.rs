//! Asset reference extraction and validation.
//!
//! References are pulled from the source with three independent regex passes
//! (figures, sub-documents, bibliographies) and then resolved against an
//! in-memory file manifest anchored at a base directory. Nothing here
//! touches the filesystem.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "pdf", "eps", "svg"];
const TEX_EXTENSIONS: &[&str] = &["tex"];
const BIB_EXTENSIONS: &[&str] = &["bib"];

static RE_INCLUDE_GRAPHICS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\includegraphics\*?\s*(?:\[[^\]]*\])?\s*\{([^}]+)\}")
        .expect("valid includegraphics regex")
});
static RE_SUB_DOCUMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:input|include)\s*\{([^}]+)\}").expect("valid input/include regex")
});
static RE_BIBLIOGRAPHY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:bibliography|addbibresource)\s*(?:\[[^\]]*\])?\s*\{([^}]+)\}")
        .expect("valid bibliography regex")
});

/// Kind of file a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Figure,
    SubDocument,
    Bibliography,
}

impl AssetKind {
    /// Extensions tried, in order, when the reference does not resolve as written.
    pub fn fallback_extensions(&self) -> &'static [&'static str] {
        match self {
            AssetKind::Figure => IMAGE_EXTENSIONS,
            AssetKind::SubDocument => TEX_EXTENSIONS,
            AssetKind::Bibliography => BIB_EXTENSIONS,
        }
    }

    /// Missing figures break the rendered output; the others are advisory.
    pub fn is_required(&self) -> bool {
        matches!(self, AssetKind::Figure)
    }
}

/// File paths referenced by a LaTeX document, in first-occurrence order per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetReferenceSet {
    pub figure_references: Vec<String>,
    pub sub_document_references: Vec<String>,
    pub bibliography_references: Vec<String>,
}

impl AssetReferenceSet {
    pub fn is_empty(&self) -> bool {
        self.figure_references.is_empty()
            && self.sub_document_references.is_empty()
            && self.bibliography_references.is_empty()
    }

    pub fn len(&self) -> usize {
        self.figure_references.len()
            + self.sub_document_references.len()
            + self.bibliography_references.len()
    }

    /// All references tagged with their kind: figures, then sub-documents, then bibliographies.
    pub fn iter(&self) -> impl Iterator<Item = (AssetKind, &str)> + '_ {
        let figures = self
            .figure_references
            .iter()
            .map(|r| (AssetKind::Figure, r.as_str()));
        let sub_documents = self
            .sub_document_references
            .iter()
            .map(|r| (AssetKind::SubDocument, r.as_str()));
        let bibliographies = self
            .bibliography_references
            .iter()
            .map(|r| (AssetKind::Bibliography, r.as_str()));
        figures.chain(sub_documents).chain(bibliographies)
    }
}

/// How a reference was matched to a manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// The relative path as written.
    Exact,
    /// The relative path with a fallback extension appended.
    ExtensionAppended,
    /// Same file name anywhere in the manifest.
    Basename,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAsset {
    pub kind: AssetKind,
    pub reference: String,
    pub path: PathBuf,
    pub strategy: ResolutionStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingAsset {
    pub kind: AssetKind,
    pub reference: String,
}

/// Result of resolving an [`AssetReferenceSet`] against a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetValidationReport {
    /// Unresolved figures.
    pub missing_required: Vec<MissingAsset>,
    /// Unresolved sub-documents and bibliographies.
    pub missing_optional: Vec<MissingAsset>,
    pub resolved: Vec<ResolvedAsset>,
}

impl AssetValidationReport {
    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty() && self.missing_optional.is_empty()
    }
}

/// Extract figure, sub-document and bibliography references from LaTeX source.
///
/// A bibliography command listing several comma-separated files yields one
/// reference per file.
pub fn extract_references(text: &str) -> AssetReferenceSet {
    AssetReferenceSet {
        figure_references: capture_all(&RE_INCLUDE_GRAPHICS, text).collect(),
        sub_document_references: capture_all(&RE_SUB_DOCUMENT, text).collect(),
        bibliography_references: capture_all(&RE_BIBLIOGRAPHY, text)
            .flat_map(|arg| {
                arg.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect(),
    }
}

fn capture_all<'t>(re: &'t Regex, text: &'t str) -> impl Iterator<Item = String> + 't {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolve every reference against `manifest`, relative to `base_dir`.
///
/// `base_dir` is the directory LaTeX resolves paths from, normally the one
/// holding the main document. Each reference tries, in order: the path as
/// written under `base_dir`, the same path with each fallback extension
/// appended, then a match anywhere in the manifest by trailing path or file
/// name with the same extensions. A reference cited more than once is
/// reported once.
pub fn validate<P: AsRef<Path>>(
    refs: &AssetReferenceSet,
    base_dir: &Path,
    manifest: &[P],
) -> AssetValidationReport {
    let paths: Vec<&Path> = manifest.iter().map(|p| p.as_ref()).collect();
    let mut report = AssetValidationReport::default();
    let mut seen: HashSet<(AssetKind, &str)> = HashSet::new();

    for (kind, reference) in refs.iter() {
        if !seen.insert((kind, reference)) {
            continue;
        }
        match resolve_in(reference, kind.fallback_extensions(), base_dir, &paths) {
            Some((path, strategy)) => report.resolved.push(ResolvedAsset {
                kind,
                reference: reference.to_string(),
                path,
                strategy,
            }),
            None => {
                let missing = MissingAsset {
                    kind,
                    reference: reference.to_string(),
                };
                if kind.is_required() {
                    report.missing_required.push(missing);
                } else {
                    report.missing_optional.push(missing);
                }
            }
        }
    }

    report
}

/// Resolve a single reference. Returns the matching manifest path and the step that found it.
pub fn resolve<P: AsRef<Path>>(
    reference: &str,
    extensions: &[&str],
    base_dir: &Path,
    manifest: &[P],
) -> Option<(PathBuf, ResolutionStrategy)> {
    let paths: Vec<&Path> = manifest.iter().map(|p| p.as_ref()).collect();
    resolve_in(reference, extensions, base_dir, &paths)
}

fn resolve_in(
    reference: &str,
    extensions: &[&str],
    base_dir: &Path,
    manifest: &[&Path],
) -> Option<(PathBuf, ResolutionStrategy)> {
    let relative = normalize_reference(reference);
    if relative.as_os_str().is_empty() {
        return None;
    }

    let anchored = anchor(base_dir, &relative);
    if let Some(path) = find_exact(manifest, &anchored) {
        return Some((path, ResolutionStrategy::Exact));
    }
    for ext in extensions {
        if let Some(path) = find_exact(manifest, &with_extension(&anchored, ext)) {
            return Some((path, ResolutionStrategy::ExtensionAppended));
        }
    }

    // Anywhere in the project: the longest trailing path first, then the bare file name.
    let suffixes: Vec<PathBuf> = std::iter::once(relative.clone())
        .chain(extensions.iter().map(|ext| with_extension(&relative, ext)))
        .collect();
    if let Some(path) = suffixes.iter().find_map(|s| find_suffix(manifest, s)) {
        return Some((path, ResolutionStrategy::Basename));
    }

    let basename = relative.file_name()?.to_str()?;
    let names: Vec<String> = std::iter::once(basename.to_string())
        .chain(extensions.iter().map(|ext| format!("{basename}.{ext}")))
        .collect();
    names.iter().find_map(|name| {
        manifest
            .iter()
            .find(|p| p.file_name().and_then(|n| n.to_str()) == Some(name.as_str()))
            .map(|p| (p.to_path_buf(), ResolutionStrategy::Basename))
    })
}

/// Turn a raw reference into a relative path, dropping a leading `./`.
fn normalize_reference(reference: &str) -> PathBuf {
    let trimmed = reference.trim().trim_start_matches("./");
    PathBuf::from(trimmed)
}

/// Join `relative` onto `base`, folding `.` and `..` lexically.
fn anchor(base: &Path, relative: &Path) -> PathBuf {
    let mut out = base.to_path_buf();
    for component in relative.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Append `.ext` to the full file name; `fig.v2` becomes `fig.v2.png`.
fn with_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

fn find_exact(manifest: &[&Path], target: &Path) -> Option<PathBuf> {
    manifest
        .iter()
        .find(|p| **p == target)
        .map(|p| p.to_path_buf())
}

/// First manifest entry whose trailing components equal `relative`.
fn find_suffix(manifest: &[&Path], relative: &Path) -> Option<PathBuf> {
    manifest
        .iter()
        .find(|p| p.ends_with(relative))
        .map(|p| p.to_path_buf())
}
