pub mod assets;
pub mod detection;
pub mod error;
pub mod journal;
pub mod manifest;
pub mod preflight;
pub mod template;
pub mod text;
pub mod warning;
pub mod zip_utils;

pub use assets::{
    AssetKind, AssetReferenceSet, AssetValidationReport, MissingAsset, ResolutionStrategy,
    ResolvedAsset, extract_references, validate,
};
pub use error::PreflightError;
pub use journal::{ClassifierOptions, DetectionResult, JournalFamily, classify, classify_with};
pub use manifest::FileManifest;
pub use preflight::{
    PreflightOptions, PreflightReport, preflight_archive, preflight_dir, preflight_file,
};
pub use warning::{PreflightWarning, WarningCode};

use std::io::Read;
use std::path::Path;

use detection::InputKind;

/// Run the preflight on a project directory, a `.zip` archive or a single `.tex` file.
///
/// The input kind is auto-detected from magic bytes and file extension.
pub fn preflight_path(
    path: impl AsRef<Path>,
    options: &PreflightOptions,
) -> Result<PreflightReport, PreflightError> {
    let path = path.as_ref();
    if std::fs::metadata(path)?.is_dir() {
        return preflight_dir(path, options);
    }

    let mut header = Vec::with_capacity(4);
    std::fs::File::open(path)?
        .take(4)
        .read_to_end(&mut header)?;

    match detection::detect_input(path, &header) {
        Some(InputKind::Archive) => {
            let data = std::fs::read(path)?;
            preflight_archive(&data, options)
        }
        Some(InputKind::Document) => preflight_file(path, options),
        None => Err(PreflightError::UnsupportedInput {
            path: path.to_path_buf(),
        }),
    }
}
