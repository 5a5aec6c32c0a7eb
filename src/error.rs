use std::path::PathBuf;

/// Errors that can occur while preparing a LaTeX project for conversion.
#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    #[error("unsupported input: {}", path.display())]
    UnsupportedInput { path: PathBuf },

    #[error("failed to read ZIP archive")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("input too large: {size} bytes exceeds limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("archive entry escapes the extraction directory: {name}")]
    UnsafeArchivePath { name: String },

    #[error("no main LaTeX document found under {}", root.display())]
    MainDocumentNotFound { root: PathBuf },

    #[error("main document must be a path inside the project: {}", path.display())]
    MainDocumentOutsideRoot { path: PathBuf },

    #[error("missing required assets: {}", references.join(", "))]
    MissingAssets { references: Vec<String> },
}
