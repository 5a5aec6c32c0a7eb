use serde::Serialize;

/// Categories for recoverable preflight issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    MissingFigure,
    MissingSubDocument,
    MissingBibliography,
    NonUtf8Source,
    AmbiguousMainDocument,
    TemplateUnavailable,
}

/// A recoverable issue surfaced to the user. Never blocks conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreflightWarning {
    pub code: WarningCode,
    pub message: String,
    pub location: Option<String>,
}

impl PreflightWarning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}
