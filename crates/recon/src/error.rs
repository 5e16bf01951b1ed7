use thiserror::Error;

/// Run-level failures. Per-entry match outcomes are never errors; they are
/// `MatchResult::Unmatched` values.
#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error (threshold out of range, overlapping columns, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),

    /// Alias file is present but not a JSON object of string to string.
    #[error("alias file '{path}' is malformed: {message}")]
    AliasParse { path: String, message: String },

    /// Source or benchmark catalog could not be parsed.
    #[error("{catalog} catalog parse error: {message}")]
    CatalogParse { catalog: String, message: String },

    /// IO error (file read, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl ReconError {
    pub(crate) fn source_catalog(message: impl Into<String>) -> Self {
        Self::CatalogParse { catalog: "source".into(), message: message.into() }
    }

    pub(crate) fn benchmark_catalog(message: impl Into<String>) -> Self {
        Self::CatalogParse { catalog: "benchmark".into(), message: message.into() }
    }
}
