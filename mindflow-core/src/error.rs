/// Top-level MindFlow error type.
///
/// All fallible operations in `mindflow-core` return [`Result<T, MindflowError>`](Result).
/// Each variant wraps a domain-specific error enum, allowing callers to
/// match on the error source without losing type information.
#[derive(thiserror::Error, Debug)]
pub enum MindflowError {
    /// Error from the state store or its persistence backend.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error while importing or exporting a mind map document.
    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    /// Error looking up or applying a template.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Error in configuration parsing or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from the state store and the storage backends behind it.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Underlying `SQLite` operation failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Persisted state could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The tree root cannot be deleted.
    #[error("The root node cannot be deleted")]
    RootProtected,

    /// A storage schema version this build does not understand.
    #[error("Unsupported storage schema version: {0}")]
    Schema(String),
}

/// Errors at the import/export boundary.
#[derive(thiserror::Error, Debug)]
pub enum TransferError {
    /// The text is not JSON at all.
    #[error("Invalid JSON data: {0}")]
    Parse(#[source] serde_json::Error),

    /// JSON, but not a mind map document (missing or non-array `nodes`/`edges`, bad node shape).
    #[error("Invalid mind map data format: {0}")]
    InvalidFormat(String),

    /// The graph failed structural validation under the strict import policy.
    #[error("Mind map failed validation: {0}")]
    Validation(String),

    /// Export serialization failed.
    #[error("Export failed: {0}")]
    Export(#[source] serde_json::Error),
}

/// Errors from the template catalog.
#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),
}

/// Errors in MindFlow configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),

    /// The configuration file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for `Result<T, MindflowError>`.
pub type Result<T> = std::result::Result<T, MindflowError>;
