use reqwest::StatusCode;

/// Errors raised by the module.
///
/// Per-track unavailability is not an error: it is reported on the
/// [`TrackInfo`](crate::types::TrackInfo) record so batch downloads can carry on.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// The API answered with a status outside 200/201/202.
    #[error("{status}: {body}")]
    Api { status: StatusCode, body: String },

    /// Network or transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response document did not have the expected shape.
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// Unresolvable URL, unsupported query type and similar caller mistakes.
    #[error("{0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ModuleError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ModuleError::InvalidInput(message.into())
    }

    /// Status code of an API failure, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ModuleError::Api { status, .. } => Some(*status),
            ModuleError::Http(err) => err.status(),
            _ => None,
        }
    }
}
