use thiserror::Error;

/// Gateway error taxonomy.
///
/// Validation and auth failures are detected locally and never reach the
/// network. Transport and upstream failures are caught at the engine
/// boundary and converted to this enum; they are never retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Required field missing, empty batch, malformed relation spec.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing or invalid caller API key.
    #[error("missing or invalid API key")]
    Auth,

    /// Execution engine unreachable (connect failure, timeout, reset).
    ///
    /// The display message is deliberately generic; the underlying cause is
    /// available via `source()` and is logged at the call site, not leaked
    /// to the caller.
    #[error("cannot reach execution engine")]
    Transport(#[source] reqwest::Error),

    /// Engine reachable but reported a failure (constraint violation,
    /// unknown table/column, ...). The upstream message is forwarded
    /// verbatim as trusted operational detail.
    #[error("execution engine error ({status}): {message}")]
    Upstream { status: u16, message: String },
}

impl GatewayError {
    /// Shorthand for a [`GatewayError::Validation`] with a field-level message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status this error maps to on the caller-facing surface.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Auth => 401,
            Self::Transport(_) => 500,
            Self::Upstream { status, .. } => *status,
        }
    }
}

/// Result type for gateway operations.
pub type Result<T> = core::result::Result<T, GatewayError>;
