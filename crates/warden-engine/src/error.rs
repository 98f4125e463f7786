//! Error types for the warden-engine crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("engine returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("invalid engine endpoint: {0}")]
    InvalidEndpoint(String),
}

impl EngineError {
    /// Whether the failure is transient (engine unreachable, timed out, or
    /// failing server-side) and worth retrying on a later tick, as opposed
    /// to a request the engine has definitively rejected.
    pub fn is_transient(&self) -> bool {
        match self {
            EngineError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            EngineError::Status { code, .. } => *code >= 500,
            EngineError::InvalidEndpoint(_) => false,
        }
    }
}
