/*!
 * Error types for the warden service layer
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WardenError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for service-layer results
pub type Result<T> = std::result::Result<T, WardenError>;
