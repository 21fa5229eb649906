//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// The host refused to move focus (element hidden, detached, or
    /// the requested focus options are unsupported)
    #[error("Focus request rejected: {0}")]
    FocusRejected(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
