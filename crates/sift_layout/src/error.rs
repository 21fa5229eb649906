//! Error types for sift_layout

use thiserror::Error;

/// Layout configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Placement string was not one of `auto`, `top`, `bottom`
    #[error("Invalid placement '{0}' (expected auto, top or bottom)")]
    InvalidPlacement(String),
}

/// Result type for sift_layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
