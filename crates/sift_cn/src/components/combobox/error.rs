//! Combobox error types

use thiserror::Error;

/// Errors from the validating combobox APIs
///
/// Event dispatch never fails; these only surface from explicit calls such
/// as [`Combobox::select_row`](super::Combobox::select_row).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComboboxError {
    /// The row index is outside the filtered list
    #[error("Row {row} out of range ({count} rows visible)")]
    RowOutOfRange { row: usize, count: usize },

    /// The operation needs an open panel
    #[error("Combobox is closed")]
    Closed,

    /// The combobox is disabled
    #[error("Combobox is disabled")]
    Disabled,
}

/// Result type for combobox operations
pub type Result<T> = std::result::Result<T, ComboboxError>;
