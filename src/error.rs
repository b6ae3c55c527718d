//! Error types for table operations

use thiserror::Error;

/// Which input of a merge an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Errors raised by loading and transforming tables.
///
/// Every variant is scoped to a single operation: the table the operation
/// was applied to is never touched, so callers can report the error and
/// keep their previous state.
#[derive(Debug, Error)]
pub enum Error {
    /// The input decoded fine but is not a well-formed table
    #[error("malformed table{}: {reason}", row.map(|r| format!(" at line {}", r)).unwrap_or_default())]
    MalformedTable { row: Option<usize>, reason: String },

    /// The merge key is not a column of one of the inputs
    #[error("merge key '{key}' not found in {side} table")]
    MissingMergeKey { key: String, side: Side },

    /// An operation would produce two columns with the same name
    #[error("duplicate column '{name}'")]
    DuplicateColumn { name: String },

    /// The join itself could not be computed
    #[error("merge failed: {reason}")]
    MergeComputation { reason: String },

    /// A session action needs a table that has not been uploaded
    #[error("no table loaded in {slot} slot")]
    EmptySlot { slot: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
