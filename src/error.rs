use thiserror::Error;

use crate::location::{Coord, Location};

/// Reasons a candidate reference grid may be rejected.
///
/// Validation fails closed: the first defect found rejects the whole grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// The document is not JSON at all.
    #[error("reference grid is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The document is not a list of rows.
    #[error("expected a list of rows")]
    NotRows,
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: Coord, found: Coord },
    #[error("row {row} is not a list")]
    RowNotList { row: Coord },
    #[error("row {row} has {found} cells, expected {expected}")]
    RowLength { row: Coord, expected: Coord, found: Coord },
    #[error("cell ({row}, {col}) is not a string")]
    NotAString { row: Coord, col: Coord },
    #[error("cell ({row}, {col}) has unknown state {value:?}")]
    UnknownState { row: Coord, col: Coord, value: String },
    #[error("cell ({row}, {col}) has unknown glyph {glyph:?}")]
    UnknownGlyph { row: Coord, col: Coord, glyph: char },
    /// A location outside the grid was addressed.
    #[error("location {0} is outside the grid")]
    OutOfBounds(Location),
}

impl GridError {
    /// Whether this error came from unparseable input rather than a parseable document of the wrong shape.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Json(_))
    }
}

/// Failures of the problem store and its storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persisted problem list (or a bundled list) could not be read back.
    #[error("problem list is corrupt: {0}")]
    Corrupt(String),
    #[error("problem {index} is out of range ({len} problems)")]
    OutOfRange { index: usize, len: usize },
    /// Bundled problems ship with the app and cannot be changed.
    #[error("problem {index} is bundled and cannot be changed")]
    ReadOnly { index: usize },
    /// A stored record's grid does not have the configured side.
    #[error("problem grid has side {found}, expected {expected}")]
    GridSize { expected: Coord, found: Coord },
    /// The key-value backend refused an operation.
    #[error("storage backend failed: {0}")]
    Backend(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failures of session operations invoked by the UI.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The operation requires the admin gate to be unlocked.
    #[error("admin gate is locked")]
    Locked,
    #[error("a problem needs an image")]
    EmptyImage,
    #[error("a problem needs a non-empty reference grid")]
    EmptyReference,
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures while reading a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage key must not be empty")]
    EmptyStorageKey,
}
