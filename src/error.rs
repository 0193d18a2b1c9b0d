//! Framework error model.

use crate::model::PaneId;
use thiserror::Error;

/// Result type used across the framework.
pub type FrameworkResult<T> = Result<T, FrameworkError>;

/// Errors raised while declaring layouts or driving sessions.
///
/// These are deterministic failures caused by the caller (bad layout
/// declarations, bad menu files). Host surfaces never produce them.
#[derive(Debug, Error)]
pub enum FrameworkError {
    /// A chest must have between 1 and 6 rows.
    #[error("invalid row count {0}, expected 1..=6")]
    InvalidRows(usize),

    /// A slot position does not fit the grid it was placed into.
    #[error("slot {column}:{row} is outside a grid of {rows} rows")]
    SlotOutOfBounds { column: usize, row: usize, rows: usize },

    #[error("invalid material id: {0}")]
    InvalidMaterial(String),

    #[error("invalid skull texture hash: {0}")]
    InvalidTexture(String),

    /// Skull profiles are only meaningful on player heads.
    #[error("{0} is not a player head")]
    NotASkull(String),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("pane {0} already exists in this layout")]
    DuplicatePane(PaneId),

    #[error("pane {0} not found")]
    PaneNotFound(PaneId),

    #[error("page {page} out of bounds for pane with {pages} pages")]
    PageOutOfBounds { page: usize, pages: usize },

    #[error("pane {0} is not paginated")]
    NotPaginated(PaneId),

    /// The tick-side dispatcher was dropped; queued UI work can no longer run.
    #[error("dispatcher is gone")]
    DispatcherGone,

    #[error("invalid menu definition: {0}")]
    Menu(String),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FrameworkError {
    pub fn pattern(msg: impl Into<String>) -> Self {
        Self::InvalidPattern(msg.into())
    }

    pub fn menu(msg: impl Into<String>) -> Self {
        Self::Menu(msg.into())
    }
}
