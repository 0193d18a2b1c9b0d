//! Slot addressing and the rendered slot grid

use super::item::ItemStack;
use crate::error::{FrameworkError, FrameworkResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slots per chest row
pub const COLUMNS: usize = 9;

/// Largest chest the host can display
pub const MAX_ROWS: usize = 6;

/// Validated chest height (1..=6 rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Rows(usize);

impl Rows {
    pub fn new(rows: usize) -> FrameworkResult<Self> {
        if (1..=MAX_ROWS).contains(&rows) {
            Ok(Self(rows))
        } else {
            Err(FrameworkError::InvalidRows(rows))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Number of slots in a chest of this height
    pub fn slot_count(self) -> usize {
        self.0 * COLUMNS
    }
}

impl TryFrom<usize> for Rows {
    type Error = FrameworkError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Rows::new(value)
    }
}

impl From<Rows> for usize {
    fn from(rows: Rows) -> Self {
        rows.0
    }
}

/// A slot addressed by column and row, both 0-indexed
///
/// Ordered row-major, the same order as [`SlotPos::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotPos {
    pub row: usize,
    pub column: usize,
}

impl SlotPos {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Raw slot index as the host numbers it (row-major, 9 per row)
    ///
    /// Only meaningful for positions that [`fit`](SlotPos::fits) a chest.
    /// Anything further out saturates instead of overflowing.
    pub const fn index(self) -> usize {
        self.column.saturating_add(self.row.saturating_mul(COLUMNS))
    }

    pub const fn from_index(index: usize) -> Self {
        Self {
            column: index % COLUMNS,
            row: index / COLUMNS,
        }
    }

    pub fn fits(self, rows: Rows) -> bool {
        self.column < COLUMNS && self.row < rows.get()
    }

    pub fn check(self, rows: Rows) -> FrameworkResult<()> {
        if self.fits(rows) {
            Ok(())
        } else {
            Err(FrameworkError::SlotOutOfBounds {
                column: self.column,
                row: self.row,
                rows: rows.get(),
            })
        }
    }
}

impl fmt::Display for SlotPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.column, self.row)
    }
}

/// Full contents of a chest surface, one entry per slot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlotGrid {
    slots: Vec<Option<ItemStack>>,
}

impl SlotGrid {
    /// An all-empty grid for a chest of the given height
    pub fn empty(rows: Rows) -> Self {
        Self::with_len(rows.slot_count())
    }

    pub fn with_len(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index)?.as_ref()
    }

    /// Set a slot, ignoring indices past the end of the grid
    pub fn set(&mut self, index: usize, item: Option<ItemStack>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = item;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&ItemStack>)> {
        self.slots.iter().enumerate().map(|(i, s)| (i, s.as_ref()))
    }

    /// Number of slots currently holding an item
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
