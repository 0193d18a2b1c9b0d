//! Character patterns for laying out items

use super::slot::{SlotPos, COLUMNS, MAX_ROWS};
use crate::error::{FrameworkError, FrameworkResult};

/// A grid of characters, one string per row
///
/// ```text
/// "#########",
/// "#   X   #",
/// "#########",
/// ```
///
/// Each character is looked up in an item map when the pattern is applied
/// to a pane. Spaces never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    rows: Vec<Vec<char>>,
}

impl Pattern {
    pub fn new<S: AsRef<str>>(rows: &[S]) -> FrameworkResult<Self> {
        if rows.len() > MAX_ROWS {
            return Err(FrameworkError::pattern(format!(
                "{} rows, at most {} allowed",
                rows.len(),
                MAX_ROWS
            )));
        }

        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let chars: Vec<char> = line.as_ref().chars().collect();
                if chars.len() > COLUMNS {
                    Err(FrameworkError::pattern(format!(
                        "row {} has {} columns, at most {} allowed",
                        i,
                        chars.len(),
                        COLUMNS
                    )))
                } else {
                    Ok(chars)
                }
            })
            .collect::<FrameworkResult<Vec<_>>>()?;

        Ok(Self { rows })
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Every non-space cell with its position
    pub fn cells(&self) -> impl Iterator<Item = (SlotPos, char)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, chars)| {
            chars
                .iter()
                .enumerate()
                .filter(|(_, c)| **c != ' ')
                .map(move |(column, c)| (SlotPos::new(column, row), *c))
        })
    }
}
