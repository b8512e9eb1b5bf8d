use serde::{Deserialize, Serialize};

/// Canonical player-visible state of a single cell.
///
/// Whether a cell holds a mine is not part of this state, it lives in the
/// immutable [`MineLayout`](crate::MineLayout).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    /// Revealed cell holding a mine.
    Mine,
    /// Revealed cell with no adjacent mines.
    Empty,
    /// Revealed cell with `1..=8` adjacent mines.
    Count(u8),
}

impl CellState {
    /// State of a revealed safe cell with `adjacent_mines` mines around it.
    pub const fn revealed(adjacent_mines: u8) -> Self {
        if adjacent_mines == 0 {
            Self::Empty
        } else {
            Self::Count(adjacent_mines)
        }
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Mine | Self::Empty | Self::Count(_))
    }

    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    /// Adjacent mine count for revealed safe cells.
    pub const fn adjacent_mines(self) -> Option<u8> {
        match self {
            Self::Empty => Some(0),
            Self::Count(count) => Some(count),
            _ => None,
        }
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}
