use thiserror::Error;

use crate::{CellCount, Coord, MAX_GRID_SIZE};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid grid size {0}, expected 1 to {max}", max = MAX_GRID_SIZE)]
    InvalidGridSize(Coord),
    #[error("Too many mines, requested {requested} but the grid only has {available} cells")]
    TooManyMines {
        requested: CellCount,
        available: CellCount,
    },
    #[error("Mine layout must be a non-empty square grid")]
    InvalidBoardShape,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Inconsistent game state: {0}")]
    InconsistentState(&'static str),
}

pub type Result<T> = core::result::Result<T, GameError>;
