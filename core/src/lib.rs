//! Minesweeper game-state engine.
//!
//! A [`Game`] owns an immutable [`MineLayout`] and the player-visible board.
//! Moves never fail: anything that cannot be applied (out of bounds, already
//! revealed, game over) is reported as a `NoChange` outcome.

use core::ops::{BitOr, Index};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod types;

/// Largest supported grid side length.
pub const MAX_GRID_SIZE: Coord = 99;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameConfig {
    pub grid_size: Coord,
    pub num_bombs: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(grid_size: Coord, num_bombs: CellCount) -> Self {
        Self {
            grid_size,
            num_bombs,
        }
    }

    /// Validated configuration. A full board (`num_bombs == grid_size²`) is allowed.
    pub fn new(grid_size: Coord, num_bombs: CellCount) -> Result<Self> {
        if !(1..=MAX_GRID_SIZE).contains(&grid_size) {
            return Err(GameError::InvalidGridSize(grid_size));
        }

        let available = mult(grid_size, grid_size);
        if num_bombs > available {
            return Err(GameError::TooManyMines {
                requested: num_bombs,
                available,
            });
        }

        Ok(Self::new_unchecked(grid_size, num_bombs))
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(9, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 40)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.grid_size, self.grid_size)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.num_bombs)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(16, 32)
    }
}

/// Where the mines are. Built once per game and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MineLayoutRepr")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

/// Decoded form of [`MineLayout`], checked before it becomes one.
#[derive(Deserialize)]
struct MineLayoutRepr {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl TryFrom<MineLayoutRepr> for MineLayout {
    type Error = GameError;

    fn try_from(repr: MineLayoutRepr) -> Result<Self> {
        let layout = Self::from_mine_mask(repr.mine_mask)?;
        if layout.mine_count != repr.mine_count {
            return Err(GameError::InconsistentState(
                "mine count does not match the mine mask",
            ));
        }
        Ok(layout)
    }
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        if rows == 0 || rows != cols || rows > usize::from(MAX_GRID_SIZE) {
            return Err(GameError::InvalidBoardShape);
        }

        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .map_err(|_| GameError::InvalidBoardShape)?;

        Ok(Self::from_counted_mask(mine_mask, mine_count))
    }

    pub fn from_mine_coords(grid_size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let size = (grid_size, grid_size);
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= grid_size || coords.1 >= grid_size {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub(crate) fn from_counted_mask(mine_mask: Array2<bool>, mine_count: CellCount) -> Self {
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.grid_size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let grid_size = self.grid_size();
        if coords.0 < grid_size && coords.1 < grid_size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn grid_size(&self) -> Coord {
        Coord::try_from(self.mine_mask.nrows()).unwrap_or(MAX_GRID_SIZE)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mine_count)
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.grid_size(), self.grid_size())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    /// Out-of-bounds coordinates hold no mine.
    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self.mine_mask
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        let count = self
            .iter_neighbors(coords, Neighborhood::Surrounding)
            .filter(|&pos| self[pos])
            .count();
        count as u8
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub(crate) fn iter_neighbors(
        &self,
        coords: Coord2,
        neighborhood: Neighborhood,
    ) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords, neighborhood)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether any cell changed, i.e. the board needs redrawing.
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Merges the outcomes of several cells touched by one move.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
