use core::time::Duration;
use minesweeper_core::{CellCount, CellState, Coord, Coord2, Game, GameStatus};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotCell {
    pub state: CellState,
    /// Only filled in once the game is over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bomb: Option<bool>,
}

/// What a player is allowed to see of a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub grid: Vec<Vec<SnapshotCell>>,
    pub grid_size: Coord,
    pub num_bombs: CellCount,
    pub status: GameStatus,
    #[serde(default, with = "crate::millis::option")]
    pub score: Option<Duration>,
    pub uncovered_cells: CellCount,
    pub mines_left: i32,
    #[serde(default)]
    pub triggered_mine: Option<Coord2>,
}

impl GameSnapshot {
    pub fn from_game(game: &Game) -> Self {
        let grid_size = game.grid_size();
        let show_bombs = game.is_finished();

        let mut grid: Vec<Vec<SnapshotCell>> = (0..grid_size)
            .map(|_| Vec::with_capacity(grid_size.into()))
            .collect();
        for ((row, col), state) in game.iter_cells() {
            let bomb = show_bombs.then(|| game.has_mine_at((row, col)));
            grid[usize::from(row)].push(SnapshotCell { state, bomb });
        }

        Self {
            grid,
            grid_size,
            num_bombs: game.num_bombs(),
            status: game.status(),
            score: game.score(),
            uncovered_cells: game.uncovered_cells(),
            mines_left: game.mines_left(),
            triggered_mine: game.triggered_mine(),
        }
    }

    /// End-of-game display: every mined cell is shown as a mine, flagged or not.
    /// Has no effect while the game is ongoing since mines are not known yet.
    pub fn with_mines_revealed(mut self) -> Self {
        for cell in self.grid.iter_mut().flatten() {
            if cell.bomb == Some(true) {
                cell.state = CellState::Mine;
            }
        }
        self
    }

    pub fn cell_at(&self, (row, col): Coord2) -> Option<SnapshotCell> {
        self.grid
            .get(usize::from(row))?
            .get(usize::from(col))
            .copied()
    }
}
