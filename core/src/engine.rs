use core::time::Duration;
use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Ongoing -> Won
/// - Ongoing -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_ongoing(self) -> bool {
        matches!(self, Self::Ongoing)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Ongoing
    }
}

/// Position of a cell within one reveal chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Chain {
    /// The cell the player targeted. May be flagged.
    First,
    /// Reached by flood-fill. Flags stop propagation here.
    Propagated,
}

/// Represents a game from start to finish.
///
/// Decoding checks the board against the mine layout, so a game received
/// from elsewhere holds the same invariants as one built by [`Game::new`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GameRepr")]
pub struct Game {
    mine_layout: MineLayout,
    board: Array2<CellState>,
    uncovered_cells: CellCount,
    flagged_cells: CellCount,
    status: GameStatus,
    started_at: DateTime<Utc>,
    score: Option<Duration>,
    triggered_mine: Option<Coord2>,
}

#[derive(Deserialize)]
struct GameRepr {
    mine_layout: MineLayout,
    board: Array2<CellState>,
    uncovered_cells: CellCount,
    flagged_cells: CellCount,
    status: GameStatus,
    started_at: DateTime<Utc>,
    score: Option<Duration>,
    triggered_mine: Option<Coord2>,
}

impl TryFrom<GameRepr> for Game {
    type Error = GameError;

    fn try_from(repr: GameRepr) -> Result<Self> {
        let layout = &repr.mine_layout;
        let grid_size = usize::from(layout.grid_size());
        if repr.board.dim() != (grid_size, grid_size) {
            return Err(GameError::InconsistentState(
                "board and mine layout differ in size",
            ));
        }

        let mut uncovered_cells: CellCount = 0;
        let mut flagged_cells: CellCount = 0;
        let mut detonated = None;
        for ((row, col), &state) in repr.board.indexed_iter() {
            let coords = (row as Coord, col as Coord);
            if state.is_unrevealed() {
                if state == CellState::Flagged {
                    flagged_cells += 1;
                }
                continue;
            }

            uncovered_cells += 1;
            let matches_layout = match state.adjacent_mines() {
                Some(count) => {
                    !layout.contains_mine(coords) && count == layout.adjacent_mine_count(coords)
                }
                None => layout.contains_mine(coords) && detonated.replace(coords).is_none(),
            };
            if !matches_layout {
                return Err(GameError::InconsistentState(
                    "revealed cell disagrees with the mine layout",
                ));
            }
        }

        if uncovered_cells != repr.uncovered_cells || flagged_cells != repr.flagged_cells {
            return Err(GameError::InconsistentState("cell counters do not match the board"));
        }

        let status_matches = match repr.status {
            GameStatus::Ongoing => detonated.is_none() && repr.score.is_none(),
            GameStatus::Won => {
                detonated.is_none()
                    && uncovered_cells == layout.safe_cell_count()
                    && repr.score.is_some()
            }
            GameStatus::Lost => detonated.is_some() && repr.score.is_some(),
        };
        if !status_matches || repr.triggered_mine != detonated {
            return Err(GameError::InconsistentState("status does not match the board"));
        }

        Ok(Self {
            mine_layout: repr.mine_layout,
            board: repr.board,
            uncovered_cells,
            flagged_cells,
            status: repr.status,
            started_at: repr.started_at,
            score: repr.score,
            triggered_mine: repr.triggered_mine,
        })
    }
}

impl Game {
    /// Starts a game on a freshly generated random grid.
    pub fn init(grid_size: Coord, num_bombs: CellCount) -> Result<Self> {
        let config = GameConfig::new(grid_size, num_bombs).inspect_err(|err| {
            log::warn!("Rejected game configuration {grid_size}x{grid_size}/{num_bombs}: {err}");
        })?;
        Ok(Self::with_config(config, RandomMinefieldGenerator::from_entropy()))
    }

    pub fn with_config(config: GameConfig, generator: impl MinefieldGenerator) -> Self {
        Self::new(generator.generate(config))
    }

    pub fn new(mine_layout: MineLayout) -> Self {
        let grid_size = mine_layout.grid_size();
        log::debug!(
            "New {}x{} game with {} mines",
            grid_size,
            grid_size,
            mine_layout.mine_count()
        );
        Self {
            board: Array2::default((grid_size, grid_size).to_nd_index()),
            mine_layout,
            uncovered_cells: 0,
            flagged_cells: 0,
            status: Default::default(),
            started_at: Utc::now(),
            score: None,
            triggered_mine: None,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn grid_size(&self) -> Coord {
        self.mine_layout.grid_size()
    }

    pub fn num_bombs(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn config(&self) -> GameConfig {
        self.mine_layout.game_config()
    }

    pub fn uncovered_cells(&self) -> CellCount {
        self.uncovered_cells
    }

    pub fn flagged_cells(&self) -> CellCount {
        self.flagged_cells
    }

    /// How many mines have not been flagged yet, negative when over-flagged.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.num_bombs()) - i32::from(self.flagged_cells)
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Elapsed time between start and the terminal transition, `None` while ongoing.
    pub fn score(&self) -> Option<Duration> {
        self.score
    }

    /// Running clock while ongoing, frozen at the score once finished.
    pub fn elapsed(&self) -> Duration {
        self.score.unwrap_or_else(|| self.time_since_start())
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        self.mine_layout.validate_coords(coords)
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<CellState> {
        self.board.get(coords.to_nd_index()).copied()
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.mine_layout.contains_mine(coords)
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    /// Every cell in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, CellState)> + '_ {
        self.board
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    /// Toggles a flag on a hidden cell. Revealed cells, out-of-bounds
    /// coordinates and finished games are left untouched.
    pub fn add_flag(&mut self, coords: Coord2) -> MarkOutcome {
        use CellState::*;
        use MarkOutcome::*;

        if self.validate_coords(coords).is_err() || self.status.is_finished() {
            return NoChange;
        }

        let cell = &mut self.board[coords.to_nd_index()];
        match *cell {
            Hidden => {
                *cell = Flagged;
                self.flagged_cells += 1;
                Changed
            }
            Flagged => {
                *cell = Hidden;
                self.flagged_cells = self.flagged_cells.saturating_sub(1);
                Changed
            }
            Mine | Empty | Count(_) => NoChange,
        }
    }

    /// Uncovers `coords`, flood-filling through cells without adjacent mines.
    ///
    /// Propagation goes to the 4 orthogonal neighbors of every empty cell and
    /// stops at numbered and flagged cells. A flagged cell can still be
    /// uncovered when it is the one targeted. Does not check for a win, see
    /// [`Game::update_game_status`].
    pub fn uncover_cell(&mut self, coords: Coord2) -> RevealOutcome {
        if self.validate_coords(coords).is_err() {
            log::debug!("Ignoring uncover outside the grid at {:?}", coords);
            return RevealOutcome::NoChange;
        }

        let mut outcome = RevealOutcome::NoChange;
        let mut pending = vec![(coords, Chain::First)];

        while let Some((visit_coords, chain)) = pending.pop() {
            let visit_outcome = self.uncover_single_cell(visit_coords, chain);
            outcome = outcome | visit_outcome;

            if visit_outcome == RevealOutcome::Revealed
                && self.board[visit_coords.to_nd_index()] == CellState::Empty
            {
                pending.extend(
                    self.mine_layout
                        .iter_neighbors(visit_coords, Neighborhood::Orthogonal)
                        .filter(|&pos| self.board[pos.to_nd_index()] == CellState::Hidden)
                        .map(|pos| (pos, Chain::Propagated)),
                );
            }
        }

        outcome
    }

    /// Declares the game won once every safe cell is uncovered. A loss is never overwritten.
    pub fn update_game_status(&mut self) -> GameStatus {
        if self.status.is_ongoing() && self.uncovered_cells == self.mine_layout.safe_cell_count() {
            self.end_game(GameStatus::Won);
        }
        self.status
    }

    /// One player move: [`Game::uncover_cell`] followed by [`Game::update_game_status`].
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        let was_ongoing = self.status.is_ongoing();
        let outcome = self.uncover_cell(coords);

        if was_ongoing && self.update_game_status() == GameStatus::Won {
            outcome | RevealOutcome::Won
        } else {
            outcome
        }
    }

    fn uncover_single_cell(&mut self, coords: Coord2, chain: Chain) -> RevealOutcome {
        use CellState::*;

        if !self.status.is_ongoing() {
            return RevealOutcome::NoChange;
        }

        match self.board[coords.to_nd_index()] {
            Mine | Empty | Count(_) => return RevealOutcome::NoChange,
            Flagged if chain == Chain::Propagated => return RevealOutcome::NoChange,
            Flagged => self.flagged_cells = self.flagged_cells.saturating_sub(1),
            Hidden => {}
        }

        self.uncovered_cells += 1;

        if self.mine_layout.contains_mine(coords) {
            self.board[coords.to_nd_index()] = Mine;
            self.triggered_mine = Some(coords);
            self.end_game(GameStatus::Lost);
            return RevealOutcome::HitMine;
        }

        let adjacent_mines = self.mine_layout.adjacent_mine_count(coords);
        self.board[coords.to_nd_index()] = CellState::revealed(adjacent_mines);
        log::trace!("Uncovered cell at {:?}, mine count: {}", coords, adjacent_mines);

        RevealOutcome::Revealed
    }

    fn end_game(&mut self, status: GameStatus) {
        if self.status.is_finished() {
            return;
        }

        let score = self.time_since_start();
        self.status = status;
        self.score = Some(score);
        log::debug!("Game ended {:?} after {:?}", status, score);
    }

    fn time_since_start(&self) -> Duration {
        (Utc::now() - self.started_at).to_std().unwrap_or_default()
    }
}
