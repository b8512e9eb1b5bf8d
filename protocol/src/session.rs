use chrono::Utc;
use minesweeper_core::{Coord, Coord2, Game, GameConfig, GameStatus, RandomMinefieldGenerator};

use crate::*;

/// One player's connection: owns at most one game at a time and turns client
/// messages into engine calls.
#[derive(Clone, Debug)]
pub struct Session {
    player: String,
    seed: Option<u64>,
    game: Option<Game>,
}

impl Session {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            seed: None,
            game: None,
        }
    }

    /// Generate every board of this session from a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn handle(
        &mut self,
        message: ClientMessage,
        leaderboard: &mut Leaderboard,
    ) -> ServerMessage {
        match message {
            ClientMessage::Init {
                grid_size,
                num_bombs,
            } => self.init(grid_size, num_bombs),
            ClientMessage::Play { row, col } => self.play(row, col, leaderboard),
            ClientMessage::Flag { row, col } => self.flag(row, col),
        }
    }

    /// Decodes a JSON message, handles it and encodes the reply. Malformed
    /// input is answered with an error message rather than failing.
    pub fn handle_text(&mut self, text: &str, leaderboard: &mut Leaderboard) -> Result<String> {
        let reply = match decode::<ClientMessage>(text) {
            Ok(message) => self.handle(message, leaderboard),
            Err(err) => {
                log::debug!("Rejected message from {}: {}", self.player, err);
                ServerMessage::error(err.to_string())
            }
        };
        encode(&reply)
    }

    fn init(&mut self, grid_size: i64, num_bombs: i64) -> ServerMessage {
        let (Ok(grid_size), Ok(num_bombs)) = (Coord::try_from(grid_size), u16::try_from(num_bombs))
        else {
            return ServerMessage::error("Invalid game configuration");
        };

        let config = match GameConfig::new(grid_size, num_bombs) {
            Ok(config) => config,
            Err(err) => return ServerMessage::error(err.to_string()),
        };

        let generator = match self.seed {
            Some(seed) => RandomMinefieldGenerator::new(seed),
            None => RandomMinefieldGenerator::from_entropy(),
        };
        let game = Game::with_config(config, generator);
        log::info!("Initialized {:?} game for {}", config, self.player);

        let snapshot = GameSnapshot::from_game(&game);
        self.game = Some(game);
        ServerMessage::Init(snapshot)
    }

    fn play(&mut self, row: i64, col: i64, leaderboard: &mut Leaderboard) -> ServerMessage {
        let player = self.player.clone();
        let (game, coords) = match self.playable_game(row, col) {
            Ok(found) => found,
            Err(reply) => return reply,
        };

        log::debug!("Uncovering cell {:?} for {}", coords, player);
        game.reveal(coords);

        let snapshot = GameSnapshot::from_game(game);
        if !game.is_finished() {
            return ServerMessage::Play(snapshot);
        }

        let config = game.config();
        if let (GameStatus::Won, Some(score)) = (game.status(), game.score()) {
            leaderboard.record(&player, config, score, Utc::now());
        }
        log::info!("Game for {} ended: {:?}", player, game.status());

        ServerMessage::End {
            game: snapshot.with_mines_revealed(),
            high_scores: leaderboard.top(config, DEFAULT_HIGH_SCORE_LIMIT),
        }
    }

    fn flag(&mut self, row: i64, col: i64) -> ServerMessage {
        let (game, coords) = match self.playable_game(row, col) {
            Ok(found) => found,
            Err(reply) => return reply,
        };

        if game.add_flag(coords).has_update() {
            log::debug!("Toggled flag at {:?}", coords);
        }
        ServerMessage::Flag(GameSnapshot::from_game(game))
    }

    fn playable_game(
        &mut self,
        row: i64,
        col: i64,
    ) -> core::result::Result<(&mut Game, Coord2), ServerMessage> {
        let Some(game) = self.game.as_mut() else {
            return Err(ServerMessage::error("No game in progress"));
        };

        if game.is_finished() {
            return Err(ServerMessage::error("Game already ended"));
        }

        let coords = match (Coord::try_from(row), Coord::try_from(col)) {
            (Ok(row), Ok(col)) => game.validate_coords((row, col)).ok(),
            _ => None,
        };
        match coords {
            Some(coords) => Ok((game, coords)),
            None => Err(ServerMessage::error("Invalid position")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minesweeper_core::CellState;

    fn started(grid_size: i64, num_bombs: i64) -> (Session, Leaderboard) {
        let mut session = Session::new("tester").with_seed(11);
        let mut leaderboard = Leaderboard::new();
        let reply = session.handle(
            ClientMessage::Init {
                grid_size,
                num_bombs,
            },
            &mut leaderboard,
        );
        assert!(matches!(reply, ServerMessage::Init(_)));
        (session, leaderboard)
    }

    #[test]
    fn moves_before_init_are_rejected() {
        let mut session = Session::new("tester");
        let mut leaderboard = Leaderboard::new();

        let reply = session.handle(ClientMessage::Play { row: 0, col: 0 }, &mut leaderboard);

        assert_eq!(reply, ServerMessage::error("No game in progress"));
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut session = Session::new("tester");
        let mut leaderboard = Leaderboard::new();

        let reply = session.handle(
            ClientMessage::Init {
                grid_size: 2,
                num_bombs: 5,
            },
            &mut leaderboard,
        );
        assert!(matches!(reply, ServerMessage::Error { .. }));

        let reply = session.handle(
            ClientMessage::Init {
                grid_size: -4,
                num_bombs: 1,
            },
            &mut leaderboard,
        );
        assert_eq!(reply, ServerMessage::error("Invalid game configuration"));
        assert!(session.game().is_none());
    }

    #[test]
    fn out_of_range_positions_are_rejected() {
        let (mut session, mut leaderboard) = started(4, 2);

        for (row, col) in [(-1, 0), (0, 4), (300, 1)] {
            let reply = session.handle(ClientMessage::Play { row, col }, &mut leaderboard);
            assert_eq!(reply, ServerMessage::error("Invalid position"));
        }
        assert_eq!(session.game().map(Game::uncovered_cells), Some(0));
    }

    #[test]
    fn flag_round_trip() {
        let (mut session, mut leaderboard) = started(4, 2);

        let reply = session.handle(ClientMessage::Flag { row: 1, col: 2 }, &mut leaderboard);

        let ServerMessage::Flag(snapshot) = reply else {
            panic!("expected a flag reply, got {reply:?}");
        };
        assert_eq!(snapshot.cell_at((1, 2)).map(|c| c.state), Some(CellState::Flagged));
        assert_eq!(snapshot.mines_left, 1);
    }

    #[test]
    fn winning_ends_the_game_and_records_a_high_score() {
        let (mut session, mut leaderboard) = started(3, 0);

        let reply = session.handle(ClientMessage::Play { row: 1, col: 1 }, &mut leaderboard);

        let ServerMessage::End { game, high_scores } = reply else {
            panic!("expected the game to end, got {reply:?}");
        };
        assert_eq!(game.status, GameStatus::Won);
        assert_eq!(high_scores.len(), 1);
        assert_eq!(high_scores[0].player, "tester");

        let reply = session.handle(ClientMessage::Play { row: 0, col: 0 }, &mut leaderboard);
        assert_eq!(reply, ServerMessage::error("Game already ended"));
    }

    #[test]
    fn losing_ends_the_game_without_a_high_score() {
        let (mut session, mut leaderboard) = started(1, 1);

        let reply = session.handle(ClientMessage::Play { row: 0, col: 0 }, &mut leaderboard);

        let ServerMessage::End { game, high_scores } = reply else {
            panic!("expected the game to end, got {reply:?}");
        };
        assert_eq!(game.status, GameStatus::Lost);
        assert_eq!(game.cell_at((0, 0)).and_then(|c| c.bomb), Some(true));
        assert!(high_scores.is_empty());
        assert!(leaderboard.is_empty());
    }

    #[test]
    fn text_interface_answers_malformed_input_with_an_error() {
        let mut session = Session::new("tester");
        let mut leaderboard = Leaderboard::new();

        let reply = session.handle_text("not json", &mut leaderboard).unwrap();
        let reply: ServerMessage = decode(&reply).unwrap();

        assert!(matches!(reply, ServerMessage::Error { .. }));
    }

    #[test]
    fn text_interface_plays_a_game() {
        let mut session = Session::new("tester").with_seed(5);
        let mut leaderboard = Leaderboard::new();

        let reply = session
            .handle_text(r#"{"type":"init","grid_size":2,"num_bombs":0}"#, &mut leaderboard)
            .unwrap();
        assert!(reply.starts_with(r#"{"type":"init""#));

        let reply = session
            .handle_text(r#"{"type":"play","row":0,"col":0}"#, &mut leaderboard)
            .unwrap();
        let reply: ServerMessage = decode(&reply).unwrap();
        assert_eq!(reply.snapshot().map(|game| game.status), Some(GameStatus::Won));
    }
}
