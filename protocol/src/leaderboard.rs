use chrono::{DateTime, Utc};
use core::time::Duration;
use minesweeper_core::GameConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How many entries a high score listing shows by default.
pub const DEFAULT_HIGH_SCORE_LIMIT: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub player: String,
    pub config: GameConfig,
    #[serde(with = "crate::millis")]
    pub score: Duration,
    pub achieved_at: DateTime<Utc>,
}

/// Best winning time per player and board configuration, kept in memory.
#[derive(Clone, Debug, Default)]
pub struct Leaderboard {
    best: HashMap<(String, GameConfig), HighScore>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a win, returning whether it beat the player's previous best.
    pub fn record(
        &mut self,
        player: &str,
        config: GameConfig,
        score: Duration,
        achieved_at: DateTime<Utc>,
    ) -> bool {
        let entry = HighScore {
            player: player.to_owned(),
            config,
            score,
            achieved_at,
        };

        match self.best.get_mut(&(player.to_owned(), config)) {
            Some(current) if current.score <= score => false,
            Some(current) => {
                log::info!("New best for {} on {:?}: {:?}", player, config, score);
                *current = entry;
                true
            }
            None => {
                log::info!("First score for {} on {:?}: {:?}", player, config, score);
                self.best.insert((player.to_owned(), config), entry);
                true
            }
        }
    }

    pub fn best_for(&self, player: &str, config: GameConfig) -> Option<&HighScore> {
        self.best.get(&(player.to_owned(), config))
    }

    /// Fastest first, most recent first among equal times.
    pub fn top(&self, config: GameConfig, limit: usize) -> Vec<HighScore> {
        let mut scores: Vec<_> = self
            .best
            .values()
            .filter(|entry| entry.config == config)
            .cloned()
            .collect();
        scores.sort_by(|a, b| {
            a.score
                .cmp(&b.score)
                .then_with(|| b.achieved_at.cmp(&a.achieved_at))
        });
        scores.truncate(limit);
        scores
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn keeps_only_the_best_score_per_player() {
        let mut board = Leaderboard::new();
        let config = GameConfig::beginner();

        assert!(board.record("ana", config, Duration::from_secs(40), at(1)));
        assert!(!board.record("ana", config, Duration::from_secs(55), at(2)));
        assert!(board.record("ana", config, Duration::from_secs(31), at(3)));

        assert_eq!(board.len(), 1);
        assert_eq!(
            board.best_for("ana", config).map(|entry| entry.score),
            Some(Duration::from_secs(31))
        );
    }

    #[test]
    fn top_orders_by_score_then_newest() {
        let mut board = Leaderboard::new();
        let config = GameConfig::beginner();

        board.record("slow", config, Duration::from_secs(90), at(1));
        board.record("old", config, Duration::from_secs(20), at(1));
        board.record("new", config, Duration::from_secs(20), at(5));
        board.record("other_board", GameConfig::intermediate(), Duration::from_secs(1), at(1));

        let players: Vec<_> = board
            .top(config, DEFAULT_HIGH_SCORE_LIMIT)
            .into_iter()
            .map(|entry| entry.player)
            .collect();

        assert_eq!(players, ["new", "old", "slow"]);
        assert_eq!(board.top(config, 1).len(), 1);
    }
}
