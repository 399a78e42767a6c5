//! Entry point used by the request-handling layer
//!
//! `GameCenter` ties the session registry to the statistics aggregator. A
//! request carries a session id and, for guesses, the raw guess text; the
//! center answers with structured views and summaries that the caller turns
//! into pages.

use crate::game::GuessGame;
use crate::session_registry::{SessionRegistry, SharedGame};
use crate::stats::StatsAggregator;
use log::warn;
use shared::{
    Direction, GameView, GlobalStatsMessage, GuessError, GuessOutcome, SessionStatsMessage,
    DEFAULT_MAX_GUESSES,
};
use std::sync::{Arc, MutexGuard};

/// Statistics to show once a round is over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummary {
    pub global: GlobalStatsMessage,
    pub session: SessionStatsMessage,
}

/// What a full guess request resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuessReport {
    TryAgain {
        guesses_left: u32,
        hint: Direction,
    },
    Won(RoundSummary),
    Lost(RoundSummary),
}

/// Facade over the session registry and the statistics aggregator.
pub struct GameCenter {
    registry: SessionRegistry,
    stats: Arc<StatsAggregator>,
}

impl GameCenter {
    /// Builds a center with its own aggregator; games allow `max_guesses` guesses.
    pub fn new(max_guesses: u32) -> Self {
        Self::with_stats(max_guesses, Arc::new(StatsAggregator::new()))
    }

    /// Builds a center that commits into an existing aggregator.
    pub fn with_stats(max_guesses: u32, stats: Arc<StatsAggregator>) -> Self {
        Self {
            registry: SessionRegistry::new(max_guesses),
            stats,
        }
    }

    /// Registry of live games.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Aggregator that finished games are committed to.
    pub fn stats(&self) -> &Arc<StatsAggregator> {
        &self.stats
    }

    /// Current game for the session, created on first visit.
    pub fn get_game(&self, session_id: &str) -> GameView {
        let game = self.registry.get_or_create(session_id);
        let view = lock_game(&game).view();
        view
    }

    /// Parses raw guess text without touching any game.
    pub fn validate_guess(&self, raw: &str) -> Result<u8, GuessError> {
        GuessGame::validate_guess(raw)
    }

    /// Applies a validated guess to the session's game.
    ///
    /// # Panics
    ///
    /// Panics if the session's game has already finished; the caller must end
    /// a finished game before guessing again.
    pub fn submit_guess(&self, session_id: &str, value: u8) -> GuessOutcome {
        let game = self.registry.get_or_create(session_id);
        let mut game = lock_game(&game);

        let correct = game.submit_guess(value);
        GuessOutcome {
            correct,
            guesses_left: game.remaining_guesses(),
            hint: game.hint(value),
        }
    }

    /// Ends the session's round and commits its outcome.
    ///
    /// The game leaves the registry before the outcome is recorded, and only
    /// the call that actually removed it records anything. A duplicate end
    /// request is therefore never counted twice.
    pub fn end_game(&self, session_id: &str, won: bool) {
        match self.registry.remove(session_id) {
            Some(_) => self.stats.record_game_end(session_id, won),
            None => warn!(
                "end_game for session {} without a live game; nothing recorded",
                session_id
            ),
        }
    }

    /// Site-wide statistics line in the site's wording.
    pub fn global_stats_message(&self) -> String {
        self.stats.global_summary().to_string()
    }

    /// Session statistics line in the site's wording.
    ///
    /// # Panics
    ///
    /// Panics if `session_id` is empty.
    pub fn session_stats_message(&self, session_id: &str) -> String {
        self.stats.session_summary(session_id).to_string()
    }

    /// Both statistics lines shown after a round ends.
    pub fn round_summary(&self, session_id: &str) -> RoundSummary {
        RoundSummary {
            global: self.stats.global_summary(),
            session: self.stats.session_summary(session_id),
        }
    }

    /// Handles one guess request from raw text to result.
    ///
    /// Invalid input leaves the game untouched. A winning or final guess ends
    /// the round and reports the updated statistics.
    pub fn play_guess(&self, session_id: &str, raw: &str) -> Result<GuessReport, GuessError> {
        let value = self.validate_guess(raw)?;
        let outcome = self.submit_guess(session_id, value);

        let report = if outcome.correct {
            self.end_game(session_id, true);
            GuessReport::Won(self.round_summary(session_id))
        } else if let Some(hint) = outcome.hint {
            GuessReport::TryAgain {
                guesses_left: outcome.guesses_left,
                hint,
            }
        } else {
            self.end_game(session_id, false);
            GuessReport::Lost(self.round_summary(session_id))
        };

        Ok(report)
    }
}

impl Default for GameCenter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_GUESSES)
    }
}

fn lock_game(game: &SharedGame) -> MutexGuard<'_, GuessGame> {
    game.lock().expect("game mutex poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::GUESS_MAX;

    /// Wins within ten guesses by walking the range.
    fn play_until_won(center: &GameCenter, session_id: &str) -> RoundSummary {
        for guess in 0..=GUESS_MAX {
            match center.play_guess(session_id, &guess.to_string()).unwrap() {
                GuessReport::Won(summary) => return summary,
                GuessReport::TryAgain { .. } => continue,
                GuessReport::Lost(_) => panic!("lost with ten guesses"),
            }
        }
        unreachable!("target is always in range");
    }

    fn target_of(center: &GameCenter, session_id: &str) -> u8 {
        let game = center.registry.get_or_create(session_id);
        let target = lock_game(&game).target_for_tests();
        target
    }

    #[test]
    fn test_get_game_starts_fresh() {
        let center = GameCenter::default();
        let view = center.get_game("alpha");

        assert!(view.is_beginning);
        assert_eq!(view.guesses_left, DEFAULT_MAX_GUESSES);
        assert!(center.registry().contains("alpha"));
    }

    #[test]
    fn test_submit_correct_guess() {
        let center = GameCenter::default();
        let target = target_of(&center, "alpha");

        let outcome = center.submit_guess("alpha", target);
        assert!(outcome.correct);
        assert_eq!(outcome.hint, None);
        assert_eq!(outcome.guesses_left, DEFAULT_MAX_GUESSES - 1);
    }

    #[test]
    fn test_submit_wrong_guess_hints() {
        let center = GameCenter::default();
        let target = target_of(&center, "alpha");
        let wrong = if target == 0 { 1 } else { 0 };

        let outcome = center.submit_guess("alpha", wrong);
        assert!(!outcome.correct);
        let expected = if target > wrong {
            Direction::Higher
        } else {
            Direction::Lower
        };
        assert_eq!(outcome.hint, Some(expected));
        assert!(!center.get_game("alpha").is_beginning);
    }

    #[test]
    fn test_invalid_input_leaves_game_untouched() {
        let center = GameCenter::default();
        center.get_game("alpha");

        assert!(matches!(
            center.play_guess("alpha", "abc"),
            Err(GuessError::NotANumber { .. })
        ));
        assert!(matches!(
            center.play_guess("alpha", "15"),
            Err(GuessError::OutOfRange { .. })
        ));

        let view = center.get_game("alpha");
        assert!(view.is_beginning);
        assert_eq!(view.guesses_left, DEFAULT_MAX_GUESSES);
    }

    #[test]
    fn test_win_ends_round_and_records() {
        let center = GameCenter::new(10);
        let summary = play_until_won(&center, "alpha");

        assert!(!center.registry().contains("alpha"));
        assert_eq!(summary.global, GlobalStatsMessage::OneGame);
        assert_eq!(
            summary.session,
            SessionStatsMessage::Average {
                win_percentage: 100.0,
                session_wins: 1,
                games_completed: 1,
            }
        );
    }

    #[test]
    fn test_loss_reports_one_game_played() {
        let center = GameCenter::new(1);
        let target = target_of(&center, "alpha");
        let wrong = (target + 1) % (GUESS_MAX + 1);

        let report = center.play_guess("alpha", &wrong.to_string()).unwrap();
        match report {
            GuessReport::Lost(summary) => {
                assert_eq!(summary.global, GlobalStatsMessage::OneGame);
                assert_eq!(summary.session, SessionStatsMessage::NoWins);
            }
            other => panic!("expected Lost, got {:?}", other),
        }
        assert_eq!(
            center.global_stats_message(),
            "One game has been played so far."
        );
        assert_eq!(
            center.session_stats_message("alpha"),
            "You have not won a game, yet. But I *feel* your luck changing."
        );
    }

    #[test]
    fn test_duplicate_end_is_not_double_counted() {
        let center = GameCenter::default();
        center.get_game("alpha");

        center.end_game("alpha", true);
        center.end_game("alpha", true);

        let snapshot = center.stats().global_snapshot();
        assert_eq!(snapshot.games_completed, 1);
        assert_eq!(snapshot.games_won, 1);
        assert_eq!(center.stats().session_wins("alpha"), 1);
    }

    #[test]
    fn test_session_wins_survive_new_rounds() {
        let center = GameCenter::new(10);

        play_until_won(&center, "alpha");
        center.get_game("alpha");
        play_until_won(&center, "alpha");

        assert_eq!(center.stats().session_wins("alpha"), 2);
        assert_eq!(
            center.session_stats_message("alpha"),
            "You have won an average of 100.00% (2 game(s)) of this session's 2 games"
        );
    }

    #[test]
    fn test_shared_aggregator_across_centers() {
        let stats = Arc::new(StatsAggregator::new());
        let first = GameCenter::with_stats(10, Arc::clone(&stats));
        let second = GameCenter::with_stats(10, Arc::clone(&stats));

        play_until_won(&first, "alpha");
        play_until_won(&second, "beta");

        assert_eq!(stats.global_snapshot().games_completed, 2);
        assert_eq!(
            first.global_stats_message(),
            "There have been 2 games played.Win Average of all users: 100.00%"
        );
    }

    #[test]
    #[should_panic(expected = "session id must not be empty")]
    fn test_session_stats_message_rejects_empty_session() {
        let center = GameCenter::default();
        center.session_stats_message("");
    }

    #[test]
    #[should_panic(expected = "finished game")]
    fn test_guess_on_finished_game_panics() {
        let center = GameCenter::default();
        let target = target_of(&center, "alpha");

        center.submit_guess("alpha", target);
        center.submit_guess("alpha", target);
    }
}
