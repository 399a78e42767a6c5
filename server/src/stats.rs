//! Process-wide game statistics shared by every session
//!
//! The aggregator keeps two atomic totals (games completed, games won) and a
//! concurrent map of per-session win counts. Session win counts outlive the
//! session's game, so a player's tally accumulates across rounds.
//!
//! It is constructed once and shared through an `Arc`; there is no global
//! state.

use crate::session_registry::require_session_id;
use dashmap::DashMap;
use log::info;
use shared::{GlobalStats, GlobalStatsMessage, SessionStatsMessage};
use std::sync::atomic::{AtomicU64, Ordering};

/// Site-wide totals plus per-session win counts.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    games_completed: AtomicU64,
    games_won: AtomicU64,
    session_wins: DashMap<String, u64>,
}

impl StatsAggregator {
    /// Creates an aggregator with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits one finished game.
    ///
    /// Must be called exactly once per finished game; the game center
    /// guarantees this by committing only after it has taken the game out of
    /// the registry.
    pub fn record_game_end(&self, session_id: &str, won: bool) {
        require_session_id(session_id);

        // The completion is counted before the win so a reader that sees the
        // win also sees its completion.
        let completed = self.games_completed.fetch_add(1, Ordering::AcqRel) + 1;

        if won {
            let total_won = self.games_won.fetch_add(1, Ordering::AcqRel) + 1;

            let session_total = {
                let mut wins = self.session_wins.entry(session_id.to_owned()).or_insert(0);
                *wins += 1;
                *wins
            };

            info!(
                "Session {} won (session wins: {}, site: {}/{})",
                session_id, session_total, total_won, completed
            );
        } else {
            info!("Session {} lost ({} games completed)", session_id, completed);
        }
    }

    /// Reads both totals.
    ///
    /// Each counter is read atomically. The two reads are not one atomic
    /// step, but wins are loaded first, so `games_won <= games_completed`
    /// always holds in the snapshot.
    pub fn global_snapshot(&self) -> GlobalStats {
        let games_won = self.games_won.load(Ordering::Acquire);
        let games_completed = self.games_completed.load(Ordering::Acquire);

        GlobalStats {
            games_completed,
            games_won,
        }
    }

    /// Wins recorded for a session; 0 if it never won.
    ///
    /// # Panics
    ///
    /// Panics if `session_id` is empty.
    pub fn session_wins(&self, session_id: &str) -> u64 {
        require_session_id(session_id);

        self.session_wins
            .get(session_id)
            .map(|wins| *wins)
            .unwrap_or(0)
    }

    /// Site-wide statistics line for the current totals.
    pub fn global_summary(&self) -> GlobalStatsMessage {
        summarize_global(self.global_snapshot())
    }

    /// Statistics line for one session against the current totals.
    ///
    /// # Panics
    ///
    /// Panics if `session_id` is empty.
    pub fn session_summary(&self, session_id: &str) -> SessionStatsMessage {
        let session_wins = self.session_wins(session_id);
        let games_completed = self.global_snapshot().games_completed;
        summarize_session(session_wins, games_completed)
    }
}

/// Picks the site-wide message for a snapshot: none, one, or a win percentage.
pub fn summarize_global(stats: GlobalStats) -> GlobalStatsMessage {
    match stats.games_completed {
        0 => GlobalStatsMessage::NoGames,
        1 => GlobalStatsMessage::OneGame,
        games => GlobalStatsMessage::Many {
            games,
            win_percentage: percentage(stats.games_won, games),
        },
    }
}

/// Session wins are expressed against all games completed site-wide, not
/// against the games this session played.
pub fn summarize_session(session_wins: u64, games_completed: u64) -> SessionStatsMessage {
    if games_completed == 0 {
        SessionStatsMessage::NoStats
    } else if session_wins == 0 {
        SessionStatsMessage::NoWins
    } else {
        SessionStatsMessage::Average {
            win_percentage: percentage(session_wins, games_completed),
            session_wins,
            games_completed,
        }
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    100.0 * part as f64 / whole as f64
}
