use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const GUESS_MIN: u8 = 0;
pub const GUESS_MAX: u8 = 9;
pub const DEFAULT_MAX_GUESSES: u32 = 5;

/// Which way the secret lies relative to the last wrong guess.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Higher,
    Lower,
}

/// Snapshot of a session's game as the view layer needs it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct GameView {
    pub is_beginning: bool,
    pub guesses_left: u32,
}

/// Result of submitting one validated guess.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct GuessOutcome {
    pub correct: bool,
    pub guesses_left: u32,
    /// Present only while the game is still running after a wrong guess.
    pub hint: Option<Direction>,
}

/// Rejected guess input. The game is left untouched when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuessError {
    #[error("You entered '{raw}' but that's not a number.")]
    NotANumber { raw: String },

    #[error("You entered {raw}; make a guess between zero and nine.")]
    OutOfRange { raw: String },
}

/// Parses raw guess text into a value in `GUESS_MIN..=GUESS_MAX`.
///
/// Text that is not a 32-bit integer (including anything beyond `i32`)
/// is `NotANumber`; any other integer outside the range is `OutOfRange`.
pub fn parse_guess(raw: &str) -> Result<u8, GuessError> {
    let value: i32 = raw.parse().map_err(|_| GuessError::NotANumber {
        raw: raw.to_string(),
    })?;

    if value < i32::from(GUESS_MIN) || value > i32::from(GUESS_MAX) {
        return Err(GuessError::OutOfRange {
            raw: raw.to_string(),
        });
    }

    Ok(value as u8)
}

/// Point-in-time read of the process-wide counters.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalStats {
    pub games_completed: u64,
    pub games_won: u64,
}

/// Site-wide statistics line shown after a game ends.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum GlobalStatsMessage {
    NoGames,
    OneGame,
    Many { games: u64, win_percentage: f64 },
}

impl fmt::Display for GlobalStatsMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalStatsMessage::NoGames => write!(f, "No games has been played so far."),
            GlobalStatsMessage::OneGame => write!(f, "One game has been played so far."),
            GlobalStatsMessage::Many {
                games,
                win_percentage,
            } => write!(
                f,
                "There have been {} games played.Win Average of all users: {:.2}%",
                games, win_percentage
            ),
        }
    }
}

/// Per-session statistics line shown after a game ends.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum SessionStatsMessage {
    NoStats,
    NoWins,
    Average {
        /// Session wins as a share of all games completed site-wide.
        win_percentage: f64,
        session_wins: u64,
        games_completed: u64,
    },
}

impl fmt::Display for SessionStatsMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatsMessage::NoStats => write!(f, "No game stats yet"),
            SessionStatsMessage::NoWins => write!(
                f,
                "You have not won a game, yet. But I *feel* your luck changing."
            ),
            SessionStatsMessage::Average {
                win_percentage,
                session_wins,
                games_completed,
            } => write!(
                f,
                "You have won an average of {:.2}% ({} game(s)) of this session's {} games",
                win_percentage, session_wins, games_completed
            ),
        }
    }
}
