//! Session-to-game bookkeeping for the game center
//!
//! This module maps opaque session identifiers to their live game:
//! - Lazy creation of exactly one game per session on first access
//! - Idempotent removal once a round has ended
//! - Last-access tracking so the surrounding session layer can expire
//!   abandoned games
//!
//! All operations take `&self` and are safe to call from any number of
//! threads at once. Insert-if-absent happens under a single shard lock of
//! the underlying `DashMap`, so two first requests for the same session can
//! never both create a game.

use crate::game::GuessGame;
use dashmap::DashMap;
use log::{debug, info};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A game shared between the registry and the request currently using it.
pub type SharedGame = Arc<Mutex<GuessGame>>;

/// Fails loudly on an empty session identifier.
///
/// An empty id means the transport layer lost track of its session, which
/// is a caller bug rather than user input.
pub(crate) fn require_session_id(session_id: &str) {
    assert!(!session_id.is_empty(), "session id must not be empty");
}

/// A registered session and its current game
#[derive(Debug)]
pub struct SessionEntry {
    /// The game for the session's current round
    pub game: SharedGame,
    /// Last time the session looked up its game
    pub last_seen: Instant,
}

impl SessionEntry {
    /// Wraps a freshly created game and marks the session as active now
    pub fn new(game: GuessGame) -> Self {
        Self {
            game: Arc::new(Mutex::new(game)),
            last_seen: Instant::now(),
        }
    }

    /// Checks whether the session has been idle for longer than `timeout`
    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

/// Maps each session to at most one live game
///
/// Games are created on first access with the registry's configured guess
/// allowance. Callers clone the returned `Arc` and lock the game for the
/// duration of a single request; the registry never holds a game lock.
pub struct SessionRegistry {
    /// Live games indexed by session identifier
    sessions: DashMap<String, SessionEntry>,
    /// Guess allowance for newly created games
    max_guesses: u32,
}

impl SessionRegistry {
    /// Creates an empty registry whose games allow `max_guesses` guesses
    pub fn new(max_guesses: u32) -> Self {
        Self {
            sessions: DashMap::new(),
            max_guesses,
        }
    }

    /// Returns the session's game, creating it on first access
    ///
    /// Concurrent first calls for the same session all receive the same
    /// game instance. Every call refreshes the session's last-seen time.
    pub fn get_or_create(&self, session_id: &str) -> SharedGame {
        require_session_id(session_id);

        let mut created = false;
        let mut entry = self
            .sessions
            .entry(session_id.to_owned())
            .or_insert_with(|| {
                created = true;
                SessionEntry::new(GuessGame::new(self.max_guesses))
            });
        entry.last_seen = Instant::now();
        let game = Arc::clone(&entry.game);
        drop(entry);

        if created {
            info!("New game created for session {}", session_id);
        }

        game
    }

    /// Removes the session's game
    ///
    /// Returns the removed game, or `None` if the session had none. Removing
    /// an absent session is a no-op, so repeated calls are harmless.
    pub fn remove(&self, session_id: &str) -> Option<SharedGame> {
        require_session_id(session_id);

        match self.sessions.remove(session_id) {
            Some((_, entry)) => {
                debug!("Game removed for session {}", session_id);
                Some(entry.game)
            }
            None => None,
        }
    }

    /// Checks whether the session currently has a live game
    pub fn contains(&self, session_id: &str) -> bool {
        require_session_id(session_id);

        self.sessions.contains_key(session_id)
    }

    /// Drops games whose sessions have been idle for longer than `timeout`
    ///
    /// Returns the expired session ids. Expired games are abandoned, not
    /// finished, so nothing is reported to the statistics. The registry never
    /// calls this on its own; the session layer decides when to sweep.
    pub fn expire_idle(&self, timeout: Duration) -> Vec<String> {
        let mut expired = Vec::new();

        self.sessions.retain(|session_id, entry| {
            if entry.is_timed_out(timeout) {
                expired.push(session_id.clone());
                false
            } else {
                true
            }
        });

        for session_id in &expired {
            info!("Session {} expired after {:?} idle", session_id, timeout);
        }

        expired
    }

    /// Guess allowance given to new games
    pub fn max_guesses(&self) -> u32 {
        self.max_guesses
    }

    /// Returns the number of sessions with a live game
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no session has a live game
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
