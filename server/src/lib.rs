//! # Guessing Game Center
//!
//! This library is the in-memory core behind a multi-user number guessing
//! site. Every browser session plays its own game, while the site keeps
//! statistics that stay consistent no matter how many sessions play at once.
//!
//! ## Core Responsibilities
//!
//! ### Per-Session Games
//! Each session gets one game: a secret number between 0 and 9 and a fixed
//! number of guesses. Wrong guesses earn a higher/lower hint; the game ends
//! when the secret is found or the guesses run out.
//!
//! ### Session Bookkeeping
//! A session's game is created on its first request and removed when the
//! round ends. Concurrent first requests for one session always share a
//! single game.
//!
//! ### Site-Wide Statistics
//! Finished games are committed to process-wide totals (games completed,
//! games won) and to a per-session win count that survives across rounds.
//!
//! ## Architecture Design
//!
//! ### Shared-Memory Concurrency
//! Request handlers run on many threads at once. The only shared mutable
//! state is the session map, the two totals and the per-session win map.
//! Maps use `DashMap` entry operations for check-and-insert, totals are
//! atomics, and no lock is held across more than one of them.
//!
//! ### Ordered Round Completion
//! Ending a round first removes the game from the registry, then commits
//! the outcome. Only the request that actually removed the game commits,
//! so a duplicate end request can never count a game twice.
//!
//! ### Structured Results
//! The core returns views, outcomes and statistic summaries as data. Their
//! `Display` implementations carry the site's wording; routing, templates
//! and session transport live outside this crate.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! The per-session state machine: guess validation, guess evaluation,
//! hints and terminal outcomes.
//!
//! ### Session Registry Module (`session_registry`)
//! Maps session ids to live games, with idle expiry for the session layer
//! to call.
//!
//! ### Stats Module (`stats`)
//! The statistics aggregator and the rules that turn counters into
//! summaries.
//!
//! ### Game Center Module (`game_center`)
//! The facade used by request handlers.
//!
//! ## Usage Example
//!
//! ```rust
//! use server::game_center::{GameCenter, GuessReport};
//!
//! let center = GameCenter::default();
//! let view = center.get_game("session-1");
//! assert!(view.is_beginning);
//!
//! match center.play_guess("session-1", "4") {
//!     Ok(GuessReport::TryAgain { guesses_left, hint }) => {
//!         println!("{} guesses left, try {:?}", guesses_left, hint);
//!     }
//!     Ok(GuessReport::Won(summary)) | Ok(GuessReport::Lost(summary)) => {
//!         println!("{}\n{}", summary.global, summary.session);
//!     }
//!     Err(e) => println!("{}", e),
//! }
//! ```

pub mod game;
pub mod game_center;
pub mod session_registry;
pub mod stats;
