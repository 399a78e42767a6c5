use log::debug;
use rand::Rng;
use shared::{parse_guess, Direction, GameView, GuessError, GUESS_MAX, GUESS_MIN};

/// Result of a game so far; `Won` and `Lost` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

/// Outcome plus whether any guess has been made yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Beginning,
    InProgress,
    Won,
    Lost,
}

/// One session's round of guessing a secret number in `GUESS_MIN..=GUESS_MAX`.
#[derive(Debug, Clone)]
pub struct GuessGame {
    target: u8,
    guesses_remaining: u32,
    guess_count: u32,
    last_guess: Option<u8>,
    outcome: Outcome,
}

impl GuessGame {
    /// Starts a game with a random target and `max_guesses` guesses.
    pub fn new(max_guesses: u32) -> Self {
        let target = rand::thread_rng().gen_range(GUESS_MIN..=GUESS_MAX);
        Self::with_target(target, max_guesses)
    }

    /// Starts a game with a known target.
    ///
    /// # Panics
    ///
    /// Panics if `target` is out of range or `max_guesses` is zero.
    pub fn with_target(target: u8, max_guesses: u32) -> Self {
        assert!(
            (GUESS_MIN..=GUESS_MAX).contains(&target),
            "target {} outside {}..={}",
            target,
            GUESS_MIN,
            GUESS_MAX
        );
        assert!(max_guesses > 0, "a game needs at least one guess");

        Self {
            target,
            guesses_remaining: max_guesses,
            guess_count: 0,
            last_guess: None,
            outcome: Outcome::InProgress,
        }
    }

    /// Parses raw input, telling non-numbers apart from out-of-range numbers.
    pub fn validate_guess(raw: &str) -> Result<u8, GuessError> {
        parse_guess(raw)
    }

    /// True if `raw` is an integer in the guessing range.
    pub fn is_valid_guess(raw: &str) -> bool {
        parse_guess(raw).is_ok()
    }

    /// Applies one validated guess and reports whether it hit the target.
    ///
    /// # Panics
    ///
    /// Panics if the game has already been won or lost, or if `value` is
    /// outside the guessing range. Both are caller bugs.
    pub fn submit_guess(&mut self, value: u8) -> bool {
        assert!(
            self.has_more_guesses(),
            "guess submitted to a finished game ({:?})",
            self.outcome
        );
        assert!(
            (GUESS_MIN..=GUESS_MAX).contains(&value),
            "unvalidated guess {}",
            value
        );

        self.guesses_remaining -= 1;
        self.guess_count += 1;
        self.last_guess = Some(value);

        if value == self.target {
            self.outcome = Outcome::Won;
        } else if self.guesses_remaining == 0 {
            self.outcome = Outcome::Lost;
        }

        debug!(
            "Guess #{} = {} -> {:?}, {} left",
            self.guess_count, value, self.outcome, self.guesses_remaining
        );

        self.outcome == Outcome::Won
    }

    /// Direction of the secret relative to the most recent guess.
    ///
    /// Returns `None` unless `last_guess` really is the most recent guess,
    /// it was wrong, and the game is still running.
    pub fn hint(&self, last_guess: u8) -> Option<Direction> {
        if !self.has_more_guesses() || self.last_guess != Some(last_guess) {
            return None;
        }

        if self.target > last_guess {
            Some(Direction::Higher)
        } else if self.target < last_guess {
            Some(Direction::Lower)
        } else {
            None
        }
    }

    /// Guesses still allowed.
    pub fn remaining_guesses(&self) -> u32 {
        self.guesses_remaining
    }

    /// Guesses submitted so far.
    pub fn guess_count(&self) -> u32 {
        self.guess_count
    }

    /// True until the first guess is submitted.
    pub fn is_beginning(&self) -> bool {
        self.guess_count == 0
    }

    /// True while the game is neither won nor lost.
    pub fn has_more_guesses(&self) -> bool {
        self.outcome == Outcome::InProgress
    }

    /// Current outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Current state, distinguishing a fresh game from one in progress.
    pub fn status(&self) -> GameStatus {
        match self.outcome {
            Outcome::Won => GameStatus::Won,
            Outcome::Lost => GameStatus::Lost,
            Outcome::InProgress if self.is_beginning() => GameStatus::Beginning,
            Outcome::InProgress => GameStatus::InProgress,
        }
    }

    /// Snapshot for the view layer.
    pub fn view(&self) -> GameView {
        GameView {
            is_beginning: self.is_beginning(),
            guesses_left: self.guesses_remaining,
        }
    }

    #[cfg(test)]
    pub(crate) fn target_for_tests(&self) -> u8 {
        self.target
    }
}
