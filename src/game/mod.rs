//! Hangman rules
//!
//! `state` holds a single round; `session` strings rounds together, keeps
//! score and talks to the ragdoll through [`RevealSequence`].

pub mod session;
pub mod state;

pub use session::{RevealSequence, Score, Session, SessionEvent};
pub use state::{GamePhase, GuessError, GuessOutcome, HangmanGame, parse_letter};
