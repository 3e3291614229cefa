//! Ragdoll Hangman - word guessing with a ragdoll that builds itself
//!
//! Core modules:
//! - `game`: Word-guess state machine and the round session around it
//! - `ragdoll`: Stage descriptors, stage sequencer, owned simulation resource
//! - `sim`: Small 2D rigid body world (rectangles + spring constraints)
//! - `renderer`: Draw list extraction (+ canvas backend on wasm)
//! - `words`: Built-in word source

pub mod game;
pub mod ragdoll;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod words;

#[cfg(target_arch = "wasm32")]
pub mod platform;

pub use game::{GamePhase, GuessError, HangmanGame, Score, Session, SessionEvent};
pub use ragdoll::{RagdollSimulation, StageSequencer};
pub use settings::Settings;
pub use words::WordList;

/// Game configuration constants
pub mod consts {
    /// Canonical alphabet, lowercase
    pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

    /// Wrong guesses allowed in the budgeted rule
    pub const DEFAULT_WRONG_GUESS_BUDGET: u8 = 3;
    /// Time the loss animation gets before the next round starts
    pub const LOSS_RESET_DELAY_MS: f64 = 2000.0;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ragdoll size multiplier
    pub const RAGDOLL_SCALE: f32 = 1.3;
    /// Subtracted from scaled client coordinates to get world coordinates
    pub const POINTER_OFFSET: (f32, f32) = (150.0, 50.0);
    /// Pointer pull per unit of distance, shared across all active parts
    pub const POINTER_STRENGTH: f32 = 0.001;

    /// Downward gravity scale
    pub const GRAVITY: f32 = 1.0;
    /// Constraint relaxation passes per step
    pub const CONSTRAINT_ITERATIONS: u32 = 2;

    /// Visible region of the world, used to fit the canvas
    pub const VIEW_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 600.0;
}

/// Whether `c` is a letter of the canonical alphabet
#[inline]
pub fn is_alphabet_letter(c: char) -> bool {
    c.is_ascii_lowercase()
}
