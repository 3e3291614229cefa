//! Word-guess state machine
//!
//! One round of hangman: a secret word, the letters guessed so far and an
//! optional wrong-guess budget. Phases go `Playing -> Won | Lost` and never
//! back; a new round is a new `HangmanGame`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::ALPHABET;
use crate::is_alphabet_letter;

/// Guess rejected before touching any state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("invalid guess {input:?}: expected a single English letter")]
    InvalidInput { input: String },
}

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GamePhase {
    pub fn is_over(self) -> bool {
        self != GamePhase::Playing
    }
}

/// What a valid guess did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Letter is in the word
    Hit,
    /// Letter is not in the word; budget (if any) was charged
    Miss,
    /// Letter was already guessed this round; nothing changed
    Repeat,
    /// Round already ended; nothing changed
    RoundOver,
}

/// Canonicalize a guess to a lowercase alphabet letter
pub fn parse_letter(input: &str) -> Result<char, GuessError> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => canonical_letter(c).ok_or_else(|| GuessError::InvalidInput {
            input: input.to_string(),
        }),
        _ => Err(GuessError::InvalidInput {
            input: input.to_string(),
        }),
    }
}

fn canonical_letter(c: char) -> Option<char> {
    let c = c.to_ascii_lowercase();
    is_alphabet_letter(c).then_some(c)
}

#[inline]
fn letter_index(c: char) -> usize {
    (c as u8 - b'a') as usize
}

/// A single hangman round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HangmanGame {
    secret_word: String,
    /// Indexed by letter, `a` = 0
    guessed: [bool; 26],
    /// Budget the round started with (`None` = unbudgeted)
    budget: Option<u8>,
    wrong_guesses_left: Option<u8>,
    phase: GamePhase,
}

impl HangmanGame {
    /// Start a round. `secret_word` must be lowercase `a-z`, as guaranteed by
    /// [`WordList`](crate::words::WordList).
    pub fn new(secret_word: impl Into<String>, budget: Option<u8>) -> Self {
        let secret_word = secret_word.into();
        debug_assert!(
            !secret_word.is_empty() && secret_word.chars().all(is_alphabet_letter),
            "secret word must be lowercase a-z: {secret_word:?}"
        );
        Self {
            secret_word,
            guessed: [false; 26],
            budget,
            wrong_guesses_left: budget,
            phase: GamePhase::Playing,
        }
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn budget(&self) -> Option<u8> {
        self.budget
    }

    pub fn wrong_guesses_left(&self) -> Option<u8> {
        self.wrong_guesses_left
    }

    /// Guess a letter given as text (exactly one character)
    pub fn guess(&mut self, input: &str) -> Result<GuessOutcome, GuessError> {
        let letter = parse_letter(input)?;
        Ok(self.apply(letter))
    }

    /// Guess a letter given as a `char`
    pub fn guess_char(&mut self, c: char) -> Result<GuessOutcome, GuessError> {
        let letter = canonical_letter(c).ok_or_else(|| GuessError::InvalidInput {
            input: c.to_string(),
        })?;
        Ok(self.apply(letter))
    }

    fn apply(&mut self, letter: char) -> GuessOutcome {
        if self.phase.is_over() {
            return GuessOutcome::RoundOver;
        }
        let slot = &mut self.guessed[letter_index(letter)];
        if *slot {
            return GuessOutcome::Repeat;
        }
        *slot = true;

        if self.secret_word.contains(letter) {
            if self.is_won() {
                self.phase = GamePhase::Won;
            }
            GuessOutcome::Hit
        } else {
            if let Some(left) = self.wrong_guesses_left.as_mut() {
                *left = left.saturating_sub(1);
            }
            if self.is_lost() {
                self.phase = GamePhase::Lost;
            }
            GuessOutcome::Miss
        }
    }

    /// End the round as lost (used when the ragdoll, not the budget, decides)
    pub fn mark_lost(&mut self) {
        if !self.phase.is_over() {
            self.phase = GamePhase::Lost;
        }
    }

    /// Per position: the letter if guessed, else `None`
    pub fn current_word_status(&self) -> Vec<Option<char>> {
        self.secret_word
            .chars()
            .map(|c| self.is_guessed(c).then_some(c))
            .collect()
    }

    /// Every position shown, for the loss screen
    pub fn reveal_all(&self) -> Vec<Option<char>> {
        self.secret_word.chars().map(Some).collect()
    }

    /// Word status as text with `placeholder` for hidden letters
    pub fn masked_word(&self, placeholder: char) -> String {
        self.current_word_status()
            .into_iter()
            .map(|c| c.unwrap_or(placeholder))
            .collect()
    }

    /// True once the budget has dropped below 1; never for unbudgeted rounds
    pub fn is_lost(&self) -> bool {
        self.wrong_guesses_left.is_some_and(|left| left < 1)
    }

    /// True when every letter of the word has been guessed
    pub fn is_won(&self) -> bool {
        self.secret_word.chars().all(|c| self.is_guessed(c))
    }

    pub fn is_guessed(&self, c: char) -> bool {
        canonical_letter(c).is_some_and(|c| self.guessed[letter_index(c)])
    }

    /// Guessed letters in alphabet order
    pub fn guessed_letters(&self) -> Vec<char> {
        ALPHABET.chars().filter(|&c| self.is_guessed(c)).collect()
    }

    /// Guessed letters that are not in the word, in alphabet order
    pub fn wrong_guesses(&self) -> Vec<char> {
        ALPHABET
            .chars()
            .filter(|&c| self.is_guessed(c) && !self.secret_word.contains(c))
            .collect()
    }
}
