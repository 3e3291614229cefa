//! Round session
//!
//! Drives rounds of [`HangmanGame`] back to back: picks words, keeps score,
//! forwards wrong guesses to the ragdoll and schedules the next round. A win
//! starts the next round at once; a loss tears the ragdoll down, locks the
//! keyboard and waits `loss_reset_delay_ms` so the loss can play out.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GuessError, GuessOutcome, HangmanGame, parse_letter};
use crate::consts::ALPHABET;
use crate::settings::Settings;
use crate::words::WordList;

/// What the session needs from the ragdoll
pub trait RevealSequence {
    /// Show one more stage (no-op once fully revealed)
    fn reveal_next(&mut self);
    fn is_fully_revealed(&self) -> bool;
    /// Remove the whole figure (loss)
    fn tear_down(&mut self);
    /// Back to the first stage for a new round
    fn restart(&mut self);
}

/// Wins and losses for the session; never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub wins: u32,
    pub losses: u32,
}

/// Result of feeding a guess into the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Hit,
    Miss,
    /// Letter was already used this round
    Repeat,
    /// Round won; the next round has already started
    Won { word: String },
    /// Round lost; the next round starts after the loss delay
    Lost { word: String },
    /// Between a loss and the next round
    Ignored,
}

pub struct Session {
    words: WordList,
    rng: Pcg32,
    budget: Option<u8>,
    loss_reset_delay_ms: f64,
    game: HangmanGame,
    score: Score,
    rounds: u32,
    /// Time (ms) at which the next round starts after a loss
    pending_reset: Option<f64>,
}

impl Session {
    pub fn new(words: WordList, settings: &Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let game = HangmanGame::new(words.pick(&mut rng), settings.wrong_guess_budget);
        log::info!("Round 1 started ({} letters)", game.secret_word().len());
        Self {
            words,
            rng,
            budget: settings.wrong_guess_budget,
            loss_reset_delay_ms: settings.loss_reset_delay_ms,
            game,
            score: Score::default(),
            rounds: 1,
            pending_reset: None,
        }
    }

    pub fn game(&self) -> &HangmanGame {
        &self.game
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn round(&self) -> u32 {
        self.rounds
    }

    pub fn pending_reset(&self) -> Option<f64> {
        self.pending_reset
    }

    /// Feed one key press. Invalid input fails without touching anything.
    pub fn guess<R: RevealSequence + ?Sized>(
        &mut self,
        input: &str,
        now_ms: f64,
        ragdoll: &mut R,
    ) -> Result<SessionEvent, GuessError> {
        let letter = parse_letter(input)?;
        if self.pending_reset.is_some() {
            log::warn!("Ignoring guess {:?} while the next round is pending", letter);
            return Ok(SessionEvent::Ignored);
        }

        let outcome = self.game.guess_char(letter)?;
        let event = match outcome {
            GuessOutcome::Hit if self.game.phase() == GamePhase::Won => {
                self.score.wins += 1;
                let word = self.game.secret_word().to_string();
                log::info!("Round {} won: {}", self.rounds, word);
                self.start_round(ragdoll);
                SessionEvent::Won { word }
            }
            GuessOutcome::Hit => SessionEvent::Hit,
            GuessOutcome::Miss => {
                ragdoll.reveal_next();
                if self.budget.is_none() && ragdoll.is_fully_revealed() {
                    self.game.mark_lost();
                }
                if self.game.phase() == GamePhase::Lost {
                    self.score.losses += 1;
                    let word = self.game.secret_word().to_string();
                    log::info!("Round {} lost: {}", self.rounds, word);
                    ragdoll.tear_down();
                    self.pending_reset = Some(now_ms + self.loss_reset_delay_ms);
                    SessionEvent::Lost { word }
                } else {
                    SessionEvent::Miss
                }
            }
            GuessOutcome::Repeat => SessionEvent::Repeat,
            GuessOutcome::RoundOver => SessionEvent::Ignored,
        };
        Ok(event)
    }

    /// Start the next round once the loss delay has passed. Returns true if
    /// a new round started.
    pub fn update<R: RevealSequence + ?Sized>(&mut self, now_ms: f64, ragdoll: &mut R) -> bool {
        match self.pending_reset {
            Some(at) if now_ms >= at => {
                self.start_round(ragdoll);
                true
            }
            _ => false,
        }
    }

    fn start_round<R: RevealSequence + ?Sized>(&mut self, ragdoll: &mut R) {
        let word = self.words.pick(&mut self.rng).to_string();
        self.game = HangmanGame::new(word, self.budget);
        self.pending_reset = None;
        self.rounds += 1;
        ragdoll.restart();
        log::info!(
            "Round {} started ({} letters)",
            self.rounds,
            self.game.secret_word().len()
        );
    }

    /// Per position: the letter if shown. The whole word is shown while a
    /// loss is pending.
    pub fn word_status(&self) -> Vec<Option<char>> {
        if self.pending_reset.is_some() {
            self.game.reveal_all()
        } else {
            self.game.current_word_status()
        }
    }

    /// Every letter with whether its key is disabled
    pub fn keyboard(&self) -> Vec<(char, bool)> {
        let locked = self.pending_reset.is_some();
        ALPHABET
            .chars()
            .map(|c| (c, locked || self.game.is_guessed(c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stage counter standing in for the physics ragdoll
    #[derive(Debug, Default)]
    struct Stages {
        index: Option<usize>,
        last: usize,
        torn_down: u32,
        restarts: u32,
    }

    impl Stages {
        fn new(count: usize) -> Self {
            Self {
                index: Some(0),
                last: count - 1,
                ..Self::default()
            }
        }
    }

    impl RevealSequence for Stages {
        fn reveal_next(&mut self) {
            self.index = Some(match self.index {
                None => 0,
                Some(i) => (i + 1).min(self.last),
            });
        }

        fn is_fully_revealed(&self) -> bool {
            self.index == Some(self.last)
        }

        fn tear_down(&mut self) {
            self.index = None;
            self.torn_down += 1;
        }

        fn restart(&mut self) {
            self.index = Some(0);
            self.restarts += 1;
        }
    }

    fn cat_session(settings: Settings) -> Session {
        Session::new(WordList::new(["cat"]).unwrap(), &settings, 1)
    }

    fn masked(session: &Session) -> String {
        session
            .word_status()
            .into_iter()
            .map(|c| c.unwrap_or('_'))
            .collect()
    }

    #[test]
    fn test_cat_round_budgeted() {
        let mut session = cat_session(Settings::budgeted());
        let mut stages = Stages::new(11);

        assert_eq!(session.guess("c", 0.0, &mut stages), Ok(SessionEvent::Hit));
        assert_eq!(masked(&session), "c__");
        assert_eq!(session.guess("a", 0.0, &mut stages), Ok(SessionEvent::Hit));
        assert_eq!(masked(&session), "ca_");
        assert_eq!(session.guess("x", 0.0, &mut stages), Ok(SessionEvent::Miss));
        assert_eq!(masked(&session), "ca_");
        assert_eq!(session.game().wrong_guesses_left(), Some(2));
        assert_eq!(stages.index, Some(1));

        assert_eq!(
            session.guess("t", 0.0, &mut stages),
            Ok(SessionEvent::Won {
                word: "cat".to_string()
            })
        );
        assert_eq!(session.score(), Score { wins: 1, losses: 0 });

        // Next round started immediately with a full budget
        assert_eq!(session.round(), 2);
        assert_eq!(session.game().phase(), GamePhase::Playing);
        assert_eq!(session.game().wrong_guesses_left(), Some(3));
        assert_eq!(masked(&session), "___");
        assert_eq!(stages.index, Some(0));
        assert_eq!(stages.restarts, 1);
    }

    #[test]
    fn test_budget_loss_waits_for_delay() {
        let mut session = cat_session(Settings::budgeted());
        let mut stages = Stages::new(11);

        assert_eq!(session.guess("q", 100.0, &mut stages), Ok(SessionEvent::Miss));
        assert_eq!(session.guess("w", 100.0, &mut stages), Ok(SessionEvent::Miss));
        assert_eq!(
            session.guess("e", 100.0, &mut stages),
            Ok(SessionEvent::Lost {
                word: "cat".to_string()
            })
        );
        assert_eq!(session.score(), Score { wins: 0, losses: 1 });
        assert_eq!(stages.torn_down, 1);
        assert_eq!(session.pending_reset(), Some(2100.0));

        // Word revealed, keyboard locked, guesses ignored
        assert_eq!(masked(&session), "cat");
        assert!(session.keyboard().iter().all(|(_, used)| *used));
        assert_eq!(session.guess("c", 500.0, &mut stages), Ok(SessionEvent::Ignored));
        assert_eq!(session.score().wins, 0);

        assert!(!session.update(2099.0, &mut stages));
        assert!(session.update(2100.0, &mut stages));
        assert_eq!(session.round(), 2);
        assert_eq!(session.pending_reset(), None);
        assert_eq!(masked(&session), "___");
        assert!(session.keyboard().iter().all(|(_, used)| !*used));
        assert_eq!(stages.index, Some(0));
        assert!(!session.update(5000.0, &mut stages));
    }

    #[test]
    fn test_unbudgeted_loss_on_final_stage() {
        let mut session = cat_session(Settings::default());
        let mut stages = Stages::new(4);

        for letter in ["q", "w"] {
            assert_eq!(session.guess(letter, 0.0, &mut stages), Ok(SessionEvent::Miss));
        }
        assert_eq!(
            session.guess("e", 0.0, &mut stages),
            Ok(SessionEvent::Lost {
                word: "cat".to_string()
            })
        );
        assert_eq!(session.score().losses, 1);
        assert_eq!(stages.index, None);
    }

    #[test]
    fn test_invalid_input_changes_nothing() {
        let mut session = cat_session(Settings::budgeted());
        let mut stages = Stages::new(11);
        for input in ["5", "ab", ""] {
            assert!(matches!(
                session.guess(input, 0.0, &mut stages),
                Err(GuessError::InvalidInput { .. })
            ));
        }
        assert_eq!(session.score(), Score::default());
        assert!(session.game().guessed_letters().is_empty());
        assert_eq!(stages.index, Some(0));
    }

    #[test]
    fn test_keyboard_marks_used_letters() {
        let mut session = cat_session(Settings::budgeted());
        let mut stages = Stages::new(11);
        session.guess("c", 0.0, &mut stages).unwrap();
        session.guess("z", 0.0, &mut stages).unwrap();
        let used: Vec<char> = session
            .keyboard()
            .into_iter()
            .filter(|(_, used)| *used)
            .map(|(c, _)| c)
            .collect();
        assert_eq!(used, vec!['c', 'z']);
        assert_eq!(session.guess("z", 0.0, &mut stages), Ok(SessionEvent::Repeat));
        assert_eq!(stages.index, Some(1));
    }

    #[test]
    fn test_with_physics_ragdoll() {
        use crate::ragdoll::RagdollSimulation;

        let settings = Settings::default();
        let mut session = Session::new(WordList::new(["cat"]).unwrap(), &settings, 9);
        let mut ragdoll = RagdollSimulation::new(&settings);

        let misses: Vec<char> = "bdefghijklmnopqrsuvwxyz".chars().collect();
        let mut lost_at = None;
        for (i, c) in misses.iter().enumerate() {
            let event = session.guess(&c.to_string(), 0.0, &mut ragdoll).unwrap();
            if matches!(event, SessionEvent::Lost { .. }) {
                lost_at = Some(i + 1);
                break;
            }
        }
        // Ten wrong guesses reveal the ten stages after the anchor
        assert_eq!(lost_at, Some(ragdoll.stage_count() - 1));
        assert!(ragdoll.world().bodies().is_empty());

        assert!(session.update(settings.loss_reset_delay_ms, &mut ragdoll));
        assert_eq!(ragdoll.stage_index(), Some(0));
    }
}
