use std::time::{Duration, Instant};

use crate::engine::compare::{self, SpellingCheck, WordHint};
use crate::session::phase::DrillPhase;
use crate::session::timer::AutoAdvance;

/// Spelling drill for a single missed word.
pub struct WordDrill {
    pub word: String,
    pub input: String,
    pub phase: DrillPhase,
    pub attempts: u32,
    /// Hint from the most recent failed check. Kept while retyping.
    pub hint: Option<WordHint>,
}

impl WordDrill {
    pub fn new(word: &str) -> Self {
        Self {
            word: word.to_string(),
            input: String::new(),
            phase: DrillPhase::AwaitingInput,
            attempts: 0,
            hint: None,
        }
    }

    pub fn type_char(&mut self, ch: char) {
        match self.phase {
            DrillPhase::AwaitingInput => self.input.push(ch),
            DrillPhase::Checked { correct: false } => {
                self.retry();
                self.input.push(ch);
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        if self.phase == DrillPhase::AwaitingInput {
            self.input.pop();
        }
    }

    /// Start a fresh attempt after a failed check.
    pub fn retry(&mut self) {
        if self.phase == (DrillPhase::Checked { correct: false }) {
            self.input.clear();
            self.phase = DrillPhase::AwaitingInput;
        }
    }

    pub fn check(&mut self, now: Instant, advance_delay: Duration) -> SpellingCheck {
        self.attempts += 1;
        let result = compare::check_spelling(&self.word, &self.input);
        match result {
            SpellingCheck::Correct => {
                self.phase = DrillPhase::AdvancingDelay(AutoAdvance::schedule(now, advance_delay));
            }
            SpellingCheck::Incorrect { confirmed_prefix } => {
                self.phase = DrillPhase::Checked { correct: false };
                self.hint = Some(WordHint::new(&self.word, confirmed_prefix));
            }
        }
        result
    }

    pub fn solved_first_try(&self) -> bool {
        self.attempts == 1 && !matches!(self.phase, DrillPhase::Checked { correct: false })
    }

    /// 1-based position of the first wrong letter in the last failed attempt.
    pub fn wrong_letter(&self) -> Option<usize> {
        if self.phase != (DrillPhase::Checked { correct: false }) {
            return None;
        }
        let typed = self.input.trim().to_lowercase();
        let target = self.word.trim().to_lowercase();
        let shared = typed.chars().count().min(target.chars().count());
        let confirmed = compare::confirmed_prefix_len(&target, &typed);
        (confirmed < shared).then_some(confirmed + 1)
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_finished()
    }
}
