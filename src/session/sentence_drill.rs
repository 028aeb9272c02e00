use std::time::{Duration, Instant};

use crate::engine::compare::{self, SentenceCheck};
use crate::session::phase::DrillPhase;
use crate::session::timer::AutoAdvance;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotStatus {
    Pending,
    Correct,
    Incorrect,
}

/// Dictation of one sentence, typed into one slot per target word.
pub struct SentenceDrill {
    pub target: String,
    pub words: Vec<String>,
    pub slots: Vec<String>,
    pub current: usize,
    pub phase: DrillPhase,
    /// A pronunciation hint was shown during this attempt.
    pub assisted: bool,
    pub last_check: Option<SentenceCheck>,
}

impl SentenceDrill {
    pub fn new(target: &str) -> Self {
        let words: Vec<String> = compare::split_words(target)
            .into_iter()
            .map(str::to_string)
            .collect();
        Self {
            target: target.to_string(),
            slots: vec![String::new(); words.len()],
            words,
            current: 0,
            phase: DrillPhase::AwaitingInput,
            assisted: false,
            last_check: None,
        }
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.current).map(String::as_str)
    }

    pub fn type_char(&mut self, ch: char) {
        if !self.phase.accepts_input() || self.slots.is_empty() {
            return;
        }
        if ch.is_whitespace() {
            // Ignored on an empty slot, so a space after an auto-jump does not skip a word.
            if self.slots[self.current].is_empty() {
                return;
            }
            let trimmed = self.slots[self.current].trim().to_string();
            self.slots[self.current] = trimmed;
            if let Some(next) = self.next_open_slot() {
                self.current = next;
            }
            return;
        }

        self.slots[self.current].push(ch);

        // Filling a slot to the target length moves on, single letters excepted.
        let typed = self.slots[self.current].chars().count();
        let expected = self.words[self.current].chars().count();
        if typed >= expected
            && typed > 1
            && let Some(next) = self.next_open_slot()
        {
            self.current = next;
        }
    }

    /// First empty slot after the cursor. Slots kept from a previous attempt are skipped.
    fn next_open_slot(&self) -> Option<usize> {
        (self.current + 1..self.slots.len()).find(|&i| self.slots[i].is_empty())
    }

    pub fn backspace(&mut self) {
        if !self.phase.accepts_input() || self.slots.is_empty() {
            return;
        }
        if self.slots[self.current].is_empty() {
            if self.current > 0 {
                self.current -= 1;
            }
        } else {
            self.slots[self.current].pop();
        }
    }

    pub fn mark_assisted(&mut self) {
        self.assisted = true;
    }

    /// Compare the slots against the target.
    ///
    /// A fully correct attempt schedules the auto-advance. Otherwise the wrong
    /// slots are cleared, the cursor jumps to the first of them, and a new
    /// attempt begins.
    pub fn check(&mut self, now: Instant, advance_delay: Duration) -> SentenceCheck {
        let check = compare::check_sentence(&self.target, &self.slots);

        if check.all_correct {
            self.phase = DrillPhase::AdvancingDelay(AutoAdvance::schedule(now, advance_delay));
        } else {
            self.phase = DrillPhase::Checked { correct: false };
            for err in &check.errors {
                if let Some(slot) = self.slots.get_mut(err.index) {
                    slot.clear();
                }
            }
            if let Some(first) = check.errors.iter().map(|e| e.index).min() {
                self.current = first.min(self.slots.len().saturating_sub(1));
            }
        }

        self.last_check = Some(check.clone());
        check
    }

    /// Flag for the attempt that was just checked; resets for the next one.
    pub fn take_assisted(&mut self) -> bool {
        std::mem::take(&mut self.assisted)
    }

    pub fn slot_status(&self, index: usize) -> SlotStatus {
        let (Some(slot), Some(word)) = (self.slots.get(index), self.words.get(index)) else {
            return SlotStatus::Pending;
        };
        if compare::words_match(slot.trim(), word) {
            SlotStatus::Correct
        } else if self.last_check.is_some() {
            SlotStatus::Incorrect
        } else {
            SlotStatus::Pending
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn progress(&self) -> f64 {
        if self.words.is_empty() {
            return 0.0;
        }
        let filled = (0..self.words.len())
            .filter(|&i| self.slot_status(i) == SlotStatus::Correct)
            .count();
        filled as f64 / self.words.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(drill: &mut SentenceDrill, text: &str) {
        for ch in text.chars() {
            drill.type_char(ch);
        }
    }

    const DELAY: Duration = Duration::from_secs(4);

    #[test]
    fn test_new_drill_has_one_slot_per_word() {
        let drill = SentenceDrill::new("A bird is flying");
        assert_eq!(drill.slots.len(), 4);
        assert_eq!(drill.current, 0);
        assert_eq!(drill.current_word(), Some("A"));
        assert_eq!(drill.progress(), 0.0);
    }

    #[test]
    fn test_space_moves_to_next_slot() {
        let mut drill = SentenceDrill::new("A bird is flying");
        type_str(&mut drill, "a ");
        assert_eq!(drill.current, 1);
        assert_eq!(drill.slots[0], "a");
    }

    #[test]
    fn test_full_length_word_auto_jumps() {
        let mut drill = SentenceDrill::new("A bird is flying");
        type_str(&mut drill, "a bird");
        assert_eq!(drill.current, 2);
        // A space right after an auto-jump is swallowed.
        drill.type_char(' ');
        assert_eq!(drill.current, 2);
        type_str(&mut drill, "is");
        assert_eq!(drill.current, 3);
        type_str(&mut drill, "flying");
        assert_eq!(drill.current, 3);
        assert_eq!(drill.slots, vec!["a", "bird", "is", "flying"]);
    }

    #[test]
    fn test_backspace_on_empty_slot_moves_back() {
        let mut drill = SentenceDrill::new("Go out");
        type_str(&mut drill, "go");
        assert_eq!(drill.current, 1);
        drill.backspace();
        assert_eq!(drill.current, 0);
        drill.backspace();
        assert_eq!(drill.slots[0], "g");
        drill.backspace();
        drill.backspace();
        assert_eq!(drill.current, 0);
        assert!(drill.slots[0].is_empty());
    }

    #[test]
    fn test_correct_check_schedules_advance() {
        let t0 = Instant::now();
        let mut drill = SentenceDrill::new("Go out");
        type_str(&mut drill, "go out");
        let check = drill.check(t0, DELAY);
        assert!(check.all_correct);
        assert!(drill.phase.is_advancing());

        // Input is frozen while advancing.
        drill.type_char('x');
        assert_eq!(drill.slots, vec!["go", "out"]);

        assert!(!drill.phase.tick(t0 + Duration::from_secs(1)));
        assert!(drill.phase.tick(t0 + DELAY));
        assert!(drill.is_complete());
    }

    #[test]
    fn test_failed_check_clears_wrong_slots() {
        let t0 = Instant::now();
        let mut drill = SentenceDrill::new("A bird is flying");
        type_str(&mut drill, "A brid is fly");
        assert_eq!(drill.slots, vec!["A", "brid", "is", "fly"]);

        let check = drill.check(t0, DELAY);
        assert!(!check.all_correct);
        assert_eq!(drill.phase, DrillPhase::Checked { correct: false });
        assert_eq!(drill.slots, vec!["A", "", "is", ""]);
        assert_eq!(drill.current, 1);
        assert_eq!(drill.slot_status(0), SlotStatus::Correct);
        assert_eq!(drill.slot_status(1), SlotStatus::Incorrect);
        assert_eq!(drill.progress(), 0.5);
    }

    #[test]
    fn test_retry_after_failure() {
        let t0 = Instant::now();
        let mut drill = SentenceDrill::new("Go out");
        drill.slots = vec!["go".into(), "uot".into()];
        drill.check(t0, DELAY);
        assert_eq!(drill.current, 1);
        type_str(&mut drill, "out");
        assert!(drill.check(t0, DELAY).all_correct);
    }

    #[test]
    fn test_assisted_flag_is_per_attempt() {
        let t0 = Instant::now();
        let mut drill = SentenceDrill::new("Go out");
        drill.mark_assisted();
        drill.check(t0, DELAY);
        assert!(drill.take_assisted());
        assert!(!drill.take_assisted());
    }
}
