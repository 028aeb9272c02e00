use std::fmt;

/// One mismatched slot in a sentence attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordError {
    pub index: usize,
    pub submitted: String,
    pub correct: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentenceCheck {
    pub all_correct: bool,
    pub errors: Vec<WordError>,
}

impl SentenceCheck {
    /// Target words that were missed, deduplicated case-insensitively, first occurrence wins.
    pub fn missed_words(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        let mut out = Vec::new();
        for err in &self.errors {
            if err.correct.is_empty() {
                continue;
            }
            let folded = err.correct.to_lowercase();
            if !seen.contains(&folded) {
                seen.push(folded);
                out.push(err.correct.clone());
            }
        }
        out
    }
}

pub fn split_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

pub fn words_match(submitted: &str, correct: &str) -> bool {
    !submitted.is_empty() && submitted.to_lowercase() == correct.to_lowercase()
}

/// Compare per-word input slots against a target sentence.
///
/// Slots line up with the whitespace-separated target words. A missing or
/// empty slot is an error with an empty `submitted`; surplus non-empty slots
/// are errors with an empty `correct`.
pub fn check_sentence<S: AsRef<str>>(target: &str, slots: &[S]) -> SentenceCheck {
    let words = split_words(target);
    let mut errors = Vec::new();

    for index in 0..words.len().max(slots.len()) {
        let submitted = slots.get(index).map(|s| s.as_ref().trim()).unwrap_or("");
        match words.get(index) {
            Some(correct) => {
                if !words_match(submitted, correct) {
                    errors.push(WordError {
                        index,
                        submitted: submitted.to_string(),
                        correct: correct.to_string(),
                    });
                }
            }
            None if !submitted.is_empty() => errors.push(WordError {
                index,
                submitted: submitted.to_string(),
                correct: String::new(),
            }),
            None => {}
        }
    }

    SentenceCheck {
        all_correct: errors.is_empty(),
        errors,
    }
}

/// First character-level divergence between a submitted word and the correct one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CharHint {
    /// 1-based position of the first differing character.
    WrongChar {
        position: usize,
        expected: char,
        got: char,
    },
    MissingSuffix(String),
    ExtraSuffix(String),
    /// Only produced when both words are identical.
    Spelling,
}

impl fmt::Display for CharHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharHint::WrongChar {
                position,
                expected,
                got,
            } => write!(f, "letter {position} should be '{expected}', not '{got}'"),
            CharHint::MissingSuffix(rest) => write!(f, "missing letters \"{rest}\""),
            CharHint::ExtraSuffix(rest) => write!(f, "extra letters \"{rest}\""),
            CharHint::Spelling => write!(f, "spelling error"),
        }
    }
}

pub fn char_hint(submitted: &str, correct: &str) -> CharHint {
    let sub: Vec<char> = submitted.chars().collect();
    let cor: Vec<char> = correct.chars().collect();

    for i in 0..sub.len().max(cor.len()) {
        match (sub.get(i), cor.get(i)) {
            (None, Some(_)) => return CharHint::MissingSuffix(cor[i..].iter().collect()),
            (Some(_), None) => return CharHint::ExtraSuffix(sub[i..].iter().collect()),
            (Some(&got), Some(&expected)) if got != expected => {
                return CharHint::WrongChar {
                    position: i + 1,
                    expected,
                    got,
                };
            }
            _ => {}
        }
    }

    CharHint::Spelling
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpellingCheck {
    Correct,
    Incorrect { confirmed_prefix: usize },
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Length, in chars of `target`, of the longest case-insensitive prefix of
/// `submitted` matching `target`. Case is folded one char at a time so the
/// count never exceeds the target's length.
pub fn confirmed_prefix_len(target: &str, submitted: &str) -> usize {
    target
        .trim()
        .chars()
        .zip(submitted.trim().chars())
        .take_while(|(t, s)| t.to_lowercase().eq(s.to_lowercase()))
        .count()
}

pub fn check_spelling(target: &str, submitted: &str) -> SpellingCheck {
    if normalize(target) == normalize(submitted) {
        SpellingCheck::Correct
    } else {
        SpellingCheck::Incorrect {
            confirmed_prefix: confirmed_prefix_len(target, submitted),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintCell {
    Confirmed(char),
    Next(char),
    Revealed(char),
    Masked,
}

/// Progressive spelling hint for the word drill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordHint {
    chars: Vec<char>,
    pub confirmed: usize,
    pub level: usize,
}

impl WordHint {
    pub const PLACEHOLDER: char = '_';

    pub fn new(target: &str, confirmed: usize) -> Self {
        let chars: Vec<char> = target.chars().collect();
        let level = confirmed.min(chars.len().saturating_sub(1));
        Self {
            chars,
            confirmed,
            level,
        }
    }

    pub fn cells(&self) -> Vec<HintCell> {
        self.chars
            .iter()
            .enumerate()
            .map(|(i, &ch)| {
                if i < self.confirmed {
                    HintCell::Confirmed(ch)
                } else if i == self.confirmed {
                    HintCell::Next(ch)
                } else if i <= self.level {
                    HintCell::Revealed(ch)
                } else {
                    HintCell::Masked
                }
            })
            .collect()
    }

    pub fn masked_text(&self) -> String {
        self.cells()
            .into_iter()
            .map(|cell| match cell {
                HintCell::Confirmed(c) | HintCell::Next(c) | HintCell::Revealed(c) => c,
                HintCell::Masked => Self::PLACEHOLDER,
            })
            .collect()
    }

    pub fn word_len(&self) -> usize {
        self.chars.len()
    }

    pub fn reveals_translation(&self) -> bool {
        self.level >= self.chars.len() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_all_correct() {
        let check = check_sentence("A bird is flying", &["A", "bird", "is", "flying"]);
        assert!(check.all_correct);
        assert!(check.errors.is_empty());
    }

    #[test]
    fn test_sentence_is_case_insensitive() {
        let check = check_sentence("A bird is flying", &["a", "BIRD", "Is", "flying"]);
        assert!(check.all_correct);
    }

    #[test]
    fn test_sentence_reports_mismatched_slots() {
        let check = check_sentence("A bird is flying", &["A", "brid", "is", "fly"]);
        assert!(!check.all_correct);
        assert_eq!(
            check.errors,
            vec![
                WordError {
                    index: 1,
                    submitted: "brid".to_string(),
                    correct: "bird".to_string(),
                },
                WordError {
                    index: 3,
                    submitted: "fly".to_string(),
                    correct: "flying".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_sentence_empty_and_missing_slots() {
        let check = check_sentence("Her hair is long", &["Her", ""]);
        let indexes: Vec<usize> = check.errors.iter().map(|e| e.index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
        assert!(check.errors.iter().all(|e| e.submitted.is_empty()));
    }

    #[test]
    fn test_sentence_surplus_slot() {
        let check = check_sentence("Go out", &["Go", "out", "now"]);
        assert_eq!(check.errors.len(), 1);
        assert_eq!(check.errors[0].index, 2);
        assert_eq!(check.errors[0].correct, "");
    }

    #[test]
    fn test_missed_words_dedup() {
        let check = check_sentence("The bird and the sky", &["a", "bird", "and", "da", "sky"]);
        assert_eq!(check.missed_words(), vec!["The".to_string()]);
    }

    #[test]
    fn test_char_hint_first_divergence() {
        assert_eq!(
            char_hint("brid", "bird"),
            CharHint::WrongChar {
                position: 2,
                expected: 'i',
                got: 'r'
            }
        );
    }

    #[test]
    fn test_char_hint_missing_and_extra_suffix() {
        assert_eq!(
            char_hint("fly", "flying"),
            CharHint::MissingSuffix("ing".to_string())
        );
        assert_eq!(
            char_hint("birds", "bird"),
            CharHint::ExtraSuffix("s".to_string())
        );
        assert_eq!(char_hint("", "sky"), CharHint::MissingSuffix("sky".to_string()));
    }

    #[test]
    fn test_char_hint_is_case_sensitive() {
        assert_eq!(
            char_hint("Bird", "bird"),
            CharHint::WrongChar {
                position: 1,
                expected: 'b',
                got: 'B'
            }
        );
    }

    /// Every pair over a small alphabet: the fallback appears exactly when the words are equal.
    #[test]
    fn test_char_hint_fallback_only_for_identical_words() {
        let alphabet = ['a', 'b'];
        let mut words = vec![String::new()];
        for len in 1..=3 {
            let mut next = Vec::new();
            for w in words.iter().filter(|w| w.chars().count() == len - 1) {
                for &c in &alphabet {
                    next.push(format!("{w}{c}"));
                }
            }
            words.extend(next);
        }

        for submitted in &words {
            for correct in &words {
                let hint = char_hint(submitted, correct);
                assert_eq!(
                    hint == CharHint::Spelling,
                    submitted == correct,
                    "submitted={submitted:?} correct={correct:?} hint={hint:?}"
                );
            }
        }
    }

    #[test]
    fn test_char_hint_display() {
        assert_eq!(
            char_hint("brid", "bird").to_string(),
            "letter 2 should be 'i', not 'r'"
        );
        assert_eq!(
            char_hint("fly", "flying").to_string(),
            "missing letters \"ing\""
        );
    }

    #[test]
    fn test_spelling_check() {
        assert_eq!(check_spelling("bird", "  Bird "), SpellingCheck::Correct);
        assert_eq!(
            check_spelling("beautiful", "beauty"),
            SpellingCheck::Incorrect {
                confirmed_prefix: 5
            }
        );
        assert_eq!(
            check_spelling("sky", "xky"),
            SpellingCheck::Incorrect {
                confirmed_prefix: 0
            }
        );
    }

    #[test]
    fn test_confirmed_prefix_counts_target_chars() {
        // 'İ' lowercases to two chars.
        assert_eq!(
            check_spelling("İstanbul", "İstanbol"),
            SpellingCheck::Incorrect {
                confirmed_prefix: 6
            }
        );
        assert_eq!(confirmed_prefix_len("İstanbul", "İstanbulx"), 8);
        assert_eq!(confirmed_prefix_len("İstanbul", "istanbul"), 0);
        for submitted in ["İstanbul", "İSTANBUL", "İstanbul!!", "i̇stanbul"] {
            assert!(confirmed_prefix_len("İstanbul", submitted) <= "İstanbul".chars().count());
        }
    }

    #[test]
    fn test_word_hint_cells() {
        let hint = WordHint::new("beautiful", 5);
        assert_eq!(hint.level, 5);
        assert_eq!(hint.masked_text(), "beauti___");
        let cells = hint.cells();
        assert_eq!(cells[4], HintCell::Confirmed('t'));
        assert_eq!(cells[5], HintCell::Next('i'));
        assert_eq!(cells[6], HintCell::Masked);
        assert!(hint.reveals_translation());
    }

    #[test]
    fn test_word_hint_nothing_confirmed() {
        let hint = WordHint::new("bird", 0);
        assert_eq!(hint.masked_text(), "b___");
        assert!(!hint.reveals_translation());
    }

    #[test]
    fn test_word_hint_level_capped_below_length() {
        // A full-length prefix can still mismatch on trailing input.
        let hint = WordHint::new("sky", 3);
        assert_eq!(hint.level, 2);
        assert_eq!(hint.masked_text(), "sky");
        assert!(hint.reveals_translation());
    }
}
