use std::collections::BTreeSet;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Review intervals in days, indexed by `level`.
pub const REVIEW_LADDER_DAYS: [i64; 7] = [1, 3, 7, 14, 30, 60, 90];
pub const MAX_LEVEL: usize = REVIEW_LADDER_DAYS.len() - 1;

/// Practice statistics and scheduling state for one word or sentence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProgress {
    #[serde(alias = "word", alias = "sentence")]
    pub key: String,
    pub correct_count: u32,
    pub incorrect_count: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_practiced: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_review: DateTime<Utc>,
    pub level: usize,
    #[serde(default)]
    pub in_review: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceProgress {
    #[serde(flatten)]
    pub item: ItemProgress,
    /// Words missed since the last successful attempt.
    #[serde(default)]
    pub word_errors: BTreeSet<String>,
}

pub fn interval_for(level: usize) -> Duration {
    Duration::days(REVIEW_LADDER_DAYS[level.min(MAX_LEVEL)])
}

/// Progress timestamps are persisted as epoch milliseconds, so they are
/// truncated to that precision before being recorded.
pub fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(3)
}

pub fn init_word_progress(word: &str, now: DateTime<Utc>) -> ItemProgress {
    let now = truncate_to_millis(now);
    ItemProgress {
        key: word.to_string(),
        correct_count: 0,
        incorrect_count: 0,
        last_practiced: now,
        next_review: now,
        level: 0,
        in_review: false,
    }
}

pub fn init_sentence_progress(sentence: &str, now: DateTime<Utc>) -> SentenceProgress {
    SentenceProgress {
        item: init_word_progress(sentence, now),
        word_errors: BTreeSet::new(),
    }
}

/// Apply one practice result. `in_review` passes through untouched.
pub fn update_word_progress(
    progress: &ItemProgress,
    is_correct: bool,
    now: DateTime<Utc>,
) -> ItemProgress {
    let now = truncate_to_millis(now);
    let mut next = progress.clone();
    let level = next.level.min(MAX_LEVEL);

    if is_correct {
        next.correct_count = next.correct_count.saturating_add(1);
        next.level = (level + 1).min(MAX_LEVEL);
    } else {
        next.incorrect_count = next.incorrect_count.saturating_add(1);
        next.level = level.saturating_sub(1);
    }

    next.last_practiced = now;
    next.next_review = now + interval_for(next.level);
    next
}

pub fn update_sentence_progress(
    progress: &SentenceProgress,
    is_correct: bool,
    error_words: &[String],
    now: DateTime<Utc>,
) -> SentenceProgress {
    let item = update_word_progress(&progress.item, is_correct, now);
    let word_errors = if is_correct {
        BTreeSet::new()
    } else {
        progress
            .word_errors
            .iter()
            .chain(error_words.iter())
            .cloned()
            .collect()
    };
    SentenceProgress { item, word_errors }
}
