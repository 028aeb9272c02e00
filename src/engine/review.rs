use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;

use crate::engine::schedule::{ItemProgress, SentenceProgress, truncate_to_millis};

/// How far a "review later" pushes every due item.
pub const DEFER_OFFSET_MINUTES: i64 = 60;

/// Anything carrying review scheduling state.
pub trait Scheduled {
    fn progress(&self) -> &ItemProgress;
    fn progress_mut(&mut self) -> &mut ItemProgress;

    fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.progress().next_review <= now
    }
}

impl Scheduled for ItemProgress {
    fn progress(&self) -> &ItemProgress {
        self
    }

    fn progress_mut(&mut self) -> &mut ItemProgress {
        self
    }
}

impl Scheduled for SentenceProgress {
    fn progress(&self) -> &ItemProgress {
        &self.item
    }

    fn progress_mut(&mut self) -> &mut ItemProgress {
        &mut self.item
    }
}

/// Entries whose `next_review` has passed, in map insertion order.
pub fn due_items<T: Scheduled>(items: &IndexMap<String, T>, now: DateTime<Utc>) -> Vec<&T> {
    items.values().filter(|item| item.is_due(now)).collect()
}

/// Push every due entry to `now + offset`. Levels and non-due entries are left alone.
/// Returns the updated map and how many entries moved.
pub fn defer_due<T: Scheduled>(
    mut items: IndexMap<String, T>,
    now: DateTime<Utc>,
    offset: Duration,
) -> (IndexMap<String, T>, usize) {
    let mut moved = 0;
    for item in items.values_mut() {
        if item.is_due(now) {
            item.progress_mut().next_review = truncate_to_millis(now + offset);
            moved += 1;
        }
    }
    (items, moved)
}

/// Banner summary of everything currently due.
#[derive(Clone, Debug, Default)]
pub struct ReviewQueue {
    pub words: Vec<ItemProgress>,
    pub sentences: Vec<ItemProgress>,
}

impl ReviewQueue {
    pub fn collect(
        words: &IndexMap<String, ItemProgress>,
        sentences: &IndexMap<String, SentenceProgress>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            words: due_items(words, now).into_iter().cloned().collect(),
            sentences: due_items(sentences, now)
                .into_iter()
                .map(|s| s.item.clone())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.sentences.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len() + self.sentences.len()
    }

    /// Items to show in the banner, words first, respecting per-kind limits.
    pub fn visible(&self, word_limit: usize, sentence_limit: usize) -> Vec<ReviewEntry<'_>> {
        self.words
            .iter()
            .take(word_limit)
            .map(ReviewEntry::Word)
            .chain(
                self.sentences
                    .iter()
                    .take(sentence_limit)
                    .map(ReviewEntry::Sentence),
            )
            .collect()
    }

    /// (hidden words, hidden sentences) beyond the banner limits.
    pub fn overflow(&self, word_limit: usize, sentence_limit: usize) -> (usize, usize) {
        (
            self.words.len().saturating_sub(word_limit),
            self.sentences.len().saturating_sub(sentence_limit),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewEntry<'a> {
    Word(&'a ItemProgress),
    Sentence(&'a ItemProgress),
}

impl ReviewEntry<'_> {
    pub fn key(&self) -> &str {
        match self {
            ReviewEntry::Word(p) | ReviewEntry::Sentence(p) => &p.key,
        }
    }

    pub fn last_practiced(&self) -> DateTime<Utc> {
        match self {
            ReviewEntry::Word(p) | ReviewEntry::Sentence(p) => p.last_practiced,
        }
    }
}
