use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};

use crate::content::catalog::{Advance, Catalog, Cursor, Sentence};
use crate::engine::compare::SentenceCheck;
use crate::engine::review::{self, DEFER_OFFSET_MINUTES, ReviewQueue};
use crate::engine::schedule::{
    init_sentence_progress, init_word_progress, update_sentence_progress, update_word_progress,
};
use crate::store::schema::UserProgress;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Sentence,
    /// Drilling missed words; the front of `pending` is active.
    Word { pending: VecDeque<String> },
}

/// An item pulled from the review banner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Review {
    Sentence(Cursor),
    Word(String),
}

/// Advisory results of a transition, shown as toasts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    PointAwarded { total: u32 },
    UnitComplete { headword: String, translation: String },
    AllComplete,
    WordsToPractice { count: usize },
    ReviewStarted { key: String },
    ReviewFinished,
    Deferred { count: usize },
    ProgressReset,
}

/// Proof that the learner confirmed a reset.
pub struct ResetConfirmed(());

impl ResetConfirmed {
    /// Only an explicit "y" answer to the reset prompt confirms.
    pub fn from_answer(answer: char) -> Option<Self> {
        matches!(answer, 'y' | 'Y').then_some(Self(()))
    }
}

/// Drill session state. Every operation consumes the session and returns its
/// successor, so the caller always holds exactly one current value to persist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub progress: UserProgress,
    pub mode: Mode,
    pub review: Option<Review>,
}

impl Session {
    pub fn new(progress: UserProgress) -> Self {
        Self {
            progress,
            mode: Mode::Sentence,
            review: None,
        }
    }

    /// Sentence being drilled: the reviewed one, else the catalog cursor.
    pub fn active_cursor(&self) -> Cursor {
        match &self.review {
            Some(Review::Sentence(cursor)) => *cursor,
            _ => self.progress.cursor(),
        }
    }

    pub fn current_sentence<'c>(&self, catalog: &'c Catalog) -> Option<&'c Sentence> {
        catalog.sentence(self.active_cursor())
    }

    pub fn is_all_complete(&self, catalog: &Catalog) -> bool {
        self.current_sentence(catalog).is_none()
    }

    pub fn active_word(&self) -> Option<&str> {
        match &self.mode {
            Mode::Word { pending } => pending.front().map(String::as_str),
            Mode::Sentence => None,
        }
    }

    pub fn review_queue(&self, now: DateTime<Utc>) -> ReviewQueue {
        ReviewQueue::collect(&self.progress.words, &self.progress.sentences, now)
    }

    /// Record a checked sentence attempt.
    ///
    /// `assisted` marks an attempt that used the pronunciation hint; it still
    /// advances but earns no point.
    pub fn record_sentence(
        mut self,
        catalog: &Catalog,
        check: &SentenceCheck,
        assisted: bool,
        now: DateTime<Utc>,
    ) -> (Self, Vec<Notice>) {
        let cursor = self.active_cursor();
        let Some(sentence) = catalog.sentence(cursor) else {
            return (self, vec![Notice::AllComplete]);
        };

        let missed = check.missed_words();
        let key = self
            .progress
            .sentence_key(&sentence.english)
            .unwrap_or(&sentence.english)
            .to_string();
        let entry = self
            .progress
            .sentences
            .get(&key)
            .cloned()
            .unwrap_or_else(|| init_sentence_progress(&key, now));
        let updated = update_sentence_progress(&entry, check.all_correct, &missed, now);
        self.progress.sentences.insert(key, updated);

        let mut notices = Vec::new();

        if !check.all_correct {
            if !missed.is_empty() {
                notices.push(Notice::WordsToPractice {
                    count: missed.len(),
                });
                self.mode = Mode::Word {
                    pending: missed.into(),
                };
            }
            return (self, notices);
        }

        if !assisted {
            self.progress.points = self.progress.points.saturating_add(1);
            notices.push(Notice::PointAwarded {
                total: self.progress.points,
            });
        }

        if matches!(self.review, Some(Review::Sentence(_))) {
            self.review = None;
            notices.push(Notice::ReviewFinished);
            return (self, notices);
        }

        match catalog.advance(cursor) {
            Advance::Step(next) => self.progress.set_cursor(next),
            Advance::NextUnit(next) => {
                self.progress.set_cursor(next);
                if let Some(unit) = catalog.unit(next.unit) {
                    notices.push(Notice::UnitComplete {
                        headword: unit.headword.clone(),
                        translation: unit.translation.clone(),
                    });
                }
            }
            Advance::AllComplete => notices.push(Notice::AllComplete),
        }
        (self, notices)
    }

    /// Record the outcome of a word drill. Only a first-try solve counts as correct.
    pub fn record_word(mut self, word: &str, first_try: bool, now: DateTime<Utc>) -> (Self, Vec<Notice>) {
        let key = self
            .progress
            .word_key(word)
            .unwrap_or(word)
            .to_string();
        let entry = self
            .progress
            .words
            .get(&key)
            .cloned()
            .unwrap_or_else(|| init_word_progress(&key, now));
        let updated = update_word_progress(&entry, first_try, now);
        self.progress.words.insert(key, updated);

        let mut notices = Vec::new();
        if let Mode::Word { pending } = &mut self.mode {
            pending.retain(|w| !w.eq_ignore_ascii_case(word));
            if pending.is_empty() {
                self.mode = Mode::Sentence;
            }
        }
        if self.mode == Mode::Sentence && matches!(self.review, Some(Review::Word(_))) {
            self.review = None;
            notices.push(Notice::ReviewFinished);
        }
        (self, notices)
    }

    /// Pull a due word out of the banner and drill it.
    pub fn start_word_review(mut self, word: &str, now: DateTime<Utc>) -> (Self, Vec<Notice>) {
        let key = self
            .progress
            .word_key(word)
            .unwrap_or(word)
            .to_string();
        self.progress
            .words
            .entry(key.clone())
            .or_insert_with(|| init_word_progress(&key, now))
            .in_review = true;

        self.mode = Mode::Word {
            pending: VecDeque::from([key.clone()]),
        };
        self.review = Some(Review::Word(key.clone()));
        (self, vec![Notice::ReviewStarted { key }])
    }

    /// Pull a due sentence out of the banner and drill it without moving the cursor.
    pub fn start_sentence_review(
        mut self,
        catalog: &Catalog,
        sentence: &str,
        now: DateTime<Utc>,
    ) -> (Self, Vec<Notice>) {
        let Some((cursor, found)) = catalog
            .locate(sentence)
            .and_then(|c| catalog.sentence(c).map(|s| (c, s)))
        else {
            log::warn!("Review requested for a sentence missing from the catalog: {sentence:?}");
            return (self, Vec::new());
        };
        let key = self
            .progress
            .sentence_key(&found.english)
            .unwrap_or(&found.english)
            .to_string();
        self.progress
            .sentences
            .entry(key.clone())
            .or_insert_with(|| init_sentence_progress(&key, now))
            .item
            .in_review = true;

        self.mode = Mode::Sentence;
        self.review = Some(Review::Sentence(cursor));
        (self, vec![Notice::ReviewStarted { key }])
    }

    /// Push every due word and sentence an hour out.
    pub fn defer_due(mut self, now: DateTime<Utc>) -> (Self, Vec<Notice>) {
        let offset = Duration::minutes(DEFER_OFFSET_MINUTES);
        let (words, moved_words) =
            review::defer_due(std::mem::take(&mut self.progress.words), now, offset);
        let (sentences, moved_sentences) =
            review::defer_due(std::mem::take(&mut self.progress.sentences), now, offset);
        self.progress.words = words;
        self.progress.sentences = sentences;
        (
            self,
            vec![Notice::Deferred {
                count: moved_words + moved_sentences,
            }],
        )
    }

    pub fn reset(self, _confirmed: ResetConfirmed) -> (Self, Vec<Notice>) {
        (Session::new(UserProgress::default()), vec![Notice::ProgressReset])
    }
}
