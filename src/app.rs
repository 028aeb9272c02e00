use std::time::{Duration, Instant};

use chrono::Utc;

use crate::config::Config;
use crate::content::catalog::Catalog;
use crate::content::lexicon::{Lexicon, Translation};
use crate::engine::compare::SpellingCheck;
use crate::engine::review::{ReviewEntry, ReviewQueue};
use crate::session::controller::{Mode, Notice, ResetConfirmed, Session};
use crate::session::phase::DrillPhase;
use crate::session::sentence_drill::SentenceDrill;
use crate::session::word_drill::WordDrill;
use crate::speech::Speaker;
use crate::store::ProgressStore;
use crate::store::schema::UserProgress;
use crate::ui::theme::Theme;

const TOAST_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Drill,
    ReviewPicker,
    ConfirmReset,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

/// Pronunciation shown for one word of the sentence on request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pronunciation {
    pub word: String,
    pub phonetic: Option<String>,
    pub translation: String,
}

pub struct App {
    pub screen: AppScreen,
    pub catalog: Catalog,
    pub lexicon: Lexicon,
    pub session: Session,
    pub sentence: SentenceDrill,
    /// Spelling drill in front of the sentence, while one is running.
    pub word: Option<WordDrill>,
    pub pronunciation: Option<Pronunciation>,
    pub toasts: Vec<Toast>,
    pub review_selected: usize,
    /// The last sentence of the catalog has been passed.
    pub finished: bool,
    pub theme: &'static Theme,
    pub config: Config,
    pub should_quit: bool,
    store: Box<dyn ProgressStore>,
    speaker: Box<dyn Speaker>,
}

impl App {
    pub fn new(
        config: Config,
        theme: &'static Theme,
        store: Box<dyn ProgressStore>,
        speaker: Box<dyn Speaker>,
    ) -> Self {
        Self::with_parts(
            config,
            theme,
            Catalog::load(),
            Lexicon::load(),
            store,
            speaker,
        )
    }

    pub fn with_parts(
        config: Config,
        theme: &'static Theme,
        catalog: Catalog,
        lexicon: Lexicon,
        store: Box<dyn ProgressStore>,
        speaker: Box<dyn Speaker>,
    ) -> Self {
        let session = Session::new(store.load());
        let mut app = Self {
            screen: AppScreen::Drill,
            catalog,
            lexicon,
            session,
            sentence: SentenceDrill::new(""),
            word: None,
            pronunciation: None,
            toasts: Vec::new(),
            review_selected: 0,
            finished: false,
            theme,
            config,
            should_quit: false,
            store,
            speaker,
        };
        app.load_sentence();
        app
    }

    /// Replace the sentence drill with whatever the session points at.
    fn load_sentence(&mut self) {
        self.pronunciation = None;
        let current = if self.finished && self.session.review.is_none() {
            None
        } else {
            self.session.current_sentence(&self.catalog)
        };
        match current {
            Some(sentence) => {
                self.sentence = SentenceDrill::new(&sentence.english);
                self.screen = AppScreen::Drill;
                self.speak_sentence();
            }
            None => {
                self.sentence = SentenceDrill::new("");
                self.screen = AppScreen::Complete;
            }
        }
    }

    /// Run one session transition, persist the result and surface its notices.
    fn apply(
        &mut self,
        transition: impl FnOnce(Session, &Catalog) -> (Session, Vec<Notice>),
    ) -> Vec<Notice> {
        let current = std::mem::replace(&mut self.session, Session::new(UserProgress::default()));
        let (next, notices) = transition(current, &self.catalog);
        self.session = next;
        self.store.save(&self.session.progress);
        for notice in &notices {
            if *notice == Notice::AllComplete {
                self.finished = true;
            }
            self.push_notice(notice.clone());
        }
        notices
    }

    pub fn push_toast(&mut self, text: String, kind: ToastKind) {
        self.toasts.push(Toast {
            text,
            kind,
            expires_at: Instant::now() + TOAST_LIFETIME,
        });
    }

    fn push_notice(&mut self, notice: Notice) {
        let (text, kind) = match notice {
            Notice::PointAwarded { total } => (format!("+1 point ({total} total)"), ToastKind::Success),
            Notice::UnitComplete {
                headword,
                translation,
            } => (
                format!("Unit complete! Next topic: {headword} ({translation})"),
                ToastKind::Success,
            ),
            Notice::AllComplete => ("Every unit is complete!".to_string(), ToastKind::Success),
            Notice::WordsToPractice { count } => (
                format!(
                    "{count} word{} to practice, press Enter",
                    if count == 1 { "" } else { "s" }
                ),
                ToastKind::Warning,
            ),
            Notice::ReviewStarted { key } => (format!("Reviewing \"{key}\""), ToastKind::Info),
            Notice::ReviewFinished => ("Review complete".to_string(), ToastKind::Success),
            Notice::Deferred { count } => (
                format!("{count} due item(s) moved one hour later"),
                ToastKind::Info,
            ),
            Notice::ProgressReset => ("Progress reset".to_string(), ToastKind::Warning),
        };
        self.push_toast(text, kind);
    }

    pub fn review_queue(&self) -> ReviewQueue {
        self.session.review_queue(Utc::now())
    }

    // --- speech ---

    pub fn speak_sentence(&mut self) {
        if self.config.speech_enabled && !self.sentence.target.is_empty() {
            self.speaker.speak(&self.sentence.target, self.config.speech_rate);
        }
    }

    pub fn speak_word(&mut self) {
        if let Some(word) = &self.word
            && self.config.speech_enabled
        {
            self.speaker.speak(&word.word, self.config.speech_rate);
        }
    }

    /// Replay audio for whatever is on screen.
    pub fn replay(&mut self) {
        if self.word.is_some() {
            self.speak_word();
        } else {
            self.speak_sentence();
        }
    }

    /// Show how the current slot's word sounds. Costs the attempt its point.
    pub fn show_pronunciation(&mut self) {
        if self.word.is_some() || !self.sentence.phase.accepts_input() {
            return;
        }
        let Some(word) = self.sentence.current_word().map(str::to_string) else {
            return;
        };
        self.sentence.mark_assisted();
        if self.config.speech_enabled {
            self.speaker.speak(&word, self.config.speech_rate);
        }
        self.pronunciation = Some(Pronunciation {
            phonetic: self.lexicon.phonetic(&word),
            translation: self.lexicon.translate(&word, &self.catalog).to_string(),
            word,
        });
    }

    pub fn translate(&self, word: &str) -> Translation {
        self.lexicon.translate(word, &self.catalog)
    }

    /// Remediation is pending but its drill has not been opened yet.
    pub fn awaiting_remediation(&self) -> bool {
        self.word.is_none() && matches!(self.session.mode, Mode::Word { .. })
    }

    // --- typing ---

    pub fn type_char(&mut self, ch: char) {
        if let Some(word) = self.word.as_mut() {
            word.type_char(ch);
        } else if !self.awaiting_remediation() {
            let before = self.sentence.current;
            self.sentence.type_char(ch);
            if self.sentence.current != before {
                self.pronunciation = None;
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(word) = self.word.as_mut() {
            word.backspace();
        } else if !self.awaiting_remediation() {
            self.sentence.backspace();
        }
    }

    /// Enter: check, retry, open remediation, or skip the advance delay.
    pub fn submit(&mut self) {
        if self.word.is_some() {
            self.submit_word();
        } else if self.awaiting_remediation() {
            self.open_word_drill();
        } else {
            self.submit_sentence();
        }
    }

    fn submit_sentence(&mut self) {
        if self.sentence.phase.is_advancing() {
            if self.sentence.phase.continue_now() {
                self.load_sentence();
            }
            return;
        }
        if !self.sentence.phase.accepts_input() || self.sentence.words.is_empty() {
            return;
        }

        let check = self
            .sentence
            .check(Instant::now(), self.config.sentence_advance());
        let assisted = self.sentence.take_assisted();
        self.pronunciation = None;
        let now = Utc::now();
        let notices =
            self.apply(|session, catalog| session.record_sentence(catalog, &check, assisted, now));
        if notices.contains(&Notice::AllComplete) {
            self.sentence.phase.continue_now();
            self.load_sentence();
        }
    }

    fn open_word_drill(&mut self) {
        if let Some(word) = self.session.active_word() {
            self.word = Some(WordDrill::new(word));
            self.speak_word();
        }
    }

    fn submit_word(&mut self) {
        let Some(drill) = self.word.as_mut() else {
            return;
        };
        match drill.phase {
            DrillPhase::AdvancingDelay(_) => {
                if drill.phase.continue_now() {
                    self.next_word();
                }
            }
            DrillPhase::Checked { correct: false } => drill.retry(),
            DrillPhase::Checked { correct: true } => {}
            DrillPhase::AwaitingInput if drill.input.trim().is_empty() => {}
            DrillPhase::AwaitingInput => {
                let result = drill.check(Instant::now(), self.config.word_advance());
                if result == SpellingCheck::Correct {
                    let word = drill.word.clone();
                    let first_try = drill.solved_first_try();
                    let now = Utc::now();
                    self.apply(|session, _| session.record_word(&word, first_try, now));
                }
            }
        }
    }

    /// Move past a finished word drill.
    fn next_word(&mut self) {
        self.word = None;
        if self.session.active_word().is_some() {
            self.open_word_drill();
        } else if self.sentence.is_complete() || self.sentence.words.is_empty() {
            self.load_sentence();
        }
    }

    /// Drive timers. Returns true if anything advanced.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.toasts.retain(|t| t.expires_at > now);

        if let Some(word) = self.word.as_mut() {
            if word.phase.tick(now) {
                self.next_word();
                return true;
            }
            return false;
        }
        if self.sentence.phase.tick(now) {
            self.load_sentence();
            return true;
        }
        false
    }

    // --- review ---

    pub fn open_review_picker(&mut self) {
        if self.word.is_some() || self.awaiting_remediation() {
            self.push_toast(
                "Finish the missed words first".to_string(),
                ToastKind::Warning,
            );
            return;
        }
        if self.review_queue().is_empty() {
            self.push_toast("Nothing is due for review".to_string(), ToastKind::Info);
            return;
        }
        self.review_selected = 0;
        self.screen = AppScreen::ReviewPicker;
    }

    pub fn review_entries(&self) -> Vec<(bool, String)> {
        let queue = self.review_queue();
        queue
            .visible(
                self.config.review_banner_words,
                self.config.review_banner_sentences,
            )
            .into_iter()
            .map(|entry| match entry {
                ReviewEntry::Word(p) => (true, p.key.clone()),
                ReviewEntry::Sentence(p) => (false, p.key.clone()),
            })
            .collect()
    }

    pub fn review_next(&mut self) {
        let len = self.review_entries().len();
        if len > 0 {
            self.review_selected = (self.review_selected + 1).min(len - 1);
        }
    }

    pub fn review_prev(&mut self) {
        self.review_selected = self.review_selected.saturating_sub(1);
    }

    pub fn start_selected_review(&mut self) {
        let entries = self.review_entries();
        let Some((is_word, key)) = entries.get(self.review_selected).cloned() else {
            self.screen = self.resting_screen();
            return;
        };
        let now = Utc::now();
        if is_word {
            self.apply(|session, _| session.start_word_review(&key, now));
            self.screen = AppScreen::Drill;
            self.open_word_drill();
        } else {
            self.apply(|session, catalog| session.start_sentence_review(catalog, &key, now));
            self.load_sentence();
        }
    }

    /// "Review later": push everything due an hour out.
    pub fn defer_reviews(&mut self) {
        let now = Utc::now();
        self.apply(|session, _| session.defer_due(now));
        self.screen = self.resting_screen();
    }

    pub fn close_dialog(&mut self) {
        self.screen = self.resting_screen();
    }

    fn resting_screen(&self) -> AppScreen {
        let done = self.finished || self.session.is_all_complete(&self.catalog);
        if done && self.word.is_none() && self.session.review.is_none() {
            AppScreen::Complete
        } else {
            AppScreen::Drill
        }
    }

    // --- reset ---

    pub fn request_reset(&mut self) {
        self.screen = AppScreen::ConfirmReset;
    }

    pub fn answer_reset(&mut self, answer: char) {
        match ResetConfirmed::from_answer(answer) {
            Some(token) => {
                self.apply(|session, _| session.reset(token));
                self.word = None;
                self.finished = false;
                self.load_sentence();
            }
            None => self.close_dialog(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::content::catalog::{Cursor, Sentence, Unit};
    use crate::store::MemoryStore;

    #[derive(Clone, Default)]
    struct RecordingSpeaker(Rc<RefCell<Vec<String>>>);

    impl Speaker for RecordingSpeaker {
        fn speak(&mut self, text: &str, _rate: f32) {
            self.0.borrow_mut().push(text.to_string());
        }
    }

    fn theme() -> &'static Theme {
        Box::leak(Box::new(Theme::default()))
    }

    fn catalog() -> Catalog {
        let unit = |headword: &str, sentences: &[&str]| Unit {
            headword: headword.to_string(),
            translation: format!("<{headword}>"),
            sentences: sentences
                .iter()
                .map(|s| Sentence {
                    english: s.to_string(),
                    translation: String::new(),
                })
                .collect(),
        };
        Catalog::from_units(vec![
            unit("bird", &["A bird", "A bird is flying"]),
            unit("go", &["Go out"]),
        ])
    }

    fn make_app(progress: UserProgress) -> (App, Rc<MemoryStore>, RecordingSpeaker) {
        let store = Rc::new(MemoryStore::new(progress));
        let speaker = RecordingSpeaker::default();
        let app = App::with_parts(
            Config::default(),
            theme(),
            catalog(),
            Lexicon::load(),
            Box::new(store.clone()),
            Box::new(speaker.clone()),
        );
        (app, store, speaker)
    }

    fn type_str(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.type_char(ch);
        }
    }

    #[test]
    fn test_start_speaks_first_sentence() {
        let (app, _store, speaker) = make_app(UserProgress::default());
        assert_eq!(app.screen, AppScreen::Drill);
        assert_eq!(app.sentence.target, "A bird");
        assert_eq!(speaker.0.borrow().as_slice(), ["A bird"]);
    }

    #[test]
    fn test_correct_sentence_persists_and_advances_on_enter() {
        let (mut app, store, _speaker) = make_app(UserProgress::default());
        type_str(&mut app, "a bird");
        app.submit();

        assert!(app.sentence.phase.is_advancing());
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().points, 1);

        app.submit();
        assert_eq!(app.sentence.target, "A bird is flying");
        assert_eq!(app.session.progress.cursor(), Cursor::new(0, 1));
    }

    #[test]
    fn test_tick_advances_once() {
        let (mut app, _store, _speaker) = make_app(UserProgress::default());
        type_str(&mut app, "a bird");
        app.submit();
        let later = Instant::now() + Duration::from_secs(60);
        assert!(app.tick(later));
        assert_eq!(app.sentence.target, "A bird is flying");
        assert!(!app.tick(later));
        assert_eq!(app.sentence.target, "A bird is flying");
    }

    #[test]
    fn test_failed_sentence_runs_remediation() {
        let mut progress = UserProgress::default();
        progress.set_cursor(Cursor::new(0, 1));
        let (mut app, store, _speaker) = make_app(progress);

        type_str(&mut app, "A brid is fly");
        app.submit();
        assert!(app.awaiting_remediation());
        assert_eq!(app.sentence.phase, DrillPhase::Checked { correct: false });

        // Typing is ignored until the missed words are drilled.
        app.type_char('x');
        assert!(app.sentence.slots[1].is_empty());

        app.submit();
        assert_eq!(app.word.as_ref().map(|w| w.word.as_str()), Some("bird"));

        type_str(&mut app, "bird");
        app.submit();
        app.submit();
        assert_eq!(app.word.as_ref().map(|w| w.word.as_str()), Some("flying"));

        type_str(&mut app, "flyng");
        app.submit();
        assert!(app.word.as_ref().unwrap().hint.is_some());
        type_str(&mut app, "flying");
        app.submit();
        app.submit();

        assert!(app.word.is_none());
        assert_eq!(app.session.mode, Mode::Sentence);
        let saved = store.load();
        assert_eq!(saved.words["bird"].correct_count, 1);
        assert_eq!(saved.words["flying"].incorrect_count, 1);

        // Back on the same sentence with the wrong slots cleared.
        assert_eq!(app.sentence.target, "A bird is flying");
        assert_eq!(app.sentence.current, 1);
        type_str(&mut app, "bird");
        type_str(&mut app, "flying");
        app.submit();
        assert!(app.sentence.phase.is_advancing());
    }

    #[test]
    fn test_pronunciation_hint_forfeits_point() {
        let (mut app, store, _speaker) = make_app(UserProgress::default());
        type_str(&mut app, "a ");
        app.show_pronunciation();
        let shown = app.pronunciation.clone().unwrap();
        assert_eq!(shown.word, "bird");
        assert_eq!(shown.phonetic.as_deref(), Some("/bɜːrd/"));

        type_str(&mut app, "bird");
        app.submit();
        assert_eq!(store.load().points, 0);
        assert_eq!(store.load().cursor(), Cursor::new(0, 1));
    }

    #[test]
    fn test_review_picker_and_sentence_review() {
        let (mut app, _store, _speaker) = make_app(UserProgress::default());
        type_str(&mut app, "a brid");
        app.submit();
        app.submit();
        type_str(&mut app, "bird");
        app.submit();
        app.submit();
        type_str(&mut app, "bird");
        app.submit();
        app.submit();
        assert_eq!(app.sentence.target, "A bird is flying");

        // Make the earlier sentence due.
        let now = Utc::now();
        for entry in app.session.progress.sentences.values_mut() {
            entry.item.next_review = now - chrono::Duration::minutes(1);
        }

        app.open_review_picker();
        assert_eq!(app.screen, AppScreen::ReviewPicker);
        let entries = app.review_entries();
        let index = entries.iter().position(|(w, k)| !w && k == "A bird").unwrap();
        app.review_selected = index;
        app.start_selected_review();

        assert_eq!(app.screen, AppScreen::Drill);
        assert_eq!(app.sentence.target, "A bird");
        type_str(&mut app, "a bird");
        app.submit();
        app.submit();
        assert_eq!(app.sentence.target, "A bird is flying");
        assert!(app.session.progress.sentences["A bird"].item.in_review);
    }

    #[test]
    fn test_defer_clears_picker() {
        let now = Utc::now();
        let mut progress = UserProgress::default();
        progress.words.insert(
            "bird".into(),
            crate::engine::schedule::init_word_progress("bird", now - chrono::Duration::days(1)),
        );
        let (mut app, store, _speaker) = make_app(progress);
        app.open_review_picker();
        assert_eq!(app.screen, AppScreen::ReviewPicker);
        app.defer_reviews();
        assert_eq!(app.screen, AppScreen::Drill);
        assert!(app.review_queue().is_empty());
        assert!(store.load().words["bird"].next_review > now);
    }

    #[test]
    fn test_reset_needs_yes() {
        let mut progress = UserProgress::default();
        progress.points = 5;
        progress.set_cursor(Cursor::new(1, 0));
        let (mut app, store, _speaker) = make_app(progress);

        app.request_reset();
        app.answer_reset('n');
        assert_eq!(app.screen, AppScreen::Drill);
        assert_eq!(app.session.progress.points, 5);

        app.request_reset();
        app.answer_reset('y');
        assert_eq!(app.session.progress.points, 0);
        assert_eq!(app.sentence.target, "A bird");
        assert_eq!(store.load().cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn test_finishing_catalog_shows_complete() {
        let mut progress = UserProgress::default();
        progress.set_cursor(Cursor::new(1, 0));
        let (mut app, _store, _speaker) = make_app(progress);
        type_str(&mut app, "go out");
        app.submit();
        assert_eq!(app.screen, AppScreen::Complete);
    }

    #[test]
    fn test_out_of_range_progress_opens_complete() {
        let mut progress = UserProgress::default();
        progress.set_cursor(Cursor::new(7, 3));
        let (app, _store, speaker) = make_app(progress);
        assert_eq!(app.screen, AppScreen::Complete);
        assert!(speaker.0.borrow().is_empty());
    }
}
