pub mod json_store;
pub mod schema;

use std::cell::RefCell;
use std::rc::Rc;

use crate::store::json_store::JsonStore;
use crate::store::schema::UserProgress;

/// Durable home for the progress aggregate. Both operations are best-effort:
/// failures are logged, never surfaced to the drill.
pub trait ProgressStore {
    fn load(&self) -> UserProgress;
    fn save(&self, progress: &UserProgress);
}

impl ProgressStore for JsonStore {
    fn load(&self) -> UserProgress {
        self.load_progress()
    }

    fn save(&self, progress: &UserProgress) {
        if let Err(e) = self.save_progress(progress) {
            log::warn!("Failed to save progress: {e}");
        }
    }
}

impl<T: ProgressStore + ?Sized> ProgressStore for Rc<T> {
    fn load(&self) -> UserProgress {
        (**self).load()
    }

    fn save(&self, progress: &UserProgress) {
        (**self).save(progress)
    }
}

/// In-memory store that records every save.
#[derive(Default)]
pub struct MemoryStore {
    initial: UserProgress,
    saved: RefCell<Vec<UserProgress>>,
}

impl MemoryStore {
    pub fn new(initial: UserProgress) -> Self {
        Self {
            initial,
            saved: RefCell::new(Vec::new()),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saved.borrow().len()
    }

    pub fn last_saved(&self) -> Option<UserProgress> {
        self.saved.borrow().last().cloned()
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> UserProgress {
        self.last_saved().unwrap_or_else(|| self.initial.clone())
    }

    fn save(&self, progress: &UserProgress) {
        self.saved.borrow_mut().push(progress.clone());
    }
}
