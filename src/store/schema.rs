use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::content::catalog::Cursor;
use crate::engine::schedule::{ItemProgress, SentenceProgress};

pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Everything persisted about one learner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    #[serde(default)]
    pub words: IndexMap<String, ItemProgress>,
    #[serde(default)]
    pub sentences: IndexMap<String, SentenceProgress>,
    #[serde(default)]
    pub current_exercise_index: usize,
    #[serde(default)]
    pub current_step: usize,
    #[serde(default)]
    pub points: u32,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            words: IndexMap::new(),
            sentences: IndexMap::new(),
            current_exercise_index: 0,
            current_step: 0,
            points: 0,
            schema_version: SCHEMA_VERSION,
        }
    }
}

impl UserProgress {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.current_exercise_index, self.current_step)
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.current_exercise_index = cursor.unit;
        self.current_step = cursor.step;
    }

    /// Stored key matching `word` case-insensitively, if any.
    pub fn word_key(&self, word: &str) -> Option<&str> {
        find_key(self.words.keys(), word)
    }

    pub fn sentence_key(&self, sentence: &str) -> Option<&str> {
        find_key(self.sentences.keys(), sentence)
    }
}

fn find_key<'a>(mut keys: impl Iterator<Item = &'a String>, needle: &str) -> Option<&'a str> {
    let needle = needle.to_lowercase();
    keys.find(|k| k.to_lowercase() == needle).map(String::as_str)
}

pub const EXPORT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub echodrill_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub config: Config,
    pub progress: UserProgress,
}
