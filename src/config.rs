use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const APP_DIR: &str = "echodrill";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_speech_enabled")]
    pub speech_enabled: bool,
    #[serde(default = "default_speech_command")]
    pub speech_command: String,
    /// Playback speed relative to normal; 0.75 is a touch slower.
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
    #[serde(default = "default_sentence_advance_secs")]
    pub sentence_advance_secs: u64,
    #[serde(default = "default_word_advance_ms")]
    pub word_advance_ms: u64,
    #[serde(default = "default_review_banner_words")]
    pub review_banner_words: usize,
    #[serde(default = "default_review_banner_sentences")]
    pub review_banner_sentences: usize,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_speech_enabled() -> bool {
    true
}
fn default_speech_command() -> String {
    "espeak-ng".to_string()
}
fn default_speech_rate() -> f32 {
    0.75
}
fn default_sentence_advance_secs() -> u64 {
    4
}
fn default_word_advance_ms() -> u64 {
    1500
}
fn default_review_banner_words() -> usize {
    6
}
fn default_review_banner_sentences() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            speech_enabled: default_speech_enabled(),
            speech_command: default_speech_command(),
            speech_rate: default_speech_rate(),
            sentence_advance_secs: default_sentence_advance_secs(),
            word_advance_ms: default_word_advance_ms(),
            review_banner_words: default_review_banner_words(),
            review_banner_sentences: default_review_banner_sentences(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Where progress and the log file live.
    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    pub fn sentence_advance(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sentence_advance_secs)
    }

    pub fn word_advance(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.word_advance_ms)
    }

    /// Clamp out-of-range values and fall back to defaults for unknown names.
    /// Call after deserialization to handle hand-edited configs.
    pub fn validate(&mut self, valid_themes: &[&str]) {
        if !self.speech_rate.is_finite() {
            self.speech_rate = default_speech_rate();
        }
        self.speech_rate = self.speech_rate.clamp(0.25, 2.0);
        self.sentence_advance_secs = self.sentence_advance_secs.clamp(1, 30);
        self.word_advance_ms = self.word_advance_ms.clamp(250, 10_000);
        self.review_banner_words = self.review_banner_words.clamp(1, 20);
        self.review_banner_sentences = self.review_banner_sentences.clamp(1, 10);

        if self.speech_command.trim().is_empty() {
            self.speech_command = default_speech_command();
        }
        if !valid_themes.is_empty() && !valid_themes.contains(&self.theme.as_str()) {
            self.theme = default_theme();
        }
    }
}
