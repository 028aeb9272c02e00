use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::content::catalog::{Catalog, trim_punctuation};

const LEXICON_JSON: &str = include_str!("../../assets/lexicon.json");

/// Suffixes stripped, in order, when a word has no direct entry.
const SUFFIXES: [&str; 3] = ["s", "ing", "ed"];

#[derive(Debug, Default, Deserialize)]
struct LexiconData {
    #[serde(default)]
    translations: HashMap<String, String>,
    #[serde(default)]
    phonetics: HashMap<String, String>,
}

pub struct Lexicon {
    translations: HashMap<String, String>,
    phonetics: HashMap<String, String>,
}

/// Where a translation came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Translation {
    Exact(String),
    Stemmed {
        translation: String,
        base: String,
        suffix: &'static str,
    },
    Headword(String),
    RelatedTopic {
        headword: String,
        translation: String,
    },
    Unknown,
}

impl Translation {
    pub fn is_known(&self) -> bool {
        !matches!(self, Translation::Unknown)
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Translation::Exact(t) | Translation::Headword(t) => write!(f, "{t}"),
            Translation::Stemmed {
                translation,
                base,
                suffix,
            } => {
                let form = match *suffix {
                    "s" => "plural / third person",
                    "ing" => "-ing form",
                    "ed" => "past tense",
                    _ => "inflected",
                };
                write!(f, "{translation} ({form} of \"{base}\")")
            }
            Translation::RelatedTopic {
                headword,
                translation,
            } => write!(f, "related topic: {headword} ({translation})"),
            Translation::Unknown => write!(f, "unknown word"),
        }
    }
}

impl Lexicon {
    pub fn load() -> Self {
        let data: LexiconData = match serde_json::from_str(LEXICON_JSON) {
            Ok(data) => data,
            Err(e) => {
                log::error!("Bundled lexicon failed to parse: {e}");
                LexiconData::default()
            }
        };
        Self::from_maps(data.translations, data.phonetics)
    }

    pub fn from_maps(
        translations: HashMap<String, String>,
        phonetics: HashMap<String, String>,
    ) -> Self {
        Self {
            translations: lowercase_keys(translations),
            phonetics: lowercase_keys(phonetics),
        }
    }

    /// Best-effort lookup: exact entry, literal suffix strip, catalog headword,
    /// then any unit whose sentences contain the word.
    pub fn translate(&self, word: &str, catalog: &Catalog) -> Translation {
        let word = normalize(word);
        if word.is_empty() {
            return Translation::Unknown;
        }

        if let Some(t) = self.translations.get(&word) {
            return Translation::Exact(t.clone());
        }

        for suffix in SUFFIXES {
            if let Some(base) = word.strip_suffix(suffix)
                && !base.is_empty()
                && let Some(t) = self.translations.get(base)
            {
                return Translation::Stemmed {
                    translation: t.clone(),
                    base: base.to_string(),
                    suffix,
                };
            }
        }

        if let Some(unit) = catalog.headword(&word) {
            return Translation::Headword(unit.translation.clone());
        }

        if let Some(unit) = catalog.unit_using(&word) {
            return Translation::RelatedTopic {
                headword: unit.headword.clone(),
                translation: unit.translation.clone(),
            };
        }

        Translation::Unknown
    }

    /// Transcription wrapped in slashes, e.g. `/bɜːrd/`.
    pub fn phonetic(&self, word: &str) -> Option<String> {
        self.phonetics
            .get(&normalize(word))
            .filter(|p| !p.is_empty())
            .map(|p| format!("/{p}/"))
    }
}

fn normalize(word: &str) -> String {
    trim_punctuation(word.trim()).to_lowercase()
}

fn lowercase_keys(map: HashMap<String, String>) -> HashMap<String, String> {
    map.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect()
}
