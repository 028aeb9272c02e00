use serde::{Deserialize, Serialize};

use crate::engine::compare::split_words;

const CATALOG_JSON: &str = include_str!("../../assets/catalog.json");

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sentence {
    pub english: String,
    pub translation: String,
}

/// A topic unit: sentences that grow around one headword.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Unit {
    pub headword: String,
    pub translation: String,
    pub sentences: Vec<Sentence>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub unit: usize,
    pub step: usize,
}

impl Cursor {
    pub fn new(unit: usize, step: usize) -> Self {
        Self { unit, step }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Next sentence in the same unit.
    Step(Cursor),
    /// First sentence of the following unit.
    NextUnit(Cursor),
    /// Nothing left; the cursor stays where it was.
    AllComplete,
}

pub struct Catalog {
    units: Vec<Unit>,
}

impl Catalog {
    pub fn load() -> Self {
        let units: Vec<Unit> = match serde_json::from_str(CATALOG_JSON) {
            Ok(units) => units,
            Err(e) => {
                log::error!("Bundled catalog failed to parse: {e}");
                Vec::new()
            }
        };
        Self::from_units(units)
    }

    pub fn from_units(units: Vec<Unit>) -> Self {
        // Units without sentences would strand the cursor.
        let units = units
            .into_iter()
            .filter(|u| !u.sentences.is_empty())
            .collect();
        Self { units }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, index: usize) -> Option<&Unit> {
        self.units.get(index)
    }

    pub fn sentence(&self, cursor: Cursor) -> Option<&Sentence> {
        self.units.get(cursor.unit)?.sentences.get(cursor.step)
    }

    pub fn is_complete(&self, cursor: Cursor) -> bool {
        self.sentence(cursor).is_none()
    }

    pub fn advance(&self, cursor: Cursor) -> Advance {
        let Some(unit) = self.units.get(cursor.unit) else {
            return Advance::AllComplete;
        };
        if cursor.step + 1 < unit.sentences.len() {
            Advance::Step(Cursor::new(cursor.unit, cursor.step + 1))
        } else if cursor.unit + 1 < self.units.len() {
            Advance::NextUnit(Cursor::new(cursor.unit + 1, 0))
        } else {
            Advance::AllComplete
        }
    }

    /// Where a sentence lives, matched case-insensitively on its English text.
    pub fn locate(&self, english: &str) -> Option<Cursor> {
        let needle = english.trim().to_lowercase();
        self.units.iter().enumerate().find_map(|(ui, unit)| {
            unit.sentences
                .iter()
                .position(|s| s.english.to_lowercase() == needle)
                .map(|si| Cursor::new(ui, si))
        })
    }

    pub fn headword(&self, word: &str) -> Option<&Unit> {
        self.units
            .iter()
            .find(|u| u.headword.eq_ignore_ascii_case(word))
    }

    /// First unit whose sentences use `word`.
    pub fn unit_using(&self, word: &str) -> Option<&Unit> {
        self.units.iter().find(|u| {
            u.sentences.iter().any(|s| {
                split_words(&s.english)
                    .iter()
                    .any(|w| trim_punctuation(w).eq_ignore_ascii_case(word))
            })
        })
    }

    pub fn total_sentences(&self) -> usize {
        self.units.iter().map(|u| u.sentences.len()).sum()
    }

    /// Sentences before `cursor`; all of them once the cursor is past the end.
    pub fn completed_count(&self, cursor: Cursor) -> usize {
        if self.is_complete(cursor) {
            return self.total_sentences();
        }
        self.units[..cursor.unit]
            .iter()
            .map(|u| u.sentences.len())
            .sum::<usize>()
            + cursor.step
    }

    pub fn progress_ratio(&self, cursor: Cursor) -> f64 {
        let total = self.total_sentences();
        if total == 0 {
            return 0.0;
        }
        self.completed_count(cursor) as f64 / total as f64
    }
}

pub fn trim_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(headword: &str, sentences: &[&str]) -> Unit {
        Unit {
            headword: headword.to_string(),
            translation: format!("<{headword}>"),
            sentences: sentences
                .iter()
                .map(|s| Sentence {
                    english: s.to_string(),
                    translation: String::new(),
                })
                .collect(),
        }
    }

    fn small() -> Catalog {
        Catalog::from_units(vec![
            unit("bird", &["A bird", "A bird is flying"]),
            unit("go", &["Go out"]),
        ])
    }

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = Catalog::load();
        assert_eq!(catalog.units().len(), 8);
        assert_eq!(catalog.units()[0].headword, "bird");
        assert!(catalog.units().iter().all(|u| u.sentences.len() == 4));
    }

    #[test]
    fn test_repeated_sentence_locates_first_occurrence() {
        let catalog = Catalog::load();
        let girl = catalog.headword("girl").unwrap();
        assert_eq!(girl.sentences[1].english, girl.sentences[2].english);
        let unit = catalog
            .units()
            .iter()
            .position(|u| u.headword == "girl")
            .unwrap();
        assert_eq!(
            catalog.locate("A girl is smiling"),
            Some(Cursor::new(unit, 1))
        );
    }

    #[test]
    fn test_advance_within_and_across_units() {
        let catalog = small();
        assert_eq!(
            catalog.advance(Cursor::new(0, 0)),
            Advance::Step(Cursor::new(0, 1))
        );
        assert_eq!(
            catalog.advance(Cursor::new(0, 1)),
            Advance::NextUnit(Cursor::new(1, 0))
        );
        assert_eq!(catalog.advance(Cursor::new(1, 0)), Advance::AllComplete);
    }

    #[test]
    fn test_out_of_bounds_cursor_is_complete() {
        let catalog = small();
        assert!(catalog.is_complete(Cursor::new(5, 0)));
        assert!(catalog.is_complete(Cursor::new(0, 9)));
        assert_eq!(catalog.advance(Cursor::new(5, 0)), Advance::AllComplete);
        assert_eq!(catalog.progress_ratio(Cursor::new(5, 0)), 1.0);
    }

    #[test]
    fn test_locate_and_lookup() {
        let catalog = small();
        assert_eq!(catalog.locate("a bird is flying"), Some(Cursor::new(0, 1)));
        assert_eq!(catalog.locate("nope"), None);
        assert_eq!(catalog.headword("GO").map(|u| u.headword.as_str()), Some("go"));
        assert_eq!(
            catalog.unit_using("flying").map(|u| u.headword.as_str()),
            Some("bird")
        );
        assert!(catalog.unit_using("table").is_none());
    }

    #[test]
    fn test_progress_ratio() {
        let catalog = small();
        assert_eq!(catalog.progress_ratio(Cursor::new(0, 0)), 0.0);
        assert!((catalog.progress_ratio(Cursor::new(1, 0)) - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_units_are_dropped() {
        let catalog = Catalog::from_units(vec![unit("empty", &[]), unit("go", &["Go out"])]);
        assert_eq!(catalog.units().len(), 1);
    }
}
