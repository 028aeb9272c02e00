pub mod catalog;
pub mod lexicon;
