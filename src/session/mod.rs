pub mod controller;
pub mod phase;
pub mod sentence_drill;
pub mod timer;
pub mod word_drill;
