pub mod progress_bar;
pub mod review_panel;
pub mod sentence_area;
pub mod toast;
pub mod word_area;
