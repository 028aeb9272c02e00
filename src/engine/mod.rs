pub mod compare;
pub mod review;
pub mod schedule;
