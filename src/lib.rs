pub mod app;
pub mod config;
pub mod content;
pub mod engine;
pub mod event;
pub mod session;
pub mod speech;
pub mod store;
pub mod ui;
