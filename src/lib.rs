//! Lulu Journal application library
//!
//! This library provides functionality for keeping a personal journal:
//! a durable record store, derived gallery and quick-note views, a word
//! frequency summarizer, anniversary tracking, and a thin client for the
//! AI assistant.

mod anniversary;
mod assistant;
mod cli;
mod config;
mod controller;
mod errors;
mod record;
mod store;
mod types;
mod views;
mod wordcloud;

// Re-export key components
pub use anniversary::*;
pub use assistant::*;
pub use cli::*;
pub use config::*;
pub use controller::*;
pub use errors::*;
pub use record::*;
pub use store::*;
pub use types::*;
pub use views::*;
pub use wordcloud::*;
