//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: routes incoming messages by command and dialogue state
//! - `dialogue_manager`: per-state input validation and flow transitions
//! - `ui_builder`: formats recap and summary messages

pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

// Re-export the dispatcher endpoint for use in main.rs
pub use message_handler::message_handler;

// Re-export helpers used across the bot and in tests
pub use dialogue_manager::{is_back_keyword, is_cancel_keyword};
pub use ui_builder::{format_daily_summary, format_registration_recap};
