//! # FitTrack Telegram Bot
//!
//! A Telegram bot front-end for a fitness and nutrition tracking product.
//! Drives per-chat wizard conversations (registration, login, meal and
//! workout logging) and forwards validated data to the nutrition and
//! workout REST services.

pub mod api;
pub mod bot;
pub mod config;
pub mod dialogue;
pub mod localization;
pub mod session;
pub mod validation;
