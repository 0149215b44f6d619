//! Runtime configuration read from the environment at startup.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const DEFAULT_SESSION_FILE: &str = "sessions.json";

/// Startup configuration for the bot process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot API token
    pub bot_token: String,
    /// Base URL of the nutrition service
    pub nutrition_api_url: String,
    /// Base URL of the workout service
    pub workout_api_url: String,
    /// Path of the JSON session file
    pub session_file: PathBuf,
}

impl Config {
    /// Read the configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bot_token: required_var("TELEGRAM_BOT_TOKEN")?,
            nutrition_api_url: required_var("NUTRITION_API_URL")?,
            workout_api_url: required_var("WORKOUT_API_URL")?,
            session_file: env::var("SESSION_FILE")
                .unwrap_or_else(|_| DEFAULT_SESSION_FILE.to_string())
                .into(),
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    let value = env::var(name).with_context(|| format!("{name} must be set"))?;

    if value.trim().is_empty() {
        bail!("{name} must not be empty");
    }

    Ok(value)
}
