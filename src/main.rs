use std::sync::Arc;

use anyhow::Result;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fittrack::api::nutrition::NutritionClient;
use fittrack::api::workout::WorkoutClient;
use fittrack::bot;
use fittrack::config::Config;
use fittrack::dialogue::ChatState;
use fittrack::localization::init_localization;
use fittrack::session::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting FitTrack Telegram Bot");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    init_localization()?;

    info!(path = %config.session_file.display(), "Loading session store");
    let sessions = Arc::new(SessionStore::load(&config.session_file)?);

    let nutrition = Arc::new(NutritionClient::new(config.nutrition_api_url.clone()));
    let workout = Arc::new(WorkoutClient::new(config.workout_api_url.clone()));

    // Initialize the bot
    let bot = Bot::new(config.bot_token.clone());

    info!("Bot initialized, starting dispatcher");

    // Set up the dispatcher with per-chat dialogue state
    let handler = Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<ChatState>, ChatState>()
        .endpoint(bot::message_handler);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![
            InMemStorage::<ChatState>::new(),
            sessions,
            nutrition,
            workout
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
