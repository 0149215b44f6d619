//! Message Handler module for processing incoming Telegram messages

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use teloxide::prelude::*;
use tracing::{debug, info, warn};

// Import localization
use crate::localization::{t_args_lang, t_lang};

// Import API clients
use crate::api::nutrition::NutritionClient;
use crate::api::workout::WorkoutClient;

// Import dialogue types
use crate::dialogue::{ChatDialogue, ChatState};

// Import session store
use crate::session::SessionStore;

// Import dialogue manager functions
use super::dialogue_manager::{
    self, is_back_keyword, is_cancel_keyword, send_prompt,
};

// Import UI builder functions
use super::ui_builder::format_daily_summary;

/// Dispatcher endpoint for incoming messages.
#[allow(clippy::too_many_arguments)]
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: ChatDialogue,
    sessions: Arc<SessionStore>,
    nutrition: Arc<NutritionClient>,
    workout: Arc<WorkoutClient>,
) -> Result<()> {
    // Extract user's language code from Telegram
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_deref());

    let Some(text) = msg.text() else {
        return handle_unsupported_message(&bot, &msg, language_code).await;
    };
    let input = text.trim();

    debug!(chat_id = %msg.chat.id, message_length = input.len(), "Received text message");

    let state = dialogue.get().await?.unwrap_or_default();

    // Flow keywords work in every state.
    if is_cancel_keyword(input) {
        return handle_cancel(&bot, &msg, &dialogue, &state, language_code).await;
    }
    if state != ChatState::Idle && is_back_keyword(input) {
        return handle_back(&bot, &msg, &dialogue, &state, language_code).await;
    }

    match state {
        ChatState::Idle => {
            handle_command(
                &bot,
                &msg,
                &dialogue,
                &sessions,
                &nutrition,
                input,
                language_code,
            )
            .await
        }
        ChatState::RegisterUsername => {
            dialogue_manager::handle_register_username_input(
                &bot,
                &msg,
                &dialogue,
                input,
                language_code,
            )
            .await
        }
        ChatState::RegisterPassword { username } => {
            dialogue_manager::handle_register_password_input(
                &bot,
                &msg,
                &dialogue,
                input,
                username,
                language_code,
            )
            .await
        }
        ChatState::RegisterEmail { username, password } => {
            dialogue_manager::handle_register_email_input(
                &bot,
                &msg,
                &dialogue,
                input,
                username,
                password,
                language_code,
            )
            .await
        }
        ChatState::RegisterAge {
            username,
            password,
            email,
        } => {
            dialogue_manager::handle_register_age_input(
                &bot,
                &msg,
                &dialogue,
                input,
                username,
                password,
                email,
                language_code,
            )
            .await
        }
        ChatState::RegisterHeight {
            username,
            password,
            email,
            age,
        } => {
            dialogue_manager::handle_register_height_input(
                &bot,
                &msg,
                &dialogue,
                input,
                username,
                password,
                email,
                age,
                language_code,
            )
            .await
        }
        ChatState::RegisterWeight {
            username,
            password,
            email,
            age,
            height_cm,
        } => {
            dialogue_manager::handle_register_weight_input(
                &bot,
                &msg,
                &dialogue,
                input,
                username,
                password,
                email,
                age,
                height_cm,
                language_code,
            )
            .await
        }
        ChatState::RegisterGoal {
            username,
            password,
            email,
            age,
            height_cm,
            weight_kg,
        } => {
            dialogue_manager::handle_register_goal_input(
                &bot,
                &msg,
                &dialogue,
                &sessions,
                &nutrition,
                &workout,
                input,
                username,
                password,
                email,
                age,
                height_cm,
                weight_kg,
                language_code,
            )
            .await
        }
        ChatState::LoginUsername => {
            dialogue_manager::handle_login_username_input(
                &bot,
                &msg,
                &dialogue,
                input,
                language_code,
            )
            .await
        }
        ChatState::LoginPassword { username } => {
            dialogue_manager::handle_login_password_input(
                &bot,
                &msg,
                &dialogue,
                &sessions,
                &nutrition,
                &workout,
                input,
                username,
                language_code,
            )
            .await
        }
        ChatState::MealName => {
            dialogue_manager::handle_meal_name_input(&bot, &msg, &dialogue, input, language_code)
                .await
        }
        ChatState::MealCalories { name } => {
            dialogue_manager::handle_meal_calories_input(
                &bot,
                &msg,
                &dialogue,
                &sessions,
                &nutrition,
                input,
                name,
                language_code,
            )
            .await
        }
        ChatState::WorkoutActivity => {
            dialogue_manager::handle_workout_activity_input(
                &bot,
                &msg,
                &dialogue,
                input,
                language_code,
            )
            .await
        }
        ChatState::WorkoutDuration { activity } => {
            dialogue_manager::handle_workout_duration_input(
                &bot,
                &msg,
                &dialogue,
                &sessions,
                &workout,
                input,
                activity,
                language_code,
            )
            .await
        }
    }
}

// Abort the active flow, if any.
async fn handle_cancel(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    state: &ChatState,
    language_code: Option<&str>,
) -> Result<()> {
    if *state == ChatState::Idle {
        bot.send_message(msg.chat.id, t_lang("nothing-to-cancel", language_code))
            .await?;
    } else {
        bot.send_message(msg.chat.id, t_lang("flow-cancelled", language_code))
            .await?;
        dialogue.exit().await?;
    }

    Ok(())
}

// Step back to the previous question; falling off the first question
// cancels the flow.
async fn handle_back(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    state: &ChatState,
    language_code: Option<&str>,
) -> Result<()> {
    let previous = state.back();

    if previous == ChatState::Idle {
        bot.send_message(msg.chat.id, t_lang("flow-cancelled", language_code))
            .await?;
        dialogue.exit().await?;
    } else {
        send_prompt(bot, msg.chat.id, &previous, language_code).await?;
        dialogue.update(previous).await?;
    }

    Ok(())
}

// Command routing while no flow is active.
async fn handle_command(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    sessions: &SessionStore,
    nutrition: &NutritionClient,
    input: &str,
    language_code: Option<&str>,
) -> Result<()> {
    match input {
        "/start" => {
            let session = sessions.get(msg.chat.id.0).await.unwrap_or_default();
            let greeting = match session.username.as_deref().filter(|_| session.is_logged_in()) {
                Some(username) => t_args_lang(
                    "welcome-back",
                    &[("username", username)],
                    language_code,
                ),
                None => format!(
                    "👋 {}\n\n{}\n\n{}",
                    t_lang("welcome-title", language_code),
                    t_lang("welcome-description", language_code),
                    t_lang("welcome-commands", language_code)
                ),
            };
            bot.send_message(msg.chat.id, greeting).await?;
        }
        "/help" => {
            let help_message = vec![
                t_lang("help-title", language_code),
                t_lang("help-register", language_code),
                t_lang("help-login", language_code),
                t_lang("help-meal", language_code),
                t_lang("help-workout", language_code),
                t_lang("help-today", language_code),
                t_lang("help-navigation", language_code),
            ]
            .join("\n");
            bot.send_message(msg.chat.id, help_message).await?;
        }
        "/register" => {
            enter_flow(bot, msg, dialogue, ChatState::RegisterUsername, language_code).await?;
        }
        "/login" => {
            enter_flow(bot, msg, dialogue, ChatState::LoginUsername, language_code).await?;
        }
        "/meal" => {
            let session = sessions.get(msg.chat.id.0).await.unwrap_or_default();
            if session.nutrition_token.is_none() {
                bot.send_message(msg.chat.id, t_lang("login-required", language_code))
                    .await?;
            } else {
                enter_flow(bot, msg, dialogue, ChatState::MealName, language_code).await?;
            }
        }
        "/workout" => {
            let session = sessions.get(msg.chat.id.0).await.unwrap_or_default();
            if session.workout_token.is_none() {
                bot.send_message(msg.chat.id, t_lang("login-required", language_code))
                    .await?;
            } else {
                enter_flow(bot, msg, dialogue, ChatState::WorkoutActivity, language_code).await?;
            }
        }
        "/today" => {
            handle_today(bot, msg, sessions, nutrition, language_code).await?;
        }
        "/logout" => {
            sessions.clear(msg.chat.id.0).await?;
            info!(chat_id = %msg.chat.id, "Session cleared");
            bot.send_message(msg.chat.id, t_lang("logout-complete", language_code))
                .await?;
        }
        _ => {
            bot.send_message(msg.chat.id, t_lang("unknown-command", language_code))
                .await?;
        }
    }

    Ok(())
}

// Start a wizard flow by asking its first question.
async fn enter_flow(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    first: ChatState,
    language_code: Option<&str>,
) -> Result<()> {
    send_prompt(bot, msg.chat.id, &first, language_code).await?;
    dialogue.update(first).await?;
    Ok(())
}

// Fetch and render today's calorie summary; stateless.
async fn handle_today(
    bot: &Bot,
    msg: &Message,
    sessions: &SessionStore,
    nutrition: &NutritionClient,
    language_code: Option<&str>,
) -> Result<()> {
    let session = sessions.get(msg.chat.id.0).await.unwrap_or_default();
    let token = match session.nutrition_token {
        Some(token) => token,
        None => {
            bot.send_message(msg.chat.id, t_lang("login-required", language_code))
                .await?;
            return Ok(());
        }
    };

    match nutrition.daily_summary(&token, Utc::now().date_naive()).await {
        Ok(summary) => {
            bot.send_message(msg.chat.id, format_daily_summary(&summary, language_code))
                .await?;
        }
        Err(e) if e.is_unauthorized() => {
            warn!(chat_id = %msg.chat.id, "Stale nutrition token rejected");
            bot.send_message(msg.chat.id, t_lang("session-expired", language_code))
                .await?;
        }
        Err(e) => {
            warn!(chat_id = %msg.chat.id, error = %e, "Failed to fetch daily summary");
            bot.send_message(msg.chat.id, t_lang("summary-failed", language_code))
                .await?;
        }
    }

    Ok(())
}

async fn handle_unsupported_message(
    bot: &Bot,
    msg: &Message,
    language_code: Option<&str>,
) -> Result<()> {
    debug!(chat_id = %msg.chat.id, "Received unsupported message type");

    bot.send_message(msg.chat.id, t_lang("error-text-only", language_code))
        .await?;

    Ok(())
}
