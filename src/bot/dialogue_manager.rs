//! Dialogue Manager module for handling dialogue state transitions
//!
//! One handler per wizard question: check the flow keywords, validate the
//! answer, then either advance the dialogue or re-ask the question. The final
//! question of each flow submits the collected data to the downstream
//! service(s).

use anyhow::Result;
use chrono::Utc;
use teloxide::prelude::*;
use tracing::{error, info, warn};

// Import localization
use crate::localization::{t_args_lang, t_lang};

// Import dialogue types
use crate::dialogue::{ChatDialogue, ChatState};

// Import API clients and request types
use crate::api::nutrition::{MealRequest, NutritionClient, Profile, RegisterProfileRequest};
use crate::api::workout::{WorkoutClient, WorkoutRequest};
use crate::api::{ApiError, Credentials};

// Import session store
use crate::session::SessionStore;

// Import validators
use crate::validation::{
    parse_goal, validate_activity, validate_age, validate_calories, validate_duration_min,
    validate_email, validate_height_cm, validate_meal_name, validate_password, validate_username,
    validate_weight_kg,
};

use super::ui_builder::format_registration_recap;

/// Keywords that abort the active flow.
pub fn is_cancel_keyword(input: &str) -> bool {
    matches!(
        input.trim().to_lowercase().as_str(),
        "/cancel" | "cancel" | "stop"
    )
}

/// Keywords that return to the previous question.
pub fn is_back_keyword(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "/back" | "back")
}

/// Ask the question belonging to `state`, if it has one.
pub(crate) async fn send_prompt(
    bot: &Bot,
    chat_id: ChatId,
    state: &ChatState,
    language_code: Option<&str>,
) -> Result<()> {
    if let Some(key) = state.prompt_key() {
        bot.send_message(chat_id, t_lang(key, language_code)).await?;
    }
    Ok(())
}

// Send the validation error followed by the same question again.
async fn reject(
    bot: &Bot,
    chat_id: ChatId,
    error_key: &str,
    state: &ChatState,
    language_code: Option<&str>,
) -> Result<()> {
    let question = state
        .prompt_key()
        .map(|key| t_lang(key, language_code))
        .unwrap_or_default();
    bot.send_message(
        chat_id,
        format!("{}\n\n{}", t_lang(error_key, language_code), question),
    )
    .await?;
    Ok(())
}

// Ask the next question and record the transition.
async fn advance_to(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    next: ChatState,
    language_code: Option<&str>,
) -> Result<()> {
    send_prompt(bot, msg.chat.id, &next, language_code).await?;
    dialogue.update(next).await?;
    Ok(())
}

// A user-presentable reason for a failed service call.
fn service_error_reason(error: &ApiError, language_code: Option<&str>) -> String {
    match error {
        ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
        _ => t_lang("error-service-unavailable", language_code),
    }
}

/// Handle the username answer during registration.
pub async fn handle_register_username_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    input: &str,
    language_code: Option<&str>,
) -> Result<()> {
    match validate_username(input) {
        Ok(username) => {
            advance_to(
                bot,
                msg,
                dialogue,
                ChatState::RegisterPassword { username },
                language_code,
            )
            .await?;
        }
        Err(key) => {
            reject(bot, msg.chat.id, key, &ChatState::RegisterUsername, language_code).await?;
        }
    }

    Ok(())
}

/// Handle the password answer during registration.
pub async fn handle_register_password_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    input: &str,
    username: String,
    language_code: Option<&str>,
) -> Result<()> {
    match validate_password(input) {
        Ok(password) => {
            advance_to(
                bot,
                msg,
                dialogue,
                ChatState::RegisterEmail { username, password },
                language_code,
            )
            .await?;
        }
        Err(key) => {
            let state = ChatState::RegisterPassword { username };
            reject(bot, msg.chat.id, key, &state, language_code).await?;
        }
    }

    Ok(())
}

/// Handle the email answer during registration.
pub async fn handle_register_email_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    input: &str,
    username: String,
    password: String,
    language_code: Option<&str>,
) -> Result<()> {
    match validate_email(input) {
        Ok(email) => {
            advance_to(
                bot,
                msg,
                dialogue,
                ChatState::RegisterAge {
                    username,
                    password,
                    email,
                },
                language_code,
            )
            .await?;
        }
        Err(key) => {
            let state = ChatState::RegisterEmail { username, password };
            reject(bot, msg.chat.id, key, &state, language_code).await?;
        }
    }

    Ok(())
}

/// Handle the age answer during registration.
pub async fn handle_register_age_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    input: &str,
    username: String,
    password: String,
    email: String,
    language_code: Option<&str>,
) -> Result<()> {
    match validate_age(input) {
        Ok(age) => {
            advance_to(
                bot,
                msg,
                dialogue,
                ChatState::RegisterHeight {
                    username,
                    password,
                    email,
                    age,
                },
                language_code,
            )
            .await?;
        }
        Err(key) => {
            let state = ChatState::RegisterAge {
                username,
                password,
                email,
            };
            reject(bot, msg.chat.id, key, &state, language_code).await?;
        }
    }

    Ok(())
}

/// Handle the height answer during registration.
#[allow(clippy::too_many_arguments)]
pub async fn handle_register_height_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    input: &str,
    username: String,
    password: String,
    email: String,
    age: u32,
    language_code: Option<&str>,
) -> Result<()> {
    match validate_height_cm(input) {
        Ok(height_cm) => {
            advance_to(
                bot,
                msg,
                dialogue,
                ChatState::RegisterWeight {
                    username,
                    password,
                    email,
                    age,
                    height_cm,
                },
                language_code,
            )
            .await?;
        }
        Err(key) => {
            let state = ChatState::RegisterHeight {
                username,
                password,
                email,
                age,
            };
            reject(bot, msg.chat.id, key, &state, language_code).await?;
        }
    }

    Ok(())
}

/// Handle the weight answer during registration. On success the collected
/// profile is recapped before the final goal question.
#[allow(clippy::too_many_arguments)]
pub async fn handle_register_weight_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    input: &str,
    username: String,
    password: String,
    email: String,
    age: u32,
    height_cm: f64,
    language_code: Option<&str>,
) -> Result<()> {
    match validate_weight_kg(input) {
        Ok(weight_kg) => {
            let recap = format_registration_recap(
                &username,
                &email,
                age,
                height_cm,
                weight_kg,
                language_code,
            );
            bot.send_message(msg.chat.id, recap).await?;

            advance_to(
                bot,
                msg,
                dialogue,
                ChatState::RegisterGoal {
                    username,
                    password,
                    email,
                    age,
                    height_cm,
                    weight_kg,
                },
                language_code,
            )
            .await?;
        }
        Err(key) => {
            let state = ChatState::RegisterWeight {
                username,
                password,
                email,
                age,
                height_cm,
            };
            reject(bot, msg.chat.id, key, &state, language_code).await?;
        }
    }

    Ok(())
}

/// Handle the goal answer and submit the registration to both services.
#[allow(clippy::too_many_arguments)]
pub async fn handle_register_goal_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    sessions: &SessionStore,
    nutrition: &NutritionClient,
    workout: &WorkoutClient,
    input: &str,
    username: String,
    password: String,
    email: String,
    age: u32,
    height_cm: f64,
    weight_kg: f64,
    language_code: Option<&str>,
) -> Result<()> {
    let goal = match parse_goal(input) {
        Ok(goal) => goal,
        Err(key) => {
            let state = ChatState::RegisterGoal {
                username,
                password,
                email,
                age,
                height_cm,
                weight_kg,
            };
            reject(bot, msg.chat.id, key, &state, language_code).await?;
            return Ok(());
        }
    };

    let request = RegisterProfileRequest {
        username: username.clone(),
        password: password.clone(),
        email,
        profile: Profile {
            age,
            height_cm,
            weight_kg,
            goal,
        },
    };

    // The nutrition service owns the full profile and registers first; if it
    // rejects, nothing is stored.
    let nutrition_auth = match nutrition.register(&request).await {
        Ok(auth) => auth,
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "Nutrition registration failed");
            bot.send_message(
                msg.chat.id,
                t_args_lang(
                    "register-failed",
                    &[("reason", &service_error_reason(&e, language_code))],
                    language_code,
                ),
            )
            .await?;
            dialogue.exit().await?;
            return Ok(());
        }
    };

    let credentials = Credentials {
        username: username.clone(),
        password,
    };
    let workout_token = match workout.register(&credentials).await {
        Ok(auth) => Some(auth.token),
        Err(e) => {
            warn!(chat_id = %msg.chat.id, error = %e, "Workout registration failed");
            None
        }
    };

    let partial = workout_token.is_none();
    let now = Utc::now();
    sessions
        .update(msg.chat.id.0, |session| {
            session.username = Some(username.clone());
            session.nutrition_token = Some(nutrition_auth.token.clone());
            session.workout_token = workout_token.clone();
            session.registered_at = Some(now);
            session.last_login_at = Some(now);
        })
        .await?;

    info!(chat_id = %msg.chat.id, username = %username, partial, "Registration completed");

    let reply_key = if partial {
        "register-partial"
    } else {
        "register-complete"
    };
    bot.send_message(
        msg.chat.id,
        t_args_lang(reply_key, &[("username", &username)], language_code),
    )
    .await?;

    dialogue.exit().await?;
    Ok(())
}

/// Handle the username answer during login.
pub async fn handle_login_username_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    input: &str,
    language_code: Option<&str>,
) -> Result<()> {
    let username = input.trim();
    if username.is_empty() {
        reject(
            bot,
            msg.chat.id,
            "input-empty",
            &ChatState::LoginUsername,
            language_code,
        )
        .await?;
        return Ok(());
    }

    advance_to(
        bot,
        msg,
        dialogue,
        ChatState::LoginPassword {
            username: username.to_string(),
        },
        language_code,
    )
    .await?;

    Ok(())
}

/// Handle the password answer and log in to both services. Credentials are
/// not re-validated here; the services are the authority on existing accounts.
#[allow(clippy::too_many_arguments)]
pub async fn handle_login_password_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    sessions: &SessionStore,
    nutrition: &NutritionClient,
    workout: &WorkoutClient,
    input: &str,
    username: String,
    language_code: Option<&str>,
) -> Result<()> {
    let password = input.trim();
    if password.is_empty() {
        let state = ChatState::LoginPassword { username };
        reject(bot, msg.chat.id, "input-empty", &state, language_code).await?;
        return Ok(());
    }

    let credentials = Credentials {
        username: username.clone(),
        password: password.to_string(),
    };

    let nutrition_auth = match nutrition.login(&credentials).await {
        Ok(auth) => auth,
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "Nutrition login failed");
            bot.send_message(
                msg.chat.id,
                t_args_lang(
                    "login-failed",
                    &[("reason", &service_error_reason(&e, language_code))],
                    language_code,
                ),
            )
            .await?;
            dialogue.exit().await?;
            return Ok(());
        }
    };

    let workout_auth = match workout.login(&credentials).await {
        Ok(auth) => auth,
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "Workout login failed");
            bot.send_message(
                msg.chat.id,
                t_args_lang(
                    "login-failed",
                    &[("reason", &service_error_reason(&e, language_code))],
                    language_code,
                ),
            )
            .await?;
            dialogue.exit().await?;
            return Ok(());
        }
    };

    let now = Utc::now();
    sessions
        .update(msg.chat.id.0, |session| {
            session.username = Some(username.clone());
            session.nutrition_token = Some(nutrition_auth.token.clone());
            session.workout_token = Some(workout_auth.token.clone());
            session.last_login_at = Some(now);
        })
        .await?;

    info!(chat_id = %msg.chat.id, username = %username, "Login completed");

    bot.send_message(
        msg.chat.id,
        t_args_lang("login-complete", &[("username", &username)], language_code),
    )
    .await?;

    dialogue.exit().await?;
    Ok(())
}

/// Handle the meal name answer.
pub async fn handle_meal_name_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    input: &str,
    language_code: Option<&str>,
) -> Result<()> {
    match validate_meal_name(input) {
        Ok(name) => {
            advance_to(
                bot,
                msg,
                dialogue,
                ChatState::MealCalories { name },
                language_code,
            )
            .await?;
        }
        Err(key) => {
            reject(bot, msg.chat.id, key, &ChatState::MealName, language_code).await?;
        }
    }

    Ok(())
}

/// Handle the calorie answer and store the meal entry.
pub async fn handle_meal_calories_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    sessions: &SessionStore,
    nutrition: &NutritionClient,
    input: &str,
    name: String,
    language_code: Option<&str>,
) -> Result<()> {
    let calories = match validate_calories(input) {
        Ok(calories) => calories,
        Err(key) => {
            let state = ChatState::MealCalories { name };
            reject(bot, msg.chat.id, key, &state, language_code).await?;
            return Ok(());
        }
    };

    let session = sessions.get(msg.chat.id.0).await.unwrap_or_default();
    let token = match session.nutrition_token {
        Some(token) => token,
        None => {
            bot.send_message(msg.chat.id, t_lang("login-required", language_code))
                .await?;
            dialogue.exit().await?;
            return Ok(());
        }
    };

    let request = MealRequest {
        name,
        calories,
        eaten_at: Utc::now(),
    };

    match nutrition.save_meal(&token, &request).await {
        Ok(saved) => {
            info!(chat_id = %msg.chat.id, meal_id = saved.id, "Meal entry stored");
            bot.send_message(
                msg.chat.id,
                t_args_lang(
                    "meal-saved",
                    &[
                        ("name", &saved.name),
                        ("calories", &saved.calories.to_string()),
                    ],
                    language_code,
                ),
            )
            .await?;
        }
        Err(e) if e.is_unauthorized() => {
            warn!(chat_id = %msg.chat.id, "Stale nutrition token rejected");
            bot.send_message(msg.chat.id, t_lang("session-expired", language_code))
                .await?;
        }
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "Failed to store meal entry");
            bot.send_message(
                msg.chat.id,
                t_args_lang(
                    "meal-failed",
                    &[("reason", &service_error_reason(&e, language_code))],
                    language_code,
                ),
            )
            .await?;
        }
    }

    dialogue.exit().await?;
    Ok(())
}

/// Handle the workout activity answer.
pub async fn handle_workout_activity_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    input: &str,
    language_code: Option<&str>,
) -> Result<()> {
    match validate_activity(input) {
        Ok(activity) => {
            advance_to(
                bot,
                msg,
                dialogue,
                ChatState::WorkoutDuration { activity },
                language_code,
            )
            .await?;
        }
        Err(key) => {
            reject(
                bot,
                msg.chat.id,
                key,
                &ChatState::WorkoutActivity,
                language_code,
            )
            .await?;
        }
    }

    Ok(())
}

/// Handle the duration answer and store the workout entry.
#[allow(clippy::too_many_arguments)]
pub async fn handle_workout_duration_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &ChatDialogue,
    sessions: &SessionStore,
    workout: &WorkoutClient,
    input: &str,
    activity: String,
    language_code: Option<&str>,
) -> Result<()> {
    let duration_min = match validate_duration_min(input) {
        Ok(duration) => duration,
        Err(key) => {
            let state = ChatState::WorkoutDuration { activity };
            reject(bot, msg.chat.id, key, &state, language_code).await?;
            return Ok(());
        }
    };

    let session = sessions.get(msg.chat.id.0).await.unwrap_or_default();
    let token = match session.workout_token {
        Some(token) => token,
        None => {
            bot.send_message(msg.chat.id, t_lang("login-required", language_code))
                .await?;
            dialogue.exit().await?;
            return Ok(());
        }
    };

    let request = WorkoutRequest {
        activity,
        duration_min,
        performed_at: Utc::now(),
    };

    match workout.save_workout(&token, &request).await {
        Ok(saved) => {
            info!(chat_id = %msg.chat.id, workout_id = saved.id, "Workout entry stored");
            bot.send_message(
                msg.chat.id,
                t_args_lang(
                    "workout-saved",
                    &[
                        ("activity", &saved.activity),
                        ("duration", &saved.duration_min.to_string()),
                    ],
                    language_code,
                ),
            )
            .await?;
        }
        Err(e) if e.is_unauthorized() => {
            warn!(chat_id = %msg.chat.id, "Stale workout token rejected");
            bot.send_message(msg.chat.id, t_lang("session-expired", language_code))
                .await?;
        }
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "Failed to store workout entry");
            bot.send_message(
                msg.chat.id,
                t_args_lang(
                    "workout-failed",
                    &[("reason", &service_error_reason(&e, language_code))],
                    language_code,
                ),
            )
            .await?;
        }
    }

    dialogue.exit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_keywords() {
        assert!(is_cancel_keyword("/cancel"));
        assert!(is_cancel_keyword("  STOP  "));
        assert!(is_back_keyword("Back"));
        assert!(is_back_keyword("/back"));

        assert!(!is_cancel_keyword("cancellation"));
        assert!(!is_back_keyword("backwards"));
    }

    #[test]
    fn test_service_error_reason_prefers_service_message() {
        let error = ApiError::Status {
            status: 409,
            message: "username already taken".to_string(),
        };
        assert_eq!(service_error_reason(&error, None), "username already taken");

        let empty = ApiError::Status {
            status: 500,
            message: String::new(),
        };
        // Falls back to the localized generic message (the key itself when
        // localization is not initialized).
        assert_eq!(
            service_error_reason(&empty, None),
            t_lang("error-service-unavailable", None)
        );
    }
}
