//! Conversation state machine for the per-chat wizard flows.
//!
//! Every flow is a linear sequence of questions; each state carries the
//! answers already validated on the way in. `back` walks one question back,
//! dropping only the most recent answer.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Conversation state for a single chat.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ChatState {
    #[default]
    Idle,
    RegisterUsername,
    RegisterPassword {
        username: String,
    },
    RegisterEmail {
        username: String,
        password: String,
    },
    RegisterAge {
        username: String,
        password: String,
        email: String,
    },
    RegisterHeight {
        username: String,
        password: String,
        email: String,
        age: u32,
    },
    RegisterWeight {
        username: String,
        password: String,
        email: String,
        age: u32,
        height_cm: f64,
    },
    RegisterGoal {
        username: String,
        password: String,
        email: String,
        age: u32,
        height_cm: f64,
        weight_kg: f64,
    },
    LoginUsername,
    LoginPassword {
        username: String,
    },
    MealName,
    MealCalories {
        name: String,
    },
    WorkoutActivity,
    WorkoutDuration {
        activity: String,
    },
}

/// Type alias for our chat dialogue
pub type ChatDialogue = Dialogue<ChatState, InMemStorage<ChatState>>;

impl ChatState {
    /// Localization key of the question asked when entering this state.
    pub fn prompt_key(&self) -> Option<&'static str> {
        match self {
            ChatState::Idle => None,
            ChatState::RegisterUsername => Some("register-username-prompt"),
            ChatState::RegisterPassword { .. } => Some("register-password-prompt"),
            ChatState::RegisterEmail { .. } => Some("register-email-prompt"),
            ChatState::RegisterAge { .. } => Some("register-age-prompt"),
            ChatState::RegisterHeight { .. } => Some("register-height-prompt"),
            ChatState::RegisterWeight { .. } => Some("register-weight-prompt"),
            ChatState::RegisterGoal { .. } => Some("register-goal-prompt"),
            ChatState::LoginUsername => Some("login-username-prompt"),
            ChatState::LoginPassword { .. } => Some("login-password-prompt"),
            ChatState::MealName => Some("meal-name-prompt"),
            ChatState::MealCalories { .. } => Some("meal-calories-prompt"),
            ChatState::WorkoutActivity => Some("workout-activity-prompt"),
            ChatState::WorkoutDuration { .. } => Some("workout-duration-prompt"),
        }
    }

    /// One step back in the active flow. The first question of every flow
    /// goes back to `Idle`; `Idle` stays `Idle`.
    pub fn back(&self) -> ChatState {
        match self.clone() {
            ChatState::Idle => ChatState::Idle,
            ChatState::RegisterUsername => ChatState::Idle,
            ChatState::RegisterPassword { .. } => ChatState::RegisterUsername,
            ChatState::RegisterEmail { username, .. } => ChatState::RegisterPassword { username },
            ChatState::RegisterAge {
                username, password, ..
            } => ChatState::RegisterEmail { username, password },
            ChatState::RegisterHeight {
                username,
                password,
                email,
                ..
            } => ChatState::RegisterAge {
                username,
                password,
                email,
            },
            ChatState::RegisterWeight {
                username,
                password,
                email,
                age,
                ..
            } => ChatState::RegisterHeight {
                username,
                password,
                email,
                age,
            },
            ChatState::RegisterGoal {
                username,
                password,
                email,
                age,
                height_cm,
                ..
            } => ChatState::RegisterWeight {
                username,
                password,
                email,
                age,
                height_cm,
            },
            ChatState::LoginUsername => ChatState::Idle,
            ChatState::LoginPassword { .. } => ChatState::LoginUsername,
            ChatState::MealName => ChatState::Idle,
            ChatState::MealCalories { .. } => ChatState::MealName,
            ChatState::WorkoutActivity => ChatState::Idle,
            ChatState::WorkoutDuration { .. } => ChatState::WorkoutActivity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_from_first_flow_states() {
        assert_eq!(ChatState::Idle.back(), ChatState::Idle);
        assert_eq!(ChatState::RegisterUsername.back(), ChatState::Idle);
        assert_eq!(ChatState::LoginUsername.back(), ChatState::Idle);
        assert_eq!(ChatState::MealName.back(), ChatState::Idle);
        assert_eq!(ChatState::WorkoutActivity.back(), ChatState::Idle);
    }

    #[test]
    fn test_back_drops_only_latest_answer() {
        let state = ChatState::RegisterAge {
            username: "alice".to_string(),
            password: "secret12".to_string(),
            email: "alice@example.com".to_string(),
        };
        assert_eq!(
            state.back(),
            ChatState::RegisterEmail {
                username: "alice".to_string(),
                password: "secret12".to_string(),
            }
        );
    }

    #[test]
    fn test_prompt_key_covers_all_question_states() {
        let states = vec![
            ChatState::RegisterUsername,
            ChatState::RegisterPassword {
                username: "a".to_string(),
            },
            ChatState::LoginUsername,
            ChatState::MealName,
            ChatState::WorkoutActivity,
        ];
        for state in states {
            assert!(state.prompt_key().is_some());
        }
        assert!(ChatState::Idle.prompt_key().is_none());
    }
}
