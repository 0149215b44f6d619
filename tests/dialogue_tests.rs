use fittrack::dialogue::ChatState;

fn full_register_state() -> ChatState {
    ChatState::RegisterGoal {
        username: "alice".to_string(),
        password: "hunter42x".to_string(),
        email: "alice@example.com".to_string(),
        age: 30,
        height_cm: 172.5,
        weight_kg: 68.0,
    }
}

/// Walking back from the last registration question reaches Idle without
/// losing any earlier answer on the way.
#[test]
fn test_register_back_chain() {
    let mut state = full_register_state();
    let mut steps = 0;

    while state != ChatState::Idle {
        let previous = state.back();
        assert_ne!(previous, state, "back must always make progress");
        state = previous;
        steps += 1;
    }

    // goal -> weight -> height -> age -> email -> password -> username -> idle
    assert_eq!(steps, 7);
}

#[test]
fn test_back_preserves_earlier_answers() {
    let state = ChatState::RegisterWeight {
        username: "alice".to_string(),
        password: "hunter42x".to_string(),
        email: "alice@example.com".to_string(),
        age: 30,
        height_cm: 172.5,
    };

    match state.back() {
        ChatState::RegisterHeight {
            username,
            password,
            email,
            age,
        } => {
            assert_eq!(username, "alice");
            assert_eq!(password, "hunter42x");
            assert_eq!(email, "alice@example.com");
            assert_eq!(age, 30);
        }
        other => panic!("Unexpected back target: {other:?}"),
    }
}

#[test]
fn test_login_and_logging_flows_back_to_idle() {
    assert_eq!(
        ChatState::LoginPassword {
            username: "alice".to_string()
        }
        .back(),
        ChatState::LoginUsername
    );
    assert_eq!(
        ChatState::MealCalories {
            name: "oatmeal".to_string()
        }
        .back(),
        ChatState::MealName
    );
    assert_eq!(
        ChatState::WorkoutDuration {
            activity: "running".to_string()
        }
        .back(),
        ChatState::WorkoutActivity
    );
    assert_eq!(ChatState::LoginUsername.back(), ChatState::Idle);
}

/// Every question state carries a prompt key; only Idle has none.
#[test]
fn test_prompt_keys_are_total() {
    let mut state = full_register_state();
    while state != ChatState::Idle {
        assert!(state.prompt_key().is_some(), "missing prompt for {state:?}");
        state = state.back();
    }
    assert!(ChatState::Idle.prompt_key().is_none());

    assert_eq!(
        ChatState::MealName.prompt_key(),
        Some("meal-name-prompt")
    );
    assert_eq!(
        ChatState::WorkoutActivity.prompt_key(),
        Some("workout-activity-prompt")
    );
}

/// States round-trip through serde, matching how dialogue storage and the
/// session file treat them.
#[test]
fn test_state_serde_round_trip() {
    let state = full_register_state();

    let json = serde_json::to_string(&state).unwrap();
    let restored: ChatState = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, state);
}

#[test]
fn test_default_state_is_idle() {
    assert_eq!(ChatState::default(), ChatState::Idle);
}
