use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;

use fittrack::api::nutrition::{
    DailySummary, Goal, MealRequest, MealResponse, Profile, RegisterProfileRequest,
};
use fittrack::api::workout::WorkoutRequest;
use fittrack::api::{AuthResponse, Credentials};

/// The registration payload must match the wire shape the nutrition service
/// documents: credentials at the top level, body metrics nested under
/// `profile`, goal as a lowercase string.
#[test]
fn test_register_request_wire_shape() {
    let request = RegisterProfileRequest {
        username: "alice".to_string(),
        password: "hunter42x".to_string(),
        email: "alice@example.com".to_string(),
        profile: Profile {
            age: 30,
            height_cm: 172.5,
            weight_kg: 68.0,
            goal: Goal::Lose,
        },
    };

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "username": "alice",
            "password": "hunter42x",
            "email": "alice@example.com",
            "profile": {
                "age": 30,
                "height_cm": 172.5,
                "weight_kg": 68.0,
                "goal": "lose"
            }
        })
    );
}

#[test]
fn test_goal_serializes_lowercase() {
    assert_eq!(serde_json::to_value(Goal::Lose).unwrap(), json!("lose"));
    assert_eq!(serde_json::to_value(Goal::Maintain).unwrap(), json!("maintain"));
    assert_eq!(serde_json::to_value(Goal::Gain).unwrap(), json!("gain"));
}

#[test]
fn test_meal_request_uses_rfc3339_timestamps() {
    let request = MealRequest {
        name: "oatmeal".to_string(),
        calories: 450,
        eaten_at: Utc.with_ymd_and_hms(2026, 8, 4, 9, 30, 0).unwrap(),
    };

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "name": "oatmeal",
            "calories": 450,
            "eaten_at": "2026-08-04T09:30:00Z"
        })
    );
}

#[test]
fn test_workout_request_wire_shape() {
    let request = WorkoutRequest {
        activity: "running".to_string(),
        duration_min: 45,
        performed_at: Utc.with_ymd_and_hms(2026, 8, 4, 18, 0, 0).unwrap(),
    };

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "activity": "running",
            "duration_min": 45,
            "performed_at": "2026-08-04T18:00:00Z"
        })
    );
}

#[test]
fn test_credentials_wire_shape() {
    let credentials = Credentials {
        username: "alice".to_string(),
        password: "hunter42x".to_string(),
    };

    assert_eq!(
        serde_json::to_value(&credentials).unwrap(),
        json!({ "username": "alice", "password": "hunter42x" })
    );
}

#[test]
fn test_auth_response_decodes() {
    let response: AuthResponse =
        serde_json::from_value(json!({ "token": "abc123", "user_id": 17 })).unwrap();

    assert_eq!(response.token, "abc123");
    assert_eq!(response.user_id, 17);
}

#[test]
fn test_meal_response_decodes() {
    let response: MealResponse = serde_json::from_value(json!({
        "id": 5,
        "name": "oatmeal",
        "calories": 450,
        "eaten_at": "2026-08-04T09:30:00Z"
    }))
    .unwrap();

    assert_eq!(response.id, 5);
    assert_eq!(response.calories, 450);
}

#[test]
fn test_daily_summary_decodes() {
    let summary: DailySummary = serde_json::from_value(json!({
        "date": "2026-08-04",
        "total_calories": 1830,
        "meal_count": 3
    }))
    .unwrap();

    assert_eq!(summary.date, NaiveDate::from_ymd_opt(2026, 8, 4).unwrap());
    assert_eq!(summary.total_calories, 1830);
    assert_eq!(summary.meal_count, 3);
}
