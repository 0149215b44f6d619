//! Input validators for the wizard flows.
//!
//! Every validator trims its input and returns the parsed value or a
//! localization key describing the rejection.

use lazy_static::lazy_static;
use regex::Regex;

use crate::api::nutrition::Goal;

lazy_static! {
    static ref USERNAME_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9_]{3,32}$").unwrap();
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Validates a username: 3-32 characters, letters, digits and underscores.
pub fn validate_username(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();

    if !USERNAME_PATTERN.is_match(trimmed) {
        return Err("username-invalid");
    }

    Ok(trimmed.to_string())
}

/// Validates a password: 8-64 characters with at least one letter and one digit.
pub fn validate_password(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();

    if trimmed.len() < 8 {
        return Err("password-too-short");
    }

    if trimmed.len() > 64 {
        return Err("password-too-long");
    }

    let has_letter = trimmed.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = trimmed.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err("password-too-weak");
    }

    Ok(trimmed.to_string())
}

/// Validates an email address of the `local@domain.tld` shape.
pub fn validate_email(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();

    if trimmed.len() > 254 || !EMAIL_PATTERN.is_match(trimmed) {
        return Err("email-invalid");
    }

    Ok(trimmed.to_string())
}

/// Validates an age in whole years, 13-120.
pub fn validate_age(input: &str) -> Result<u32, &'static str> {
    let age: u32 = input.trim().parse().map_err(|_| "age-invalid")?;

    if !(13..=120).contains(&age) {
        return Err("age-out-of-range");
    }

    Ok(age)
}

/// Validates a height in centimeters, 100.0-250.0.
pub fn validate_height_cm(input: &str) -> Result<f64, &'static str> {
    let height = parse_decimal(input).ok_or("height-invalid")?;

    if !(100.0..=250.0).contains(&height) {
        return Err("height-out-of-range");
    }

    Ok(height)
}

/// Validates a body weight in kilograms, 30.0-400.0.
pub fn validate_weight_kg(input: &str) -> Result<f64, &'static str> {
    let weight = parse_decimal(input).ok_or("weight-invalid")?;

    if !(30.0..=400.0).contains(&weight) {
        return Err("weight-out-of-range");
    }

    Ok(weight)
}

/// Parses a fitness goal: lose / maintain / gain, or the menu numbers 1-3.
pub fn parse_goal(input: &str) -> Result<Goal, &'static str> {
    match input.trim().to_lowercase().as_str() {
        "lose" | "1" => Ok(Goal::Lose),
        "maintain" | "2" => Ok(Goal::Maintain),
        "gain" | "3" => Ok(Goal::Gain),
        _ => Err("goal-invalid"),
    }
}

/// Validates a meal name: non-empty, at most 100 characters.
pub fn validate_meal_name(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err("meal-name-empty");
    }

    if trimmed.len() > 100 {
        return Err("meal-name-too-long");
    }

    Ok(trimmed.to_string())
}

/// Validates a calorie count, 1-10000 kcal.
pub fn validate_calories(input: &str) -> Result<u32, &'static str> {
    let calories: u32 = input.trim().parse().map_err(|_| "calories-invalid")?;

    if !(1..=10_000).contains(&calories) {
        return Err("calories-out-of-range");
    }

    Ok(calories)
}

/// Validates a workout activity name: non-empty, at most 100 characters.
pub fn validate_activity(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err("activity-empty");
    }

    if trimmed.len() > 100 {
        return Err("activity-too-long");
    }

    Ok(trimmed.to_string())
}

/// Validates a workout duration in minutes, 1-1440.
pub fn validate_duration_min(input: &str) -> Result<u32, &'static str> {
    let duration: u32 = input.trim().parse().map_err(|_| "duration-invalid")?;

    if !(1..=1440).contains(&duration) {
        return Err("duration-out-of-range");
    }

    Ok(duration)
}

/// Parse a decimal number, accepting a comma as decimal separator.
fn parse_decimal(input: &str) -> Option<f64> {
    input.trim().replace(',', ".").parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_validation() {
        assert_eq!(validate_username("alice").unwrap(), "alice");
        assert_eq!(validate_username("  bob_99  ").unwrap(), "bob_99");

        assert!(validate_username("ab").is_err());
        assert!(validate_username("name with spaces").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("hunter42x").is_ok());

        assert_eq!(validate_password("short1").unwrap_err(), "password-too-short");
        assert_eq!(
            validate_password(&"a1".repeat(40)).unwrap_err(),
            "password-too-long"
        );
        assert_eq!(
            validate_password("lettersonly").unwrap_err(),
            "password-too-weak"
        );
        assert_eq!(validate_password("12345678").unwrap_err(), "password-too-weak");
    }

    #[test]
    fn test_numeric_range_validation() {
        assert_eq!(validate_age("30").unwrap(), 30);
        assert_eq!(validate_age("12").unwrap_err(), "age-out-of-range");
        assert_eq!(validate_age("abc").unwrap_err(), "age-invalid");

        assert_eq!(validate_height_cm("172,5").unwrap(), 172.5);
        assert_eq!(validate_height_cm("90").unwrap_err(), "height-out-of-range");

        assert_eq!(validate_weight_kg("72.5").unwrap(), 72.5);
        assert_eq!(validate_weight_kg("20").unwrap_err(), "weight-out-of-range");
    }

    #[test]
    fn test_goal_parsing() {
        assert_eq!(parse_goal("lose").unwrap(), Goal::Lose);
        assert_eq!(parse_goal("MAINTAIN").unwrap(), Goal::Maintain);
        assert_eq!(parse_goal("3").unwrap(), Goal::Gain);
        assert!(parse_goal("bulk").is_err());
    }
}
