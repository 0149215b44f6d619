//! UI Builder module for formatting bot replies

use crate::api::nutrition::DailySummary;
use crate::localization::{t_args_lang, t_lang};

/// Render the collected registration answers shown before the goal question.
pub fn format_registration_recap(
    username: &str,
    email: &str,
    age: u32,
    height_cm: f64,
    weight_kg: f64,
    language_code: Option<&str>,
) -> String {
    format!(
        "📋 {}\n• {}: {}\n• {}: {}\n• {}: {}\n• {}: {} cm\n• {}: {} kg",
        t_lang("register-recap-title", language_code),
        t_lang("recap-username", language_code),
        username,
        t_lang("recap-email", language_code),
        email,
        t_lang("recap-age", language_code),
        age,
        t_lang("recap-height", language_code),
        height_cm,
        t_lang("recap-weight", language_code),
        weight_kg,
    )
}

/// Render one day's calorie summary.
pub fn format_daily_summary(summary: &DailySummary, language_code: Option<&str>) -> String {
    format!(
        "📊 {}\n{}",
        t_args_lang(
            "summary-title",
            &[("date", &summary.date.format("%Y-%m-%d").to_string())],
            language_code,
        ),
        t_args_lang(
            "summary-body",
            &[
                ("calories", &summary.total_calories.to_string()),
                ("meals", &summary.meal_count.to_string()),
            ],
            language_code,
        ),
    )
}
