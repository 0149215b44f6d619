//! Typed client for the nutrition service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{decode_response, join_url, ApiError, AuthResponse, Credentials};

/// Fitness goal attached to a nutrition profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

/// Body metrics collected during registration.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub goal: Goal,
}

/// Registration payload for the nutrition service.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterProfileRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub profile: Profile,
}

/// A single meal entry to store.
#[derive(Debug, Clone, Serialize)]
pub struct MealRequest {
    pub name: String,
    pub calories: u32,
    pub eaten_at: DateTime<Utc>,
}

/// A stored meal entry as echoed back by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct MealResponse {
    pub id: i64,
    pub name: String,
    pub calories: u32,
    pub eaten_at: DateTime<Utc>,
}

/// Calorie totals for one day.
#[derive(Debug, Clone, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_calories: u32,
    pub meal_count: u32,
}

/// HTTP client for the nutrition service.
pub struct NutritionClient {
    http: reqwest::Client,
    base_url: String,
}

impl NutritionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Register a new account with its nutrition profile.
    pub async fn register(
        &self,
        request: &RegisterProfileRequest,
    ) -> Result<AuthResponse, ApiError> {
        let url = join_url(&self.base_url, "/api/v1/auth/register");
        debug!(%url, username = %request.username, "Registering nutrition account");

        let response = self.http.post(&url).json(request).send().await?;
        decode_response(response).await
    }

    /// Exchange credentials for an auth token.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let url = join_url(&self.base_url, "/api/v1/auth/login");
        debug!(%url, username = %credentials.username, "Logging in to nutrition service");

        let response = self.http.post(&url).json(credentials).send().await?;
        decode_response(response).await
    }

    /// Store a meal entry for the authenticated user.
    pub async fn save_meal(
        &self,
        token: &str,
        request: &MealRequest,
    ) -> Result<MealResponse, ApiError> {
        let url = join_url(&self.base_url, "/api/v1/meals");
        debug!(%url, meal = %request.name, "Saving meal entry");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        decode_response(response).await
    }

    /// Fetch the calorie summary for one day.
    pub async fn daily_summary(
        &self,
        token: &str,
        date: NaiveDate,
    ) -> Result<DailySummary, ApiError> {
        let url = join_url(&self.base_url, "/api/v1/meals/summary");
        debug!(%url, %date, "Fetching daily summary");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("date", date.format("%Y-%m-%d").to_string())])
            .send()
            .await?;
        decode_response(response).await
    }
}
