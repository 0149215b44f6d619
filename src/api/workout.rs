//! Typed client for the workout service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{decode_response, join_url, ApiError, AuthResponse, Credentials};

/// A single workout entry to store.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutRequest {
    pub activity: String,
    pub duration_min: u32,
    pub performed_at: DateTime<Utc>,
}

/// A stored workout entry as echoed back by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutResponse {
    pub id: i64,
    pub activity: String,
    pub duration_min: u32,
    pub performed_at: DateTime<Utc>,
}

/// HTTP client for the workout service.
pub struct WorkoutClient {
    http: reqwest::Client,
    base_url: String,
}

impl WorkoutClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Register a new account. The workout service only needs credentials.
    pub async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let url = join_url(&self.base_url, "/api/v1/auth/register");
        debug!(%url, username = %credentials.username, "Registering workout account");

        let response = self.http.post(&url).json(credentials).send().await?;
        decode_response(response).await
    }

    /// Exchange credentials for an auth token.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let url = join_url(&self.base_url, "/api/v1/auth/login");
        debug!(%url, username = %credentials.username, "Logging in to workout service");

        let response = self.http.post(&url).json(credentials).send().await?;
        decode_response(response).await
    }

    /// Store a workout entry for the authenticated user.
    pub async fn save_workout(
        &self,
        token: &str,
        request: &WorkoutRequest,
    ) -> Result<WorkoutResponse, ApiError> {
        let url = join_url(&self.base_url, "/api/v1/workouts");
        debug!(%url, activity = %request.activity, "Saving workout entry");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        decode_response(response).await
    }
}
