// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coach backend API client.
//!
//! One method per endpoint. Every non-success status is turned into
//! [`ClientError::Api`] with the message extracted from the response body.

use crate::config::Config;
use crate::error::{extract_error_message, ClientError, Result};
use crate::models::ad::{DailyAdRequest, DailyAdResponse};
use crate::models::machine::IdentifyRequest;
use crate::models::plan::{MealPlanResponse, WorkoutPlanResponse};
use crate::models::preferences::PreferencesRequest;
use crate::models::session::AuthResponse;
use crate::models::subscription::SetSubscriptionRequest;
use crate::models::{
    Credentials, DailyAd, Diet, Goal, HealthResponse, Level, MachineGuide, MessageResponse,
    StoredPreferences, Subscription, Tier, UserId,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Coach API client.
#[derive(Clone)]
pub struct CoachApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoachApiClient {
    /// Create a client for the configured base URL.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Transport(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base.clone(),
        })
    }

    /// Create an account.
    pub async fn register(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let url = format!("{}/users", self.base_url);
        self.post_json(&url, &credentials.register_request()).await
    }

    /// Log into an existing account.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let url = format!("{}/login", self.base_url);
        self.post_json(&url, &credentials.login_request()).await
    }

    /// Create or replace a user's preferences.
    pub async fn set_preferences(&self, request: &PreferencesRequest) -> Result<MessageResponse> {
        let url = format!("{}/preferences", self.base_url);
        self.post_ack(&url, request).await
    }

    /// Fetch a user's stored preferences.
    pub async fn get_preferences(&self, user_id: UserId) -> Result<StoredPreferences> {
        let url = format!("{}/preferences/{}", self.base_url, user_id);
        self.get_json(&url, &[]).await
    }

    /// Get the workout plan for a goal and level.
    pub async fn workout_plan(
        &self,
        user_id: UserId,
        goal: Goal,
        level: Level,
    ) -> Result<WorkoutPlanResponse> {
        let url = format!("{}/plan/workouts", self.base_url);
        self.get_json(
            &url,
            &[
                ("user_id", user_id.to_string()),
                ("goal", goal.to_string()),
                ("level", level.to_string()),
            ],
        )
        .await
    }

    /// Get the meal plan for a goal and diet.
    pub async fn meal_plan(
        &self,
        user_id: UserId,
        goal: Goal,
        diet: Diet,
    ) -> Result<MealPlanResponse> {
        let url = format!("{}/plan/meals", self.base_url);
        self.get_json(
            &url,
            &[
                ("user_id", user_id.to_string()),
                ("goal", goal.to_string()),
                ("diet_type", diet.to_string()),
            ],
        )
        .await
    }

    /// Look up a machine guide from recognition labels.
    pub async fn identify_machine(&self, labels: &[&str]) -> Result<MachineGuide> {
        let url = format!("{}/machines/identify", self.base_url);
        let body = IdentifyRequest {
            labels: labels.to_vec(),
        };
        self.post_json(&url, &body).await
    }

    /// Request today's advertisement.
    pub async fn daily_ad(&self, user_id: UserId) -> Result<DailyAd> {
        let url = format!("{}/ads/daily", self.base_url);
        let raw: DailyAdResponse = self.post_json(&url, &DailyAdRequest { user_id }).await?;
        DailyAd::try_from(raw)
    }

    /// Get the authoritative subscription state.
    pub async fn get_subscription(&self, user_id: UserId) -> Result<Subscription> {
        let url = format!("{}/subscription/{}", self.base_url, user_id);
        self.get_json(&url, &[]).await
    }

    /// Request a tier change. The response is an acknowledgement only.
    pub async fn set_subscription(&self, user_id: UserId, tier: Tier) -> Result<MessageResponse> {
        let url = format!("{}/subscription", self.base_url);
        self.post_ack(&url, &SetSubscriptionRequest { user_id, tier }).await
    }

    /// Backend liveness check.
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        self.get_json(&url, &[]).await
    }

    /// GET with query parameters and a JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// POST a JSON body and parse a JSON response.
    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        tracing::debug!(url, "POST");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// POST where only success matters; a missing or odd body is fine.
    async fn post_ack<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<MessageResponse> {
        tracing::debug!(url, "POST");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let body = self.check_response(response).await?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    /// Check response status, returning the body text on success.
    ///
    /// A body that cannot be read is a transport failure on success; on an
    /// error status it only costs the message.
    async fn check_response(&self, response: reqwest::Response) -> Result<String> {
        let status = response.status();

        if status.is_success() {
            return response.text().await.map_err(|e| {
                ClientError::Transport(format!("Failed to read response body: {}", e))
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body);
        tracing::warn!(status = status.as_u16(), error = %message, "Coach API request rejected");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let body = self.check_response(response).await?;
        serde_json::from_str(&body)
            .map_err(|e| ClientError::Decode(format!("JSON parse error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one request with a 200 whose body is cut off after the headers
    /// promised more.
    async fn truncated_body_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request_complete(&request) {
                    break;
                }
            }
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                      content-length: 64\r\n\r\n{\"status\": \"o",
                )
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/api", addr)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= end + 4 + length
    }

    fn client(base: &str) -> CoachApiClient {
        CoachApiClient::new(&Config::with_api_base(base).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_truncated_success_body_is_transport_error() {
        let base = truncated_body_server().await;

        let err = client(&base).health().await.unwrap_err();
        assert!(
            matches!(&err, ClientError::Transport(msg) if msg.contains("response body")),
            "unexpected error: {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_truncated_acknowledgement_is_not_success() {
        let base = truncated_body_server().await;

        let err = client(&base)
            .set_subscription(1, Tier::Premium)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
