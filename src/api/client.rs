//! BackendClient — reqwest-based client for the Mindful REST API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::AuthStore;
use crate::config::ClientConfig;
use crate::error::ApiError;

use super::service::AnalysisService;
use super::types::{
    AnalysisOutcome, AnalysisResponse, AuthResponse, CheckInPayload, ErrorBody, HistoryPage,
    LoginRequest, MessageAnalysisRequest, MetricsEntry, RegisterRequest,
};

/// HTTP client for the backend. Authorized calls take the bearer token from
/// the injected [`AuthStore`].
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    auth: Arc<AuthStore>,
}

impl BackendClient {
    pub fn new(config: &ClientConfig, auth: Arc<AuthStore>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the bearer token, failing before any I/O if there is none.
    async fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.auth.token().await.ok_or(ApiError::MissingCredential)?;
        Ok(builder.bearer_auth(token.expose_secret()))
    }

    /// `POST auth/login`.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let resp = self
            .client
            .post(self.url("auth/login"))
            .json(request)
            .send()
            .await?;
        decode(resp, "login").await
    }

    /// `POST auth/register`.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let resp = self
            .client
            .post(self.url("auth/register"))
            .json(request)
            .send()
            .await?;
        decode(resp, "register").await
    }

    /// `GET analysis/history` — newest first.
    pub async fn history(&self, page: u32, size: u32) -> Result<HistoryPage, ApiError> {
        let builder = self
            .client
            .get(self.url("analysis/history"))
            .query(&[("page", page), ("size", size)]);
        let resp = self.authorized(builder).await?.send().await?;
        decode(resp, "history").await
    }

    /// `GET analysis/metrics`, optionally bounded by ISO dates.
    pub async fn metrics(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<MetricsEntry>, ApiError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(start) = start_date {
            query.push(("startDate", start));
        }
        if let Some(end) = end_date {
            query.push(("endDate", end));
        }
        let builder = self
            .client
            .get(self.url("analysis/metrics"))
            .query(&query);
        let resp = self.authorized(builder).await?.send().await?;
        decode(resp, "metrics").await
    }

    async fn analyze<B: Serialize + ?Sized>(
        &self,
        body: &B,
        what: &str,
    ) -> Result<AnalysisOutcome, ApiError> {
        let builder = self.client.post(self.url("analysis/analyze")).json(body);
        let resp = self.authorized(builder).await?.send().await?;
        let parsed: AnalysisResponse = decode(resp, what).await?;
        let outcome = AnalysisOutcome::from(parsed);
        if let AnalysisOutcome::Failure { error } = &outcome {
            warn!(what, error = %error, "Backend reported unsuccessful analysis");
        }
        Ok(outcome)
    }
}

#[async_trait]
impl AnalysisService for BackendClient {
    async fn submit_check_in(&self, payload: &CheckInPayload) -> Result<AnalysisOutcome, ApiError> {
        self.analyze(payload, "check-in").await
    }

    async fn analyze_message(&self, text: &str) -> Result<AnalysisOutcome, ApiError> {
        let body = MessageAnalysisRequest {
            user_text: text.to_string(),
        };
        self.analyze(&body, "message").await
    }
}

/// Turn a response into `T`, or an [`ApiError::Status`] carrying the
/// server's `{error}` message when the status is not 2xx.
async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        debug!(what, status = status.as_u16(), "Backend request failed");
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(format!("{what}: {e}")))
}
