//! Wire types for the REST backend.

use serde::{Deserialize, Serialize};

use crate::auth::User;

// ── Auth ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Response to login/register. Older backends send `userId`, newer ones `id`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(alias = "userId")]
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl AuthResponse {
    pub fn user(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

// ── Analysis ────────────────────────────────────────────────────────────

/// Completed check-in answers as sent to `POST analysis/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInPayload {
    pub calmness_rating: u8,
    pub energy_rating: u8,
    pub satisfaction_rating: u8,
    pub connection_rating: u8,
    pub engagement_rating: u8,
    pub current_state_text: String,
    pub energy_moments_text: String,
    pub missing_element_text: String,
}

/// Free-form text sent to `POST analysis/analyze`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAnalysisRequest {
    pub user_text: String,
}

/// Raw analysis response. Every field except `success` may be absent; use
/// [`AnalysisOutcome`] instead of inspecting this directly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub analysis_text: Option<String>,
    #[serde(default)]
    pub recommendations: Option<Vec<String>>,
    #[serde(default)]
    pub day_rating: Option<i32>,
    #[serde(default)]
    pub analyzed_at: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Analysis result, decided once at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Success {
        analysis_text: Option<String>,
        /// Ordered; empty when the backend sent none.
        recommendations: Vec<String>,
        day_rating: Option<i32>,
    },
    Failure {
        error: String,
    },
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<AnalysisResponse> for AnalysisOutcome {
    fn from(resp: AnalysisResponse) -> Self {
        if !resp.success {
            return Self::Failure {
                error: resp
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| "analysis failed without an error message".to_string()),
            };
        }
        Self::Success {
            analysis_text: resp.analysis_text.filter(|t| !t.trim().is_empty()),
            recommendations: resp
                .recommendations
                .unwrap_or_default()
                .into_iter()
                .filter(|r| !r.trim().is_empty())
                .collect(),
            day_rating: resp.day_rating,
        }
    }
}

// ── History & metrics ───────────────────────────────────────────────────

/// One page of `GET analysis/history`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    #[serde(default)]
    pub content: Vec<HistoryItem>,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default, alias = "totalElements")]
    pub total_items: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_previous: bool,
}

/// A stored analysis: either a check-in or a free-form message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: i64,
    #[serde(default)]
    pub is_checkin: Option<bool>,
    #[serde(default)]
    pub user_text: Option<String>,
    #[serde(default, alias = "analysisText")]
    pub llm_response: Option<String>,
    #[serde(default)]
    pub day_rating: Option<i32>,
    #[serde(default)]
    pub recommendations: Option<Vec<String>>,
    #[serde(default)]
    pub analyzed_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub calmness_rating: Option<u8>,
    #[serde(default)]
    pub energy_rating: Option<u8>,
    #[serde(default)]
    pub satisfaction_rating: Option<u8>,
    #[serde(default)]
    pub connection_rating: Option<u8>,
    #[serde(default)]
    pub engagement_rating: Option<u8>,
    #[serde(default)]
    pub current_state_text: Option<String>,
    #[serde(default)]
    pub energy_moments_text: Option<String>,
    #[serde(default)]
    pub missing_element_text: Option<String>,
}

impl HistoryItem {
    pub fn is_check_in(&self) -> bool {
        self.is_checkin.unwrap_or(self.calmness_rating.is_some())
    }

    /// The five check-in ratings in question order, if all are present.
    pub fn ratings(&self) -> Option<[u8; 5]> {
        Some([
            self.calmness_rating?,
            self.energy_rating?,
            self.satisfaction_rating?,
            self.connection_rating?,
            self.engagement_rating?,
        ])
    }
}

/// One row of `GET analysis/metrics`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsEntry {
    pub id: i64,
    #[serde(default)]
    pub analyzed_at: Option<String>,
    #[serde(default)]
    pub is_checkin: bool,
    #[serde(default)]
    pub calmness_rating: Option<u8>,
    #[serde(default)]
    pub energy_rating: Option<u8>,
    #[serde(default)]
    pub satisfaction_rating: Option<u8>,
    #[serde(default)]
    pub connection_rating: Option<u8>,
    #[serde(default)]
    pub engagement_rating: Option<u8>,
    #[serde(default)]
    pub day_rating: Option<i32>,
}

/// `{ "error": "..." }` body returned alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
