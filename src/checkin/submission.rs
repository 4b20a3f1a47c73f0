//! Submission of completed check-ins and mapping of the analysis back into
//! transcript text.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::api::{AnalysisOutcome, AnalysisService, CheckInPayload};
use crate::error::ApiError;

use super::questions::{GENERIC_ACK_MESSAGE, RECOMMENDATIONS_HEADING};

/// Why a submission did not produce a narrative.
#[derive(Debug, thiserror::Error)]
pub enum SubmitFailure {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("analysis unsuccessful: {0}")]
    Rejected(String),
}

/// Sends a payload to the analysis service, bounded by an optional timeout.
///
/// No retries happen here; the user retries by resubmitting.
pub struct CheckInSubmitter {
    service: Arc<dyn AnalysisService>,
    timeout: Option<Duration>,
}

impl CheckInSubmitter {
    pub fn new(service: Arc<dyn AnalysisService>, timeout: Option<Duration>) -> Self {
        Self { service, timeout }
    }

    /// Submit and return the agent text to append on success.
    pub async fn submit(&self, payload: &CheckInPayload) -> Result<String, SubmitFailure> {
        let call = self.service.submit_check_in(payload);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(ApiError::Timeout(limit)),
            },
            None => call.await,
        };

        match result? {
            outcome @ AnalysisOutcome::Success { .. } => {
                info!("Check-in analysis received");
                Ok(narrative(&outcome).unwrap_or_else(|| GENERIC_ACK_MESSAGE.to_string()))
            }
            AnalysisOutcome::Failure { error } => {
                warn!(error = %error, "Check-in analysis rejected");
                Err(SubmitFailure::Rejected(error))
            }
        }
    }
}

/// Analysis text followed by a 1-based numbered list of recommendations.
///
/// `None` for failures and for successes with neither field.
pub fn narrative(outcome: &AnalysisOutcome) -> Option<String> {
    let AnalysisOutcome::Success {
        analysis_text,
        recommendations,
        ..
    } = outcome
    else {
        return None;
    };

    let mut parts = Vec::new();
    if let Some(text) = analysis_text {
        parts.push(text.clone());
    }
    if let Some(list) = numbered_recommendations(recommendations) {
        parts.push(list);
    }

    (!parts.is_empty()).then(|| parts.join("\n\n"))
}

/// `**Recommendations:**` followed by `1. …`, `2. …` lines. `None` when empty.
pub fn numbered_recommendations(recommendations: &[String]) -> Option<String> {
    if recommendations.is_empty() {
        return None;
    }
    let lines: Vec<String> = recommendations
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}", i + 1, r.trim()))
        .collect();
    Some(format!("{RECOMMENDATIONS_HEADING}\n{}", lines.join("\n")))
}
