//! The analysis collaborator seam.

use async_trait::async_trait;

use crate::error::ApiError;

use super::types::{AnalysisOutcome, CheckInPayload};

/// Turns user input into narrative feedback.
///
/// `Err` means the call itself failed (no credential, transport, non-2xx).
/// `Ok(AnalysisOutcome::Failure)` means the backend answered but could not
/// analyze.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Submit a completed check-in.
    async fn submit_check_in(&self, payload: &CheckInPayload) -> Result<AnalysisOutcome, ApiError>;

    /// Analyze a single free-form message.
    async fn analyze_message(&self, text: &str) -> Result<AnalysisOutcome, ApiError>;
}
