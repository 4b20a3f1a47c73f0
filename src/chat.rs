//! Free-form chat: one message in, one analysis reply out.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::api::{AnalysisOutcome, AnalysisService};
use crate::checkin::submission::numbered_recommendations;
use crate::error::ApiError;
use crate::transcript::Transcript;

/// Substituted when a successful analysis carries no usable content.
pub const CHAT_ACK_MESSAGE: &str = "Thanks for sharing. I've noted how your day is going.";

/// Shown when a message could not be analyzed.
pub const CHAT_FAILED_MESSAGE: &str =
    "Sorry, I couldn't reply to that right now. Please try sending your message again.";

/// Sends free-form messages for analysis and writes both sides into the
/// transcript.
pub struct FreeChat {
    service: Arc<dyn AnalysisService>,
    transcript: Arc<Transcript>,
    timeout: Option<Duration>,
}

impl FreeChat {
    pub fn new(
        service: Arc<dyn AnalysisService>,
        transcript: Arc<Transcript>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            service,
            transcript,
            timeout,
        }
    }

    pub fn transcript(&self) -> &Arc<Transcript> {
        &self.transcript
    }

    /// Send one message. Returns `false` if the text was empty and nothing
    /// happened.
    pub async fn send_message(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.transcript.append_user(text).await;

        let call = self.service.analyze_message(text);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or(Err(ApiError::Timeout(limit))),
            None => call.await,
        };

        let reply = match result {
            Ok(outcome @ AnalysisOutcome::Success { .. }) => {
                info!("Message analysis received");
                reply_text(&outcome).unwrap_or_else(|| CHAT_ACK_MESSAGE.to_string())
            }
            Ok(AnalysisOutcome::Failure { error }) => {
                warn!(error = %error, "Message analysis rejected");
                CHAT_FAILED_MESSAGE.to_string()
            }
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "Message analysis failed");
                CHAT_FAILED_MESSAGE.to_string()
            }
        };
        self.transcript.append_agent(reply).await;
        true
    }
}

/// Analysis text, `Day rating: N/10`, then the numbered recommendations.
fn reply_text(outcome: &AnalysisOutcome) -> Option<String> {
    let AnalysisOutcome::Success {
        analysis_text,
        recommendations,
        day_rating,
    } = outcome
    else {
        return None;
    };

    let mut parts = Vec::new();
    if let Some(text) = analysis_text {
        parts.push(text.clone());
    }
    if let Some(rating) = day_rating {
        parts.push(format!("**Day rating:** {rating}/10"));
    }
    if let Some(list) = numbered_recommendations(recommendations) {
        parts.push(list);
    }
    (!parts.is_empty()).then(|| parts.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::api::CheckInPayload;
    use crate::transcript::Origin;

    struct Scripted {
        result: Mutex<Option<Result<AnalysisOutcome, ApiError>>>,
        seen: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(result: Result<AnalysisOutcome, ApiError>) -> Arc<Self> {
            Arc::new(Self {
                result: Mutex::new(Some(result)),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AnalysisService for Scripted {
        async fn submit_check_in(&self, _: &CheckInPayload) -> Result<AnalysisOutcome, ApiError> {
            unimplemented!("not used in chat tests")
        }

        async fn analyze_message(&self, text: &str) -> Result<AnalysisOutcome, ApiError> {
            self.seen.lock().unwrap().push(text.to_string());
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(ApiError::InvalidResponse("no result queued".into())))
        }
    }

    fn chat(service: Arc<Scripted>) -> FreeChat {
        FreeChat::new(service, Transcript::new(), None)
    }

    #[tokio::test]
    async fn empty_message_is_ignored() {
        let service = Scripted::new(Err(ApiError::MissingCredential));
        let chat = chat(service.clone());
        assert!(!chat.send_message("   ").await);
        assert!(chat.transcript().is_empty().await);
        assert!(service.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn success_appends_user_then_reply() {
        let service = Scripted::new(Ok(AnalysisOutcome::Success {
            analysis_text: Some("Sounds like a full day.".into()),
            recommendations: vec!["Take a break".into()],
            day_rating: Some(6),
        }));
        let chat = chat(service.clone());
        assert!(chat.send_message(" long day at work ").await);

        assert_eq!(service.seen.lock().unwrap().as_slice(), ["long day at work"]);
        let entries = chat.transcript().entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].origin, Origin::User);
        assert_eq!(entries[1].origin, Origin::Agent);

        let reply = &entries[1].text;
        let text = reply.find("Sounds like").unwrap();
        let rating = reply.find("6/10").unwrap();
        let rec = reply.find("1. Take a break").unwrap();
        assert!(text < rating && rating < rec);
    }

    #[tokio::test]
    async fn failure_appends_retry_message() {
        let chat = chat(Scripted::new(Ok(AnalysisOutcome::Failure {
            error: "nope".into(),
        })));
        chat.send_message("hello").await;
        assert_eq!(chat.transcript().last().await.unwrap().text, CHAT_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn transport_error_appends_retry_message() {
        let chat = chat(Scripted::new(Err(ApiError::MissingCredential)));
        chat.send_message("hello").await;
        let entries = chat.transcript().entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].text, CHAT_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn failure_message_does_not_mention_check_in() {
        let chat = chat(Scripted::new(Err(ApiError::MissingCredential)));
        chat.send_message("hello").await;
        let reply = chat.transcript().last().await.unwrap().text;
        assert!(!reply.contains("check-in"));
        assert!(!reply.contains("last answer"));
    }

    #[tokio::test]
    async fn empty_success_uses_chat_acknowledgment() {
        let chat = chat(Scripted::new(Ok(AnalysisOutcome::Success {
            analysis_text: None,
            recommendations: vec![],
            day_rating: None,
        })));
        chat.send_message("ok").await;
        let reply = chat.transcript().last().await.unwrap().text;
        assert_eq!(reply, CHAT_ACK_MESSAGE);
        assert!(!reply.contains("check-in"));
    }

    #[test]
    fn reply_without_content_is_none() {
        let outcome = AnalysisOutcome::Success {
            analysis_text: None,
            recommendations: vec![],
            day_rating: None,
        };
        assert!(reply_text(&outcome).is_none());
    }
}
