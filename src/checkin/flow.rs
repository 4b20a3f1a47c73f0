//! CheckInFlow — drives the guided check-in: asks questions, records
//! answers, submits, and writes every step into the transcript.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::transcript::Transcript;

use super::questions::{
    OPEN_QUESTIONS, PROCESSING_MESSAGE, RATING_QUESTIONS, SUBMIT_FAILED_MESSAGE, rating_weight,
    ratings_done_prompt,
};
use super::session::{CheckInSession, Rating};
use super::state::CheckInStep;
use super::submission::{CheckInSubmitter, SubmitFailure};

/// Why an action was ignored. Ignored actions change nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The action is not accepted in the current step.
    WrongStep(CheckInStep),
    /// Rating outside 1..=5.
    InvalidRating(i64),
    /// Empty or whitespace-only answer.
    EmptyAnswer,
}

/// Result of a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action was applied; carries the step the flow is now in.
    Accepted(CheckInStep),
    Ignored(IgnoreReason),
}

impl ActionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// The guided check-in flow.
///
/// Actions take `&mut self`, so no input can reach the flow while a
/// submission is in flight. Observers follow progress through
/// [`CheckInFlow::watch_step`] and the shared transcript.
pub struct CheckInFlow {
    session: CheckInSession,
    transcript: Arc<Transcript>,
    submitter: CheckInSubmitter,
    step_tx: watch::Sender<CheckInStep>,
}

impl CheckInFlow {
    pub fn new(transcript: Arc<Transcript>, submitter: CheckInSubmitter) -> Self {
        let session = CheckInSession::new();
        let (step_tx, _rx) = watch::channel(session.step);
        Self {
            session,
            transcript,
            submitter,
            step_tx,
        }
    }

    /// Current step.
    pub fn step(&self) -> CheckInStep {
        self.session.step
    }

    /// Receiver that observes every step change.
    pub fn watch_step(&self) -> watch::Receiver<CheckInStep> {
        self.step_tx.subscribe()
    }

    pub fn session(&self) -> &CheckInSession {
        &self.session
    }

    pub fn transcript(&self) -> &Arc<Transcript> {
        &self.transcript
    }

    /// Discard the current session and begin a fresh one at `Welcome`.
    /// Entries already in the transcript stay.
    pub fn restart(&mut self) {
        let previous = self.session.id;
        self.session = CheckInSession::new();
        self.step_tx.send_replace(self.session.step);
        info!(previous_session = %previous, session_id = %self.session.id, "Check-in restarted");
    }

    /// Welcome → Rating: ask the first rating question.
    pub async fn start_check_in(&mut self) -> ActionOutcome {
        if self.session.step != CheckInStep::Welcome {
            return self.ignore(IgnoreReason::WrongStep(self.session.step));
        }

        self.session.rating_index = 0;
        self.transition(CheckInStep::Rating);
        let first = RATING_QUESTIONS[0].prompt;
        self.transcript.append_agent(first).await;
        info!(session_id = %self.session.id, "Check-in started");
        ActionOutcome::Accepted(self.session.step)
    }

    /// Record a rating for the current rating question.
    pub async fn submit_rating(&mut self, value: i64) -> ActionOutcome {
        if self.session.step != CheckInStep::Rating {
            return self.ignore(IgnoreReason::WrongStep(self.session.step));
        }
        let Some(rating) = Rating::new(value) else {
            return self.ignore(IgnoreReason::InvalidRating(value));
        };

        let question = RATING_QUESTIONS[self.session.rating_index];
        if !self.session.ratings.record(question.dimension, rating) {
            // Unreachable while the index only moves forward.
            warn!(
                session_id = %self.session.id,
                dimension = %question.dimension,
                "Rating slot already answered"
            );
            return self.ignore(IgnoreReason::WrongStep(self.session.step));
        }
        let weight = rating_weight(rating.value());
        self.transcript.append_user(weight).await;
        self.session.rating_index += 1;
        debug!(
            session_id = %self.session.id,
            dimension = %question.dimension,
            rating = rating.value(),
            "Rating recorded"
        );

        match RATING_QUESTIONS.get(self.session.rating_index) {
            Some(next) => {
                self.transcript.append_agent(next.prompt).await;
            }
            None => {
                self.session.open_index = 0;
                self.transition(CheckInStep::Open);
                self.transcript.append_agent(ratings_done_prompt()).await;
            }
        }
        ActionOutcome::Accepted(self.session.step)
    }

    /// Record an answer to the current open question. Answering the last one
    /// submits the check-in.
    ///
    /// After a failed submission the last question stays current: a new
    /// answer replaces the stored one and submission is attempted again.
    pub async fn submit_open_answer(&mut self, text: &str) -> ActionOutcome {
        if self.session.step != CheckInStep::Open {
            return self.ignore(IgnoreReason::WrongStep(self.session.step));
        }
        let text = text.trim();
        if text.is_empty() {
            return self.ignore(IgnoreReason::EmptyAnswer);
        }

        let index = self.session.open_index.min(OPEN_QUESTIONS.len() - 1);
        let question = OPEN_QUESTIONS[index];
        self.session.answers.record(question.slot, text);
        self.transcript.append_user(text).await;
        if self.session.open_index < OPEN_QUESTIONS.len() {
            self.session.open_index += 1;
        }
        debug!(session_id = %self.session.id, slot = %question.slot, "Open answer recorded");

        match OPEN_QUESTIONS.get(self.session.open_index) {
            Some(next) => {
                self.transcript.append_agent(next.prompt).await;
                ActionOutcome::Accepted(self.session.step)
            }
            None => self.submit().await,
        }
    }

    /// Open → Submitting, then Complete on success or back to Open on failure.
    async fn submit(&mut self) -> ActionOutcome {
        self.transition(CheckInStep::Submitting);
        self.transcript.append_agent(PROCESSING_MESSAGE).await;

        let result = match self.session.payload() {
            Some(payload) => self.submitter.submit(&payload).await,
            None => Err(SubmitFailure::Rejected("check-in is incomplete".to_string())),
        };

        match result {
            Ok(text) => {
                self.transcript.append_agent(text).await;
                self.transition(CheckInStep::Complete);
                info!(session_id = %self.session.id, "Check-in complete");
            }
            Err(e) => {
                let transient = matches!(&e, SubmitFailure::Api(api) if api.is_transient());
                warn!(
                    session_id = %self.session.id,
                    error = %e,
                    transient,
                    "Check-in submission failed"
                );
                self.transcript.append_agent(SUBMIT_FAILED_MESSAGE).await;
                self.transition(CheckInStep::Open);
            }
        }
        ActionOutcome::Accepted(self.session.step)
    }

    fn transition(&mut self, target: CheckInStep) {
        let from = self.session.step;
        if let Err(e) = self.session.advance_to(target) {
            warn!(session_id = %self.session.id, error = %e, "Rejected step transition");
            return;
        }
        self.step_tx.send_replace(target);
        debug!(session_id = %self.session.id, %from, to = %target, "Check-in step changed");
    }

    fn ignore(&self, reason: IgnoreReason) -> ActionOutcome {
        debug!(session_id = %self.session.id, step = %self.session.step, ?reason, "Action ignored");
        ActionOutcome::Ignored(reason)
    }
}
