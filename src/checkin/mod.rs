//! Guided daily check-in.
//!
//! The check-in is a structured conversation: five 1–5 ratings, then three
//! open questions, then a submission to the analysis service. Every prompt,
//! answer and result lands in the shared transcript in causal order.

pub mod flow;
pub mod questions;
pub mod session;
pub mod state;
pub mod submission;

pub use flow::{ActionOutcome, CheckInFlow, IgnoreReason};
pub use questions::{OPEN_QUESTIONS, RATING_QUESTIONS};
pub use session::{CheckInSession, OpenSlot, Rating, RatingDimension};
pub use state::CheckInStep;
pub use submission::{CheckInSubmitter, SubmitFailure};
