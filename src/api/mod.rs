//! REST backend integration.
//!
//! `AnalysisService` is the seam the conversational flows depend on;
//! `BackendClient` is its HTTP implementation and also covers login,
//! registration, history and metrics retrieval.

pub mod client;
pub mod service;
pub mod types;

pub use client::BackendClient;
pub use service::AnalysisService;
pub use types::{
    AnalysisOutcome, AnalysisResponse, AuthResponse, CheckInPayload, HistoryItem, HistoryPage,
    LoginRequest, MetricsEntry, RegisterRequest,
};
