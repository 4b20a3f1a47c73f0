//! Mindful — wellness check-in client core.

pub mod api;
pub mod app;
pub mod auth;
pub mod chat;
pub mod checkin;
pub mod config;
pub mod error;
pub mod markdown;
pub mod transcript;
