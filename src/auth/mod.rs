//! Authentication state — the signed-in user and their bearer token.
//!
//! `AuthStore` replaces a global session singleton: it is created once by the
//! application, restored from disk on startup, and handed by `Arc` to the
//! API client.

pub mod model;
pub mod store;

pub use model::User;
pub use store::AuthStore;
