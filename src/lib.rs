//! # Diabetrack
//!
//! Client for a personal diabetes-management service: account and session
//! handling, glucose readings, medications, meals, BMI and education tips.
//! Authentication, BMI computation and persistence live on a remote HTTP
//! API; this crate caches the session locally and keeps everything else
//! in explicit view state.
//!
//! ## Modules
//!
//! - [`storage`]: local key/value client storage (file or memory)
//! - [`api`]: the remote API capability and its reqwest client
//! - [`session`]: the session store, the single owner of credential,
//!   profile and tips
//! - [`classify`]: glucose classification by meal context
//! - [`checklist`]: locally persisted onboarding checklist
//! - [`validation`]: per-form validators
//! - [`router`]: route table and auth guard
//! - [`views`]: per-screen state objects
//! - [`config`]: TOML config with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use diabetrack::api::{ApiClient, ApiClientConfig, HealthApi, LoginRequest};
//! use diabetrack::session::{Session, SessionStore};
//! use diabetrack::storage::{ClientStorage, FileStorage};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage: Arc<dyn ClientStorage> = Arc::new(FileStorage::open("session.json")?);
//!     let api: Arc<dyn HealthApi> = Arc::new(ApiClient::new(ApiClientConfig::default())?);
//!
//!     let session = SessionStore::new(storage, api);
//!     session.restore().await;
//!
//!     if !session.is_authed() {
//!         session
//!             .login(&LoginRequest {
//!                 email: "a@b.com".to_string(),
//!                 password: "secret1".to_string(),
//!             })
//!             .await?;
//!     }
//!
//!     println!("Hello, {}", session.profile().map(|p| p.name).unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod checklist;
pub mod classify;
pub mod config;
pub mod models;
pub mod router;
pub mod session;
pub mod storage;
pub mod validation;
pub mod views;

#[cfg(test)]
mod test_support;

pub use checklist::{ChecklistTask, ChecklistTracker};
pub use classify::{classify, Classification, GlucoseStatus, SeverityColor};
pub use config::Config;
pub use router::{resolve, Route};
pub use session::{RestoreOutcome, Session, SessionStore};
