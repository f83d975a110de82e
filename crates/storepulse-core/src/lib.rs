//! storepulse-core: client core for the storepulse Shopify analytics backend.
//!
//! The library is built around three pieces:
//!
//! - [`auth::SessionStore`] - persisted credentials (token + cached tenant)
//! - [`api::ApiClient`] - authenticated REST dispatch with centralized
//!   error classification
//! - [`auth::SessionController`] - the authentication state machine
//!
//! A consuming surface wires them together through
//! [`auth::SessionController::new`], calls `initialize()` once at startup,
//! and uses the controller for the auth lifecycle and `controller.api()` for
//! everything else.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod notify;
pub mod utils;

pub use api::{ApiClient, ApiError, AuthApi, DashboardSnapshot, FieldError};
pub use auth::{
    FileSessionStore, MemorySessionStore, SessionController, SessionSnapshot, SessionStore,
};
pub use config::Config;
pub use models::Tenant;
pub use notify::{LogNotifier, Navigator, NoopNavigator, Notifier, SessionSink};
