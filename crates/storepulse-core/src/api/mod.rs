//! REST API client module for the storepulse backend.
//!
//! The backend uses opaque bearer tokens obtained through `/auth/login` and
//! `/auth/register`; every other endpoint requires the token. Cross-cutting
//! error handling (401 session invalidation, 403/5xx notifications) lives
//! here so individual call sites only deal with their own failures.

pub mod client;
pub mod error;

pub use client::{ApiClient, AuthApi, DashboardSnapshot};
pub use error::{ApiError, FieldError};
