//! Session lifecycle for the storepulse client.
//!
//! This module provides:
//! - `SessionStore`: persisted token + cached tenant, disk-backed or in-memory
//! - `SessionController`: the authentication state machine
//!
//! The controller is the sole writer of persisted credentials; the API client
//! only reads the token and raises the session-invalidated signal.

pub mod controller;
pub mod store;

pub use controller::{SessionController, SessionSnapshot};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
