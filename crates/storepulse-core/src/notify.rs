//! Side-effect seams between the core and whatever surface hosts it.
//!
//! The web dashboard this backend was built for surfaces these as toasts and
//! a redirect to the login page; the CLI prints them. Tests substitute
//! recording fakes.

/// User-visible, dismissible notifications.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Navigation to the login surface after a session ends.
pub trait Navigator: Send + Sync {
    fn to_login(&self);
}

/// Typed signal the API client raises when a response proves the session is
/// no longer valid. The session controller owns the resulting logout cascade;
/// the data layer itself never touches storage or navigation.
pub trait SessionSink: Send + Sync {
    fn session_invalidated(&self);
}

/// Notifier that routes messages into the tracing pipeline. Useful for
/// headless consumers where there is no interactive surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        tracing::info!(%message, "notice");
    }

    fn error(&self, message: &str) {
        tracing::warn!(%message, "notice");
    }
}

/// Navigator for surfaces with nowhere to navigate; logs the request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn to_login(&self) {
        tracing::debug!("Navigation to login surface requested");
    }
}
