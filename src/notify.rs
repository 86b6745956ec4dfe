//! User-visible notification contract
//!
//! Mutations report their outcome through a [`Notifier`]; the surface that
//! renders toasts/banners is outside this crate.

/// Kind of a user-visible notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

/// Fire-and-forget notification sink
///
/// Implementations must not block; no return value is consumed.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}

/// Notifier that routes messages to the `log` facade (default)
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Success => log::info!("notification: {message}"),
            NotificationKind::Warning => log::warn!("notification: {message}"),
            NotificationKind::Error => log::error!("notification: {message}"),
        }
    }
}

/// Notifier that drops everything
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _kind: NotificationKind, _message: &str) {}
}
