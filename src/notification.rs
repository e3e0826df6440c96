//! Short-lived user-facing notifications.

use core::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::ShopError;

/// How long a notification stays visible.
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(5);

/// Visual category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// An operation completed.
    Success,
    /// An operation failed.
    Error,
    /// Neutral information.
    Info,
    /// Something needs attention.
    Warning,
}

/// A message raised for the user at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Category.
    pub kind: NotificationKind,
    /// Text shown to the user.
    pub message: String,
    /// When it was raised.
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a notification raised now.
    #[must_use]
    pub fn new<M: Into<String>>(kind: NotificationKind, message: M) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    /// Creates a success notification raised now.
    #[must_use]
    pub fn success<M: Into<String>>(message: M) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    /// Creates an error notification raised now.
    #[must_use]
    pub fn error<M: Into<String>>(message: M) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    /// Creates an error notification for a failed operation.
    ///
    /// A message the server reported keeps its text; anything else shows
    /// `fallback`.
    #[must_use]
    pub fn from_error(err: &ShopError, fallback: &str) -> Self {
        let kind = if err.is_auth() {
            NotificationKind::Warning
        } else {
            NotificationKind::Error
        };
        Self::new(kind, err.user_message(fallback))
    }

    /// Returns `true` once the notification has outlived
    /// [`NOTIFICATION_LIFETIME`] at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.raised_at)
            .to_std()
            .is_ok_and(|elapsed| elapsed >= NOTIFICATION_LIFETIME)
    }
}

impl core::fmt::Display for Notification {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_five_seconds() {
        let note = Notification::success("Your order has been received!");
        let raised = note.raised_at;
        assert!(!note.is_expired(raised));
        assert!(!note.is_expired(raised + chrono::Duration::milliseconds(4_999)));
        assert!(note.is_expired(raised + chrono::Duration::seconds(5)));
    }

    #[test]
    fn clock_skew_does_not_expire() {
        let note = Notification::error("x");
        assert!(!note.is_expired(note.raised_at - chrono::Duration::seconds(10)));
    }

    #[test]
    fn from_validation_error_keeps_server_text() {
        let err = ShopError::from_response(400, r#"{"message":"Insufficient points"}"#);
        let note = Notification::from_error(&err, "Failed to purchase voucher.");
        assert_eq!(note.kind, NotificationKind::Error);
        assert_eq!(note.to_string(), "Insufficient points");
    }

    #[test]
    fn from_unexpected_error_uses_fallback() {
        let err = ShopError::from_response(500, "boom");
        let note = Notification::from_error(&err, "Failed to place order.");
        assert_eq!(note.message, "Failed to place order.");
    }

    #[test]
    fn auth_error_is_a_warning() {
        let note = Notification::from_error(&ShopError::Unauthenticated, "x");
        assert_eq!(note.kind, NotificationKind::Warning);
    }
}
