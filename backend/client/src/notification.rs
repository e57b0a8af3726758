//! Transient success/error notifications.

use std::time::{Duration, Instant};

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind, shown_at: Instant) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at,
        }
    }

    /// Visible from `shown_at` until the TTL elapses.
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < NOTIFICATION_TTL
    }
}
