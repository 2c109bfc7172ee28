//! Notification slot
//!
//! A single transient message with auto-dismiss. Pushing overwrites whatever
//! is showing and restarts the dismissal timer; nothing is queued.

use std::time::{Duration, Instant};

use super::timer::Timeout;

/// How long a notification stays on screen
pub const AUTO_DISMISS: Duration = Duration::from_millis(3000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
    pub expires_at: Instant,
}

#[derive(Clone, Debug, Default)]
pub struct NotificationQueue {
    current: Option<Notification>,
    dismiss_timer: Timeout,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed notification and restart the dismissal timer
    pub fn push(&mut self, kind: NotificationKind, text: impl Into<String>, now: Instant) {
        let text = text.into();
        tracing::debug!(?kind, %text, "notification");

        self.dismiss_timer.cancel();
        self.dismiss_timer.arm(now, AUTO_DISMISS);
        self.current = Some(Notification {
            kind,
            text,
            expires_at: now + AUTO_DISMISS,
        });
    }

    /// Close immediately (user action)
    pub fn dismiss(&mut self) {
        self.dismiss_timer.cancel();
        self.current = None;
    }

    /// Drive the dismissal timer. Returns true if the notification was removed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.dismiss_timer.fire(now) {
            self.current = None;
            return true;
        }
        false
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn dismiss_pending(&self) -> bool {
        self.dismiss_timer.is_armed()
    }

    /// Cancel the pending dismissal (teardown)
    pub fn shutdown(&mut self) {
        self.dismiss_timer.cancel();
    }
}
