//! Notification Sink Port
//!
//! Best-effort user notifications. Delivery failure is always non-fatal: the
//! trait reports a delivered flag and sinks degrade internally, never
//! surfacing errors into the trade path.

use async_trait::async_trait;
use thiserror::Error;

/// Delivery failure inside a sink implementation. Callers never see this
/// through the trait; sinks catch it and fall back to the console.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification command failed: {0}")]
    Command(String),
    #[error("No notification mechanism available on this platform")]
    Unsupported,
}

#[derive(Debug, Clone, Default)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub subtitle: Option<String>,
    pub sound: Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            subtitle: None,
            sound: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a notification, returning whether it was actually delivered.
    /// Must never block trade completion and never error through.
    async fn notify(&self, notification: &Notification) -> bool;
}
