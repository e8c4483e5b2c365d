//! Desktop Notifications
//!
//! Delivers notifications through whatever the platform offers: `osascript`
//! on macOS, `notify-send` on Linux. Everything is best-effort; on failure
//! the message falls back to the console and the trade path moves on.

use async_trait::async_trait;
use tokio::process::Command;

use crate::ports::notify::{Notification, NotificationSink, NotifyError};

/// Notification sink backed by the platform's desktop notifier
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }

    #[cfg(target_os = "macos")]
    async fn deliver(&self, n: &Notification) -> Result<(), NotifyError> {
        let mut script = format!(
            "display notification {} with title {}",
            applescript_quote(&n.message),
            applescript_quote(&n.title),
        );
        if let Some(ref subtitle) = n.subtitle {
            script.push_str(&format!(" subtitle {}", applescript_quote(subtitle)));
        }
        if let Some(ref sound) = n.sound {
            script.push_str(&format!(" sound name {}", applescript_quote(sound)));
        }
        run_command(Command::new("osascript").arg("-e").arg(script)).await
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    async fn deliver(&self, n: &Notification) -> Result<(), NotifyError> {
        let body = match n.subtitle {
            Some(ref subtitle) => format!("{}\n{}", subtitle, n.message),
            None => n.message.clone(),
        };
        run_command(Command::new("notify-send").arg(&n.title).arg(body)).await
    }

    #[cfg(not(unix))]
    async fn deliver(&self, _n: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Unsupported)
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for DesktopNotifier {
    async fn notify(&self, notification: &Notification) -> bool {
        match self.deliver(notification).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "desktop notification failed, using console");
                println!("[{}] {}", notification.title, notification.message);
                false
            }
        }
    }
}

#[allow(dead_code)]
async fn run_command(command: &mut Command) -> Result<(), NotifyError> {
    let status = command
        .status()
        .await
        .map_err(|e| NotifyError::Command(e.to_string()))?;
    if status.success() {
        Ok(())
    } else {
        Err(NotifyError::Command(format!("exit status {}", status)))
    }
}

#[cfg(target_os = "macos")]
fn applescript_quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
