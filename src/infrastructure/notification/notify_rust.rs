//! Desktop notification adapter using notify-rust

use async_trait::async_trait;
use notify_rust::{Notification, Timeout};

use crate::application::ports::{NotificationError, NotificationIcon, Notifier};

/// Application name shown by the notification daemon
const APP_NAME: &str = "Camclip";

/// How long informational notifications stay visible
const INFO_TIMEOUT_MS: u32 = 4000;

/// Desktop notifier using notify-rust
pub struct NotifyRustNotifier {
    app_name: String,
}

impl NotifyRustNotifier {
    pub fn new() -> Self {
        Self::with_app_name(APP_NAME)
    }

    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    /// Errors stay on screen until dismissed
    fn timeout_for(icon: NotificationIcon) -> Timeout {
        match icon {
            NotificationIcon::Error => Timeout::Never,
            _ => Timeout::Milliseconds(INFO_TIMEOUT_MS),
        }
    }

    fn build(&self, title: &str, message: &str, icon: NotificationIcon) -> Notification {
        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(title)
            .body(message)
            .icon(icon.icon_name())
            .timeout(Self::timeout_for(icon));

        #[cfg(all(unix, not(target_os = "macos")))]
        if icon == NotificationIcon::Error {
            notification.urgency(notify_rust::Urgency::Critical);
        }

        notification
    }
}

impl Default for NotifyRustNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NotifyRustNotifier {
    async fn notify(
        &self,
        title: &str,
        message: &str,
        icon: NotificationIcon,
    ) -> Result<(), NotificationError> {
        let notification = self.build(title, message, icon);

        // Talking to the notification daemon blocks
        tokio::task::spawn_blocking(move || {
            notification
                .show()
                .map(|_| ())
                .map_err(|e| NotificationError::SendFailed(e.to_string()))
        })
        .await
        .map_err(|e| NotificationError::SendFailed(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_app_name() {
        assert_eq!(NotifyRustNotifier::default().app_name, "Camclip");
    }

    #[test]
    fn custom_app_name() {
        let notifier = NotifyRustNotifier::with_app_name("TestApp");
        assert_eq!(notifier.app_name, "TestApp");
    }

    #[test]
    fn errors_never_time_out() {
        assert_eq!(
            NotifyRustNotifier::timeout_for(NotificationIcon::Error),
            Timeout::Never
        );
        assert_eq!(
            NotifyRustNotifier::timeout_for(NotificationIcon::Recording),
            Timeout::Milliseconds(INFO_TIMEOUT_MS)
        );
    }

    #[test]
    fn build_sets_summary_and_body() {
        let notification = NotifyRustNotifier::new().build(
            "Camera unavailable",
            "in-use",
            NotificationIcon::Error,
        );
        assert_eq!(notification.summary, "Camera unavailable");
        assert_eq!(notification.body, "in-use");
        assert_eq!(notification.appname, "Camclip");
    }
}
