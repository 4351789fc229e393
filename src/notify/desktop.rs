//! Desktop-level notifications

use notify_rust::Notification;
use tracing::debug;

/// Whether the hosting environment lets us raise desktop notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// An OS notification channel. Asking for permission is the caller's business;
/// implementations only report what was decided.
pub trait DesktopNotifier {
    fn permission(&self) -> Permission;
    fn notify(&mut self, title: &str, body: &str) -> Result<(), String>;
}

/// Sends notifications through the desktop notification daemon
#[derive(Debug, Clone)]
pub struct SystemNotifier {
    app_name: String,
    permission: Permission,
}

impl SystemNotifier {
    pub fn new(app_name: impl Into<String>, granted: bool) -> Self {
        Self {
            app_name: app_name.into(),
            permission: if granted { Permission::Granted } else { Permission::Denied },
        }
    }
}

impl DesktopNotifier for SystemNotifier {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<(), String> {
        debug!("Raising desktop notification: {}", title);
        Notification::new()
            .summary(title)
            .body(body)
            .appname(&self.app_name)
            .icon("alarm-clock")
            .show()
            .map(|_| ())
            .map_err(|e| format!("Failed to show desktop notification: {}", e))
    }
}
