//! In-terminal toast alerts

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

/// How long a toast stays visible
pub const TOAST_AUTO_CLOSE: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
}

/// A dismissible alert shown to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    #[serde(with = "millis")]
    pub auto_close: Duration,
    pub shown_at: DateTime<Utc>,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
            auto_close: TOAST_AUTO_CLOSE,
            shown_at: Utc::now(),
        }
    }

    /// Whether the toast should have been dismissed by `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let auto_close = chrono::Duration::from_std(self.auto_close)
            .unwrap_or_else(|_| chrono::Duration::zero());
        now >= self.shown_at + auto_close
    }
}

/// Something that can display toasts
pub trait NotificationSink {
    fn show(&mut self, toast: Toast);

    /// Drop toasts whose auto-close time has passed
    fn dismiss_expired(&mut self, _now: DateTime<Utc>) {}
}

/// Prints toasts to the terminal and tracks which are still on screen
#[derive(Debug, Default)]
pub struct TerminalToastSink {
    visible: Vec<Toast>,
}

impl TerminalToastSink {
    pub fn new() -> Self {
        Self { visible: Vec::new() }
    }

    pub fn visible(&self) -> &[Toast] {
        &self.visible
    }
}

impl NotificationSink for TerminalToastSink {
    fn show(&mut self, toast: Toast) {
        info!("Toast ({:?}): {}", toast.kind, toast.message);
        println!("\n*** {} ***", toast.message);
        self.visible.push(toast);
    }

    fn dismiss_expired(&mut self, now: DateTime<Utc>) {
        self.visible.retain(|toast| {
            let expired = toast.is_expired(now);
            if expired {
                debug!("Toast dismissed: {}", toast.message);
            }
            !expired
        });
    }
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_expires_after_five_seconds() {
        let toast = Toast::success("done");
        assert_eq!(toast.auto_close, Duration::from_millis(5000));
        assert!(!toast.is_expired(toast.shown_at + chrono::Duration::milliseconds(4999)));
        assert!(toast.is_expired(toast.shown_at + chrono::Duration::milliseconds(5000)));
    }

    #[test]
    fn terminal_sink_dismisses_expired_toasts() {
        let mut sink = TerminalToastSink::new();
        let toast = Toast::success("first");
        let shown_at = toast.shown_at;
        sink.show(toast);
        assert_eq!(sink.visible().len(), 1);

        sink.dismiss_expired(shown_at + chrono::Duration::seconds(1));
        assert_eq!(sink.visible().len(), 1);

        sink.dismiss_expired(shown_at + chrono::Duration::seconds(6));
        assert!(sink.visible().is_empty());
    }

    #[test]
    fn toast_serializes_auto_close_in_millis() {
        let json = serde_json::to_value(Toast::success("x")).unwrap();
        assert_eq!(json["auto_close"], 5000);
        assert_eq!(json["kind"], "success");
    }
}
