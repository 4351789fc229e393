//! Completion notifications
//!
//! When a phase ends the notifier shows one toast, plays one sound and, if
//! permitted, raises a desktop notification.

pub mod desktop;
pub mod toast;

use tracing::{debug, info, warn};

use crate::{
    state::Phase,
    timer::PhaseCompletion,
};

pub use desktop::{DesktopNotifier, Permission, SystemNotifier};
pub use toast::{NotificationSink, TerminalToastSink, Toast, ToastKind, TOAST_AUTO_CLOSE};

/// Message shown when `phase` has just ended
pub fn completion_message(phase: Phase) -> &'static str {
    match phase {
        Phase::Work => "Work session finished.",
        Phase::Break => "Break finished.",
    }
}

/// Turns phase completions into user-visible alerts and an audio cue
pub struct CompletionNotifier {
    sink: Box<dyn NotificationSink + Send>,
    desktop: Option<Box<dyn DesktopNotifier + Send>>,
    last_sequence: Option<u64>,
    fired: u64,
}

impl CompletionNotifier {
    pub fn new(sink: Box<dyn NotificationSink + Send>) -> Self {
        Self {
            sink,
            desktop: None,
            last_sequence: None,
            fired: 0,
        }
    }

    pub fn with_desktop(mut self, desktop: Box<dyn DesktopNotifier + Send>) -> Self {
        self.desktop = Some(desktop);
        self
    }

    /// Number of completions announced so far
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Announce a completion. Returns `false` when this zero-crossing was
    /// already announced.
    pub fn notify<F>(&mut self, completion: &PhaseCompletion, play: F) -> bool
    where
        F: FnOnce(),
    {
        if self.last_sequence.is_some_and(|seq| seq >= completion.sequence) {
            debug!("Completion #{} already announced", completion.sequence);
            return false;
        }
        self.last_sequence = Some(completion.sequence);
        self.fired += 1;

        let message = completion_message(completion.finished);
        info!("Announcing completion #{}: {}", completion.sequence, message);
        self.sink.show(Toast::success(message));
        play();

        if let Some(desktop) = self.desktop.as_mut() {
            match desktop.permission() {
                Permission::Granted => {
                    let body = format!("Next up: {}", completion.next.label());
                    if let Err(e) = desktop.notify(message, &body) {
                        warn!("{}", e);
                    }
                }
                Permission::Denied => debug!("Desktop notification skipped, permission denied"),
            }
        }

        true
    }

    pub fn dismiss_expired(&mut self, now: chrono::DateTime<chrono::Utc>) {
        self.sink.dismiss_expired(now);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<Toast>>>);

    impl NotificationSink for RecordingSink {
        fn show(&mut self, toast: Toast) {
            self.0.lock().unwrap().push(toast);
        }
    }

    struct FakeDesktop {
        permission: Permission,
        sent: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl DesktopNotifier for FakeDesktop {
        fn permission(&self) -> Permission {
            self.permission
        }

        fn notify(&mut self, title: &str, _body: &str) -> Result<(), String> {
            if self.fail {
                return Err("no notification daemon".to_string());
            }
            self.sent.lock().unwrap().push(title.to_string());
            Ok(())
        }
    }

    fn completion(sequence: u64) -> PhaseCompletion {
        PhaseCompletion {
            finished: Phase::Work,
            next: Phase::Break,
            next_total_seconds: 300,
            sequence,
        }
    }

    #[test]
    fn fires_toast_and_sound_once_per_sequence() {
        let sink = RecordingSink::default();
        let mut notifier = CompletionNotifier::new(Box::new(sink.clone()));
        let mut plays = 0;

        assert!(notifier.notify(&completion(1), || plays += 1));
        assert!(!notifier.notify(&completion(1), || plays += 1));

        let toasts = sink.0.lock().unwrap();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].message, "Work session finished.");
        assert_eq!(toasts[0].kind, ToastKind::Success);
        assert_eq!(plays, 1);
        assert_eq!(notifier.fired(), 1);
    }

    #[test]
    fn desktop_notification_requires_permission() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = CompletionNotifier::new(Box::new(RecordingSink::default()))
            .with_desktop(Box::new(FakeDesktop {
                permission: Permission::Denied,
                sent: Arc::clone(&sent),
                fail: false,
            }));
        let mut plays = 0;

        assert!(notifier.notify(&completion(1), || plays += 1));
        assert!(sent.lock().unwrap().is_empty());
        assert_eq!(plays, 1);
    }

    #[test]
    fn desktop_notification_sent_when_granted() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = CompletionNotifier::new(Box::new(RecordingSink::default()))
            .with_desktop(Box::new(FakeDesktop {
                permission: Permission::Granted,
                sent: Arc::clone(&sent),
                fail: false,
            }));

        notifier.notify(&completion(1), || {});
        notifier.notify(&completion(2), || {});
        assert_eq!(sent.lock().unwrap().len(), 2);
    }

    #[test]
    fn desktop_failure_is_not_fatal() {
        let sink = RecordingSink::default();
        let mut notifier = CompletionNotifier::new(Box::new(sink.clone()))
            .with_desktop(Box::new(FakeDesktop {
                permission: Permission::Granted,
                sent: Arc::new(Mutex::new(Vec::new())),
                fail: true,
            }));
        let mut plays = 0;

        assert!(notifier.notify(&completion(1), || plays += 1));
        assert_eq!(plays, 1);
        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn break_message_names_break() {
        assert_eq!(completion_message(Phase::Break), "Break finished.");
    }
}
