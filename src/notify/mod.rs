//! User-facing notification sink.
//!
//! The pipelines report every outcome through a [`Notifier`]. Two sinks are
//! provided: [`LogNotifier`] for headless use and [`ChannelNotifier`], which
//! forwards notifications to a UI loop over a tokio channel.

use tokio::sync::mpsc;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Normal,
    /// Failure styling.
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub severity: Severity,
}

impl Notification {
    pub fn normal(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            severity: Severity::Normal,
        }
    }

    pub fn destructive(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            severity: Severity::Destructive,
        }
    }
}

/// Destination for user-facing notifications.
///
/// `notify` must not block; it is called from inside the async pipeline flow.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Normal => log::info!("{}", notification.title),
            Severity::Destructive => log::warn!("{}", notification.title),
        }
    }
}

/// Forwards notifications to a receiver owned by the UI loop.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }

    /// Convenience constructor returning the matching receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.tx.send(notification) {
            log::debug!("notify: receiver dropped, discarding '{}'", e.0.title);
        }
    }
}

/// Keeps every notification for later inspection.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: std::sync::Mutex<Vec<Notification>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_severity() {
        assert_eq!(Notification::normal("ok").severity, Severity::Normal);
        assert_eq!(
            Notification::destructive("bad").severity,
            Severity::Destructive
        );
        assert_eq!(Severity::default(), Severity::Normal);
    }

    #[tokio::test]
    async fn channel_notifier_forwards_in_order() {
        let (notifier, mut rx) = ChannelNotifier::channel();
        notifier.notify(Notification::normal("first"));
        notifier.notify(Notification::destructive("second"));

        assert_eq!(rx.recv().await, Some(Notification::normal("first")));
        assert_eq!(rx.recv().await, Some(Notification::destructive("second")));
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (notifier, rx) = ChannelNotifier::channel();
        drop(rx);
        notifier.notify(Notification::normal("nobody listening"));
    }

    #[test]
    fn notifiers_are_object_safe() {
        let sinks: Vec<Box<dyn Notifier>> = vec![
            Box::new(LogNotifier),
            Box::new(ChannelNotifier::channel().0),
        ];
        for sink in &sinks {
            sink.notify(Notification::normal("hello"));
        }
    }
}
