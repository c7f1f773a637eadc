use tokio::sync::mpsc;

use super::ExpandMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Error,
    Info,
    Success,
}

/// A toast shown in the message panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationType,
    pub title: String,
}

/// Places the wizard can send the operator to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
        }
    }
}

/// Sending half of the UI message channel.
///
/// Background work never touches UI state directly; notifications,
/// navigation, and completion events all go through here and are applied by
/// the event loop.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<ExpandMessage>,
}

impl Outbox {
    pub fn new(tx: mpsc::UnboundedSender<ExpandMessage>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ExpandMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn notify(&self, kind: NotificationType, title: impl Into<String>) {
        self.emit(ExpandMessage::Notify(Notification {
            kind,
            title: title.into(),
        }));
    }

    pub fn navigate(&self, route: Route) {
        self.emit(ExpandMessage::Navigate(route));
    }

    pub fn emit(&self, msg: ExpandMessage) {
        // Receiver only goes away when the UI is shutting down
        let _ = self.tx.send(msg);
    }
}
