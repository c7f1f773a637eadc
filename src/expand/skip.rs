//! "Skip" path of the welcome screen: mark the cluster as set up without
//! running the wizard.

use std::sync::Arc;
use tracing::{info, warn};

use super::notify::{NotificationType, Outbox, Route};
use super::ExpandMessage;
use crate::api::{ClusterStatus, DashboardApi};

/// Confirmation dialog shown before skipping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipDialog {
    pub title: &'static str,
    pub message: &'static str,
    pub button: &'static str,
}

pub const SKIP_DIALOG: SkipDialog = SkipDialog {
    title: "Warning",
    message: "You are about to skip the cluster expansion process. \
              You'll need to navigate through the menu to add hosts and services.\n\n\
              Are you sure you want to continue?",
    button: "Continue",
};

pub struct SkipFlow {
    api: Arc<dyn DashboardApi>,
    outbox: Outbox,
}

impl SkipFlow {
    pub fn new(api: Arc<dyn DashboardApi>, outbox: Outbox) -> Self {
        Self { api, outbox }
    }

    pub fn dialog(&self) -> SkipDialog {
        SKIP_DIALOG
    }

    /// Run after the operator accepted the dialog. One status update and one
    /// navigation happen whatever the outcome; the dialog is closed last.
    pub async fn confirm(&self) -> Result<(), String> {
        let result = self
            .api
            .update_cluster_status(ClusterStatus::PostInstalled)
            .await
            .map_err(|e| e.to_string());
        match &result {
            Ok(()) => {
                info!("Cluster expansion skipped by user");
                self.outbox
                    .notify(NotificationType::Info, "Cluster expansion skipped by user");
            }
            Err(e) => warn!("Failed to mark cluster as post-installed: {}", e),
        }
        self.outbox.navigate(Route::Dashboard);
        self.outbox.emit(ExpandMessage::SkipComplete);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{Call, FakeDashboard};
    use crate::expand::notify::Notification;

    async fn confirm(fake: FakeDashboard) -> (Arc<FakeDashboard>, Result<(), String>, Vec<ExpandMessage>) {
        let fake = Arc::new(fake);
        let (outbox, mut rx) = Outbox::channel();
        let result = SkipFlow::new(fake.clone(), outbox).confirm().await;
        let mut messages = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            messages.push(msg);
        }
        (fake, result, messages)
    }

    #[test]
    fn test_dialog_wording() {
        assert_eq!(SKIP_DIALOG.title, "Warning");
        assert_eq!(SKIP_DIALOG.button, "Continue");
    }

    #[tokio::test]
    async fn test_confirm_success() {
        let (fake, result, messages) = confirm(FakeDashboard::default()).await;
        assert!(result.is_ok());
        assert_eq!(fake.calls(), vec![Call::UpdateStatus(ClusterStatus::PostInstalled)]);
        assert_eq!(messages.len(), 3);
        assert!(matches!(
            &messages[0],
            ExpandMessage::Notify(Notification { kind: NotificationType::Info, title })
                if title == "Cluster expansion skipped by user"
        ));
        assert!(matches!(messages[1], ExpandMessage::Navigate(Route::Dashboard)));
        assert!(matches!(messages[2], ExpandMessage::SkipComplete));
    }

    #[tokio::test]
    async fn test_confirm_failure_still_navigates_and_closes() {
        let (fake, result, messages) = confirm(FakeDashboard::default().failing_status()).await;
        assert!(result.is_err());
        assert_eq!(fake.calls().len(), 1);
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ExpandMessage::Navigate(Route::Dashboard)));
        assert!(matches!(messages[1], ExpandMessage::SkipComplete));
    }
}
