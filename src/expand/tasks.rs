use std::collections::BTreeMap;
use std::future::Future;
use tracing::{info, warn};

use super::notify::{NotificationType, Outbox};
use super::ExpandMessage;
use crate::api::ApiResult;

/// A tracked backend operation, named `<subject>/<verb>` (e.g. `osd/create`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedTask {
    pub name: String,
    pub metadata: BTreeMap<String, String>,
    pub success: bool,
    pub exception: Option<String>,
}

impl FinishedTask {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            metadata: BTreeMap::new(),
            success: false,
            exception: None,
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    fn subject(&self) -> String {
        let (subject, _) = self.name.split_once('/').unwrap_or((self.name.as_str(), ""));
        let label = match subject {
            "osd" => "OSD service",
            "host" => "host",
            "service" => "service",
            other => other,
        };
        match self.metadata.get("tracking_id") {
            Some(id) => format!("{label} '{id}'"),
            None => label.to_string(),
        }
    }

    /// (running, success, failure) wording for the task's verb
    fn verbs(&self) -> (&'static str, &'static str, &'static str) {
        match self.name.split_once('/').map(|(_, verb)| verb) {
            Some("create") => ("Creating", "Created", "Failed to create"),
            Some("edit") => ("Updating", "Updated", "Failed to update"),
            Some("delete") => ("Deleting", "Deleted", "Failed to delete"),
            _ => ("Running", "Finished", "Failed"),
        }
    }

    pub fn running_message(&self) -> String {
        format!("{} {}", self.verbs().0, self.subject())
    }

    pub fn finished_message(&self) -> String {
        let (_, done, failed) = self.verbs();
        if self.success {
            format!("{} {}", done, self.subject())
        } else {
            match &self.exception {
                Some(e) => format!("{} {}: {}", failed, self.subject(), e),
                None => format!("{} {}", failed, self.subject()),
            }
        }
    }
}

/// Runs backend calls inside a tracked task and reports how they finished
#[derive(Debug, Clone)]
pub struct TaskWrapper {
    outbox: Outbox,
}

impl TaskWrapper {
    pub fn new(outbox: Outbox) -> Self {
        Self { outbox }
    }

    pub async fn wrap<T, F>(&self, mut task: FinishedTask, call: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        info!("{}", task.running_message());
        self.outbox
            .emit(ExpandMessage::TaskStarted(task.running_message()));

        let result = call.await;
        match &result {
            Ok(_) => {
                task.success = true;
                self.outbox
                    .notify(NotificationType::Success, task.finished_message());
            }
            Err(e) => {
                task.exception = Some(e.to_string());
                warn!("{}", task.finished_message());
                self.outbox
                    .notify(NotificationType::Error, task.finished_message());
            }
        }
        self.outbox.emit(ExpandMessage::TaskFinished(task));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::expand::notify::Notification;

    #[test]
    fn test_task_messages() {
        let mut task = FinishedTask::new("osd/create").with_metadata("tracking_id", "dashboard-admin-1");
        assert_eq!(task.running_message(), "Creating OSD service 'dashboard-admin-1'");
        task.success = true;
        assert_eq!(task.finished_message(), "Created OSD service 'dashboard-admin-1'");
    }

    #[tokio::test]
    async fn test_wrap_reports_failure() {
        let (outbox, mut rx) = Outbox::channel();
        let wrapper = TaskWrapper::new(outbox);
        let result: ApiResult<()> = wrapper
            .wrap(FinishedTask::new("osd/create"), async {
                Err(ApiError::NotAuthenticated)
            })
            .await;
        assert!(result.is_err());

        assert!(matches!(rx.try_recv(), Ok(ExpandMessage::TaskStarted(m)) if m == "Creating OSD service"));
        match rx.try_recv() {
            Ok(ExpandMessage::Notify(Notification { kind, title })) => {
                assert_eq!(kind, NotificationType::Error);
                assert!(title.starts_with("Failed to create OSD service"));
            }
            other => panic!("unexpected {other:?}"),
        }
        match rx.try_recv() {
            Ok(ExpandMessage::TaskFinished(task)) => {
                assert!(!task.success);
                assert!(task.exception.is_some());
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
