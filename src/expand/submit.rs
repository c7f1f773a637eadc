//! Final step of the wizard: accept new hosts into the cluster and create
//! the requested OSDs.

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::drive_group::{service_name, DriveGroup};
use super::notify::{NotificationType, Outbox, Route};
use super::tasks::{FinishedTask, TaskWrapper};
use super::ExpandMessage;
use crate::api::models::tracking_id;
use crate::api::{ClusterStatus, DashboardApi, Host, OsdCreateRequest};

/// Host label that keeps the orchestrator from placing daemons on a host
pub const NO_SCHEDULE_LABEL: &str = "_no_schedule";

/// Everything the orchestrator needs from the wizard form
#[derive(Debug, Clone)]
pub struct SubmissionPlan {
    pub username: String,
    pub drive_group: DriveGroup,
    pub selected_devices: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostUpdateOutcome {
    pub hostname: String,
    pub result: Result<(), String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPhase {
    /// Host list could not be fetched, no updates were issued
    ListFailed(String),
    Updated(Vec<HostUpdateOutcome>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsdOutcome {
    /// No device matched the selection
    Skipped,
    Created { service_id: String },
    Failed { service_id: String, error: String },
}

/// What happened during a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    pub hosts: HostPhase,
    pub status: Result<(), String>,
    pub osds: OsdOutcome,
}

impl SubmissionReport {
    pub fn failed_host_updates(&self) -> Vec<&HostUpdateOutcome> {
        match &self.hosts {
            HostPhase::Updated(outcomes) => outcomes.iter().filter(|o| o.result.is_err()).collect(),
            HostPhase::ListFailed(_) => Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.hosts, HostPhase::Updated(_))
            && self.failed_host_updates().is_empty()
            && self.status.is_ok()
            && !matches!(self.osds, OsdOutcome::Failed { .. })
    }
}

/// Remove the first occurrence of `label`. Returns whether it was present.
pub fn strip_label(labels: &mut Vec<String>, label: &str) -> bool {
    match labels.iter().position(|l| l == label) {
        Some(idx) => {
            labels.remove(idx);
            true
        }
        None => false,
    }
}

pub struct SubmissionOrchestrator {
    api: Arc<dyn DashboardApi>,
    outbox: Outbox,
    tasks: TaskWrapper,
}

impl SubmissionOrchestrator {
    pub fn new(api: Arc<dyn DashboardApi>, outbox: Outbox) -> Self {
        let tasks = TaskWrapper::new(outbox.clone());
        Self { api, outbox, tasks }
    }

    /// Run the submission. Host acceptance and OSD creation proceed
    /// independently; the report is returned once both are done.
    pub async fn submit(&self, plan: SubmissionPlan) -> SubmissionReport {
        info!("Submitting cluster expansion for {}", plan.username);
        let ((hosts, status), osds) = tokio::join!(self.accept_hosts(), self.create_osds(plan));
        SubmissionReport { hosts, status, osds }
    }

    async fn accept_hosts(&self) -> (HostPhase, Result<(), String>) {
        let phase = match self.api.list_hosts().await {
            Ok(hosts) => HostPhase::Updated(self.remove_no_schedule(hosts).await),
            Err(e) => {
                warn!("Failed to list hosts: {}", e);
                HostPhase::ListFailed(e.to_string())
            }
        };
        let status = self.finalize().await;
        (phase, status)
    }

    /// Issue one label update per host carrying the no-schedule label and
    /// wait for all of them to settle.
    async fn remove_no_schedule(&self, hosts: Vec<Host>) -> Vec<HostUpdateOutcome> {
        let updates = hosts.into_iter().filter_map(|mut host| {
            if !strip_label(&mut host.labels, NO_SCHEDULE_LABEL) {
                return None;
            }
            let api = Arc::clone(&self.api);
            let outbox = self.outbox.clone();
            Some(async move {
                debug!("Removing {} from {}", NO_SCHEDULE_LABEL, host.hostname);
                let result = api
                    .update_host(&host.hostname, true, &host.labels)
                    .await
                    .map_err(|e| {
                        warn!("Failed to update host {}: {}", host.hostname, e);
                        e.to_string()
                    });
                outbox.emit(ExpandMessage::HostUpdated {
                    hostname: host.hostname.clone(),
                    ok: result.is_ok(),
                });
                HostUpdateOutcome {
                    hostname: host.hostname,
                    result,
                }
            })
        });
        join_all(updates).await
    }

    /// Runs exactly once per submission, after every host update settled
    async fn finalize(&self) -> Result<(), String> {
        let status = self
            .api
            .update_cluster_status(ClusterStatus::PostInstalled)
            .await
            .map_err(|e| {
                warn!("Failed to mark cluster as post-installed: {}", e);
                e.to_string()
            });
        if status.is_ok() {
            self.outbox
                .notify(NotificationType::Success, "Cluster expansion was successful");
            self.outbox.navigate(Route::Dashboard);
        }
        status
    }

    async fn create_osds(&self, plan: SubmissionPlan) -> OsdOutcome {
        let SubmissionPlan {
            username,
            mut drive_group,
            selected_devices,
        } = plan;
        drive_group.set_name(&service_name(&username, Utc::now()));
        let drive_groups = vec![drive_group.into_spec()];
        let service_id = tracking_id(&drive_groups);

        if selected_devices == 0 {
            debug!("No devices selected, skipping OSD creation");
            return OsdOutcome::Skipped;
        }

        let request = OsdCreateRequest::drive_groups(drive_groups);
        let task = FinishedTask::new("osd/create").with_metadata("tracking_id", &service_id);
        match self.tasks.wrap(task, self.api.create_osds(&request)).await {
            Ok(()) => {
                self.outbox.emit(ExpandMessage::OsdsCreated);
                OsdOutcome::Created { service_id }
            }
            Err(e) => OsdOutcome::Failed {
                service_id,
                error: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{host, Call, FakeDashboard};
    use crate::expand::notify::Notification;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn plan(selected_devices: usize) -> SubmissionPlan {
        SubmissionPlan {
            username: "admin".to_string(),
            drive_group: DriveGroup::new(Utc::now()),
            selected_devices,
        }
    }

    fn drain(rx: &mut UnboundedReceiver<ExpandMessage>) -> Vec<ExpandMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    async fn run(fake: FakeDashboard, selected: usize) -> (Arc<FakeDashboard>, SubmissionReport, Vec<ExpandMessage>) {
        let fake = Arc::new(fake);
        let (outbox, mut rx) = Outbox::channel();
        let orchestrator = SubmissionOrchestrator::new(fake.clone(), outbox);
        let report = orchestrator.submit(plan(selected)).await;
        (fake, report, drain(&mut rx))
    }

    fn updates(calls: &[Call]) -> Vec<String> {
        calls
            .iter()
            .filter_map(|c| match c {
                Call::UpdateHost { hostname, .. } => Some(hostname.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_strip_label_removes_single_occurrence() {
        let mut labels = vec!["_no_schedule".to_string(), "mon".to_string(), "_no_schedule".to_string()];
        assert!(strip_label(&mut labels, NO_SCHEDULE_LABEL));
        assert_eq!(labels, vec!["mon", "_no_schedule"]);

        let mut labels = vec!["mon".to_string()];
        assert!(!strip_label(&mut labels, NO_SCHEDULE_LABEL));
    }

    #[tokio::test]
    async fn test_only_labelled_hosts_are_updated() {
        let fake = FakeDashboard::with_hosts(vec![
            host("node0", &["_admin"]),
            host("node1", &["_no_schedule"]),
            host("node2", &["rgw", "_no_schedule"]),
        ]);
        let (fake, report, _) = run(fake, 0).await;

        let mut updated = updates(&fake.calls());
        updated.sort();
        assert_eq!(updated, vec!["node1", "node2"]);
        assert!(fake.hosts().iter().all(|h| !h.has_label(NO_SCHEDULE_LABEL)));
        assert_eq!(fake.hosts()[2].labels, vec!["rgw"]);
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_finalizer_runs_once_after_all_updates() {
        let fake = FakeDashboard::with_hosts(vec![
            host("node1", &["_no_schedule"]),
            host("node2", &["_no_schedule"]),
            host("node3", &["_no_schedule"]),
        ])
        .failing_host("node2")
        .slow_updates(Duration::from_millis(10));
        let (fake, report, messages) = run(fake, 0).await;

        let calls = fake.calls();
        let status_calls: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Call::UpdateStatus(ClusterStatus::PostInstalled)))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(status_calls.len(), 1);
        let last_update = calls
            .iter()
            .rposition(|c| matches!(c, Call::UpdateHost { .. }))
            .unwrap();
        assert!(status_calls[0] > last_update);

        assert_eq!(report.failed_host_updates().len(), 1);
        assert_eq!(report.failed_host_updates()[0].hostname, "node2");
        assert!(report.status.is_ok());
        assert!(!report.is_success());

        let navigations = messages
            .iter()
            .filter(|m| matches!(m, ExpandMessage::Navigate(Route::Dashboard)))
            .count();
        assert_eq!(navigations, 1);
        assert!(messages.iter().any(|m| matches!(
            m,
            ExpandMessage::Notify(Notification { kind: NotificationType::Success, title })
                if title == "Cluster expansion was successful"
        )));
    }

    #[tokio::test]
    async fn test_finalizer_runs_without_labelled_hosts() {
        let fake = FakeDashboard::with_hosts(vec![host("node0", &["_admin"])]);
        let (fake, report, _) = run(fake, 0).await;
        assert_eq!(
            fake.calls(),
            vec![Call::ListHosts, Call::UpdateStatus(ClusterStatus::PostInstalled)]
        );
        assert_eq!(report.hosts, HostPhase::Updated(Vec::new()));
    }

    #[tokio::test]
    async fn test_list_failure_still_finalizes() {
        let fake = FakeDashboard::with_hosts(Vec::new()).failing_list();
        let (fake, report, messages) = run(fake, 0).await;
        assert!(matches!(report.hosts, HostPhase::ListFailed(_)));
        assert!(fake.calls().contains(&Call::UpdateStatus(ClusterStatus::PostInstalled)));
        assert!(messages.iter().any(|m| matches!(m, ExpandMessage::Navigate(_))));
    }

    #[tokio::test]
    async fn test_status_failure_stays_in_wizard() {
        let fake = FakeDashboard::with_hosts(vec![host("node1", &["_no_schedule"])]).failing_status();
        let (fake, report, messages) = run(fake, 0).await;
        assert!(report.status.is_err());
        assert_eq!(
            fake.calls()
                .iter()
                .filter(|c| matches!(c, Call::UpdateStatus(_)))
                .count(),
            1
        );
        assert!(!messages.iter().any(|m| matches!(m, ExpandMessage::Notify(_))));
        assert!(!messages.iter().any(|m| matches!(m, ExpandMessage::Navigate(_))));
    }

    #[tokio::test]
    async fn test_no_selected_devices_no_osd_call() {
        let (fake, report, messages) = run(FakeDashboard::default(), 0).await;
        assert!(!fake.calls().iter().any(|c| matches!(c, Call::CreateOsds(_))));
        assert_eq!(report.osds, OsdOutcome::Skipped);
        assert!(!messages.iter().any(|m| matches!(m, ExpandMessage::OsdsCreated)));
    }

    #[tokio::test]
    async fn test_selected_devices_create_one_named_service() {
        let before = Utc::now().timestamp_millis();
        let (fake, report, messages) = run(FakeDashboard::default(), 2).await;
        let after = Utc::now().timestamp_millis();

        let requests: Vec<OsdCreateRequest> = fake
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateOsds(req) => Some(req),
                _ => None,
            })
            .collect();
        assert_eq!(requests.len(), 1);

        let service_id = &requests[0].data[0].service_id;
        let stamp: i64 = service_id
            .strip_prefix("dashboard-admin-")
            .and_then(|s| s.parse().ok())
            .unwrap();
        assert!((before..=after).contains(&stamp));
        assert_eq!(&requests[0].tracking_id, service_id);
        assert_eq!(
            report.osds,
            OsdOutcome::Created {
                service_id: service_id.clone()
            }
        );
        assert!(messages.iter().any(|m| matches!(m, ExpandMessage::OsdsCreated)));
    }

    #[tokio::test]
    async fn test_osd_failure_is_reported_not_emitted() {
        let (_, report, messages) = run(FakeDashboard::default().failing_osds(), 1).await;
        assert!(matches!(report.osds, OsdOutcome::Failed { .. }));
        assert!(!messages.iter().any(|m| matches!(m, ExpandMessage::OsdsCreated)));
        assert!(messages.iter().any(|m| matches!(m, ExpandMessage::TaskFinished(t) if !t.success)));
    }
}
