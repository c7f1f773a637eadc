//! Recording fake of the dashboard API for unit tests.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use super::error::{ApiError, ApiResult};
use super::models::{
    AuthInfo, ClusterStatus, Host, HostInventory, NewHost, OsdCreateRequest, ServiceSummary,
};
use super::{AuthService, ClusterService, HostService, OsdService, ServiceCatalog};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListHosts,
    UpdateHost { hostname: String, labels: Vec<String> },
    AddHost(String),
    Inventory(String),
    UpdateStatus(ClusterStatus),
    CreateOsds(OsdCreateRequest),
    ListServices,
}

#[derive(Default)]
pub struct FakeDashboard {
    hosts: Mutex<Vec<Host>>,
    inventory: Vec<HostInventory>,
    calls: Mutex<Vec<Call>>,
    failing_hosts: HashSet<String>,
    update_delay: Duration,
    fail_list: bool,
    fail_status: bool,
    fail_osds: bool,
}

pub fn host(name: &str, labels: &[&str]) -> Host {
    Host {
        hostname: name.to_string(),
        addr: String::new(),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        status: String::new(),
        services: Vec::new(),
    }
}

fn failure(path: &str, status: u16) -> ApiError {
    ApiError::Status {
        method: "PUT".to_string(),
        path: path.to_string(),
        status,
        detail: "injected failure".to_string(),
    }
}

impl FakeDashboard {
    pub fn with_hosts(hosts: Vec<Host>) -> Self {
        Self {
            hosts: Mutex::new(hosts),
            ..Self::default()
        }
    }

    pub fn with_inventory(mut self, inventory: Vec<HostInventory>) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn failing_host(mut self, hostname: &str) -> Self {
        self.failing_hosts.insert(hostname.to_string());
        self
    }

    /// Host updates finish in reverse order of issue, each `delay` apart
    pub fn slow_updates(mut self, delay: Duration) -> Self {
        self.update_delay = delay;
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_status(mut self) -> Self {
        self.fail_status = true;
        self
    }

    pub fn failing_osds(mut self) -> Self {
        self.fail_osds = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn hosts(&self) -> Vec<Host> {
        self.hosts.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AuthService for FakeDashboard {
    async fn login(&self, username: &str, password: &str) -> ApiResult<AuthInfo> {
        if password.is_empty() {
            return Err(ApiError::AuthFailed("empty password".to_string()));
        }
        Ok(AuthInfo {
            token: "token".to_string(),
            username: username.to_string(),
        })
    }
}

#[async_trait]
impl HostService for FakeDashboard {
    async fn list_hosts(&self) -> ApiResult<Vec<Host>> {
        self.record(Call::ListHosts);
        if self.fail_list {
            return Err(failure("api/host", 500));
        }
        Ok(self.hosts())
    }

    async fn update_host(
        &self,
        hostname: &str,
        update_labels: bool,
        labels: &[String],
    ) -> ApiResult<()> {
        if !self.update_delay.is_zero() {
            let position = self
                .hosts()
                .iter()
                .position(|h| h.hostname == hostname)
                .unwrap_or(0);
            let rank = self.hosts().len().saturating_sub(position) as u32;
            tokio::time::sleep(self.update_delay * rank).await;
        }
        self.record(Call::UpdateHost {
            hostname: hostname.to_string(),
            labels: labels.to_vec(),
        });
        if self.failing_hosts.contains(hostname) {
            return Err(failure(&format!("api/host/{hostname}"), 500));
        }
        if update_labels {
            let mut hosts = self.hosts.lock().unwrap();
            if let Some(h) = hosts.iter_mut().find(|h| h.hostname == hostname) {
                h.labels = labels.to_vec();
            }
        }
        Ok(())
    }

    async fn add_host(&self, host: &NewHost) -> ApiResult<()> {
        self.record(Call::AddHost(host.hostname.clone()));
        self.hosts.lock().unwrap().push(Host {
            hostname: host.hostname.clone(),
            addr: host.addr.clone().unwrap_or_default(),
            labels: host.labels.clone(),
            status: host.status.clone(),
            services: Vec::new(),
        });
        Ok(())
    }

    async fn host_inventory(&self, hostname: &str) -> ApiResult<HostInventory> {
        self.record(Call::Inventory(hostname.to_string()));
        Ok(self
            .inventory
            .iter()
            .find(|inv| inv.name == hostname)
            .cloned()
            .unwrap_or_else(|| HostInventory {
                name: hostname.to_string(),
                ..HostInventory::default()
            }))
    }
}

#[async_trait]
impl ClusterService for FakeDashboard {
    async fn cluster_status(&self) -> ApiResult<ClusterStatus> {
        Ok(ClusterStatus::Installed)
    }

    async fn update_cluster_status(&self, status: ClusterStatus) -> ApiResult<()> {
        self.record(Call::UpdateStatus(status));
        if self.fail_status {
            return Err(failure("api/cluster", 500));
        }
        Ok(())
    }
}

#[async_trait]
impl OsdService for FakeDashboard {
    async fn create_osds(&self, request: &OsdCreateRequest) -> ApiResult<()> {
        self.record(Call::CreateOsds(request.clone()));
        if self.fail_osds {
            return Err(failure("api/osd", 400));
        }
        Ok(())
    }
}

#[async_trait]
impl ServiceCatalog for FakeDashboard {
    async fn list_services(&self) -> ApiResult<Vec<ServiceSummary>> {
        self.record(Call::ListServices);
        Ok(Vec::new())
    }
}
