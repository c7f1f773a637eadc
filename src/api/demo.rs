use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::models::{
    AuthInfo, ClusterStatus, DeviceSysApi, Host, HostInventory, InventoryDevice, NewHost,
    OsdCreateRequest, ServiceStatus, ServiceSummary,
};
use super::{AuthService, ClusterService, HostService, OsdService, ServiceCatalog};

/// Simulated round trip so spinners are visible in dryrun mode
const DEMO_LATENCY: Duration = Duration::from_millis(150);

struct DemoState {
    hosts: Vec<Host>,
    status: ClusterStatus,
}

/// In-memory dashboard used by `--dryrun`
pub struct DemoDashboard {
    state: Mutex<DemoState>,
}

impl Default for DemoDashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoDashboard {
    pub fn new() -> Self {
        info!("Running against demo dashboard");
        let host = |name: &str, addr: &str, labels: &[&str]| Host {
            hostname: name.to_string(),
            addr: addr.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            status: String::new(),
            services: Vec::new(),
        };
        Self {
            state: Mutex::new(DemoState {
                hosts: vec![
                    host("ceph-node-00", "192.168.100.100", &["_admin", "mon"]),
                    host("ceph-node-01", "192.168.100.101", &["_no_schedule"]),
                    host("ceph-node-02", "192.168.100.102", &["_no_schedule", "rgw"]),
                ],
                status: ClusterStatus::Installed,
            }),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut DemoState) -> T) -> T {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    fn demo_devices(hostname: &str) -> Vec<InventoryDevice> {
        let device = |path: &str, kind: &str, size: &str, vendor: &str, model: &str, available| {
            InventoryDevice {
                path: path.to_string(),
                human_readable_type: kind.to_string(),
                available,
                sys_api: DeviceSysApi {
                    human_readable_size: size.to_string(),
                    vendor: vendor.to_string(),
                    model: model.to_string(),
                    rotational: if kind == "hdd" { "1" } else { "0" }.to_string(),
                    ..Default::default()
                },
            }
        };
        match hostname {
            "ceph-node-00" => vec![device("/dev/sda", "hdd", "100 GB", "ATA", "QEMU HARDDISK", false)],
            _ => vec![
                device("/dev/vdb", "hdd", "10 GB", "0x1af4", "", true),
                device("/dev/vdc", "hdd", "10 GB", "0x1af4", "", true),
                device("/dev/nvme0n1", "ssd", "20 GB", "Samsung", "PM9A3", true),
            ],
        }
    }
}

#[async_trait]
impl AuthService for DemoDashboard {
    async fn login(&self, username: &str, password: &str) -> ApiResult<AuthInfo> {
        tokio::time::sleep(DEMO_LATENCY).await;
        if password != "demo" {
            return Err(ApiError::AuthFailed(
                "Invalid credentials (hint: use 'demo')".to_string(),
            ));
        }
        Ok(AuthInfo {
            token: "demo-token".to_string(),
            username: username.to_string(),
        })
    }
}

#[async_trait]
impl HostService for DemoDashboard {
    async fn list_hosts(&self) -> ApiResult<Vec<Host>> {
        tokio::time::sleep(DEMO_LATENCY).await;
        Ok(self.with_state(|s| s.hosts.clone()))
    }

    async fn update_host(
        &self,
        hostname: &str,
        update_labels: bool,
        labels: &[String],
    ) -> ApiResult<()> {
        tokio::time::sleep(DEMO_LATENCY).await;
        self.with_state(|s| {
            let host = s
                .hosts
                .iter_mut()
                .find(|h| h.hostname == hostname)
                .ok_or_else(|| ApiError::Status {
                    method: "PUT".to_string(),
                    path: format!("api/host/{hostname}"),
                    status: 404,
                    detail: format!("Host '{hostname}' not found"),
                })?;
            if update_labels {
                host.labels = labels.to_vec();
            }
            Ok(())
        })
    }

    async fn add_host(&self, host: &NewHost) -> ApiResult<()> {
        tokio::time::sleep(DEMO_LATENCY).await;
        self.with_state(|s| {
            if s.hosts.iter().any(|h| h.hostname == host.hostname) {
                return Err(ApiError::Status {
                    method: "POST".to_string(),
                    path: "api/host".to_string(),
                    status: 400,
                    detail: format!("Host '{}' is already in the inventory", host.hostname),
                });
            }
            s.hosts.push(Host {
                hostname: host.hostname.clone(),
                addr: host.addr.clone().unwrap_or_default(),
                labels: host.labels.clone(),
                status: host.status.clone(),
                services: Vec::new(),
            });
            Ok(())
        })
    }

    async fn host_inventory(&self, hostname: &str) -> ApiResult<HostInventory> {
        tokio::time::sleep(DEMO_LATENCY).await;
        let addr = self.with_state(|s| {
            s.hosts
                .iter()
                .find(|h| h.hostname == hostname)
                .map(|h| h.addr.clone())
                .unwrap_or_default()
        });
        Ok(HostInventory {
            name: hostname.to_string(),
            addr,
            devices: Self::demo_devices(hostname),
        })
    }
}

#[async_trait]
impl ClusterService for DemoDashboard {
    async fn cluster_status(&self) -> ApiResult<ClusterStatus> {
        Ok(self.with_state(|s| s.status))
    }

    async fn update_cluster_status(&self, status: ClusterStatus) -> ApiResult<()> {
        tokio::time::sleep(DEMO_LATENCY).await;
        self.with_state(|s| s.status = status);
        Ok(())
    }
}

#[async_trait]
impl OsdService for DemoDashboard {
    async fn create_osds(&self, request: &OsdCreateRequest) -> ApiResult<()> {
        tokio::time::sleep(DEMO_LATENCY * 4).await;
        info!(
            "Demo OSD creation for {} drive group(s): {}",
            request.data.len(),
            request.tracking_id
        );
        Ok(())
    }
}

#[async_trait]
impl ServiceCatalog for DemoDashboard {
    async fn list_services(&self) -> ApiResult<Vec<ServiceSummary>> {
        tokio::time::sleep(DEMO_LATENCY).await;
        let service = |name: &str, kind: &str, running, size| ServiceSummary {
            service_name: name.to_string(),
            service_type: kind.to_string(),
            status: ServiceStatus { running, size },
        };
        Ok(vec![
            service("alertmanager", "alertmanager", 1, 1),
            service("crash", "crash", 3, 3),
            service("grafana", "grafana", 1, 1),
            service("mgr", "mgr", 2, 2),
            service("mon", "mon", 3, 5),
            service("node-exporter", "node-exporter", 3, 3),
            service("prometheus", "prometheus", 1, 1),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_login_requires_demo_password() {
        let demo = DemoDashboard::new();
        assert!(matches!(
            demo.login("admin", "nope").await,
            Err(ApiError::AuthFailed(_))
        ));
        let auth = demo.login("admin", "demo").await.unwrap();
        assert_eq!(auth.username, "admin");
    }

    #[tokio::test]
    async fn test_demo_host_updates_persist() {
        let demo = DemoDashboard::new();
        demo.update_host("ceph-node-01", true, &[]).await.unwrap();
        let hosts = demo.list_hosts().await.unwrap();
        assert!(hosts.iter().all(|h| h.hostname != "ceph-node-01" || h.labels.is_empty()));

        let err = demo.update_host("missing", true, &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_demo_rejects_duplicate_host() {
        let demo = DemoDashboard::new();
        let host = NewHost {
            hostname: "ceph-node-00".to_string(),
            addr: None,
            labels: Vec::new(),
            status: String::new(),
        };
        assert!(demo.add_host(&host).await.is_err());
    }
}
