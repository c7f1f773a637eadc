//! Clients for the Ceph Dashboard REST API.
//!
//! Each concern of the dashboard (auth, hosts, cluster, OSDs, services) is a
//! trait so the wizard can run against the live dashboard, the dry-run demo
//! backend, or an in-memory fake in tests.

mod client;
mod demo;
mod error;
pub mod models;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ClientOptions, DashboardClient};
pub use demo::DemoDashboard;
pub use error::{ApiError, ApiResult};
pub use models::{
    AuthInfo, ClusterStatus, DeviceFilter, DriveGroupSpec, Host, HostInventory, InventoryDevice,
    NewHost, OsdCreateRequest, ServiceSummary,
};

use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> ApiResult<AuthInfo>;
}

#[async_trait]
pub trait HostService: Send + Sync {
    async fn list_hosts(&self) -> ApiResult<Vec<Host>>;
    async fn update_host(&self, hostname: &str, update_labels: bool, labels: &[String])
        -> ApiResult<()>;
    async fn add_host(&self, host: &NewHost) -> ApiResult<()>;
    async fn host_inventory(&self, hostname: &str) -> ApiResult<HostInventory>;
}

#[async_trait]
pub trait ClusterService: Send + Sync {
    async fn cluster_status(&self) -> ApiResult<ClusterStatus>;
    async fn update_cluster_status(&self, status: ClusterStatus) -> ApiResult<()>;
}

#[async_trait]
pub trait OsdService: Send + Sync {
    async fn create_osds(&self, request: &OsdCreateRequest) -> ApiResult<()>;
}

#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    async fn list_services(&self) -> ApiResult<Vec<ServiceSummary>>;
}

/// Everything the wizard needs from the dashboard
pub trait DashboardApi: AuthService + HostService + ClusterService + OsdService + ServiceCatalog {}

impl<T> DashboardApi for T where
    T: AuthService + HostService + ClusterService + OsdService + ServiceCatalog
{
}

/// Create the live HTTP backend, or the demo backend in dryrun mode
pub fn create_backend(options: &ClientOptions, dryrun: bool) -> ApiResult<Arc<dyn DashboardApi>> {
    if dryrun {
        Ok(Arc::new(DemoDashboard::new()))
    } else {
        Ok(Arc::new(DashboardClient::new(options)?))
    }
}
