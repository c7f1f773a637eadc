//! Wire types of the Ceph Dashboard REST API used by the wizard.

use serde::{Deserialize, Serialize};

/// Response of `POST api/auth`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthInfo {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// A cluster host as returned by `GET api/host`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Host {
    pub hostname: String,
    #[serde(default)]
    pub addr: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub services: Vec<HostDaemon>,
}

/// Daemon placed on a host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostDaemon {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub id: String,
}

impl Host {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Body of `PUT api/host/{hostname}`
#[derive(Debug, Serialize)]
pub(crate) struct HostUpdate<'a> {
    pub update_labels: bool,
    pub labels: &'a [String],
}

/// Body of `POST api/host`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewHost {
    pub hostname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<String>,
    pub labels: Vec<String>,
    pub status: String,
}

/// Device inventory of one host, `GET api/host/{hostname}/inventory`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HostInventory {
    pub name: String,
    #[serde(default)]
    pub addr: String,
    #[serde(default)]
    pub devices: Vec<InventoryDevice>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InventoryDevice {
    pub path: String,
    #[serde(default)]
    pub human_readable_type: String,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub sys_api: DeviceSysApi,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeviceSysApi {
    /// Bytes
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub human_readable_size: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub model: String,
    /// `"1"` for spinning media
    #[serde(default)]
    pub rotational: String,
}

impl DeviceSysApi {
    pub fn is_rotational(&self) -> bool {
        self.rotational == "1"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterStatus {
    Installed,
    PostInstalled,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClusterStatusUpdate {
    pub status: ClusterStatus,
}

/// Device filter inside a drive group, e.g. `data_devices: {rotational: true}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotational: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl DeviceFilter {
    pub fn is_empty(&self) -> bool {
        self.all.is_none()
            && self.rotational.is_none()
            && self.vendor.is_none()
            && self.model.is_none()
    }
}

/// OSD service specification in cephadm drive group format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveGroupSpec {
    pub service_type: String,
    pub service_id: String,
    pub host_pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_devices: Option<DeviceFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wal_devices: Option<DeviceFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_devices: Option<DeviceFilter>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub encrypted: bool,
}

/// Body of `POST api/osd`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsdCreateRequest {
    pub method: String,
    pub data: Vec<DriveGroupSpec>,
    pub tracking_id: String,
}

impl OsdCreateRequest {
    pub fn drive_groups(data: Vec<DriveGroupSpec>) -> Self {
        let tracking_id = tracking_id(&data);
        Self {
            method: "drive_groups".to_string(),
            data,
            tracking_id,
        }
    }
}

/// Comma separated service ids, as the dashboard task list expects
pub fn tracking_id(specs: &[DriveGroupSpec]) -> String {
    specs
        .iter()
        .map(|spec| spec.service_id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Orchestrator service, `GET api/service`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceSummary {
    pub service_name: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub status: ServiceStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub running: u32,
    #[serde(default)]
    pub size: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inventory_device_sys_api() {
        let device: InventoryDevice = serde_json::from_value(json!({
            "path": "/dev/vdb",
            "human_readable_type": "hdd",
            "available": true,
            "sys_api": {
                "size": 10737418240.0,
                "human_readable_size": "10.00 GB",
                "vendor": "0x1af4",
                "model": "",
                "rotational": "1",
            },
        }))
        .unwrap();
        assert_eq!(device.sys_api.size, 10737418240.0);
        assert!(device.sys_api.is_rotational());
        assert!(!DeviceSysApi::default().is_rotational());
    }

    #[test]
    fn test_host_services() {
        let host: Host = serde_json::from_value(json!({
            "hostname": "node1",
            "services": [{"type": "mon", "id": "node1"}, {"type": "osd", "id": "3"}],
        }))
        .unwrap();
        assert_eq!(host.services.len(), 2);
        assert_eq!(host.services[0].service_type, "mon");
        assert_eq!(host.services[1].id, "3");
    }

    #[test]
    fn test_host_defaults_missing_fields() {
        let host: Host = serde_json::from_value(json!({
            "hostname": "node1",
            "services": [],
            "ceph_version": "",
        }))
        .unwrap();
        assert_eq!(host.hostname, "node1");
        assert!(host.labels.is_empty());
        assert!(host.services.is_empty());
    }

    #[test]
    fn test_drive_group_spec_skips_unset_fields() {
        let spec = DriveGroupSpec {
            service_type: "osd".to_string(),
            service_id: "dashboard-admin-1".to_string(),
            host_pattern: "*".to_string(),
            data_devices: Some(DeviceFilter {
                rotational: Some(true),
                ..Default::default()
            }),
            wal_devices: None,
            db_devices: None,
            encrypted: false,
        };
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({
                "service_type": "osd",
                "service_id": "dashboard-admin-1",
                "host_pattern": "*",
                "data_devices": {"rotational": true},
            })
        );
    }

    #[test]
    fn test_osd_request_tracking_id() {
        let spec = |id: &str| DriveGroupSpec {
            service_type: "osd".to_string(),
            service_id: id.to_string(),
            host_pattern: "*".to_string(),
            data_devices: None,
            wal_devices: None,
            db_devices: None,
            encrypted: true,
        };
        let req = OsdCreateRequest::drive_groups(vec![spec("a"), spec("b")]);
        assert_eq!(req.method, "drive_groups");
        assert_eq!(req.tracking_id, "a, b");
    }

    #[test]
    fn test_cluster_status_wire_format() {
        assert_eq!(
            serde_json::to_value(ClusterStatusUpdate {
                status: ClusterStatus::PostInstalled
            })
            .unwrap(),
            json!({"status": "POST_INSTALLED"})
        );
        let status: ClusterStatus = serde_json::from_str("\"INSTALLED\"").unwrap();
        assert_eq!(status, ClusterStatus::Installed);
    }
}
