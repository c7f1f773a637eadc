use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::{DeviceFilter, DriveGroupSpec, HostInventory, InventoryDevice};

/// Physical device class the operator wants OSDs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    #[default]
    Any,
    Hdd,
    Ssd,
}

impl DeviceType {
    pub fn label(&self) -> &'static str {
        match self {
            DeviceType::Any => "any",
            DeviceType::Hdd => "hdd",
            DeviceType::Ssd => "ssd",
        }
    }

    pub fn next(&self) -> DeviceType {
        match self {
            DeviceType::Any => DeviceType::Hdd,
            DeviceType::Hdd => DeviceType::Ssd,
            DeviceType::Ssd => DeviceType::Any,
        }
    }

    fn rotational(&self) -> Option<bool> {
        match self {
            DeviceType::Any => None,
            DeviceType::Hdd => Some(true),
            DeviceType::Ssd => Some(false),
        }
    }

    fn matches(&self, device: &InventoryDevice) -> bool {
        self.rotational()
            .is_none_or(|rotational| rotational == device.sys_api.is_rotational())
    }
}

/// Drive group under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveGroup {
    spec: DriveGroupSpec,
}

impl DriveGroup {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            spec: DriveGroupSpec {
                service_type: "osd".to_string(),
                service_id: format!("dashboard-{}", now.timestamp_millis()),
                host_pattern: "*".to_string(),
                data_devices: None,
                wal_devices: None,
                db_devices: None,
                encrypted: false,
            },
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.spec.service_id = name.to_string();
    }

    pub fn set_host_pattern(&mut self, pattern: &str) {
        self.spec.host_pattern = pattern.to_string();
    }

    pub fn set_data_devices(&mut self, filter: DeviceFilter) {
        self.spec.data_devices = Some(filter);
    }

    pub fn set_encrypted(&mut self, encrypted: bool) {
        self.spec.encrypted = encrypted;
    }

    pub fn name(&self) -> &str {
        &self.spec.service_id
    }

    pub fn into_spec(self) -> DriveGroupSpec {
        self.spec
    }
}

/// Unique OSD service name for a submission
pub fn service_name(user: &str, now: DateTime<Utc>) -> String {
    format!("dashboard-{}-{}", user, now.timestamp_millis())
}

/// A device picked by the current selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedDevice<'a> {
    pub hostname: &'a str,
    pub device: &'a InventoryDevice,
}

/// Operator's data device filters.
///
/// Vendor and model match as case-sensitive substrings, the same way the
/// orchestrator applies them when it deploys the drive group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSelection {
    pub device_type: DeviceType,
    pub vendor: String,
    pub model: String,
}

impl DeviceSelection {
    pub fn filter(&self) -> DeviceFilter {
        let non_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        let mut filter = DeviceFilter {
            all: None,
            rotational: self.device_type.rotational(),
            vendor: non_empty(&self.vendor),
            model: non_empty(&self.model),
        };
        if filter.is_empty() {
            filter.all = Some(true);
        }
        filter
    }

    pub fn matches(&self, device: &InventoryDevice) -> bool {
        device.available
            && self.device_type.matches(device)
            && device.sys_api.vendor.contains(self.vendor.trim())
            && device.sys_api.model.contains(self.model.trim())
    }

    pub fn selected<'a>(&self, inventory: &'a [HostInventory]) -> Vec<SelectedDevice<'a>> {
        inventory
            .iter()
            .flat_map(|host| {
                host.devices
                    .iter()
                    .filter(|device| self.matches(device))
                    .map(|device| SelectedDevice {
                        hostname: host.name.as_str(),
                        device,
                    })
            })
            .collect()
    }

    pub fn total_devices(&self, inventory: &[HostInventory]) -> usize {
        self.selected(inventory).len()
    }

    pub fn drive_group(&self, host_pattern: &str, encrypted: bool, now: DateTime<Utc>) -> DriveGroup {
        let mut group = DriveGroup::new(now);
        group.set_host_pattern(host_pattern);
        group.set_data_devices(self.filter());
        group.set_encrypted(encrypted);
        group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::DeviceSysApi;
    use chrono::TimeZone;

    fn device(path: &str, kind: &str, vendor: &str, available: bool) -> InventoryDevice {
        InventoryDevice {
            path: path.to_string(),
            human_readable_type: kind.to_string(),
            available,
            sys_api: DeviceSysApi {
                human_readable_size: "10 GB".to_string(),
                vendor: vendor.to_string(),
                rotational: if kind == "hdd" { "1" } else { "0" }.to_string(),
                ..Default::default()
            },
        }
    }

    fn inventory() -> Vec<HostInventory> {
        vec![
            HostInventory {
                name: "node1".to_string(),
                addr: String::new(),
                devices: vec![
                    device("/dev/sda", "hdd", "ATA", false),
                    device("/dev/sdb", "hdd", "ATA", true),
                    device("/dev/nvme0n1", "ssd", "Samsung", true),
                ],
            },
            HostInventory {
                name: "node2".to_string(),
                addr: String::new(),
                devices: vec![device("/dev/sdb", "hdd", "Seagate", true)],
            },
        ]
    }

    #[test]
    fn test_default_selection_takes_all_available() {
        let selection = DeviceSelection::default();
        assert_eq!(selection.total_devices(&inventory()), 3);
        assert_eq!(
            selection.filter(),
            DeviceFilter {
                all: Some(true),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_type_and_vendor_filters() {
        let selection = DeviceSelection {
            device_type: DeviceType::Hdd,
            vendor: "Sea".to_string(),
            model: String::new(),
        };
        let inventory = inventory();
        let selected = selection.selected(&inventory);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].hostname, "node2");

        let filter = selection.filter();
        assert_eq!(filter.rotational, Some(true));
        assert_eq!(filter.vendor.as_deref(), Some("Sea"));
        assert_eq!(filter.all, None);
    }

    #[test]
    fn test_ssd_selection_uses_rotational_flag() {
        let selection = DeviceSelection {
            device_type: DeviceType::Ssd,
            ..Default::default()
        };
        let inventory = inventory();
        let selected = selection.selected(&inventory);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].device.path, "/dev/nvme0n1");
        assert_eq!(selection.filter().rotational, Some(false));
    }

    #[test]
    fn test_vendor_match_is_case_sensitive() {
        let selection = DeviceSelection {
            vendor: "samsung".to_string(),
            ..Default::default()
        };
        assert_eq!(selection.total_devices(&inventory()), 0);
    }

    #[test]
    fn test_drive_group_naming() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let mut group = DeviceSelection::default().drive_group("node*", true, now);
        assert_eq!(group.name(), "dashboard-1700000000123");
        group.set_name(&service_name("admin", now));
        let spec = group.into_spec();
        assert_eq!(spec.service_id, "dashboard-admin-1700000000123");
        assert_eq!(spec.host_pattern, "node*");
        assert!(spec.encrypted);
    }

    #[test]
    fn test_device_type_cycles() {
        let mut kind = DeviceType::default();
        for expected in ["hdd", "ssd", "any"] {
            kind = kind.next();
            assert_eq!(kind.label(), expected);
        }
    }
}
