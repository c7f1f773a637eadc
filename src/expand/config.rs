use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use super::drive_group::DeviceType;
use crate::api::ClientOptions;
use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/ceph-expand/expand.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExpandConfig {
    pub general: GeneralConfig,
    pub dashboard: DashboardConfig,
    pub osd: OsdConfig,
}

impl ExpandConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: ExpandConfig = toml::from_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            url: self.dashboard.url.clone(),
            verify_tls: self.dashboard.verify_tls,
            timeout: Duration::from_secs(self.dashboard.timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub title: String,
    pub subtitle: String,
    /// Run against the built-in demo cluster instead of a dashboard
    pub dryrun: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "Expand Cluster".to_string(),
            subtitle: "Welcome to Ceph Dashboard".to_string(),
            dryrun: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub url: String,
    pub username: String,
    /// Disable for dashboards with self-signed certificates
    pub verify_tls: bool,
    pub timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            url: "https://localhost:8443".to_string(),
            username: "admin".to_string(),
            verify_tls: true,
            timeout_secs: 30,
        }
    }
}

/// Initial values of the Create OSDs step
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OsdConfig {
    pub device_type: DeviceType,
    pub host_pattern: String,
    pub encrypted: bool,
}

impl Default for OsdConfig {
    fn default() -> Self {
        Self {
            device_type: DeviceType::Any,
            host_pattern: "*".to_string(),
            encrypted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExpandConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.dashboard.url, "https://localhost:8443");
        assert_eq!(config.osd.host_pattern, "*");
        assert!(!config.general.dryrun);
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[dashboard]
url = "https://ceph-mgr:8443/"
verify_tls = false

[osd]
device_type = "ssd"
encrypted = true
"#
        )
        .unwrap();

        let config = ExpandConfig::load_from(file.path()).unwrap();
        assert_eq!(config.dashboard.username, "admin");
        assert!(!config.dashboard.verify_tls);
        assert_eq!(config.osd.device_type, DeviceType::Ssd);
        assert!(config.osd.encrypted);

        let options = config.client_options();
        assert_eq!(options.url, "https://ceph-mgr:8443/");
        assert_eq!(options.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[osd]\ndevice_type = \"nvme\"").unwrap();
        assert!(ExpandConfig::load_from(file.path()).is_err());
    }
}
