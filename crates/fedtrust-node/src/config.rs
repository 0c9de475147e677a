//! Node configuration loading and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Full configuration for the fedtrust node.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FedtrustConfig {
    /// Own platform identity.
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Scheduled recomputation settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// External collaborator endpoints.
    #[serde(default)]
    pub collaborators: CollaboratorConfig,

    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// API server settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Identifier of the platform this node runs on; owner of all
    /// locally shared resources.
    #[serde(default = "default_platform_id")]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Period of the resource trust job, in seconds.
    #[serde(default = "default_period_secs")]
    pub resource_trust_period_secs: u64,
    /// Period of the platform reputation job, in seconds.
    #[serde(default = "default_period_secs")]
    pub platform_reputation_period_secs: u64,
    /// Period of the adaptive resource trust job, in seconds.
    #[serde(default = "default_period_secs")]
    pub adaptive_resource_trust_period_secs: u64,
    /// Minimum age (minutes) before an entry is eligible for recomputation.
    #[serde(default = "default_staleness_window")]
    pub staleness_window_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorConfig {
    /// Monitoring service serving aggregated availability metrics.
    #[serde(default = "default_monitoring_url")]
    pub monitoring_url: String,
    /// Anomaly detection service serving misbehaviour reports.
    #[serde(default = "default_anomaly_url")]
    pub anomaly_url: String,
    /// Bartering service answering filtered transaction queries.
    #[serde(default = "default_bartering_url")]
    pub bartering_url: String,
    /// Federation history service.
    #[serde(default = "default_history_url")]
    pub federation_history_url: String,
    /// Per-request timeout in seconds. Kept short since these calls gate
    /// scheduled batch progress.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the data directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API listen address.
    #[serde(default = "default_api_addr")]
    pub listen_addr: String,
    /// API port.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_platform_id() -> String {
    "platform-local".into()
}
fn default_period_secs() -> u64 {
    300
}
fn default_staleness_window() -> i64 {
    60
}
fn default_monitoring_url() -> String {
    "http://127.0.0.1:8200/metrics".into()
}
fn default_anomaly_url() -> String {
    "http://127.0.0.1:8201/misdeeds".into()
}
fn default_bartering_url() -> String {
    "http://127.0.0.1:8202/bartering/filter".into()
}
fn default_history_url() -> String {
    "http://127.0.0.1:8203/federation/history".into()
}
fn default_request_timeout_secs() -> u64 {
    3
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_api_addr() -> String {
    "127.0.0.1".into()
}
fn default_api_port() -> u16 {
    8210
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            id: default_platform_id(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            resource_trust_period_secs: default_period_secs(),
            platform_reputation_period_secs: default_period_secs(),
            adaptive_resource_trust_period_secs: default_period_secs(),
            staleness_window_minutes: default_staleness_window(),
        }
    }
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            monitoring_url: default_monitoring_url(),
            anomaly_url: default_anomaly_url(),
            bartering_url: default_bartering_url(),
            federation_history_url: default_history_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_api_addr(),
            port: default_api_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl FedtrustConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: FedtrustConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}
