//! Configuration schema.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the console.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cloud: CloudConfig,
    pub instance: InstanceConfig,
    pub email: EmailConfig,
    pub schedule: ScheduleConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Cloud region and bucket layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub region: String,
    /// Bucket for short-lived artifacts such as uploaded SSH keys.
    pub temporary_bucket: String,
    /// Bucket holding uploaded job code archives.
    pub code_bucket: String,
    /// Bucket where job output is published.
    pub data_bucket: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            region: "us-west-2".to_string(),
            temporary_bucket: "skylift-temporary".to_string(),
            code_bucket: "skylift-analysis-code".to_string(),
            data_bucket: "skylift-public-analysis".to_string(),
        }
    }
}

/// Launch parameters for worker instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    pub image_id: String,
    pub instance_type: String,
    pub security_groups: Vec<String>,
    /// Instance profile granting workers access to the analysis buckets.
    pub profile: String,
    /// Tag applied to every instance this console launches.
    pub app_tag: String,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            image_id: "ami-ace67f9c".to_string(),
            instance_type: "m1.xlarge".to_string(),
            security_groups: vec!["skylift-workers".to_string()],
            profile: "skylift-worker-profile".to_string(),
            app_tag: "skylift-worker".to_string(),
        }
    }
}

/// Outbound email settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Verified sender address for launch notifications.
    pub source: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            source: "skylift@example.com".to_string(),
        }
    }
}

/// Scheduled-job settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Executable appended to every generated crontab line.
    pub runner_path: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            runner_path: "/path/to/run/script.sh".to_string(),
        }
    }
}
