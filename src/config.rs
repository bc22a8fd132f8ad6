//! Runtime configuration.
//!
//! Loaded from YAML; every field has a default so an empty document is valid.
//!
//! ```rust
//! use tcnart::config::TcnConfig;
//!
//! let config = TcnConfig::from_yaml_str("topic_prefix: lab/pcpd\nnum_workers: 2\n").unwrap();
//! assert_eq!(config.num_workers, 2);
//! assert_eq!(config.describe_topic(), "lab/pcpd/k4a_capture_multi/rpc/sensor/*/describe");
//! assert_eq!(config.router.poll_interval_ms, 100);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use crate::discovery::topics;
use crate::messages::{
    DEVICE_CONTEXT_REPLY_TYPE, SIS_JOIN_TYPE, STREAM_DESCRIPTOR_TYPE, VIDEO_STREAM_TYPE,
};
use crate::{Result, TcnError};

pub const DEFAULT_TOPIC_PREFIX: &str = "tcn/loc/pcpd";
pub const DEFAULT_NUM_WORKERS: usize = 8;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryOptions {
    pub poll_interval_ms: u64,
    /// Type assumed for descriptor samples without an attachment.
    pub descriptor_type: String,
    /// Type assumed for sensor replies without an attachment.
    pub sensor_type: String,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            descriptor_type: STREAM_DESCRIPTOR_TYPE.to_string(),
            sensor_type: DEVICE_CONTEXT_REPLY_TYPE.to_string(),
        }
    }
}

impl DiscoveryOptions {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterOptions {
    pub poll_interval_ms: u64,
    /// Type assumed for stream samples without an attachment.
    pub default_type: String,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            default_type: VIDEO_STREAM_TYPE.to_string(),
        }
    }
}

impl RouterOptions {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SisOptions {
    pub poll_interval_ms: u64,
    /// Type assumed for join samples without an attachment.
    pub default_type: String,
}

impl Default for SisOptions {
    fn default() -> Self {
        Self { poll_interval_ms: default_poll_interval_ms(), default_type: SIS_JOIN_TYPE.to_string() }
    }
}

impl SisOptions {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcnConfig {
    /// Prefix shared by every topic of the deployment.
    pub topic_prefix: String,
    /// Number of worker sinks frames are sharded across.
    pub num_workers: usize,
    pub discovery: DiscoveryOptions,
    pub router: RouterOptions,
    pub sis: SisOptions,
}

impl Default for TcnConfig {
    fn default() -> Self {
        Self {
            topic_prefix: DEFAULT_TOPIC_PREFIX.to_string(),
            num_workers: DEFAULT_NUM_WORKERS,
            discovery: DiscoveryOptions::default(),
            router: RouterOptions::default(),
            sis: SisOptions::default(),
        }
    }
}

impl TcnConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config: TcnConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        debug!(prefix = %config.topic_prefix, workers = config.num_workers, "Loaded configuration");
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| TcnError::file_error(path.to_path_buf(), e))?;
        Self::from_yaml_str(&yaml)
    }

    /// Check the configuration, clamping `num_workers` to at least one.
    pub fn validate(&mut self) -> Result<()> {
        if self.num_workers == 0 {
            warn!("num_workers is 0, using 1 worker");
            self.num_workers = 1;
        }
        let prefix = self.topic_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return Err(TcnError::config("topic_prefix must not be empty"));
        }
        self.topic_prefix = prefix.to_string();
        for (section, interval) in [
            ("discovery", self.discovery.poll_interval_ms),
            ("router", self.router.poll_interval_ms),
            ("sis", self.sis.poll_interval_ms),
        ] {
            if interval == 0 {
                return Err(TcnError::config(format!("{section}.poll_interval_ms must be > 0")));
            }
        }
        Ok(())
    }

    /// Wildcard RPC topic answered by every sensor's `describe` queryable.
    pub fn describe_topic(&self) -> String {
        topics::describe_topic(&self.topic_prefix)
    }

    /// Wildcard topic of SIS join announcements.
    pub fn sis_join_topic(&self) -> String {
        topics::sis_join_topic(&self.topic_prefix)
    }

    pub fn color_topic(&self, sensor: &str) -> String {
        topics::qualified(&self.topic_prefix, &topics::color_topic(sensor))
    }

    pub fn depth_topic(&self, sensor: &str) -> String {
        topics::qualified(&self.topic_prefix, &topics::depth_topic(sensor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = TcnConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, TcnConfig::default());
        assert_eq!(config.topic_prefix, "tcn/loc/pcpd");
        assert_eq!(config.num_workers, 8);
        assert_eq!(config.discovery.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.sis.default_type, "tcnart_msgs::msg::SISJoinMessage");
        assert_eq!(config.router.default_type, "tcnart_msgs::msg::VideoStreamMessage");
    }

    #[test]
    fn nested_sections_override_defaults() {
        let yaml = r#"
topic_prefix: lab/pcpd/
num_workers: 3
router:
  poll_interval_ms: 5
discovery:
  descriptor_type: custom::Descriptor
"#;
        let config = TcnConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.topic_prefix, "lab/pcpd");
        assert_eq!(config.num_workers, 3);
        assert_eq!(config.router.poll_interval_ms, 5);
        assert_eq!(config.router.default_type, VIDEO_STREAM_TYPE);
        assert_eq!(config.discovery.descriptor_type, "custom::Descriptor");
        assert_eq!(config.discovery.sensor_type, DEVICE_CONTEXT_REPLY_TYPE);
    }

    #[test]
    fn zero_workers_are_clamped() {
        let config = TcnConfig::from_yaml_str("num_workers: 0").unwrap();
        assert_eq!(config.num_workers, 1);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            TcnConfig::from_yaml_str("topic_prefix: ''"),
            Err(TcnError::Config { .. })
        ));
        assert!(matches!(
            TcnConfig::from_yaml_str("sis:\n  poll_interval_ms: 0"),
            Err(TcnError::Config { .. })
        ));
        assert!(matches!(TcnConfig::from_yaml_str("num_workers: [1"), Err(TcnError::Config { .. })));
    }

    #[test]
    fn topics_follow_naming_convention() {
        let config = TcnConfig::default();
        assert_eq!(
            config.describe_topic(),
            "tcn/loc/pcpd/k4a_capture_multi/rpc/sensor/*/describe"
        );
        assert_eq!(config.sis_join_topic(), "tcn/loc/pcpd/*/sis/join");
        assert_eq!(
            config.color_topic("cam01"),
            "tcn/loc/pcpd/cam01/cfg/dsc/color_image_bitstream"
        );
        assert_eq!(
            config.depth_topic("cam01"),
            "tcn/loc/pcpd/cam01/cfg/dsc/depth_image_bitstream"
        );
    }

    #[test]
    fn loads_from_file() {
        let dir = std::env::temp_dir().join(format!("tcnart-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tcnart.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "num_workers: 4").unwrap();
        drop(file);

        let config = TcnConfig::from_path(&path).unwrap();
        assert_eq!(config.num_workers, 4);
        std::fs::remove_dir_all(&dir).unwrap();

        let missing = TcnConfig::from_path(dir.join("missing.yaml")).unwrap_err();
        assert!(matches!(missing, TcnError::File { .. }));
    }
}
