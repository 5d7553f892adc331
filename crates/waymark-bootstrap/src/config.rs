//! Bootstrap configuration.

use crate::error::ConfigError;
use crate::graph::DEFAULT_MAX_ROUNDS;
use crate::multi::CrossSourcePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Bootstrap configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Number of peer addresses to gather per bootstrap pass
    #[serde(default = "default_target_peers")]
    pub target_peers: u32,
    /// Whether later sources see identities returned by earlier ones
    #[serde(default)]
    pub cross_source: CrossSourcePolicy,
    /// Graph sampling configuration
    #[serde(default)]
    pub graph: GraphConfig,
    /// DNS seed configuration
    #[serde(default)]
    pub dns: DnsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Graph sampling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Query the local channel graph
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Path of a JSON graph snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
    /// Maximum sampling rounds per call
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

/// DNS seed configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsConfig {
    /// Seed domains, queried in order
    #[serde(default)]
    pub seeds: Vec<String>,
    /// Maximum passes over the seed list (unbounded if absent)
    ///
    /// Without a bound, seeds that never yield a usable record (every node
    /// excluded or without addresses) are queried forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_passes: Option<u32>,
    /// Per-query timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Passes over the seed list written by [`BootstrapConfig::generated`]
pub const GENERATED_MAX_PASSES: u32 = 3;

fn default_target_peers() -> u32 {
    8
}

fn default_true() -> bool {
    true
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            target_peers: default_target_peers(),
            cross_source: CrossSourcePolicy::default(),
            graph: GraphConfig::default(),
            dns: DnsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            snapshot: None,
            max_rounds: default_max_rounds(),
        }
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            max_passes: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DnsConfig {
    /// Per-query timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl BootstrapConfig {
    /// Configuration written for a fresh install
    ///
    /// Same as [`Default`] except that DNS passes are bounded by
    /// [`GENERATED_MAX_PASSES`].
    #[must_use]
    pub fn generated() -> Self {
        let mut config = Self::default();
        config.dns.max_passes = Some(GENERATED_MAX_PASSES);
        config
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_peers == 0 {
            return Err(ConfigError::Invalid(
                "target_peers must be at least 1".to_string(),
            ));
        }

        if self.graph.max_rounds == 0 {
            return Err(ConfigError::Invalid(
                "graph.max_rounds must be at least 1".to_string(),
            ));
        }

        if self.dns.max_passes == Some(0) {
            return Err(ConfigError::Invalid(
                "dns.max_passes must be at least 1 when set".to_string(),
            ));
        }

        if self.dns.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "dns.timeout_secs must be at least 1".to_string(),
            ));
        }

        for seed in &self.dns.seeds {
            validate_hostname(seed)?;
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        Ok(())
    }
}

/// Check that `host` is a syntactically valid DNS name
///
/// A single trailing dot is accepted.
fn validate_hostname(host: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid(format!("Seed '{host}' {reason}"));

    let name = host.strip_suffix('.').unwrap_or(host);
    if name.is_empty() {
        return Err(invalid("is empty"));
    }
    if name.len() > 253 {
        return Err(invalid("exceeds 253 characters"));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(invalid("has an empty label"));
        }
        if label.len() > 63 {
            return Err(invalid("has a label longer than 63 characters"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("has a label starting or ending with '-'"));
        }
        if !label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(invalid("contains invalid characters"));
        }
    }

    Ok(())
}
