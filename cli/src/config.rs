//! Node configuration
//!
//! Read once at startup from an optional TOML file, then overridden by
//! command line flags. Nothing here changes after the server starts.

use serde::Deserialize;
use smeraldo_core::RewardPolicy;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid [rewards] section: {0}")]
    InvalidRewards(String),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub rewards: RewardOverrides,
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            cors_permissive: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Sled,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./data"),
        }
    }
}

/// Optional replacements for the built-in reward rates
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RewardOverrides {
    pub passive_per_hour: Option<u64>,
    pub per_click: Option<u64>,
    pub max_clicks_per_day: Option<u32>,
    pub max_coins_per_day: Option<u64>,
}

impl RewardOverrides {
    /// Merge onto `base`. Zero rates, and a daily cap that could never fit
    /// a single grant, are rejected.
    pub fn apply(&self, base: RewardPolicy) -> Result<RewardPolicy, ConfigError> {
        let policy = RewardPolicy {
            passive_per_hour: self.passive_per_hour.unwrap_or(base.passive_per_hour),
            per_click: self.per_click.unwrap_or(base.per_click),
            max_clicks_per_day: self.max_clicks_per_day.unwrap_or(base.max_clicks_per_day),
            max_coins_per_day: self.max_coins_per_day.unwrap_or(base.max_coins_per_day),
            ..base
        };

        if policy.passive_per_hour == 0 {
            return Err(ConfigError::InvalidRewards(
                "passive_per_hour must be positive".to_string(),
            ));
        }
        if policy.per_click == 0 {
            return Err(ConfigError::InvalidRewards("per_click must be positive".to_string()));
        }
        if policy.max_clicks_per_day == 0 {
            return Err(ConfigError::InvalidRewards(
                "max_clicks_per_day must be positive".to_string(),
            ));
        }
        let largest_grant = policy.per_click.max(policy.passive_per_hour);
        if policy.max_coins_per_day < largest_grant {
            return Err(ConfigError::InvalidRewards(format!(
                "max_coins_per_day ({}) is below a single grant ({})",
                policy.max_coins_per_day, largest_grant
            )));
        }

        Ok(policy)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
}

impl NodeConfig {
    /// Load from `path`. No path, or a path that does not exist, yields
    /// the defaults; an unreadable or malformed file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        if !path.exists() {
            warn!(path = %path.display(), "config_not_found_using_defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.reward_policy()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn reward_policy(&self) -> Result<RewardPolicy, ConfigError> {
        self.rewards.apply(RewardPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::load(None).unwrap();
        assert_eq!(config.server.bind.port(), 5000);
        assert!(config.server.cors_permissive);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.admin.is_none());
        assert_eq!(config.reward_policy().unwrap(), RewardPolicy::default());
    }

    #[test]
    fn test_full_file() {
        let config = NodeConfig::from_toml(
            r#"
            [server]
            bind = "0.0.0.0:8080"
            cors_permissive = false

            [storage]
            backend = "sled"
            data_dir = "/var/lib/smeraldo"

            [rewards]
            per_click = 25
            max_clicks_per_day = 20

            [admin]
            username = "root"
            email = "root@smeraldo.io"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:8080".parse().unwrap());
        assert!(!config.server.cors_permissive);
        assert_eq!(config.storage.backend, StorageBackend::Sled);
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/smeraldo"));

        let policy = config.reward_policy().unwrap();
        assert_eq!(policy.per_click, 25);
        assert_eq!(policy.max_clicks_per_day, 20);
        assert_eq!(policy.passive_per_hour, RewardPolicy::default().passive_per_hour);

        assert_eq!(config.admin.unwrap().username, "root");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = NodeConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, NodeConfig::default());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[storage]\nbackend = \"postgres\"").unwrap();
        assert!(matches!(
            NodeConfig::load(Some(file.path())),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_zero_rates_rejected() {
        for section in ["per_click = 0", "passive_per_hour = 0", "max_clicks_per_day = 0"] {
            let config = NodeConfig::from_toml(&format!("[rewards]\n{}", section)).unwrap();
            assert!(
                matches!(config.reward_policy(), Err(ConfigError::InvalidRewards(_))),
                "{} should be rejected",
                section
            );
        }
    }

    #[test]
    fn test_cap_below_single_grant_rejected() {
        let config =
            NodeConfig::from_toml("[rewards]\nper_click = 50\nmax_coins_per_day = 40").unwrap();
        assert!(matches!(
            config.reward_policy(),
            Err(ConfigError::InvalidRewards(_))
        ));

        // Default passive grant is 500
        let config = NodeConfig::from_toml("[rewards]\nmax_coins_per_day = 499").unwrap();
        assert!(config.reward_policy().is_err());

        let config = NodeConfig::from_toml("[rewards]\nmax_coins_per_day = 500").unwrap();
        assert_eq!(config.reward_policy().unwrap().max_coins_per_day, 500);
    }

    #[test]
    fn test_load_rejects_invalid_rewards() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rewards]\nper_click = 0").unwrap();
        assert!(matches!(
            NodeConfig::load(Some(file.path())),
            Err(ConfigError::InvalidRewards(_))
        ));
    }
}
