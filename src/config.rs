//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! The admin password is referenced by env-var name in the config and
//! resolved at runtime, never stored in the file.

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use tracing::warn;

use crate::types::{StakeLimits, MAX_STAKE_CEILING};

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub betting: BettingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    #[serde(default = "default_cors_origin")]
    pub cors_allow_origin: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_cors_origin() -> String {
    "*".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    /// Name of the environment variable holding the admin password.
    pub password_env: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BettingConfig {
    pub min_stake: u64,
    pub max_stake: u64,
}

impl Default for BettingConfig {
    fn default() -> Self {
        Self {
            min_stake: 500_000,
            max_stake: 5_000_000,
        }
    }
}

impl BettingConfig {
    pub fn stake_limits(&self) -> StakeLimits {
        StakeLimits {
            min: Decimal::from(self.min_stake),
            max: Decimal::from(self.max_stake),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// JSON snapshot file. Absent means the book lives only in memory.
    pub snapshot_path: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml_str(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.betting.min_stake == 0 {
            bail!("betting.min_stake must be greater than 0");
        }
        if self.betting.min_stake > self.betting.max_stake {
            bail!(
                "betting.min_stake ({}) exceeds betting.max_stake ({})",
                self.betting.min_stake,
                self.betting.max_stake
            );
        }
        if self.betting.max_stake > MAX_STAKE_CEILING {
            bail!(
                "betting.max_stake ({}) exceeds the ceiling of {}",
                self.betting.max_stake,
                MAX_STAKE_CEILING
            );
        }
        if self.admin.password_env.trim().is_empty() {
            bail!("admin.password_env must name an environment variable");
        }
        Ok(())
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name).with_context(|| format!("Environment variable not set: {env_name}"))
    }

    /// The admin password, if its environment variable is set and non-empty.
    pub fn admin_password(&self) -> Option<SecretString> {
        match Self::resolve_env(&self.admin.password_env) {
            Ok(value) if !value.is_empty() => Some(SecretString::new(value)),
            _ => {
                warn!(
                    env = %self.admin.password_env,
                    "No admin password configured; admin login disabled"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use secrecy::ExposeSecret;

    const SAMPLE: &str = r#"
        [server]
        port = 5000

        [admin]
        password_env = "MASTERLEAGUE_TEST_PASSWORD_SAMPLE"

        [betting]
        min_stake = 500000
        max_stake = 5000000

        [storage]
        snapshot_path = "masterleague_state.json"
    "#;

    #[test]
    fn test_parse_full_config() {
        let cfg = AppConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.cors_allow_origin, "*");
        assert_eq!(cfg.storage.snapshot_path.as_deref(), Some("masterleague_state.json"));

        let limits = cfg.betting.stake_limits();
        assert_eq!(limits.min, dec!(500000));
        assert_eq!(limits.max, dec!(5000000));
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [server]
            port = 8080
            [admin]
            password_env = "X"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.betting.stake_limits(), StakeLimits::default());
        assert!(cfg.storage.snapshot_path.is_none());
    }

    #[test]
    fn test_rejects_inverted_limits() {
        let toml = SAMPLE.replace("min_stake = 500000", "min_stake = 9000000");
        let err = AppConfig::from_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_rejects_zero_min_stake() {
        let toml = SAMPLE.replace("min_stake = 500000", "min_stake = 0");
        assert!(AppConfig::from_toml_str(&toml).is_err());
    }

    #[test]
    fn test_rejects_max_stake_above_ceiling() {
        let toml = SAMPLE.replace("max_stake = 5000000", "max_stake = 1000000000001");
        let err = AppConfig::from_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("ceiling"));

        let toml = SAMPLE.replace("max_stake = 5000000", "max_stake = 1000000000000");
        assert!(AppConfig::from_toml_str(&toml).is_ok());
    }

    #[test]
    fn test_rejects_missing_server() {
        assert!(AppConfig::from_toml_str("[admin]\npassword_env = \"X\"\n").is_err());
    }

    #[test]
    fn test_admin_password_from_env() {
        let toml = SAMPLE.replace(
            "MASTERLEAGUE_TEST_PASSWORD_SAMPLE",
            "MASTERLEAGUE_TEST_PASSWORD_SET",
        );
        let cfg = AppConfig::from_toml_str(&toml).unwrap();
        std::env::set_var("MASTERLEAGUE_TEST_PASSWORD_SET", "hunter2");
        let secret = cfg.admin_password().unwrap();
        assert_eq!(secret.expose_secret(), "hunter2");
    }

    #[test]
    fn test_admin_password_missing() {
        let toml = SAMPLE.replace(
            "MASTERLEAGUE_TEST_PASSWORD_SAMPLE",
            "MASTERLEAGUE_TEST_PASSWORD_NEVER_SET",
        );
        let cfg = AppConfig::from_toml_str(&toml).unwrap();
        assert!(cfg.admin_password().is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load("/nonexistent/masterleague.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
