//! Configuration loader with layered sources.

use crate::AppConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};
use userbase_core::UserbaseError;

/// Environment variable prefix for structured overrides (`USERBASE__REDIS__DB=2`).
pub const ENV_PREFIX: &str = "USERBASE";

/// Plain variables understood for compatibility with older deployments.
pub mod legacy_env {
    /// PostgreSQL connection string.
    pub const DB_DSN: &str = "DB_DSN";
    /// Redis `host:port`.
    pub const REDIS_ADDR: &str = "REDIS_ADDR";
    /// Redis password.
    pub const REDIS_PASSWORD: &str = "REDIS_PASSWORD";
    /// Redis logical database index.
    pub const REDIS_DB: &str = "REDIS_DB";
}

/// Configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Uncommitted local overrides
    /// 4. Environment variables with the `USERBASE__` prefix
    /// 5. `DB_DSN`, `REDIS_ADDR`, `REDIS_PASSWORD`, `REDIS_DB`
    pub fn new(config_dir: impl Into<String>) -> Result<Self, UserbaseError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let config_dir = config_dir.into();
        let config = load_config(&config_dir, None)?;

        Ok(Self { config, config_dir })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, UserbaseError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Directory the configuration was read from.
    #[must_use]
    pub fn config_dir(&self) -> &str {
        &self.config_dir
    }

    /// Consumes the loader and returns the configuration.
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }
}

/// Loads configuration from `config_dir`.
///
/// `vars` replaces the process environment when given; used by tests.
pub fn load_config(
    config_dir: &str,
    vars: Option<HashMap<String, String>>,
) -> Result<AppConfig, UserbaseError> {
    let lookup = |key: &str| -> Option<String> {
        match &vars {
            Some(vars) => vars.get(key).cloned(),
            None => std::env::var(key).ok(),
        }
    };

    let environment = lookup("USERBASE_ENVIRONMENT").unwrap_or_else(|| "development".to_string());
    info!("Loading configuration for environment: {}", environment);

    let mut builder = Config::builder();

    for name in ["default", environment.as_str(), "local"] {
        let path = format!("{}/{}.toml", config_dir, name);
        if Path::new(&path).exists() {
            debug!("Loading config from: {}", path);
            builder = builder.add_source(File::with_name(&path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(vars.clone().map(|vars| vars.into_iter().collect())),
    );

    builder = apply_legacy_env(builder, &lookup)?;

    let app_config: AppConfig = builder
        .build()
        .and_then(|config| config.try_deserialize())
        .map_err(config_error_to_userbase_error)?;

    validate_config(&app_config)?;

    Ok(app_config)
}

fn apply_legacy_env(
    builder: ConfigBuilder<DefaultState>,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>, UserbaseError> {
    let redis_db = lookup(legacy_env::REDIS_DB)
        .map(|raw| {
            raw.trim().parse::<i64>().map_err(|e| {
                UserbaseError::Configuration(format!("Error parsing {}: {}", legacy_env::REDIS_DB, e))
            })
        })
        .transpose()?;

    let redis_url = lookup(legacy_env::REDIS_ADDR).map(|addr| {
        if addr.contains("://") {
            addr
        } else {
            format!("redis://{}", addr)
        }
    });

    builder
        .set_override_option("database.url", lookup(legacy_env::DB_DSN))
        .and_then(|b| b.set_override_option("redis.url", redis_url))
        .and_then(|b| b.set_override_option("redis.password", lookup(legacy_env::REDIS_PASSWORD)))
        .and_then(|b| b.set_override_option("redis.db", redis_db))
        .map_err(config_error_to_userbase_error)
}

/// Validates the configuration.
fn validate_config(config: &AppConfig) -> Result<(), UserbaseError> {
    if config.database.url.trim().is_empty() {
        return Err(UserbaseError::Configuration("Database URL is required".to_string()));
    }

    if config.server.request_timeout_secs == 0 {
        return Err(UserbaseError::Configuration(
            "server.request_timeout_secs must be greater than zero".to_string(),
        ));
    }

    if config.redis.enabled {
        config.redis.connection_url()?;
    } else {
        warn!("Redis is disabled; every user lookup will hit the database");
    }

    Ok(())
}

fn config_error_to_userbase_error(err: ConfigError) -> UserbaseError {
    UserbaseError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheWritePolicy;
    use std::fs;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().to_str().unwrap(), Some(HashMap::new())).unwrap();
        assert_eq!(config.server.grpc_port, 50051);
        assert_eq!(config.redis.db, None);
    }

    #[test]
    fn test_file_layers() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[server]\ngrpc_port = 6000\n[redis]\nttl_secs = 60\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            "[redis]\ncreate_write_policy = \"best_effort\"\n",
        )
        .unwrap();

        let config = load_config(
            dir.path().to_str().unwrap(),
            Some(vars(&[("USERBASE_ENVIRONMENT", "staging")])),
        )
        .unwrap();

        assert_eq!(config.server.grpc_port, 6000);
        assert_eq!(config.redis.ttl_secs, 60);
        assert_eq!(config.redis.create_write_policy, CacheWritePolicy::BestEffort);
    }

    #[test]
    fn test_prefixed_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[server]\ngrpc_port = 6000\n").unwrap();

        let config = load_config(
            dir.path().to_str().unwrap(),
            Some(vars(&[("USERBASE__SERVER__GRPC_PORT", "7000")])),
        )
        .unwrap();

        assert_eq!(config.server.grpc_port, 7000);
    }

    #[test]
    fn test_legacy_env() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(
            dir.path().to_str().unwrap(),
            Some(vars(&[
                ("DB_DSN", "postgres://app:pw@db:5432/users"),
                ("REDIS_ADDR", "cache:6379"),
                ("REDIS_PASSWORD", "hunter2"),
                ("REDIS_DB", "2"),
            ])),
        )
        .unwrap();

        assert_eq!(config.database.url, "postgres://app:pw@db:5432/users");
        assert_eq!(config.redis.url, "redis://cache:6379");
        assert_eq!(config.redis.password.as_deref(), Some("hunter2"));
        assert_eq!(config.redis.db, Some(2));
        assert_eq!(
            config.redis.connection_url().unwrap(),
            "redis://:hunter2@cache:6379/2"
        );
    }

    #[test]
    fn test_legacy_redis_db_must_be_integer() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(
            dir.path().to_str().unwrap(),
            Some(vars(&[("REDIS_DB", "zero")])),
        );
        match result {
            Err(UserbaseError::Configuration(msg)) => assert!(msg.contains("REDIS_DB")),
            other => panic!("Expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_database_url_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[database]\nurl = \"\"\n").unwrap();
        let result = load_config(dir.path().to_str().unwrap(), Some(HashMap::new()));
        assert!(matches!(result, Err(UserbaseError::Configuration(_))));
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[server]\nrequest_timeout_secs = 0\n").unwrap();
        let result = load_config(dir.path().to_str().unwrap(), Some(HashMap::new()));
        assert!(matches!(result, Err(UserbaseError::Configuration(_))));
    }
}
