//! Server startup utilities.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;
use userbase_config::{mask_password, AppConfig, ObservabilityConfig};
use userbase_core::{UserbaseError, UserbaseResult};

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
  _   _                 _
 | | | |___  ___ _ __  | |__   __ _ ___  ___
 | | | / __|/ _ \ '__| | '_ \ / _` / __|/ _ \
 | |_| \__ \  __/ |    | |_) | (_| \__ \  __/
  \___/|___/\___|_|    |_.__/ \__,_|___/\___|
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("gRPC API:  http://{}", config.server.grpc_addr());
    info!("Health:    grpc.health.v1.Health on the same port");
    if config.observability.metrics_enabled {
        info!("Metrics:   http://{}/metrics", config.observability.metrics_addr);
    }
    info!("Database:  {}", mask_password(&config.database.url));
    if config.redis.enabled {
        let url = config
            .redis
            .connection_url()
            .unwrap_or_else(|_| config.redis.url.clone());
        info!(
            "Redis:     {} (ttl {}s, create policy {:?})",
            mask_password(&url),
            config.redis.ttl_secs,
            config.redis.create_write_policy
        );
    } else {
        info!("Redis:     disabled");
    }
    info!("{}", separator);
}

/// Installs the Prometheus recorder with its scrape listener.
pub fn init_metrics(config: &ObservabilityConfig) -> UserbaseResult<()> {
    let addr: SocketAddr = config.metrics_addr.parse().map_err(|e| {
        UserbaseError::Configuration(format!(
            "Invalid metrics address '{}': {}",
            config.metrics_addr, e
        ))
    })?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| UserbaseError::Internal(format!("Failed to install Prometheus exporter: {}", e)))?;

    userbase_service::metrics::register_metrics();
    info!("Prometheus metrics exposed on {}", addr);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut config = AppConfig::default();
        print_startup_info(&config);

        config.redis.enabled = false;
        config.observability.metrics_enabled = true;
        print_startup_info(&config);
    }

    #[test]
    fn test_init_metrics_rejects_bad_address() {
        let config = ObservabilityConfig {
            metrics_addr: "not an address".to_string(),
            ..ObservabilityConfig::default()
        };
        assert!(matches!(
            init_metrics(&config),
            Err(UserbaseError::Configuration(_))
        ));
    }
}
