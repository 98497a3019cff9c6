//! # Userbase Server
//!
//! Main entry point: loads configuration, connects PostgreSQL and Redis,
//! and serves the user service over gRPC until Ctrl+C or SIGTERM.

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use userbase_config::{AppConfig, ConfigLoader};
use userbase_core::telemetry::{init_logging, init_telemetry, shutdown_telemetry, TelemetryConfig};
use userbase_core::UserbaseResult;
use userbase_grpc::GrpcServer;
use userbase_repository::{create_pool, DatabasePoolInterface};
use userbase_server::di::{build_module, DatabaseResolver, ServiceResolver};
use userbase_server::startup;
use userbase_service::create_redis_pool;

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.into_config(),
        Err(e) => {
            let _ = init_logging(&TelemetryConfig::default());
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_telemetry(&config.observability.telemetry(&config.app.name)) {
        eprintln!("Failed to initialize telemetry: {}", e);
        std::process::exit(1);
    }

    info!("Starting Userbase Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let result = run(config).await;
    shutdown_telemetry();

    if let Err(e) = result {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> UserbaseResult<()> {
    startup::print_banner();

    if config.observability.metrics_enabled {
        startup::init_metrics(&config.observability)?;
    }

    let db_pool = create_pool(&config.database).await?;

    let redis_pool = if config.redis.enabled {
        Some(create_redis_pool(&config.redis).await?)
    } else {
        None
    };

    let module = build_module(db_pool.inner().clone(), redis_pool, &config.redis);

    let shutdown = CancellationToken::new();
    let grpc_server = GrpcServer::new(&config.server, module.user_service(), shutdown.clone())?;

    startup::print_startup_info(&config);

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_token.cancel();
    });

    let served = grpc_server.serve().await;

    module.database_pool().close().await;

    served?;
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        () = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
