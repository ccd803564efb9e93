use std::{net::SocketAddr, sync::Arc, time::Duration};

use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    adapters::outbound::{
        postgres::PostgresActivityAdapter,
        prometheus::{self, PrometheusActivityMetrics},
    },
    app_state::AppState,
    config::{ConfigError, Settings},
    domain::{ports::inbound::ActivityService, services::ActivityServiceImpl},
    repositories::ActivityRepositoryImpl,
};

mod adapters;
mod app_state;
mod config;
mod domain;
mod repositories;
mod router;
mod routes;

const METRICS_UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("failed to read configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to run migrations: {0}")]
    Migrate(#[from] MigrateError),
    #[error("failed to install metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
    #[error("invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = config::read_config()?;

    let connection_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .max_lifetime(config.database.max_lifetime())
        .connect_lazy_with(config.database.with_db());

    sqlx::migrate!("./migrations").run(&connection_pool).await?;

    let metrics_handle = if config.metrics.enabled {
        let handle = prometheus::install_recorder()?;
        spawn_metrics_upkeep(handle.clone());
        Some(handle)
    } else {
        None
    };

    let activity_service = build_activity_service(&config, connection_pool.clone());

    let mut app_state = AppState::new(activity_service.clone());
    if let Some(handle) = metrics_handle {
        app_state = app_state.with_metrics_handle(handle);
    }

    let app = router::create(app_state, &config);

    let addr: SocketAddr =
        format!("{}:{}", config.application.host, config.application.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown(activity_service, connection_pool).await;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("track_api=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn build_activity_service(config: &Settings, pool: PgPool) -> Arc<dyn ActivityService> {
    let records = Arc::new(ActivityRepositoryImpl::new(pool));
    let repo = Arc::new(PostgresActivityAdapter::new(records));

    if config.metrics.enabled {
        Arc::new(ActivityServiceImpl::with_metrics(
            repo,
            Arc::new(PrometheusActivityMetrics),
        ))
    } else {
        Arc::new(ActivityServiceImpl::new(repo))
    }
}

fn spawn_metrics_upkeep(handle: PrometheusHandle) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(METRICS_UPKEEP_INTERVAL);
        loop {
            interval.tick().await;
            handle.run_upkeep();
        }
    });
}

/// Background stops still need the pool, so drain them before closing it.
async fn shutdown(activity_service: Arc<dyn ActivityService>, pool: PgPool) {
    info!("Shutting down, draining background work");
    activity_service.drain().await;
    pool.close().await;
    info!("Shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install ctrl+c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install sigterm handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
