//! Homedesk server entry point

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use homedesk_config::Settings;
use homedesk_persistence::{PersistenceLayer, ScyllaConfig};
use homedesk_server::{build_agent, create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("HOMEDESK_CONFIG").ok();
    let settings = homedesk_config::load_settings(config_path.as_deref())?;

    init_tracing(&settings);

    tracing::info!("Starting homedesk server v{}", env!("CARGO_PKG_VERSION"));

    let persistence = init_persistence(&settings).await;
    let agent = build_agent(&settings, persistence);
    let state = AppState::new(settings.clone(), agent);

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("homedesk={},tower_http=info", level).into()
    });

    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Connect storage, falling back to in-memory stores when ScyllaDB is
/// disabled or unreachable
async fn init_persistence(settings: &Settings) -> PersistenceLayer {
    let company = &settings.business.company_name;

    if !settings.scylla.enabled {
        tracing::info!("ScyllaDB disabled, using in-memory stores");
        return homedesk_persistence::in_memory(company);
    }

    let config = ScyllaConfig {
        hosts: settings.scylla.hosts.clone(),
        keyspace: settings.scylla.keyspace.clone(),
        replication_factor: settings.scylla.replication_factor,
    };

    match homedesk_persistence::init(config, company).await {
        Ok(layer) => {
            tracing::info!("Connected to ScyllaDB");
            layer
        }
        Err(e) => {
            tracing::warn!(error = %e, "ScyllaDB unavailable, using in-memory stores");
            homedesk_persistence::in_memory(company)
        }
    }
}
