use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::{net::TcpListener, time::interval};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tripsync_backend_lib::{
    config::{LogSettings, Settings, DEFAULT_CONFIG_PATH},
    router, AppState,
};

/// How often expired rate-limit windows and lockouts are evicted
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// `TripSync` booking server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML settings file
    #[arg(long, env = "TRIPSYNC_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override `server.port`
    #[arg(long)]
    port: Option<u16>,
}

/// Install the global subscriber; `RUST_LOG` wins over `log.level`
fn init_tracing(log: &LogSettings) {
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("tripsync_backend_lib={0},tripsync={0},tower_http={0}", log.level)
        }),
    );
    if log.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)?;
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    init_tracing(&settings.log);
    tracing::debug!(?settings, "settings loaded");

    let addr = settings.socket_addr()?;
    let backend = settings.storage.backend;
    let state = Arc::new(AppState::from_settings(settings)?);

    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut ticker = interval(CLEANUP_INTERVAL);
        loop {
            ticker.tick().await;
            cleanup_state.cleanup();
            tracing::debug!(
                clients = cleanup_state.rate_limiter.tracked(),
                usernames = cleanup_state.login_throttle.tracked(),
                "rate limiter cleanup"
            );
        }
    });

    let app = router::create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, ?backend, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
