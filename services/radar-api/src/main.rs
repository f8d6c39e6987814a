//! Radar map tile API service.
//!
//! HTTP server exposing the radar reflectivity layer, the geographic grid
//! overlay and the latest-scan timestamp endpoint.

mod config;
mod handlers;
mod mrms;
mod radar;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{extract::Extension, http::HeaderValue, routing::get, Router};
use clap::Parser;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::Settings;
use mrms::MrmsClient;
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "radar-api")]
#[command(about = "Radar map tile API server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Initialize Prometheus metrics exporter
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let settings = Settings::from_env();
    info!(?settings, "Starting radar tile API server");

    let state = Arc::new(AppState::new());

    // Background latest-scan refresh, first tick fires immediately
    let client = MrmsClient::new(settings.mrms_base_url.clone());
    tokio::spawn(radar::run_refresh_loop(
        state.clone(),
        client,
        Duration::from_secs(settings.refresh_seconds),
    ));

    let app = Router::new()
        .route("/api/latest", get(handlers::latest_handler))
        .route("/api/tiles/:z/:x/:y", get(handlers::radar_tile_handler))
        .route("/api/grid/:z/:x/:y", get(handlers::grid_tile_handler))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(Extension(state))
        .layer(Extension(prometheus_handle))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer(&settings.cors_origins));

    let addr: SocketAddr = args.listen.parse().context("invalid listen address")?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
