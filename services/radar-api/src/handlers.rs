//! HTTP handlers for the radar map API.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::SecondsFormat;
use metrics_exporter_prometheus::PrometheusHandle;
use radar_common::{RadarError, RadarResult, TileCoord};
use renderer::png;
use tracing::instrument;

use crate::state::AppState;

/// Radar tiles must never be cached: the layer content changes with every
/// scan while the URL stays the same (the client busts caches with a
/// timestamp query parameter).
const RADAR_CACHE_CONTROL: &str = "no-store, max-age=0, must-revalidate";

/// Grid overlay tiles are pure functions of their address.
const GRID_CACHE_CONTROL: &str = "public, max-age=86400";

// ============================================================================
// Tile endpoints
// ============================================================================

#[instrument(skip(state))]
pub async fn radar_tile_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((z, x, y)): Path<(u32, u32, String)>,
) -> Response {
    metrics::counter!("radar_api_tile_requests_total", "layer" => "radar").increment(1);

    let coord = match parse_tile_coord(z, x, &y) {
        Ok(coord) => coord,
        Err(err) => return error_response(&err),
    };

    match state.radar.render_tile(coord) {
        Ok(rgba) => {
            let size = state.radar.tile_size() as usize;
            match png::encode_auto(&rgba, size, size) {
                Ok(body) => Response::builder()
                    .status(StatusCode::OK)
                    .header(header::CONTENT_TYPE, "image/png")
                    .header(header::CACHE_CONTROL, RADAR_CACHE_CONTROL)
                    .header(header::PRAGMA, "no-cache")
                    .body(body.into())
                    .unwrap(),
                Err(err) => error_response(&err),
            }
        }
        Err(err) => error_response(&err),
    }
}

#[instrument(skip(state))]
pub async fn grid_tile_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((z, x, y)): Path<(u32, u32, String)>,
) -> Response {
    metrics::counter!("radar_api_tile_requests_total", "layer" => "grid").increment(1);

    let coord = match parse_tile_coord(z, x, &y) {
        Ok(coord) => coord,
        Err(err) => return error_response(&err),
    };

    use renderer::TileRenderer;
    match state.graticule.render_tile(coord) {
        Ok(rgba) => {
            let size = state.graticule.tile_size() as usize;
            match png::encode_auto(&rgba, size, size) {
                Ok(body) => Response::builder()
                    .status(StatusCode::OK)
                    .header(header::CONTENT_TYPE, "image/png")
                    .header(header::CACHE_CONTROL, GRID_CACHE_CONTROL)
                    .body(body.into())
                    .unwrap(),
                Err(err) => error_response(&err),
            }
        }
        Err(err) => error_response(&err),
    }
}

/// Build a validated tile coordinate from path segments; the row segment may
/// carry a `.png` suffix (Leaflet URL templates do).
fn parse_tile_coord(z: u32, x: u32, y: &str) -> RadarResult<TileCoord> {
    let (row, _ext) = y.rsplit_once('.').unwrap_or((y, "png"));
    let y = row.parse::<u32>().map_err(|_| RadarError::InvalidParameter {
        param: "y".to_string(),
        message: format!("not a tile row: {row:?}"),
    })?;

    let coord = TileCoord::new(z, x, y);
    coord.validate()?;
    Ok(coord)
}

// ============================================================================
// Latest scan
// ============================================================================

pub async fn latest_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    metrics::counter!("radar_api_latest_requests_total").increment(1);
    let timestamp = state.radar.latest_timestamp().await;
    Json(serde_json::json!({
        "timestamp": timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
    .into_response()
}

// ============================================================================
// Health & metrics
// ============================================================================

pub async fn health_handler() -> Response {
    Json(serde_json::json!({
        "status": "ok",
        "service": "radar-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

pub async fn metrics_handler(Extension(handle): Extension<PrometheusHandle>) -> String {
    handle.render()
}

// ============================================================================
// Errors
// ============================================================================

fn error_response(err: &RadarError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}
