//! Latest-scan tracking for the radar layer.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use radar_common::{RadarResult, TileCoord};
use renderer::colormap::RadarTileRenderer;
use renderer::TileRenderer;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::mrms::MrmsClient;
use crate::state::AppState;

/// Radar layer state: the most recent RALA scan time plus the tile renderer
/// for the layer.
pub struct RadarStore {
    latest: RwLock<Option<DateTime<Utc>>>,
    renderer: RadarTileRenderer,
}

impl RadarStore {
    pub fn new(tile_size: u32) -> Self {
        Self {
            latest: RwLock::new(None),
            renderer: RadarTileRenderer::new(tile_size),
        }
    }

    /// Latest known scan time; "now" until the first discovery succeeds, so
    /// clients always get a usable cache-busting value.
    pub async fn latest_timestamp(&self) -> DateTime<Utc> {
        self.latest.read().await.unwrap_or_else(Utc::now)
    }

    pub async fn set_latest(&self, timestamp: DateTime<Utc>) {
        *self.latest.write().await = Some(timestamp);
    }

    pub fn render_tile(&self, coord: TileCoord) -> RadarResult<Vec<u8>> {
        self.renderer.render_tile(coord)
    }

    pub fn tile_size(&self) -> u32 {
        self.renderer.tile_size()
    }
}

/// Periodically refresh the latest scan time from MRMS.
///
/// Failures only log; the loop keeps the previous timestamp and tries again
/// on the next tick.
pub async fn run_refresh_loop(state: Arc<AppState>, client: MrmsClient, every: Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        match client.latest_rala_timestamp().await {
            Ok(Some(ts)) => {
                info!(timestamp = %ts, "latest RALA scan updated");
                state.radar.set_latest(ts).await;
            }
            Ok(None) => debug!("no RALA scan discovered yet"),
            Err(err) => warn!(error = %err, "RALA refresh failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_latest_falls_back_to_now() {
        let store = RadarStore::new(256);
        let before = Utc::now();
        let ts = store.latest_timestamp().await;
        assert!(ts >= before);
    }

    #[tokio::test]
    async fn test_set_latest_sticks() {
        let store = RadarStore::new(256);
        let scan = Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 0).unwrap();
        store.set_latest(scan).await;
        assert_eq!(store.latest_timestamp().await, scan);
    }

    #[test]
    fn test_render_tile_shape() {
        let store = RadarStore::new(256);
        let rgba = store.render_tile(TileCoord::new(4, 8, 5)).unwrap();
        assert_eq!(rgba.len(), 256 * 256 * 4);
    }
}
