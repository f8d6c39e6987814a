//! Application state and shared resources.
//!
//! Layers are explicit fields injected into handlers through the router
//! extension, one renderer per layer.

use projection::WebMercator;
use renderer::graticule::{GraticuleConfig, GraticuleRenderer};

use crate::radar::RadarStore;

/// Shared application state.
pub struct AppState {
    /// Radar reflectivity layer.
    pub radar: RadarStore,
    /// Geographic grid overlay layer.
    pub graticule: GraticuleRenderer<WebMercator>,
}

impl AppState {
    pub fn new() -> Self {
        let config = GraticuleConfig::default();
        let tile_size = config.tile_size;
        Self {
            radar: RadarStore::new(tile_size),
            graticule: GraticuleRenderer::new(WebMercator::new(tile_size), config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
