//! Reflectivity color scale and the radar layer renderer.

use radar_common::{RadarResult, TileCoord};

use crate::TileRenderer;

/// dBZ thresholds and colors, light to heavy precipitation.
pub const COLOR_STOPS: [(f32, [u8; 3]); 12] = [
    (-10.0, [100, 100, 255]), // light blue
    (0.0, [0, 204, 255]),
    (10.0, [0, 255, 204]),
    (20.0, [0, 255, 0]),
    (30.0, [170, 255, 0]),
    (35.0, [255, 238, 0]),
    (40.0, [255, 204, 0]),
    (45.0, [255, 153, 0]),
    (50.0, [255, 102, 0]),
    (55.0, [255, 0, 0]),
    (60.0, [204, 0, 0]),
    (65.0, [153, 0, 0]),
];

/// Color for a reflectivity value: the stop at the first threshold above
/// `dbz`, saturating at the heaviest stop.
pub fn color_for_dbz(dbz: f32, alpha: u8) -> [u8; 4] {
    let mut last = [0u8, 0, 0];
    for (threshold, color) in COLOR_STOPS {
        last = color;
        if dbz < threshold {
            break;
        }
    }
    [last[0], last[1], last[2], alpha]
}

/// Dithered placeholder tile: a vertical dBZ gradient painted on every third
/// pixel, so the layer is visibly present without obscuring the basemap.
pub fn render_placeholder_tile(tile_size: u32) -> Vec<u8> {
    let size = tile_size as usize;
    let mut pixels = vec![0u8; size * size * 4];
    for j in 0..size {
        let dbz = -10.0 + 75.0 * (j as f32 / size as f32);
        let rgba = color_for_dbz(dbz, 120);
        for i in 0..size {
            if (i + j) % 3 == 0 {
                let idx = (j * size + i) * 4;
                pixels[idx..idx + 4].copy_from_slice(&rgba);
            }
        }
    }
    pixels
}

/// Radar reflectivity layer renderer.
///
/// TODO: render from the latest RALA grid once GRIB2 ingest lands; until
/// then every tile is the placeholder gradient.
pub struct RadarTileRenderer {
    tile_size: u32,
}

impl RadarTileRenderer {
    pub fn new(tile_size: u32) -> Self {
        Self { tile_size }
    }
}

impl TileRenderer for RadarTileRenderer {
    fn render_tile(&self, coord: TileCoord) -> RadarResult<Vec<u8>> {
        coord.validate()?;
        Ok(render_placeholder_tile(self.tile_size))
    }

    fn tile_size(&self) -> u32 {
        self.tile_size
    }
}
