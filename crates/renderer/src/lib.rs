//! Tile rendering for the radar map viewer.
//!
//! One module per rendering concern:
//! - Geographic grid overlay (meridians/parallels with degree labels)
//! - Segment-stroke label glyphs
//! - Reflectivity colormap for the radar layer
//! - PNG encoding

pub mod colormap;
pub mod glyphs;
pub mod graticule;
pub mod png;

use radar_common::{RadarResult, TileCoord};

/// A pluggable tile producer.
///
/// One implementation per layer; the serving host composes them without
/// knowing how any particular layer paints its pixels.
pub trait TileRenderer: Send + Sync {
    /// Render the tile at `coord` as straight-alpha RGBA bytes,
    /// `tile_size * tile_size * 4` long. The caller owns the buffer.
    fn render_tile(&self, coord: TileCoord) -> RadarResult<Vec<u8>>;

    /// Edge length in pixels of the tiles this renderer produces.
    fn tile_size(&self) -> u32;
}

/// Convert a pixmap to straight-alpha RGBA bytes.
pub fn pixmap_to_rgba(pixmap: &tiny_skia::Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixmap.pixels().len() * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}
