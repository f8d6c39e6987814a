//! Geographic grid overlay (graticule) tiles.
//!
//! Draws the meridians and parallels crossing one slippy-map tile at a fixed
//! angular spacing, with degree labels anchored at the tile's top and right
//! edges. Each tile is laid out in isolation: a line on a shared boundary
//! belongs to the tile whose west (or south) edge carries it, and labels
//! repeat in every tile a line crosses. Neighboring tiles never coordinate.

use projection::Projection;
use radar_common::{BoundingBox, RadarError, RadarResult, TileCoord};
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::trace;

use crate::glyphs;
use crate::TileRenderer;

/// Rendering configuration for the graticule overlay.
#[derive(Debug, Clone)]
pub struct GraticuleConfig {
    /// Angular spacing between adjacent grid lines, degrees.
    pub spacing_deg: f64,
    /// Tile edge length in pixels.
    pub tile_size: u32,
    /// Grid line stroke color.
    pub line_color: [u8; 4],
    /// Label text color.
    pub label_color: [u8; 4],
    /// Label backing rectangle color.
    pub label_background: [u8; 4],
    /// Label font size in pixels.
    pub font_size: f32,
}

impl Default for GraticuleConfig {
    fn default() -> Self {
        Self {
            spacing_deg: 5.0,
            tile_size: 256,
            line_color: [255, 255, 255, 46],
            label_color: [255, 255, 255, 230],
            label_background: [0, 0, 0, 89],
            font_size: 10.0,
        }
    }
}

/// A single grid line: constant longitude or constant latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridLine {
    Meridian(f64),
    Parallel(f64),
}

/// Label placement for one grid line, in tile-local pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    pub text: String,
    /// Baseline origin of the first glyph.
    pub origin: (i32, i32),
    /// Backing rectangle as (x, y, width, height).
    pub rect: (i32, i32, i32, i32),
}

/// A grid line projected into tile-local pixel space, with its label.
///
/// For meridians `from` is the top-edge intersection; for parallels `to` is
/// the right-edge intersection.
#[derive(Debug, Clone)]
pub struct PlacedLine {
    pub line: GridLine,
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub label: PlacedLabel,
}

/// Grid lines crossing `bounds` at multiples of `spacing`: inclusive at the
/// west and south edges, exclusive at the east and north edges, so a line on
/// a shared tile boundary is selected by exactly one of the two tiles.
pub fn select_grid_lines(bounds: &BoundingBox, spacing: f64) -> Vec<GridLine> {
    let mut lines = Vec::new();
    if !(spacing > 0.0) {
        return lines;
    }

    let mut lon = (bounds.min_x / spacing).ceil() * spacing;
    while lon < bounds.max_x {
        lines.push(GridLine::Meridian(lon));
        lon += spacing;
    }

    let mut lat = (bounds.min_y / spacing).ceil() * spacing;
    while lat < bounds.max_y {
        lines.push(GridLine::Parallel(lat));
        lat += spacing;
    }

    lines
}

/// Degree label text: whole degrees print without a fraction.
fn label_text(deg: f64) -> String {
    if deg == deg.trunc() {
        format!("{}°", deg as i64)
    } else {
        format!("{}°", deg)
    }
}

/// Renders the graticule overlay for single tiles.
///
/// Pure and stateless: safe to call concurrently for different addresses,
/// each call allocates a fresh raster.
pub struct GraticuleRenderer<P> {
    projection: P,
    config: GraticuleConfig,
}

impl<P: Projection> GraticuleRenderer<P> {
    pub fn new(projection: P, config: GraticuleConfig) -> Self {
        Self { projection, config }
    }

    pub fn config(&self) -> &GraticuleConfig {
        &self.config
    }

    /// Geographic bounds of a tile, from unprojecting its corners.
    pub fn tile_bounds(&self, coord: TileCoord) -> BoundingBox {
        let ts = self.config.tile_size as f64;
        let (lon_west, lat_north) = self
            .projection
            .unproject(coord.x as f64 * ts, coord.y as f64 * ts, coord.z);
        let (lon_east, lat_south) =
            self.projection
                .unproject((coord.x + 1) as f64 * ts, (coord.y + 1) as f64 * ts, coord.z);
        BoundingBox::new(lon_west, lat_south, lon_east, lat_north)
    }

    /// Project and place every grid line crossing `coord`, labels included.
    ///
    /// Meridian labels hang 3px right / 12px down from the top-edge
    /// intersection; parallel labels sit right-aligned 4px left / 4px up
    /// from the right-edge intersection. Backing rectangles span 9px above
    /// to 2px below the baseline and the measured text width plus 4px.
    pub fn layout(&self, coord: TileCoord) -> RadarResult<Vec<PlacedLine>> {
        coord.validate()?;

        let bounds = self.tile_bounds(coord);
        let ts = self.config.tile_size as f64;
        let origin_x = coord.x as f64 * ts;
        let origin_y = coord.y as f64 * ts;
        let font = self.config.font_size;

        let mut placed = Vec::new();
        for line in select_grid_lines(&bounds, self.config.spacing_deg) {
            match line {
                GridLine::Meridian(lon) => {
                    let (gx, gy) = self.projection.project(lon, bounds.max_y, coord.z);
                    let from = (gx - origin_x, gy - origin_y);
                    let (gx, gy) = self.projection.project(lon, bounds.min_y, coord.z);
                    let to = (gx - origin_x, gy - origin_y);

                    let text = label_text(lon);
                    let tx = (from.0 + 3.0).round() as i32;
                    let ty = (from.1 + 12.0).round() as i32;
                    let w = glyphs::measure_text(&text, font).ceil() as i32 + 4;
                    placed.push(PlacedLine {
                        line,
                        from,
                        to,
                        label: PlacedLabel {
                            text,
                            origin: (tx, ty),
                            rect: (tx - 2, ty - 9, w, 11),
                        },
                    });
                }
                GridLine::Parallel(lat) => {
                    let (gx, gy) = self.projection.project(bounds.min_x, lat, coord.z);
                    let from = (gx - origin_x, gy - origin_y);
                    let (gx, gy) = self.projection.project(bounds.max_x, lat, coord.z);
                    let to = (gx - origin_x, gy - origin_y);

                    let text = label_text(lat);
                    let tx = (to.0 - 4.0).round() as i32;
                    let ty = (to.1 - 4.0).round() as i32;
                    let w = glyphs::measure_text(&text, font).ceil() as i32 + 4;
                    placed.push(PlacedLine {
                        line,
                        from,
                        to,
                        label: PlacedLabel {
                            text,
                            origin: (tx - w + 2, ty),
                            rect: (tx - w, ty - 9, w, 11),
                        },
                    });
                }
            }
        }

        trace!(tile = %coord, lines = placed.len(), "graticule layout");
        Ok(placed)
    }

    /// Render the overlay tile. A tile crossed by no grid line comes back
    /// fully transparent.
    pub fn render(&self, coord: TileCoord) -> RadarResult<Pixmap> {
        let placed = self.layout(coord)?;

        let size = self.config.tile_size;
        let mut pixmap = Pixmap::new(size, size)
            .ok_or_else(|| RadarError::Render(format!("cannot allocate {size}x{size} tile")))?;

        let mut line_paint = Paint::default();
        let [r, g, b, a] = self.config.line_color;
        line_paint.set_color_rgba8(r, g, b, a);
        line_paint.anti_alias = true;

        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };

        let mut bg_paint = Paint::default();
        let [r, g, b, a] = self.config.label_background;
        bg_paint.set_color_rgba8(r, g, b, a);
        bg_paint.anti_alias = false;

        for pl in &placed {
            let mut pb = PathBuilder::new();
            pb.move_to(pl.from.0 as f32, pl.from.1 as f32);
            pb.line_to(pl.to.0 as f32, pl.to.1 as f32);
            if let Some(path) = pb.finish() {
                pixmap.stroke_path(&path, &line_paint, &stroke, Transform::identity(), None);
            }

            let (rx, ry, rw, rh) = pl.label.rect;
            if let Some(rect) = Rect::from_xywh(rx as f32, ry as f32, rw as f32, rh as f32) {
                pixmap.fill_rect(rect, &bg_paint, Transform::identity(), None);
            }
            glyphs::draw_text(
                &mut pixmap,
                pl.label.origin.0 as f32,
                pl.label.origin.1 as f32,
                &pl.label.text,
                self.config.font_size,
                self.config.label_color,
            );
        }

        Ok(pixmap)
    }
}

impl<P: Projection> TileRenderer for GraticuleRenderer<P> {
    fn render_tile(&self, coord: TileCoord) -> RadarResult<Vec<u8>> {
        Ok(crate::pixmap_to_rgba(&self.render(coord)?))
    }

    fn tile_size(&self) -> u32 {
        self.config.tile_size
    }
}
