//! Spherical Web Mercator (EPSG:3857) in slippy-map pixel space.

use std::f64::consts::PI;

use radar_common::{BoundingBox, TileCoord};

use crate::Projection;

/// Standard Web Mercator tile pyramid projection.
///
/// Longitude maps linearly; latitude through the inverse Gudermannian
/// relation, so that `unproject(project(p)) == p` up to floating point.
#[derive(Debug, Clone, Copy)]
pub struct WebMercator {
    tile_size: u32,
}

impl WebMercator {
    pub fn new(tile_size: u32) -> Self {
        Self { tile_size }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// World width (and height) in pixels at `zoom`.
    fn world_size(&self, zoom: u32) -> f64 {
        self.tile_size as f64 * 2f64.powi(zoom as i32)
    }

    /// Geographic bounds of one tile, from unprojecting its corners.
    pub fn tile_bounds(&self, coord: TileCoord) -> BoundingBox {
        let ts = self.tile_size as f64;
        let (lon_west, lat_north) =
            self.unproject(coord.x as f64 * ts, coord.y as f64 * ts, coord.z);
        let (lon_east, lat_south) =
            self.unproject((coord.x + 1) as f64 * ts, (coord.y + 1) as f64 * ts, coord.z);
        BoundingBox::new(lon_west, lat_south, lon_east, lat_north)
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Projection for WebMercator {
    fn project(&self, lon: f64, lat: f64, zoom: u32) -> (f64, f64) {
        let world = self.world_size(zoom);
        let x = (lon + 180.0) / 360.0 * world;
        let y = (1.0 - lat.to_radians().tan().asinh() / PI) / 2.0 * world;
        (x, y)
    }

    fn unproject(&self, pixel_x: f64, pixel_y: f64, zoom: u32) -> (f64, f64) {
        let world = self.world_size(zoom);
        let lon = pixel_x / world * 360.0 - 180.0;
        let t = PI * (1.0 - 2.0 * pixel_y / world);
        let lat = t.sinh().atan().to_degrees();
        (lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_known_anchor_points() {
        let proj = WebMercator::default();

        // Greenwich/equator sits at the center of the zoom-0 world tile
        let (x, y) = proj.project(0.0, 0.0, 0);
        assert!((x - 128.0).abs() < EPS);
        assert!((y - 128.0).abs() < EPS);

        // Western edge of the world
        let (x, _) = proj.project(-180.0, 0.0, 0);
        assert!(x.abs() < EPS);

        // One zoom level doubles the world
        let (x, y) = proj.project(0.0, 0.0, 1);
        assert!((x - 256.0).abs() < EPS);
        assert!((y - 256.0).abs() < EPS);
    }

    #[test]
    fn test_roundtrip() {
        let proj = WebMercator::default();
        for &(lon, lat) in &[
            (0.0, 0.0),
            (-98.35, 39.5),
            (179.9, -84.9),
            (-179.9, 84.9),
            (13.4, 52.5),
        ] {
            for z in 0..=12 {
                let (px, py) = proj.project(lon, lat, z);
                let (lon2, lat2) = proj.unproject(px, py, z);
                assert!((lon - lon2).abs() < 1e-6, "lon roundtrip at z{}", z);
                assert!((lat - lat2).abs() < 1e-6, "lat roundtrip at z{}", z);
            }
        }
    }

    #[test]
    fn test_tile_bounds_matches_analytic_formulas() {
        let proj = WebMercator::default();
        let coord = TileCoord::new(4, 8, 5);
        let bounds = proj.tile_bounds(coord);

        // lon = x / 2^z * 360 - 180
        let n = 16.0;
        assert!((bounds.min_x - (8.0 / n * 360.0 - 180.0)).abs() < EPS);
        assert!((bounds.max_x - (9.0 / n * 360.0 - 180.0)).abs() < EPS);

        // lat = atan(sinh(pi - 2*pi*y / 2^z))
        let lat = |y: f64| (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees();
        assert!((bounds.max_y - lat(5.0)).abs() < EPS);
        assert!((bounds.min_y - lat(6.0)).abs() < EPS);
    }

    #[test]
    fn test_zoom_zero_covers_world() {
        let proj = WebMercator::default();
        let bounds = proj.tile_bounds(TileCoord::new(0, 0, 0));
        assert!((bounds.min_x + 180.0).abs() < EPS);
        assert!((bounds.max_x - 180.0).abs() < EPS);
        // Mercator clips latitude near +-85.05
        assert!((bounds.max_y - 85.051_128_779_806_6).abs() < 1e-6);
        assert!((bounds.min_y + 85.051_128_779_806_6).abs() < 1e-6);
    }

    #[test]
    fn test_points_inside_tile_project_into_tile_pixels() {
        // Any point inside a tile's bbox lands within [0, tile_size) of the
        // tile's own pixel origin
        let proj = WebMercator::default();
        let coord = TileCoord::new(6, 17, 24);
        let bounds = proj.tile_bounds(coord);
        let origin_x = coord.x as f64 * 256.0;
        let origin_y = coord.y as f64 * 256.0;

        for i in 0..10 {
            for j in 0..10 {
                let lon = bounds.min_x + bounds.width() * (i as f64 + 0.5) / 10.0;
                let lat = bounds.min_y + bounds.height() * (j as f64 + 0.5) / 10.0;
                let (px, py) = proj.project(lon, lat, coord.z);
                let local_x = px - origin_x;
                let local_y = py - origin_y;
                assert!((0.0..256.0).contains(&local_x), "x {} outside tile", local_x);
                assert!((0.0..256.0).contains(&local_y), "y {} outside tile", local_y);
            }
        }
    }
}
