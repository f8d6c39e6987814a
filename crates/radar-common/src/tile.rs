//! Slippy-map tile addressing.
//!
//! Standard XYZ convention: zoom `z` splits the world into `2^z x 2^z`
//! square tiles, column `x` growing east, row `y` growing south from the
//! northwest corner.

use crate::{RadarError, RadarResult};
use serde::{Deserialize, Serialize};

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Number of tile columns (and rows) at this coordinate's zoom level.
    pub fn matrix_size(&self) -> u64 {
        1u64 << self.z.min(63)
    }

    /// Check that the address lies inside the pyramid.
    ///
    /// Out-of-range addresses are a caller error; handlers reject them
    /// before any rendering happens.
    pub fn validate(&self) -> RadarResult<()> {
        let side = if self.z < 32 { 1u64 << self.z } else { 0 };
        if side == 0 || self.x as u64 >= side || self.y as u64 >= side {
            return Err(RadarError::InvalidTileAddress {
                z: self.z,
                x: self.x,
                y: self.y,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_in_range() {
        assert!(TileCoord::new(0, 0, 0).validate().is_ok());
        assert!(TileCoord::new(4, 15, 15).validate().is_ok());
        assert!(TileCoord::new(4, 8, 5).validate().is_ok());
    }

    #[test]
    fn test_validate_out_of_range() {
        // Column one past the edge
        assert!(TileCoord::new(4, 16, 0).validate().is_err());
        // Row out of range
        assert!(TileCoord::new(0, 0, 1).validate().is_err());
        // Zoom too deep for 32-bit tile indices
        assert!(TileCoord::new(32, 0, 0).validate().is_err());
    }

    #[test]
    fn test_matrix_size() {
        assert_eq!(TileCoord::new(0, 0, 0).matrix_size(), 1);
        assert_eq!(TileCoord::new(4, 0, 0).matrix_size(), 16);
    }

    #[test]
    fn test_display() {
        assert_eq!(TileCoord::new(4, 8, 5).to_string(), "4/8/5");
    }
}
