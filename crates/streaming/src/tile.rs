use std::fmt;

use foundation::Aabb2;
use foundation::math::Vec2;

/// Edge length of a map tile in pixels, at every zoom.
pub const TILE_SIZE: f64 = 256.0;

/// Column/row address of a tile within one zoom level.
///
/// Keys order row-major (x first, then y) which only matters for the
/// deterministic iteration of cache maps keyed by them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileKey {
    pub x: i64,
    pub y: i64,
}

impl TileKey {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Pixel extent of this tile on the world plane of its zoom.
    pub fn bounds(&self) -> Aabb2 {
        Aabb2::new(
            self.x as f64 * TILE_SIZE,
            self.y as f64 * TILE_SIZE,
            (self.x + 1) as f64 * TILE_SIZE,
            (self.y + 1) as f64 * TILE_SIZE,
        )
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Tiles covering the viewport anchored at `origin`, row by row.
///
/// The range runs from the floored origin tile through the ceiled far
/// edge inclusive, so a viewport ending exactly on a tile boundary
/// still picks up the next column and row. Requesting one spare ring
/// beats a visible pop-in when the map pans.
pub fn covering(origin: Vec2, width: u32, height: u32) -> Vec<TileKey> {
    let min_x = (origin.x / TILE_SIZE).floor() as i64;
    let min_y = (origin.y / TILE_SIZE).floor() as i64;
    let max_x = ((origin.x + width as f64) / TILE_SIZE).ceil() as i64;
    let max_y = ((origin.y + height as f64) / TILE_SIZE).ceil() as i64;

    let mut keys = Vec::with_capacity(((max_x - min_x + 1) * (max_y - min_y + 1)) as usize);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            keys.push(TileKey::new(x, y));
        }
    }
    keys
}
