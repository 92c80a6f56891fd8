use crate::math::Vec2;

/// Axis-aligned bounding box in map pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb2 {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Aabb2 {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounds of a flat `[x0,y0,x1,y1,..]` ring. Empty input collapses to
    /// a degenerate box at the origin.
    pub fn from_flat_ring(ring: &[f64]) -> Self {
        if ring.len() < 2 {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        }
        let mut bounds = Self::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        );
        for pair in ring.chunks_exact(2) {
            bounds.min_x = bounds.min_x.min(pair[0]);
            bounds.max_x = bounds.max_x.max(pair[0]);
            bounds.min_y = bounds.min_y.min(pair[1]);
            bounds.max_y = bounds.max_y.max(pair[1]);
        }
        bounds
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center snapped to whole pixels.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.width() / 2.0).floor(),
            (self.min_y + self.height() / 2.0).floor(),
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn intersects(&self, other: &Aabb2) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }
}
