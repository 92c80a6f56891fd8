pub mod block;
pub mod cylinder;
pub mod pyramid;

use canvas::Canvas;
use foundation::color::Rgba;
use foundation::math::Vec2;

/// Colors one record draws with, resolved against the view palette.
#[derive(Debug, Copy, Clone)]
pub struct Shading {
    pub wall: Rgba,
    pub alt: Rgba,
    /// Roof plate fill. `None` leaves the plate in the shaded wall
    /// color; the cone and dome roof passes rely on that.
    pub roof: Option<Rgba>,
    /// Outline color for roof plates and discs.
    pub stroke: Rgba,
}

/// Ground point displaced along the shadow direction for a height.
pub(crate) fn cast(p: Vec2, dir: Vec2, height: f64) -> Vec2 {
    p + dir.scale(height)
}

/// Appends a flat `[x0,y0,x1,y1,..]` ring as one open subpath.
pub(crate) fn ring(canvas: &mut dyn Canvas, polygon: &[f64]) {
    if polygon.len() < 2 {
        return;
    }
    canvas.move_to(polygon[0], polygon[1]);
    let mut i = 2;
    while i + 1 < polygon.len() {
        canvas.line_to(polygon[i], polygon[i + 1]);
        i += 2;
    }
}

/// Absolute map pixels to viewport-relative pixels.
pub(crate) fn translate(polygon: &[f64], origin: Vec2) -> Vec<f64> {
    let mut out = Vec::with_capacity(polygon.len());
    for pair in polygon.chunks_exact(2) {
        out.push(pair[0] - origin.x);
        out.push(pair[1] - origin.y);
    }
    out
}
