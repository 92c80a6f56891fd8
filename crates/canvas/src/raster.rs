use std::collections::BTreeSet;
use std::f64::consts::TAU;

use foundation::color::Rgba;
use foundation::math::Vec2;

use crate::surface::{Canvas, CompositeOp, Readback};

#[derive(Debug, Clone)]
struct Subpath {
    points: Vec<Vec2>,
    closed: bool,
}

/// Deterministic software implementation of [`Canvas`].
///
/// Pixels are stored as premultiplied RGBA bytes, rows top to bottom.
/// A pixel counts as inside a fill when its center lies inside the
/// even-odd region, and arcs are flattened with a fixed step rule, so
/// identical draw calls always produce identical buffers.
pub struct RasterCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    subpaths: Vec<Subpath>,
    op: CompositeOp,
    shadow: Option<(Rgba, f64)>,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            subpaths: Vec::new(),
            op: CompositeOp::SourceOver,
            shadow: None,
        }
    }

    /// The blur hint currently in effect, if any. Fills do not
    /// consume it; `set_shadow` with a zero size clears it.
    pub fn shadow_hint(&self) -> Option<(Rgba, f64)> {
        self.shadow
    }

    fn extend_to(&mut self, point: Vec2) {
        match self.subpaths.last_mut() {
            Some(subpath) if !subpath.closed => subpath.points.push(point),
            _ => self.subpaths.push(Subpath {
                points: vec![point],
                closed: false,
            }),
        }
    }

    fn paint(&mut self, x: u32, y: u32, color: Rgba, src_alpha: u32) {
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = &mut self.pixels[offset..offset + 4];
        match self.op {
            CompositeOp::SourceOver => {
                let inv = 255 - src_alpha;
                px[0] = ((color.r as u32 * src_alpha + px[0] as u32 * inv) / 255) as u8;
                px[1] = ((color.g as u32 * src_alpha + px[1] as u32 * inv) / 255) as u8;
                px[2] = ((color.b as u32 * src_alpha + px[2] as u32 * inv) / 255) as u8;
                px[3] = (src_alpha + px[3] as u32 * inv / 255) as u8;
            }
            CompositeOp::DestinationOut => {
                let keep = 255 - src_alpha;
                for channel in px {
                    *channel = (*channel as u32 * keep / 255) as u8;
                }
            }
        }
    }
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.subpaths.push(Subpath {
            points: vec![Vec2::new(x, y)],
            closed: false,
        });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.extend_to(Vec2::new(x, y));
    }

    fn arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) {
        let radius = radius.max(0.0);
        let start = Vec2::new(
            cx + start_angle.cos() * radius,
            cy + start_angle.sin() * radius,
        );
        self.extend_to(start);

        let mut sweep = if anticlockwise {
            -((start_angle - end_angle).rem_euclid(TAU))
        } else {
            (end_angle - start_angle).rem_euclid(TAU)
        };
        if sweep == 0.0 {
            if (end_angle - start_angle).abs() < TAU {
                return;
            }
            // A whole number of turns collapses to one full circle.
            sweep = if anticlockwise { -TAU } else { TAU };
        }

        let steps = ((sweep.abs() * radius.max(1.0)) / 2.0).ceil().clamp(8.0, 256.0) as usize;
        for i in 1..=steps {
            let angle = start_angle + sweep * (i as f64 / steps as f64);
            self.extend_to(Vec2::new(
                cx + angle.cos() * radius,
                cy + angle.sin() * radius,
            ));
        }
    }

    fn close_path(&mut self) {
        if let Some(subpath) = self.subpaths.last_mut() {
            subpath.closed = true;
        }
    }

    fn fill(&mut self, color: Rgba) {
        let src_alpha = (color.a.clamp(0.0, 1.0) * 255.0).round() as u32;
        if src_alpha == 0 {
            return;
        }

        let mut edges: Vec<(Vec2, Vec2)> = Vec::new();
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for subpath in &self.subpaths {
            let n = subpath.points.len();
            if n < 3 {
                continue;
            }
            for i in 0..n {
                let a = subpath.points[i];
                let b = subpath.points[(i + 1) % n];
                if a.y == b.y {
                    continue;
                }
                y_min = y_min.min(a.y.min(b.y));
                y_max = y_max.max(a.y.max(b.y));
                edges.push((a, b));
            }
        }
        if edges.is_empty() {
            return;
        }

        let row0 = y_min.floor().max(0.0) as u32;
        let row1 = y_max.ceil().clamp(0.0, self.height as f64) as u32;
        let mut crossings: Vec<f64> = Vec::with_capacity(edges.len());
        for y in row0..row1 {
            let center = y as f64 + 0.5;
            crossings.clear();
            for &(a, b) in &edges {
                if (a.y <= center && b.y > center) || (b.y <= center && a.y > center) {
                    crossings.push(a.x + (center - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f64::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let x0 = (pair[0] - 0.5).ceil().max(0.0) as u32;
                let x1 = (pair[1] - 0.5).ceil().clamp(0.0, self.width as f64) as u32;
                for x in x0..x1 {
                    self.paint(x, y, color, src_alpha);
                }
            }
        }
    }

    fn stroke(&mut self, color: Rgba) {
        let src_alpha = (color.a.clamp(0.0, 1.0) * 255.0).round() as u32;
        if src_alpha == 0 {
            return;
        }

        // Collect the touched pixels first so joints between segments
        // blend exactly once.
        let mut touched: BTreeSet<(u32, u32)> = BTreeSet::new();
        for subpath in &self.subpaths {
            let n = subpath.points.len();
            if n < 2 {
                continue;
            }
            let segments = if subpath.closed { n } else { n - 1 };
            for i in 0..segments {
                let a = subpath.points[i];
                let b = subpath.points[(i + 1) % n];
                let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil() as usize;
                for s in 0..=steps {
                    let t = if steps == 0 {
                        0.0
                    } else {
                        s as f64 / steps as f64
                    };
                    let x = (a.x + (b.x - a.x) * t).floor();
                    let y = (a.y + (b.y - a.y) * t).floor();
                    if x >= 0.0 && y >= 0.0 && x < self.width as f64 && y < self.height as f64 {
                        touched.insert((x as u32, y as u32));
                    }
                }
            }
        }
        for (x, y) in touched {
            self.paint(x, y, color, src_alpha);
        }
    }

    fn set_composite_op(&mut self, op: CompositeOp) {
        self.op = op;
    }

    fn set_shadow(&mut self, color: Rgba, size: f64) {
        self.shadow = if size > 0.0 { Some((color, size)) } else { None };
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
        self.subpaths.clear();
    }
}

impl Readback for RasterCanvas {
    fn read_pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    fn pixel_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
            self.pixels[offset + 3],
        ])
    }
}
