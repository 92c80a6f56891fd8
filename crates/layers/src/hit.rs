//! Offscreen picking pass.
//!
//! Every visible body repaints in its registry color at full height,
//! fade-in or not, so a record is clickable the moment it appears. The
//! finished pixels are snapshotted once per render and queries run
//! against the snapshot; the registry generation guards against a data
//! reload renumbering the colors under an old snapshot.

use canvas::{Canvas, Readback};
use scene::{
    BuildingRecord, HitRegistry, MIN_ZOOM, RoofShape, Shape, ViewState, is_visible,
    sort_for_painter,
};

use crate::shapes::{block, cylinder, pyramid, translate};

struct Snapshot {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    generation: u64,
}

#[derive(Default)]
pub struct HitPass {
    snapshot: Option<Snapshot>,
}

impl HitPass {
    pub fn new() -> Self {
        Self { snapshot: None }
    }

    pub fn render<C: Canvas + Readback>(
        &mut self,
        canvas: &mut C,
        view: &ViewState,
        records: &[&BuildingRecord],
        zooming: bool,
        generation: u64,
    ) {
        canvas.clear();
        if view.zoom < MIN_ZOOM || zooming {
            self.snapshot = None;
            return;
        }

        let mut sorted = records.to_vec();
        sort_for_painter(&mut sorted, view.sort_cam());

        let viewport = view.viewport();
        for record in sorted {
            if !is_visible(record, &viewport) {
                continue;
            }

            // full heights; a record fading in is already clickable
            let h = record.height;
            let mh = record.min_height;
            let color = record.hit_color;
            let center = record.center - view.origin;
            let footprint = translate(&record.footprint, view.origin);
            let radius = record.radius;

            match record.shape {
                Shape::Cylinder | Shape::Sphere => {
                    cylinder::hit_area(canvas, view, center, radius, radius, h, mh, color);
                }
                Shape::Cone => {
                    cylinder::hit_area(canvas, view, center, radius, 0.0, h, mh, color);
                }
                Shape::Dome => {
                    cylinder::hit_area(canvas, view, center, radius, radius / 2.0, h, mh, color);
                }
                Shape::Pyramid => {
                    pyramid::hit_area(canvas, view, &footprint, center, h, mh, color);
                }
                Shape::Block => {
                    block::hit_area(canvas, view, &footprint, h, mh, color);
                }
            }

            let top = h + record.roof_height;
            match record.roof_shape {
                RoofShape::Cone => {
                    cylinder::hit_area(canvas, view, center, radius, 0.0, top, h, color);
                }
                RoofShape::Dome => {
                    cylinder::hit_area(canvas, view, center, radius, radius / 2.0, top, h, color);
                }
                RoofShape::Pyramid => {
                    pyramid::hit_area(canvas, view, &footprint, center, top, h, color);
                }
                RoofShape::Flat => {}
            }
        }

        self.snapshot = Some(Snapshot {
            pixels: canvas.read_pixels(),
            width: canvas.width(),
            height: canvas.height(),
            generation,
        });
    }

    /// Resolves a viewport position to the record id painted there.
    pub fn query<'r>(&self, x: f64, y: f64, registry: &'r HitRegistry) -> Option<&'r str> {
        let snapshot = self.snapshot.as_ref()?;
        if snapshot.generation != registry.generation() {
            return None;
        }
        if x < 0.0 || y < 0.0 || x >= snapshot.width as f64 || y >= snapshot.height as f64 {
            return None;
        }

        let pos = 4 * (y as usize * snapshot.width as usize + x as usize);
        let r = snapshot.pixels[pos];
        let g = snapshot.pixels[pos + 1];
        let b = snapshot.pixels[pos + 2];
        registry.decode(r, g, b)
    }
}
