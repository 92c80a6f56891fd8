//! Solar shadow pass.
//!
//! Silhouettes are cast along the sun direction and filled per record;
//! the fill is opaque, so overlapping shadows merge instead of
//! stacking. A second pass erases every ground-level footprint out of
//! the result, keeping shadows off the roofs that cast them, and the
//! whole surface composites at an altitude-derived opacity.

use canvas::{Canvas, CompositeOp};
use foundation::color::Rgba;
use foundation::math::Vec2;
use foundation::solar::sun_position;
use foundation::time::Timestamp;
use scene::{BuildingRecord, MIN_ZOOM, RoofShape, Shape, ViewState, is_visible};

use crate::shapes::{block, cylinder, pyramid, translate};

const FILL: Rgba = Rgba {
    r: 0x66,
    g: 0x66,
    b: 0x66,
    a: 1.0,
};
const BLUR: Rgba = Rgba {
    r: 0,
    g: 0,
    b: 0,
    a: 1.0,
};
const BLUR_SIZE: f64 = 15.0;

pub struct ShadowPass {
    pub enabled: bool,
    date: Timestamp,
}

impl ShadowPass {
    /// Starts at the epoch, which keeps the pass dark until a date is
    /// set; midnight UTC leaves the sun below the horizon anywhere the
    /// default view looks.
    pub fn new() -> Self {
        Self {
            enabled: true,
            date: Timestamp(0),
        }
    }

    pub fn set_date(&mut self, date: Timestamp) {
        self.date = date;
    }

    /// Renders the pass and returns the opacity the composite step
    /// should give this surface. Guard exits return full opacity; the
    /// surface is blank then anyway.
    pub fn render(
        &self,
        canvas: &mut dyn Canvas,
        view: &ViewState,
        records: &[&BuildingRecord],
        zooming: bool,
    ) -> f64 {
        canvas.clear();
        if !self.enabled || view.zoom < MIN_ZOOM || zooming {
            return 1.0;
        }

        let center = view.center_geo();
        let sun = sun_position(self.date, center.latitude, center.longitude);
        if sun.altitude <= 0.0 {
            return 1.0;
        }

        let length = 1.0 / sun.altitude.tan();
        let alpha = if length < 5.0 { 0.75 } else { 1.0 / length * 5.0 };
        let dir = Vec2::new(sun.azimuth.cos() * length, sun.azimuth.sin() * length);

        canvas.set_shadow(BLUR, BLUR_SIZE * (view.zoom_factor / 2.0));

        let viewport = view.viewport();
        for record in records {
            if !is_visible(record, &viewport) {
                continue;
            }

            let (h, mh) = record.faded_heights();
            let center = record.center - view.origin;
            let footprint = translate(&record.footprint, view.origin);
            let holes: Vec<Vec<f64>> = record
                .holes
                .iter()
                .map(|hole| translate(hole, view.origin))
                .collect();
            let radius = record.radius;

            canvas.begin_path();
            match record.shape {
                Shape::Cylinder | Shape::Sphere => {
                    cylinder::shadow(canvas, dir, center, radius, radius, h, mh);
                }
                Shape::Cone => {
                    cylinder::shadow(canvas, dir, center, radius, 0.0, h, mh);
                }
                Shape::Dome => {
                    cylinder::shadow(canvas, dir, center, radius, radius / 2.0, h, mh);
                }
                Shape::Pyramid => {
                    pyramid::shadow(canvas, dir, &footprint, center, h, mh);
                }
                Shape::Block => {
                    block::shadow(canvas, dir, &footprint, &holes, h, mh);
                }
            }

            let top = h + record.roof_height;
            match record.roof_shape {
                RoofShape::Cone => {
                    cylinder::shadow(canvas, dir, center, radius, 0.0, top, h);
                }
                RoofShape::Dome => {
                    cylinder::shadow(canvas, dir, center, radius, radius / 2.0, top, h);
                }
                RoofShape::Pyramid => {
                    pyramid::shadow(canvas, dir, &footprint, center, top, h);
                }
                RoofShape::Flat => {}
            }
            canvas.fill(FILL);
        }

        canvas.set_shadow(BLUR, 0.0);

        // punch the ground footprints back out; perched bodies keep
        // the shadow running underneath them
        canvas.set_composite_op(CompositeOp::DestinationOut);
        for record in records {
            if record.min_height != 0.0 || !is_visible(record, &viewport) {
                continue;
            }

            let center = record.center - view.origin;
            canvas.begin_path();
            match record.shape {
                Shape::Cylinder | Shape::Cone | Shape::Dome => {
                    cylinder::shadow_mask(canvas, center, record.radius);
                }
                _ => {
                    let footprint = translate(&record.footprint, view.origin);
                    let holes: Vec<Vec<f64>> = record
                        .holes
                        .iter()
                        .map(|hole| translate(hole, view.origin))
                        .collect();
                    block::shadow_mask(canvas, &footprint, &holes);
                }
            }
            canvas.fill(Rgba::opaque(0, 0, 0));
        }
        canvas.set_composite_op(CompositeOp::SourceOver);

        alpha / (view.zoom_factor * 2.0)
    }
}

impl Default for ShadowPass {
    fn default() -> Self {
        Self::new()
    }
}
