//! Flat stand-in pass for short records on the lower detail zooms.
//!
//! Short records skip the extrusion pass entirely in this zoom band
//! and draw here as plain footprints in their roof color. The same
//! predicate decides both sides, so no record is ever drawn twice.

use canvas::Canvas;
use foundation::color::Color;
use scene::{BuildingRecord, MIN_ZOOM, ViewState, is_visible};

use crate::shapes::{block, cylinder, translate};

/// Highest zoom at which short records draw flat.
pub const MAX_SIMPLE_ZOOM: u8 = MIN_ZOOM + 2;

/// Records lower than this, shaped roof included, count as short.
pub const SIMPLE_HEIGHT_LIMIT: f64 = 5.0;

/// Whether this pass owns the record at the given zoom.
pub fn is_simple(record: &BuildingRecord, zoom: u8) -> bool {
    zoom <= MAX_SIMPLE_ZOOM && record.height + record.roof_height < SIMPLE_HEIGHT_LIMIT
}

/// Record colors carry their zoom attenuation from import; only the
/// view defaults are attenuated on access.
fn resolve(own: Option<Color>, fallback: Color) -> Color {
    own.unwrap_or(fallback)
}

/// No depth sort here; flat fills cannot occlude each other.
pub fn render(canvas: &mut dyn Canvas, view: &ViewState, records: &[&BuildingRecord], zooming: bool) {
    canvas.clear();
    if view.zoom < MIN_ZOOM || view.zoom > MAX_SIMPLE_ZOOM || zooming {
        return;
    }

    let viewport = view.viewport();
    for record in records {
        if !is_simple(record, view.zoom) || !is_visible(record, &viewport) {
            continue;
        }

        let stroke = resolve(record.alt_color, view.alt_color()).to_rgba();
        let fill = resolve(record.roof_color, view.roof_color()).to_rgba();

        if record.shape.is_rotational() {
            cylinder::simplified(
                canvas,
                record.center - view.origin,
                record.radius,
                fill,
                stroke,
            );
        } else {
            let footprint = translate(&record.footprint, view.origin);
            let holes: Vec<Vec<f64>> = record
                .holes
                .iter()
                .map(|hole| translate(hole, view.origin))
                .collect();
            block::simplified(canvas, &footprint, &holes, fill, stroke);
        }
    }
}
