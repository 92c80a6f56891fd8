//! Primary extrusion pass.
//!
//! Records paint far to near so closer bodies overdraw the ones behind
//! them; see the ordering contract on [`scene::painter_cmp`]. A shaped
//! roof is a second body drawn on top, perched at the roof elevation.

use canvas::Canvas;
use foundation::color::Color;
use scene::{BuildingRecord, MIN_ZOOM, RoofShape, Shape, ViewState, is_visible, sort_for_painter};

use crate::shapes::{Shading, block, cylinder, pyramid, translate};
use crate::simplified::is_simple;

/// Record colors carry their zoom attenuation from import; only the
/// view defaults are attenuated on access.
fn resolve(own: Option<Color>, fallback: Color) -> Color {
    own.unwrap_or(fallback)
}

pub fn render(
    canvas: &mut dyn Canvas,
    view: &ViewState,
    records: &[&BuildingRecord],
    zooming: bool,
) {
    canvas.clear();
    if view.zoom < MIN_ZOOM || zooming {
        return;
    }

    let mut sorted = records.to_vec();
    sort_for_painter(&mut sorted, view.sort_cam());

    let viewport = view.viewport();
    for record in sorted {
        if is_simple(record, view.zoom) || !is_visible(record, &viewport) {
            continue;
        }

        let (h, mh) = record.faded_heights();

        let wall = resolve(record.wall_color, view.wall_color());
        let alt = resolve(record.alt_color, view.alt_color());
        let roof = resolve(record.roof_color, view.roof_color());
        let stroke = alt.to_rgba();
        let shading = Shading {
            wall: wall.to_rgba(),
            alt: stroke,
            roof: Some(roof.to_rgba()),
            stroke,
        };

        let center = record.center - view.origin;
        let footprint = translate(&record.footprint, view.origin);
        let radius = record.radius;

        match record.shape {
            Shape::Cylinder | Shape::Sphere => {
                cylinder::draw(canvas, view, center, radius, radius, h, mh, shading);
            }
            Shape::Cone => {
                let shading = Shading {
                    roof: None,
                    ..shading
                };
                cylinder::draw(canvas, view, center, radius, 0.0, h, mh, shading);
            }
            Shape::Dome => {
                let shading = Shading {
                    roof: None,
                    ..shading
                };
                cylinder::draw(canvas, view, center, radius, radius / 2.0, h, mh, shading);
            }
            Shape::Pyramid => {
                pyramid::draw(canvas, view, &footprint, center, h, mh, shading);
            }
            Shape::Block => {
                let holes: Vec<Vec<f64>> = record
                    .holes
                    .iter()
                    .map(|hole| translate(hole, view.origin))
                    .collect();
                block::draw(canvas, view, &footprint, &holes, h, mh, shading);
            }
        }

        if record.roof_shape == RoofShape::Flat {
            continue;
        }

        // The roof body keeps its full height while the base fades in
        // underneath it.
        let top = h + record.roof_height;
        let roof_shading = Shading {
            wall: roof.to_rgba(),
            alt: roof.lightness(0.9).to_rgba(),
            roof: None,
            stroke,
        };
        match record.roof_shape {
            RoofShape::Cone => {
                cylinder::draw(canvas, view, center, radius, 0.0, top, h, roof_shading);
            }
            RoofShape::Dome => {
                cylinder::draw(
                    canvas,
                    view,
                    center,
                    radius,
                    radius / 2.0,
                    top,
                    h,
                    roof_shading,
                );
            }
            RoofShape::Pyramid => {
                pyramid::draw(canvas, view, &footprint, center, top, h, roof_shading);
            }
            RoofShape::Flat => {}
        }
    }
}
