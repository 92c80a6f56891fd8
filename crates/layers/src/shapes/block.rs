//! Extruded footprint body, the default for anything not rotational.
//!
//! Coordinates are viewport-relative; the caller subtracts the origin.
//! Edges run pairwise over the flat closed ring. An edge is a wall only
//! when the cross product of the edge vector and the lift to its
//! projected roof point is positive, which culls the faces turned away
//! from the camera.

use canvas::Canvas;
use foundation::color::Rgba;
use foundation::math::Vec2;
use scene::ViewState;

use super::{Shading, cast, ring};

#[derive(Debug, Copy, Clone, PartialEq)]
enum Mode {
    Floor,
    Roof,
}

pub fn draw(
    canvas: &mut dyn Canvas,
    view: &ViewState,
    footprint: &[f64],
    holes: &[Vec<f64>],
    height: f64,
    min_height: f64,
    shading: Shading,
) {
    let roof = extrude(canvas, view, footprint, height, min_height, shading);
    let inner_roofs: Vec<Vec<f64>> = holes
        .iter()
        .map(|hole| extrude(canvas, view, hole, height, min_height, shading))
        .collect();

    canvas.begin_path();
    ring(canvas, &roof);
    for inner in &inner_roofs {
        ring(canvas, inner);
    }
    canvas.close_path();
    canvas.stroke(shading.stroke);
    canvas.fill(shading.roof.unwrap_or(shading.alt));
}

/// Fills the visible walls of one ring and returns its projected roof
/// ring, closing duplicate omitted.
fn extrude(
    canvas: &mut dyn Canvas,
    view: &ViewState,
    polygon: &[f64],
    height: f64,
    min_height: f64,
    shading: Shading,
) -> Vec<f64> {
    let scale = view.scale_for(height);
    let min_scale = view.scale_for(min_height);
    let mut roof = Vec::with_capacity(polygon.len().saturating_sub(2));

    for edge in polygon.windows(4).step_by(2) {
        let mut a = Vec2::new(edge[0], edge[1]);
        let mut b = Vec2::new(edge[2], edge[3]);
        let roof_a = view.project(a, scale);
        let roof_b = view.project(b, scale);
        if min_height != 0.0 {
            a = view.project(a, min_scale);
            b = view.project(b, min_scale);
        }

        if (b.x - a.x) * (roof_a.y - a.y) > (roof_a.x - a.x) * (b.y - a.y) {
            canvas.begin_path();
            ring(
                canvas,
                &[b.x, b.y, a.x, a.y, roof_a.x, roof_a.y, roof_b.x, roof_b.y],
            );
            canvas.close_path();
            canvas.fill(wall_side(a, b, shading));
        }

        roof.push(roof_a.x);
        roof.push(roof_a.y);
    }
    roof
}

/// Walls running down-right or up-left face away from the light and
/// take the shaded color.
fn wall_side(a: Vec2, b: Vec2, shading: Shading) -> Rgba {
    if (a.x < b.x && a.y < b.y) || (a.x > b.x && a.y > b.y) {
        shading.alt
    } else {
        shading.wall
    }
}

/// Flat footprint fill for the low-detail pass.
pub fn simplified(
    canvas: &mut dyn Canvas,
    footprint: &[f64],
    holes: &[Vec<f64>],
    fill: Rgba,
    stroke: Rgba,
) {
    canvas.begin_path();
    ring(canvas, footprint);
    for hole in holes {
        ring(canvas, hole);
    }
    canvas.close_path();
    canvas.stroke(stroke);
    canvas.fill(fill);
}

/// Appends the shadow silhouette to the current path.
///
/// Each edge contributes either its ground segment or its projected
/// roof segment, picked by the same cross test as the walls; a mode
/// switch inserts the connecting vertex so the outline stays one
/// closed loop per ring.
pub fn shadow(
    canvas: &mut dyn Canvas,
    dir: Vec2,
    footprint: &[f64],
    holes: &[Vec<f64>],
    height: f64,
    min_height: f64,
) {
    let mut mode = None;

    for edge in footprint.windows(4).step_by(2) {
        let mut a = Vec2::new(edge[0], edge[1]);
        let mut b = Vec2::new(edge[2], edge[3]);
        let roof_a = cast(a, dir, height);
        let roof_b = cast(b, dir, height);
        if min_height != 0.0 {
            a = cast(a, dir, min_height);
            b = cast(b, dir, min_height);
        }

        if (b.x - a.x) * (roof_a.y - a.y) > (roof_a.x - a.x) * (b.y - a.y) {
            match mode {
                None => canvas.move_to(a.x, a.y),
                Some(Mode::Roof) => canvas.line_to(a.x, a.y),
                Some(Mode::Floor) => {}
            }
            mode = Some(Mode::Floor);
            canvas.line_to(b.x, b.y);
        } else {
            match mode {
                None => canvas.move_to(roof_a.x, roof_a.y),
                Some(Mode::Floor) => canvas.line_to(roof_a.x, roof_a.y),
                Some(Mode::Roof) => {}
            }
            mode = Some(Mode::Roof);
            canvas.line_to(roof_b.x, roof_b.y);
        }
    }

    for hole in holes {
        ring(canvas, hole);
    }
}

/// Appends the unprojected footprint, holes included, for the erase
/// pass under a building's own shadow.
pub fn shadow_mask(canvas: &mut dyn Canvas, footprint: &[f64], holes: &[Vec<f64>]) {
    ring(canvas, footprint);
    for hole in holes {
        ring(canvas, hole);
    }
}

/// One flat fill of the whole silhouette in the record's hit color.
/// Holes are deliberately not cut; a click inside a courtyard still
/// belongs to the building.
pub fn hit_area(
    canvas: &mut dyn Canvas,
    view: &ViewState,
    footprint: &[f64],
    height: f64,
    min_height: f64,
    color: Rgba,
) {
    let scale = view.scale_for(height);
    let min_scale = view.scale_for(min_height);
    let mut mode = None;

    canvas.begin_path();
    for edge in footprint.windows(4).step_by(2) {
        let mut a = Vec2::new(edge[0], edge[1]);
        let mut b = Vec2::new(edge[2], edge[3]);
        let roof_a = view.project(a, scale);
        let roof_b = view.project(b, scale);
        if min_height != 0.0 {
            a = view.project(a, min_scale);
            b = view.project(b, min_scale);
        }

        if (b.x - a.x) * (roof_a.y - a.y) > (roof_a.x - a.x) * (b.y - a.y) {
            match mode {
                None => canvas.move_to(a.x, a.y),
                Some(Mode::Roof) => canvas.line_to(a.x, a.y),
                Some(Mode::Floor) => {}
            }
            mode = Some(Mode::Floor);
            canvas.line_to(b.x, b.y);
        } else {
            match mode {
                None => canvas.move_to(roof_a.x, roof_a.y),
                Some(Mode::Floor) => canvas.line_to(roof_a.x, roof_a.y),
                Some(Mode::Roof) => {}
            }
            mode = Some(Mode::Roof);
            canvas.line_to(roof_b.x, roof_b.y);
        }
    }
    canvas.close_path();
    canvas.fill(color);
}
