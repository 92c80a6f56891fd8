//! Rotational body drawn from two circles and their common tangents.
//!
//! The base circle sits on the ground (or the perch height) and the
//! apex circle is the projected top. The outer tangent points split the
//! mantle into a lit and a shaded half; cones reuse this with a zero
//! top radius and domes with half of it.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use canvas::Canvas;
use foundation::color::Rgba;
use foundation::math::Vec2;
use scene::ViewState;

use super::{Shading, cast};

/// Touch points of one outer tangent, on the first and second circle.
#[derive(Debug, Copy, Clone)]
struct Tangent {
    first: Vec2,
    second: Vec2,
}

/// Outer common tangents of two circles, whole-pixel touch points.
/// `None` when one circle swallows the other.
fn tangents(c1: Vec2, r1: f64, c2: Vec2, r2: f64) -> Option<[Tangent; 2]> {
    let d = c1 - c2;
    let dr = r1 - r2;
    let sq_dist = d.sq_len();
    if sq_dist <= dr * dr {
        return None;
    }

    let dist = sq_dist.sqrt();
    let v = Vec2::new(-d.x / dist, -d.y / dist);
    let c = dr / dist;
    let h = (1.0 - c * c).max(0.0).sqrt();

    let mut pair = [Tangent {
        first: Vec2::new(0.0, 0.0),
        second: Vec2::new(0.0, 0.0),
    }; 2];
    for (slot, sign) in pair.iter_mut().zip([1.0, -1.0]) {
        let n = Vec2::new(v.x * c - sign * h * v.y, v.y * c + sign * h * v.x);
        slot.first = Vec2::new((c1.x + r1 * n.x).trunc(), (c1.y + r1 * n.y).trunc());
        slot.second = Vec2::new((c2.x + r2 * n.x).trunc(), (c2.y + r2 * n.y).trunc());
    }
    Some(pair)
}

pub fn draw(
    canvas: &mut dyn Canvas,
    view: &ViewState,
    center: Vec2,
    radius: f64,
    top_radius: f64,
    height: f64,
    min_height: f64,
    shading: Shading,
) {
    let scale = view.scale_for(height);
    let apex = view.project(center, scale);
    let top_radius = top_radius * scale;

    let (center, radius) = if min_height != 0.0 {
        let min_scale = view.scale_for(min_height);
        (view.project(center, min_scale), radius * min_scale)
    } else {
        (center, radius)
    };

    let (a1, a2) = match tangents(center, radius, apex, top_radius) {
        Some([t1, t2]) => (
            (t1.first.y - center.y).atan2(t1.first.x - center.x),
            (t2.first.y - center.y).atan2(t2.first.x - center.x),
        ),
        // apex circle inside the base circle, split at the bottom
        None => (1.5 * PI, 1.5 * PI),
    };

    canvas.begin_path();
    canvas.arc(apex.x, apex.y, top_radius, FRAC_PI_2, a1, true);
    canvas.arc(center.x, center.y, radius, a1, FRAC_PI_2, false);
    canvas.close_path();
    canvas.fill(shading.wall);

    canvas.begin_path();
    canvas.arc(apex.x, apex.y, top_radius, a2, FRAC_PI_2, true);
    canvas.arc(center.x, center.y, radius, FRAC_PI_2, a2, false);
    canvas.close_path();
    canvas.fill(shading.alt);

    circle(
        canvas,
        apex,
        top_radius,
        shading.roof.unwrap_or(shading.alt),
        shading.stroke,
    );
}

/// Outlined disc, stroked then filled.
fn circle(canvas: &mut dyn Canvas, center: Vec2, radius: f64, fill: Rgba, stroke: Rgba) {
    canvas.begin_path();
    canvas.arc(center.x, center.y, radius, 0.0, TAU, false);
    canvas.stroke(stroke);
    canvas.fill(fill);
}

/// Flat disc for the low-detail pass.
pub fn simplified(canvas: &mut dyn Canvas, center: Vec2, radius: f64, fill: Rgba, stroke: Rgba) {
    circle(canvas, center, radius, fill, stroke);
}

/// Appends the cast outline to the current path. Radii stay unscaled;
/// the sun projection keeps ground dimensions.
pub fn shadow(
    canvas: &mut dyn Canvas,
    dir: Vec2,
    center: Vec2,
    radius: f64,
    top_radius: f64,
    height: f64,
    min_height: f64,
) {
    let apex = cast(center, dir, height);
    let center = if min_height != 0.0 {
        cast(center, dir, min_height)
    } else {
        center
    };

    match tangents(center, radius, apex, top_radius) {
        Some([t1, t2]) => {
            let p1 = (t1.first.y - center.y).atan2(t1.first.x - center.x);
            let p2 = (t2.first.y - center.y).atan2(t2.first.x - center.x);
            canvas.move_to(t2.second.x, t2.second.y);
            canvas.arc(apex.x, apex.y, top_radius, p2, p1, false);
            canvas.arc(center.x, center.y, radius, p1, p2, false);
        }
        None => {
            canvas.move_to(center.x + radius, center.y);
            canvas.arc(center.x, center.y, radius, 0.0, TAU, false);
        }
    }
}

/// Appends the ground footprint circle for the erase pass.
pub fn shadow_mask(canvas: &mut dyn Canvas, center: Vec2, radius: f64) {
    canvas.move_to(center.x + radius, center.y);
    canvas.arc(center.x, center.y, radius, 0.0, TAU, false);
}

/// One flat fill of the projected outline in the record's hit color.
pub fn hit_area(
    canvas: &mut dyn Canvas,
    view: &ViewState,
    center: Vec2,
    radius: f64,
    top_radius: f64,
    height: f64,
    min_height: f64,
    color: Rgba,
) {
    let scale = view.scale_for(height);
    let apex = view.project(center, scale);
    let top_radius = top_radius * scale;

    let (center, radius) = if min_height != 0.0 {
        let min_scale = view.scale_for(min_height);
        (view.project(center, min_scale), radius * min_scale)
    } else {
        (center, radius)
    };

    canvas.begin_path();
    match tangents(center, radius, apex, top_radius) {
        Some([t1, t2]) => {
            let p1 = (t1.first.y - center.y).atan2(t1.first.x - center.x);
            let p2 = (t2.first.y - center.y).atan2(t2.first.x - center.x);
            canvas.move_to(t2.second.x, t2.second.y);
            canvas.arc(apex.x, apex.y, top_radius, p2, p1, false);
            canvas.arc(center.x, center.y, radius, p1, p2, false);
        }
        None => {
            canvas.move_to(center.x + radius, center.y);
            canvas.arc(center.x, center.y, radius, 0.0, TAU, false);
        }
    }
    canvas.close_path();
    canvas.fill(color);
}
