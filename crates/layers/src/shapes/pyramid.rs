//! Triangle fan from the footprint edges to the projected apex.
//!
//! Only edges with the apex on their interior side are drawn, so once
//! the apex projects outside the footprint the rear faces drop out.
//! Shading follows the same monotonic rule as the block walls.

use canvas::Canvas;
use foundation::color::Rgba;
use foundation::math::Vec2;
use scene::ViewState;

use super::{Shading, cast};

pub fn draw(
    canvas: &mut dyn Canvas,
    view: &ViewState,
    footprint: &[f64],
    center: Vec2,
    height: f64,
    min_height: f64,
    shading: Shading,
) {
    let scale = view.scale_for(height);
    let apex = view.project(center, scale);
    let min_scale = view.scale_for(min_height);

    for edge in footprint.windows(4).step_by(2) {
        let mut a = Vec2::new(edge[0], edge[1]);
        let mut b = Vec2::new(edge[2], edge[3]);
        if min_height != 0.0 {
            a = view.project(a, min_scale);
            b = view.project(b, min_scale);
        }

        if (b.x - a.x) * (apex.y - a.y) > (apex.x - a.x) * (b.y - a.y) {
            let fill = if (a.x < b.x && a.y < b.y) || (a.x > b.x && a.y > b.y) {
                shading.alt
            } else {
                shading.wall
            };
            triangle(canvas, a, b, apex, fill);
        }
    }
}

fn triangle(canvas: &mut dyn Canvas, a: Vec2, b: Vec2, c: Vec2, fill: Rgba) {
    canvas.begin_path();
    canvas.move_to(a.x, a.y);
    canvas.line_to(b.x, b.y);
    canvas.line_to(c.x, c.y);
    canvas.close_path();
    canvas.fill(fill);
}

/// Appends the cast faces to the current path, one subpath each.
pub fn shadow(
    canvas: &mut dyn Canvas,
    dir: Vec2,
    footprint: &[f64],
    center: Vec2,
    height: f64,
    min_height: f64,
) {
    let apex = cast(center, dir, height);

    for edge in footprint.windows(4).step_by(2) {
        let mut a = Vec2::new(edge[0], edge[1]);
        let mut b = Vec2::new(edge[2], edge[3]);
        if min_height != 0.0 {
            a = cast(a, dir, min_height);
            b = cast(b, dir, min_height);
        }

        if (b.x - a.x) * (apex.y - a.y) > (apex.x - a.x) * (b.y - a.y) {
            canvas.move_to(a.x, a.y);
            canvas.line_to(b.x, b.y);
            canvas.line_to(apex.x, apex.y);
        }
    }
}

/// One flat fill of the visible faces in the record's hit color.
pub fn hit_area(
    canvas: &mut dyn Canvas,
    view: &ViewState,
    footprint: &[f64],
    center: Vec2,
    height: f64,
    min_height: f64,
    color: Rgba,
) {
    let scale = view.scale_for(height);
    let apex = view.project(center, scale);
    let min_scale = view.scale_for(min_height);

    canvas.begin_path();
    for edge in footprint.windows(4).step_by(2) {
        let mut a = Vec2::new(edge[0], edge[1]);
        let mut b = Vec2::new(edge[2], edge[3]);
        if min_height != 0.0 {
            a = view.project(a, min_scale);
            b = view.project(b, min_scale);
        }

        if (b.x - a.x) * (apex.y - a.y) > (apex.x - a.x) * (b.y - a.y) {
            canvas.move_to(a.x, a.y);
            canvas.line_to(b.x, b.y);
            canvas.line_to(apex.x, apex.y);
        }
    }
    canvas.close_path();
    canvas.fill(color);
}

#[cfg(test)]
mod tests {
    use super::{Shading, draw, hit_area, shadow};
    use canvas::{Canvas, TraceCanvas, TraceOp};
    use foundation::color::Rgba;
    use foundation::math::Vec2;
    use scene::ViewState;

    const WALL: Rgba = Rgba {
        r: 200,
        g: 190,
        b: 180,
        a: 1.0,
    };
    const ALT: Rgba = Rgba {
        r: 160,
        g: 150,
        b: 140,
        a: 1.0,
    };

    fn shading() -> Shading {
        Shading {
            wall: WALL,
            alt: ALT,
            roof: None,
            stroke: ALT,
        }
    }

    fn diamond() -> Vec<f64> {
        vec![
            150.0, 100.0, 200.0, 150.0, 150.0, 200.0, 100.0, 150.0, 150.0, 100.0,
        ]
    }

    #[test]
    fn tall_spire_drops_rear_faces_and_shades_one_side() {
        let view = ViewState::new(800.0, 600.0);
        let mut canvas = TraceCanvas::new(800, 600);

        // tall enough that the apex projects well outside the footprint
        draw(
            &mut canvas,
            &view,
            &diamond(),
            Vec2::new(150.0, 150.0),
            300.0,
            0.0,
            shading(),
        );

        // two faces survive; the up-left edge takes the shaded color
        assert_eq!(canvas.fills(), vec![WALL, ALT]);
        let begins = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, TraceOp::BeginPath))
            .count();
        assert_eq!(begins, 2);
    }

    #[test]
    fn shadow_appends_one_subpath_per_lit_face() {
        let mut canvas = TraceCanvas::new(800, 600);
        canvas.begin_path();
        shadow(
            &mut canvas,
            Vec2::new(1.0, 1.0),
            &diamond(),
            Vec2::new(150.0, 150.0),
            100.0,
            0.0,
        );

        let moves = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, TraceOp::MoveTo(..)))
            .count();
        assert_eq!(moves, 3);
        assert!(!canvas.ops().iter().any(|op| matches!(op, TraceOp::Fill(_))));
    }

    #[test]
    fn hit_area_merges_the_faces_into_one_fill() {
        let view = ViewState::new(800.0, 600.0);
        let mut canvas = TraceCanvas::new(800, 600);
        let color = Rgba::opaque(7, 0, 0);

        hit_area(
            &mut canvas,
            &view,
            &diamond(),
            Vec2::new(150.0, 150.0),
            300.0,
            0.0,
            color,
        );

        assert_eq!(canvas.fills(), vec![color]);
        let closes = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, TraceOp::ClosePath))
            .count();
        assert_eq!(closes, 1);
    }
}
