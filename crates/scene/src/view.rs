use foundation::bounds::Aabb2;
use foundation::color::Color;
use foundation::math::{Geo, Vec2, map_size, pixel_to_geo};

/// Height of the virtual camera above the ground plane, in pixels.
pub const CAM_Z: f64 = 450.0;

/// Lowest zoom at which anything renders or loads.
pub const MIN_ZOOM: u8 = 15;

/// Viewport, camera anchor and zoom-derived factors for one render state.
///
/// All passes read from a shared `ViewState` borrow; nothing in here is
/// global. `origin` is the absolute map pixel at the viewport's top-left
/// corner, so absolute footprint coordinates minus `origin` are canvas
/// coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub width: f64,
    pub height: f64,
    pub center: Vec2,
    pub origin: Vec2,
    pub zoom: u8,
    /// Perspective anchor: viewport center x, bottom edge y, plus any
    /// transient pan offset.
    pub cam: Vec2,
    /// Records taller than this are clamped at import.
    pub max_height: f64,
    /// Meters-to-pixels divisor for the current zoom.
    pub zoom_scale: f64,
    /// Alpha attenuation for the current zoom.
    pub zoom_factor: f64,
    wall_color: Color,
    alt_color: Color,
    roof_color: Color,
}

impl ViewState {
    pub fn new(width: f64, height: f64) -> Self {
        let wall = Color::from_rgba(200, 190, 180, 1.0);
        let mut view = Self {
            width: 0.0,
            height: 0.0,
            center: Vec2::new(0.0, 0.0),
            origin: Vec2::new(0.0, 0.0),
            zoom: MIN_ZOOM,
            cam: Vec2::new(0.0, 0.0),
            max_height: CAM_Z - 50.0,
            zoom_scale: 1.0,
            zoom_factor: 1.0,
            wall_color: wall,
            alt_color: wall.lightness(0.8),
            roof_color: wall.lightness(1.2),
        };
        view.set_size(width, height);
        view.set_zoom(MIN_ZOOM);
        view
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.center = Vec2::new((width / 2.0).floor(), (height / 2.0).floor());
        self.cam = Vec2::new(self.center.x, height);
        self.max_height = CAM_Z - 50.0;
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom;
        let level = zoom as i32 - MIN_ZOOM as i32;
        self.zoom_scale = 6.0 / f64::powi(2.0, level);
        self.zoom_factor = f64::powi(0.95, level);
    }

    /// Transient camera shift during a pan; the anchor snaps back when
    /// the move ends.
    pub fn move_cam(&mut self, offset: Vec2) {
        self.cam = Vec2::new(self.center.x + offset.x, self.height + offset.y);
    }

    pub fn set_wall_color(&mut self, color: Color) {
        self.wall_color = color;
        self.alt_color = color.lightness(0.8);
        self.roof_color = color.lightness(1.2);
    }

    pub fn set_roof_color(&mut self, color: Color) {
        self.roof_color = color;
    }

    /// Default palette, attenuated for the current zoom.
    pub fn wall_color(&self) -> Color {
        self.wall_color.alpha(self.zoom_factor)
    }

    pub fn alt_color(&self) -> Color {
        self.alt_color.alpha(self.zoom_factor)
    }

    pub fn roof_color(&self) -> Color {
        self.roof_color.alpha(self.zoom_factor)
    }

    /// Pseudo-perspective projection of a viewport-relative point at one
    /// scale step, snapped to whole pixels.
    pub fn project(&self, p: Vec2, scale: f64) -> Vec2 {
        Vec2::new(
            ((p.x - self.cam.x) * scale + self.cam.x).trunc(),
            ((p.y - self.cam.y) * scale + self.cam.y).trunc(),
        )
    }

    /// Foreshortening factor for a height above ground.
    pub fn scale_for(&self, height: f64) -> f64 {
        CAM_Z / (CAM_Z - height)
    }

    /// Viewport rectangle in absolute map pixels.
    pub fn viewport(&self) -> Aabb2 {
        Aabb2::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.width,
            self.origin.y + self.height,
        )
    }

    /// Camera footpoint in absolute map pixels, the reference for depth
    /// ordering.
    pub fn sort_cam(&self) -> Vec2 {
        self.cam + self.origin
    }

    pub fn map_size(&self) -> f64 {
        map_size(self.zoom)
    }

    /// Geographic coordinate under the viewport center.
    pub fn center_geo(&self) -> Geo {
        pixel_to_geo(
            self.center.x + self.origin.x,
            self.center.y + self.origin.y,
            self.map_size(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{CAM_Z, MIN_ZOOM, ViewState};
    use foundation::math::Vec2;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn camera_sits_at_bottom_center() {
        let view = ViewState::new(800.0, 601.0);
        assert_eq!(view.center, Vec2::new(400.0, 300.0));
        assert_eq!(view.cam, Vec2::new(400.0, 601.0));
        assert_eq!(view.max_height, CAM_Z - 50.0);
    }

    #[test]
    fn zoom_factors_follow_the_level() {
        let mut view = ViewState::new(800.0, 600.0);
        view.set_zoom(MIN_ZOOM);
        assert_eq!(view.zoom_scale, 6.0);
        assert_eq!(view.zoom_factor, 1.0);

        view.set_zoom(MIN_ZOOM + 1);
        assert_eq!(view.zoom_scale, 3.0);
        assert_close(view.zoom_factor, 0.95, 1e-12);

        view.set_zoom(MIN_ZOOM + 2);
        assert_eq!(view.zoom_scale, 1.5);
        assert_close(view.zoom_factor, 0.9025, 1e-12);
    }

    #[test]
    fn projection_moves_points_away_from_camera() {
        let view = ViewState::new(800.0, 600.0);
        let scale = view.scale_for(100.0);
        assert_close(scale, CAM_Z / (CAM_Z - 100.0), 1e-12);

        // ground point stays put
        assert_eq!(view.project(view.cam, scale), view.cam);

        // points between camera and the top edge move up and out
        let p = view.project(Vec2::new(300.0, 200.0), scale);
        assert!(p.x < 300.0);
        assert!(p.y < 200.0);
        // snapped to whole pixels
        assert_eq!(p.x, p.x.trunc());
        assert_eq!(p.y, p.y.trunc());
    }

    #[test]
    fn pan_offset_shifts_the_anchor() {
        let mut view = ViewState::new(800.0, 600.0);
        view.move_cam(Vec2::new(10.0, -20.0));
        assert_eq!(view.cam, Vec2::new(410.0, 580.0));
        view.move_cam(Vec2::new(0.0, 0.0));
        assert_eq!(view.cam, Vec2::new(400.0, 600.0));
    }

    #[test]
    fn viewport_tracks_origin() {
        let mut view = ViewState::new(100.0, 50.0);
        view.set_origin(Vec2::new(1000.0, 2000.0));
        let vp = view.viewport();
        assert_eq!((vp.min_x, vp.min_y, vp.max_x, vp.max_y), (1000.0, 2000.0, 1100.0, 2050.0));
        assert_eq!(view.sort_cam(), Vec2::new(1050.0, 2050.0));
    }
}
