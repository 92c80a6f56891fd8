//! The stacked drawing surfaces and their composite order.
//!
//! Bottom to top: shadows, simplified footprints, extruded buildings.
//! The picking surface renders offscreen and never composites. All
//! four share one size and re-render from the same record slice; the
//! stack itself holds no records.

use canvas::{Canvas, RasterCanvas, Readback};
use scene::{BuildingRecord, HitRegistry, ViewState};

use crate::buildings;
use crate::hit::HitPass;
use crate::shadows::ShadowPass;
use crate::simplified;

pub struct LayerStack {
    shadows: RasterCanvas,
    simplified: RasterCanvas,
    buildings: RasterCanvas,
    hit: RasterCanvas,
    /// Composite opacity of the shadow surface, from its last render.
    shadow_alpha: f64,
    pub shadow_pass: ShadowPass,
    pub hit_pass: HitPass,
}

impl LayerStack {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            shadows: RasterCanvas::new(width, height),
            simplified: RasterCanvas::new(width, height),
            buildings: RasterCanvas::new(width, height),
            hit: RasterCanvas::new(width, height),
            shadow_alpha: 1.0,
            shadow_pass: ShadowPass::new(),
            hit_pass: HitPass::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.buildings.width()
    }

    pub fn height(&self) -> u32 {
        self.buildings.height()
    }

    /// Drops all surface contents; the next render repaints at the new
    /// size.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.shadows = RasterCanvas::new(width, height);
        self.simplified = RasterCanvas::new(width, height);
        self.buildings = RasterCanvas::new(width, height);
        self.hit = RasterCanvas::new(width, height);
        self.shadow_alpha = 1.0;
    }

    /// Repaints the displayed surfaces. A quick render redraws the
    /// extrusion pass only and lets the slower surfaces lag a frame,
    /// which keeps pans responsive.
    pub fn render(
        &mut self,
        view: &ViewState,
        records: &[&BuildingRecord],
        zooming: bool,
        quick: bool,
    ) {
        if !quick {
            self.shadow_alpha = self
                .shadow_pass
                .render(&mut self.shadows, view, records, zooming);
            simplified::render(&mut self.simplified, view, records, zooming);
        }
        buildings::render(&mut self.buildings, view, records, zooming);
    }

    /// Shadow surface alone, for date changes.
    pub fn render_shadows(&mut self, view: &ViewState, records: &[&BuildingRecord], zooming: bool) {
        self.shadow_alpha = self
            .shadow_pass
            .render(&mut self.shadows, view, records, zooming);
    }

    /// Picking surface alone; runs debounced, never in the frame path.
    pub fn render_hit(
        &mut self,
        view: &ViewState,
        records: &[&BuildingRecord],
        zooming: bool,
        generation: u64,
    ) {
        self.hit_pass
            .render(&mut self.hit, view, records, zooming, generation);
    }

    pub fn query_hit<'r>(&self, x: f64, y: f64, registry: &'r HitRegistry) -> Option<&'r str> {
        self.hit_pass.query(x, y, registry)
    }

    /// Flattens the displayed surfaces into one premultiplied RGBA
    /// buffer over a transparent background. The picking surface is
    /// not part of the picture.
    pub fn screenshot(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.width() as usize * self.height() as usize * 4];
        let surfaces: [(&RasterCanvas, f64); 3] = [
            (&self.shadows, self.shadow_alpha),
            (&self.simplified, 1.0),
            (&self.buildings, 1.0),
        ];

        for (surface, opacity) in surfaces {
            let gamma = (opacity.clamp(0.0, 1.0) * 255.0).round() as u32;
            if gamma == 0 {
                continue;
            }
            let pixels = surface.read_pixels();
            for (dst, src) in out.chunks_exact_mut(4).zip(pixels.chunks_exact(4)) {
                let sa = src[3] as u32 * gamma / 255;
                let keep = 255 - sa;
                for c in 0..4 {
                    let s = src[c] as u32 * gamma / 255;
                    dst[c] = (s + dst[c] as u32 * keep / 255) as u8;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::LayerStack;
    use canvas::{Canvas, RasterCanvas, Readback};
    use foundation::bounds::Aabb2;
    use foundation::color::Rgba;
    use foundation::math::Vec2;
    use scene::{BuildingRecord, HitRegistry, RoofShape, Shape, ViewState};

    fn record(id: &str, hit_color: Rgba) -> BuildingRecord {
        let center = Vec2::new(100.0, 100.0);
        let half = 30.0;
        BuildingRecord {
            id: id.to_string(),
            relation_id: None,
            footprint: vec![
                center.x - half,
                center.y - half,
                center.x + half,
                center.y - half,
                center.x + half,
                center.y + half,
                center.x - half,
                center.y + half,
                center.x - half,
                center.y - half,
            ],
            holes: Vec::new(),
            shape: Shape::Block,
            roof_shape: RoofShape::Flat,
            roof_height: 0.0,
            height: 20.0,
            min_height: 0.0,
            center,
            bbox: Aabb2::new(
                center.x - half,
                center.y - half,
                center.x + half,
                center.y + half,
            ),
            radius: half,
            wall_color: None,
            alt_color: None,
            roof_color: None,
            hit_color,
            scale: 1.0,
        }
    }

    fn paint_rect(canvas: &mut RasterCanvas, color: Rgba) {
        canvas.begin_path();
        canvas.move_to(10.0, 10.0);
        canvas.line_to(30.0, 10.0);
        canvas.line_to(30.0, 30.0);
        canvas.line_to(10.0, 30.0);
        canvas.close_path();
        canvas.fill(color);
    }

    #[test]
    fn quick_render_leaves_the_slow_surfaces_alone() {
        let view = ViewState::new(200.0, 200.0);
        let mut stack = LayerStack::new(200, 200);
        paint_rect(&mut stack.shadows, Rgba::opaque(102, 102, 102));

        stack.render(&view, &[], false, true);
        assert_eq!(stack.shadows.pixel_at(20, 20), Some([102, 102, 102, 255]));

        // full render clears it again; the epoch date keeps the sun down
        stack.render(&view, &[], false, false);
        assert_eq!(stack.shadows.pixel_at(20, 20), Some([0, 0, 0, 0]));
    }

    #[test]
    fn screenshot_shows_buildings_over_the_lower_surfaces() {
        let view = ViewState::new(200.0, 200.0);
        let mut stack = LayerStack::new(200, 200);
        let tower = record("a", Rgba::opaque(1, 0, 0));

        stack.render(&view, &[&tower], false, false);

        let expected = stack.buildings.pixel_at(100, 100).unwrap();
        assert_ne!(expected, [0, 0, 0, 0]);

        let shot = stack.screenshot();
        let pos = 4 * (100 * 200 + 100);
        assert_eq!(shot[pos..pos + 4], expected);
    }

    #[test]
    fn screenshot_never_includes_the_picking_surface() {
        let view = ViewState::new(200.0, 200.0);
        let mut registry = HitRegistry::new();
        let mut stack = LayerStack::new(200, 200);
        let tower = record("a", registry.color_for("a"));

        stack.render_hit(&view, &[&tower], false, registry.generation());
        assert!(stack.query_hit(100.0, 100.0, &registry).is_some());

        let shot = stack.screenshot();
        assert!(shot.iter().all(|&b| b == 0));
    }

    #[test]
    fn shadow_surface_composites_at_its_own_opacity() {
        let mut stack = LayerStack::new(200, 200);
        paint_rect(&mut stack.shadows, Rgba::opaque(102, 102, 102));
        stack.shadow_alpha = 0.5;

        let shot = stack.screenshot();
        let pos = 4 * (20 * 200 + 20);
        // 102 * 128 / 255 = 51
        assert_eq!(shot[pos..pos + 4], [51, 51, 51, 128]);
    }

    #[test]
    fn set_size_resets_every_surface() {
        let mut stack = LayerStack::new(200, 200);
        paint_rect(&mut stack.buildings, Rgba::opaque(7, 7, 7));

        stack.set_size(40, 30);
        assert_eq!(stack.width(), 40);
        assert_eq!(stack.height(), 30);
        assert_eq!(stack.screenshot().len(), 40 * 30 * 4);
        assert!(stack.screenshot().iter().all(|&b| b == 0));
    }
}
