use foundation::bounds::Aabb2;
use foundation::color::{Color, Rgba};
use foundation::math::Vec2;

/// Body geometry of a record. `Block` is the default for anything that
/// declares no shape and is not detected as rotational.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    Block,
    Cylinder,
    Cone,
    Dome,
    Sphere,
    Pyramid,
}

impl Shape {
    /// Known shape tags; anything else answers `None` and falls back to
    /// the default body.
    pub fn parse(raw: &str) -> Option<Self> {
        Some(match raw {
            "cylinder" => Shape::Cylinder,
            "cone" => Shape::Cone,
            "dome" => Shape::Dome,
            "sphere" => Shape::Sphere,
            "pyramid" => Shape::Pyramid,
            _ => return None,
        })
    }

    /// Rotational bodies render from a center and radius instead of the
    /// footprint ring.
    pub fn is_rotational(self) -> bool {
        matches!(
            self,
            Shape::Cylinder | Shape::Cone | Shape::Dome | Shape::Sphere
        )
    }
}

/// Roof drawn as a second extrusion pass on top of the body.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RoofShape {
    #[default]
    Flat,
    Cone,
    Dome,
    Pyramid,
}

impl RoofShape {
    pub fn parse(raw: &str) -> Option<Self> {
        Some(match raw {
            "cone" => RoofShape::Cone,
            "dome" => RoofShape::Dome,
            "pyramid" => RoofShape::Pyramid,
            _ => return None,
        })
    }

    /// Cone and dome roofs need the rotational radius even on a block body.
    pub fn is_rotational(self) -> bool {
        matches!(self, RoofShape::Cone | RoofShape::Dome)
    }
}

/// One extruded feature, fully resolved to map pixels at a fixed zoom.
///
/// Everything except `scale` is immutable after import; `scale` is the
/// fade-in progress and only ever moves towards 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingRecord {
    pub id: String,
    /// Grouping id shared by related features; picking reports it in
    /// place of `id` when present.
    pub relation_id: Option<String>,
    /// Flat closed ring `[x0,y0,..]`, first pair equal to the last.
    pub footprint: Vec<f64>,
    /// Inner rings, same encoding as the footprint.
    pub holes: Vec<Vec<f64>>,
    pub shape: Shape,
    pub roof_shape: RoofShape,
    /// Extra vertical extent of a shaped roof, in pixels. Zero when flat.
    pub roof_height: f64,
    /// Roof elevation in pixels; `min_height <= height` holds for every
    /// imported record.
    pub height: f64,
    /// Elevation of the underside, nonzero for perched features.
    pub min_height: f64,
    pub center: Vec2,
    pub bbox: Aabb2,
    /// Half the bbox width; the ground radius of rotational bodies.
    pub radius: f64,
    pub wall_color: Option<Color>,
    pub alt_color: Option<Color>,
    pub roof_color: Option<Color>,
    /// Flat picking color, reversible to the id through the registry.
    pub hit_color: Rgba,
    /// Fade-in progress, 0.0 to 1.0.
    pub scale: f64,
}

impl BuildingRecord {
    /// Height and min-height with the fade-in scale applied.
    pub fn faded_heights(&self) -> (f64, f64) {
        if self.scale < 1.0 {
            (self.height * self.scale, self.min_height * self.scale)
        } else {
            (self.height, self.min_height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RoofShape, Shape};

    #[test]
    fn shape_tags_round_trip() {
        assert_eq!(Shape::parse("cylinder"), Some(Shape::Cylinder));
        assert_eq!(Shape::parse("pyramid"), Some(Shape::Pyramid));
        assert_eq!(Shape::parse("igloo"), None);
        assert_eq!(Shape::default(), Shape::Block);
    }

    #[test]
    fn rotational_covers_the_round_bodies() {
        assert!(Shape::Cylinder.is_rotational());
        assert!(Shape::Sphere.is_rotational());
        assert!(!Shape::Block.is_rotational());
        assert!(!Shape::Pyramid.is_rotational());
        assert!(RoofShape::Dome.is_rotational());
        assert!(!RoofShape::Pyramid.is_rotational());
    }
}
