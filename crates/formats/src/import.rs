use foundation::bounds::Aabb2;
use foundation::color::Color;
use foundation::math::{DEFAULT_SQ_TOLERANCE, Geo, Vec2, geo_to_pixel, simplify_ring};
use scene::{BuildingRecord, HitRegistry, RoofShape, Shape, ViewState};
use serde_json::{Map, Value};

use crate::geojson::{FeatureCollection, GeoFeature, GeoJsonError};
use crate::materials::material_color;

pub const METERS_PER_LEVEL: f64 = 3.0;
pub const DEFAULT_HEIGHT: f64 = 5.0;

/// Imports a GeoJSON FeatureCollection into building records resolved
/// to map pixels at the view's current zoom.
///
/// Every outer ring of every polygonal geometry becomes one record;
/// rings reduced below four point-pairs are dropped, as are features
/// whose underside would sit above their roof. `filter` may veto
/// features before any geometry work happens. Records start with a
/// fade-in scale of zero.
pub fn import_collection(
    value: &Value,
    view: &ViewState,
    registry: &mut HitRegistry,
    filter: Option<&dyn Fn(&GeoFeature) -> bool>,
) -> Result<Vec<BuildingRecord>, GeoJsonError> {
    let collection = FeatureCollection::from_value(value)?;
    let mut records = Vec::new();
    for feature in &collection.features {
        if let Some(filter) = filter
            && !filter(feature)
        {
            continue;
        }
        import_feature(feature, view, registry, &mut records);
    }
    Ok(records)
}

struct AlignedProperties {
    height: f64,
    min_height: f64,
    roof_height: f64,
    shape: Option<Shape>,
    roof_shape: RoofShape,
    wall_color: Option<Color>,
    alt_color: Option<Color>,
    roof_color: Option<Color>,
}

/// Resolves raw feature properties to pixel-space extents and parsed
/// colors. Answers `None` when the feature cannot be rendered at all.
fn align_properties(props: &Map<String, Value>, view: &ViewState) -> Option<AlignedProperties> {
    let height = number_prop(props, "height")
        .filter(|h| *h != 0.0)
        .or_else(|| {
            number_prop(props, "levels")
                .filter(|l| *l != 0.0)
                .map(|l| l * METERS_PER_LEVEL)
        })
        .unwrap_or(DEFAULT_HEIGHT);
    let min_height = number_prop(props, "minHeight")
        .filter(|h| *h != 0.0)
        .or_else(|| {
            number_prop(props, "minLevel")
                .filter(|l| *l != 0.0)
                .map(|l| l * METERS_PER_LEVEL)
        })
        .unwrap_or(0.0);

    let mut height = (height / view.zoom_scale).min(view.max_height);
    let min_height = min_height / view.zoom_scale;

    // A material tag that resolves to nothing deliberately shadows any
    // explicit wall color.
    let wall_source = match string_prop(props, "material") {
        Some(material) => material_color(&material),
        None => string_prop(props, "wallColor").or_else(|| string_prop(props, "color")),
    };
    let mut wall_color = None;
    let mut alt_color = None;
    if let Some(raw) = wall_source
        && let Some(color) = Color::parse(&raw)
    {
        let color = color.alpha(view.zoom_factor);
        alt_color = Some(color.lightness(0.8));
        wall_color = Some(color);
    }

    let roof_source = match string_prop(props, "roofMaterial") {
        Some(material) => material_color(&material),
        None => string_prop(props, "roofColor"),
    };
    let roof_color = roof_source
        .and_then(|raw| Color::parse(&raw))
        .map(|color| color.alpha(view.zoom_factor));

    let shape = string_prop(props, "shape").as_deref().and_then(Shape::parse);
    let roof_shape = string_prop(props, "roofShape")
        .as_deref()
        .and_then(RoofShape::parse);

    // A shaped roof carves its extent out of the body height.
    let mut roof_height = 0.0;
    if roof_shape.is_some()
        && let Some(raw) = number_prop(props, "roofHeight").filter(|rh| *rh != 0.0)
    {
        roof_height = raw / view.zoom_scale;
        height = (height - roof_height).max(0.0);
    }

    if min_height > height {
        log::debug!("underside {min_height:.1} above roof {height:.1}, feature dropped");
        return None;
    }

    Some(AlignedProperties {
        height,
        min_height,
        roof_height,
        shape,
        roof_shape: roof_shape.unwrap_or_default(),
        wall_color,
        alt_color,
        roof_color,
    })
}

fn import_feature(
    feature: &GeoFeature,
    view: &ViewState,
    registry: &mut HitRegistry,
    out: &mut Vec<BuildingRecord>,
) {
    let Some(aligned) = align_properties(&feature.properties, view) else {
        return;
    };

    for polygon in feature.geometry.polygons() {
        let Some((outer, inner)) = polygon.split_first() else {
            continue;
        };
        let Some(footprint) = project_ring(outer, view) else {
            continue;
        };
        let holes: Vec<Vec<f64>> = inner
            .iter()
            .filter_map(|ring| project_ring(ring, view))
            .collect();

        let bbox = Aabb2::from_flat_ring(&footprint);
        let center = bbox.center();
        let radius = (bbox.max_x - bbox.min_x) / 2.0;

        let shape = match aligned.shape {
            Some(shape) => shape,
            None if is_rotational_ring(&footprint, &bbox) => Shape::Cylinder,
            None => Shape::Block,
        };

        let id = feature
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .or_else(|| id_prop(&feature.properties, "id"))
            .unwrap_or_else(|| {
                format!(
                    "{},{},{},{}",
                    footprint[0], footprint[1], aligned.height, aligned.min_height
                )
            });
        let relation_id = id_prop(&feature.properties, "relationId");
        let hit_color = registry.color_for(relation_id.as_deref().unwrap_or(&id));

        out.push(BuildingRecord {
            id,
            relation_id,
            footprint,
            holes,
            shape,
            roof_shape: aligned.roof_shape,
            roof_height: aligned.roof_height,
            height: aligned.height,
            min_height: aligned.min_height,
            center,
            bbox,
            radius,
            wall_color: aligned.wall_color,
            alt_color: aligned.alt_color,
            roof_color: aligned.roof_color,
            hit_color,
            scale: 0.0,
        });
    }
}

/// Projects a lon/lat ring to absolute map pixels and simplifies it.
/// Rings with fewer than four point-pairs left are unusable.
fn project_ring(ring: &[[f64; 2]], view: &ViewState) -> Option<Vec<f64>> {
    let map_size = view.map_size();
    let mut flat = Vec::with_capacity(ring.len() * 2);
    for position in ring {
        let px = geo_to_pixel(Geo::new(position[1], position[0]), map_size);
        flat.push(px.x);
        flat.push(px.y);
    }

    let flat = simplify_ring(&flat, DEFAULT_SQ_TOLERANCE);
    if flat.len() < 8 {
        return None;
    }
    Some(flat)
}

/// A ring with enough vertices, a near-square bounding box and every
/// vertex close to the mean radius is treated as a circle.
fn is_rotational_ring(footprint: &[f64], bbox: &Aabb2) -> bool {
    if footprint.len() < 16 {
        return false;
    }

    let width = bbox.width();
    let height = bbox.height();
    let ratio = width / height;
    if ratio < 0.85 || ratio > 1.15 {
        return false;
    }

    let center = Vec2::new(bbox.min_x + width / 2.0, bbox.min_y + height / 2.0);
    let radius = (width + height) / 4.0;
    let sq_radius = radius * radius;

    for pair in footprint.chunks_exact(2) {
        let ratio = Vec2::new(pair[0], pair[1]).sq_dist(center) / sq_radius;
        if ratio < 0.8 || ratio > 1.2 {
            return false;
        }
    }
    true
}

fn number_prop(props: &Map<String, Value>, key: &str) -> Option<f64> {
    match props.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_prop(props: &Map<String, Value>, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn id_prop(props: &Map<String, Value>, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
