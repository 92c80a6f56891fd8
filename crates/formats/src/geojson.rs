use serde_json::{Map, Value};

/// Geometry of one feature. Only polygonal types carry data; every
/// other GeoJSON type is legal input that expands to no polygons.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Rings of `[lon, lat]` positions, outer ring first.
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
    GeometryCollection(Vec<Geometry>),
    Unsupported,
}

impl Geometry {
    /// Every polygon in this geometry as a slice of rings, outer ring
    /// first. Collections flatten recursively.
    pub fn polygons(&self) -> Vec<&[Vec<[f64; 2]>]> {
        let mut out = Vec::new();
        self.collect_polygons(&mut out);
        out
    }

    fn collect_polygons<'a>(&'a self, out: &mut Vec<&'a [Vec<[f64; 2]>]>) {
        match self {
            Geometry::Polygon(rings) => out.push(rings.as_slice()),
            Geometry::MultiPolygon(polygons) => {
                out.extend(polygons.iter().map(|rings| rings.as_slice()));
            }
            Geometry::GeometryCollection(members) => {
                for member in members {
                    member.collect_polygons(out);
                }
            }
            Geometry::Unsupported => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<GeoFeature>,
}

#[derive(Debug)]
pub enum GeoJsonError {
    Syntax { reason: String },
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::Syntax { reason } => {
                write!(f, "JSON parse error: {reason}")
            }
            GeoJsonError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            GeoJsonError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {}

impl FeatureCollection {
    pub fn from_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value = serde_json::from_str(payload).map_err(|e| GeoJsonError::Syntax {
            reason: e.to_string(),
        })?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, GeoJsonError> {
        let obj = value
            .as_object()
            .ok_or(GeoJsonError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(GeoJsonError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(GeoJsonError::NotAFeatureCollection);
        }

        let entries = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(GeoJsonError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let feature = entry.as_object().ok_or(GeoJsonError::InvalidFeature {
                index,
                reason: "feature must be an object".to_string(),
            })?;

            // Entries of any other type contribute nothing.
            if feature.get("type").and_then(|v| v.as_str()) != Some("Feature") {
                continue;
            }

            let id = match feature.get("id") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };

            let properties = feature
                .get("properties")
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default();

            let geometry = match feature.get("geometry") {
                Some(geometry) if !geometry.is_null() => parse_geometry(geometry)
                    .map_err(|reason| GeoJsonError::InvalidFeature { index, reason })?,
                _ => Geometry::Unsupported,
            };

            features.push(GeoFeature {
                id,
                properties,
                geometry,
            });
        }

        Ok(Self { features })
    }
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    if ty == "GeometryCollection" {
        let members = obj
            .get("geometries")
            .and_then(|v| v.as_array())
            .ok_or("GeometryCollection missing geometries".to_string())?;
        let mut parsed = Vec::with_capacity(members.len());
        for member in members {
            parsed.push(parse_geometry(member)?);
        }
        return Ok(Geometry::GeometryCollection(parsed));
    }

    match ty {
        "Polygon" => {
            let coords = obj
                .get("coordinates")
                .ok_or("geometry missing coordinates".to_string())?;
            Ok(Geometry::Polygon(parse_rings(coords)?))
        }
        "MultiPolygon" => {
            let coords = obj
                .get("coordinates")
                .ok_or("geometry missing coordinates".to_string())?;
            let polygons = coords
                .as_array()
                .ok_or("MultiPolygon coordinates must be an array".to_string())?;
            let mut parsed = Vec::with_capacity(polygons.len());
            for polygon in polygons {
                parsed.push(parse_rings(polygon)?);
            }
            Ok(Geometry::MultiPolygon(parsed))
        }
        _ => Ok(Geometry::Unsupported),
    }
}

fn parse_rings(coords: &Value) -> Result<Vec<Vec<[f64; 2]>>, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        out.push(parse_positions(ring)?);
    }
    Ok(out)
}

fn parse_positions(ring: &Value) -> Result<Vec<[f64; 2]>, String> {
    let positions = ring
        .as_array()
        .ok_or("ring must be an array of positions".to_string())?;
    let mut out = Vec::with_capacity(positions.len());
    for position in positions {
        let pair = position
            .as_array()
            .ok_or("position must be an array".to_string())?;
        if pair.len() < 2 {
            return Err("position must have [lon, lat]".to_string());
        }
        let lon = pair[0].as_f64().ok_or("lon must be a number".to_string())?;
        let lat = pair[1].as_f64().ok_or("lat must be a number".to_string())?;
        out.push([lon, lat]);
    }
    Ok(out)
}
