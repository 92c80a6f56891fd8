use std::fs;
use std::path::PathBuf;

use clap::Parser;
use engine::{Engine, MIN_ZOOM, StyleConfig};
use foundation::math::{Geo, Vec2, geo_to_pixel, map_size};
use foundation::time::Timestamp;
use log::{info, warn};
use serde_json::Value;

/// Renders one GeoJSON building collection to an image, headless.
#[derive(Parser, Debug)]
#[command(author, version, about = "Massing snapshot: GeoJSON in, PPM out")]
struct Args {
    /// GeoJSON FeatureCollection to render
    input: PathBuf,

    /// Output image, binary PPM
    #[arg(long, default_value = "massing.ppm")]
    out: PathBuf,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Map zoom; building detail starts at 15
    #[arg(long, default_value_t = 16)]
    zoom: u8,

    /// Viewport center as lat,lon; the data's midpoint when absent
    #[arg(long)]
    center: Option<String>,

    /// Sun date as unix milliseconds; shadows render when set
    #[arg(long)]
    date: Option<i64>,

    /// Wall color, hex or named
    #[arg(long)]
    wall_color: Option<String>,

    /// Roof color, hex or named
    #[arg(long)]
    roof_color: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    if args.zoom < MIN_ZOOM {
        warn!("zoom {} is below {MIN_ZOOM}, nothing will render", args.zoom);
    }

    let raw = fs::read_to_string(&args.input)?;
    let data: Value = serde_json::from_str(&raw)?;

    let center = match &args.center {
        Some(raw) => parse_center(raw)?,
        None => data_center(&data).ok_or("no coordinates in the input, pass --center lat,lon")?,
    };

    let mut engine = Engine::new(args.width, args.height);
    engine.style(&StyleConfig {
        wall_color: args.wall_color.clone(),
        roof_color: args.roof_color.clone(),
        shadows: Some(args.date.is_some()),
        ..StyleConfig::default()
    });
    if let Some(ms) = args.date {
        engine.set_date(Timestamp(ms));
    }

    let origin = geo_to_pixel(center, map_size(args.zoom))
        - Vec2::new(args.width as f64 / 2.0, args.height as f64 / 2.0);
    engine.on_zoom_end(args.zoom, origin, 0);
    engine.set_data(data, 0)?;
    engine.pump(0);

    let pixels = engine.screenshot();
    fs::write(&args.out, ppm_bytes(&pixels, args.width, args.height))?;
    info!(
        "wrote {} ({}x{}) centered on {:.5},{:.5}",
        args.out.display(),
        args.width,
        args.height,
        center.latitude,
        center.longitude
    );
    Ok(())
}

fn parse_center(raw: &str) -> Result<Geo, String> {
    let mut parts = raw.split(',');
    let lat: Option<f64> = parts.next().and_then(|p| p.trim().parse().ok());
    let lon: Option<f64> = parts.next().and_then(|p| p.trim().parse().ok());
    match (lat, lon, parts.next()) {
        (Some(lat), Some(lon), None) => Ok(Geo::new(lat, lon)),
        _ => Err(format!("center {raw:?} is not lat,lon")),
    }
}

/// Geographic midpoint of every position in the payload.
fn data_center(data: &Value) -> Option<Geo> {
    let features = data.get("features")?.as_array()?;
    let mut bounds: Option<[f64; 4]> = None;
    for feature in features {
        if let Some(geometry) = feature.get("geometry") {
            fold_positions(geometry, &mut bounds);
        }
    }
    let [min_lon, min_lat, max_lon, max_lat] = bounds?;
    Some(Geo::new((min_lat + max_lat) / 2.0, (min_lon + max_lon) / 2.0))
}

/// Folds every `[lon, lat, ..]` leaf under `node` into the running
/// bounds, descending through rings, multipolygons and geometry
/// collections alike.
fn fold_positions(node: &Value, bounds: &mut Option<[f64; 4]>) {
    if let Some(object) = node.as_object() {
        for value in object.values() {
            fold_positions(value, bounds);
        }
        return;
    }
    let Some(items) = node.as_array() else {
        return;
    };
    if items.len() >= 2
        && let (Some(lon), Some(lat)) = (items[0].as_f64(), items[1].as_f64())
    {
        let entry = bounds.get_or_insert([lon, lat, lon, lat]);
        entry[0] = entry[0].min(lon);
        entry[1] = entry[1].min(lat);
        entry[2] = entry[2].max(lon);
        entry[3] = entry[3].max(lat);
        return;
    }
    for item in items {
        fold_positions(item, bounds);
    }
}

/// Binary PPM with the premultiplied composite flattened over white.
fn ppm_bytes(pixels: &[u8], width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() / 4 * 3 + 32);
    out.extend_from_slice(format!("P6\n{width} {height}\n255\n").as_bytes());
    for px in pixels.chunks_exact(4) {
        let ground = 255 - px[3];
        out.push(px[0].saturating_add(ground));
        out.push(px[1].saturating_add(ground));
        out.push(px[2].saturating_add(ground));
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{data_center, parse_center, ppm_bytes};

    #[test]
    fn center_parses_lat_lon_pairs() {
        let geo = parse_center("52.52, 13.4").unwrap();
        assert_eq!(geo.latitude, 52.52);
        assert_eq!(geo.longitude, 13.4);
        assert!(parse_center("52.52").is_err());
        assert!(parse_center("a,b").is_err());
        assert!(parse_center("1,2,3").is_err());
    }

    #[test]
    fn data_center_is_the_coordinate_midpoint() {
        let data = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[13.0, 52.0], [13.2, 52.0], [13.2, 52.2], [13.0, 52.2], [13.0, 52.0]]],
                    },
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {
                        "type": "Point",
                        "coordinates": [14.0, 53.0],
                    },
                },
            ],
        });
        let geo = data_center(&data).unwrap();
        assert_eq!(geo.latitude, 52.5);
        assert_eq!(geo.longitude, 13.5);
    }

    #[test]
    fn empty_collections_have_no_center() {
        let data = json!({ "type": "FeatureCollection", "features": [] });
        assert!(data_center(&data).is_none());
    }

    #[test]
    fn ppm_flattens_over_white() {
        // one opaque red pixel, one transparent, one half-covered black
        let pixels = [255, 0, 0, 255, 0, 0, 0, 0, 0, 0, 0, 128];
        let bytes = ppm_bytes(&pixels, 3, 1);
        assert!(bytes.starts_with(b"P6\n3 1\n255\n"));
        let body = &bytes[bytes.len() - 9..];
        assert_eq!(body, &[255, 0, 0, 255, 255, 255, 127, 127, 127][..]);
    }
}
