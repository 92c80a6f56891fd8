use super::Vec2;

/// Geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Geo {
    pub latitude: f64,
    pub longitude: f64,
}

impl Geo {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Edge length of the square world map in pixels at an integer zoom.
pub fn map_size(zoom: u8) -> f64 {
    (256u64 << zoom) as f64
}

/// Web-mercator forward projection to absolute map pixels, snapped to
/// whole pixels. Latitude is clamped to the square world.
pub fn geo_to_pixel(geo: Geo, map_size: f64) -> Vec2 {
    let latitude = (0.5
        - ((std::f64::consts::FRAC_PI_4 + std::f64::consts::FRAC_PI_2 * geo.latitude / 180.0)
            .tan()
            .ln()
            / std::f64::consts::PI)
            / 2.0)
        .clamp(0.0, 1.0);
    let longitude = geo.longitude / 360.0 + 0.5;
    Vec2::new((longitude * map_size).floor(), (latitude * map_size).floor())
}

/// Inverse projection. Pixels above or below the square world clamp to
/// the poles; x wraps around the antimeridian.
pub fn pixel_to_geo(x: f64, y: f64, map_size: f64) -> Geo {
    let x = x / map_size;
    let y = y / map_size;
    let latitude = if y <= 0.0 {
        90.0
    } else if y >= 1.0 {
        -90.0
    } else {
        (2.0 * (std::f64::consts::PI * (1.0 - 2.0 * y)).exp().atan()
            - std::f64::consts::FRAC_PI_2)
            .to_degrees()
    };
    let wrapped = if x == 1.0 { 1.0 } else { (x % 1.0 + 1.0) % 1.0 };
    Geo::new(latitude, wrapped * 360.0 - 180.0)
}
