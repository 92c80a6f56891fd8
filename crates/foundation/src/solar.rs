//! Sun position from a timestamp and a geographic coordinate.
//!
//! Formulas follow the astronomy summary at aa.quae.nl/en/reken/zonpositie.html.
//! Accuracy is in the arc-minute range, plenty for shadow casting.

use crate::time::{MILLIS_PER_DAY, Timestamp};

const J1970: f64 = 2_440_588.0;
const J2000: f64 = 2_451_545.0;

/// Obliquity of the Earth's axis.
const OBLIQUITY: f64 = 23.4397 * std::f64::consts::PI / 180.0;

/// Horizontal sun coordinates in radians. Azimuth is measured from
/// north, positive towards east; altitude from the horizon up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SunPosition {
    pub altitude: f64,
    pub azimuth: f64,
}

fn to_julian(ts: Timestamp) -> f64 {
    ts.millis() as f64 / MILLIS_PER_DAY - 0.5 + J1970
}

fn to_days(ts: Timestamp) -> f64 {
    to_julian(ts) - J2000
}

fn right_ascension(l: f64, b: f64) -> f64 {
    (l.sin() * OBLIQUITY.cos() - b.tan() * OBLIQUITY.sin()).atan2(l.cos())
}

fn declination(l: f64, b: f64) -> f64 {
    (b.sin() * OBLIQUITY.cos() + b.cos() * OBLIQUITY.sin() * l.sin()).asin()
}

fn azimuth(h: f64, phi: f64, dec: f64) -> f64 {
    h.sin().atan2(h.cos() * phi.sin() - dec.tan() * phi.cos())
}

fn altitude(h: f64, phi: f64, dec: f64) -> f64 {
    (phi.sin() * dec.sin() + phi.cos() * dec.cos() * h.cos()).asin()
}

fn sidereal_time(d: f64, lw: f64) -> f64 {
    (280.16 + 360.9856235 * d).to_radians() - lw
}

fn solar_mean_anomaly(d: f64) -> f64 {
    (357.5291 + 0.98560028 * d).to_radians()
}

fn equation_of_center(m: f64) -> f64 {
    (1.9148 * m.sin() + 0.0200 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin()).to_radians()
}

fn ecliptic_longitude(m: f64, c: f64) -> f64 {
    // 102.9372: perihelion of the Earth
    m + c + 102.9372_f64.to_radians() + std::f64::consts::PI
}

pub fn sun_position(ts: Timestamp, latitude: f64, longitude: f64) -> SunPosition {
    let lw = -longitude.to_radians();
    let phi = latitude.to_radians();
    let d = to_days(ts);

    let m = solar_mean_anomaly(d);
    let c = equation_of_center(m);
    let l = ecliptic_longitude(m, c);
    let dec = declination(l, 0.0);
    let ra = right_ascension(l, 0.0);
    let h = sidereal_time(d, lw) - ra;

    SunPosition {
        altitude: altitude(h, phi, dec),
        azimuth: azimuth(h, phi, dec) - std::f64::consts::FRAC_PI_2,
    }
}
