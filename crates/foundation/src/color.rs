use std::fmt;

/// 8-bit RGB triple with a fractional alpha, ready for a drawing surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

/// HSL color with hue in degrees and saturation, lightness, alpha in `0..=1`.
///
/// Channel adjustments are multiplicative and unclamped; values are clamped
/// once on conversion to RGBA. That keeps chained adjustments like
/// `lightness(1.2).alpha(0.95)` lossless until the color is actually used.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

fn named(s: &str) -> Option<&'static str> {
    Some(match s {
        "aqua" => "#00ffff",
        "black" => "#000000",
        "blue" => "#0000ff",
        "fuchsia" => "#ff00ff",
        "gray" | "grey" => "#808080",
        "green" => "#008000",
        "lime" => "#00ff00",
        "maroon" => "#800000",
        "navy" => "#000080",
        "olive" => "#808000",
        "orange" => "#ffa500",
        "purple" => "#800080",
        "red" => "#ff0000",
        "silver" => "#c0c0c0",
        "teal" => "#008080",
        "white" => "#ffffff",
        "yellow" => "#ffff00",
        _ => return None,
    })
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

fn parse_hex(s: &str) -> Option<(u8, u8, u8)> {
    let digits = s.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}

fn parse_rgb_call(s: &str) -> Option<(u8, u8, u8, f64)> {
    let rest = s.strip_prefix("rgba").or_else(|| s.strip_prefix("rgb"))?;
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    let mut parts = inner
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .filter(|p| !p.is_empty());
    let r = parts.next()?.parse::<u8>().ok()?;
    let g = parts.next()?.parse::<u8>().ok()?;
    let b = parts.next()?.parse::<u8>().ok()?;
    let a = match parts.next() {
        Some(raw) => raw.parse::<f64>().ok()?,
        None => 1.0,
    };
    Some((r, g, b, a))
}

impl Color {
    pub fn new(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self { h, s, l, a }
    }

    /// Accepts `#rrggbb`, `rgb(r, g, b)`, `rgba(r, g, b, a)` and the
    /// basic named colors. Anything else answers `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let lower = raw.trim().to_ascii_lowercase();
        let s = named(&lower).unwrap_or(&lower);
        if let Some((r, g, b)) = parse_hex(s) {
            return Some(Self::from_rgba(r, g, b, 1.0));
        }
        let (r, g, b, a) = parse_rgb_call(s)?;
        Some(Self::from_rgba(r, g, b, a))
    }

    pub fn from_rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        let r = r as f64 / 255.0;
        let g = g as f64 / 255.0;
        let b = b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;

        if d == 0.0 {
            // achromatic
            return Self::new(0.0, 0.0, l, a);
        }

        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        Self::new(h * 60.0, s, l, a)
    }

    pub fn to_rgba(self) -> Rgba {
        let h = self.h.clamp(0.0, 360.0);
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);
        let a = self.a.clamp(0.0, 1.0);

        let (r, g, b) = if s == 0.0 {
            // achromatic
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            let h = h / 360.0;
            (
                hue_to_rgb(p, q, h + 1.0 / 3.0),
                hue_to_rgb(p, q, h),
                hue_to_rgb(p, q, h - 1.0 / 3.0),
            )
        };

        Rgba::new(
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            a,
        )
    }

    pub fn hue(self, factor: f64) -> Self {
        Self::new(self.h * factor, self.s, self.l, self.a)
    }

    pub fn saturation(self, factor: f64) -> Self {
        Self::new(self.h, self.s * factor, self.l, self.a)
    }

    pub fn lightness(self, factor: f64) -> Self {
        Self::new(self.h, self.s, self.l * factor, self.a)
    }

    pub fn alpha(self, factor: f64) -> Self {
        Self::new(self.h, self.s, self.l, self.a * factor)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rgba = self.to_rgba();
        if rgba.a == 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
        } else {
            write!(
                f,
                "rgba({},{},{},{:.2})",
                rgba.r, rgba.g, rgba.b, rgba.a
            )
        }
    }
}
