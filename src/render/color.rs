use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ColorError {
    #[error("expected a 6-digit hex colour, got {0:?}")]
    InvalidHex(String),
}

/// 8-bit RGB with a floating point alpha, the way CSS colours are written.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let value = parse_hex(hex)?;
        Ok(Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8, 1.0))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Interpolate between two colours with premultiplied alpha.
    pub fn lerp_premultiplied(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let a = self.a + (other.a - self.a) * t;
        if a <= 0.0 {
            return Rgba::TRANSPARENT;
        }
        let channel = |c0: u8, c1: u8| {
            let p = c0 as f32 * self.a + (c1 as f32 * other.a - c0 as f32 * self.a) * t;
            (p / a).round().clamp(0.0, 255.0) as u8
        };
        Rgba::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
            a,
        )
    }
}

/// CSS `hsla(h, s%, l%, a)`. Hue is in degrees and wraps; saturation and
/// lightness are percentages.
pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Rgba {
    let h = hue.rem_euclid(360.0) / 360.0;
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba::new(
        channel(h + 1.0 / 3.0),
        channel(h),
        channel(h - 1.0 / 3.0),
        alpha.clamp(0.0, 1.0),
    )
}

/// Shift every channel of a `#rrggbb` colour by `round(2.55 * percent)`,
/// clamping to the valid range.
pub fn adjust_brightness(hex: &str, percent: f64) -> Result<String, ColorError> {
    let value = parse_hex(hex)?;
    // Round half up, so -0.5 goes to 0 rather than -1.
    let delta = (2.55 * percent + 0.5).floor() as i64;
    let shift = |c: u32| ((c & 0xff) as i64 + delta).clamp(0, 255) as u32;
    let out = shift(value >> 16) << 16 | shift(value >> 8) << 8 | shift(value);
    Ok(format!("#{:06x}", out))
}

fn parse_hex(hex: &str) -> Result<u32, ColorError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(hex.to_string()));
    }
    u32::from_str_radix(digits, 16).map_err(|_| ColorError::InvalidHex(hex.to_string()))
}

/// Page colours behind the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub primary: Rgba,
    pub secondary: Rgba,
}

impl Theme {
    /// The initial theme before any colour button is pressed.
    pub fn light() -> Self {
        Self {
            primary: Rgba::new(0x6a, 0x11, 0xcb, 1.0),
            secondary: Rgba::new(0x25, 0x75, 0xfc, 1.0),
        }
    }

    pub fn dark() -> Self {
        Self {
            primary: Rgba::new(0x1a, 0x1a, 0x1a, 1.0),
            secondary: Rgba::new(0x2c, 0x2c, 0x2c, 1.0),
        }
    }

    /// Theme for a user-picked primary colour; the secondary is derived from it.
    pub fn from_primary(hex: &str) -> Result<Self, ColorError> {
        let primary = Rgba::from_hex(hex)?;
        let secondary = Rgba::from_hex(&adjust_brightness(hex, 0.3)?)?;
        Ok(Self { primary, secondary })
    }

    /// Resolve the configured colour and dark-mode flag. Dark mode wins.
    pub fn resolve(color: Option<&str>, dark_mode: bool) -> Result<Self, ColorError> {
        if dark_mode {
            return Ok(Self::dark());
        }
        match color {
            Some(hex) => Self::from_primary(hex),
            None => Ok(Self::light()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brighten_black() {
        let out = adjust_brightness("#000000", 10.0).unwrap();
        assert_eq!(out, "#1a1a1a");
        let v = Rgba::from_hex(&out).unwrap();
        assert!(v.r > 0 && v.g > 0 && v.b > 0);
    }

    #[test]
    fn brighten_saturates_at_white() {
        assert_eq!(adjust_brightness("#000000", 100.0).unwrap(), "#ffffff");
        assert_eq!(adjust_brightness("6a11cb", 500.0).unwrap(), "#ffffff");
    }

    #[test]
    fn darken_clamps_at_zero_and_pads() {
        assert_eq!(adjust_brightness("#0a0b0c", -50.0).unwrap(), "#000000");
        assert_eq!(adjust_brightness("#000010", 0.0).unwrap(), "#000010");
    }

    #[test]
    fn small_percent_rounds_half_up() {
        // 2.55 * 0.3 = 0.765 -> 1
        assert_eq!(adjust_brightness("#6a11cb", 0.3).unwrap(), "#6b12cc");
        // 2.55 * -0.2 = -0.51 -> -1, 2.55 * -0.1 = -0.255 -> 0
        assert_eq!(adjust_brightness("#101010", -0.2).unwrap(), "#0f0f0f");
        assert_eq!(adjust_brightness("#101010", -0.1).unwrap(), "#101010");
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(matches!(adjust_brightness("#12345", 1.0), Err(ColorError::InvalidHex(_))));
        assert!(adjust_brightness("#zzzzzz", 1.0).is_err());
    }

    #[test]
    fn hsla_primaries() {
        assert_eq!(hsla(0.0, 100.0, 50.0, 1.0), Rgba::new(255, 0, 0, 1.0));
        assert_eq!(hsla(120.0, 100.0, 50.0, 1.0), Rgba::new(0, 255, 0, 1.0));
        assert_eq!(hsla(240.0, 100.0, 50.0, 0.5), Rgba::new(0, 0, 255, 0.5));
        assert_eq!(hsla(480.0, 100.0, 50.0, 1.0), hsla(120.0, 100.0, 50.0, 1.0));
    }

    #[test]
    fn theme_resolution() {
        assert_eq!(Theme::resolve(None, false).unwrap(), Theme::light());
        assert_eq!(Theme::resolve(Some("#ff6b6b"), true).unwrap(), Theme::dark());
        let picked = Theme::resolve(Some("#4ecdc4"), false).unwrap();
        assert_eq!(picked.primary.to_hex(), "#4ecdc4");
        assert_eq!(picked.secondary.to_hex(), "#4fcec5");
    }
}
