use serde::{Deserialize, Serialize};

use crate::error::{Result, RoiviewError};

/// 8-bit RGB triple. Serializes as `[r, g, b]`, the shape the rendering
/// engine expects for channel and overlay colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn r(&self) -> u8 {
        self.0[0]
    }

    pub fn g(&self) -> u8 {
        self.0[1]
    }

    pub fn b(&self) -> u8 {
        self.0[2]
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(RoiviewError::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| RoiviewError::InvalidColor(hex.to_string()))
        };
        Ok(Self([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
    }

    /// CSS `rgba(...)` string with each channel divided by `divisor`.
    pub fn rgba_scaled(&self, divisor: f64, alpha: f64) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            fmt_component(self.r() as f64 / divisor),
            fmt_component(self.g() as f64 / divisor),
            fmt_component(self.b() as f64 / divisor),
            fmt_component(alpha),
        )
    }

    pub fn rgba(&self, alpha: f64) -> String {
        self.rgba_scaled(1.0, alpha)
    }
}

/// Fully transparent black, the low end of every heatmap ramp.
pub const TRANSPARENT: &str = "rgba(0, 0, 0, 0)";

// Trim trailing zeros so integral components print as `255`, not `255.0`.
fn fmt_component(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#e41a1c").unwrap(), Rgb::new(0xe4, 0x1a, 0x1c));
        assert_eq!(Rgb::from_hex("377eb8").unwrap(), Rgb::new(0x37, 0x7e, 0xb8));
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gggggg").is_err());
    }

    #[test]
    fn rgba_formats_fractional_channels() {
        let c = Rgb::new(255, 100, 0);
        assert_eq!(c.rgba(1.0), "rgba(255, 100, 0, 1)");
        assert_eq!(c.rgba_scaled(2.0, 0.4), "rgba(127.5, 50, 0, 0.4)");
    }
}
