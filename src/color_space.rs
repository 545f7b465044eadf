// src/color_space.rs - RGB / HSL / hex conversions and single-pixel sampling

use serde::Serialize;

use crate::errors::{ChromaLensError, Result};
use crate::pixel_buffer::{in_bounds, PixelBuffer};

/// Rec. 601 luma weights
pub const LUMA_R: f64 = 0.299;
pub const LUMA_G: f64 = 0.587;
pub const LUMA_B: f64 = 0.114;

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Integer HSL: hue in degrees `0..360`, saturation and lightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self.r, self.g, self.b)
    }

    pub fn hex(self) -> String {
        rgb_to_hex(self.r, self.g, self.b)
    }

    pub fn luma(self) -> f64 {
        luma(self.r, self.g, self.b)
    }
}

/// Weighted brightness `0.299R + 0.587G + 0.114B`, unrounded
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64
}

/// Unrounded HSL: hue in degrees `[0, 360)`, saturation and lightness in percent.
pub fn rgb_to_hsl_f64(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h * 60.0, s * 100.0, l * 100.0)
}

/// Convert RGB to integer HSL (hue to the nearest degree, s/l to the nearest percent)
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let (h, s, l) = rgb_to_hsl_f64(r, g, b);
    Hsl {
        h: (h.round() as u16) % 360,
        s: s.round() as u8,
        l: l.round() as u8,
    }
}

/// Inverse of [`rgb_to_hsl_f64`]; inputs in degrees and percent
pub fn hsl_f64_to_rgb(h: f64, s: f64, l: f64) -> Color {
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());

    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let m = l - c / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::new(channel(r1), channel(g1), channel(b1))
}

/// Reconstruct an RGB color from integer HSL
pub fn hsl_to_rgb(hsl: Hsl) -> Color {
    hsl_f64_to_rgb(hsl.h as f64, hsl.s as f64, hsl.l as f64)
}

/// Lowercase `#rrggbb`
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Everything the color sampler reports for one pixel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledColor {
    pub x: u32,
    pub y: u32,
    pub color: Color,
    pub hex: String,
    pub hsl: Hsl,
    /// Rounded luma, `0..=255`
    pub brightness: u8,
}

/// Read a single pixel and describe it
pub fn sample_color(buffer: &PixelBuffer, x: u32, y: u32) -> Result<SampledColor> {
    if !in_bounds(x as i64, y as i64, buffer.width(), buffer.height()) {
        return Err(ChromaLensError::InvalidParameter(format!(
            "sample point ({}, {}) outside {}x{} buffer",
            x,
            y,
            buffer.width(),
            buffer.height()
        )));
    }

    let [r, g, b, _] = buffer.pixel(x, y);
    let color = Color::new(r, g, b);
    Ok(SampledColor {
        x,
        y,
        color,
        hex: color.hex(),
        hsl: color.to_hsl(),
        brightness: color.luma().round() as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_colors_convert_to_expected_hsl() {
        assert_eq!(rgb_to_hsl(255, 0, 0), Hsl { h: 0, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(0, 255, 0), Hsl { h: 120, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(0, 0, 255), Hsl { h: 240, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(255, 255, 255), Hsl { h: 0, s: 0, l: 100 });
        assert_eq!(rgb_to_hsl(0, 0, 0), Hsl { h: 0, s: 0, l: 0 });
        assert_eq!(rgb_to_hsl(128, 128, 128), Hsl { h: 0, s: 0, l: 50 });
    }

    #[test]
    fn hue_wraps_below_360() {
        // Red with a hair of blue lands just under 360 degrees before rounding
        let hsl = rgb_to_hsl(255, 0, 1);
        assert!(hsl.h < 360);
        assert_eq!(hsl.h, 0);
    }

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(rgb_to_hex(0, 0, 0), "#000000");
        assert_eq!(rgb_to_hex(255, 171, 5), "#ffab05");
        assert_eq!(Color::new(18, 52, 86).hex(), "#123456");
    }

    #[test]
    fn unrounded_hsl_round_trips_within_one() {
        for r in (0..=255u16).step_by(3) {
            for g in (0..=255u16).step_by(5) {
                for b in (0..=255u16).step_by(7) {
                    let (r, g, b) = (r as u8, g as u8, b as u8);
                    let (h, s, l) = rgb_to_hsl_f64(r, g, b);
                    let back = hsl_f64_to_rgb(h, s, l);
                    assert!((back.r as i16 - r as i16).abs() <= 1, "{:?}", (r, g, b));
                    assert!((back.g as i16 - g as i16).abs() <= 1, "{:?}", (r, g, b));
                    assert!((back.b as i16 - b as i16).abs() <= 1, "{:?}", (r, g, b));
                }
            }
        }
    }

    #[test]
    fn integer_hsl_round_trip_stays_within_rounding_bound() {
        // One degree of hue and one percent of s/l move a channel by at most 5
        for r in (0..=255u16).step_by(5) {
            for g in (0..=255u16).step_by(5) {
                for b in (0..=255u16).step_by(5) {
                    let (r, g, b) = (r as u8, g as u8, b as u8);
                    let back = hsl_to_rgb(rgb_to_hsl(r, g, b));
                    let err = (back.r as i16 - r as i16)
                        .abs()
                        .max((back.g as i16 - g as i16).abs())
                        .max((back.b as i16 - b as i16).abs());
                    assert!(err <= 5, "{:?} -> {:?}", (r, g, b), back);
                }
            }
        }
    }

    #[test]
    fn grays_round_trip_within_one() {
        for v in 0..=255u8 {
            let back = hsl_to_rgb(rgb_to_hsl(v, v, v));
            assert!((back.r as i16 - v as i16).abs() <= 1);
            assert_eq!(back.r, back.g);
            assert_eq!(back.g, back.b);
        }
    }

    #[test]
    fn sampler_reports_hex_hsl_and_brightness() {
        let buf = PixelBuffer::filled(3, 3, [200, 100, 50, 255]).unwrap();
        let sample = sample_color(&buf, 2, 1).unwrap();
        assert_eq!(sample.hex, "#c86432");
        assert_eq!(sample.brightness, 124); // 59.8 + 58.7 + 5.7 = 124.2
        assert_eq!(sample.hsl, rgb_to_hsl(200, 100, 50));
        assert!(sample_color(&buf, 3, 0).is_err());
    }
}
