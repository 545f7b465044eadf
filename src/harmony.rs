// src/harmony.rs - Hue relationship and saturation consistency scoring for a palette

use serde::Serialize;

use crate::color_space::{Color, Hsl};

/// Qualitative band of the overall harmony score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HarmonyTier {
    Strong,
    Moderate,
    Weak,
}

impl HarmonyTier {
    /// `>= 75` strong, `>= 50` moderate, anything lower weak
    pub fn from_score(score: u32) -> Self {
        if score >= 75 {
            HarmonyTier::Strong
        } else if score >= 50 {
            HarmonyTier::Moderate
        } else {
            HarmonyTier::Weak
        }
    }

    pub fn explanation(self) -> &'static str {
        match self {
            HarmonyTier::Strong => {
                "Strong color harmony with well-balanced relationships and consistent saturation."
            }
            HarmonyTier::Moderate => {
                "Moderate harmony. Some color relationships work well, but variance could be refined."
            }
            HarmonyTier::Weak => {
                "Weak harmony. Colors may feel disjointed. Consider adjusting saturation consistency or hue relationships."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonyResult {
    pub score: u32,
    pub complementary_balance: u32,
    pub warm_count: u32,
    pub cool_count: u32,
    /// Population standard deviation of saturations, rounded
    pub saturation_variance: u32,
    /// Linear `max(hue) - min(hue)` in degrees
    pub hue_spread: u32,
    pub tier: HarmonyTier,
    pub palette: Vec<Color>,
}

impl HarmonyResult {
    pub fn warm_cool_ratio(&self) -> String {
        format!("{}W : {}C", self.warm_count, self.cool_count)
    }

    pub fn explanation(&self) -> &'static str {
        self.tier.explanation()
    }
}

/// Shortest distance between two hues on the color wheel
#[inline]
pub fn circular_hue_distance(a: u16, b: u16) -> u32 {
    let diff = (a as i32 - b as i32).unsigned_abs();
    diff.min(360 - diff)
}

/// Points for every near-complementary or near-triadic pair, capped at 100
pub fn complementary_balance(hues: &[u16]) -> u32 {
    let mut points = 0u32;
    for (i, &a) in hues.iter().enumerate() {
        for &b in &hues[i + 1..] {
            let dist = circular_hue_distance(a, b);
            if dist > 150 && dist < 210 {
                points += 20;
            } else if dist > 60 && dist < 120 {
                points += 10;
            }
        }
    }
    points.min(100)
}

/// Warm means hue in `[0, 60)` or `>= 300`
#[inline]
pub fn is_warm(hue: u16) -> bool {
    hue < 60 || hue >= 300
}

fn saturation_std_dev(hsl: &[Hsl]) -> u32 {
    if hsl.is_empty() {
        return 0;
    }
    let n = hsl.len() as f64;
    let mean = hsl.iter().map(|c| c.s as f64).sum::<f64>() / n;
    let variance = hsl.iter().map(|c| (c.s as f64 - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt().round() as u32
}

/// Score a palette's hue relationships and saturation consistency
pub fn analyze_harmony(palette: &[Color]) -> HarmonyResult {
    let hsl: Vec<Hsl> = palette.iter().map(|c| c.to_hsl()).collect();
    let hues: Vec<u16> = hsl.iter().map(|c| c.h).collect();

    let complementary_balance = complementary_balance(&hues);

    let warm_count = hues.iter().filter(|&&h| is_warm(h)).count() as u32;
    let cool_count = hues.len() as u32 - warm_count;

    let saturation_variance = saturation_std_dev(&hsl);

    let hue_spread = match (hues.iter().max(), hues.iter().min()) {
        (Some(&max), Some(&min)) => (max - min) as u32,
        _ => 0,
    };

    let spread_score = if hue_spread > 30 && hue_spread < 300 { 40 } else { 20 };
    let sat_score = if saturation_variance < 25 {
        30
    } else if saturation_variance < 50 {
        20
    } else {
        10
    };
    let balance_score = (complementary_balance as f64 * 0.3).round() as u32;
    let score = (spread_score + sat_score + balance_score).min(100);

    HarmonyResult {
        score,
        complementary_balance,
        warm_count,
        cool_count,
        saturation_variance,
        hue_spread,
        tier: HarmonyTier::from_score(score),
        palette: palette.to_vec(),
    }
}
