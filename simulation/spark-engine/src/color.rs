//! Life-ratio driven color curve

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maps a spark's life ratio onto an HSL color
///
/// Hue drifts toward red as the ratio falls; lightness scales with it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColorCurve {
    /// Hue at full life, in turns (0.0-1.0)
    pub base_hue: f32,
    /// Hue subtracted by the time the ratio reaches zero
    pub hue_drift: f32,
    pub saturation: f32,
    /// Lightness at zero life
    pub base_lightness: f32,
    /// Lightness added at full life
    pub lightness_gain: f32,
}

impl ColorCurve {
    /// Linear RGB for the given life ratio (expected in `[0, 1]`)
    pub fn rgb(&self, life_ratio: f32) -> [f32; 3] {
        let hue = self.base_hue - (1.0 - life_ratio) * self.hue_drift;
        let lightness = self.base_lightness + life_ratio * self.lightness_gain;
        hsl_to_rgb(hue, self.saturation, lightness)
    }
}

impl Default for ColorCurve {
    fn default() -> Self {
        Self {
            base_hue: 0.08,
            hue_drift: 0.05,
            saturation: 1.0,
            base_lightness: 0.55,
            lightness_gain: 0.15,
        }
    }
}

/// Convert HSL (all components in turns/fractions) to RGB
///
/// Hue wraps around; saturation and lightness are clamped to `[0, 1]`.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return [l, l, l];
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    [
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}
