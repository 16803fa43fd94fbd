use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{self, Rgb};
use crate::error::EffectError;

/// Upper bound for the backing-buffer pixel ratio.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Dither strength, accepted either as a number or as an on/off flag.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dither {
    Enabled(bool),
    Amount(f32),
}

impl Dither {
    pub fn amount(self) -> f32 {
        match self {
            Dither::Enabled(true) => 1.0,
            Dither::Enabled(false) => 0.0,
            Dither::Amount(amount) => amount,
        }
    }
}

impl Default for Dither {
    fn default() -> Self {
        Dither::Amount(0.0)
    }
}

/// The visual knobs of the effect.
///
/// Values are forwarded to the shader as-is; nothing here is range checked
/// except the pixel ratio, which only sizes the backing buffer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParameterSet {
    pub scale: f32,
    pub grid_mul: [f32; 2],
    pub digit_size: f32,
    /// Multiplier applied to wall-clock seconds. Zero freezes the animation.
    pub time_scale: f64,
    pub pause: bool,
    pub scanline_intensity: f32,
    pub glitch_amount: f32,
    pub flicker_amount: f32,
    pub noise_amp: f32,
    pub chromatic_aberration: f32,
    pub dither: Dither,
    pub curvature: f32,
    /// Hex color such as `#84bd7d` or `abc`.
    pub tint: String,
    pub mouse_react: bool,
    pub mouse_strength: f32,
    #[serde(rename = "dpr")]
    pub pixel_ratio: f64,
    pub page_load_animation: bool,
    pub brightness: f32,
    /// Extra class name applied to the host element.
    pub style_class: Option<String>,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            scale: 1.2,
            grid_mul: [2.0, 1.0],
            digit_size: 1.5,
            time_scale: 0.8,
            pause: false,
            scanline_intensity: 0.3,
            glitch_amount: 1.0,
            flicker_amount: 1.0,
            noise_amp: 1.0,
            chromatic_aberration: 0.0,
            dither: Dither::default(),
            curvature: 0.2,
            tint: "#84bd7d".to_owned(),
            mouse_react: true,
            mouse_strength: 0.2,
            pixel_ratio: 1.0,
            page_load_animation: true,
            brightness: 1.0,
            style_class: None,
        }
    }
}

impl ParameterSet {
    /// Defaults with the pixel ratio taken from the display, capped.
    pub fn for_device(device_pixel_ratio: f64) -> Self {
        Self {
            pixel_ratio: clamp_pixel_ratio(device_pixel_ratio),
            ..Self::default()
        }
    }

    /// Parses a full parameter object; absent keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, EffectError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns a copy with the keys present in `patch` overwritten.
    pub fn merged(&self, patch: &str) -> Result<Self, EffectError> {
        let mut base = serde_json::to_value(self)?;
        let patch: Value = serde_json::from_str(patch)?;
        match (&mut base, patch) {
            (Value::Object(base), Value::Object(patch)) => base.extend(patch),
            _ => return Err(EffectError::ConfigShape),
        }
        Ok(serde_json::from_value(base)?)
    }

    pub fn effective_pixel_ratio(&self) -> f64 {
        clamp_pixel_ratio(self.pixel_ratio)
    }

    pub fn tint_rgb(&self) -> Rgb {
        color::hex_to_rgb(&self.tint)
    }
}

/// Caps a pixel ratio at [`MAX_PIXEL_RATIO`], mapping unusable values to 1.
pub fn clamp_pixel_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}
