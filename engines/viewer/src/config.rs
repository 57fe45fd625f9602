//! Deserializable viewer settings.
//!
//! Every field has a default, so an empty JSON object (or a missing file)
//! yields a fully usable configuration.

use glam::Vec4;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color `{input}` (expected `#RRGGBB`)")]
pub struct ColorParseError {
    input: String,
}

/// An sRGB color parsed from a `#RRGGBB` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color {
    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: f32::from(red) / 255.0,
            green: f32::from(green) / 255.0,
            blue: f32::from(blue) / 255.0,
        }
    }

    /// Opaque homogeneous form for uniform buffers.
    #[must_use]
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.red, self.green, self.blue, 1.0)
    }

    /// Opaque clear color for a render pass.
    #[must_use]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: f64::from(self.red),
            g: f64::from(self.green),
            b: f64::from(self.blue),
            a: 1.0,
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let error = || ColorParseError {
            input: source.to_owned(),
        };
        let digits = source.strip_prefix('#').ok_or_else(error)?;
        if digits.len() != 6 {
            return Err(error());
        }
        let channel = |range: std::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(error)
        };
        Ok(Self::from_rgb8(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
        ))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "channels are in [0, 1]")]
        let byte = |channel: f32| (channel * 255.0).round() as u8;
        write!(
            formatter,
            "#{:02X}{:02X}{:02X}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Settings shared by both viewer scenes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// How far parts travel when fully exploded, in model units.
    pub explode_distance: f32,
    /// Duration of a full explode or implode transition.
    pub animation_duration_ms: u64,
    /// Idle rotation when the user is not interacting.
    pub auto_rotate: bool,
    /// Ordered dithering in the fragment shader. When off, surfaces are
    /// shaded with the accent color only.
    pub dithering: bool,
    /// Dither pattern scale in pixels.
    pub dither_scale: f32,
    pub background: Color,
    /// Accent color of lit surfaces.
    pub color_accent: Color,
    /// Shadow color of dark surfaces.
    pub color_shadow: Color,
    /// Highlight color of the brightest surfaces.
    pub color_highlight: Color,
}

impl ViewerConfig {
    #[must_use]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            explode_distance: 2.0,
            animation_duration_ms: 2000,
            auto_rotate: true,
            dithering: true,
            dither_scale: 8.0,
            background: Color::from_rgb8(0x0A, 0x0A, 0x0A),
            color_accent: Color::from_rgb8(0xE6, 0x39, 0x46),
            color_shadow: Color::from_rgb8(0x0A, 0x0A, 0x0A),
            color_highlight: Color::from_rgb8(0xF5, 0xF5, 0xF0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_case_insensitively() {
        let upper: Color = "#E63946".parse().unwrap();
        let lower: Color = "#e63946".parse().unwrap();
        assert_eq!(upper, lower);
        assert!((upper.red - 230.0 / 255.0).abs() < 1e-6);
        assert_eq!(upper.to_string(), "#E63946");
    }

    #[test]
    fn malformed_colors_are_rejected() {
        assert!("E63946".parse::<Color>().is_err());
        assert!("#E639".parse::<Color>().is_err());
        assert!("#E63946FF".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
    }

    #[test]
    fn empty_object_yields_the_defaults() {
        let config: ViewerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.explode_distance, 2.0);
        assert_eq!(config.animation_duration(), Duration::from_secs(2));
        assert!(config.auto_rotate);
        assert!(config.dithering);
        assert_eq!(config.background, Color::from_rgb8(0x0A, 0x0A, 0x0A));
    }

    #[test]
    fn fields_override_individually() {
        let config: ViewerConfig =
            serde_json::from_str(r##"{"explode_distance": 3.5, "background": "#112233"}"##)
                .unwrap();
        assert_eq!(config.explode_distance, 3.5);
        assert_eq!(config.background, Color::from_rgb8(0x11, 0x22, 0x33));
        assert!(config.dithering);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<ViewerConfig>(r#"{"explode_dist": 3.5}"#).is_err());
    }
}
