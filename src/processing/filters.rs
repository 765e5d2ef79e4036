//! CSS-style color filters for the screenshot editor.
//!
//! Supports the filter functions used by the editor presets, evaluated with
//! the color matrices from the W3C Filter Effects specification. Every
//! function clamps its result to `[0, 1]` before the next one runs, and alpha
//! is never touched.

use image::RgbaImage;
use serde::Serialize;

use crate::utils::ValidationError;

/// A named filter preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterPreset {
    /// Display name, e.g. "High Contrast"
    pub name: &'static str,
    /// CSS filter value, e.g. "contrast(1.35)"
    pub value: &'static str,
}

pub const FILTER_PRESETS: [FilterPreset; 8] = [
    FilterPreset { name: "Original", value: "none" },
    FilterPreset { name: "Mono", value: "grayscale(100%)" },
    FilterPreset { name: "Warm", value: "sepia(80%) saturate(120%)" },
    FilterPreset { name: "High Contrast", value: "contrast(1.35)" },
    FilterPreset { name: "Bright", value: "brightness(1.15)" },
    FilterPreset { name: "Cool", value: "hue-rotate(165deg) saturate(120%)" },
    FilterPreset { name: "Film", value: "contrast(1.15) sepia(28%)" },
    FilterPreset { name: "Invert", value: "invert(100%)" },
];

/// Looks up a preset by display name, ignoring case, spaces, `-` and `_`.
pub fn find_preset(name: &str) -> Option<&'static FilterPreset> {
    let key = preset_key(name);
    FILTER_PRESETS.iter().find(|p| preset_key(p.name) == key)
}

fn preset_key(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(*c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// One filter function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    Grayscale(f32),
    Sepia(f32),
    Saturate(f32),
    /// Angle in degrees
    HueRotate(f32),
    Contrast(f32),
    Brightness(f32),
    Invert(f32),
}

impl FilterOp {
    fn parse(name: &str, arg: &str) -> Option<Self> {
        let op = match name {
            "grayscale" => Self::Grayscale(parse_amount(arg)?.min(1.0)),
            "sepia" => Self::Sepia(parse_amount(arg)?.min(1.0)),
            "invert" => Self::Invert(parse_amount(arg)?.min(1.0)),
            "saturate" => Self::Saturate(parse_amount(arg)?),
            "contrast" => Self::Contrast(parse_amount(arg)?),
            "brightness" => Self::Brightness(parse_amount(arg)?),
            "hue-rotate" => Self::HueRotate(parse_angle(arg)?),
            _ => return None,
        };
        Some(op)
    }

    /// Linear color matrix for the matrix-based functions.
    fn matrix(&self) -> Option<[f32; 9]> {
        let m = match *self {
            Self::Grayscale(a) => {
                let g = 1.0 - a;
                [
                    0.2126 + 0.7874 * g, 0.7152 - 0.7152 * g, 0.0722 - 0.0722 * g,
                    0.2126 - 0.2126 * g, 0.7152 + 0.2848 * g, 0.0722 - 0.0722 * g,
                    0.2126 - 0.2126 * g, 0.7152 - 0.7152 * g, 0.0722 + 0.9278 * g,
                ]
            }
            Self::Sepia(a) => {
                let s = 1.0 - a;
                [
                    0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s,
                    0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s,
                    0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s,
                ]
            }
            Self::Saturate(s) => [
                0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s,
                0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s,
                0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s,
            ],
            Self::HueRotate(deg) => {
                let (sin, cos) = deg.to_radians().sin_cos();
                [
                    0.213 + cos * 0.787 - sin * 0.213,
                    0.715 - cos * 0.715 - sin * 0.715,
                    0.072 - cos * 0.072 + sin * 0.928,
                    0.213 - cos * 0.213 + sin * 0.143,
                    0.715 + cos * 0.285 + sin * 0.140,
                    0.072 - cos * 0.072 - sin * 0.283,
                    0.213 - cos * 0.213 - sin * 0.787,
                    0.715 - cos * 0.715 + sin * 0.715,
                    0.072 + cos * 0.928 + sin * 0.072,
                ]
            }
            _ => return None,
        };
        Some(m)
    }

    /// Applies the function to one normalized RGB triple.
    fn apply(&self, [r, g, b]: [f32; 3]) -> [f32; 3] {
        let out = if let Some(m) = self.matrix() {
            [
                m[0] * r + m[1] * g + m[2] * b,
                m[3] * r + m[4] * g + m[5] * b,
                m[6] * r + m[7] * g + m[8] * b,
            ]
        } else {
            match *self {
                Self::Contrast(c) => [r, g, b].map(|v| (v - 0.5) * c + 0.5),
                Self::Brightness(k) => [r, g, b].map(|v| v * k),
                Self::Invert(a) => [r, g, b].map(|v| v * (1.0 - a) + (1.0 - v) * a),
                _ => [r, g, b],
            }
        };
        out.map(|v| v.clamp(0.0, 1.0))
    }
}

/// Parses `50%`, `0.5`, or an empty argument (which means 1).
fn parse_amount(arg: &str) -> Option<f32> {
    if arg.is_empty() {
        return Some(1.0);
    }
    let value = match arg.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f32>().ok()? / 100.0,
        None => arg.parse::<f32>().ok()?,
    };
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Parses an angle into degrees. A bare `0` or empty argument is allowed.
fn parse_angle(arg: &str) -> Option<f32> {
    if arg.is_empty() {
        return Some(0.0);
    }
    let (number, scale) = if let Some(v) = arg.strip_suffix("deg") {
        (v, 1.0)
    } else if let Some(v) = arg.strip_suffix("grad") {
        (v, 0.9)
    } else if let Some(v) = arg.strip_suffix("rad") {
        (v, 180.0 / std::f32::consts::PI)
    } else if let Some(v) = arg.strip_suffix("turn") {
        (v, 360.0)
    } else if arg.trim() == "0" {
        ("0", 1.0)
    } else {
        return None;
    };
    let value = number.trim().parse::<f32>().ok()? * scale;
    value.is_finite().then_some(value)
}

/// An ordered list of filter functions, e.g. `sepia(80%) saturate(120%)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChain {
    ops: Vec<FilterOp>,
    source: String,
}

impl FilterChain {
    /// The identity filter.
    pub fn none() -> Self {
        Self { ops: Vec::new(), source: "none".to_string() }
    }

    /// Parses a CSS filter value. `none` and the empty string are the identity.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let source = value.trim();
        if source.is_empty() || source.eq_ignore_ascii_case("none") {
            return Ok(Self::none());
        }

        let lower = source.to_ascii_lowercase();
        let mut ops = Vec::new();
        let mut rest = lower.trim_start();

        while !rest.is_empty() {
            let open = rest.find('(').ok_or_else(|| ValidationError::filter(source))?;
            let close = rest.find(')').ok_or_else(|| ValidationError::filter(source))?;
            if close < open {
                return Err(ValidationError::filter(source));
            }

            let name = rest[..open].trim();
            let arg = rest[open + 1..close].trim();
            let op = FilterOp::parse(name, arg).ok_or_else(|| ValidationError::filter(source))?;
            ops.push(op);

            rest = rest[close + 1..].trim_start();
        }

        Ok(Self { ops, source: source.to_string() })
    }

    /// Resolves a preset display name or a raw CSS filter value.
    pub fn resolve(input: &str) -> Result<Self, ValidationError> {
        match find_preset(input) {
            Some(preset) => Self::parse(preset.value),
            None => Self::parse(input),
        }
    }

    pub fn is_none(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    /// The CSS text this chain was parsed from.
    pub fn as_css(&self) -> &str {
        &self.source
    }

    /// Runs the chain over one 8-bit pixel's color channels.
    pub fn apply_rgb(&self, rgb: [u8; 3]) -> [u8; 3] {
        let mut color = rgb.map(|v| v as f32 / 255.0);
        for op in &self.ops {
            color = op.apply(color);
        }
        color.map(|v| (v * 255.0).round() as u8)
    }

    /// Filters `image` in place.
    pub fn apply(&self, image: &mut RgbaImage) {
        if self.is_none() {
            return;
        }
        for px in image.pixels_mut() {
            let [r, g, b] = self.apply_rgb([px[0], px[1], px[2]]);
            px[0] = r;
            px[1] = g;
            px[2] = b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_parses() {
        for preset in FILTER_PRESETS {
            let chain = FilterChain::parse(preset.value).unwrap();
            assert_eq!(chain.is_none(), preset.value == "none", "{}", preset.name);
        }
        assert_eq!(FilterChain::parse("sepia(80%) saturate(120%)").unwrap().ops().len(), 2);
    }

    #[test]
    fn presets_resolve_by_name_or_value() {
        let by_name = FilterChain::resolve("high-contrast").unwrap();
        assert_eq!(by_name.ops(), &[FilterOp::Contrast(1.35)]);
        assert_eq!(by_name.as_css(), "contrast(1.35)");

        let by_value = FilterChain::resolve("contrast(1.35)").unwrap();
        assert_eq!(by_value.ops(), by_name.ops());

        assert!(FilterChain::resolve("Original").unwrap().is_none());
        assert!(FilterChain::resolve("").unwrap().is_none());
    }

    #[test]
    fn malformed_filters_are_rejected() {
        assert!(FilterChain::parse("blur(2px)").is_err());
        assert!(FilterChain::parse("contrast(").is_err());
        assert!(FilterChain::parse("contrast(-1)").is_err());
        assert!(FilterChain::parse("hue-rotate(90)").is_err());
        assert!(FilterChain::parse("sepia)50%(").is_err());
    }

    #[test]
    fn units_are_normalized() {
        let chain = FilterChain::parse("hue-rotate(0.5turn) grayscale(250%) invert()").unwrap();
        assert_eq!(
            chain.ops(),
            &[FilterOp::HueRotate(180.0), FilterOp::Grayscale(1.0), FilterOp::Invert(1.0)]
        );
    }

    #[test]
    fn grayscale_equalizes_channels() {
        let chain = FilterChain::parse("grayscale(100%)").unwrap();
        let [r, g, b] = chain.apply_rgb([255, 0, 0]);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(r, 54); // 0.2126 * 255
    }

    #[test]
    fn invert_and_brightness() {
        let invert = FilterChain::parse("invert(100%)").unwrap();
        assert_eq!(invert.apply_rgb([0, 128, 255]), [255, 127, 0]);

        let bright = FilterChain::parse("brightness(2)").unwrap();
        assert_eq!(bright.apply_rgb([100, 200, 0]), [200, 255, 0]);
    }

    #[test]
    fn contrast_pivots_on_mid_gray() {
        let chain = FilterChain::parse("contrast(1.35)").unwrap();
        let [mid, _, _] = chain.apply_rgb([128, 128, 128]);
        assert!((127..=129).contains(&mid));
        let [dark, _, _] = chain.apply_rgb([20, 20, 20]);
        assert!(dark < 20);
    }

    #[test]
    fn alpha_is_untouched() {
        let mut img = RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 77]));
        FilterChain::parse("invert(100%)").unwrap().apply(&mut img);
        assert_eq!(img.get_pixel(1, 1).0, [245, 235, 225, 77]);
    }
}
