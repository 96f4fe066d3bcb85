use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::vec3::Vec3;
use crate::error::ColorParseError;

/// An immutable RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color4 {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color4 {
    pub const TRANSPARENT: Self = Self::const_rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::const_rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::const_rgba(1.0, 1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::const_rgba(0.5, 0.5, 0.5, 1.0);
    pub const RED: Self = Self::const_rgba(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::const_rgba(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::const_rgba(0.0, 0.0, 1.0, 1.0);
    pub const YELLOW: Self = Self::const_rgba(1.0, 1.0, 0.0, 1.0);
    pub const PURPLE: Self = Self::const_rgba(0.5, 0.0, 0.5, 1.0);
    pub const CYAN: Self = Self::const_rgba(0.0, 1.0, 1.0, 1.0);
    pub const ORANGE: Self = Self::const_rgba(1.0, 0.647_058_823_529_411_8, 0.0, 1.0);

    const fn const_rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color; components are clamped to `[0, 1]`.
    #[must_use]
    pub fn of_rgb(r: f64, g: f64, b: f64) -> Self {
        Self::of_rgba(r, g, b, 1.0)
    }

    /// Components are clamped to `[0, 1]`.
    #[must_use]
    pub fn of_rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        let clamp = |v: f64| v.clamp(0.0, 1.0);
        Self {
            r: clamp(r),
            g: clamp(g),
            b: clamp(b),
            a: clamp(a),
        }
    }

    /// Opaque color from an `(r, g, b)` vector.
    #[must_use]
    pub fn from_rgb_vector(rgb: Vec3) -> Self {
        Self::of_rgb(rgb.x, rgb.y, rgb.z)
    }

    /// Parses `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`ColorParseError::InvalidHex`], wrapped in
    /// [`InkgeoError`](crate::InkgeoError), if the digits are malformed.
    pub fn from_hex(hex: &str) -> crate::Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex(hex.to_owned()).into());
        }

        let expanded: String = match digits.len() {
            3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_owned(),
            _ => return Err(ColorParseError::InvalidHex(hex.to_owned()).into()),
        };

        let mut components = expanded
            .as_bytes()
            .chunks(2)
            .map(|pair| {
                std::str::from_utf8(pair)
                    .ok()
                    .and_then(|s| u8::from_str_radix(s, 16).ok())
                    .map(|v| f64::from(v) / 255.0)
                    .ok_or_else(|| ColorParseError::InvalidHex(hex.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if components.len() == 3 {
            components.push(1.0);
        }
        Ok(Self::of_rgba(
            components[0],
            components[1],
            components[2],
            components[3],
        ))
    }

    /// Parses a hex color, `rgb(r, g, b)`, `rgba(r, g, b, a)`, `none`,
    /// `transparent`, or one of a few named colors.
    ///
    /// `rgb`/`rgba` channels are in `0..=255`; alpha is in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns a [`ColorParseError`], wrapped in [`InkgeoError`](crate::InkgeoError),
    /// if the text is not a supported color.
    pub fn from_string(text: &str) -> crate::Result<Self> {
        static FUNCTIONAL: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^(rgba?)\(([^)]*)\)$").unwrap_or_else(|_| unreachable!())
        });

        let text = text.trim();
        let lowercase = text.to_lowercase();
        if text.starts_with('#') {
            return Self::from_hex(text);
        }
        if let Some(captures) = FUNCTIONAL.captures(&lowercase) {
            let values = captures[2]
                .split(',')
                .map(|part| {
                    part.trim()
                        .parse::<f64>()
                        .map_err(|_| ColorParseError::InvalidComponent(part.trim().to_owned()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let color = match (&captures[1], values.as_slice()) {
                ("rgb", [r, g, b]) => Self::of_rgb(r / 255.0, g / 255.0, b / 255.0),
                ("rgba", [r, g, b, a]) => Self::of_rgba(r / 255.0, g / 255.0, b / 255.0, *a),
                _ => return Err(ColorParseError::InvalidComponent(text.to_owned()).into()),
            };
            debug!(text, "parsed functional color");
            return Ok(color);
        }

        match lowercase.as_str() {
            "none" | "transparent" => Ok(Self::TRANSPARENT),
            "black" => Ok(Self::BLACK),
            "white" => Ok(Self::WHITE),
            "gray" | "grey" => Ok(Self::GRAY),
            "red" => Ok(Self::RED),
            "green" => Ok(Self::of_rgb(0.0, 128.0 / 255.0, 0.0)),
            "lime" => Ok(Self::GREEN),
            "blue" => Ok(Self::BLUE),
            "yellow" => Ok(Self::YELLOW),
            "purple" => Ok(Self::PURPLE),
            "cyan" | "aqua" => Ok(Self::CYAN),
            "orange" => Ok(Self::ORANGE),
            _ => Err(ColorParseError::Unrecognized(text.to_owned()).into()),
        }
    }

    /// Formats as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let channel = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        let mut hex = format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        );
        if self.a < 1.0 {
            hex.push_str(&format!("{:02x}", channel(self.a)));
        }
        hex
    }

    /// Every component within `tolerance` of `other`'s.
    #[must_use]
    pub fn fuzzy_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.r - other.r).abs() <= tolerance
            && (self.g - other.g).abs() <= tolerance
            && (self.b - other.b).abs() <= tolerance
            && (self.a - other.a).abs() <= tolerance
    }

    /// Linear blend: `self` at `fraction == 0`, `other` at `fraction == 1`.
    #[must_use]
    pub fn mix(&self, other: &Self, fraction: f64) -> Self {
        let lerp = |a: f64, b: f64| a * (1.0 - fraction) + b * fraction;
        Self::of_rgba(
            lerp(self.r, other.r),
            lerp(self.g, other.g),
            lerp(self.b, other.b),
            lerp(self.a, other.a),
        )
    }

    /// Component-wise mean. An empty slice gives [`Color4::TRANSPARENT`].
    #[must_use]
    pub fn average(colors: &[Self]) -> Self {
        if colors.is_empty() {
            return Self::TRANSPARENT;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = colors.len() as f64;
        let sum = colors.iter().fold([0.0; 4], |acc, c| {
            [acc[0] + c.r, acc[1] + c.g, acc[2] + c.b, acc[3] + c.a]
        });
        Self::of_rgba(sum[0] / n, sum[1] / n, sum[2] / n, sum[3] / n)
    }

    /// The color channels as a vector (alpha dropped).
    #[must_use]
    pub fn rgb(&self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    #[must_use]
    pub fn with_alpha(&self, alpha: f64) -> Self {
        Self::of_rgba(self.r, self.g, self.b, alpha)
    }

    /// Hue (radians, `[0, 2π)`), saturation and value, each as a vector component.
    #[must_use]
    pub fn to_hsv(&self) -> Vec3 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let chroma = max - min;
        let value = max;
        let saturation = if max > 0.0 { chroma / max } else { 0.0 };

        let hue_sixths = if chroma == 0.0 {
            0.0
        } else if max == self.r {
            ((self.g - self.b) / chroma).rem_euclid(6.0)
        } else if max == self.g {
            (self.b - self.r) / chroma + 2.0
        } else {
            (self.r - self.g) / chroma + 4.0
        };
        let hue = hue_sixths * std::f64::consts::PI / 3.0;
        Vec3::new(hue, saturation, value)
    }

    /// Inverse of [`Color4::to_hsv`]; the result is opaque.
    #[must_use]
    pub fn from_hsv(hue: f64, saturation: f64, value: f64) -> Self {
        let chroma = value * saturation;
        let hue_sixths = hue.rem_euclid(std::f64::consts::TAU) * 3.0 / std::f64::consts::PI;
        let second = chroma * (1.0 - ((hue_sixths % 2.0) - 1.0).abs());
        let (r, g, b) = match hue_sixths {
            h if h < 1.0 => (chroma, second, 0.0),
            h if h < 2.0 => (second, chroma, 0.0),
            h if h < 3.0 => (0.0, chroma, second),
            h if h < 4.0 => (0.0, second, chroma),
            h if h < 5.0 => (second, 0.0, chroma),
            _ => (chroma, 0.0, second),
        };
        let m = value - chroma;
        Self::of_rgb(r + m, g + m, b + m)
    }
}

impl FromStr for Color4 {
    type Err = crate::InkgeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl fmt::Display for Color4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}
