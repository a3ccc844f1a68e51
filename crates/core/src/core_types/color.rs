//! RGBA color type, hex token decoding and gradient interpolation.

use std::fmt;
use std::num::ParseIntError;

use serde::{Deserialize, Serialize};

/// 8-bit per channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

const fn opaque() -> u8 {
    u8::MAX
}

/// Largest value decoded as `RRGGBB`; anything above is `RRGGBBAA`.
const RGB_MAX: u32 = 0x00FF_FFFF;

impl Rgba {
    /// Opaque white, the default point color.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque black, the default background.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Decode a packed value.
    ///
    /// Values above `0xFFFFFF` carry an alpha byte in the low 8 bits
    /// (`RRGGBBAA`). Smaller values are `RRGGBB` and get alpha 0.
    pub const fn from_packed(value: u32) -> Self {
        if value > RGB_MAX {
            Self::new(
                (value >> 24) as u8,
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            )
        } else {
            Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8, 0)
        }
    }

    /// Parse a map color token such as `0xFF0000` or `FF0000FF`.
    ///
    /// Only a lowercase `0x` prefix is stripped, and the digits must be
    /// unsigned hex.
    ///
    /// # Errors
    /// Returns [`ColorError`] when the token is not a 32-bit hex number.
    pub fn from_hex(token: &str) -> Result<Self, ColorError> {
        let digits = token.strip_prefix("0x").unwrap_or(token);
        // from_str_radix takes a leading sign, map tokens do not.
        if digits.starts_with('+') {
            return Err(ColorError {
                token: token.to_string(),
                source: None,
            });
        }
        let value = u32::from_str_radix(digits, 16).map_err(|source| ColorError {
            token: token.to_string(),
            source: Some(source),
        })?;
        Ok(Self::from_packed(value))
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Linear blend from `self` (t = 0) to `other` (t = 1), per channel,
    /// rounded to nearest and clamped to the channel range.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: u8, b: u8| -> u8 {
            let v = f64::from(a) * (1.0 - t) + f64::from(b) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.r, self.g, self.b, self.a
        )
    }
}

/// A color token that is not valid hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorError {
    pub token: String,
    source: Option<ParseIntError>,
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "invalid hex color {:?}: {source}", self.token),
            None => write!(f, "invalid hex color {:?}: unexpected sign", self.token),
        }
    }
}

impl std::error::Error for ColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}
