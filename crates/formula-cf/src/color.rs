use core::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An ARGB color.
///
/// Serialized as a `#AARRGGBB` hex string for IPC friendliness.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub argb: u32,
}

impl Color {
    pub const fn new_argb(argb: u32) -> Self {
        Self { argb }
    }

    /// Opaque color from a `0xRRGGBB` triple.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self {
            argb: 0xFF00_0000 | (rgb & 0x00FF_FFFF),
        }
    }

    pub const fn black() -> Self {
        Self { argb: 0xFF000000 }
    }

    /// Parse `RRGGBB` (opaque) or `AARRGGBB` hex, with an optional leading `#`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        let value = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            6 => Some(Self::from_rgb(value)),
            8 => Some(Self::new_argb(value)),
            _ => None,
        }
    }

    /// `AARRGGBB` as written into SpreadsheetML `rgb` attributes.
    pub fn to_argb_hex(self) -> String {
        format!("{:08X}", self.argb)
    }

    /// `RRGGBB` without the alpha channel.
    pub fn to_rgb_hex(self) -> String {
        format!("{:06X}", self.argb & 0x00FF_FFFF)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_argb_hex())
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.trim();
        let hex = s.strip_prefix('#').ok_or_else(|| {
            D::Error::custom("color must be a #AARRGGBB hex string (missing '#')")
        })?;
        if hex.len() != 8 {
            return Err(D::Error::custom(
                "color must be a #AARRGGBB hex string (8 hex digits)",
            ));
        }
        let argb = u32::from_str_radix(hex, 16).map_err(|_| D::Error::custom("invalid hex"))?;
        Ok(Color { argb })
    }
}

/// A color used by color scales and data bars: either a literal ARGB value or a
/// theme palette slot with a lightening/darkening tint.
///
/// Deserialization goes through [`ColorRef::theme`], so tints always land in range.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", from = "RawColorRef")]
pub enum ColorRef {
    Literal { color: Color },
    Theme { index: u32, tint: f64 },
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum RawColorRef {
    Literal {
        color: Color,
    },
    Theme {
        index: u32,
        #[serde(default)]
        tint: f64,
    },
}

impl From<RawColorRef> for ColorRef {
    fn from(raw: RawColorRef) -> Self {
        match raw {
            RawColorRef::Literal { color } => ColorRef::Literal { color },
            RawColorRef::Theme { index, tint } => ColorRef::theme(index, tint),
        }
    }
}

impl ColorRef {
    pub const fn literal(color: Color) -> Self {
        ColorRef::Literal { color }
    }

    pub const fn rgb(rgb: u32) -> Self {
        ColorRef::Literal {
            color: Color::from_rgb(rgb),
        }
    }

    /// Theme color reference. `tint` is clamped to `[-1.0, 1.0]`; NaN becomes `0.0`.
    pub fn theme(index: u32, tint: f64) -> Self {
        ColorRef::Theme {
            index,
            tint: clamp_tint(tint),
        }
    }

    pub fn is_theme(&self) -> bool {
        matches!(self, ColorRef::Theme { .. })
    }

    /// The tint to write out, or `None` when it should be omitted.
    ///
    /// The tint is clamped to `[-1.0, 1.0]` first, for values built without
    /// [`ColorRef::theme`]. A tint of exactly `0.0` is never written, so an explicit zero
    /// tint and a missing tint read back identically.
    pub fn exported_tint(&self) -> Option<f64> {
        match *self {
            ColorRef::Theme { tint, .. } => Some(clamp_tint(tint)).filter(|t| *t != 0.0),
            ColorRef::Literal { .. } => None,
        }
    }
}

impl From<Color> for ColorRef {
    fn from(color: Color) -> Self {
        ColorRef::Literal { color }
    }
}

pub fn clamp_tint(tint: f64) -> f64 {
    if tint.is_nan() {
        return 0.0;
    }
    tint.clamp(-1.0, 1.0)
}
