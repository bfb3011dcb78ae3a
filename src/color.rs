//! Ring color parsing.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;

use crate::error::{IconError, Result};

/// Maximum number of ring colors accepted in one request.
pub const MAX_COLORS: usize = 20;

/// Fill color used for the disk when no source image is given (`#ee4e04`).
pub const FALLBACK_FILL: ParsedColor = ParsedColor::new(0xee, 0x4e, 0x04);

/// An opaque 8-bit sRGB color parsed from `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ParsedColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl From<Srgb<u8>> for ParsedColor {
    fn from(rgb: Srgb<u8>) -> Self {
        Self::new(rgb.red, rgb.green, rgb.blue)
    }
}

impl From<ParsedColor> for Srgb<u8> {
    fn from(color: ParsedColor) -> Self {
        Srgb::new(color.red, color.green, color.blue)
    }
}

impl fmt::Display for ParsedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ParsedColor {
    type Err = IconError;

    /// Accepts exactly `#` followed by six hex digits, in either case.
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(IconError::InvalidColor("color must not be empty".into()));
        }
        let well_formed = s.len() == 7
            && s.starts_with('#')
            && s[1..].bytes().all(|b| b.is_ascii_hexdigit());
        if !well_formed {
            return Err(IconError::InvalidColor(format!(
                "'{s}' is not in #RRGGBB format"
            )));
        }
        let rgb = Srgb::<u8>::from_str(s)
            .map_err(|e| IconError::InvalidColor(format!("'{s}': {e}")))?;
        Ok(rgb.into())
    }
}

/// Parses an ordered list of ring colors.
///
/// Fails on more than [`MAX_COLORS`] entries or on the first malformed entry.
pub fn parse_colors<S: AsRef<str>>(colors: &[S]) -> Result<Vec<ParsedColor>> {
    if colors.len() > MAX_COLORS {
        return Err(IconError::InvalidColor(format!(
            "at most {MAX_COLORS} colors are allowed, got {}",
            colors.len()
        )));
    }
    colors.iter().map(|c| c.as_ref().parse()).collect()
}
