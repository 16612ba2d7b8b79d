use std::fmt;
use std::str::FromStr;

use crate::error::IconError;

/// Share of the edge reserved as safe-zone padding on each side of a maskable icon.
pub const MASKABLE_PADDING_RATIO: f64 = 0.1;

/// Sources below this edge length still work but upscale visibly.
pub const MIN_RECOMMENDED_SOURCE: u32 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSpec {
    pub size: u32,
    pub name: &'static str,
    pub maskable: bool,
}

impl IconSpec {
    pub const fn plain(size: u32, name: &'static str) -> Self {
        Self { size, name, maskable: false }
    }

    pub const fn maskable(size: u32, name: &'static str) -> Self {
        Self { size, name, maskable: true }
    }

    /// `"192x192"`, the form used by manifest `sizes` fields.
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.size, self.size)
    }
}

/// The icon set a web app manifest expects, in generation order.
pub const ICON_SPECS: [IconSpec; 9] = [
    IconSpec::plain(72, "icon-72x72.png"),
    IconSpec::plain(96, "icon-96x96.png"),
    IconSpec::plain(128, "icon-128x128.png"),
    IconSpec::plain(144, "icon-144x144.png"),
    IconSpec::plain(152, "icon-152x152.png"),
    IconSpec::plain(192, "icon-192x192.png"),
    IconSpec::plain(384, "icon-384x384.png"),
    IconSpec::plain(512, "icon-512x512.png"),
    IconSpec::maskable(512, "maskable-icon-512x512.png"),
];

/// Opaque fill behind the inset logo of maskable icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BackgroundColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

impl Default for BackgroundColor {
    // #1e4620, the dark green of the logo
    fn default() -> Self {
        Self::new(0x1e, 0x46, 0x20)
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for BackgroundColor {
    type Err = IconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || IconError::InvalidColor(s.trim().to_string());
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}
