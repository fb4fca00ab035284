use serde::{Deserialize, Serialize};

/// 8-bit straight-alpha color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha replaced by `alpha` in `[0, 1]`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    /// Relative luminance in `[0, 1]` (Rec. 709 weights, no gamma).
    pub fn luminance(self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
pub fn parse_hex_color(val: &str) -> Option<Rgba> {
    let hex = val.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let mut it = hex.chars().filter_map(|c| c.to_digit(16)).map(|d| (d * 17) as u8);
            Some(Rgba::rgb(it.next()?, it.next()?, it.next()?))
        }
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_hex_color(&value).ok_or_else(|| format!("invalid color '{}'", value))
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_hex()
    }
}
