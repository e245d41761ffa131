//! Color and font resource loading.
//!
//! Colors degrade: an unparsable color logs a warning and resolves to black
//! so the launcher still starts. Fonts do not: the terminal can only render
//! its own cell font, so a descriptor naming anything other than a cell
//! family is a fatal startup error.
//!
//! Accepted color forms:
//! * `#rgb`, `#rrggbb`, `#rrrgggbbb`, `#rrrrggggbbbb` (most significant bits)
//! * `rgb:r/g/b` with 1-4 hex digits per channel (scaled to full range)
//! * a small table of X11 color names (case and spaces ignored)
//!
//! Font descriptors follow the fontconfig pattern shape
//! `family[,family...][-size][:key=value...]`.

use crate::error::ResourceError;
use crossterm::style::Color;
use tracing::{debug, warn};

pub const BLACK: Color = Color::Rgb { r: 0, g: 0, b: 0 };

const CELL_FAMILIES: &[&str] = &["monospace", "mono", "fixed", "terminal"];

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("blue", (0, 0, 255)),
    ("brown", (165, 42, 42)),
    ("cyan", (0, 255, 255)),
    ("darkgray", (169, 169, 169)),
    ("darkgrey", (169, 169, 169)),
    ("gray", (190, 190, 190)),
    ("green", (0, 255, 0)),
    ("grey", (190, 190, 190)),
    ("lightgray", (211, 211, 211)),
    ("lightgrey", (211, 211, 211)),
    ("magenta", (255, 0, 255)),
    ("maroon", (176, 48, 96)),
    ("navy", (0, 0, 128)),
    ("orange", (255, 165, 0)),
    ("pink", (255, 192, 203)),
    ("purple", (160, 32, 240)),
    ("red", (255, 0, 0)),
    ("white", (255, 255, 255)),
    ("yellow", (255, 255, 0)),
];

/// Resolved background / foreground pair. The foreground also paints the
/// window border and the cursor bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
}

impl Palette {
    pub fn resolve(background: &str, foreground: &str) -> Self {
        Self {
            background: resolve_color(background),
            foreground: resolve_color(foreground),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: BLACK,
            foreground: Color::Rgb {
                r: 255,
                g: 255,
                b: 255,
            },
        }
    }
}

/// Resolve a color name, substituting black (with a warning) on failure.
pub fn resolve_color(name: &str) -> Color {
    match parse_color(name) {
        Some((r, g, b)) => Color::Rgb { r, g, b },
        None => {
            warn!(target: "resources", color = name, "invalid color, using black");
            BLACK
        }
    }
}

/// Parse a color specification into 8-bit RGB.
pub fn parse_color(spec: &str) -> Option<(u8, u8, u8)> {
    let spec = spec.trim();
    if let Some(hex) = spec.strip_prefix('#') {
        return parse_sharp(hex);
    }
    if let Some(rest) = spec.strip_prefix("rgb:") {
        return parse_rgb_device(rest);
    }
    let key: String = spec
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    NAMED_COLORS
        .binary_search_by(|(n, _)| n.cmp(&key.as_str()))
        .ok()
        .map(|idx| NAMED_COLORS[idx].1)
}

fn parse_sharp(hex: &str) -> Option<(u8, u8, u8)> {
    if hex.is_empty() || hex.len() % 3 != 0 || hex.len() > 12 {
        return None;
    }
    let digits = hex.len() / 3;
    let channel = |i: usize| -> Option<u8> {
        let v = u16::from_str_radix(hex.get(i * digits..(i + 1) * digits)?, 16).ok()?;
        // Keep the most significant 8 bits of a `digits * 4` bit value.
        let bits = digits as u32 * 4;
        Some(if bits >= 8 {
            (v >> (bits - 8)) as u8
        } else {
            (v << (8 - bits)) as u8
        })
    };
    Some((channel(0)?, channel(1)?, channel(2)?))
}

fn parse_rgb_device(rest: &str) -> Option<(u8, u8, u8)> {
    let mut parts = rest.split('/');
    let mut channel = || -> Option<u8> {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 4 {
            return None;
        }
        let v = u32::from_str_radix(part, 16).ok()?;
        let max = (1u32 << (part.len() as u32 * 4)) - 1;
        Some(((v * 255 + max / 2) / max) as u8)
    };
    let rgb = (channel()?, channel()?, channel()?);
    if parts.next().is_some() {
        return None;
    }
    Some(rgb)
}

/// A loaded cell font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontHandle {
    pub name: String,
    pub family: String,
    /// Requested point size; the terminal renders at its own size, this is
    /// retained for diagnostics.
    pub size: Option<f32>,
    /// East Asian ambiguous-width characters occupy two cells.
    pub ambiguous_wide: bool,
}

/// Load the font described by `name`.
pub fn load_font(name: &str) -> Result<FontHandle, ResourceError> {
    let (head, props) = match name.split_once(':') {
        Some((head, props)) => (head.trim(), Some(props)),
        None => (name.trim(), None),
    };

    let mut size = None;
    let (families, size_suffix) = match head.rsplit_once('-') {
        Some((fams, suffix)) if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit() || c == '.') => {
            (fams, Some(suffix))
        }
        _ => (head, None),
    };
    if let Some(raw) = size_suffix {
        size = Some(parse_size(name, raw)?);
    }

    let family = families
        .split(',')
        .map(|f| f.trim().to_ascii_lowercase())
        .find(|f| CELL_FAMILIES.contains(&f.as_str()))
        .ok_or_else(|| ResourceError::FontUnavailable(name.to_string()))?;

    let mut ambiguous_wide = false;
    for prop in props.into_iter().flat_map(|p| p.split(':')) {
        let prop = prop.trim();
        if prop.is_empty() {
            continue;
        }
        match prop.split_once('=') {
            Some(("size" | "pixelsize", raw)) => size = Some(parse_size(name, raw.trim())?),
            Some(("ambiguous", v)) => ambiguous_wide = v.trim().eq_ignore_ascii_case("wide"),
            _ => debug!(target: "resources", property = prop, "font_property_ignored"),
        }
    }

    Ok(FontHandle {
        name: name.to_string(),
        family,
        size,
        ambiguous_wide,
    })
}

fn parse_size(name: &str, raw: &str) -> Result<f32, ResourceError> {
    match raw.parse::<f32>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ResourceError::InvalidFontSize {
            name: name.to_string(),
            size: raw.to_string(),
        }),
    }
}
