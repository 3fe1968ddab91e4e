//! Color resolution: direct RGB, legacy indexed palette, theme slot + tint.
//!
//! Every path is total. Malformed hex, out-of-range indices and theme slots
//! missing from the table all resolve to `None`; nothing here can fail a cell.

use sheetprint_model::ColorRef;

// =============================================================================
// Indexed color palette (legacy 64 entries, AARRGGBB)
// =============================================================================

/// Legacy indexed palette. Indices 64 and 65 (system foreground/background)
/// are deliberately absent and resolve to nothing.
pub const INDEXED_PALETTE: [&str; 64] = [
    "00000000", "00FFFFFF", "00FF0000", "0000FF00", "000000FF", // 0-4
    "00FFFF00", "00FF00FF", "0000FFFF", "00000000", "00FFFFFF", // 5-9
    "00FF0000", "0000FF00", "000000FF", "00FFFF00", "00FF00FF", // 10-14
    "0000FFFF", "00800000", "00008000", "00000080", "00808000", // 15-19
    "00800080", "00008080", "00C0C0C0", "00808080", "009999FF", // 20-24
    "00993366", "00FFFFCC", "00CCFFFF", "00660066", "00FF8080", // 25-29
    "000066CC", "00CCCCFF", "00000080", "00FF00FF", "00FFFF00", // 30-34
    "0000FFFF", "00800080", "00800000", "00008080", "000000FF", // 35-39
    "0000CCFF", "00CCFFFF", "00CCFFCC", "00FFFF99", "0099CCFF", // 40-44
    "00FF99CC", "00CC99FF", "00FFCC99", "003366FF", "0033CCCC", // 45-49
    "0099CC00", "00FFCC00", "00FF9900", "00FF6600", "00666699", // 50-54
    "00969696", "00003366", "00339966", "00003300", "00333300", // 55-59
    "00993300", "00993333", "00333399", "00333333", // 60-63
];

// =============================================================================
// Theme color table
// =============================================================================

/// Theme palette resolved to `#RRGGBB`, indexed by theme slot (0-11).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThemeColorTable {
    colors: [Option<String>; 12],
}

impl ThemeColorTable {
    /// Build from `(slot, #RRGGBB)` pairs; out-of-range slots are ignored.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (usize, S)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (slot, hex) in entries {
            if let Some(entry) = table.colors.get_mut(slot) {
                *entry = Some(hex.into());
            }
        }
        table
    }

    pub fn get(&self, slot: u32) -> Option<&str> {
        self.colors.get(slot as usize)?.as_deref()
    }

    pub fn len(&self) -> usize {
        self.colors.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Normalize 6 or 8 hex digits to `#RRGGBB`. The 8-digit form carries a
/// leading alpha pair, which is dropped.
pub fn normalize_hex(s: &str) -> Option<String> {
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digits = match s.len() {
        8 => &s[2..],
        6 => s,
        _ => return None,
    };
    Some(format!("#{}", digits.to_ascii_uppercase()))
}

fn parse_rgb(hex: &str) -> Option<[u8; 3]> {
    let s = hex.strip_prefix('#').unwrap_or(hex);
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some([r, g, b])
}

/// Apply an office-theme tint to a `#RRGGBB` color.
///
/// Negative tints scale each channel toward black, positive tints blend it
/// toward white. `None`, `0` and non-finite tints return the base unchanged;
/// tints outside [-1, 1] are clamped. Channels round half-to-even.
pub fn apply_tint(base: &str, tint: Option<f64>) -> String {
    let tint = match tint {
        Some(t) if t.is_finite() && t != 0.0 => t.clamp(-1.0, 1.0),
        _ => return base.to_string(),
    };
    let Some(rgb) = parse_rgb(base) else {
        return base.to_string();
    };

    let adjust = |channel: u8| -> u8 {
        let c = f64::from(channel);
        let v = if tint < 0.0 {
            c * (1.0 + tint)
        } else {
            c * (1.0 - tint) + 255.0 * tint
        };
        v.round_ties_even().clamp(0.0, 255.0) as u8
    };

    format!(
        "#{:02X}{:02X}{:02X}",
        adjust(rgb[0]),
        adjust(rgb[1]),
        adjust(rgb[2])
    )
}

/// Resolve a color reference to `#RRGGBB` against a theme table.
pub fn resolve(color: &ColorRef, theme: &ThemeColorTable) -> Option<String> {
    match color {
        ColorRef::Rgb(hex) => normalize_hex(hex),
        ColorRef::Indexed(idx) => INDEXED_PALETTE
            .get(*idx as usize)
            .and_then(|argb| normalize_hex(argb)),
        ColorRef::Theme { slot, tint } => theme.get(*slot).map(|base| apply_tint(base, *tint)),
    }
}

/// Resolver bound to one workbook's theme table. Handed to every projector.
#[derive(Debug, Clone, Copy)]
pub struct ColorResolver<'a> {
    theme: &'a ThemeColorTable,
}

impl<'a> ColorResolver<'a> {
    pub fn new(theme: &'a ThemeColorTable) -> Self {
        Self { theme }
    }

    pub fn resolve(&self, color: Option<&ColorRef>) -> Option<String> {
        color.and_then(|c| resolve(c, self.theme))
    }
}
