// Style descriptors as they appear on a cell: font, fill, border, alignment

/// A color reference, before theme resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorRef {
    /// `RRGGBB` or `AARRGGBB` hex digits, as written in the source.
    Rgb(String),
    /// Index into the legacy 64-entry palette.
    Indexed(u32),
    /// Theme slot (0-11) with an optional tint in [-1, 1].
    Theme { slot: u32, tint: Option<f64> },
}

impl ColorRef {
    pub fn rgb(hex: impl Into<String>) -> Self {
        ColorRef::Rgb(hex.into())
    }

    pub fn theme(slot: u32) -> Self {
        ColorRef::Theme { slot, tint: None }
    }

    pub fn tinted(slot: u32, tint: f64) -> Self {
        ColorRef::Theme {
            slot,
            tint: Some(tint),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Font {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Underline style (`single`, `double`, `singleAccounting`, ...).
    pub underline: Option<String>,
    pub strike: Option<bool>,
    pub color: Option<ColorRef>,
}

/// Cell fill. Pattern fills carry a declared pattern type and two colors;
/// gradient fills only their gradient type.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Pattern(PatternFill),
    Gradient(GradientFill),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatternFill {
    /// `solid`, `gray125`, ... `None` when the source declared `none`.
    pub pattern_type: Option<String>,
    pub fg_color: Option<ColorRef>,
    pub bg_color: Option<ColorRef>,
}

impl PatternFill {
    pub fn solid(fg: ColorRef) -> Self {
        Self {
            pattern_type: Some("solid".to_string()),
            fg_color: Some(fg),
            bg_color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradientFill {
    /// `linear` or `path`; absent means `linear`
    pub gradient_type: Option<String>,
}

/// One border edge.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Edge {
    /// Line style (`thin`, `medium`, `dashed`, ...). `None` means no line.
    pub style: Option<String>,
    pub color: Option<ColorRef>,
}

impl Edge {
    pub fn new(style: &str, color: Option<ColorRef>) -> Self {
        Self {
            style: Some(style.to_string()),
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Border {
    pub left: Edge,
    pub right: Edge,
    pub top: Edge,
    pub bottom: Edge,
    pub diagonal: Edge,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Alignment {
    pub horizontal: Option<String>,
    pub vertical: Option<String>,
    pub wrap_text: Option<bool>,
    pub indent: Option<f64>,
    pub text_rotation: Option<i32>,
    pub shrink_to_fit: Option<bool>,
}
