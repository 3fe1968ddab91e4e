//! Theme color data as exposed by a workbook source.
//!
//! A source may hand over an already-parsed color scheme, the raw
//! `xl/theme/theme1.xml` bytes, both, or neither.

/// The 12 color roles of a document theme, in palette index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeSlot {
    Light1,
    Dark1,
    Light2,
    Dark2,
    Accent1,
    Accent2,
    Accent3,
    Accent4,
    Accent5,
    Accent6,
    Hyperlink,
    FollowedHyperlink,
}

impl ThemeSlot {
    pub const ALL: [ThemeSlot; 12] = [
        ThemeSlot::Light1,
        ThemeSlot::Dark1,
        ThemeSlot::Light2,
        ThemeSlot::Dark2,
        ThemeSlot::Accent1,
        ThemeSlot::Accent2,
        ThemeSlot::Accent3,
        ThemeSlot::Accent4,
        ThemeSlot::Accent5,
        ThemeSlot::Accent6,
        ThemeSlot::Hyperlink,
        ThemeSlot::FollowedHyperlink,
    ];

    /// Palette index used by `theme="N"` color attributes.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: u32) -> Option<Self> {
        Self::ALL.get(idx as usize).copied()
    }

    /// Element name inside `<a:clrScheme>`.
    pub fn xml_tag(self) -> &'static str {
        match self {
            ThemeSlot::Light1 => "lt1",
            ThemeSlot::Dark1 => "dk1",
            ThemeSlot::Light2 => "lt2",
            ThemeSlot::Dark2 => "dk2",
            ThemeSlot::Accent1 => "accent1",
            ThemeSlot::Accent2 => "accent2",
            ThemeSlot::Accent3 => "accent3",
            ThemeSlot::Accent4 => "accent4",
            ThemeSlot::Accent5 => "accent5",
            ThemeSlot::Accent6 => "accent6",
            ThemeSlot::Hyperlink => "hlink",
            ThemeSlot::FollowedHyperlink => "folHlink",
        }
    }
}

/// One scheme entry: either a literal sRGB value or a system color with its
/// last-known rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemeColor {
    Srgb(String),
    System {
        name: String,
        last_color: Option<String>,
    },
}

/// Parsed `<a:clrScheme>`; missing roles stay `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorScheme {
    pub name: Option<String>,
    slots: [Option<SchemeColor>; 12],
}

impl ColorScheme {
    pub fn get(&self, slot: ThemeSlot) -> Option<&SchemeColor> {
        self.slots[slot.index()].as_ref()
    }

    pub fn set(&mut self, slot: ThemeSlot, color: SchemeColor) {
        self.slots[slot.index()] = Some(color);
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThemeSource {
    pub scheme: Option<ColorScheme>,
    pub raw_xml: Option<Vec<u8>>,
}

impl ThemeSource {
    pub fn from_raw(xml: impl Into<Vec<u8>>) -> Self {
        Self {
            scheme: None,
            raw_xml: Some(xml.into()),
        }
    }

    pub fn from_scheme(scheme: ColorScheme) -> Self {
        Self {
            scheme: Some(scheme),
            raw_xml: None,
        }
    }
}
