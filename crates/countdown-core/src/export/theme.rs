//! Export color presets and typefaces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `0.0..=1.0`.
    pub a: f32,
}

impl Rgba {
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
            a: 1.0,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn alpha_u8(&self) -> u8 {
        (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// Colors a theme supplies to the export layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgba,
    pub text: Rgba,
    pub accent: Rgba,
    pub secondary: Rgba,
    pub card: Rgba,
    /// Outline drawn around unit cards, for themes whose cards would
    /// otherwise vanish into the background.
    pub card_outline: Option<Rgba>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Indigo,
    Slate,
    Rose,
    Emerald,
    White,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Indigo,
        Theme::Slate,
        Theme::Rose,
        Theme::Emerald,
        Theme::White,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Indigo => "indigo",
            Theme::Slate => "slate",
            Theme::Rose => "rose",
            Theme::Emerald => "emerald",
            Theme::White => "white",
        }
    }

    pub fn palette(self) -> Palette {
        const WHITE: Rgba = Rgba::hex(0xffffff);
        const GLASS: Rgba = Rgba::rgba(255, 255, 255, 0.15);

        match self {
            Theme::Indigo => Palette {
                background: Rgba::hex(0x4f46e5),
                text: WHITE,
                accent: WHITE,
                secondary: Rgba::hex(0xc7d2fe),
                card: GLASS,
                card_outline: None,
            },
            Theme::Slate => Palette {
                background: Rgba::hex(0x1e293b),
                text: WHITE,
                accent: WHITE,
                secondary: Rgba::hex(0x94a3b8),
                card: Rgba::rgba(255, 255, 255, 0.1),
                card_outline: None,
            },
            Theme::Rose => Palette {
                background: Rgba::hex(0xe11d48),
                text: WHITE,
                accent: WHITE,
                secondary: Rgba::hex(0xfecdd3),
                card: GLASS,
                card_outline: None,
            },
            Theme::Emerald => Palette {
                background: Rgba::hex(0x059669),
                text: WHITE,
                accent: WHITE,
                secondary: Rgba::hex(0xa7f3d0),
                card: GLASS,
                card_outline: None,
            },
            Theme::White => Palette {
                background: WHITE,
                text: Rgba::hex(0x1e293b),
                accent: Rgba::hex(0x4f46e5),
                secondary: Rgba::hex(0x64748b),
                card: Rgba::hex(0xf8fafc),
                card_outline: Some(Rgba::rgba(0, 0, 0, 0.05)),
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExportError::UnknownTheme(s.to_string()))
    }
}

/// Generic family used when the preferred face is not installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericFamily {
    SansSerif,
    Serif,
    Monospace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Typeface {
    #[default]
    Modern,
    Classic,
    Tech,
}

impl Typeface {
    pub const ALL: [Typeface; 3] = [Typeface::Modern, Typeface::Classic, Typeface::Tech];

    pub fn name(self) -> &'static str {
        match self {
            Typeface::Modern => "modern",
            Typeface::Classic => "classic",
            Typeface::Tech => "tech",
        }
    }

    /// Preferred installed family, if any.
    pub fn family(self) -> Option<&'static str> {
        match self {
            Typeface::Modern => Some("Inter"),
            Typeface::Classic => Some("Georgia"),
            Typeface::Tech => None,
        }
    }

    pub fn generic(self) -> GenericFamily {
        match self {
            Typeface::Modern => GenericFamily::SansSerif,
            Typeface::Classic => GenericFamily::Serif,
            Typeface::Tech => GenericFamily::Monospace,
        }
    }
}

impl fmt::Display for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Typeface {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Typeface::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExportError::UnknownTypeface(s.to_string()))
    }
}
