//! Accent colour themes.

use serde::{Deserialize, Serialize};

use crate::Rgb;

/// Accent colour theme for the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    /// Neon green (`#00FF87`).
    #[default]
    Neon,
    /// Hot pink (`#FF2D78`).
    Pink,
    /// Electric cyan (`#00E5FF`).
    Cyan,
    /// Indigo violet (`#818CF8`).
    Violet,
}

impl ColorTheme {
    /// All themes in cycling order.
    pub const ALL: [ColorTheme; 4] = [
        ColorTheme::Neon,
        ColorTheme::Pink,
        ColorTheme::Cyan,
        ColorTheme::Violet,
    ];

    /// Primary accent colour.
    pub const fn accent(self) -> Rgb {
        match self {
            ColorTheme::Neon => Rgb(0, 255, 135),
            ColorTheme::Pink => Rgb(255, 45, 120),
            ColorTheme::Cyan => Rgb(0, 229, 255),
            ColorTheme::Violet => Rgb(129, 140, 248),
        }
    }

    /// Secondary colour used for gradients and highlights.
    pub const fn secondary(self) -> Rgb {
        match self {
            ColorTheme::Neon => Rgb(0, 229, 255),
            ColorTheme::Pink => Rgb(255, 160, 90),
            ColorTheme::Cyan => Rgb(0, 255, 135),
            ColorTheme::Violet => Rgb(34, 211, 238),
        }
    }

    /// Next theme in the cycle.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Human readable name.
    pub const fn name(self) -> &'static str {
        match self {
            ColorTheme::Neon => "neon",
            ColorTheme::Pink => "pink",
            ColorTheme::Cyan => "cyan",
            ColorTheme::Violet => "violet",
        }
    }
}
