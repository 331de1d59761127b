//! Plain RGB colour with blending helpers.

use ratatui::style::Color;

/// A 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Page background (`#050508`).
    pub const BACKGROUND: Rgb = Rgb(5, 5, 8);
    /// Primary text colour.
    pub const TEXT: Rgb = Rgb(235, 235, 240);
    /// Secondary, dimmed text colour.
    pub const MUTED: Rgb = Rgb(110, 110, 125);

    /// Linearly interpolate towards `other`; `t` is clamped to 0.0-1.0.
    pub fn mix(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb(lerp(self.0, other.0), lerp(self.1, other.1), lerp(self.2, other.2))
    }

    /// Composite this colour over `background` with the given opacity.
    pub fn over(self, background: Rgb, opacity: f32) -> Rgb {
        background.mix(self, opacity)
    }

    /// Convert to a ratatui colour.
    pub const fn color(self) -> Color {
        Color::Rgb(self.0, self.1, self.2)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        rgb.color()
    }
}
