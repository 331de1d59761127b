//! Presentation settings.

use folio_core::{AnimationSpeed, ColorTheme};
use serde::{Deserialize, Serialize};

/// User adjustable presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub color_theme: ColorTheme,
    pub animation_speed: AnimationSpeed,
    /// Particle grid spacing in virtual pixels.
    pub particle_spacing: f32,
    /// Draw the particle field behind the hero.
    pub particles: bool,
    /// Animate sections in on scroll. When off, blocks appear immediately.
    pub reveal: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color_theme: ColorTheme::default(),
            animation_speed: AnimationSpeed::default(),
            particle_spacing: 32.0,
            particles: true,
            reveal: true,
        }
    }
}
