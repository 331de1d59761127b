//! Character constants for effects.

/// Dot glyphs from smallest to largest visual radius.
pub const DOT_GLYPHS: &[char] = &['·', '•', '●'];

/// Caret drawn after typewriter text.
pub const CARET: char = '▌';

/// Noise drawn over glitched text.
pub const GLITCH_GLYPHS: &[char] = &['#', '%', '&', '$', '/', '\\', '░', '▒', '▓', '@'];
