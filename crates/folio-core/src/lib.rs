//! Core types shared by the folio crates.

mod color;
mod speed;
mod theme;
pub mod units;

pub use color::Rgb;
pub use speed::AnimationSpeed;
pub use theme::ColorTheme;
