//! Animated effects for the folio page.
//!
//! This crate provides the pointer-reactive particle field used behind the
//! hero, the typewriter role cycler, the one-time scroll reveal and the logo
//! glitch, together with the small cooperative [`Runtime`] they are mounted
//! on.

mod easing;
mod glitch;
mod glyphs;
mod particles;
mod reveal;
mod runtime;
mod typewriter;

pub use easing::CubicBezier;
pub use glitch::{Glitch, GlitchLayer, GlitchTiming};
pub use glyphs::{CARET, DOT_GLYPHS};
pub use particles::{
    Appearance, FieldTuning, MAX_PARTICLES, MIN_SPACING, Particle, ParticleField, ParticleLayer,
};
pub use reveal::{Direction, Reveal, RevealFrame, RevealState, RevealTiming};
pub use runtime::{
    Bounds, EventKind, FrameLoop, Observer, Runtime, Subscription, SurfaceEvent, Timer,
};
pub use typewriter::{Phase, RoleCycler, TypewriterTiming, caret_visible};

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_mount_then_unmount_leaves_nothing_behind() {
        let rt = Runtime::new();
        rt.set_viewport(Bounds::new(0.0, 0.0, 640.0, 320.0));

        let layer = ParticleLayer::mount(&rt, FieldTuning::default(), 640.0, 320.0);
        let mut cycler = RoleCycler::new(vec!["Developer".into()]);
        cycler.mount(&rt);
        let mut reveal = Reveal::new(Direction::Up, Duration::ZERO);
        reveal.mount(&rt, Bounds::new(0.0, 4000.0, 640.0, 32.0));

        assert_eq!(rt.active_frames(), 1);
        assert_eq!(rt.listeners(), 1);
        assert_eq!(rt.pending_timers(), 1);
        assert_eq!(rt.observers(), 1);

        layer.unmount();
        cycler.unmount();
        reveal.unmount();

        assert_eq!(rt.active_frames(), 0);
        assert_eq!(rt.listeners(), 0);
        assert_eq!(rt.pending_timers(), 0);
        assert_eq!(rt.observers(), 0);
    }

    #[test]
    fn test_dropping_components_releases_handles() {
        let rt = Runtime::new();
        {
            let _layer = ParticleLayer::mount(&rt, FieldTuning::default(), 64.0, 64.0);
            let mut cycler = RoleCycler::new(vec!["A".into()]);
            cycler.mount(&rt);
            let mut reveal = Reveal::new(Direction::None, Duration::ZERO);
            reveal.mount(&rt, Bounds::new(0.0, 0.0, 1.0, 1.0));
            let mut glitch = Glitch::with_seed(0);
            glitch.mount(&rt);
        }
        assert_eq!(rt.active_frames(), 0);
        assert_eq!(rt.listeners(), 0);
        assert_eq!(rt.pending_timers(), 0);
        assert_eq!(rt.observers(), 0);
    }
}
