//! Glitch effect for short text such as the logo (stateful).
//!
//! The text is corrupted for a moment shortly after mount, then by chance
//! once per interval.

use std::time::Duration;

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::glyphs::GLITCH_GLYPHS;
use crate::runtime::{Runtime, Timer};

/// Chance that any one character is replaced while glitching.
const NOISE_CHANCE: f64 = 0.35;

/// Which of the two offset copies a noise glyph belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlitchLayer {
    Pink,
    Cyan,
}

/// Glitch schedule, in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct GlitchTiming {
    /// Delay of the guaranteed glitch after mount.
    pub first_ms: u64,
    /// How long one glitch lasts.
    pub length_ms: u64,
    /// Period of the random checks.
    pub interval_ms: u64,
    /// Probability that a check glitches.
    pub chance: f64,
}

impl Default for GlitchTiming {
    fn default() -> Self {
        Self {
            first_ms: 500,
            length_ms: 300,
            interval_ms: 5000,
            chance: 0.5,
        }
    }
}

#[derive(Debug)]
pub struct Glitch {
    timing: GlitchTiming,
    rng: StdRng,
    first: Option<Timer>,
    interval: Option<Timer>,
    end: Option<Timer>,
    /// Seed of the current noise pattern, set while glitching.
    noise_seed: Option<u64>,
}

impl Default for Glitch {
    fn default() -> Self {
        Self::new()
    }
}

impl Glitch {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Deterministic glitch for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            timing: GlitchTiming::default(),
            rng,
            first: None,
            interval: None,
            end: None,
            noise_seed: None,
        }
    }

    pub fn with_timing(mut self, timing: GlitchTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn is_glitching(&self) -> bool {
        self.noise_seed.is_some()
    }

    pub fn mount(&mut self, runtime: &Runtime) {
        self.unmount();
        self.first = Some(runtime.set_timeout(Duration::from_millis(self.timing.first_ms)));
        self.interval = Some(runtime.set_timeout(self.period()));
    }

    fn period(&self) -> Duration {
        Duration::from_millis(self.timing.interval_ms.max(1))
    }

    fn trigger(&mut self, runtime: &Runtime) {
        self.noise_seed = Some(self.rng.random());
        self.end = Some(runtime.set_timeout(Duration::from_millis(self.timing.length_ms)));
        debug!("glitch at {:?}", runtime.now());
    }

    /// Start and stop glitches that are due. Returns whether the look changed.
    pub fn poll(&mut self, runtime: &Runtime) -> bool {
        let mut changed = false;
        if self.end.as_ref().is_some_and(Timer::fired) {
            self.end = None;
            self.noise_seed = None;
            changed = true;
        }
        if self.first.as_ref().is_some_and(Timer::fired) {
            self.first = None;
            self.trigger(runtime);
            changed = true;
        }
        if let Some(deadline) = self.interval.as_ref().filter(|t| t.fired()).map(Timer::deadline) {
            // Checks missed during a stall are skipped, not replayed.
            let period = self.period();
            let behind = runtime.now().saturating_sub(deadline).as_millis() / period.as_millis();
            let next = deadline + period * (behind as u32 + 1);
            self.interval = Some(runtime.schedule_at(next));
            if self.rng.random_bool(self.timing.chance.clamp(0.0, 1.0)) {
                self.trigger(runtime);
                changed = true;
            }
        }
        changed
    }

    /// Noise for each character of `text`: a replacement glyph and its layer,
    /// or `None` to draw the character as is. All `None` unless glitching.
    pub fn noise(&self, text: &str) -> Vec<Option<(char, GlitchLayer)>> {
        let count = text.chars().count();
        let Some(seed) = self.noise_seed else {
            return vec![None; count];
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let forced = rng.random_range(0..count.max(1));
        text.chars()
            .enumerate()
            .map(|(i, ch)| {
                let hit = i == forced || rng.random_bool(NOISE_CHANCE);
                if !hit || ch.is_whitespace() {
                    return None;
                }
                let glyph = GLITCH_GLYPHS[rng.random_range(0..GLITCH_GLYPHS.len())];
                let layer = if rng.random_bool(0.5) {
                    GlitchLayer::Pink
                } else {
                    GlitchLayer::Cyan
                };
                Some((glyph, layer))
            })
            .collect()
    }

    /// Cancel every timer and clear any glitch in progress.
    pub fn unmount(&mut self) {
        self.first = None;
        self.interval = None;
        self.end = None;
        self.noise_seed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_glitch_after_mount() {
        let rt = Runtime::new();
        let mut glitch = Glitch::with_seed(7);
        glitch.mount(&rt);
        assert_eq!(rt.pending_timers(), 2);

        rt.advance(ms(499));
        assert!(!glitch.poll(&rt));
        assert!(glitch.noise("Saurabh").iter().all(Option::is_none));

        rt.advance(ms(1));
        assert!(glitch.poll(&rt));
        assert!(glitch.is_glitching());
        assert!(glitch.noise("Saurabh").iter().any(Option::is_some));

        rt.advance(ms(299));
        glitch.poll(&rt);
        assert!(glitch.is_glitching());
        rt.advance(ms(1));
        assert!(glitch.poll(&rt));
        assert!(!glitch.is_glitching());
    }

    #[test]
    fn test_noise_is_stable_while_glitching() {
        let rt = Runtime::new();
        let mut glitch = Glitch::with_seed(3);
        glitch.mount(&rt);
        rt.advance(ms(500));
        glitch.poll(&rt);
        let noise = glitch.noise("Ada Lovelace");
        assert_eq!(noise.len(), 12);
        assert_eq!(noise[3], None);
        assert_eq!(glitch.noise("Ada Lovelace"), noise);
    }

    #[test]
    fn test_interval_follows_chance() {
        let always = GlitchTiming {
            chance: 1.0,
            ..Default::default()
        };
        let rt = Runtime::new();
        let mut glitch = Glitch::with_seed(1).with_timing(always);
        glitch.mount(&rt);
        rt.advance(ms(500));
        glitch.poll(&rt);
        rt.advance(ms(500));
        glitch.poll(&rt);
        assert!(!glitch.is_glitching());

        rt.advance(ms(4000));
        assert!(glitch.poll(&rt));
        assert!(glitch.is_glitching());

        let never = GlitchTiming {
            chance: 0.0,
            ..Default::default()
        };
        let rt = Runtime::new();
        let mut glitch = Glitch::with_seed(1).with_timing(never);
        glitch.mount(&rt);
        rt.advance(ms(1000));
        glitch.poll(&rt);
        for _ in 0..5 {
            rt.advance(ms(5000));
            glitch.poll(&rt);
            assert!(!glitch.is_glitching());
            assert_eq!(rt.pending_timers(), 1);
        }
    }

    #[test]
    fn test_stall_skips_missed_checks() {
        let rt = Runtime::new();
        let mut glitch = Glitch::with_seed(9);
        glitch.mount(&rt);
        rt.advance(ms(62_000));
        glitch.poll(&rt);
        let next = glitch.interval.as_ref().map(Timer::deadline);
        assert_eq!(next, Some(ms(65_000)));
    }

    #[test]
    fn test_unmount_releases_timers() {
        let rt = Runtime::new();
        let mut glitch = Glitch::with_seed(2);
        glitch.mount(&rt);
        rt.advance(ms(500));
        glitch.poll(&rt);
        assert_eq!(rt.pending_timers(), 2);
        glitch.unmount();
        assert_eq!(rt.pending_timers(), 0);
        assert!(!glitch.is_glitching());
    }
}
