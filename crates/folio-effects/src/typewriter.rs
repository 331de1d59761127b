//! Typewriter role cycler (stateful).
//!
//! Types a role one character at a time, dwells, erases it and moves on to
//! the next role, forever.

use std::ops::RangeInclusive;
use std::time::Duration;

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::runtime::{Runtime, Timer};

/// Guard against runaway catch-up when the clock jumps far ahead.
const MAX_CATCH_UP: usize = 256;

/// Caret blink period.
const CARET_PERIOD_MS: u128 = 1200;

/// Whether the blinking caret is lit at `now` (hard on/off, half period each).
pub fn caret_visible(now: Duration) -> bool {
    now.as_millis() % CARET_PERIOD_MS < CARET_PERIOD_MS / 2
}

/// Phase of the cycler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing,
    Pausing,
    Erasing,
}

/// Tick intervals of the cycler, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypewriterTiming {
    /// Per-character typing interval, picked uniformly from this range.
    pub type_ms: RangeInclusive<u64>,
    /// Dwell on the fully typed role.
    pub pause_ms: u64,
    /// Per-character erasing interval.
    pub erase_ms: u64,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            type_ms: 55..=85,
            pause_ms: 1800,
            erase_ms: 28,
        }
    }
}

/// Cycles through a fixed list of roles with a type / pause / erase effect.
#[derive(Debug)]
pub struct RoleCycler {
    roles: Vec<String>,
    index: usize,
    /// Number of characters of the current role on screen.
    shown: usize,
    phase: Phase,
    timing: TypewriterTiming,
    rng: StdRng,
    timer: Option<Timer>,
}

impl RoleCycler {
    pub fn new(roles: Vec<String>) -> Self {
        Self::with_rng(roles, StdRng::from_os_rng())
    }

    /// Deterministic cycler for a given seed.
    pub fn with_seed(roles: Vec<String>, seed: u64) -> Self {
        Self::with_rng(roles, StdRng::seed_from_u64(seed))
    }

    fn with_rng(roles: Vec<String>, rng: StdRng) -> Self {
        Self {
            roles,
            index: 0,
            shown: 0,
            phase: Phase::Typing,
            timing: TypewriterTiming::default(),
            rng,
            timer: None,
        }
    }

    pub fn with_timing(mut self, timing: TypewriterTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The role currently being typed or erased.
    pub fn role(&self) -> &str {
        self.roles.get(self.index).map(String::as_str).unwrap_or("")
    }

    /// The visible prefix of the current role.
    pub fn text(&self) -> &str {
        let role = self.role();
        match role.char_indices().nth(self.shown) {
            Some((end, _)) => &role[..end],
            None => role,
        }
    }

    fn role_len(&self) -> usize {
        self.role().chars().count()
    }

    fn typing_delay(&mut self) -> Duration {
        Duration::from_millis(self.rng.random_range(self.timing.type_ms.clone()))
    }

    /// Perform one transition and return the delay until the next one.
    pub fn advance(&mut self) -> Duration {
        match self.phase {
            Phase::Typing => {
                if self.shown < self.role_len() {
                    self.shown += 1;
                }
                if self.shown >= self.role_len() {
                    self.phase = Phase::Pausing;
                    Duration::from_millis(self.timing.pause_ms)
                } else {
                    self.typing_delay()
                }
            }
            Phase::Pausing => {
                self.phase = Phase::Erasing;
                Duration::from_millis(self.timing.erase_ms)
            }
            Phase::Erasing => {
                self.shown = self.shown.saturating_sub(1);
                if self.shown == 0 {
                    self.index = (self.index + 1) % self.roles.len().max(1);
                    self.phase = Phase::Typing;
                    self.typing_delay()
                } else {
                    Duration::from_millis(self.timing.erase_ms)
                }
            }
        }
    }

    /// Start ticking on the runtime. An empty role list stays idle.
    pub fn mount(&mut self, runtime: &Runtime) {
        self.timer = None;
        if self.roles.is_empty() {
            debug!("role cycler: no roles, staying idle");
            return;
        }
        let delay = self.typing_delay();
        self.timer = Some(runtime.set_timeout(delay));
    }

    /// Run every transition that is due. Returns whether the text changed.
    pub fn poll(&mut self, runtime: &Runtime) -> bool {
        let mut changed = false;
        for _ in 0..MAX_CATCH_UP {
            let deadline = match &self.timer {
                Some(timer) if timer.fired() => timer.deadline(),
                _ => break,
            };
            // Clear the fired timer before scheduling the next one.
            self.timer = None;
            let delay = self.advance();
            self.timer = Some(runtime.schedule_at(deadline + delay));
            changed = true;
        }
        changed
    }

    /// Cancel the pending timer.
    pub fn unmount(&mut self) {
        self.timer = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.timer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_initial_state() {
        let cycler = RoleCycler::with_seed(roles(&["Frontend Developer"]), 1);
        assert_eq!(cycler.phase(), Phase::Typing);
        assert_eq!(cycler.index(), 0);
        assert_eq!(cycler.text(), "");
    }

    #[test]
    fn test_cycle_is_periodic_over_roles() {
        let mut cycler = RoleCycler::with_seed(roles(&["A", "BB"]), 7);
        let mut seen = vec![cycler.text().to_string()];
        for _ in 0..20 {
            cycler.advance();
            if seen.last().map(String::as_str) != Some(cycler.text()) {
                seen.push(cycler.text().to_string());
            }
        }
        assert_eq!(
            &seen[..10],
            &["", "A", "", "B", "BB", "B", "", "A", "", "B"]
        );
    }

    #[test]
    fn test_text_is_always_prefix_of_role() {
        let mut cycler = RoleCycler::with_seed(roles(&["héllo", "wörld", "", "x"]), 3);
        for _ in 0..200 {
            cycler.advance();
            assert!(cycler.role().starts_with(cycler.text()));
        }
    }

    #[test]
    fn test_phase_delays() {
        let mut cycler = RoleCycler::with_seed(roles(&["ab"]), 11);
        let d = cycler.advance();
        assert_eq!(cycler.phase(), Phase::Typing);
        assert!((55..=85).contains(&(d.as_millis() as u64)));

        assert_eq!(cycler.advance(), Duration::from_millis(1800));
        assert_eq!(cycler.phase(), Phase::Pausing);
        assert_eq!(cycler.text(), "ab");

        assert_eq!(cycler.advance(), Duration::from_millis(28));
        assert_eq!(cycler.phase(), Phase::Erasing);
        assert_eq!(cycler.text(), "ab");

        assert_eq!(cycler.advance(), Duration::from_millis(28));
        assert_eq!(cycler.text(), "a");
        cycler.advance();
        assert_eq!(cycler.text(), "");
        assert_eq!(cycler.phase(), Phase::Typing);
        assert_eq!(cycler.index(), 0);
    }

    #[test]
    fn test_driven_by_runtime_clock() {
        let rt = Runtime::new();
        let mut cycler = RoleCycler::with_seed(roles(&["Rust"]), 5).with_timing(TypewriterTiming {
            type_ms: 60..=60,
            ..Default::default()
        });
        cycler.mount(&rt);
        assert_eq!(rt.pending_timers(), 1);

        rt.advance(Duration::from_millis(4 * 60));
        assert!(cycler.poll(&rt));
        assert_eq!(cycler.text(), "Rust");
        assert_eq!(cycler.phase(), Phase::Pausing);
        assert_eq!(rt.pending_timers(), 1);

        assert!(!cycler.poll(&rt));
        rt.advance(Duration::from_millis(1800));
        cycler.poll(&rt);
        assert_eq!(cycler.phase(), Phase::Erasing);
        assert_eq!(rt.pending_timers(), 1);
    }

    #[test]
    fn test_unmount_cancels_timer() {
        let rt = Runtime::new();
        let mut cycler = RoleCycler::new(roles(&["A"]));
        cycler.mount(&rt);
        cycler.mount(&rt);
        assert_eq!(rt.pending_timers(), 1);
        cycler.unmount();
        assert_eq!(rt.pending_timers(), 0);
        assert!(!cycler.is_mounted());
    }

    #[test]
    fn test_caret_blinks() {
        assert!(caret_visible(Duration::ZERO));
        assert!(caret_visible(Duration::from_millis(599)));
        assert!(!caret_visible(Duration::from_millis(600)));
        assert!(caret_visible(Duration::from_millis(1200)));
    }

    #[test]
    fn test_empty_role_list_is_idle() {
        let rt = Runtime::new();
        let mut cycler = RoleCycler::new(Vec::new());
        cycler.mount(&rt);
        assert_eq!(rt.pending_timers(), 0);
        cycler.advance();
        assert_eq!(cycler.text(), "");
    }
}
