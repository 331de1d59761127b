//! One-time scroll reveal.
//!
//! A block starts transparent and offset along its direction, and the first
//! time it scrolls into view it fades and slides into place. It never hides
//! again.

use std::time::Duration;

use folio_core::{Rgb, units};
use log::debug;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

use crate::easing::CubicBezier;
use crate::runtime::{Bounds, Observer, Runtime};

/// Slide-in direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Rises from below.
    #[default]
    Up,
    /// Slides in from the right towards the left.
    Left,
    /// Slides in from the left towards the right.
    Right,
    /// Fades in place.
    None,
}

/// Animation constants of a reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealTiming {
    pub duration: Duration,
    /// Initial offset in virtual pixels.
    pub offset: f32,
    /// Viewport shrink applied before testing intersection.
    pub root_margin: f32,
    pub easing: CubicBezier,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(750),
            offset: 35.0,
            root_margin: 60.0,
            easing: CubicBezier::EASE_OUT_QUINT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    /// Waiting to enter the viewport.
    Hidden,
    /// Triggered at the given time; animating after the delay.
    Revealing { since: Duration },
    /// Final state.
    Shown,
}

/// Opacity and offset of a block at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealFrame {
    pub opacity: f32,
    /// Offset in virtual pixels.
    pub dx: f32,
    pub dy: f32,
}

impl RevealFrame {
    pub const SHOWN: RevealFrame = RevealFrame {
        opacity: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    /// Offset rounded to whole cells.
    pub fn offset_cells(&self) -> (i32, i32) {
        (
            (self.dx / units::CELL_WIDTH_PX).round() as i32,
            (self.dy / units::CELL_HEIGHT_PX).round() as i32,
        )
    }

    pub fn is_invisible(&self) -> bool {
        self.opacity <= 0.0
    }

    /// Fade a styled line towards the page background.
    pub fn apply<'a>(&self, line: Line<'a>) -> Line<'a> {
        if self.opacity >= 1.0 {
            return line;
        }
        let opacity = self.opacity.max(0.0);
        let (line_style, alignment) = (line.style, line.alignment);
        let spans: Vec<Span<'a>> = line
            .spans
            .into_iter()
            .map(|span| {
                let fg = fade(span.style.fg.or(line_style.fg), opacity);
                let style = Style {
                    fg: Some(fg),
                    ..span.style
                };
                Span::styled(span.content, style)
            })
            .collect();
        let mut faded = Line::from(spans).style(Style {
            fg: Some(fade(line_style.fg, opacity)),
            ..line_style
        });
        faded.alignment = alignment;
        faded
    }
}

fn fade(color: Option<Color>, opacity: f32) -> Color {
    let rgb = match color {
        Some(Color::Rgb(r, g, b)) => Rgb(r, g, b),
        Some(Color::DarkGray) | Some(Color::Gray) => Rgb::MUTED,
        _ => Rgb::TEXT,
    };
    rgb.over(Rgb::BACKGROUND, opacity).color()
}

/// A block that reveals itself the first time it becomes visible.
#[derive(Debug)]
pub struct Reveal {
    direction: Direction,
    delay: Duration,
    timing: RevealTiming,
    state: RevealState,
    observer: Option<Observer>,
}

impl Reveal {
    pub fn new(direction: Direction, delay: Duration) -> Self {
        Self {
            direction,
            delay,
            timing: RevealTiming::default(),
            state: RevealState::Hidden,
            observer: None,
        }
    }

    pub fn with_timing(mut self, timing: RevealTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Start observing `bounds` (page coordinates, virtual pixels). Without
    /// intersection support the block is shown immediately.
    pub fn mount(&mut self, runtime: &Runtime, bounds: Bounds) {
        if self.state != RevealState::Hidden {
            return;
        }
        self.observer = runtime.observe(bounds, self.timing.root_margin);
        if self.observer.is_none() {
            self.state = RevealState::Shown;
        }
    }

    /// Move the observed block after a relayout.
    pub fn relayout(&self, bounds: Bounds) {
        if let Some(observer) = &self.observer {
            observer.set_target(bounds);
        }
    }

    /// Check the observer and advance the state machine.
    pub fn poll(&mut self, runtime: &Runtime) {
        let now = runtime.now();
        match self.state {
            RevealState::Hidden => {
                if self.observer.as_ref().is_some_and(Observer::is_intersecting) {
                    debug!("reveal triggered at {now:?}");
                    self.state = RevealState::Revealing { since: now };
                    // Fires once; stop observing.
                    self.observer = None;
                }
            }
            RevealState::Revealing { since } => {
                if now >= since + self.delay + self.timing.duration {
                    self.state = RevealState::Shown;
                }
            }
            RevealState::Shown => {}
        }
    }

    /// Disconnect the observer.
    pub fn unmount(&mut self) {
        self.observer = None;
    }

    fn hidden_offset(&self) -> (f32, f32) {
        let offset = self.timing.offset;
        match self.direction {
            Direction::Up => (0.0, offset),
            Direction::Left => (offset, 0.0),
            Direction::Right => (-offset, 0.0),
            Direction::None => (0.0, 0.0),
        }
    }

    /// Opacity and offset at time `now`.
    pub fn frame(&self, now: Duration) -> RevealFrame {
        let progress = match self.state {
            RevealState::Hidden => 0.0,
            RevealState::Shown => return RevealFrame::SHOWN,
            RevealState::Revealing { since } => {
                let start = since + self.delay;
                if now <= start {
                    0.0
                } else {
                    let t = (now - start).as_secs_f32() / self.timing.duration.as_secs_f32();
                    self.timing.easing.ease(t)
                }
            }
        };
        let (ox, oy) = self.hidden_offset();
        RevealFrame {
            opacity: progress,
            dx: ox * (1.0 - progress),
            dy: oy * (1.0 - progress),
        }
    }
}
