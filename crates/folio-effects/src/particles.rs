//! Pointer-reactive particle field (stateful).
//!
//! A regular grid of dots that is pushed away from the pointer and springs
//! back to its anchor when undisturbed. The simulation is an owned value
//! driven by [`ParticleField::step`]; [`ParticleLayer`] binds it to a
//! [`Runtime`] for pointer and resize events.

use std::time::Duration;

use folio_core::{ColorTheme, Rgb, units};
use log::{debug, warn};
use ratatui::{buffer::Buffer, layout::Rect};

use crate::glyphs::DOT_GLYPHS;
use crate::runtime::{EventKind, FrameLoop, Runtime, Subscription, SurfaceEvent};

/// Pointer position used before the first pointer event, far off the surface.
const POINTER_SENTINEL: (f32, f32) = (-10_000.0, -10_000.0);

/// Length of one simulation frame.
const FRAME: Duration = Duration::from_nanos(16_666_667);

/// Upper bound on frames simulated by a single `step`.
const MAX_FRAMES_PER_STEP: usize = 4;

/// Smallest grid spacing honoured; tighter spacings are raised to this.
pub const MIN_SPACING: f32 = 4.0;

/// Largest grid the field will build.
pub const MAX_PARTICLES: usize = 250_000;

/// Influence below which a particle is drawn with the flat idle fill.
const GLOW_THRESHOLD: f32 = 0.02;

/// Tuning constants for the particle field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldTuning {
    /// Grid spacing in virtual pixels.
    pub spacing: f32,
    /// Pointer distance beyond which particles are unaffected.
    pub influence_radius: f32,
    /// Spring constant pulling particles back to their origin.
    pub spring: f32,
    /// Peak repulsive force at the pointer.
    pub repulsion: f32,
    /// Per-frame velocity multiplier, must be below 1.
    pub damping: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_opacity: f32,
    pub max_opacity: f32,
}

impl Default for FieldTuning {
    fn default() -> Self {
        Self {
            spacing: 32.0,
            influence_radius: 160.0,
            spring: 0.08,
            repulsion: 18.0,
            damping: 0.78,
            min_radius: 1.2,
            max_radius: 3.5,
            min_opacity: 0.12,
            max_opacity: 0.67,
        }
    }
}

impl FieldTuning {
    /// Visual appearance for a given influence.
    pub fn appearance(&self, influence: f32) -> Appearance {
        let influence = influence.clamp(0.0, 1.0);
        Appearance {
            influence,
            radius: self.min_radius + influence * (self.max_radius - self.min_radius),
            opacity: self.min_opacity + influence * (self.max_opacity - self.min_opacity),
        }
    }
}

/// A single dot of the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Fixed grid anchor.
    pub ox: f32,
    pub oy: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Particle {
    fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ox: x,
            oy: y,
            vx: 0.0,
            vy: 0.0,
        }
    }

    /// Distance from the particle's anchor.
    pub fn displacement(&self) -> f32 {
        ((self.x - self.ox).powi(2) + (self.y - self.oy).powi(2)).sqrt()
    }
}

/// Derived per-frame look of a particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub influence: f32,
    pub radius: f32,
    pub opacity: f32,
}

/// The particle simulation.
#[derive(Debug, Clone)]
pub struct ParticleField {
    tuning: FieldTuning,
    particles: Vec<Particle>,
    pointer: (f32, f32),
    width: f32,
    height: f32,
    /// Time not yet consumed by whole frames.
    carry: Duration,
}

impl ParticleField {
    /// Create a field covering `width` by `height` virtual pixels.
    pub fn new(tuning: FieldTuning, width: f32, height: f32) -> Self {
        let mut field = Self {
            tuning,
            particles: Vec::new(),
            pointer: POINTER_SENTINEL,
            width: 0.0,
            height: 0.0,
            carry: Duration::ZERO,
        };
        field.initialize(width, height);
        field
    }

    /// Rebuild the grid for a surface of the given size, discarding the
    /// previous particles. A degenerate surface yields no particles.
    pub fn initialize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.particles.clear();

        let spacing = self.tuning.spacing;
        if !(spacing > 0.0) || !(width > 0.0) || !(height > 0.0) {
            debug!("particle field: degenerate surface {width}x{height}, no particles");
            return;
        }
        let spacing = spacing.max(MIN_SPACING);

        // Float to int casts saturate, so a huge surface overflows the product.
        let cols = (width / spacing).floor() as usize;
        let rows = (height / spacing).floor() as usize;
        let Some(count) = cols.checked_mul(rows).filter(|n| *n <= MAX_PARTICLES) else {
            warn!("particle field: {cols}x{rows} grid is too large, no particles");
            return;
        };
        self.particles.reserve(count);
        for row in 0..rows {
            for col in 0..cols {
                let x = (col as f32 + 0.5) * spacing;
                let y = (row as f32 + 0.5) * spacing;
                self.particles.push(Particle::at(x, y));
            }
        }
        debug!(
            "particle field: {} particles for {width}x{height}",
            self.particles.len()
        );
    }

    /// Re-initialise if the size changed. Returns whether it did.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        self.initialize(width, height);
        true
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer = POINTER_SENTINEL;
    }

    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn tuning(&self) -> &FieldTuning {
        &self.tuning
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Pointer influence on a particle at its current position.
    pub fn influence(&self, particle: &Particle) -> f32 {
        let dx = particle.x - self.pointer.0;
        let dy = particle.y - self.pointer.1;
        let dist = (dx * dx + dy * dy).sqrt();
        (1.0 - dist / self.tuning.influence_radius).max(0.0)
    }

    pub fn appearance(&self, particle: &Particle) -> Appearance {
        self.tuning.appearance(self.influence(particle))
    }

    /// Advance the simulation by exactly one frame.
    pub fn tick(&mut self) {
        let t = self.tuning;
        let (px, py) = self.pointer;

        for p in &mut self.particles {
            let dx = p.x - px;
            let dy = p.y - py;
            let dist = (dx * dx + dy * dy).sqrt();
            let influence = (1.0 - dist / t.influence_radius).max(0.0);

            p.vx += (p.ox - p.x) * t.spring;
            p.vy += (p.oy - p.y) * t.spring;

            if dist > 0.0 && dist < t.influence_radius {
                let force = influence * influence * t.repulsion;
                p.vx += dx / dist * force;
                p.vy += dy / dist * force;
            }

            p.vx *= t.damping;
            p.vy *= t.damping;

            p.x += p.vx;
            p.y += p.vy;
        }
    }

    /// Advance the simulation by `dt`, in whole frames. Leftover time is
    /// carried into the next call. Returns the number of frames simulated.
    pub fn step(&mut self, dt: Duration) -> usize {
        self.carry += dt;
        let mut frames = 0;
        while self.carry >= FRAME && frames < MAX_FRAMES_PER_STEP {
            self.carry -= FRAME;
            self.tick();
            frames += 1;
        }
        // Drop the backlog after a stall rather than fast-forwarding.
        if frames == MAX_FRAMES_PER_STEP {
            self.carry = self.carry.min(FRAME);
        }
        frames
    }

    /// Draw the field into `area`. The field's origin is the top-left of `area`.
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: ColorTheme) {
        self.render_scrolled(area, 0, buf, theme);
    }

    /// Draw the field with its first `skip_rows` rows scrolled above `area`.
    pub fn render_scrolled(&self, area: Rect, skip_rows: u16, buf: &mut Buffer, theme: ColorTheme) {
        let accent = theme.accent();
        let glow_edge = theme.secondary();

        for p in &self.particles {
            let (Some(col), Some(row)) = (units::px_to_col(p.x), units::px_to_row(p.y)) else {
                continue;
            };
            let Some(row) = row.checked_sub(skip_rows) else {
                continue;
            };
            if col >= area.width || row >= area.height {
                continue;
            }

            let look = self.appearance(p);
            let glyph = dot_glyph(look.radius, &self.tuning);
            let color = if look.influence > GLOW_THRESHOLD {
                // Radial fall-off: accent at the core, fading through the
                // secondary colour towards the background at the rim.
                accent
                    .mix(glow_edge, 1.0 - look.influence)
                    .over(Rgb::BACKGROUND, look.opacity)
            } else {
                Rgb::TEXT.over(Rgb::BACKGROUND, look.opacity)
            };

            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_char(glyph).set_fg(color.color());
            }
        }
    }
}

/// Pick a dot glyph for a visual radius.
fn dot_glyph(radius: f32, tuning: &FieldTuning) -> char {
    let span = (tuning.max_radius - tuning.min_radius).max(f32::EPSILON);
    let level = ((radius - tuning.min_radius) / span * (DOT_GLYPHS.len() - 1) as f32).round();
    DOT_GLYPHS[(level.max(0.0) as usize).min(DOT_GLYPHS.len() - 1)]
}

/// A particle field mounted on a runtime: owns its frame registration and its
/// pointer/resize subscription. Dropping the layer tears everything down.
#[derive(Debug)]
pub struct ParticleLayer {
    field: ParticleField,
    frames: FrameLoop,
    events: Subscription,
}

impl ParticleLayer {
    pub fn mount(runtime: &Runtime, tuning: FieldTuning, width: f32, height: f32) -> Self {
        Self {
            field: ParticleField::new(tuning, width, height),
            frames: runtime.request_frames(),
            events: runtime.subscribe(&[EventKind::Pointer, EventKind::Resize]),
        }
    }

    /// Apply pending events, then simulate `dt`.
    pub fn update(&mut self, dt: Duration) {
        for event in self.events.drain() {
            match event {
                SurfaceEvent::PointerMove { x, y } => self.field.on_pointer_move(x, y),
                SurfaceEvent::PointerLeave => self.field.on_pointer_leave(),
                SurfaceEvent::Resize { width, height } => {
                    self.field.resize(width, height);
                }
            }
        }
        if self.frames.is_active() {
            self.field.step(dt);
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn render(&self, area: Rect, skip_rows: u16, buf: &mut Buffer, theme: ColorTheme) {
        self.field.render_scrolled(area, skip_rows, buf, theme);
    }

    /// Cancel the frame loop and drop the listeners.
    pub fn unmount(self) {
        debug!("particle layer unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_count_matches_surface() {
        let field = ParticleField::new(FieldTuning::default(), 800.0, 600.0);
        assert_eq!(field.particles().len(), 25 * 18);

        let mut field = ParticleField::new(FieldTuning::default(), 100.0, 100.0);
        assert_eq!(field.particles().len(), 9);
        assert!(field.resize(330.0, 70.0));
        assert_eq!(field.particles().len(), 10 * 2);
        assert!(!field.resize(330.0, 70.0));
    }

    #[test]
    fn test_particles_start_at_rest_on_origin() {
        let field = ParticleField::new(FieldTuning::default(), 320.0, 320.0);
        for p in field.particles() {
            assert_eq!((p.x, p.y), (p.ox, p.oy));
            assert_eq!((p.vx, p.vy), (0.0, 0.0));
        }
        let first = field.particles()[0];
        assert_eq!((first.x, first.y), (16.0, 16.0));
    }

    #[test]
    fn test_degenerate_surface_is_empty() {
        assert!(ParticleField::new(FieldTuning::default(), 0.0, 500.0).particles().is_empty());
        assert!(ParticleField::new(FieldTuning::default(), 500.0, -1.0).particles().is_empty());
        assert!(ParticleField::new(FieldTuning::default(), 20.0, 20.0).particles().is_empty());
        let tuning = FieldTuning {
            spacing: 0.0,
            ..Default::default()
        };
        assert!(ParticleField::new(tuning, 500.0, 500.0).particles().is_empty());
    }

    #[test]
    fn test_tiny_spacing_is_clamped() {
        let tuning = FieldTuning {
            spacing: 1e-30,
            ..Default::default()
        };
        let field = ParticleField::new(tuning, 800.0, 400.0);
        assert_eq!(field.particles().len(), 200 * 100);
        let first = field.particles()[0];
        assert_eq!((first.x, first.y), (2.0, 2.0));
    }

    #[test]
    fn test_oversized_grid_is_empty() {
        let field = ParticleField::new(FieldTuning::default(), 1e30, 1e30);
        assert!(field.particles().is_empty());
        let field = ParticleField::new(FieldTuning::default(), f32::INFINITY, 64.0);
        assert!(field.particles().is_empty());

        let tuning = FieldTuning {
            spacing: MIN_SPACING,
            ..Default::default()
        };
        let side = (MAX_PARTICLES as f32).sqrt() * MIN_SPACING * 2.0;
        assert!(ParticleField::new(tuning, side, side).particles().is_empty());
    }

    #[test]
    fn test_idle_field_stays_put() {
        let mut field = ParticleField::new(FieldTuning::default(), 320.0, 160.0);
        for _ in 0..50 {
            field.tick();
        }
        for p in field.particles() {
            assert_eq!(p.displacement(), 0.0);
        }
    }

    #[test]
    fn test_pointer_repels_nearby_particles() {
        let mut field = ParticleField::new(FieldTuning::default(), 320.0, 320.0);
        // Just left of the particle at (144, 144).
        field.on_pointer_move(134.0, 144.0);
        field.tick();

        let p = field
            .particles()
            .iter()
            .find(|p| p.ox == 144.0 && p.oy == 144.0)
            .copied()
            .expect("grid particle");
        assert!(p.x > p.ox);
        assert!((p.y - p.oy).abs() < 1e-4);
    }

    #[test]
    fn test_converges_to_origin_after_pointer_leaves() {
        let mut field = ParticleField::new(FieldTuning::default(), 640.0, 320.0);
        field.on_pointer_move(300.0, 150.0);
        for _ in 0..30 {
            field.tick();
        }
        assert!(field.particles().iter().any(|p| p.displacement() > 1.0));

        field.on_pointer_leave();
        for _ in 0..300 {
            field.tick();
        }
        for p in field.particles() {
            assert!(p.displacement() < 1e-3, "particle did not settle: {p:?}");
            assert!(p.vx.abs() < 1e-3 && p.vy.abs() < 1e-3);
        }
    }

    #[test]
    fn test_stationary_pointer_stays_bounded() {
        let mut field = ParticleField::new(FieldTuning::default(), 640.0, 640.0);
        field.on_pointer_move(320.0, 320.0);
        let radius = field.tuning().influence_radius;
        for _ in 0..1000 {
            field.tick();
            for p in field.particles() {
                assert!(p.x.is_finite() && p.y.is_finite());
                assert!(p.displacement() < radius);
            }
        }
    }

    #[test]
    fn test_appearance_grows_as_pointer_approaches() {
        let field = ParticleField::new(FieldTuning::default(), 64.0, 32.0);
        let p = field.particles()[0];
        let mut last = field.tuning().appearance(0.0);

        let mut field = field;
        for step in (0..=200).rev() {
            field.on_pointer_move(p.x + step as f32, p.y);
            let look = field.appearance(&p);
            assert!(look.radius >= last.radius);
            assert!(look.opacity >= last.opacity);
            last = look;
        }
        assert!((last.radius - 3.5).abs() < 1e-5);
        assert!((last.opacity - 0.67).abs() < 1e-5);
    }

    #[test]
    fn test_step_runs_whole_frames_and_carries_remainder() {
        let mut field = ParticleField::new(FieldTuning::default(), 64.0, 64.0);
        assert_eq!(field.step(Duration::from_millis(10)), 0);
        assert_eq!(field.step(Duration::from_millis(10)), 1);
        assert_eq!(field.step(Duration::from_millis(34)), 2);
        assert_eq!(field.step(Duration::from_secs(5)), MAX_FRAMES_PER_STEP);
        assert!(field.step(Duration::ZERO) <= 1);
    }

    #[test]
    fn test_render_draws_idle_and_glowing_dots() {
        let theme = ColorTheme::Neon;
        let mut field = ParticleField::new(FieldTuning::default(), 64.0, 64.0);
        let area = Rect::new(0, 0, 8, 4);

        let mut buf = Buffer::empty(area);
        field.render(area, &mut buf, theme);
        // First particle at (16, 16) px -> column 2, row 1.
        assert_eq!(buf[(2, 1)].symbol(), DOT_GLYPHS[0].to_string());
        let idle = field.tuning().appearance(0.0).opacity;
        assert_eq!(buf[(2, 1)].fg, Rgb::TEXT.over(Rgb::BACKGROUND, idle).color());

        field.on_pointer_move(16.0, 16.0);
        let mut buf = Buffer::empty(area);
        field.render(area, &mut buf, theme);
        assert_eq!(
            buf[(2, 1)].symbol(),
            DOT_GLYPHS[DOT_GLYPHS.len() - 1].to_string()
        );
        let hot = field.tuning().appearance(1.0).opacity;
        assert_eq!(buf[(2, 1)].fg, theme.accent().over(Rgb::BACKGROUND, hot).color());
    }

    #[test]
    fn test_render_scrolled_skips_rows() {
        let field = ParticleField::new(FieldTuning::default(), 64.0, 64.0);
        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        // Rows 1 and 3 hold particles; skipping one row moves them to 0 and 2.
        field.render_scrolled(area, 1, &mut buf, ColorTheme::Neon);
        assert_eq!(buf[(2, 0)].symbol(), DOT_GLYPHS[0].to_string());
        assert_eq!(buf[(2, 2)].symbol(), DOT_GLYPHS[0].to_string());
        assert_eq!(buf[(2, 1)].symbol(), " ");
    }

    #[test]
    fn test_layer_applies_events_and_tears_down() {
        let rt = Runtime::new();
        let mut layer = ParticleLayer::mount(&rt, FieldTuning::default(), 320.0, 160.0);
        assert_eq!(rt.active_frames(), 1);
        assert_eq!(rt.listeners(), 1);

        rt.emit(SurfaceEvent::Resize {
            width: 640.0,
            height: 320.0,
        });
        rt.emit(SurfaceEvent::PointerMove { x: 10.0, y: 20.0 });
        layer.update(Duration::from_millis(17));
        assert_eq!(layer.field().particles().len(), 20 * 10);
        assert_eq!(layer.field().pointer(), (10.0, 20.0));

        rt.emit(SurfaceEvent::PointerLeave);
        layer.update(Duration::ZERO);
        assert_eq!(layer.field().pointer(), POINTER_SENTINEL);

        layer.unmount();
        assert_eq!(rt.active_frames(), 0);
        assert_eq!(rt.listeners(), 0);
    }
}
