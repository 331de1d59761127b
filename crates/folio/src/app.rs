use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{Datelike, Local};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use folio_config::Config;
use folio_core::{Rgb, units};
use folio_effects::{
    CARET, FieldTuning, Glitch, ParticleLayer, Reveal, RoleCycler, Runtime, SurfaceEvent,
    caret_visible,
};
use log::{debug, info, warn};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
};

use crate::form::{ContactForm, Field, Status};
use crate::nav::{NavBar, active_section};
use crate::page::{self, BlockContent, PageLayout, SectionId, cells_to_bounds};

/// Upper bound on the wait for input, which also paces the frames.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Rate at which the scroll position closes on its target, per second.
const SCROLL_EASE: f32 = 14.0;

/// Rows moved per mouse wheel notch.
const WHEEL_ROWS: i32 = 3;

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    /// Where theme and speed changes are saved, if anywhere.
    config_path: Option<PathBuf>,
    /// Animation time, scaled by the animation speed.
    runtime: Runtime,
    /// Wall time, for timers the animation speed must not stretch.
    clock: Runtime,
    particles: Option<ParticleLayer>,
    roles: RoleCycler,
    logo: Glitch,
    form: ContactForm,
    /// Laid out on first render and whenever the viewport changes size.
    page: Option<PageLayout>,
    /// One reveal per page block, in block order.
    reveals: Vec<Reveal>,
    /// Current scroll offset in rows, eased towards `scroll_target`.
    scroll: f32,
    scroll_target: f32,
    /// Screen area of the page viewport.
    view: Rect,
    active: SectionId,
    pointer_in_hero: bool,
    show_help: bool,
    last_tick: Instant,
    year: i32,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let runtime = if config.settings.reveal {
            Runtime::new()
        } else {
            Runtime::without_intersection()
        };
        let roles = RoleCycler::new(config.profile.roles.clone());
        Self {
            running: false,
            config,
            config_path,
            runtime,
            clock: Runtime::new(),
            particles: None,
            roles,
            logo: Glitch::new(),
            form: ContactForm::new(),
            page: None,
            reveals: Vec::new(),
            scroll: 0.0,
            scroll_target: 0.0,
            view: Rect::default(),
            active: SectionId::Home,
            pointer_in_hero: false,
            show_help: true,
            last_tick: Instant::now(),
            year: Local::now().year(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        self.roles.mount(&self.runtime);
        self.logo.mount(&self.runtime);
        self.last_tick = Instant::now();
        while self.running {
            self.tick();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        self.unmount();
        Ok(())
    }

    /// Advance every animation by the wall-clock time since the last tick.
    fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now - self.last_tick;
        self.last_tick = now;

        self.ease_scroll(elapsed);
        self.advance(elapsed);
    }

    /// Advance by `elapsed` wall time. The effects see it scaled by the
    /// animation speed.
    fn advance(&mut self, elapsed: Duration) {
        self.clock.advance(elapsed);
        self.form.poll();

        let dt = self.config.settings.animation_speed.scale(elapsed);
        self.runtime.advance(dt);
        let viewport = cells_to_bounds(0, self.scroll_row(), self.view.width, self.view.height);
        self.runtime.set_viewport(viewport);

        if let Some(layer) = &mut self.particles {
            layer.update(dt);
        }
        self.roles.poll(&self.runtime);
        self.logo.poll(&self.runtime);
        for reveal in &mut self.reveals {
            reveal.poll(&self.runtime);
        }

        if let Some(page) = &self.page {
            self.active = active_section(&page.sections, page.width, viewport, self.active);
        }
    }

    fn ease_scroll(&mut self, elapsed: Duration) {
        let remaining = self.scroll_target - self.scroll;
        if remaining.abs() < 0.5 {
            self.scroll = self.scroll_target;
            return;
        }
        let t = 1.0 - (-SCROLL_EASE * elapsed.as_secs_f32()).exp();
        self.scroll += remaining * t;
    }

    fn scroll_row(&self) -> u16 {
        self.scroll.round().max(0.0) as u16
    }

    fn max_scroll(&self) -> u16 {
        self.page
            .as_ref()
            .map_or(0, |page| page.max_scroll(self.view.height))
    }

    /// Set the scroll target, clamped to the page.
    fn scroll_to(&mut self, row: i32) {
        self.scroll_target = row.clamp(0, self.max_scroll() as i32) as f32;
    }

    fn scroll_by(&mut self, rows: i32) {
        self.scroll_to(self.scroll_target.round() as i32 + rows);
    }

    fn jump_to(&mut self, id: SectionId) {
        let top = self
            .page
            .as_ref()
            .and_then(|page| page.section(id))
            .map_or(0, |span| span.top);
        debug!("jump to {id:?} at row {top}");
        self.scroll_to(top as i32);
    }

    /// Rebuild the layout if the viewport changed size or the page is stale.
    fn relayout(&mut self, view: Rect) {
        let resized = self.view.width != view.width || self.view.height != view.height;
        self.view = view;
        if !resized && self.page.is_some() {
            return;
        }

        let settings = &self.config.settings;
        let page = page::layout(
            &self.config.profile,
            settings.color_theme,
            view.width,
            view.height,
            self.year,
        );
        debug!(
            "layout {}x{}: {} rows, {} blocks",
            view.width,
            view.height,
            page.height,
            page.blocks.len()
        );

        if self.reveals.len() == page.blocks.len() {
            for (reveal, block) in self.reveals.iter().zip(&page.blocks) {
                reveal.relayout(block.bounds());
            }
        } else {
            self.reveals = page
                .blocks
                .iter()
                .map(|block| {
                    let mut reveal = Reveal::new(block.direction, block.delay);
                    reveal.mount(&self.runtime, block.bounds());
                    reveal
                })
                .collect();
        }

        let (width, height) = units::area_px(view.width, page.hero_height);
        if self.particles.is_some() {
            self.runtime.emit(SurfaceEvent::Resize { width, height });
        } else if settings.particles {
            let tuning = FieldTuning {
                spacing: settings.particle_spacing,
                ..FieldTuning::default()
            };
            self.particles = Some(ParticleLayer::mount(&self.runtime, tuning, width, height));
        }

        self.page = Some(page);
        let max = self.max_scroll() as f32;
        self.scroll_target = self.scroll_target.min(max);
        self.scroll = self.scroll.min(max);
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let help_rows = u16::from(self.show_help);
        let [nav, view, help] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(help_rows),
        ])
        .areas(area);

        frame
            .buffer_mut()
            .set_style(area, Style::new().bg(Rgb::BACKGROUND.color()));

        self.relayout(view);
        self.render_page(frame, view);

        frame.render_widget(
            NavBar {
                name: &self.config.profile.name,
                theme: self.config.settings.color_theme,
                active: self.active,
                glitch: &self.logo,
            },
            nav,
        );

        if self.show_help {
            frame.render_widget(self.help_line(), help);
        }
    }

    /// Render the visible slice of the page into `view`.
    fn render_page(&self, frame: &mut Frame, view: Rect) {
        let Some(page) = &self.page else {
            return;
        };
        let theme = self.config.settings.color_theme;
        let scroll = self.scroll_row();
        let now = self.runtime.now();

        if let Some(layer) = &self.particles {
            if scroll < page.hero_height {
                let rows = (page.hero_height - scroll).min(view.height);
                layer.render(Rect { height: rows, ..view }, scroll, frame.buffer_mut(), theme);
            }
        }

        let top = scroll as i32;
        let bottom = top + view.height as i32;
        for (block, reveal) in page.blocks.iter().zip(&self.reveals) {
            let look = reveal.frame(now);
            if look.is_invisible() {
                continue;
            }
            let (dx, dy) = look.offset_cells();
            let block_top = block.top as i32 + dy;
            if block_top >= bottom || block_top + block.height as i32 <= top {
                continue;
            }

            let x = (view.x as i32 + block.left as i32 + dx).max(view.x as i32);
            let width = (block.width as i32).min(view.right() as i32 - x);
            if width <= 0 {
                continue;
            }

            for (i, line) in self.block_lines(&block.content, block.width).into_iter().enumerate() {
                let row = block_top + i as i32;
                if row < top || row >= bottom {
                    continue;
                }
                let rect = Rect::new(
                    x as u16,
                    view.y + (row - top) as u16,
                    width as u16,
                    1,
                );
                frame.render_widget(look.apply(line), rect);
            }
        }
    }

    fn block_lines(&self, content: &BlockContent, width: u16) -> Vec<Line<'static>> {
        let theme = self.config.settings.color_theme;
        let now = self.runtime.now();
        match content {
            BlockContent::Static(lines) => lines.clone(),
            BlockContent::Roles => {
                let accent = theme.accent().color();
                let caret = if caret_visible(now) { CARET } else { ' ' };
                vec![
                    Line::from(vec![
                        Span::styled("> ", Style::new().fg(accent)),
                        Span::styled(
                            self.roles.text().to_string(),
                            Style::new().fg(Rgb::TEXT.color()).bold(),
                        ),
                        Span::styled(caret.to_string(), Style::new().fg(accent)),
                    ])
                    .centered(),
                ]
            }
            BlockContent::ContactForm => self.form.lines(theme, width, now),
        }
    }

    fn help_line(&self) -> Line<'static> {
        let color = self.config.settings.color_theme.accent().color();
        if self.form.status() == Status::Sending {
            return Line::from("sending…".fg(color)).centered();
        }
        if self.form.is_focused() {
            return Line::from(vec![
                "tab".bold().fg(color),
                " next  ".dark_gray(),
                "shift-tab".bold().fg(color),
                " back  ".dark_gray(),
                "enter".bold().fg(color),
                " send  ".dark_gray(),
                "esc".bold().fg(color),
                " leave form".dark_gray(),
            ])
            .centered();
        }
        Line::from(vec![
            "q".bold().fg(color),
            " quit  ".dark_gray(),
            "j/k".bold().fg(color),
            " scroll  ".dark_gray(),
            "1-7".bold().fg(color),
            " jump  ".dark_gray(),
            "tab".bold().fg(color),
            " contact form  ".dark_gray(),
            "c".bold().fg(color),
            format!(" {}  ", self.config.settings.color_theme.name()).dark_gray(),
            "s".bold().fg(color),
            " speed  ".dark_gray(),
            "?".bold().fg(color),
            " hide help".dark_gray(),
        ])
        .centered()
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most one frame, then drains whatever else is queued.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let mut timeout = FRAME_INTERVAL;
        while event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(_, _) => {}
                _ => {}
            }
            timeout = Duration::ZERO;
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        if let (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) =
            (key.modifiers, key.code)
        {
            self.quit();
            return;
        }
        if self.form.is_focused() && self.on_form_key(key) {
            return;
        }

        let page_rows = self.view.height.saturating_sub(2).max(1) as i32;
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q')) => self.quit(),
            (_, KeyCode::Char('c')) => self.cycle_color_theme(),
            (_, KeyCode::Char('s')) => self.cycle_speed(),
            (_, KeyCode::Char('?')) => self.show_help = !self.show_help,
            (_, KeyCode::Down | KeyCode::Char('j')) => self.scroll_by(1),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.scroll_by(-1),
            (_, KeyCode::PageDown | KeyCode::Char(' ')) => self.scroll_by(page_rows),
            (_, KeyCode::PageUp) => self.scroll_by(-page_rows),
            (_, KeyCode::Home) => self.scroll_to(0),
            (_, KeyCode::End) => self.scroll_to(self.max_scroll() as i32),
            (_, KeyCode::Tab) => {
                self.jump_to(SectionId::Contact);
                self.form.focus_next();
            }
            (_, KeyCode::BackTab) => {
                self.jump_to(SectionId::Contact);
                self.form.focus_prev();
            }
            (_, KeyCode::Char(digit)) => {
                if let Some(id) = SectionId::from_digit(digit) {
                    self.jump_to(id);
                }
            }
            _ => {}
        }
    }

    /// Keys while a form field has focus. Returns whether the key was used.
    fn on_form_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => self.form.blur(),
            KeyCode::Tab => self.form.focus_next(),
            KeyCode::BackTab => self.form.focus_prev(),
            KeyCode::Enter => match self.form.focus() {
                Some(Field::Send) => {
                    self.form.submit(&self.clock);
                }
                _ => self.form.focus_next(),
            },
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.input(ch)
            }
            _ => return false,
        }
        true
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.on_pointer(mouse.column, mouse.row)
            }
            MouseEventKind::ScrollDown => self.scroll_by(WHEEL_ROWS),
            MouseEventKind::ScrollUp => self.scroll_by(-WHEEL_ROWS),
            _ => {}
        }
    }

    /// Forward the pointer to the particle field while it is over the hero.
    fn on_pointer(&mut self, col: u16, row: u16) {
        let hero_height = self.page.as_ref().map_or(0, |page| page.hero_height);
        let view = self.view;
        let inside = col >= view.x && col < view.right() && row >= view.y && row < view.bottom();
        if inside {
            let page_row = row - view.y + self.scroll_row();
            if page_row < hero_height {
                self.runtime.emit(SurfaceEvent::PointerMove {
                    x: units::col_center_px(col - view.x),
                    y: units::row_center_px(page_row),
                });
                self.pointer_in_hero = true;
                return;
            }
        }
        if self.pointer_in_hero {
            self.runtime.emit(SurfaceEvent::PointerLeave);
            self.pointer_in_hero = false;
        }
    }

    /// Cycle through available color themes.
    fn cycle_color_theme(&mut self) {
        let settings = &mut self.config.settings;
        settings.color_theme = settings.color_theme.next();
        info!("color theme: {}", settings.color_theme.name());
        // Colours are baked into the laid-out lines.
        self.page = None;
        self.save_settings();
    }

    fn cycle_speed(&mut self) {
        let settings = &mut self.config.settings;
        settings.animation_speed = settings.animation_speed.next();
        info!("animation speed: {:?}", settings.animation_speed);
        self.save_settings();
    }

    fn save_settings(&self) {
        if let Some(path) = &self.config_path {
            if let Err(err) = self.config.save_to(path) {
                warn!("could not save settings: {err}");
            }
        }
    }

    /// Release every runtime handle.
    fn unmount(&mut self) {
        if let Some(layer) = self.particles.take() {
            layer.unmount();
        }
        self.roles.unmount();
        self.logo.unmount();
        self.form.unmount();
        self.reveals.clear();
        debug!(
            "unmounted: {} timers, {} frames, {} listeners, {} observers left",
            self.runtime.pending_timers() + self.clock.pending_timers(),
            self.runtime.active_frames(),
            self.runtime.listeners(),
            self.runtime.observers()
        );
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
