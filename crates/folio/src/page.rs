//! Page layout: sections and their revealable blocks in page rows.

use std::time::Duration;

use folio_config::Profile;
use folio_core::{ColorTheme, Rgb, units};
use folio_effects::{Bounds, Direction};
use ratatui::{
    style::{Color, Style, Stylize},
    text::{Line, Span},
};

use crate::form::FORM_HEIGHT;

/// The hero never gets shorter than this, even in tiny terminals.
pub const MIN_HERO_HEIGHT: u16 = 12;
const MAX_CONTENT_WIDTH: u16 = 76;
const SKILL_CARD_WIDTH: u16 = 16;
const SKILL_GUTTER: u16 = 2;
const SECTION_PADDING: u16 = 2;

/// Delay between consecutive items of a list.
const STAGGER: Duration = Duration::from_millis(100);

/// Sections of the page, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Home,
    About,
    Timeline,
    Skills,
    Projects,
    Testimonials,
    Contact,
}

impl SectionId {
    pub const ALL: [SectionId; 7] = [
        SectionId::Home,
        SectionId::About,
        SectionId::Timeline,
        SectionId::Skills,
        SectionId::Projects,
        SectionId::Testimonials,
        SectionId::Contact,
    ];

    /// Short name shown in the navigation bar.
    pub fn label(self) -> &'static str {
        match self {
            SectionId::Home => "Home",
            SectionId::About => "About",
            SectionId::Timeline => "Journey",
            SectionId::Skills => "Skills",
            SectionId::Projects => "Projects",
            SectionId::Testimonials => "Testimonials",
            SectionId::Contact => "Contact",
        }
    }

    fn title(self) -> &'static str {
        match self {
            SectionId::Home => "Home",
            SectionId::About => "About Me",
            SectionId::Timeline => "My Journey",
            SectionId::Skills => "Tech Stack",
            SectionId::Projects => "Featured Projects",
            SectionId::Testimonials => "Kind Words",
            SectionId::Contact => "Get In Touch",
        }
    }

    /// Section for a navigation digit, `1` being the hero.
    pub fn from_digit(digit: char) -> Option<SectionId> {
        let n = digit.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

/// What a block draws.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Static(Vec<Line<'static>>),
    /// The typewriter line in the hero.
    Roles,
    /// The contact form, rendered from live form state.
    ContactForm,
}

/// A rectangle of content that reveals itself as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub top: u16,
    pub left: u16,
    pub width: u16,
    pub height: u16,
    pub content: BlockContent,
    pub direction: Direction,
    pub delay: Duration,
}

impl Block {
    /// Page-space bounds in virtual pixels.
    pub fn bounds(&self) -> Bounds {
        cells_to_bounds(self.left, self.top, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub id: SectionId,
    pub top: u16,
    pub height: u16,
}

impl SectionSpan {
    pub fn bounds(&self, width: u16) -> Bounds {
        cells_to_bounds(0, self.top, width, self.height)
    }
}

/// Convert a cell rectangle to virtual pixels.
pub fn cells_to_bounds(left: u16, top: u16, width: u16, height: u16) -> Bounds {
    Bounds::new(
        left as f32 * units::CELL_WIDTH_PX,
        top as f32 * units::CELL_HEIGHT_PX,
        width as f32 * units::CELL_WIDTH_PX,
        height as f32 * units::CELL_HEIGHT_PX,
    )
}

/// The laid-out page.
///
/// The number and order of blocks depend only on the profile, never on the
/// terminal size or theme, so per-block state can be kept across relayouts.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: u16,
    pub height: u16,
    pub hero_height: u16,
    pub blocks: Vec<Block>,
    pub sections: Vec<SectionSpan>,
}

impl PageLayout {
    pub fn section(&self, id: SectionId) -> Option<&SectionSpan> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Largest scroll offset for a viewport of `view_height` rows.
    pub fn max_scroll(&self, view_height: u16) -> u16 {
        self.height.saturating_sub(view_height)
    }
}

struct Palette {
    accent: Color,
    text: Color,
    muted: Color,
}

impl Palette {
    fn new(theme: ColorTheme) -> Self {
        Self {
            accent: theme.accent().color(),
            text: Rgb::TEXT.color(),
            muted: Rgb::MUTED.color(),
        }
    }
}

struct Builder {
    palette: Palette,
    left: u16,
    width: u16,
    cursor: u16,
    blocks: Vec<Block>,
    sections: Vec<SectionSpan>,
    open: Option<(SectionId, u16)>,
}

impl Builder {
    fn begin(&mut self, id: SectionId) {
        self.end();
        self.open = Some((id, self.cursor));
    }

    fn end(&mut self) {
        if let Some((id, top)) = self.open.take() {
            self.sections.push(SectionSpan {
                id,
                top,
                height: self.cursor - top,
            });
        }
    }

    fn gap(&mut self, rows: u16) {
        self.cursor += rows;
    }

    /// Full content-width block at the cursor.
    fn push(&mut self, content: BlockContent, height: u16, direction: Direction, delay: Duration) {
        self.blocks.push(Block {
            top: self.cursor,
            left: self.left,
            width: self.width,
            height,
            content,
            direction,
            delay,
        });
        self.cursor += height;
    }

    fn push_lines(&mut self, lines: Vec<Line<'static>>, direction: Direction, delay: Duration) {
        let height = lines.len() as u16;
        self.push(BlockContent::Static(lines), height, direction, delay);
    }

    /// Section tag and title.
    fn heading(&mut self, id: SectionId) {
        let index = SectionId::ALL.iter().position(|s| *s == id).unwrap_or(0);
        let lines = vec![
            Line::from(vec![
                Span::styled(format!("{index:02}"), Style::new().fg(self.palette.accent)),
                Span::styled(" ──── ", Style::new().fg(self.palette.accent)),
                Span::styled(id.label().to_uppercase(), Style::new().fg(self.palette.muted)),
            ]),
            Line::from(Span::styled(
                id.title(),
                Style::new().fg(self.palette.text).bold(),
            )),
        ];
        self.push_lines(lines, Direction::Up, Duration::ZERO);
        self.gap(1);
    }
}

/// Lay out the page for a terminal `width` columns wide whose page viewport
/// is `view_height` rows tall.
pub fn layout(
    profile: &Profile,
    theme: ColorTheme,
    width: u16,
    view_height: u16,
    year: i32,
) -> PageLayout {
    let content_width = width.saturating_sub(4).clamp(1, MAX_CONTENT_WIDTH);
    let mut b = Builder {
        palette: Palette::new(theme),
        left: width.saturating_sub(content_width) / 2,
        width: content_width,
        cursor: 0,
        blocks: Vec::new(),
        sections: Vec::new(),
        open: None,
    };

    let hero_height = hero(&mut b, profile, view_height.max(MIN_HERO_HEIGHT));
    about(&mut b, profile);
    timeline(&mut b, profile);
    skills(&mut b, profile);
    projects(&mut b, profile);
    testimonials(&mut b, profile);
    contact(&mut b, profile);
    b.end();
    footer(&mut b, profile, year);

    PageLayout {
        width,
        height: b.cursor + 1,
        hero_height,
        blocks: b.blocks,
        sections: b.sections,
    }
}

fn hero(b: &mut Builder, profile: &Profile, height: u16) -> u16 {
    const CONTENT_ROWS: u16 = 8;
    b.begin(SectionId::Home);
    b.gap(height.saturating_sub(CONTENT_ROWS) / 2);

    let greeting = Line::from(vec![
        Span::styled("Hi, I'm ", Style::new().fg(b.palette.muted)),
        Span::styled(profile.name.clone(), Style::new().fg(b.palette.accent).bold()),
    ])
    .centered();
    b.push_lines(vec![greeting], Direction::Up, Duration::ZERO);
    b.gap(1);
    b.push(BlockContent::Roles, 1, Direction::Up, Duration::from_millis(200));
    b.gap(1);
    let tagline = wrap(&profile.tagline, b.width as usize)
        .into_iter()
        .take(1)
        .map(|l| Line::from(Span::styled(l, Style::new().fg(b.palette.muted))).centered())
        .collect();
    b.push_lines(tagline, Direction::Up, Duration::from_millis(300));
    b.gap(2);
    let hint = Line::from(vec![
        Span::styled("7", Style::new().fg(b.palette.accent).bold()),
        Span::styled(" hire me   ", Style::new().fg(b.palette.muted)),
        Span::styled("↓", Style::new().fg(b.palette.accent).bold()),
        Span::styled(" scroll", Style::new().fg(b.palette.muted)),
    ])
    .centered();
    b.push_lines(vec![hint], Direction::None, Duration::from_millis(500));

    // The hero spans the full height whatever its content took.
    b.cursor = height;
    height
}

fn about(b: &mut Builder, profile: &Profile) {
    b.begin(SectionId::About);
    b.gap(SECTION_PADDING);
    b.heading(SectionId::About);
    for (i, paragraph) in profile.about.iter().enumerate() {
        let lines = wrap(paragraph, b.width as usize)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::new().fg(b.palette.text))))
            .collect();
        b.push_lines(lines, Direction::Up, STAGGER * i as u32);
        b.gap(1);
    }
    b.gap(SECTION_PADDING);
}

fn timeline(b: &mut Builder, profile: &Profile) {
    b.begin(SectionId::Timeline);
    b.gap(SECTION_PADDING);
    b.heading(SectionId::Timeline);
    let inner = b.width.saturating_sub(2) as usize;
    for (i, entry) in profile.timeline.iter().enumerate() {
        let mut lines = vec![Line::from(vec![
            Span::styled("◆ ", Style::new().fg(b.palette.accent)),
            Span::styled(
                truncate(&entry.date, inner),
                Style::new().fg(b.palette.accent),
            ),
        ])];
        let indented = |text: &str, style: Style| {
            wrap(text, inner)
                .into_iter()
                .map(move |l| Line::from(Span::styled(format!("  {l}"), style)))
        };
        lines.extend(indented(&entry.title, Style::new().fg(b.palette.text).bold()));
        lines.extend(indented(&entry.place, Style::new().fg(b.palette.muted)));
        lines.extend(indented(&entry.description, Style::new().fg(b.palette.text)));
        let direction = if i % 2 == 0 {
            Direction::Right
        } else {
            Direction::Left
        };
        b.push_lines(lines, direction, STAGGER * i as u32);
        b.gap(1);
    }
    b.gap(SECTION_PADDING);
}

fn skills(b: &mut Builder, profile: &Profile) {
    b.begin(SectionId::Skills);
    b.gap(SECTION_PADDING);
    b.heading(SectionId::Skills);

    let pitch = SKILL_CARD_WIDTH + SKILL_GUTTER;
    let per_row = ((b.width + SKILL_GUTTER) / pitch).max(1);
    let grid_width = per_row * pitch - SKILL_GUTTER;
    let grid_left = b.left + b.width.saturating_sub(grid_width) / 2;
    let card_width = SKILL_CARD_WIDTH.min(b.width);
    let border = Style::new().fg(b.palette.muted);

    for (i, skill) in profile.skills.iter().enumerate() {
        let (row, col) = (i as u16 / per_row, i as u16 % per_row);
        let inner = card_width.saturating_sub(4) as usize;
        let name = truncate(skill, inner);
        let pad = inner.saturating_sub(name.chars().count()) / 2;
        let body = vec![Line::from(vec![
            Span::raw(" ".repeat(pad)),
            Span::styled(name, Style::new().fg(b.palette.accent).bold()),
        ])];
        b.blocks.push(Block {
            top: b.cursor + row * 3,
            left: grid_left + col * pitch,
            width: card_width,
            height: 3,
            content: BlockContent::Static(boxed(card_width, None, body, border)),
            direction: Direction::Up,
            delay: STAGGER * i as u32,
        });
    }
    let rows = (profile.skills.len() as u16).div_ceil(per_row);
    b.gap(rows * 3);
    b.gap(SECTION_PADDING);
}

fn projects(b: &mut Builder, profile: &Profile) {
    b.begin(SectionId::Projects);
    b.gap(SECTION_PADDING);
    b.heading(SectionId::Projects);
    let inner = b.width.saturating_sub(4) as usize;
    let border = Style::new().fg(b.palette.accent);

    for (i, project) in profile.projects.iter().enumerate() {
        let mut body: Vec<Line<'static>> = wrap(&project.description, inner)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::new().fg(b.palette.text))))
            .collect();
        if !project.tech.is_empty() {
            body.push(Line::default());
            body.push(Line::from(Span::styled(
                truncate(&format!("▸ {}", project.tech.join(" · ")), inner),
                Style::new().fg(b.palette.accent),
            )));
        }
        for (label, url) in [("live", &project.live), ("code", &project.source)] {
            if let Some(url) = url {
                body.push(Line::from(vec![
                    Span::styled(format!("{label}  "), Style::new().fg(b.palette.muted)),
                    Span::styled(
                        truncate(url, inner.saturating_sub(6)),
                        Style::new().fg(b.palette.text).underlined(),
                    ),
                ]));
            }
        }
        let lines = boxed(b.width, Some(&project.title), body, border);
        b.push_lines(lines, Direction::Up, STAGGER * i as u32);
        b.gap(1);
    }
    b.gap(SECTION_PADDING);
}

fn testimonials(b: &mut Builder, profile: &Profile) {
    b.begin(SectionId::Testimonials);
    b.gap(SECTION_PADDING);
    b.heading(SectionId::Testimonials);
    let inner = b.width.saturating_sub(4) as usize;
    let border = Style::new().fg(b.palette.muted);

    for (i, testimonial) in profile.testimonials.iter().enumerate() {
        let mut body: Vec<Line<'static>> = wrap(&format!("“{}”", testimonial.text), inner)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::new().fg(b.palette.text).italic())))
            .collect();
        body.push(Line::default());
        body.push(Line::from(vec![
            Span::styled("— ", Style::new().fg(b.palette.accent)),
            Span::styled(
                truncate(&testimonial.name, inner.saturating_sub(2)),
                Style::new().fg(b.palette.accent).bold(),
            ),
        ]));
        body.push(Line::from(Span::styled(
            truncate(&format!("  {}", testimonial.role), inner),
            Style::new().fg(b.palette.muted),
        )));
        let lines = boxed(b.width, None, body, border);
        b.push_lines(lines, Direction::Up, STAGGER * i as u32);
        b.gap(1);
    }
    b.gap(SECTION_PADDING);
}

fn contact(b: &mut Builder, profile: &Profile) {
    b.begin(SectionId::Contact);
    b.gap(SECTION_PADDING);
    b.heading(SectionId::Contact);

    let intro = wrap(&profile.contact_intro, b.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::new().fg(b.palette.muted))))
        .collect();
    b.push_lines(intro, Direction::Up, Duration::ZERO);
    b.gap(1);

    for (i, link) in profile.contacts.iter().enumerate() {
        let line = Line::from(vec![
            Span::styled(format!("{:<10}", link.label), Style::new().fg(b.palette.muted)),
            Span::styled(
                truncate(&link.value, (b.width as usize).saturating_sub(13)),
                Style::new().fg(b.palette.text),
            ),
            Span::styled("  →", Style::new().fg(b.palette.accent)),
        ]);
        b.push_lines(vec![line], Direction::Left, STAGGER * (i as u32 + 1));
    }
    b.gap(1);
    b.push(
        BlockContent::ContactForm,
        FORM_HEIGHT,
        Direction::Up,
        Duration::from_millis(200),
    );
    b.gap(SECTION_PADDING);
}

fn footer(b: &mut Builder, profile: &Profile, year: i32) {
    let width = b.width as usize;
    let links = profile
        .footer_links
        .iter()
        .map(|l| format!("{} {}", l.label, l.value))
        .collect::<Vec<_>>()
        .join("  ·  ");
    let lines = vec![
        Line::from(Span::styled("─".repeat(width), Style::new().fg(b.palette.muted))),
        Line::from(Span::styled(
            truncate(
                &format!("© {year} {} · {}", profile.name, profile.footer_note),
                width,
            ),
            Style::new().fg(b.palette.muted),
        ))
        .centered(),
        Line::from(Span::styled(truncate(&links, width), Style::new().fg(b.palette.accent)))
            .centered(),
    ];
    b.push_lines(lines, Direction::None, Duration::ZERO);
}

/// Frame `body` in a rounded box `width` columns wide. Body lines must fit in
/// `width - 4` columns.
fn boxed(
    width: u16,
    title: Option<&str>,
    body: Vec<Line<'static>>,
    border: Style,
) -> Vec<Line<'static>> {
    let width = width.max(4) as usize;
    let inner = width - 4;

    let mut top = String::from("╭");
    if let Some(title) = title {
        top.push_str("─ ");
        top.push_str(&truncate(title, width.saturating_sub(6)));
        top.push(' ');
    }
    let fill = (width - 1).saturating_sub(top.chars().count());
    top.push_str(&"─".repeat(fill));
    top.push('╮');

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(Line::from(Span::styled(top, border)));
    for line in body {
        let pad = inner.saturating_sub(line.width());
        let mut spans = vec![Span::styled("│ ", border)];
        spans.extend(line.spans);
        spans.push(Span::raw(" ".repeat(pad)));
        spans.push(Span::styled(" │", border));
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(Span::styled(
        format!("╰{}╯", "─".repeat(width - 2)),
        border,
    )));
    lines
}

/// Greedy word wrap on whitespace. Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if len > 0 {
                lines.push(std::mem::take(&mut current));
                len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }
        let extra = if len == 0 { word.len() } else { word.len() + 1 };
        if len + extra > width {
            lines.push(std::mem::take(&mut current));
            len = 0;
        }
        if len > 0 {
            current.push(' ');
            len += 1;
        }
        current.extend(word.iter());
        len += word.len();
    }
    if len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cut `text` to at most `width` characters, marking the cut with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    if width > 0 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(width: u16, height: u16) -> PageLayout {
        layout(&Profile::default(), ColorTheme::Neon, width, height, 2026)
    }

    #[test]
    fn test_sections_in_order_and_contiguous() {
        let page = page(100, 30);
        let ids: Vec<SectionId> = page.sections.iter().map(|s| s.id).collect();
        assert_eq!(ids, SectionId::ALL.to_vec());

        assert_eq!(page.sections[0].top, 0);
        assert_eq!(page.sections[0].height, 30);
        for pair in page.sections.windows(2) {
            assert_eq!(pair[0].top + pair[0].height, pair[1].top);
        }
        let last = page.sections[page.sections.len() - 1];
        assert!(page.height > last.top + last.height);
    }

    #[test]
    fn test_block_count_is_independent_of_size_and_theme() {
        let a = page(120, 40);
        let b = page(40, 10);
        let c = layout(&Profile::default(), ColorTheme::Violet, 80, 24, 2026);
        assert_eq!(a.blocks.len(), b.blocks.len());
        assert_eq!(a.blocks.len(), c.blocks.len());
        for (x, y) in a.blocks.iter().zip(&b.blocks) {
            assert_eq!(x.direction, y.direction);
            assert_eq!(x.delay, y.delay);
        }
    }

    #[test]
    fn test_hero_has_minimum_height() {
        let page = page(80, 5);
        assert_eq!(page.hero_height, MIN_HERO_HEIGHT);
        assert_eq!(page.section(SectionId::About).map(|s| s.top), Some(MIN_HERO_HEIGHT));
    }

    #[test]
    fn test_blocks_fit_page_width() {
        for width in [30, 60, 80, 140] {
            let page = page(width, 24);
            for block in &page.blocks {
                assert!(block.left + block.width <= width, "{block:?}");
                if let BlockContent::Static(lines) = &block.content {
                    assert_eq!(lines.len() as u16, block.height);
                    for line in lines {
                        assert!(line.width() <= block.width as usize, "{line:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_skills_stagger_and_grid() {
        let page = page(80, 24);
        let skills = page.section(SectionId::Skills).copied().expect("skills");
        let cards: Vec<&Block> = page
            .blocks
            .iter()
            .filter(|b| b.top >= skills.top && b.top < skills.top + skills.height)
            .filter(|b| b.width == SKILL_CARD_WIDTH)
            .collect();
        assert_eq!(cards.len(), Profile::default().skills.len());
        assert_eq!(cards[1].delay - cards[0].delay, STAGGER);
        assert_eq!(cards[0].top, cards[1].top);
    }

    #[test]
    fn test_single_form_and_roles_block() {
        let page = page(80, 24);
        let forms = page
            .blocks
            .iter()
            .filter(|b| b.content == BlockContent::ContactForm)
            .count();
        let roles = page
            .blocks
            .iter()
            .filter(|b| b.content == BlockContent::Roles)
            .count();
        assert_eq!((forms, roles), (1, 1));
    }

    #[test]
    fn test_section_digits() {
        assert_eq!(SectionId::from_digit('1'), Some(SectionId::Home));
        assert_eq!(SectionId::from_digit('7'), Some(SectionId::Contact));
        assert_eq!(SectionId::from_digit('0'), None);
        assert_eq!(SectionId::from_digit('8'), None);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("a  b", 10), vec!["a b"]);
    }

    #[test]
    fn test_boxed_lines_have_equal_width() {
        let body = vec![Line::from("hi"), Line::from("there")];
        let lines = boxed(20, Some("Title"), body, Style::new());
        assert_eq!(lines.len(), 4);
        for line in &lines {
            assert_eq!(line.width(), 20);
        }
    }
}
