//! Navigation bar and active-section tracking.

use folio_core::{ColorTheme, Rgb};
use folio_effects::{Bounds, Glitch, GlitchLayer};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::Widget,
};

use crate::page::{SectionId, SectionSpan};

/// Share of a section (or of the viewport, for tall sections) that must be
/// visible for it to become active.
pub const ACTIVE_THRESHOLD: f32 = 0.4;

/// Pick the active section for the given page viewport. Sections taller than
/// the viewport are measured against the viewport instead. Keeps `current`
/// when nothing crosses the threshold.
pub fn active_section(
    sections: &[SectionSpan],
    width: u16,
    viewport: Bounds,
    current: SectionId,
) -> SectionId {
    let view_area = viewport.width * viewport.height;
    let mut best: Option<(SectionId, f32)> = None;
    for span in sections {
        let bounds = span.bounds(width);
        let area = (bounds.width * bounds.height).min(view_area);
        if area <= 0.0 {
            continue;
        }
        let ratio = bounds.overlap_area(&viewport) / area;
        if ratio >= ACTIVE_THRESHOLD && best.is_none_or(|(_, r)| ratio > r) {
            best = Some((span.id, ratio));
        }
    }
    best.map_or(current, |(id, _)| id)
}

/// The top bar: owner mark, numbered section links and a call to action.
#[derive(Debug)]
pub struct NavBar<'a> {
    pub name: &'a str,
    pub theme: ColorTheme,
    pub active: SectionId,
    pub glitch: &'a Glitch,
}

/// The owner's first name, with glitch noise drawn over it.
fn logo(first: &str, glitch: &Glitch) -> Vec<Span<'static>> {
    let plain = Style::new().fg(Rgb::TEXT.color()).bold();
    first
        .chars()
        .zip(glitch.noise(first))
        .map(|(ch, noise)| match noise {
            None => Span::styled(ch.to_string(), plain),
            Some((glyph, layer)) => {
                let color = match layer {
                    GlitchLayer::Pink => ColorTheme::Pink.accent(),
                    GlitchLayer::Cyan => ColorTheme::Cyan.accent(),
                };
                Span::styled(glyph.to_string(), Style::new().fg(color.color()).bold())
            }
        })
        .collect()
}

impl Widget for NavBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let accent = self.theme.accent().color();
        let muted = Rgb::MUTED.color();
        let first = self.name.split_whitespace().next().unwrap_or(self.name);

        let mut spans = logo(first, self.glitch);
        spans.push(Span::styled(".", Style::new().fg(accent).bold()));
        spans.push(Span::raw("   "));
        for (i, id) in SectionId::ALL.into_iter().enumerate() {
            let style = if id == self.active {
                Style::new().fg(accent).bold().underlined()
            } else {
                Style::new().fg(muted)
            };
            spans.push(Span::styled(format!("{}", i + 1), Style::new().fg(accent)));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(id.label(), style));
            spans.push(Span::raw("  "));
        }
        Line::from(spans).render(area, buf);

        let hire = Line::from(vec![
            Span::styled("7", Style::new().fg(accent).bold()),
            Span::styled(" Hire Me ", Style::new().fg(accent)),
        ])
        .right_aligned();
        if area.width >= 100 {
            hire.render(area, buf);
        }
    }
}
