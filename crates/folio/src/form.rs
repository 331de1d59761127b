//! Contact form with a simulated submission.

use std::time::Duration;

use folio_core::{ColorTheme, Rgb};
use folio_effects::{Runtime, Timer, caret_visible};
use log::info;
use ratatui::{
    style::{Style, Stylize},
    text::{Line, Span},
};

/// Rows taken by the rendered form.
pub const FORM_HEIGHT: u16 = 11;

/// How long a submission pretends to be in flight.
const SEND_DELAY: Duration = Duration::from_millis(1500);

/// Focusable parts of the form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
    Send,
}

impl Field {
    const ORDER: [Field; 5] = [
        Field::Name,
        Field::Email,
        Field::Subject,
        Field::Message,
        Field::Send,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::Name => "NAME",
            Field::Email => "EMAIL",
            Field::Subject => "SUBJECT",
            Field::Message => "MESSAGE",
            Field::Send => "SEND",
        }
    }

    fn required(self) -> bool {
        matches!(self, Field::Name | Field::Email | Field::Message)
    }
}

/// Submission status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Sending,
    Sent,
}

#[derive(Debug)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    focus: Option<Field>,
    status: Status,
    problem: Option<&'static str>,
    timer: Option<Timer>,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            subject: String::new(),
            message: String::new(),
            focus: None,
            status: Status::Idle,
            problem: None,
            timer: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn focus(&self) -> Option<Field> {
        self.focus
    }

    pub fn is_focused(&self) -> bool {
        self.focus.is_some()
    }

    /// Validation problem from the last submit attempt.
    pub fn problem(&self) -> Option<&'static str> {
        self.problem
    }

    pub fn focus_next(&mut self) {
        self.focus = Some(match self.focus {
            None => Field::ORDER[0],
            Some(f) => {
                let idx = Field::ORDER.iter().position(|o| *o == f).unwrap_or(0);
                Field::ORDER[(idx + 1) % Field::ORDER.len()]
            }
        });
    }

    pub fn focus_prev(&mut self) {
        self.focus = Some(match self.focus {
            None => Field::ORDER[Field::ORDER.len() - 1],
            Some(f) => {
                let idx = Field::ORDER.iter().position(|o| *o == f).unwrap_or(0);
                Field::ORDER[(idx + Field::ORDER.len() - 1) % Field::ORDER.len()]
            }
        });
    }

    pub fn blur(&mut self) {
        self.focus = None;
    }

    fn value_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name => Some(&mut self.name),
            Field::Email => Some(&mut self.email),
            Field::Subject => Some(&mut self.subject),
            Field::Message => Some(&mut self.message),
            Field::Send => None,
        }
    }

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
            Field::Send => "",
        }
    }

    /// Type a character into the focused field.
    pub fn input(&mut self, ch: char) {
        if self.status == Status::Sending {
            return;
        }
        let Some(field) = self.focus else { return };
        if let Some(value) = self.value_mut(field) {
            value.push(ch);
            self.status = Status::Idle;
            self.problem = None;
        }
    }

    pub fn backspace(&mut self) {
        if self.status == Status::Sending {
            return;
        }
        let Some(field) = self.focus else { return };
        if let Some(value) = self.value_mut(field) {
            value.pop();
        }
    }

    /// Submit the form. Returns whether a submission started.
    pub fn submit(&mut self, runtime: &Runtime) -> bool {
        if self.status == Status::Sending {
            return false;
        }
        if let Some(missing) = Field::ORDER
            .into_iter()
            .find(|f| f.required() && self.value(*f).trim().is_empty())
        {
            self.problem = Some(match missing {
                Field::Name => "Please enter your name.",
                Field::Email => "Please enter your email.",
                _ => "Please write a message.",
            });
            return false;
        }
        if !self.email.contains('@') {
            self.problem = Some("That email address does not look right.");
            return false;
        }

        info!("contact form: sending message from {}", self.email);
        self.problem = None;
        self.status = Status::Sending;
        self.timer = Some(runtime.set_timeout(SEND_DELAY));
        true
    }

    /// Complete a pending submission once its delay has elapsed.
    pub fn poll(&mut self) {
        if self.timer.as_ref().is_some_and(Timer::fired) {
            self.timer = None;
            self.status = Status::Sent;
            self.name.clear();
            self.email.clear();
            self.subject.clear();
            self.message.clear();
            self.focus = None;
            info!("contact form: message sent");
        }
    }

    /// Drop any pending submission timer.
    pub fn unmount(&mut self) {
        self.timer = None;
    }

    /// Render the form into exactly [`FORM_HEIGHT`] lines.
    pub fn lines(&self, theme: ColorTheme, width: u16, now: Duration) -> Vec<Line<'static>> {
        let accent = theme.accent().color();
        let text = Rgb::TEXT.color();
        let muted = Rgb::MUTED.color();
        let pink = ColorTheme::Pink.accent().color();
        let value_width = (width as usize).saturating_sub(3);

        let mut lines = Vec::with_capacity(FORM_HEIGHT as usize);
        for field in [Field::Name, Field::Email, Field::Subject, Field::Message] {
            let focused = self.focus == Some(field);
            let mut label = vec![Span::styled(
                field.label(),
                Style::new().fg(if focused { accent } else { muted }),
            )];
            if field.required() {
                label.push(Span::styled(" *", Style::new().fg(pink)));
            }
            lines.push(Line::from(label));

            let value = tail(self.value(field), value_width);
            let mut row = vec![
                Span::styled("› ", Style::new().fg(if focused { accent } else { muted })),
                Span::styled(value, Style::new().fg(text)),
            ];
            if focused && caret_visible(now) {
                row.push(Span::styled(folio_effects::CARET.to_string(), Style::new().fg(accent)));
            }
            lines.push(Line::from(row));
        }

        lines.push(Line::default());

        let button = match self.status {
            Status::Idle => "[ Send Message → ]",
            Status::Sending => "[ Sending… ]",
            Status::Sent => "[ ✓ Sent ]",
        };
        let button_style = if self.focus == Some(Field::Send) {
            Style::new().fg(Rgb::BACKGROUND.color()).bg(accent).bold()
        } else {
            Style::new().fg(accent).bold()
        };
        lines.push(Line::from(Span::styled(button, button_style)));

        let note = match (self.problem(), self.status()) {
            (Some(problem), _) => Span::styled(problem, Style::new().fg(pink)),
            (None, Status::Sent) => {
                Span::styled("Message sent. I'll get back to you soon.", Style::new().fg(accent))
            }
            (None, _) => Span::styled("Tab to focus · Enter to send", Style::new().fg(muted)),
        };
        lines.push(Line::from(note));
        lines
    }
}

/// Last `width` characters of `value`.
fn tail(value: &str, width: usize) -> String {
    let count = value.chars().count();
    value.chars().skip(count.saturating_sub(width)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(form: &mut ContactForm, text: &str) {
        for ch in text.chars() {
            form.input(ch);
        }
    }

    #[test]
    fn test_focus_cycles_in_tab_order() {
        let mut form = ContactForm::new();
        assert_eq!(form.focus(), None);
        form.focus_next();
        assert_eq!(form.focus(), Some(Field::Name));
        for _ in 0..4 {
            form.focus_next();
        }
        assert_eq!(form.focus(), Some(Field::Send));
        form.focus_next();
        assert_eq!(form.focus(), Some(Field::Name));
        form.focus_prev();
        assert_eq!(form.focus(), Some(Field::Send));
    }

    #[test]
    fn test_missing_fields_block_submit() {
        let rt = Runtime::new();
        let mut form = ContactForm::new();
        assert!(!form.submit(&rt));
        assert_eq!(form.status(), Status::Idle);
        assert_eq!(form.problem(), Some("Please enter your name."));
        assert_eq!(rt.pending_timers(), 0);

        form.focus_next();
        fill(&mut form, "Ada");
        form.focus_next();
        fill(&mut form, "ada.example.com");
        form.focus_next();
        form.focus_next();
        fill(&mut form, "Hello");
        assert!(!form.submit(&rt));
        assert_eq!(
            form.problem(),
            Some("That email address does not look right.")
        );
    }

    #[test]
    fn test_submit_sends_after_delay() {
        let rt = Runtime::new();
        let mut form = ContactForm::new();
        form.focus_next();
        fill(&mut form, "Ada");
        form.focus_next();
        fill(&mut form, "ada@example.com");
        form.focus_next();
        form.focus_next();
        fill(&mut form, "Hi there");

        assert!(form.submit(&rt));
        assert_eq!(form.status(), Status::Sending);
        assert!(!form.submit(&rt));

        // Typing is ignored while sending.
        form.input('x');
        assert_eq!(form.message, "Hi there");

        rt.advance(Duration::from_millis(1499));
        form.poll();
        assert_eq!(form.status(), Status::Sending);

        rt.advance(Duration::from_millis(1));
        form.poll();
        assert_eq!(form.status(), Status::Sent);
        assert!(form.name.is_empty() && form.message.is_empty());
        assert_eq!(rt.pending_timers(), 0);
    }

    #[test]
    fn test_backspace_and_unmount() {
        let rt = Runtime::new();
        let mut form = ContactForm::new();
        form.focus_next();
        fill(&mut form, "Ab");
        form.backspace();
        assert_eq!(form.name, "A");

        form.email = "a@b".into();
        form.message = "m".into();
        assert!(form.submit(&rt));
        assert_eq!(rt.pending_timers(), 1);
        form.unmount();
        assert_eq!(rt.pending_timers(), 0);
    }

    #[test]
    fn test_lines_have_fixed_height() {
        let mut form = ContactForm::new();
        assert_eq!(
            form.lines(ColorTheme::Neon, 40, Duration::ZERO).len(),
            FORM_HEIGHT as usize
        );
        form.focus_next();
        fill(&mut form, &"x".repeat(100));
        let lines = form.lines(ColorTheme::Neon, 40, Duration::ZERO);
        assert_eq!(lines.len(), FORM_HEIGHT as usize);
        assert!(lines[1].width() <= 40);
    }

    #[test]
    fn test_tail() {
        assert_eq!(tail("hello", 3), "llo");
        assert_eq!(tail("hi", 10), "hi");
    }
}
