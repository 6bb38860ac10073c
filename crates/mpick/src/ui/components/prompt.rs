//! Filter prompt with a transient notice line.

use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::host::{Notice, NoticeLevel};

const NOTICE_TTL: Duration = Duration::from_secs(6);

/// Query typed by the user plus the most recent host notice.
#[derive(Debug, Default, Clone)]
pub struct PromptState {
    input: String,
    message: Option<PromptMessage>,
}

impl PromptState {
    /// Access the current query.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Append a character to the query.
    pub fn push_char(&mut self, ch: char) {
        self.input.push(ch);
    }

    /// Remove the most recently appended character if present.
    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Drop the whole query.
    pub fn clear(&mut self) {
        self.input.clear();
    }

    /// Show `notice` beneath the query. Errors outrank pending info messages.
    pub fn show_notice(&mut self, notice: Notice) {
        if let Some(current) = &self.message
            && current.level == NoticeLevel::Error
            && notice.level == NoticeLevel::Info
            && !current.is_expired()
        {
            return;
        }
        self.message = Some(PromptMessage::new(notice.level, notice.text));
    }

    /// Text of the displayed notice, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|message| message.text.as_str())
    }

    /// Retain only messages that have not expired.
    pub fn purge_expired_messages(&mut self) {
        if let Some(message) = &self.message
            && message.is_expired()
        {
            self.message = None;
        }
    }
}

/// Renders the prompt line and the notice line.
#[derive(Debug, Default)]
pub struct Prompt;

impl Prompt {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, state: &PromptState) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let prompt = Line::from(vec![
            Span::styled("› ", Style::default().fg(Color::Cyan)),
            Span::styled(state.input().to_owned(), Style::default().fg(Color::White)),
            Span::styled("▏", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(prompt), layout[0]);

        if let Some(message) = &state.message {
            let style = match message.level {
                NoticeLevel::Info => Style::default().fg(Color::Gray),
                NoticeLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            };
            frame.render_widget(
                Paragraph::new(Line::styled(message.text.clone(), style)),
                layout[1],
            );
        }
    }
}

#[derive(Debug, Clone)]
struct PromptMessage {
    level: NoticeLevel,
    text: String,
    expires_at: Instant,
}

impl PromptMessage {
    fn new(level: NoticeLevel, text: String) -> Self {
        Self {
            level,
            text,
            expires_at: Instant::now() + NOTICE_TTL,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(level: NoticeLevel, text: &str) -> Notice {
        Notice {
            level,
            text: text.into(),
        }
    }

    #[test]
    fn editing_the_query() {
        let mut state = PromptState::default();
        for ch in "readme".chars() {
            state.push_char(ch);
        }
        state.pop_char();
        assert_eq!(state.input(), "readm");
        state.clear();
        assert_eq!(state.input(), "");
    }

    #[test]
    fn errors_are_not_hidden_by_info() {
        let mut state = PromptState::default();
        state.show_notice(notice(NoticeLevel::Error, "git failed"));
        state.show_notice(notice(NoticeLevel::Info, "no active editor"));
        assert_eq!(state.message(), Some("git failed"));

        state.show_notice(notice(NoticeLevel::Error, "second failure"));
        assert_eq!(state.message(), Some("second failure"));
    }
}
