use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};

use super::helpers::spans_width;

const NAVIGATE_HINTS: &str =
    "click details  double-click advance  f filter  / search  ? help  q quit";
const DETAIL_HINTS: &str = "Space advance  Esc close";
const SEARCH_HINTS: &str = "Enter search  Esc cancel";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = Vec::new();
    let hint = match app.mode {
        Mode::Search => {
            // Search prompt: /pattern▌
            spans.push(Span::styled(
                format!("/{}", app.search_input),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ));
            spans.push(Span::styled(
                "\u{258C}",
                Style::default().fg(app.theme.highlight).bg(bg),
            ));
            Some(SEARCH_HINTS)
        }
        Mode::Navigate => {
            if let Some(msg) = &app.message {
                let color = if msg.is_error {
                    app.theme.red
                } else {
                    app.theme.text
                };
                spans.push(Span::styled(
                    msg.text.clone(),
                    Style::default().fg(color).bg(bg),
                ));
            }
            if !app.show_key_hints {
                None
            } else if app.detail.is_some() {
                Some(DETAIL_HINTS)
            } else if app.message.is_none() {
                Some(NAVIGATE_HINTS)
            } else {
                None
            }
        }
    };

    // Hints right-aligned when they fit
    if let Some(hint) = hint {
        let content_width = spans_width(&spans);
        let hint_width = hint.chars().count();
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
