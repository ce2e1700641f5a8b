use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::helpers::centered_rect;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(70, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let verb = app.category().verb.as_str();
    let advance_desc = format!("Advance ({})", app.category().states.join(" \u{2192} "));

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Mouse", header_style)));
    add_binding(&mut lines, " click", "Show details", key_style, desc_style);
    add_binding(&mut lines, " double-click", &advance_desc, key_style, desc_style);
    add_binding(&mut lines, " wheel", "Scroll", key_style, desc_style);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Keys", header_style)));
    add_binding(
        &mut lines,
        " \u{2190}\u{2191}\u{2193}\u{2192}/hjkl",
        "Move",
        key_style,
        desc_style,
    );
    add_binding(&mut lines, " Enter", "Show details", key_style, desc_style);
    add_binding(&mut lines, " Space", &advance_desc, key_style, desc_style);
    add_binding(&mut lines, " Tab/1-9", "Switch category", key_style, desc_style);
    add_binding(
        &mut lines,
        " f",
        &format!("Filter: all, not {}, by state", verb),
        key_style,
        desc_style,
    );
    add_binding(&mut lines, " /", "Search names", key_style, desc_style);
    add_binding(&mut lines, " Esc", "Close / clear search", key_style, desc_style);
    add_binding(&mut lines, " ?", "Toggle this help", key_style, desc_style);
    add_binding(&mut lines, " q", "Quit", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .title(Span::styled(" Key Bindings ", header_style))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &str,
    desc: &str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc.to_string(), desc_style),
    ]));
}
