use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::app::App;

use super::helpers::centered_rect;

/// Popup with an item's name, group, state and description. Opened by a
/// single click on its card.
pub fn render_detail_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(item_id) = app.detail.as_deref() else {
        return;
    };
    let category = app.category();
    let Ok((group, item)) = category.find_item(item_id) else {
        return;
    };
    let state = app.store.get(&category.id, &item.id);

    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let bg = app.theme.background;
    let label_style = Style::default().fg(app.theme.dim).bg(bg);
    let value_style = Style::default().fg(app.theme.text).bg(bg);
    let state_color = app.theme.state_color(state);

    let mut state_spans = vec![Span::styled("State  ", label_style)];
    if let Some(glyph) = state.indicator().glyph() {
        state_spans.push(Span::styled(
            format!("{} ", glyph),
            Style::default().fg(state_color).bg(bg),
        ));
    }
    state_spans.push(Span::styled(
        category.state_label(state).to_string(),
        Style::default()
            .fg(state_color)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ));

    let mut lines = vec![
        Line::from(state_spans),
        Line::from(vec![
            Span::styled("Group  ", label_style),
            Span::styled(group.name.clone(), value_style),
        ]),
        Line::from(vec![
            Span::styled("ID     ", label_style),
            Span::styled(item.id.clone(), value_style),
        ]),
    ];
    if !item.description.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(item.description.clone(), value_style)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(state_color).bg(bg))
        .title(Span::styled(
            format!(" {} ", item.name),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, popup_area);
}
