use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ops::filter::ItemView;
use crate::ops::stats::category_stats;
use crate::tui::app::{App, GridRow, adjust_scroll, build_grid_rows, row_of};
use crate::util::unicode;

use super::push_highlighted_spans;

/// Card size in cells, borders included
pub const CARD_WIDTH: u16 = 20;
pub const CARD_HEIGHT: u16 = 3;

/// Render the item cards of the current category, grouped under headings.
/// Records each drawn card's rectangle for mouse hit-testing.
pub fn render_grid_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let columns = usize::from((area.width / CARD_WIDTH).max(1));
    app.grid_columns = columns;

    let (hits, scroll) = {
        let app: &App = app;
        let items = app.visible_items();
        if items.is_empty() {
            let msg = Paragraph::new(Line::from(Span::styled(
                " no items match",
                Style::default().fg(app.theme.dim).bg(app.theme.background),
            )));
            frame.render_widget(msg, area);
            (Vec::new(), 0)
        } else {
            draw_rows(frame, app, &items, columns, area)
        }
    };
    app.card_hits = hits;
    app.scroll = scroll;
}

fn draw_rows(
    frame: &mut Frame,
    app: &App,
    items: &[ItemView],
    columns: usize,
    area: Rect,
) -> (Vec<(Rect, String)>, usize) {
    let rows = build_grid_rows(items, columns);
    let cursor_row = row_of(&rows, app.cursor).unwrap_or(0);
    let scroll = adjust_scroll(&rows, app.scroll, cursor_row, area.height);
    let stats = category_stats(app.category(), &app.store);
    let search_re = app.active_search_re();

    let mut hits = Vec::new();
    let mut y = area.y;
    for row in &rows[scroll..] {
        let h = row.height();
        if y + h > area.bottom() {
            break;
        }
        match row {
            GridRow::Group { id, name } => {
                let counts = stats
                    .groups
                    .iter()
                    .find(|g| &g.id == id)
                    .map(|g| format!("  {}/{}", g.counts.complete, g.total()))
                    .unwrap_or_default();
                let line = Line::from(vec![
                    Span::styled(
                        format!(" {}", name),
                        Style::default()
                            .fg(app.theme.text_bright)
                            .bg(app.theme.background)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        counts,
                        Style::default().fg(app.theme.dim).bg(app.theme.background),
                    ),
                ]);
                frame.render_widget(Paragraph::new(line), Rect::new(area.x, y, area.width, 1));
            }
            GridRow::Cards { start, end } => {
                for (col, index) in (*start..*end).enumerate() {
                    let rect = Rect::new(
                        area.x + col as u16 * CARD_WIDTH,
                        y,
                        CARD_WIDTH.min(area.width),
                        CARD_HEIGHT,
                    );
                    let view = &items[index];
                    render_card(frame, app, view, index == app.cursor, search_re.as_ref(), rect);
                    hits.push((rect, view.item.id.clone()));
                }
            }
        }
        y += h;
    }
    (hits, scroll)
}

/// One bordered card: check glyph and name, border colored by state
fn render_card(
    frame: &mut Frame,
    app: &App,
    view: &ItemView,
    selected: bool,
    search_re: Option<&regex::Regex>,
    rect: Rect,
) {
    let bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let indicator = view.state.indicator();
    let border_color = if selected {
        app.theme.selection_border
    } else {
        app.theme.indicator_color(indicator)
    };
    let mut border_style = Style::default().fg(border_color).bg(bg);
    if selected {
        border_style = border_style.add_modifier(Modifier::BOLD);
    }

    let inner_width = usize::from(rect.width.saturating_sub(2));
    let glyph = indicator.glyph().unwrap_or(" ");
    let name = unicode::truncate_to_width(&view.item.name, inner_width.saturating_sub(2));

    let mut spans = vec![
        Span::styled(
            glyph,
            Style::default()
                .fg(app.theme.indicator_color(indicator))
                .bg(bg),
        ),
        Span::styled(" ", Style::default().bg(bg)),
    ];
    let text_style = Style::default()
        .fg(if selected {
            app.theme.text_bright
        } else {
            app.theme.state_color(view.state)
        })
        .bg(bg);
    let match_style = Style::default()
        .fg(app.theme.search_match_fg)
        .bg(app.theme.search_match_bg);
    push_highlighted_spans(&mut spans, &name, text_style, match_style, search_re);

    let card = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .style(Style::default().bg(bg)),
        );
    frame.render_widget(card, rect);
}
