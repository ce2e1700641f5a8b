use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::filter::StateFilter;
use crate::ops::stats::category_stats;
use crate::tui::app::App;

use super::helpers::spans_width;

/// Render the tab bar: one tab per category, with separator line below.
/// Records the tab rectangles for mouse hit-testing.
pub fn render_tab_bar(frame: &mut Frame, app: &mut App, area: Rect) {
    // Split into tab row and separator row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let (sep_cols, hits) = render_tabs(frame, app, chunks[0]);
    app.tab_hits = hits;
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the separator columns and each tab's rectangle.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> (Vec<usize>, Vec<(Rect, usize)>) {
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let mut hits: Vec<(Rect, usize)> = Vec::new();
    let bg = app.theme.background;
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    // Leading icon
    spans.push(Span::styled(" ", Style::default().bg(bg)));
    spans.push(Span::styled(
        "\u{25C6}",
        Style::default().fg(app.theme.green).bg(bg),
    ));
    spans.push(Span::styled(" ", Style::default().bg(bg)));

    for (i, category) in app.catalog.categories.values().enumerate() {
        let stats = category_stats(category, &app.store);
        let label = format!(" {} {}% ", category.name, stats.percent_complete());
        let start = spans_width(&spans);
        spans.push(Span::styled(label, tab_style(app, i == app.current)));
        let end = spans_width(&spans);

        let x = area.x.saturating_add(start as u16);
        if x < area.right() {
            let width = (end - start) as u16;
            hits.push((Rect::new(x, area.y, width.min(area.right() - x), 1), i));
        }
        sep_cols.push(end);
        spans.push(sep.clone());
    }

    let tabs = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(tabs, area);
    (sep_cols, hits)
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let bg = app.theme.background;
    let dim = app.theme.dim;

    // Active filter and search, right-aligned
    let mut indicator_spans: Vec<Span> = Vec::new();
    if app.filter.is_active() {
        indicator_spans.push(Span::styled(
            "filter: ",
            Style::default().fg(app.theme.purple).bg(bg),
        ));
        let color = match app.filter {
            StateFilter::Only(state) => app.theme.state_color(state),
            _ => app.theme.text,
        };
        indicator_spans.push(Span::styled(
            app.filter.label(app.category()),
            Style::default().fg(color).bg(bg),
        ));
    }
    if let Some(pattern) = &app.last_search {
        if !indicator_spans.is_empty() {
            indicator_spans.push(Span::styled(" ", Style::default().bg(bg)));
        }
        indicator_spans.push(Span::styled(
            format!("/{}", pattern),
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }

    let indicator_width = spans_width(&indicator_spans);
    // +2: one space before indicator, one space after (right edge buffer)
    let separator_end = if indicator_spans.is_empty() {
        width
    } else {
        width.saturating_sub(indicator_width + 2)
    };

    let mut sep_text = String::with_capacity(separator_end * 3);
    for col in 0..separator_end {
        if sep_cols.contains(&col) {
            sep_text.push('\u{2534}');
        } else {
            sep_text.push('\u{2500}');
        }
    }

    let mut spans = vec![Span::styled(sep_text, Style::default().fg(dim).bg(bg))];
    if !indicator_spans.is_empty() {
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        spans.extend(indicator_spans);
    }

    let sep_widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}
