use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};

use crate::ops::stats::{category_stats, evaluate_achievements, summary_line};
use crate::tui::app::App;

/// Summary sentence, completion gauge and achievements for the current category
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 || area.width < 2 {
        return;
    }
    let bg = app.theme.background;
    let category = app.category();
    let stats = category_stats(category, &app.store);
    let player = app.store.player_name();
    let inner_x = area.x + 1;
    let inner_w = area.width - 2;

    let summary = Paragraph::new(Line::from(Span::styled(
        summary_line(&player, &stats),
        Style::default().fg(app.theme.text_bright).bg(bg),
    )));
    frame.render_widget(summary, Rect::new(inner_x, area.y, inner_w, 1));

    if area.height > 1 {
        let percent = stats.percent_complete();
        let gauge = Gauge::default()
            .gauge_style(
                Style::default()
                    .fg(app.theme.green)
                    .bg(app.theme.selection_bg),
            )
            .percent(u16::from(percent))
            .label(format!(
                "{}% ({}/{} {})",
                percent,
                stats.counts.complete,
                stats.total(),
                category.verb
            ));
        frame.render_widget(gauge, Rect::new(inner_x, area.y + 1, inner_w, 1));
    }

    if area.height > 2 {
        let mut spans: Vec<Span> = Vec::new();
        for a in evaluate_achievements(&app.catalog, &app.store)
            .iter()
            .filter(|a| a.category == category.id)
        {
            if !spans.is_empty() {
                spans.push(Span::styled("  ", Style::default().bg(bg)));
            }
            if a.earned {
                spans.push(Span::styled(
                    format!("\u{2605} {}", a.name),
                    Style::default()
                        .fg(app.theme.green)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(
                    format!("\u{2606} {} {}/{}", a.name, a.progress, a.target),
                    Style::default().fg(app.theme.dim).bg(bg),
                ));
            }
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
            Rect::new(inner_x, area.y + 2, inner_w, 1),
        );
    }
}
