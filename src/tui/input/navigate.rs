use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode, build_grid_rows, move_vertical};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    if app.detail.is_some() {
        handle_detail(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('?') => app.show_help = true,

        KeyCode::Esc => {
            if app.last_search.take().is_some() {
                app.cursor = 0;
            }
        }

        // Categories
        KeyCode::Tab => app.next_category(),
        KeyCode::BackTab => app.prev_category(),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.switch_category(index);
        }

        // Cursor
        KeyCode::Left | KeyCode::Char('h') => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.cursor += 1;
            app.clamp_cursor();
        }
        KeyCode::Up | KeyCode::Char('k') => move_row(app, false),
        KeyCode::Down | KeyCode::Char('j') => move_row(app, true),
        KeyCode::Home | KeyCode::Char('g') => app.cursor = 0,
        KeyCode::End | KeyCode::Char('G') => {
            let last = app.visible_items().len().saturating_sub(1);
            app.cursor = last;
        }

        // Same actions as a single and a double click on the card
        KeyCode::Enter => {
            if let Some(id) = app.cursor_item_id() {
                app.open_detail(&id);
            }
        }
        KeyCode::Char(' ') => {
            if let Some(id) = app.cursor_item_id() {
                app.advance_item(&id);
            }
        }

        KeyCode::Char('f') => {
            app.filter = app.filter.cycle();
            app.cursor = 0;
            app.scroll = 0;
        }
        KeyCode::Char('/') => {
            app.mode = Mode::Search;
            app.search_input = app.last_search.clone().unwrap_or_default();
            app.cursor = 0;
        }
        _ => {}
    }
}

fn handle_detail(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_detail(),
        KeyCode::Char(' ') => {
            if let Some(id) = app.detail.clone() {
                app.advance_item(&id);
            }
        }
        KeyCode::Char('?') => app.show_help = true,
        _ => {}
    }
}

/// Move the cursor one card row, respecting group breaks
pub(super) fn move_row(app: &mut App, down: bool) {
    let rows = {
        let items = app.visible_items();
        build_grid_rows(&items, app.grid_columns)
    };
    app.cursor = move_vertical(&rows, app.cursor, down);
}
