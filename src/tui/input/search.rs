use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Cancel search, keeping the previous pattern
        (_, KeyCode::Esc) => {
            app.mode = Mode::Navigate;
            app.search_input.clear();
            app.clamp_cursor();
        }

        // Execute search; an empty pattern clears it
        (_, KeyCode::Enter) => {
            let query = std::mem::take(&mut app.search_input);
            app.last_search = if query.is_empty() { None } else { Some(query) };
            app.mode = Mode::Navigate;
            app.cursor = 0;
            app.scroll = 0;
            tracing::debug!(pattern = ?app.last_search, "search");
        }

        (_, KeyCode::Backspace) => {
            app.search_input.pop();
            app.cursor = 0;
        }

        // Ctrl+U clears the line
        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => {
            app.search_input.clear();
            app.cursor = 0;
        }

        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            app.search_input.push(c);
            app.cursor = 0;
        }

        _ => {}
    }
}
