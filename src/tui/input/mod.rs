mod mouse;
mod navigate;
mod search;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

pub use mouse::handle_mouse;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.message = None;

    // Ctrl+C quits from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    // Help overlay swallows the next key
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.mode {
        Mode::Navigate => navigate::handle_navigate(app, key),
        Mode::Search => search::handle_search(app, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProgressState;
    use crate::ops::filter::StateFilter;
    use crate::tui::render::test_helpers::test_app;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn space_advances_cursor_item() {
        let (mut app, _clock) = test_app();
        let id = app.cursor_item_id().unwrap();
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.store.get("museum", &id), ProgressState::Complete);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.store.get("museum", &id), ProgressState::Unknown);
    }

    #[test]
    fn enter_opens_and_esc_closes_detail() {
        let (mut app, _clock) = test_app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.detail, app.cursor_item_id());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.detail, None);
    }

    #[test]
    fn space_in_detail_advances_shown_item() {
        let (mut app, _clock) = test_app();
        app.open_detail("74");
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.store.get("museum", "74"), ProgressState::InProgress);
        assert_eq!(app.detail.as_deref(), Some("74"));
    }

    #[test]
    fn number_keys_and_tab_switch_category() {
        let (mut app, _clock) = test_app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.category().id, "cooking");
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.category().id, "cooking");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.category().id, "museum");
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.category().id, "cooking");
    }

    #[test]
    fn f_cycles_filter() {
        let (mut app, _clock) = test_app();
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.filter, StateFilter::Incomplete);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.filter, StateFilter::Only(ProgressState::Unknown));
    }

    #[test]
    fn search_narrows_then_esc_restores() {
        let (mut app, _clock) = test_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        for c in "prismatic".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.visible_items().len(), 1);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.visible_items().len(), 95);
    }

    #[test]
    fn search_enter_keeps_pattern() {
        let (mut app, _clock) = test_app();
        press(&mut app, KeyCode::Char('/'));
        for c in "doll".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.last_search.as_deref(), Some("doll"));
        assert!(
            app.visible_items()
                .iter()
                .all(|v| v.item.name.to_lowercase().contains("doll"))
        );
        // Esc in navigate clears it
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.last_search, None);
    }

    #[test]
    fn arrows_move_cursor_and_clamp() {
        let (mut app, _clock) = test_app();
        app.grid_columns = 4;
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.cursor, 2);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor, 6);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.cursor, 2);
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.cursor, 94);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.cursor, 94);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn help_swallows_next_key() {
        let (mut app, _clock) = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits() {
        let (mut app, _clock) = test_app();
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }
}
