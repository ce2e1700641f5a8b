use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::tui::app::App;

use super::navigate::move_row;

/// Handle a mouse event. Hit-testing uses the rectangles recorded by the
/// last render.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.message = None;
            if app.show_help {
                app.show_help = false;
                return;
            }
            // Any click dismisses the detail popup
            if app.detail.is_some() {
                app.close_detail();
                return;
            }
            if let Some(index) = app.tab_at(mouse.column, mouse.row) {
                app.switch_category(index);
                return;
            }
            if let Some(id) = app.card_at(mouse.column, mouse.row).map(str::to_string) {
                app.click_card(&id);
            }
        }
        MouseEventKind::ScrollDown if app.detail.is_none() => move_row(app, true),
        MouseEventKind::ScrollUp if app.detail.is_none() => move_row(app, false),
        _ => {}
    }
}
