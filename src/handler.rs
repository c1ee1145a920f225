use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode, DialogKind};
use crate::fs::clipboard::TransferKind;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.mode.clone() {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Dialog(DialogKind::Create) => handle_input_dialog(app, key),
        AppMode::Dialog(DialogKind::DeleteConfirm { .. }) => handle_confirm_dialog(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Char('l') | KeyCode::Right => app.expand_selected(),
        KeyCode::Char('h') | KeyCode::Left => app.collapse_selected(),
        KeyCode::Enter => app.toggle_selected(),
        KeyCode::Char('c') => app.collapse_all(),
        KeyCode::Char('.') => app.toggle_hidden(),
        KeyCode::Char('s') => app.cycle_sort(),

        // Side panel
        KeyCode::Char('i') => app.toggle_info(),
        KeyCode::Char('p') => app.toggle_preview(),

        // Structural operations
        KeyCode::Char('a') => app.open_dialog(DialogKind::Create),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('m') => app.mark(TransferKind::Move),
        KeyCode::Char('M') => app.commit(TransferKind::Move),
        KeyCode::Char('y') => app.mark(TransferKind::Copy),
        KeyCode::Char('P') => app.commit(TransferKind::Copy),

        KeyCode::Char('o') => app.request_open(),

        KeyCode::Esc => {
            if app.panel.is_open() {
                app.panel.close();
            } else {
                app.clear_staging();
            }
        }
        _ => {}
    }
}

fn handle_input_dialog(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => app.submit_create(),
        KeyCode::Backspace => app.dialog_delete_char(),
        KeyCode::Left => app.dialog_move_cursor_left(),
        KeyCode::Right => app.dialog_move_cursor_right(),
        KeyCode::Home => app.dialog_cursor_home(),
        KeyCode::End => app.dialog_cursor_end(),
        KeyCode::Char(c) => app.dialog_input_char(c),
        _ => {}
    }
}

fn handle_confirm_dialog(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete_dialog(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.confirm_delete_dialog(false),
        _ => {}
    }
}
