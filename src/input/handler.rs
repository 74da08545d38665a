use crate::app::AppState;
use crate::domain::UiMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::Alert => {
            app.dismiss_alert();
            Ok(false)
        }
        UiMode::DayChanged => handle_day_changed_mode(key),
        mode if mode.is_form() => handle_input_form_mode(app, key),
        _ => Ok(false),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Quit (the timer keeps running and is restored next start)
        KeyCode::Char('q') | KeyCode::Char('Q') => Ok(true),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Ok(true),

        // Switch between project and task lists
        KeyCode::Tab => {
            app.toggle_focus();
            Ok(false)
        }

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_selection_up();
            Ok(false)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_selection_down();
            Ok(false)
        }

        // Select highlighted task for the timer
        KeyCode::Enter => {
            app.select_highlighted_task();
            Ok(false)
        }

        // Timer controls
        KeyCode::Char('s') | KeyCode::Char('S') => {
            app.start_timer();
            Ok(false)
        }
        KeyCode::Char(' ') => {
            app.toggle_pause();
            Ok(false)
        }
        KeyCode::Char('x') | KeyCode::Char('X') => {
            app.stop_timer();
            Ok(false)
        }

        // Add / edit / delete in the focused list
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.start_add();
            Ok(false)
        }
        KeyCode::Char('e') | KeyCode::Char('E') => {
            app.start_edit();
            Ok(false)
        }
        KeyCode::Char('d') | KeyCode::Char('D') => {
            app.delete_highlighted();
            Ok(false)
        }

        _ => Ok(false),
    }
}

/// Handle keys in the add/edit forms
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            app.submit_input_form();
            Ok(false)
        }
        KeyCode::Esc => {
            app.cancel_input_form();
            Ok(false)
        }

        // Pick the task's project
        KeyCode::Left => {
            app.input_form_cycle_project(false);
            Ok(false)
        }
        KeyCode::Right | KeyCode::Tab => {
            app.input_form_cycle_project(true);
            Ok(false)
        }

        KeyCode::Backspace => {
            app.input_form_backspace();
            Ok(false)
        }
        KeyCode::Char(c) => {
            app.input_form_add_char(c);
            Ok(false)
        }

        _ => Ok(false),
    }
}

/// Only quitting is possible once the day has rolled over
fn handle_day_changed_mode(key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Ok(true),
        _ => Ok(false),
    }
}
