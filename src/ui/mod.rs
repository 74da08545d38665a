pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod modal;
pub mod projects_pane;
pub mod styles;
pub mod tasks_pane;
pub mod timer_pane;
pub mod totals_pane;

use crate::app::AppState;
use crate::domain::UiMode;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use modal::{render_alert, render_day_changed_modal};
use projects_pane::render_projects_pane;
use ratatui::Frame;
use tasks_pane::render_tasks_pane;
use timer_pane::render_timer_pane;
use totals_pane::render_totals_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, layout.keybindings_area);
    render_timer_pane(f, app, layout.timer_area);
    render_projects_pane(f, app, layout.projects_area);
    render_tasks_pane(f, app, layout.tasks_area);
    render_totals_pane(f, app, layout.totals_area);

    // Day changed modal takes precedence
    if app.ui_mode == UiMode::DayChanged {
        render_day_changed_modal(f, app, size);
        return;
    }

    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }

    if app.ui_mode == UiMode::Alert {
        render_alert(f, app, size);
    }
}
