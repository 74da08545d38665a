use crate::app::AppState;
use crate::domain::{format_elapsed_time, TimerState};
use crate::ui::styles::{
    border_style, muted_style, paused_style, running_style, title_style,
};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Lines shown in the timer pane
fn timer_lines(app: &AppState) -> Vec<Line<'static>> {
    let timer = app.day.timer();
    let state = timer.state();

    if !state.has_open_entry() {
        let hint = match app.day.timer().selected_task_id().and_then(|id| app.day.task(id)) {
            Some(task) => format!("Ready: {}  (press s to start)", task.name),
            None => "Select a task with Enter, then press s".to_string(),
        };
        return vec![
            Line::styled("No task running", muted_style()),
            Line::styled(hint, muted_style()),
        ];
    }

    let task_name = app
        .day
        .active_task()
        .map(|t| t.name.clone())
        .unwrap_or_else(|| "Unknown task".to_string());
    let project = app
        .day
        .active_task()
        .map(|t| app.day.project_label(t).to_string())
        .unwrap_or_default();

    let mut clock = vec![Span::styled(
        format_elapsed_time(timer.displayed_elapsed()),
        running_style(),
    )];
    if state == TimerState::Paused {
        clock.push(Span::styled("  PAUSED", paused_style()));
    }

    vec![
        Line::from(vec![
            Span::styled(task_name, title_style()),
            Span::styled(format!("  · {}", project), muted_style()),
        ]),
        Line::from(clock),
    ]
}

/// Render the timer display
pub fn render_timer_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let title = format!(" Timer · {} ", app.day.date().format("%a %b %d"));
    let paragraph = Paragraph::new(timer_lines(app))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(title, title_style())),
        );
    f.render_widget(paragraph, area);
}
