use crate::app::AppState;
use crate::domain::{format_duration, Focus, Task, TimerState};
use crate::ui::styles::{
    border_style, default_style, focused_border_style, muted_style, paused_style, running_style,
    selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// How a task relates to the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskMarker {
    None,
    Selected,
    Running,
    Paused,
}

fn marker_for(app: &AppState, task: &Task) -> TaskMarker {
    let timer = app.day.timer();
    if timer.selected_task_id() != Some(task.id) {
        return TaskMarker::None;
    }
    match timer.state() {
        TimerState::Running => TaskMarker::Running,
        TimerState::Paused => TaskMarker::Paused,
        _ => TaskMarker::Selected,
    }
}

fn marker_glyph(marker: TaskMarker, use_emoji: bool) -> &'static str {
    match (marker, use_emoji) {
        (TaskMarker::Running, true) => "⏱",
        (TaskMarker::Running, false) => ">",
        (TaskMarker::Paused, _) => "‖",
        (TaskMarker::Selected, _) => "•",
        (TaskMarker::None, _) => " ",
    }
}

/// Render the task list
pub fn render_tasks_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let border = if app.focus == Focus::Tasks {
        focused_border_style()
    } else {
        border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(" Tasks ", title_style()));

    if app.day.tasks().is_empty() {
        let empty = Paragraph::new(Line::styled("No tasks yet. Press 'a' to add one.", muted_style()))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let totals = app.day.totals();
    let items: Vec<ListItem> = app
        .day
        .tasks()
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let line = create_task_line(
                task,
                app.day.project_label(task),
                totals.task_total(task.id),
                marker_for(app, task),
                app.use_emoji,
            );
            let style = if app.focus == Focus::Tasks && idx == app.selected_task {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

/// Format: [⏱] Design  · Client  1h 5m RUNNING
fn create_task_line(
    task: &Task,
    project_label: &str,
    minutes: u32,
    marker: TaskMarker,
    use_emoji: bool,
) -> Line<'static> {
    let mut spans = vec![
        Span::raw(format!("[{}] ", marker_glyph(marker, use_emoji))),
        Span::raw(task.name.clone()),
        Span::styled(format!("  · {}", project_label), muted_style()),
    ];

    if minutes > 0 {
        spans.push(Span::raw(format!("  {}", format_duration(minutes))));
    }

    match marker {
        TaskMarker::Running => spans.push(Span::styled(" RUNNING", running_style())),
        TaskMarker::Paused => spans.push(Span::styled(" PAUSED", paused_style())),
        _ => {}
    }

    Line::from(spans)
}
