use crate::app::AppState;
use crate::domain::{format_duration, Focus};
use crate::ui::styles::{
    border_style, default_style, focused_border_style, muted_style, selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Render the project list with each project's tracked time
pub fn render_projects_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let border = if app.focus == Focus::Projects {
        focused_border_style()
    } else {
        border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(" Projects ", title_style()));

    if app.day.projects().is_empty() {
        let empty = Paragraph::new(Line::styled("No projects yet", muted_style())).block(block);
        f.render_widget(empty, area);
        return;
    }

    let totals = app.day.totals();
    let items: Vec<ListItem> = app
        .day
        .projects()
        .iter()
        .enumerate()
        .map(|(idx, project)| {
            let task_count = totals.tasks_for_project(project.id).count();
            let line = Line::from(vec![
                Span::raw(project.name.clone()),
                Span::styled(
                    format!("  {} task{}", task_count, if task_count == 1 { "" } else { "s" }),
                    muted_style(),
                ),
                Span::raw(format!("  {}", format_duration(totals.project_total(project.id)))),
            ]);
            let style = if app.focus == Focus::Projects && idx == app.selected_project {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
