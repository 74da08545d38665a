use crate::app::AppState;
use crate::domain::{UiMode, MAX_NAME_LEN};
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn form_title(mode: UiMode) -> &'static str {
    match mode {
        UiMode::AddingProject => " Add Project ",
        UiMode::EditingProject => " Edit Project ",
        UiMode::EditingTask => " Edit Task ",
        _ => " Add Task ",
    }
}

/// Render the add/edit form for projects and tasks
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(form) = &app.input_form else {
        return;
    };
    let is_task = matches!(app.ui_mode, UiMode::AddingTask | UiMode::EditingTask);
    let modal_area = create_modal_area(area, if is_task { 12 } else { 9 });

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let mut lines = vec![
        Line::raw(""),
        Line::raw(format!("Name ({}/{}):", form.name.chars().count(), MAX_NAME_LEN)),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(form.name.as_str(), modal_title_style()),
            Span::styled("█", modal_title_style()), // Cursor
        ]),
        Line::raw(""),
    ];

    if is_task {
        lines.push(Line::raw("Project:"));
        lines.push(Line::from(vec![
            Span::raw("◀ "),
            Span::styled(app.input_form_project_label(), modal_title_style()),
            Span::raw(" ▶"),
        ]));
        lines.push(Line::raw(""));
    }

    if let Some(error) = &form.error {
        lines.push(Line::styled(error.as_str(), error_style()));
    } else {
        lines.push(Line::raw(""));
    }

    let hint = if is_task {
        "←/→ project  ·  Enter to save  ·  Esc to cancel"
    } else {
        "Enter to save  ·  Esc to cancel"
    };
    lines.push(Line::raw(hint));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(form_title(app.ui_mode), modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
