use crate::app::AppState;
use crate::domain::{format_duration, TotalRow};
use crate::report::{summarize, Section};
use crate::ui::styles::{border_style, duration_style, muted_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn row_line(row: &TotalRow, indent: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{}{}  ", indent, row.label)),
        Span::styled(format_duration(row.minutes), duration_style()),
    ])
}

fn push_section<T>(
    lines: &mut Vec<Line<'static>>,
    title: &str,
    section: &Section<T>,
    render: impl Fn(&mut Vec<Line<'static>>, &[T]),
) {
    if !lines.is_empty() {
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled(title.to_string(), title_style()));
    match section {
        Section::Empty(message) => lines.push(Line::styled(format!("  {}", message), muted_style())),
        Section::Rows(rows) => render(lines, rows),
    }
}

/// Lines for the three totals views
fn totals_lines(app: &AppState) -> Vec<Line<'static>> {
    let summary = summarize(&app.day.totals());
    let mut lines = Vec::new();

    push_section(&mut lines, "By task", &summary.by_task, |out, rows| {
        out.extend(rows.iter().map(|r| row_line(r, "  ")));
    });
    push_section(&mut lines, "By project", &summary.by_project, |out, rows| {
        out.extend(rows.iter().map(|r| row_line(r, "  ")));
    });
    push_section(
        &mut lines,
        "By task per project",
        &summary.by_task_per_project,
        |out, groups| {
            for group in groups {
                out.push(Line::raw(format!("  {}", group.label)));
                out.extend(group.rows.iter().map(|r| row_line(r, "    ")));
            }
        },
    );

    lines
}

/// Render the totals pane
pub fn render_totals_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let paragraph = Paragraph::new(totals_lines(app))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" Today's Totals ", title_style())),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
