use crate::domain::{format_duration, format_elapsed_time, TimerState, TotalRow};
use crate::report::summary::{summarize, DailySummary, Section};
use crate::workday::Workday;

fn push_rows(report: &mut String, rows: &[TotalRow], indent: &str) {
    for row in rows {
        report.push_str(&format!("{}- {}: {}\n", indent, row.label, format_duration(row.minutes)));
    }
}

fn push_section<T>(
    report: &mut String,
    title: &str,
    section: &Section<T>,
    render: impl Fn(&mut String, &[T]),
) {
    report.push_str(&format!("## {}\n\n", title));
    match section {
        Section::Empty(message) => report.push_str(&format!("_{}_\n", message)),
        Section::Rows(rows) => render(report, rows),
    }
    report.push('\n');
}

/// Render a summary as markdown
pub fn render_summary(summary: &DailySummary) -> String {
    let mut report = String::new();

    push_section(&mut report, "By Task", &summary.by_task, |out, rows| {
        push_rows(out, rows, "")
    });
    push_section(&mut report, "By Project", &summary.by_project, |out, rows| {
        push_rows(out, rows, "")
    });
    push_section(
        &mut report,
        "By Task per Project",
        &summary.by_task_per_project,
        |out, groups| {
            for group in groups {
                out.push_str(&format!("- **{}**\n", group.label));
                push_rows(out, &group.rows, "  ");
            }
        },
    );

    report
}

/// One-line description of the timer
pub fn status_line(day: &Workday) -> String {
    let timer = day.timer();
    match (timer.state(), day.active_task()) {
        (TimerState::Running, Some(task)) | (TimerState::Paused, Some(task)) => format!(
            "{} {} ({})",
            timer.state().to_tag(),
            task.name,
            format_elapsed_time(timer.displayed_elapsed())
        ),
        (TimerState::Running, None) | (TimerState::Paused, None) => {
            format!("{} (task no longer exists)", timer.state().to_tag())
        }
        _ => "No task running".to_string(),
    }
}

/// Full report for the loaded day
pub fn generate_report(day: &Workday) -> String {
    let mut report = format!("# Daily Report - {}\n\n", day.date());
    report.push_str(&format!("**Timer:** {}\n\n", status_line(day)));
    report.push_str(&render_summary(&summarize(&day.totals())));
    report
}
