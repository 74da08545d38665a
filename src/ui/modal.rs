use crate::app::AppState;
use crate::domain::UiMode;
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

/// Render the day changed modal (forces restart)
pub fn render_day_changed_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if app.ui_mode != UiMode::DayChanged {
        return;
    }
    let modal_area = create_modal_area(area, 11);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::raw(format!("  The day changed since {} was loaded.", app.day.date())),
        Line::raw("  Please close and restart tally to track the new day."),
        Line::raw(""),
        Line::raw("  A running timer was stopped at 23:59 of that day."),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [q]", modal_title_style()),
            Span::raw(" Close tally"),
        ]),
    ];

    let title = if app.use_emoji {
        " \u{1F305} Day Changed "
    } else {
        " Day Changed "
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render a blocking error message
pub fn render_alert(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(message) = &app.alert else {
        return;
    };
    let modal_area = create_modal_area(area, 7);
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::styled(format!("  {}", message), error_style()),
        Line::raw(""),
        Line::raw("  Press any key to continue"),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Error ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
