use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub timer_area: Rect,
    pub projects_area: Rect,
    pub tasks_area: Rect,
    pub totals_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Timer display (5 rows)
/// - Main area: Projects above Tasks (55%) | Totals (45%)
pub fn create_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Length(5), // Timer
            Constraint::Min(0),    // Lists and totals
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(main_chunks[2]);

    let lists = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(columns[0]);

    MainLayout {
        keybindings_area: main_chunks[0],
        timer_area: main_chunks[1],
        projects_area: lists[0],
        tasks_area: lists[1],
        totals_area: columns[1],
    }
}

/// Create a centered modal area of the given height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}
