use crate::domain::{TaskGroup, TotalRow, Totals};

pub const NO_TASKS: &str = "No tasks yet";
pub const NO_PROJECTS: &str = "No projects yet";
pub const NO_TIME: &str = "No time tracked";

/// A report section: either rows to show or the message explaining why there are none
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section<T> {
    Empty(&'static str),
    Rows(Vec<T>),
}

impl<T> Section<T> {
    fn from_rows(rows: Vec<T>, nothing_yet: Option<&'static str>) -> Self {
        match nothing_yet {
            Some(message) => Section::Empty(message),
            None if rows.is_empty() => Section::Empty(NO_TIME),
            None => Section::Rows(rows),
        }
    }
}

/// The three views of a day's totals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    pub by_task: Section<TotalRow>,
    pub by_project: Section<TotalRow>,
    pub by_task_per_project: Section<TaskGroup>,
}

/// Build the report sections from the aggregation engine
pub fn summarize(totals: &Totals<'_>) -> DailySummary {
    let no_tasks = (!totals.has_tasks()).then_some(NO_TASKS);
    let no_projects = totals.has_nothing_to_group().then_some(NO_PROJECTS);

    DailySummary {
        by_task: Section::from_rows(totals.by_task(), no_tasks),
        by_project: Section::from_rows(totals.by_project(), no_projects),
        by_task_per_project: Section::from_rows(grouped_with_time(totals), no_projects),
    }
}

/// Groups to list, or none when no task in any group has time
fn grouped_with_time(totals: &Totals<'_>) -> Vec<TaskGroup> {
    let groups = totals.grouped();
    if groups.iter().all(|g| g.rows.is_empty()) {
        return Vec::new();
    }
    groups
}
