use super::records::{Project, Task, TimeEntry};
use uuid::Uuid;

/// Label of the synthetic group holding tasks without a project
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// The in-progress session, counted live on top of closed entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveSession {
    pub task_id: Uuid,
    pub elapsed_minutes: u32,
}

/// A labelled total in a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalRow {
    pub label: String,
    pub minutes: u32,
}

impl TotalRow {
    fn new(label: &str, minutes: u32) -> Self {
        Self {
            label: label.to_string(),
            minutes,
        }
    }
}

/// Tasks nested under a project (or the unassigned group)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGroup {
    pub label: String,
    pub rows: Vec<TotalRow>,
}

/// Totals over one day's records plus the live session.
///
/// Closed entries count by their stored `task_id`/`project_id` snapshot. The
/// live session counts toward the task's *current* project, so a task moved
/// between projects mid-session shifts only its live minutes.
pub struct Totals<'a> {
    tasks: &'a [Task],
    projects: &'a [Project],
    entries: &'a [TimeEntry],
    live: Option<LiveSession>,
}

impl<'a> Totals<'a> {
    pub fn new(
        tasks: &'a [Task],
        projects: &'a [Project],
        entries: &'a [TimeEntry],
        live: Option<LiveSession>,
    ) -> Self {
        Self {
            tasks,
            projects,
            entries,
            live,
        }
    }

    fn closed_sum(&self, filter: impl Fn(&TimeEntry) -> bool) -> u32 {
        self.entries
            .iter()
            .filter(|e| !e.is_open() && filter(e))
            .map(|e| e.duration_minutes)
            .sum()
    }

    /// Project the live task currently belongs to, if a session is live.
    /// `Some(None)` means the live task has no project.
    fn live_project(&self) -> Option<(Option<Uuid>, u32)> {
        let live = self.live?;
        let task = self.tasks.iter().find(|t| t.id == live.task_id)?;
        Some((task.project_id, live.elapsed_minutes))
    }

    pub fn task_total(&self, task_id: Uuid) -> u32 {
        let mut total = self.closed_sum(|e| e.task_id == task_id);
        if let Some(live) = self.live {
            if live.task_id == task_id {
                total += live.elapsed_minutes;
            }
        }
        total
    }

    pub fn project_total(&self, project_id: Uuid) -> u32 {
        let mut total = self.closed_sum(|e| e.project_id == Some(project_id));
        if let Some((Some(live_project), elapsed)) = self.live_project() {
            if live_project == project_id {
                total += elapsed;
            }
        }
        total
    }

    pub fn unassigned_total(&self) -> u32 {
        let mut total = self.closed_sum(|e| e.project_id.is_none());
        if let Some((None, elapsed)) = self.live_project() {
            total += elapsed;
        }
        total
    }

    /// Tasks assigned to a project, in insertion order
    pub fn tasks_for_project(&self, project_id: Uuid) -> impl Iterator<Item = &'a Task> + '_ {
        self.tasks
            .iter()
            .filter(move |t| t.project_id == Some(project_id))
    }

    fn unassigned_tasks(&self) -> impl Iterator<Item = &'a Task> + '_ {
        self.tasks.iter().filter(|t| t.project_id.is_none())
    }

    /// Projects that have at least one task assigned
    fn projects_with_tasks(&self) -> impl Iterator<Item = &'a Project> + '_ {
        self.projects
            .iter()
            .filter(move |p| self.tasks_for_project(p.id).next().is_some())
    }

    /// Whether any project-less task has tracked time
    pub fn has_unassigned_time(&self) -> bool {
        self.unassigned_tasks().any(|t| self.task_total(t.id) > 0)
    }

    /// Tasks with tracked time
    pub fn by_task(&self) -> Vec<TotalRow> {
        self.tasks
            .iter()
            .map(|t| TotalRow::new(&t.name, self.task_total(t.id)))
            .filter(|row| row.minutes > 0)
            .collect()
    }

    /// Projects with tracked time, followed by the unassigned row when it applies
    pub fn by_project(&self) -> Vec<TotalRow> {
        let mut rows: Vec<TotalRow> = self
            .projects_with_tasks()
            .map(|p| TotalRow::new(&p.name, self.project_total(p.id)))
            .filter(|row| row.minutes > 0)
            .collect();

        if self.has_unassigned_time() {
            rows.push(TotalRow::new(UNASSIGNED_LABEL, self.unassigned_total()));
        }
        rows
    }

    /// Tasks with tracked time nested under their project. Every project that
    /// has tasks gets a group, even when none of them has time yet.
    pub fn grouped(&self) -> Vec<TaskGroup> {
        let mut groups: Vec<TaskGroup> = self
            .projects_with_tasks()
            .map(|p| TaskGroup {
                label: p.name.clone(),
                rows: self.positive_rows(self.tasks_for_project(p.id)),
            })
            .collect();

        if self.has_unassigned_time() {
            groups.push(TaskGroup {
                label: UNASSIGNED_LABEL.to_string(),
                rows: self.positive_rows(self.unassigned_tasks()),
            });
        }
        groups
    }

    fn positive_rows<'t>(&self, tasks: impl Iterator<Item = &'t Task>) -> Vec<TotalRow> {
        tasks
            .map(|t| TotalRow::new(&t.name, self.task_total(t.id)))
            .filter(|row| row.minutes > 0)
            .collect()
    }

    pub fn has_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Nothing to group by: no projects and no project-less tasks
    pub fn has_nothing_to_group(&self) -> bool {
        self.projects.is_empty() && self.unassigned_tasks().next().is_none()
    }
}
