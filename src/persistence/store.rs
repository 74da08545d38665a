use crate::domain::{ClockTime, Project, Task, TimeEntry};
use crate::error::StoreError;
use chrono::NaiveDate;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence gateway over projects, tasks and time entries, keyed by date.
///
/// Every write returns the record as persisted, or `StoreError::NotFound` when
/// the target id does not exist. Each call is atomic on its own; there is no
/// transaction spanning several calls.
pub trait Store {
    fn list_projects(&self, date: NaiveDate) -> StoreResult<Vec<Project>>;
    fn create_project(&mut self, name: &str, date: NaiveDate) -> StoreResult<Project>;
    fn update_project(&mut self, id: Uuid, name: &str) -> StoreResult<Project>;
    fn delete_project(&mut self, id: Uuid) -> StoreResult<Uuid>;

    fn list_tasks(&self, date: NaiveDate) -> StoreResult<Vec<Task>>;
    fn create_task(&mut self, name: &str, date: NaiveDate, project_id: Option<Uuid>) -> StoreResult<Task>;
    fn update_task(&mut self, id: Uuid, name: &str, project_id: Option<Uuid>) -> StoreResult<Task>;
    fn delete_task(&mut self, id: Uuid) -> StoreResult<Uuid>;

    fn list_time_entries(&self, date: NaiveDate) -> StoreResult<Vec<TimeEntry>>;
    fn create_time_entry(
        &mut self,
        task_id: Uuid,
        project_id: Option<Uuid>,
        date: NaiveDate,
        start_time: ClockTime,
    ) -> StoreResult<TimeEntry>;
    /// Set `end_time` and recompute `duration_minutes`
    fn close_time_entry(&mut self, id: Uuid, end_time: ClockTime) -> StoreResult<TimeEntry>;

    /// Tasks assigned to a project on a date
    fn list_tasks_for_project(&self, date: NaiveDate, project_id: Uuid) -> StoreResult<Vec<Task>> {
        Ok(self
            .list_tasks(date)?
            .into_iter()
            .filter(|t| t.project_id == Some(project_id))
            .collect())
    }

    /// Time entries recorded against a task on a date
    fn list_time_entries_for_task(&self, date: NaiveDate, task_id: Uuid) -> StoreResult<Vec<TimeEntry>> {
        Ok(self
            .list_time_entries(date)?
            .into_iter()
            .filter(|e| e.task_id == task_id)
            .collect())
    }
}
