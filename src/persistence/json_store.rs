use super::day_book::DayBook;
use super::files::{atomic_write, day_file, list_day_files, read_file};
use super::store::{Store, StoreResult};
use crate::domain::{ClockTime, Project, Task, TimeEntry};
use crate::error::{RecordKind, StoreError};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Store keeping one pretty-printed JSON file per day in the data directory.
///
/// Every write reads the day file, applies the change and replaces the file
/// atomically. Updates by id look through day files newest first.
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open the store, creating the directory if needed
    pub fn open(dir: &Path) -> StoreResult<Self> {
        fs::create_dir_all(dir).map_err(|e| {
            StoreError::Unavailable(format!("cannot create {}: {}", dir.display(), e))
        })?;
        if !dir.is_dir() {
            return Err(StoreError::Unavailable(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        debug!(dir = %dir.display(), "opened json store");
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load_day(&self, date: NaiveDate) -> StoreResult<DayBook> {
        let content = read_file(day_file(&self.dir, date))
            .map_err(|e| StoreError::Unavailable(format!("{:#}", e)))?;
        if content.trim().is_empty() {
            return Ok(DayBook::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save_day(&self, date: NaiveDate, book: &DayBook) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(book)?;
        atomic_write(day_file(&self.dir, date), &json)
            .map_err(|e| StoreError::Unavailable(format!("{:#}", e)))
    }

    /// Find the day holding a record
    fn find_day(&self, kind: RecordKind, id: Uuid) -> StoreResult<(NaiveDate, DayBook)> {
        let days = list_day_files(&self.dir)
            .map_err(|e| StoreError::Unavailable(format!("{:#}", e)))?;

        for (date, _) in days {
            let book = self.load_day(date)?;
            if book.contains(kind, id) {
                return Ok((date, book));
            }
        }
        Err(StoreError::NotFound { kind, id })
    }

    /// Apply a change to the day holding `id` and persist it
    fn update_record<T>(
        &mut self,
        kind: RecordKind,
        id: Uuid,
        apply: impl FnOnce(&mut DayBook) -> Option<T>,
    ) -> StoreResult<T> {
        let (date, mut book) = self.find_day(kind, id)?;
        let updated = apply(&mut book).ok_or(StoreError::NotFound { kind, id })?;
        self.save_day(date, &book)?;
        Ok(updated)
    }

    /// Append a record to a day and persist it
    fn insert_record<T: Clone>(
        &mut self,
        date: NaiveDate,
        record: T,
        push: impl FnOnce(&mut DayBook, T),
    ) -> StoreResult<T> {
        let mut book = self.load_day(date)?;
        push(&mut book, record.clone());
        self.save_day(date, &book)?;
        Ok(record)
    }
}

impl Store for JsonStore {
    fn list_projects(&self, date: NaiveDate) -> StoreResult<Vec<Project>> {
        Ok(self.load_day(date)?.projects)
    }

    fn create_project(&mut self, name: &str, date: NaiveDate) -> StoreResult<Project> {
        let project = Project::new(name.to_string(), date);
        self.insert_record(date, project, |book, p| book.projects.push(p))
    }

    fn update_project(&mut self, id: Uuid, name: &str) -> StoreResult<Project> {
        self.update_record(RecordKind::Project, id, |book| book.rename_project(id, name))
    }

    fn delete_project(&mut self, id: Uuid) -> StoreResult<Uuid> {
        self.update_record(RecordKind::Project, id, |book| book.remove_project(id))
    }

    fn list_tasks(&self, date: NaiveDate) -> StoreResult<Vec<Task>> {
        Ok(self.load_day(date)?.tasks)
    }

    fn create_task(&mut self, name: &str, date: NaiveDate, project_id: Option<Uuid>) -> StoreResult<Task> {
        let task = Task::new(name.to_string(), project_id, date);
        self.insert_record(date, task, |book, t| book.tasks.push(t))
    }

    fn update_task(&mut self, id: Uuid, name: &str, project_id: Option<Uuid>) -> StoreResult<Task> {
        self.update_record(RecordKind::Task, id, |book| book.update_task(id, name, project_id))
    }

    fn delete_task(&mut self, id: Uuid) -> StoreResult<Uuid> {
        self.update_record(RecordKind::Task, id, |book| book.remove_task(id))
    }

    fn list_time_entries(&self, date: NaiveDate) -> StoreResult<Vec<TimeEntry>> {
        Ok(self.load_day(date)?.time_entries)
    }

    fn create_time_entry(
        &mut self,
        task_id: Uuid,
        project_id: Option<Uuid>,
        date: NaiveDate,
        start_time: ClockTime,
    ) -> StoreResult<TimeEntry> {
        let entry = TimeEntry::open(task_id, project_id, date, start_time);
        self.insert_record(date, entry, |book, e| book.time_entries.push(e))
    }

    fn close_time_entry(&mut self, id: Uuid, end_time: ClockTime) -> StoreResult<TimeEntry> {
        self.update_record(RecordKind::TimeEntry, id, |book| book.close_entry(id, end_time))
    }
}
