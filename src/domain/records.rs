use super::time::ClockTime;
use crate::error::{RecordKind, ValidationError};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest accepted project or task name, in characters
pub const MAX_NAME_LEN: usize = 50;

/// A project grouping tasks for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Local>,
}

impl Project {
    pub fn new(name: String, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            date,
            created_at: Local::now(),
        }
    }
}

/// A task that time can be tracked against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    /// Weak reference, may point at a deleted project
    pub project_id: Option<Uuid>,
    pub date: NaiveDate,
    pub created_at: DateTime<Local>,
}

impl Task {
    pub fn new(name: String, project_id: Option<Uuid>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            project_id,
            date,
            created_at: Local::now(),
        }
    }
}

/// One timed session against a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Uuid,
    pub task_id: Uuid,
    /// Snapshot of the task's project when the entry was opened
    pub project_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: Option<ClockTime>,
    /// Authoritative only once `end_time` is set
    pub duration_minutes: u32,
    pub created_at: DateTime<Local>,
}

impl TimeEntry {
    /// Open a new entry starting at `start_time`
    pub fn open(task_id: Uuid, project_id: Option<Uuid>, date: NaiveDate, start_time: ClockTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            project_id,
            date,
            start_time,
            end_time: None,
            duration_minutes: 0,
            created_at: Local::now(),
        }
    }

    /// Whether this entry is the one still being timed
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Close the entry at `end_time` and fix its duration
    pub fn close(&mut self, end_time: ClockTime) {
        self.end_time = Some(end_time);
        self.duration_minutes = self.start_time.minutes_until(end_time);
    }
}

/// Trim a user-supplied name and check it fits the storage rules
pub fn validate_name(kind: RecordKind, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName { kind });
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            kind,
            max: MAX_NAME_LEN,
        });
    }
    Ok(trimmed.to_string())
}

/// Label shown next to a task in lists.
/// A dangling project reference reads "Unknown", no project reads "No project".
pub fn project_label<'a>(projects: &'a [Project], project_id: Option<Uuid>) -> &'a str {
    match project_id {
        None => "No project",
        Some(id) => projects
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
            .unwrap_or("Unknown"),
    }
}
