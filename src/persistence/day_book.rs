use crate::domain::{ClockTime, Project, Task, TimeEntry};
use crate::error::RecordKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// All records of one date, in insertion order. This is the on-disk shape of a day file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayBook {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,
}

impl DayBook {
    pub fn contains(&self, kind: RecordKind, id: Uuid) -> bool {
        match kind {
            RecordKind::Project => self.projects.iter().any(|p| p.id == id),
            RecordKind::Task => self.tasks.iter().any(|t| t.id == id),
            RecordKind::TimeEntry => self.time_entries.iter().any(|e| e.id == id),
        }
    }

    pub fn rename_project(&mut self, id: Uuid, name: &str) -> Option<Project> {
        let project = self.projects.iter_mut().find(|p| p.id == id)?;
        project.name = name.to_string();
        Some(project.clone())
    }

    pub fn remove_project(&mut self, id: Uuid) -> Option<Uuid> {
        let index = self.projects.iter().position(|p| p.id == id)?;
        self.projects.remove(index);
        Some(id)
    }

    pub fn update_task(&mut self, id: Uuid, name: &str, project_id: Option<Uuid>) -> Option<Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.name = name.to_string();
        task.project_id = project_id;
        Some(task.clone())
    }

    pub fn remove_task(&mut self, id: Uuid) -> Option<Uuid> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        self.tasks.remove(index);
        Some(id)
    }

    pub fn close_entry(&mut self, id: Uuid, end_time: ClockTime) -> Option<TimeEntry> {
        let entry = self.time_entries.iter_mut().find(|e| e.id == id)?;
        entry.close(end_time);
        Some(entry.clone())
    }
}
