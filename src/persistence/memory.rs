use super::day_book::DayBook;
use super::store::{Store, StoreResult};
use crate::domain::{ClockTime, Project, Task, TimeEntry};
use crate::error::{RecordKind, StoreError};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use uuid::Uuid;

/// Operations whose next call can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Reads,
    CreateTimeEntry,
    CloseTimeEntry,
    AnyWrite,
}

#[derive(Default)]
struct MemoryState {
    days: BTreeMap<NaiveDate, DayBook>,
    armed: Vec<FailPoint>,
}

/// In-memory store for tests. Clones share the same data, so a test can keep
/// a handle to inspect or sabotage the store it handed to a workday.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next matching call fail
    pub fn fail_next(&self, point: FailPoint) {
        self.state.borrow_mut().armed.push(point);
    }

    /// Replace a day's records wholesale
    pub fn seed(&self, date: NaiveDate, book: DayBook) {
        self.state.borrow_mut().days.insert(date, book);
    }

    pub fn day(&self, date: NaiveDate) -> DayBook {
        self.state.borrow().days.get(&date).cloned().unwrap_or_default()
    }

    fn trip(&self, point: FailPoint) -> StoreResult<()> {
        let mut state = self.state.borrow_mut();
        let hit = state
            .armed
            .iter()
            .position(|armed| *armed == point || (*armed == FailPoint::AnyWrite && point != FailPoint::Reads));
        match hit {
            Some(index) => {
                state.armed.remove(index);
                Err(StoreError::Unavailable(format!("injected failure: {:?}", point)))
            }
            None => Ok(()),
        }
    }

    fn read<T>(&self, date: NaiveDate, pick: impl FnOnce(&DayBook) -> T) -> StoreResult<T> {
        self.trip(FailPoint::Reads)?;
        Ok(pick(&self.day(date)))
    }

    fn insert<T: Clone>(&self, date: NaiveDate, record: T, push: impl FnOnce(&mut DayBook, T)) -> StoreResult<T> {
        self.trip(FailPoint::AnyWrite)?;
        let mut state = self.state.borrow_mut();
        push(state.days.entry(date).or_default(), record.clone());
        Ok(record)
    }

    fn update<T>(&self, kind: RecordKind, id: Uuid, apply: impl FnOnce(&mut DayBook) -> Option<T>) -> StoreResult<T> {
        let mut state = self.state.borrow_mut();
        let book = state
            .days
            .values_mut()
            .rev()
            .find(|book| book.contains(kind, id))
            .ok_or(StoreError::NotFound { kind, id })?;
        apply(book).ok_or(StoreError::NotFound { kind, id })
    }
}

impl Store for MemoryStore {
    fn list_projects(&self, date: NaiveDate) -> StoreResult<Vec<Project>> {
        self.read(date, |book| book.projects.clone())
    }

    fn create_project(&mut self, name: &str, date: NaiveDate) -> StoreResult<Project> {
        let project = Project::new(name.to_string(), date);
        self.insert(date, project, |book, p| book.projects.push(p))
    }

    fn update_project(&mut self, id: Uuid, name: &str) -> StoreResult<Project> {
        self.trip(FailPoint::AnyWrite)?;
        self.update(RecordKind::Project, id, |book| book.rename_project(id, name))
    }

    fn delete_project(&mut self, id: Uuid) -> StoreResult<Uuid> {
        self.trip(FailPoint::AnyWrite)?;
        self.update(RecordKind::Project, id, |book| book.remove_project(id))
    }

    fn list_tasks(&self, date: NaiveDate) -> StoreResult<Vec<Task>> {
        self.read(date, |book| book.tasks.clone())
    }

    fn create_task(&mut self, name: &str, date: NaiveDate, project_id: Option<Uuid>) -> StoreResult<Task> {
        let task = Task::new(name.to_string(), project_id, date);
        self.insert(date, task, |book, t| book.tasks.push(t))
    }

    fn update_task(&mut self, id: Uuid, name: &str, project_id: Option<Uuid>) -> StoreResult<Task> {
        self.trip(FailPoint::AnyWrite)?;
        self.update(RecordKind::Task, id, |book| book.update_task(id, name, project_id))
    }

    fn delete_task(&mut self, id: Uuid) -> StoreResult<Uuid> {
        self.trip(FailPoint::AnyWrite)?;
        self.update(RecordKind::Task, id, |book| book.remove_task(id))
    }

    fn list_time_entries(&self, date: NaiveDate) -> StoreResult<Vec<TimeEntry>> {
        self.read(date, |book| book.time_entries.clone())
    }

    fn create_time_entry(
        &mut self,
        task_id: Uuid,
        project_id: Option<Uuid>,
        date: NaiveDate,
        start_time: ClockTime,
    ) -> StoreResult<TimeEntry> {
        self.trip(FailPoint::CreateTimeEntry)?;
        let entry = TimeEntry::open(task_id, project_id, date, start_time);
        self.insert(date, entry, |book, e| book.time_entries.push(e))
    }

    fn close_time_entry(&mut self, id: Uuid, end_time: ClockTime) -> StoreResult<TimeEntry> {
        self.trip(FailPoint::CloseTimeEntry)?;
        self.trip(FailPoint::AnyWrite)?;
        self.update(RecordKind::TimeEntry, id, |book| book.close_entry(id, end_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    #[test]
    fn test_clones_share_data() {
        let handle = MemoryStore::new();
        let mut store = handle.clone();
        store.create_task("Design", today(), None).unwrap();

        assert_eq!(handle.day(today()).tasks.len(), 1);
    }

    #[test]
    fn test_fail_next_trips_once() {
        let mut store = MemoryStore::new();
        let task = store.create_task("Design", today(), None).unwrap();
        store.fail_next(FailPoint::CreateTimeEntry);

        let start = ClockTime { hour: 9, minute: 0 };
        assert!(store.create_time_entry(task.id, None, today(), start).is_err());
        assert!(store.day(today()).time_entries.is_empty());
        assert!(store.create_time_entry(task.id, None, today(), start).is_ok());
    }

    #[test]
    fn test_any_write_does_not_trip_reads() {
        let mut store = MemoryStore::new();
        store.fail_next(FailPoint::AnyWrite);

        assert!(store.list_tasks(today()).is_ok());
        assert!(store.create_project("Client", today()).is_err());
        assert!(store.create_project("Client", today()).is_ok());
    }
}
