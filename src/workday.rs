use crate::clock::Clock;
use crate::domain::{
    project_label, validate_name, Project, Task, TimeEntry, TimerState, Totals, END_OF_DAY,
};
use crate::error::{RecordKind, TrackerResult, ValidationError};
use crate::persistence::Store;
use crate::timer::{TimerContext, TimerMachine};
use chrono::NaiveDate;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Today's projects, tasks and time entries, the timer driving them, and the
/// store they are persisted to.
///
/// The in-memory lists only change after the store accepted the write, so a
/// failed call leaves everything as it was.
pub struct Workday {
    store: Box<dyn Store>,
    clock: Box<dyn Clock>,
    date: NaiveDate,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    entries: Vec<TimeEntry>,
    timer: TimerMachine,
}

impl Workday {
    /// Load today's records and restore a timer left running by a previous run
    pub fn load(mut store: Box<dyn Store>, clock: Box<dyn Clock>, tick_interval: Duration) -> TrackerResult<Self> {
        let date = clock.today();
        close_left_open(store.as_mut(), date)?;
        let projects = store.list_projects(date)?;
        let tasks = store.list_tasks(date)?;
        let entries = store.list_time_entries(date)?;

        let mut timer = TimerMachine::new(tick_interval);
        let state = timer.restore(clock.as_ref(), &entries);

        info!(
            %date,
            projects = projects.len(),
            tasks = tasks.len(),
            entries = entries.len(),
            timer = state.to_tag(),
            "loaded workday"
        );

        Ok(Self {
            store,
            clock,
            date,
            projects,
            tasks,
            entries,
            timer,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    pub fn timer(&self) -> &TimerMachine {
        &self.timer
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Task the timer is tracking, if any
    pub fn active_task(&self) -> Option<&Task> {
        self.timer.active_task_id().and_then(|id| self.task(id))
    }

    /// List label for a task's project: its name, "No project" or "Unknown"
    pub fn project_label(&self, task: &Task) -> &str {
        project_label(&self.projects, task.project_id)
    }

    /// Totals over today's entries including the live session
    pub fn totals(&self) -> Totals<'_> {
        Totals::new(&self.tasks, &self.projects, &self.entries, self.timer.live_session())
    }

    /// Whether the local date moved past the loaded day
    pub fn has_day_changed(&self) -> bool {
        self.clock.today() != self.date
    }

    pub fn add_project(&mut self, name: &str) -> TrackerResult<Project> {
        let name = validate_name(RecordKind::Project, name)?;
        let project = self.store.create_project(&name, self.date)?;
        info!(id = %project.id, name = %project.name, "project added");
        self.projects.push(project.clone());
        Ok(project)
    }

    pub fn rename_project(&mut self, id: Uuid, name: &str) -> TrackerResult<Project> {
        let name = validate_name(RecordKind::Project, name)?;
        let project = self.store.update_project(id, &name)?;
        if let Some(slot) = self.projects.iter_mut().find(|p| p.id == id) {
            *slot = project.clone();
        }
        debug!(%id, name = %project.name, "project renamed");
        Ok(project)
    }

    /// Delete a project. Its tasks keep their now dangling reference.
    pub fn delete_project(&mut self, id: Uuid) -> TrackerResult<()> {
        self.store.delete_project(id)?;
        self.projects.retain(|p| p.id != id);
        info!(%id, "project deleted");
        Ok(())
    }

    pub fn add_task(&mut self, name: &str, project_id: Option<Uuid>) -> TrackerResult<Task> {
        let name = validate_name(RecordKind::Task, name)?;
        self.check_project(project_id)?;
        let task = self.store.create_task(&name, self.date, project_id)?;
        info!(id = %task.id, name = %task.name, "task added");
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Rename a task and (re)assign its project. Past entries keep their project.
    pub fn update_task(&mut self, id: Uuid, name: &str, project_id: Option<Uuid>) -> TrackerResult<Task> {
        let name = validate_name(RecordKind::Task, name)?;
        let unchanged = self.task(id).map(|t| t.project_id) == Some(project_id);
        if !unchanged {
            self.check_project(project_id)?;
        }

        let task = self.store.update_task(id, &name, project_id)?;
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
            *slot = task.clone();
        }
        debug!(%id, name = %task.name, "task updated");
        Ok(task)
    }

    /// Delete a task. Refused while the timer is tracking it.
    pub fn delete_task(&mut self, id: Uuid) -> TrackerResult<()> {
        if self.timer.active_task_id() == Some(id) {
            return Err(ValidationError::TaskActive.into());
        }

        self.store.delete_task(id)?;
        self.tasks.retain(|t| t.id != id);
        self.timer.forget_task(id);
        info!(%id, "task deleted");
        Ok(())
    }

    pub fn select_task(&mut self, id: Uuid) -> TrackerResult<TimerState> {
        self.drive(|timer, ctx| timer.select_task(ctx, id))
    }

    pub fn start_timer(&mut self) -> TrackerResult<TimerState> {
        self.drive(|timer, ctx| timer.start(ctx))
    }

    pub fn pause_timer(&mut self) -> TimerState {
        self.timer.pause()
    }

    pub fn resume_timer(&mut self) -> TimerState {
        self.timer.resume()
    }

    pub fn stop_timer(&mut self) -> TrackerResult<TimerState> {
        self.drive(|timer, ctx| timer.stop(ctx))
    }

    /// Close a timer still running when the date moved on, at the last minute
    /// of the loaded day
    pub fn close_day(&mut self) -> TrackerResult<TimerState> {
        if self.timer.active_entry_id().is_some() {
            info!(date = %self.date, "closing timer at end of day");
        }
        self.drive(|timer, ctx| timer.stop_at(ctx, END_OF_DAY))
    }

    /// Advance the timer display; returns whether elapsed minutes changed
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        self.timer.tick(self.clock.as_ref(), now)
    }

    fn check_project(&self, project_id: Option<Uuid>) -> Result<(), ValidationError> {
        match project_id {
            Some(id) if self.project(id).is_none() => Err(ValidationError::UnknownReference {
                kind: RecordKind::Project,
                id,
            }),
            _ => Ok(()),
        }
    }

    fn drive<T>(&mut self, f: impl FnOnce(&mut TimerMachine, &mut TimerContext<'_>) -> T) -> T {
        let mut ctx = TimerContext {
            store: self.store.as_mut(),
            clock: self.clock.as_ref(),
            date: self.date,
            tasks: &self.tasks,
            entries: &mut self.entries,
        };
        f(&mut self.timer, &mut ctx)
    }
}

/// Close entries left open on the previous day (the app quit or crashed with a
/// timer running before midnight). Older days are not scanned.
fn close_left_open(store: &mut dyn Store, today: NaiveDate) -> TrackerResult<()> {
    let Some(yesterday) = today.pred_opt() else {
        return Ok(());
    };
    for entry in store.list_time_entries(yesterday)?.iter().filter(|e| e.is_open()) {
        let closed = store.close_time_entry(entry.id, END_OF_DAY)?;
        warn!(
            entry_id = %closed.id,
            %yesterday,
            minutes = closed.duration_minutes,
            "closed timer left running past midnight"
        );
    }
    Ok(())
}
