use crate::clock::Clock;
use crate::domain::{elapsed_minutes, ClockTime, LiveSession, Task, TimeEntry, TimerState};
use crate::error::{RecordKind, TrackerError, TrackerResult, ValidationError};
use crate::persistence::Store;
use crate::ticker::Ticker;
use chrono::NaiveDate;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Everything a transition may read or write besides the machine itself
pub struct TimerContext<'a> {
    pub store: &'a mut dyn Store,
    pub clock: &'a dyn Clock,
    pub date: NaiveDate,
    pub tasks: &'a [Task],
    /// In-memory mirror of the day's entries, kept in step with the store
    pub entries: &'a mut Vec<TimeEntry>,
}

/// The open entry being timed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveEntry {
    entry_id: Uuid,
    task_id: Uuid,
    start_time: ClockTime,
}

impl From<&TimeEntry> for ActiveEntry {
    fn from(entry: &TimeEntry) -> Self {
        Self {
            entry_id: entry.id,
            task_id: entry.task_id,
            start_time: entry.start_time,
        }
    }
}

/// Single-timer state machine.
///
/// Holds at most one active entry. Pausing only freezes the displayed elapsed
/// value; the stored entry keeps its start time, so resuming picks up the real
/// wall-clock elapsed time again. Any store failure leaves the machine as it was,
/// except a task switch whose second write fails (see `select_task`).
#[derive(Debug)]
pub struct TimerMachine {
    selected_task_id: Option<Uuid>,
    active: Option<ActiveEntry>,
    paused: bool,
    elapsed_minutes: u32,
    paused_elapsed: u32,
    ticker: Ticker,
}

impl TimerMachine {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            selected_task_id: None,
            active: None,
            paused: false,
            elapsed_minutes: 0,
            paused_elapsed: 0,
            ticker: Ticker::new(tick_interval),
        }
    }

    pub fn state(&self) -> TimerState {
        match (self.active, self.paused, self.selected_task_id) {
            (Some(_), false, _) => TimerState::Running,
            (Some(_), true, _) => TimerState::Paused,
            (None, _, Some(_)) => TimerState::Selected,
            (None, _, None) => TimerState::Idle,
        }
    }

    pub fn selected_task_id(&self) -> Option<Uuid> {
        self.selected_task_id
    }

    /// Task of the open entry, if a timer is active
    pub fn active_task_id(&self) -> Option<Uuid> {
        self.active.map(|a| a.task_id)
    }

    pub fn active_entry_id(&self) -> Option<Uuid> {
        self.active.map(|a| a.entry_id)
    }

    /// Elapsed minutes to show: frozen while paused
    pub fn displayed_elapsed(&self) -> u32 {
        if self.paused {
            self.paused_elapsed
        } else {
            self.elapsed_minutes
        }
    }

    /// The live session for aggregation, if a timer is active
    pub fn live_session(&self) -> Option<LiveSession> {
        self.active.map(|a| LiveSession {
            task_id: a.task_id,
            elapsed_minutes: self.displayed_elapsed(),
        })
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    /// Select a task. With a timer running on another task this closes the
    /// running entry and opens one for the new task in a single transition.
    ///
    /// If the close is persisted but the open fails, the machine mirrors the
    /// store (old entry closed, new task selected, nothing running) and returns
    /// `TrackerError::InconsistentState`.
    pub fn select_task(&mut self, ctx: &mut TimerContext<'_>, task_id: Uuid) -> TrackerResult<TimerState> {
        let task = find_task(ctx.tasks, task_id)?;

        match self.active {
            Some(active) if active.task_id == task_id => {
                debug!(%task_id, "re-selected the running task");
            }
            Some(active) => self.switch(ctx, active, task)?,
            None => {
                self.selected_task_id = Some(task_id);
                debug!(%task_id, "task selected");
            }
        }
        Ok(self.state())
    }

    fn switch(&mut self, ctx: &mut TimerContext<'_>, active: ActiveEntry, task: &Task) -> TrackerResult<()> {
        let now = ctx.clock.time_of_day();

        let closed = ctx.store.close_time_entry(active.entry_id, now)?;
        let closed_id = closed.id;
        info!(
            from = %active.task_id,
            to = %task.id,
            minutes = closed.duration_minutes,
            "switching timer"
        );
        replace_entry(ctx.entries, closed);

        match ctx.store.create_time_entry(task.id, task.project_id, ctx.date, now) {
            Ok(opened) => {
                self.begin(&opened, 0);
                ctx.entries.push(opened);
                Ok(())
            }
            Err(source) => {
                warn!(closed_entry = %closed_id, error = %source, "switch closed an entry but could not open the next");
                self.reset();
                self.selected_task_id = Some(task.id);
                Err(TrackerError::InconsistentState {
                    closed_entry: closed_id,
                    source,
                })
            }
        }
    }

    /// Open an entry for the selected task. No-op while a timer is active.
    pub fn start(&mut self, ctx: &mut TimerContext<'_>) -> TrackerResult<TimerState> {
        if self.active.is_some() {
            debug!("start ignored, timer already active");
            return Ok(self.state());
        }

        let task_id = self.selected_task_id.ok_or(ValidationError::NoTaskSelected)?;
        let task = find_task(ctx.tasks, task_id)?;
        let opened = ctx.store.create_time_entry(
            task.id,
            task.project_id,
            ctx.date,
            ctx.clock.time_of_day(),
        )?;

        info!(%task_id, start = %opened.start_time, "timer started");
        self.begin(&opened, 0);
        ctx.entries.push(opened);
        Ok(self.state())
    }

    /// Freeze the displayed elapsed time. Only acts while running.
    pub fn pause(&mut self) -> TimerState {
        if self.state() == TimerState::Running {
            self.paused = true;
            self.paused_elapsed = self.elapsed_minutes;
            self.ticker.stop();
            debug!(elapsed = self.paused_elapsed, "timer paused");
        }
        self.state()
    }

    /// Resume counting from the entry's original start time. Only acts while paused.
    pub fn resume(&mut self) -> TimerState {
        if self.state() == TimerState::Paused {
            self.paused = false;
            self.ticker.start();
            debug!("timer resumed");
        }
        self.state()
    }

    /// Close the open entry and return to idle. No-op without an active timer.
    pub fn stop(&mut self, ctx: &mut TimerContext<'_>) -> TrackerResult<TimerState> {
        let now = ctx.clock.time_of_day();
        self.stop_at(ctx, now)
    }

    /// Like `stop`, with an explicit end time
    pub fn stop_at(&mut self, ctx: &mut TimerContext<'_>, end: ClockTime) -> TrackerResult<TimerState> {
        let Some(active) = self.active else {
            debug!("stop ignored, no active timer");
            return Ok(self.state());
        };

        let closed = ctx.store.close_time_entry(active.entry_id, end)?;
        info!(task_id = %active.task_id, minutes = closed.duration_minutes, "timer stopped");
        replace_entry(ctx.entries, closed);

        self.reset();
        self.selected_task_id = None;
        Ok(self.state())
    }

    /// Re-enter RUNNING for an entry left open by a previous run.
    /// Pause state is not persisted, so a restored timer always runs.
    pub fn restore(&mut self, clock: &dyn Clock, entries: &[TimeEntry]) -> TimerState {
        let mut open = entries.iter().filter(|e| e.is_open());
        let Some(entry) = open.next() else {
            return self.state();
        };
        if open.next().is_some() {
            warn!(entry_id = %entry.id, "several open entries found, restoring the first");
        }

        let elapsed = elapsed_minutes(entry.start_time, clock.time_of_day());
        info!(task_id = %entry.task_id, elapsed, "restored running timer");
        self.begin(entry, elapsed);
        self.state()
    }

    /// Recompute elapsed time when the ticker is due. Returns whether the value changed.
    pub fn tick(&mut self, clock: &dyn Clock, now: Instant) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        if self.paused || !self.ticker.poll(now) {
            return false;
        }

        let elapsed = elapsed_minutes(active.start_time, clock.time_of_day());
        let changed = elapsed != self.elapsed_minutes;
        self.elapsed_minutes = elapsed;
        changed
    }

    /// Drop the selection if it points at a task that no longer exists
    pub fn forget_task(&mut self, task_id: Uuid) {
        if self.active.is_none() && self.selected_task_id == Some(task_id) {
            self.selected_task_id = None;
        }
    }

    fn begin(&mut self, entry: &TimeEntry, elapsed: u32) {
        self.active = Some(ActiveEntry::from(entry));
        self.selected_task_id = Some(entry.task_id);
        self.paused = false;
        self.elapsed_minutes = elapsed;
        self.paused_elapsed = 0;
        self.ticker.start();
    }

    fn reset(&mut self) {
        self.active = None;
        self.paused = false;
        self.elapsed_minutes = 0;
        self.paused_elapsed = 0;
        self.ticker.stop();
    }
}

impl Default for TimerMachine {
    fn default() -> Self {
        Self::new(Ticker::default().interval())
    }
}

fn find_task(tasks: &[Task], task_id: Uuid) -> Result<&Task, ValidationError> {
    tasks
        .iter()
        .find(|t| t.id == task_id)
        .ok_or(ValidationError::UnknownReference {
            kind: RecordKind::Task,
            id: task_id,
        })
}

fn replace_entry(entries: &mut [TimeEntry], updated: TimeEntry) {
    if let Some(slot) = entries.iter_mut().find(|e| e.id == updated.id) {
        *slot = updated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::persistence::{FailPoint, MemoryStore};

    struct Harness {
        store: MemoryStore,
        clock: ManualClock,
        tasks: Vec<Task>,
        entries: Vec<TimeEntry>,
        timer: TimerMachine,
    }

    impl Harness {
        fn new() -> Self {
            let clock = ManualClock::at(9, 0);
            let date = clock.today();
            let tasks = vec![
                Task::new("Design".to_string(), Some(Uuid::new_v4()), date),
                Task::new("Email".to_string(), None, date),
            ];
            Self {
                store: MemoryStore::new(),
                clock,
                tasks,
                entries: Vec::new(),
                timer: TimerMachine::default(),
            }
        }

        fn task(&self, index: usize) -> Uuid {
            self.tasks[index].id
        }

        fn run<T>(&mut self, f: impl FnOnce(&mut TimerMachine, &mut TimerContext<'_>) -> T) -> T {
            let mut ctx = TimerContext {
                store: &mut self.store,
                clock: &self.clock,
                date: self.clock.today(),
                tasks: &self.tasks,
                entries: &mut self.entries,
            };
            f(&mut self.timer, &mut ctx)
        }

        fn select(&mut self, index: usize) -> TrackerResult<TimerState> {
            let id = self.task(index);
            self.run(|timer, ctx| timer.select_task(ctx, id))
        }

        fn start(&mut self) -> TrackerResult<TimerState> {
            self.run(|timer, ctx| timer.start(ctx))
        }

        fn stop(&mut self) -> TrackerResult<TimerState> {
            self.run(|timer, ctx| timer.stop(ctx))
        }

        fn tick(&mut self) -> bool {
            self.timer.tick(&self.clock, Instant::now())
        }

        fn open_entries(&self) -> usize {
            let stored = self.store.day(self.clock.today()).time_entries;
            stored.iter().filter(|e| e.is_open()).count()
        }
    }

    #[test]
    fn test_new_timer_is_idle() {
        let h = Harness::new();
        assert_eq!(h.timer.state(), TimerState::Idle);
        assert_eq!(h.timer.live_session(), None);
        assert!(!h.timer.is_ticking());
    }

    #[test]
    fn test_select_then_start_runs() {
        let mut h = Harness::new();
        assert_eq!(h.select(0).unwrap(), TimerState::Selected);
        assert_eq!(h.start().unwrap(), TimerState::Running);

        assert!(h.timer.is_ticking());
        assert_eq!(h.entries.len(), 1);
        assert_eq!(h.entries[0].start_time, ClockTime { hour: 9, minute: 0 });
        assert_eq!(h.entries[0].project_id, h.tasks[0].project_id);
        assert_eq!(h.open_entries(), 1);
    }

    #[test]
    fn test_start_without_selection_is_rejected() {
        let mut h = Harness::new();
        let err = h.start().unwrap_err();

        assert!(matches!(err, TrackerError::Validation(ValidationError::NoTaskSelected)));
        assert_eq!(h.timer.state(), TimerState::Idle);
        assert!(h.entries.is_empty());
    }

    #[test]
    fn test_select_unknown_task_is_rejected() {
        let mut h = Harness::new();
        let missing = Uuid::new_v4();
        let err = h.run(|timer, ctx| timer.select_task(ctx, missing)).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(h.timer.selected_task_id(), None);
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let mut h = Harness::new();
        h.select(0).unwrap();
        h.start().unwrap();
        h.start().unwrap();

        assert_eq!(h.entries.len(), 1);
        assert_eq!(h.open_entries(), 1);
    }

    #[test]
    fn test_tick_recomputes_elapsed_while_running() {
        let mut h = Harness::new();
        h.select(0).unwrap();
        h.start().unwrap();

        h.clock.set(9, 20);
        assert!(h.tick());
        assert_eq!(h.timer.displayed_elapsed(), 20);
        assert_eq!(
            h.timer.live_session(),
            Some(LiveSession { task_id: h.task(0), elapsed_minutes: 20 })
        );
    }

    #[test]
    fn test_pause_freezes_display_and_resume_catches_up() {
        let mut h = Harness::new();
        h.select(0).unwrap();
        h.start().unwrap();
        h.clock.set(9, 10);
        h.tick();

        assert_eq!(h.timer.pause(), TimerState::Paused);
        assert!(!h.timer.is_ticking());

        h.clock.set(9, 30);
        assert!(!h.tick());
        assert_eq!(h.timer.displayed_elapsed(), 10);

        assert_eq!(h.timer.resume(), TimerState::Running);
        assert!(h.tick());
        assert_eq!(h.timer.displayed_elapsed(), 30);
    }

    #[test]
    fn test_pause_twice_equals_once() {
        let mut h = Harness::new();
        h.select(0).unwrap();
        h.start().unwrap();
        h.clock.set(9, 5);
        h.tick();

        h.timer.pause();
        let once = (h.timer.state(), h.timer.displayed_elapsed());
        h.timer.pause();
        let twice = (h.timer.state(), h.timer.displayed_elapsed());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_resume_when_not_paused_is_noop() {
        let mut h = Harness::new();
        assert_eq!(h.timer.resume(), TimerState::Idle);

        h.select(0).unwrap();
        h.start().unwrap();
        assert_eq!(h.timer.resume(), TimerState::Running);
        assert_eq!(h.entries.len(), 1);
    }

    #[test]
    fn test_stop_closes_entry_and_idles() {
        let mut h = Harness::new();
        h.select(0).unwrap();
        h.start().unwrap();
        h.clock.set(9, 42);

        assert_eq!(h.stop().unwrap(), TimerState::Idle);
        assert_eq!(h.entries[0].end_time, Some(ClockTime { hour: 9, minute: 42 }));
        assert_eq!(h.entries[0].duration_minutes, 42);
        assert_eq!(h.timer.selected_task_id(), None);
        assert_eq!(h.timer.displayed_elapsed(), 0);
        assert!(!h.timer.is_ticking());
        assert_eq!(h.open_entries(), 0);
    }

    #[test]
    fn test_stop_while_paused_uses_wall_clock() {
        let mut h = Harness::new();
        h.select(0).unwrap();
        h.start().unwrap();
        h.clock.set(9, 10);
        h.timer.pause();
        h.clock.set(9, 50);

        h.stop().unwrap();
        assert_eq!(h.entries[0].duration_minutes, 50);
    }

    #[test]
    fn test_switch_closes_old_and_opens_new() {
        let mut h = Harness::new();
        h.select(0).unwrap();
        h.start().unwrap();
        h.clock.set(9, 35);

        assert_eq!(h.select(1).unwrap(), TimerState::Running);

        assert_eq!(h.entries.len(), 2);
        assert_eq!(h.entries[0].task_id, h.task(0));
        assert_eq!(h.entries[0].duration_minutes, 35);
        assert_eq!(h.entries[1].task_id, h.task(1));
        assert_eq!(h.entries[1].start_time, ClockTime { hour: 9, minute: 35 });
        assert!(h.entries[1].is_open());
        assert_eq!(h.timer.active_task_id(), Some(h.task(1)));
        assert_eq!(h.timer.displayed_elapsed(), 0);
        assert_eq!(h.open_entries(), 1);
    }

    #[test]
    fn test_switch_from_paused_runs_new_task() {
        let mut h = Harness::new();
        h.select(0).unwrap();
        h.start().unwrap();
        h.timer.pause();
        h.clock.set(9, 15);

        assert_eq!(h.select(1).unwrap(), TimerState::Running);
        assert_eq!(h.entries[0].duration_minutes, 15);
    }

    #[test]
    fn test_reselecting_running_task_is_noop() {
        let mut h = Harness::new();
        h.select(0).unwrap();
        h.start().unwrap();
        h.clock.set(9, 20);

        h.select(0).unwrap();
        assert_eq!(h.entries.len(), 1);
        assert!(h.entries[0].is_open());
    }

    #[test]
    fn test_failed_close_leaves_state_untouched() {
        let mut h = Harness::new();
        h.select(0).unwrap();
        h.start().unwrap();
        h.store.fail_next(FailPoint::CloseTimeEntry);

        assert!(h.select(1).is_err());
        assert_eq!(h.timer.state(), TimerState::Running);
        assert_eq!(h.timer.active_task_id(), Some(h.task(0)));
        assert!(h.entries[0].is_open());

        h.store.fail_next(FailPoint::CloseTimeEntry);
        assert!(h.stop().is_err());
        assert_eq!(h.timer.state(), TimerState::Running);
    }

    #[test]
    fn test_failed_open_during_switch_reports_inconsistency() {
        let mut h = Harness::new();
        h.select(0).unwrap();
        h.start().unwrap();
        h.clock.set(9, 30);
        h.store.fail_next(FailPoint::CreateTimeEntry);

        let err = h.select(1).unwrap_err();
        let closed_id = h.entries[0].id;
        assert!(matches!(err, TrackerError::InconsistentState { closed_entry, .. } if closed_entry == closed_id));

        assert_eq!(h.timer.state(), TimerState::Selected);
        assert_eq!(h.timer.selected_task_id(), Some(h.task(1)));
        assert_eq!(h.entries.len(), 1);
        assert_eq!(h.entries[0].duration_minutes, 30);
        assert_eq!(h.open_entries(), 0);
    }

    #[test]
    fn test_failed_start_does_not_run() {
        let mut h = Harness::new();
        h.select(0).unwrap();
        h.store.fail_next(FailPoint::CreateTimeEntry);

        assert!(h.start().is_err());
        assert_eq!(h.timer.state(), TimerState::Selected);
        assert!(h.entries.is_empty());
    }

    #[test]
    fn test_at_most_one_open_entry_across_operations() {
        let mut h = Harness::new();
        h.select(0).unwrap();
        h.start().unwrap();
        for (minute, task) in [(5, 1), (10, 0), (15, 0), (20, 1)] {
            h.clock.set(9, minute);
            h.select(task).unwrap();
            assert_eq!(h.open_entries(), 1);
        }
        h.stop().unwrap();
        assert_eq!(h.open_entries(), 0);
        h.select(1).unwrap();
        h.start().unwrap();
        assert_eq!(h.open_entries(), 1);
    }

    #[test]
    fn test_restore_open_entry() {
        let mut h = Harness::new();
        let entry = TimeEntry::open(h.task(1), None, h.clock.today(), ClockTime { hour: 9, minute: 0 });
        h.clock.set(9, 45);

        let state = h.timer.restore(&h.clock, &[entry.clone()]);
        assert_eq!(state, TimerState::Running);
        assert_eq!(h.timer.selected_task_id(), Some(h.task(1)));
        assert_eq!(h.timer.active_entry_id(), Some(entry.id));
        assert_eq!(h.timer.displayed_elapsed(), 45);
        assert!(h.timer.is_ticking());
    }

    #[test]
    fn test_restore_without_open_entry_stays_idle() {
        let mut h = Harness::new();
        let mut entry = TimeEntry::open(h.task(0), None, h.clock.today(), ClockTime { hour: 8, minute: 0 });
        entry.close(ClockTime { hour: 8, minute: 30 });

        assert_eq!(h.timer.restore(&h.clock, &[entry]), TimerState::Idle);
    }

    #[test]
    fn test_forget_task_clears_selection_only_when_idle() {
        let mut h = Harness::new();
        let (design, email) = (h.task(0), h.task(1));
        h.select(1).unwrap();
        h.timer.forget_task(email);
        assert_eq!(h.timer.state(), TimerState::Idle);

        h.select(0).unwrap();
        h.start().unwrap();
        h.timer.forget_task(design);
        assert_eq!(h.timer.selected_task_id(), Some(design));
    }
}
