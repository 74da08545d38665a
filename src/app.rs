use crate::domain::{project_label, Focus, Project, Task, TimerState, UiMode};
use crate::error::TrackerError;
use crate::workday::Workday;
use tracing::warn;
use uuid::Uuid;

/// Input form state for adding or editing a project or task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFormState {
    pub name: String,
    /// Record being edited; `None` when adding
    pub editing_id: Option<Uuid>,
    /// Project picked for a task form. Kept as-is until cycled, so a task
    /// whose project was deleted keeps its dangling id through an edit.
    pub project_id: Option<Uuid>,
    /// Last validation message, shown under the input
    pub error: Option<String>,
}

/// Main application state
pub struct AppState {
    pub day: Workday,
    pub focus: Focus,
    pub selected_project: usize,
    pub selected_task: usize,
    pub ui_mode: UiMode,
    pub input_form: Option<InputFormState>,
    pub alert: Option<String>,
    pub use_emoji: bool,
}

impl AppState {
    pub fn new(day: Workday, use_emoji: bool) -> Self {
        Self {
            day,
            focus: Focus::Tasks,
            selected_project: 0,
            selected_task: 0,
            ui_mode: UiMode::Normal,
            input_form: None,
            alert: None,
            use_emoji,
        }
    }

    /// Check if the day has changed since the app started
    pub fn has_day_changed(&self) -> bool {
        self.day.has_day_changed()
    }

    /// Close the loaded day: stop a running timer at 23:59 and block on the
    /// restart modal
    pub fn end_day(&mut self) {
        if let Err(e) = self.day.close_day() {
            warn!(error = %e, "failed to close timer at end of day");
        }
        self.ui_mode = UiMode::DayChanged;
    }

    pub fn highlighted_project(&self) -> Option<&Project> {
        self.day.projects().get(self.selected_project)
    }

    pub fn highlighted_task(&self) -> Option<&Task> {
        self.day.tasks().get(self.selected_task)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    pub fn move_selection_up(&mut self) {
        let index = self.focused_index_mut();
        *index = index.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let len = self.focused_len();
        let index = self.focused_index_mut();
        if *index + 1 < len {
            *index += 1;
        }
    }

    /// Select the highlighted task for the timer (switching if one is running)
    pub fn select_highlighted_task(&mut self) {
        let Some(id) = self.highlighted_task().map(|t| t.id) else {
            return;
        };
        if let Err(err) = self.day.select_task(id) {
            self.show_error(&err);
        }
    }

    pub fn start_timer(&mut self) {
        if let Err(err) = self.day.start_timer() {
            self.show_error(&err);
        }
    }

    /// Pause a running timer or resume a paused one
    pub fn toggle_pause(&mut self) {
        match self.day.timer_state() {
            TimerState::Running => {
                self.day.pause_timer();
            }
            TimerState::Paused => {
                self.day.resume_timer();
            }
            _ => {}
        }
    }

    pub fn stop_timer(&mut self) {
        if let Err(err) = self.day.stop_timer() {
            self.show_error(&err);
        }
    }

    /// Open the add form for the focused list
    pub fn start_add(&mut self) {
        self.ui_mode = match self.focus {
            Focus::Projects => UiMode::AddingProject,
            Focus::Tasks => UiMode::AddingTask,
        };
        self.input_form = Some(InputFormState::default());
    }

    /// Open the edit form for the highlighted project or task
    pub fn start_edit(&mut self) {
        let form = match self.focus {
            Focus::Projects => self.highlighted_project().map(|p| {
                (
                    UiMode::EditingProject,
                    InputFormState {
                        name: p.name.clone(),
                        editing_id: Some(p.id),
                        ..Default::default()
                    },
                )
            }),
            Focus::Tasks => self.highlighted_task().map(|t| {
                (
                    UiMode::EditingTask,
                    InputFormState {
                        name: t.name.clone(),
                        editing_id: Some(t.id),
                        project_id: t.project_id,
                        error: None,
                    },
                )
            }),
        };

        if let Some((mode, form)) = form {
            self.ui_mode = mode;
            self.input_form = Some(form);
        }
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            form.name.push(c);
            form.error = None;
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.name.pop();
            form.error = None;
        }
    }

    /// Cycle the task form's project through "No project" and today's projects
    pub fn input_form_cycle_project(&mut self, forward: bool) {
        if !matches!(self.ui_mode, UiMode::AddingTask | UiMode::EditingTask) {
            return;
        }
        let Some(current) = self.input_form.as_ref().map(|f| self.project_choice_for(f.project_id)) else {
            return;
        };
        let choices = self.day.projects().len() + 1;
        let next = if forward {
            (current + 1) % choices
        } else {
            (current + choices - 1) % choices
        };
        let project_id = self.project_for_choice(next);
        if let Some(form) = &mut self.input_form {
            form.project_id = project_id;
        }
    }

    /// Label of the form's current project choice
    pub fn input_form_project_label(&self) -> &str {
        let project_id = self.input_form.as_ref().and_then(|f| f.project_id);
        project_label(self.day.projects(), project_id)
    }

    /// Save the form. Validation errors keep the form open with the message.
    pub fn submit_input_form(&mut self) {
        let Some(form) = self.input_form.clone() else {
            return;
        };
        let project_id = form.project_id;

        let result = match (self.ui_mode, form.editing_id) {
            (UiMode::AddingProject, _) => self.day.add_project(&form.name).map(|_| ()),
            (UiMode::EditingProject, Some(id)) => self.day.rename_project(id, &form.name).map(|_| ()),
            (UiMode::AddingTask, _) => self.day.add_task(&form.name, project_id).map(|_| ()),
            (UiMode::EditingTask, Some(id)) => {
                self.day.update_task(id, &form.name, project_id).map(|_| ())
            }
            _ => Ok(()),
        };

        match result {
            Ok(()) => {
                if self.ui_mode == UiMode::AddingTask {
                    self.selected_task = self.day.tasks().len().saturating_sub(1);
                } else if self.ui_mode == UiMode::AddingProject {
                    self.selected_project = self.day.projects().len().saturating_sub(1);
                }
                self.cancel_input_form();
            }
            Err(err) if err.is_validation() => {
                if let Some(form) = &mut self.input_form {
                    form.error = Some(err.to_string());
                }
            }
            Err(err) => {
                self.input_form = None;
                self.show_error(&err);
            }
        }
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Delete the highlighted project or task
    pub fn delete_highlighted(&mut self) {
        let result = match self.focus {
            Focus::Projects => match self.highlighted_project().map(|p| p.id) {
                Some(id) => self.day.delete_project(id),
                None => return,
            },
            Focus::Tasks => match self.highlighted_task().map(|t| t.id) {
                Some(id) => self.day.delete_task(id),
                None => return,
            },
        };

        match result {
            Ok(()) => self.clamp_selection(),
            Err(err) => self.show_error(&err),
        }
    }

    /// Log the error and show it in a blocking alert
    pub fn show_error(&mut self, err: &TrackerError) {
        warn!(error = %err, "operation failed");
        self.alert = Some(err.to_string());
        self.ui_mode = UiMode::Alert;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Called every loop iteration
    pub fn tick(&mut self) {
        self.day.tick();
    }

    fn focused_len(&self) -> usize {
        match self.focus {
            Focus::Projects => self.day.projects().len(),
            Focus::Tasks => self.day.tasks().len(),
        }
    }

    fn focused_index_mut(&mut self) -> &mut usize {
        match self.focus {
            Focus::Projects => &mut self.selected_project,
            Focus::Tasks => &mut self.selected_task,
        }
    }

    fn clamp_selection(&mut self) {
        self.selected_project = self
            .selected_project
            .min(self.day.projects().len().saturating_sub(1));
        self.selected_task = self
            .selected_task
            .min(self.day.tasks().len().saturating_sub(1));
    }

    fn project_for_choice(&self, choice: usize) -> Option<Uuid> {
        choice
            .checked_sub(1)
            .and_then(|i| self.day.projects().get(i))
            .map(|p| p.id)
    }

    /// Position in the cycle; a dangling id counts as "No project"
    fn project_choice_for(&self, project_id: Option<Uuid>) -> usize {
        project_id
            .and_then(|id| self.day.projects().iter().position(|p| p.id == id))
            .map_or(0, |i| i + 1)
    }
}
