/// Lifecycle state of the single timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// No task selected, no open entry
    Idle,
    /// A task is selected but nothing is being timed
    Selected,
    /// An open entry exists and the display is counting
    Running,
    /// An open entry exists but the displayed elapsed time is frozen
    Paused,
}

impl TimerState {
    /// Label for the timer pane
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Selected => "READY",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
        }
    }

    /// Whether an open time entry backs this state
    pub fn has_open_entry(&self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingProject,
    EditingProject,
    AddingTask,
    EditingTask,
    Alert,      // Blocking message, dismissed with any key
    DayChanged, // Shown when midnight has passed, forces restart
}

impl UiMode {
    pub fn is_form(&self) -> bool {
        matches!(
            self,
            Self::AddingProject | Self::EditingProject | Self::AddingTask | Self::EditingTask
        )
    }
}

/// Which list receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Projects,
    Tasks,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Projects => Focus::Tasks,
            Focus::Tasks => Focus::Projects,
        }
    }
}
