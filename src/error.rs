use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// The record collections kept by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Project,
    Task,
    TimeEntry,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Project => "Project",
            RecordKind::Task => "Task",
            RecordKind::TimeEntry => "Time entry",
        };
        f.write_str(name)
    }
}

/// Rejected user input. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{kind} name cannot be empty")]
    EmptyName { kind: RecordKind },

    #[error("{kind} name must be {max} characters or less")]
    NameTooLong { kind: RecordKind, max: usize },

    #[error("Select a task before starting the timer")]
    NoTaskSelected,

    #[error("Stop the timer before deleting the task it is tracking")]
    TaskActive,

    #[error("{kind} {id} does not exist today")]
    UnknownReference { kind: RecordKind, id: Uuid },
}

/// Failures of the persistence gateway
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: Uuid },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt day file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors surfaced by workday and timer operations
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A task switch closed the running entry but could not open the next one
    #[error("Timer switch interrupted: entry {closed_entry} was closed but no new entry was opened ({source})")]
    InconsistentState {
        closed_entry: Uuid,
        #[source]
        source: StoreError,
    },
}

impl TrackerError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TrackerError::Validation(_))
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
