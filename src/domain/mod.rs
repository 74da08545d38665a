pub mod enums;
pub mod records;
pub mod time;
pub mod totals;

pub use enums::{Focus, TimerState, UiMode};
pub use records::{project_label, validate_name, Project, Task, TimeEntry, MAX_NAME_LEN};
pub use time::{date_key, elapsed_minutes, format_duration, format_elapsed_time, ClockTime, END_OF_DAY};
pub use totals::{LiveSession, TaskGroup, TotalRow, Totals};
