pub mod generator;
pub mod summary;

pub use generator::{generate_report, status_line};
pub use summary::{summarize, Section};
