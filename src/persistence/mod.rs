pub mod day_book;
pub mod files;
pub mod json_store;
#[cfg(test)]
pub mod memory;
pub mod store;

pub use files::{config_file, ensure_dir, get_data_dir, init_local_data_dir};
pub use json_store::JsonStore;
#[cfg(test)]
pub use memory::{FailPoint, MemoryStore};
pub use store::Store;
