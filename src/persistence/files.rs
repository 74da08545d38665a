use anyhow::{Context, Result};
use crate::domain::date_key;
use chrono::NaiveDate;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the data directory, both local and in the home directory
pub const DATA_DIR_NAME: &str = ".tally";

/// Get the data directory - checks for local .tally first, then falls back to global ~/.tally
pub fn get_data_dir() -> Result<PathBuf> {
    // Check for local .tally directory
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_data_dir(&current_dir) {
        return Ok(local_dir);
    }

    // Fall back to global ~/.tally
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Find local .tally directory by walking up the directory tree
fn find_local_data_dir(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let data_dir = current.join(DATA_DIR_NAME);
        if data_dir.is_dir() {
            return Some(data_dir);
        }

        current = current.parent()?;
    }
}

/// Ensure a data directory exists
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Initialize a local .tally directory in the current directory
pub fn init_local_data_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    let data_dir = current_dir.join(DATA_DIR_NAME);

    if data_dir.exists() {
        anyhow::bail!("Data directory already exists: {}", data_dir.display());
    }

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;

    Ok(data_dir)
}

/// Path of the day file for a date (YYYY-MM-DD.json)
pub fn day_file(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.json", date_key(date)))
}

/// Parse the date out of a day file name, if it is one
pub fn day_file_date(path: &Path) -> Option<NaiveDate> {
    let stem = path.file_name()?.to_str()?.strip_suffix(".json")?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}

/// All day files in the data directory, newest first
pub fn list_day_files(dir: &Path) -> Result<Vec<(NaiveDate, PathBuf)>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if let Some(date) = day_file_date(&path) {
            files.push((date, path));
        }
    }

    files.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(files)
}

/// Get path to config.toml in the data directory
pub fn config_file(dir: &Path) -> PathBuf {
    dir.join("config.toml")
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .context("File path has no parent directory")?;

    // Create temp file in the same directory
    let mut temp_file = NamedTempFile::new_in(dir)
        .context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    // Sync to disk
    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    // Atomically rename temp file to target
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Read file content, return empty string if file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_dir() {
        let dir = get_data_dir().unwrap();
        assert!(dir.to_string_lossy().contains(DATA_DIR_NAME));
    }

    #[test]
    fn test_find_local_data_dir_walks_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().join(DATA_DIR_NAME);
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&data_dir).unwrap();
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_local_data_dir(&nested), Some(data_dir));
    }

    #[test]
    fn test_atomic_write_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("test.txt");

        let content = "Hello, world!";
        atomic_write(&test_file, content).unwrap();

        let read_content = read_file(&test_file).unwrap();
        assert_eq!(read_content, content);
    }

    #[test]
    fn test_read_nonexistent_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("nonexistent.txt");

        let content = read_file(&test_file).unwrap();
        assert_eq!(content, "");
    }

    #[test]
    fn test_list_day_files_newest_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        let older = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
        let newer = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();

        atomic_write(day_file(dir, older), "{}").unwrap();
        atomic_write(day_file(dir, newer), "{}").unwrap();
        atomic_write(config_file(dir), "").unwrap();

        let files = list_day_files(dir).unwrap();
        let dates: Vec<NaiveDate> = files.iter().map(|(d, _)| *d).collect();
        assert_eq!(dates, vec![newer, older]);
    }

    #[test]
    fn test_day_file_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let path = day_file(Path::new("/tmp"), date);
        assert_eq!(path.file_name().unwrap(), "2024-03-14.json");
        assert_eq!(day_file_date(&path), Some(date));
        assert_eq!(day_file_date(Path::new("config.toml")), None);
    }
}
