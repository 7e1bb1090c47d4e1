// Run-log persistence
//
// The host used to own the transcript; here the UI does, so the full log
// text can be written out after a run. Keeps the ten most recent files.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_FILES: usize = 10;

/// Directory the run logs are written to.
pub fn log_dir() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Could not determine data directory")?
        .join("capmix")
        .join("logs");
    Ok(dir)
}

/// Write the transcript to a timestamped file and prune old ones.
pub fn save_run_log(text: &str) -> Result<PathBuf> {
    let dir = log_dir()?;
    save_run_log_in(&dir, text)
}

fn save_run_log_in(dir: &Path, text: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S_%f");
    let path = dir.join(format!("log_{timestamp}.txt"));
    fs::write(&path, text)
        .with_context(|| format!("Failed to write log file: {}", path.display()))?;

    prune(dir)?;
    Ok(path)
}

fn prune(dir: &Path) -> Result<()> {
    let mut logs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("log_") && n.ends_with(".txt"))
        })
        .collect();

    if logs.len() <= MAX_FILES {
        return Ok(());
    }

    // Timestamped names sort chronologically.
    logs.sort();
    for old in &logs[..logs.len() - MAX_FILES] {
        fs::remove_file(old)
            .with_context(|| format!("Failed to remove old log: {}", old.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_transcript_to_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_run_log_in(dir.path(), "----Process finished----").unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("log_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "----Process finished----"
        );
    }

    #[test]
    fn prunes_beyond_the_keep_limit() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..MAX_FILES + 3 {
            fs::write(dir.path().join(format!("log_202401{i:02}_000000.txt")), "x").unwrap();
        }

        save_run_log_in(dir.path(), "latest").unwrap();

        let count = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(count, MAX_FILES);
    }

    #[test]
    fn prune_ignores_unrelated_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.md"), "keep me").unwrap();

        save_run_log_in(dir.path(), "log body").unwrap();

        assert!(dir.path().join("notes.md").exists());
    }
}
