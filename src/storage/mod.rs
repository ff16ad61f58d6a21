//! Snapshot directory operations.
//!
//! The data directory holds one saved end-of-game page per game, named
//! `MM-DD-YYYY-seq.html`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid snapshot name: {0}")]
    InvalidName(String),
}

/// Location of the saved game snapshots.
#[derive(Debug, Clone)]
pub struct DataDir {
    pub path: PathBuf,
}

impl DataDir {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// All `.html` / `.htm` files, sorted by name.
    pub fn list_snapshots(&self) -> Result<Vec<PathBuf>, StorageError> {
        if !self.path.is_dir() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }

        let base = glob::Pattern::escape(&self.path.to_string_lossy());
        let mut files = Vec::new();
        for ext in ["html", "htm"] {
            for entry in glob::glob(&format!("{}/*.{}", base, ext))? {
                match entry {
                    Ok(path) if path.is_file() => files.push(path),
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Skipping unreadable entry: {}", e),
                }
            }
        }

        files.sort();
        Ok(files)
    }

    /// Invalid UTF-8 is replaced rather than failing the page.
    pub fn read_snapshot(&self, path: &Path) -> Result<String, StorageError> {
        let bytes = std::fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write a downloaded snapshot, refusing names that escape the directory.
    pub fn write_snapshot(&self, file_name: &str, content: &[u8]) -> Result<PathBuf, StorageError> {
        validate_snapshot_name(file_name)?;
        std::fs::create_dir_all(&self.path)?;
        let path = self.path.join(file_name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// First free `MM-DD-YYYY-N.html` name for `date`, counting from 1.
    pub fn next_snapshot_name(&self, date: NaiveDate) -> String {
        let prefix = date.format("%m-%d-%Y").to_string();
        (1..)
            .map(|n| format!("{}-{}.html", prefix, n))
            .find(|name| !self.path.join(name).exists())
            .unwrap_or_else(|| format!("{}-1.html", prefix))
    }
}

impl Default for DataDir {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// A plain `.html`/`.htm` file name with no path components.
pub fn validate_snapshot_name(file_name: &str) -> Result<(), StorageError> {
    let has_ext = file_name.ends_with(".html") || file_name.ends_with(".htm");
    let plain = !file_name.contains(['/', '\\']) && !file_name.starts_with('.');

    if has_ext && plain {
        Ok(())
    } else {
        Err(StorageError::InvalidName(file_name.to_string()))
    }
}
