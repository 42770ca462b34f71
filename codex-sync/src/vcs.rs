//! Version-control history as a timestamp source.

use std::path::Path;
use std::process::Command;

use chrono::{DateTime, Utc};

use codex_core::time::parse_timestamp;

/// Source of a file's authoritative modification time.
///
/// Returning `None` makes the scanner fall back to filesystem metadata.
pub trait HistoryClock {
    fn last_modified(&self, path: &Path) -> Option<DateTime<Utc>>;
}

/// Commit time of the most recent `git` commit touching the path.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitClock;

impl HistoryClock for GitClock {
    fn last_modified(&self, path: &Path) -> Option<DateTime<Utc>> {
        let dir = path.parent()?;
        let file_name = path.file_name()?;
        let output = Command::new("git")
            .args(["log", "-1", "--format=%cI", "--"])
            .arg(file_name)
            .current_dir(dir)
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_timestamp(stdout.trim())
    }
}

/// Never consults history; every file uses its mtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl HistoryClock for NoHistory {
    fn last_modified(&self, _path: &Path) -> Option<DateTime<Utc>> {
        None
    }
}
