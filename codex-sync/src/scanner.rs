//! Local inventory scanner.
//!
//! Walks the root in file-name order and keeps one record per base name.
//! Two files with the same base name in different directories collide; the
//! one visited later replaces the earlier record. Entries the walk cannot
//! read are logged and skipped; only a missing root is fatal.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use codex_core::{time::from_system_time, LocalRecord};

use crate::error::SyncError;
use crate::vcs::HistoryClock;

/// Matched local files keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalInventory {
    pub records: BTreeMap<String, LocalRecord>,
    pub collisions: Vec<Collision>,
}

impl LocalInventory {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&LocalRecord> {
        self.records.get(identifier)
    }
}

/// Two paths that resolved to the same identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub identifier: String,
    pub replaced: PathBuf,
    pub kept: PathBuf,
}

/// Whether `file_name` ends in `.` followed by one of `extensions`.
pub fn matches_extension(file_name: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| {
        file_name.len() > ext.len()
            && file_name.ends_with(ext.as_str())
            && file_name.as_bytes()[file_name.len() - ext.len() - 1] == b'.'
    })
}

/// Scan `root` for files matching `extensions`.
pub fn scan(
    root: &Path,
    extensions: &[String],
    clock: &dyn HistoryClock,
) -> Result<LocalInventory, SyncError> {
    if !root.is_dir() {
        return Err(SyncError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut inventory = LocalInventory::default();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(|p| p.display().to_string()).unwrap_or_default();
                tracing::warn!(path = %path, error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(identifier) = entry.file_name().to_str() else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if !matches_extension(identifier, extensions) {
            continue;
        }

        let path = entry.path().to_path_buf();
        let modified_at = clock.last_modified(&path).or_else(|| {
            entry
                .metadata()
                .ok()
                .and_then(|meta| meta.modified().ok())
                .map(from_system_time)
        });

        let record = LocalRecord {
            identifier: identifier.to_string(),
            path,
            modified_at,
        };
        if let Some(previous) = inventory.records.insert(identifier.to_string(), record) {
            let kept = entry.path().to_path_buf();
            tracing::warn!(
                identifier,
                replaced = %previous.path.display(),
                kept = %kept.display(),
                "duplicate file name under root; later file wins"
            );
            inventory.collisions.push(Collision {
                identifier: identifier.to_string(),
                replaced: previous.path,
                kept,
            });
        }
    }

    tracing::info!(
        files = inventory.len(),
        collisions = inventory.collisions.len(),
        root = %root.display(),
        "local inventory scanned"
    );
    Ok(inventory)
}
