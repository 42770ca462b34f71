//! Diff engine: joins both inventories on file name and partitions them.
//!
//! Rules, in order:
//! 1. local identifier with no remote title → `ToAdd`
//! 2. local epoch strictly greater than remote epoch → `ToUpdate`
//! 3. otherwise → `Unchanged`
//! 4. remote record whose title has no local identifier → `ToDelete`
//!
//! Missing timestamps compare as epoch 0 on either side.

use std::collections::HashMap;

use codex_core::{time::epoch_seconds, DiffEntry, RemoteRecord};

use crate::remote::RemoteInventory;
use crate::scanner::LocalInventory;

/// Per-category sizes of a [`DiffPartition`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffCounts {
    pub to_add: usize,
    pub to_update: usize,
    pub to_delete: usize,
    pub unchanged: usize,
}

impl DiffCounts {
    pub fn pending(&self) -> usize {
        self.to_add + self.to_update + self.to_delete
    }
}

/// Every local identifier and unmatched remote record, classified once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffPartition {
    /// Local entries in identifier order, then deletions in listing order.
    pub entries: Vec<DiffEntry>,
    /// Remote records that lost the join to a later record with the same title.
    pub shadowed: Vec<RemoteRecord>,
}

impl DiffPartition {
    pub fn counts(&self) -> DiffCounts {
        let mut counts = DiffCounts::default();
        for entry in &self.entries {
            match entry {
                DiffEntry::ToAdd { .. } => counts.to_add += 1,
                DiffEntry::ToUpdate { .. } => counts.to_update += 1,
                DiffEntry::ToDelete { .. } => counts.to_delete += 1,
                DiffEntry::Unchanged { .. } => counts.unchanged += 1,
            }
        }
        counts
    }

    pub fn to_add(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e, DiffEntry::ToAdd { .. }))
    }

    pub fn to_update(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e, DiffEntry::ToUpdate { .. }))
    }

    pub fn to_delete(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e, DiffEntry::ToDelete { .. }))
    }

    pub fn unchanged(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e, DiffEntry::Unchanged { .. }))
    }
}

/// Partition `local` against `remote`.
pub fn compute(remote: &RemoteInventory, local: &LocalInventory) -> DiffPartition {
    let mut by_title: HashMap<&str, &RemoteRecord> = HashMap::with_capacity(remote.records.len());
    for record in &remote.records {
        by_title.insert(record.title.as_str(), record);
    }

    let mut entries = Vec::with_capacity(local.len() + remote.records.len());
    for (identifier, record) in &local.records {
        let entry = match by_title.get(identifier.as_str()) {
            None => DiffEntry::ToAdd {
                identifier: identifier.clone(),
                path: record.path.clone(),
                local_modified_at: record.modified_at,
            },
            Some(matched) => {
                let local_epoch = epoch_seconds(record.modified_at.as_ref());
                let remote_epoch = epoch_seconds(matched.modified_at.as_ref());
                if local_epoch > remote_epoch {
                    DiffEntry::ToUpdate {
                        identifier: identifier.clone(),
                        path: record.path.clone(),
                        remote_id: matched.content_id.clone(),
                        local_modified_at: record.modified_at,
                        remote_modified_at: matched.modified_at,
                    }
                } else {
                    DiffEntry::Unchanged {
                        identifier: identifier.clone(),
                        path: record.path.clone(),
                        remote_id: matched.content_id.clone(),
                    }
                }
            }
        };
        entries.push(entry);
    }

    let mut shadowed = Vec::new();
    for record in &remote.records {
        if local.get(&record.title).is_none() {
            entries.push(DiffEntry::ToDelete {
                identifier: record.title.clone(),
                remote_id: record.content_id.clone(),
            });
        } else if by_title
            .get(record.title.as_str())
            .is_some_and(|winner| winner.content_id != record.content_id)
        {
            tracing::warn!(
                title = %record.title,
                content_id = %record.content_id,
                "duplicate remote title; record ignored"
            );
            shadowed.push(record.clone());
        }
    }

    DiffPartition { entries, shadowed }
}
