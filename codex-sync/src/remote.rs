//! Remote inventory fetcher.
//!
//! Pages through the listing until the server-reported total is reached or a
//! short page arrives, validating each record on the way. Invalid records are
//! dropped and counted; a failed page aborts the run.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use codex_core::{time::parse_timestamp, ContentId, RemoteRecord};

use crate::error::SyncError;
use crate::store::ContentStore;

/// Validated remote records plus what was dropped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteInventory {
    pub records: Vec<RemoteRecord>,
    /// Records without the expected `id`/`title`/`modified_at` shape.
    pub malformed: usize,
    /// Records whose title is really an identifier or a timestamp.
    pub corrupted: usize,
}

impl RemoteInventory {
    pub fn skipped(&self) -> usize {
        self.malformed + self.corrupted
    }
}

/// Why a listing record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Malformed,
    UuidTitle,
    TimestampTitle,
}

impl SkipReason {
    pub fn is_corruption(self) -> bool {
        !matches!(self, SkipReason::Malformed)
    }
}

fn uuid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
        )
        .expect("static uuid pattern")
    })
}

fn timestamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?$")
            .expect("static timestamp pattern")
    })
}

/// Turn one raw listing item into a [`RemoteRecord`], or say why not.
pub fn validate_record(raw: &Value) -> Result<RemoteRecord, SkipReason> {
    let object = raw.as_object().ok_or(SkipReason::Malformed)?;

    let id = object
        .get("id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(SkipReason::Malformed)?;
    // Compared byte-for-byte with local file names.
    let title = object
        .get("title")
        .and_then(Value::as_str)
        .filter(|title| !title.trim().is_empty())
        .ok_or(SkipReason::Malformed)?;
    if title.contains(['\t', '\n', '\r']) {
        return Err(SkipReason::Malformed);
    }
    let modified_at = match object.get("modified_at") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => parse_timestamp(s),
        Some(_) => return Err(SkipReason::Malformed),
    };

    if uuid_pattern().is_match(title) {
        return Err(SkipReason::UuidTitle);
    }
    if timestamp_pattern().is_match(title) {
        return Err(SkipReason::TimestampTitle);
    }

    Ok(RemoteRecord {
        content_id: ContentId::from(id),
        title: title.to_string(),
        modified_at,
    })
}

/// Fetch every valid record for `codex_id`.
pub fn fetch_inventory(
    store: &dyn ContentStore,
    codex_id: &str,
    page_size: usize,
) -> Result<RemoteInventory, SyncError> {
    let mut inventory = RemoteInventory::default();
    let mut fetched: u64 = 0;
    let mut page = 1;

    loop {
        let batch = store
            .list_page(codex_id, page, page_size)
            .map_err(|source| SyncError::Listing { page, source })?;
        let count = batch.data.len();
        fetched += count as u64;
        tracing::debug!(page, count, total = ?batch.total_record, "fetched listing page");

        for raw in &batch.data {
            match validate_record(raw) {
                Ok(record) => inventory.records.push(record),
                Err(reason) => {
                    if reason.is_corruption() {
                        inventory.corrupted += 1;
                        tracing::warn!(?reason, record = %raw, "skipping corrupted remote record");
                    } else {
                        inventory.malformed += 1;
                        tracing::warn!(record = %raw, "skipping malformed remote record");
                    }
                }
            }
        }

        if count < page_size {
            break;
        }
        if batch.total_record.is_some_and(|total| fetched >= total) {
            break;
        }
        page += 1;
    }

    tracing::info!(
        records = inventory.records.len(),
        malformed = inventory.malformed,
        corrupted = inventory.corrupted,
        "remote inventory loaded"
    );
    Ok(inventory)
}
