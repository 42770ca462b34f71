//! In-memory `ContentStore` that records calls and injects failures.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use codex_core::ContentId;
use codex_sync::{ContentPage, ContentStore, RemoteError};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { page: usize, num_items: usize },
    Delete(String),
    Upload(String),
}

#[derive(Default)]
pub struct FakeStore {
    /// Page `n` is `pages[n - 1]`; pages past the end are empty.
    pub pages: Vec<ContentPage>,
    pub listing_status: Option<u16>,
    pub failing_deletes: HashSet<String>,
    pub failing_uploads: HashSet<String>,
    /// File name → number of 503s before the upload succeeds.
    pub flaky_uploads: RefCell<HashMap<String, u32>>,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeStore {
    pub fn with_records(records: Vec<Value>) -> Self {
        let total = records.len() as u64;
        Self {
            pages: vec![ContentPage {
                data: records,
                total_record: Some(total),
            }],
            ..Self::default()
        }
    }

    pub fn fail_delete(mut self, content_id: &str) -> Self {
        self.failing_deletes.insert(content_id.to_string());
        self
    }

    pub fn fail_upload(mut self, file_name: &str) -> Self {
        self.failing_uploads.insert(file_name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::List { .. }))
            .collect()
    }
}

impl ContentStore for FakeStore {
    fn list_page(
        &self,
        _codex_id: &str,
        page: usize,
        num_items: usize,
    ) -> Result<ContentPage, RemoteError> {
        self.calls.borrow_mut().push(Call::List { page, num_items });
        if let Some(code) = self.listing_status {
            return Err(RemoteError::Status {
                code,
                body: "listing refused".into(),
            });
        }
        Ok(self.pages.get(page - 1).cloned().unwrap_or_default())
    }

    fn delete(&self, content_id: &ContentId) -> Result<(), RemoteError> {
        self.calls.borrow_mut().push(Call::Delete(content_id.0.clone()));
        if self.failing_deletes.contains(&content_id.0) {
            return Err(RemoteError::Status {
                code: 404,
                body: "no such content".into(),
            });
        }
        Ok(())
    }

    fn upload(&self, _codex_id: &str, path: &Path) -> Result<(), RemoteError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls.borrow_mut().push(Call::Upload(name.clone()));
        if self.failing_uploads.contains(&name) {
            return Err(RemoteError::Status {
                code: 413,
                body: "too large".into(),
            });
        }
        if let Some(remaining) = self.flaky_uploads.borrow_mut().get_mut(&name) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(RemoteError::Status {
                    code: 503,
                    body: "busy".into(),
                });
            }
        }
        Ok(())
    }
}

pub fn record(id: &str, title: &str, modified_at: &str) -> Value {
    json!({ "id": id, "title": title, "modified_at": modified_at })
}
