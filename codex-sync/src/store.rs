//! The remote content store seam.
//!
//! The engine only talks to the network through [`ContentStore`]; the HTTP
//! implementation lives in [`crate::http`].

use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use codex_core::ContentId;

use crate::error::RemoteError;

/// One page of the remote listing, before validation.
///
/// Items stay untyped so a single bad record can be skipped without failing
/// the page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentPage {
    #[serde(default)]
    pub data: Vec<Value>,
    /// Server-reported total across all pages, when present.
    #[serde(default)]
    pub total_record: Option<u64>,
}

/// Operations the sync engine needs from the remote store.
pub trait ContentStore {
    /// Fetch a 1-indexed page of `codex_id`'s content.
    fn list_page(
        &self,
        codex_id: &str,
        page: usize,
        num_items: usize,
    ) -> Result<ContentPage, RemoteError>;

    /// Remove a content item.
    fn delete(&self, content_id: &ContentId) -> Result<(), RemoteError>;

    /// Upload a local file as a new content item.
    fn upload(&self, codex_id: &str, path: &Path) -> Result<(), RemoteError>;
}

/// Bounded retry for transient failures on a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Delay before retry `n` is `backoff * n`.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const NONE: RetryPolicy = RetryPolicy {
        max_retries: 0,
        backoff: Duration::ZERO,
    };

    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Duration::from_millis(500),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

/// Run `op`, re-issuing it while it fails transiently and attempts remain.
pub fn with_retries<T>(
    policy: RetryPolicy,
    mut op: impl FnMut() -> Result<T, RemoteError>,
) -> Result<T, RemoteError> {
    let mut attempt = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                tracing::debug!(attempt, error = %err, "retrying transient failure");
                sleep(policy.backoff * attempt);
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn unavailable() -> RemoteError {
        RemoteError::Status {
            code: 503,
            body: String::new(),
        }
    }

    fn instant(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff: Duration::ZERO,
        }
    }

    #[test]
    fn transient_failure_is_retried_until_success() {
        let calls = Cell::new(0);
        let result = with_retries(instant(2), || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(unavailable())
            } else {
                Ok("done")
            }
        });
        assert_eq!(result.expect("third attempt succeeds"), "done");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn retries_are_bounded() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retries(instant(2), || {
            calls.set(calls.get() + 1);
            Err(unavailable())
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn client_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retries(instant(5), || {
            calls.set(calls.get() + 1);
            Err(RemoteError::Status {
                code: 400,
                body: "bad".into(),
            })
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn page_tolerates_missing_fields() {
        let page: ContentPage = serde_json::from_str("{}").expect("decode");
        assert!(page.data.is_empty());
        assert_eq!(page.total_record, None);

        let page: ContentPage =
            serde_json::from_str(r#"{"data":[{"id":"1"}],"total_record":7}"#).expect("decode");
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.total_record, Some(7));
    }
}
