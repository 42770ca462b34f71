//! `ureq`-backed [`ContentStore`].
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `POST /v1/content/filter` with `{codex_id, page, num_items}`: listing
//! - `DELETE /v1/content/{id}`: delete
//! - `POST /v1/content` as `multipart/form-data` with `file` and `codex_id`: upload

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::json;

use codex_core::{ContentId, SyncOptions};

use crate::error::RemoteError;
use crate::store::{ContentPage, ContentStore};

static BOUNDARY_SEQ: AtomicU64 = AtomicU64::new(0);

/// HTTP client for the remote content API.
#[derive(Debug, Clone)]
pub struct HttpContentStore {
    agent: ureq::Agent,
    base_url: String,
    authorization: String,
}

impl HttpContentStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: format!("Bearer {api_key}"),
        }
    }

    pub fn from_options(opts: &SyncOptions) -> Self {
        Self::new(
            &opts.api_base_url,
            &opts.api_key,
            Duration::from_secs(opts.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl ContentStore for HttpContentStore {
    fn list_page(
        &self,
        codex_id: &str,
        page: usize,
        num_items: usize,
    ) -> Result<ContentPage, RemoteError> {
        let response = self
            .agent
            .post(&self.url("/v1/content/filter"))
            .set("Authorization", &self.authorization)
            .send_json(json!({
                "codex_id": codex_id,
                "page": page,
                "num_items": num_items,
            }))?;
        response
            .into_json::<ContentPage>()
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    fn delete(&self, content_id: &ContentId) -> Result<(), RemoteError> {
        self.agent
            .delete(&self.url(&format!("/v1/content/{content_id}")))
            .set("Authorization", &self.authorization)
            .call()?;
        Ok(())
    }

    fn upload(&self, codex_id: &str, path: &Path) -> Result<(), RemoteError> {
        let io_error = |source| RemoteError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        let file_len = file.metadata().map_err(io_error)?.len();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let boundary = next_boundary();
        let form = MultipartForm::new(&boundary, codex_id, &file_name, content_type_for(&file_name));
        let content_length = form.len_with(file_len);

        self.agent
            .post(&self.url("/v1/content"))
            .set("Authorization", &self.authorization)
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .set("Content-Length", &content_length.to_string())
            .send(form.into_reader(file))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// multipart/form-data
// ---------------------------------------------------------------------------

fn next_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let seq = BOUNDARY_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("codex-sync-{nanos:x}-{seq:x}")
}

/// Upload form framing: a `codex_id` text part, then a `file` part whose
/// bytes are streamed between `head` and `tail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MultipartForm {
    head: Vec<u8>,
    tail: Vec<u8>,
}

impl MultipartForm {
    pub(crate) fn new(boundary: &str, codex_id: &str, file_name: &str, content_type: &str) -> Self {
        let file_name = file_name.replace('"', "%22").replace(['\r', '\n'], " ");
        let head = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"codex_id\"\r\n\r\n\
             {codex_id}\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        );
        let tail = format!("\r\n--{boundary}--\r\n");
        Self {
            head: head.into_bytes(),
            tail: tail.into_bytes(),
        }
    }

    /// Total body length for a file of `file_len` bytes.
    pub(crate) fn len_with(&self, file_len: u64) -> u64 {
        (self.head.len() + self.tail.len()) as u64 + file_len
    }

    pub(crate) fn into_reader<R: Read>(self, file: R) -> impl Read {
        Cursor::new(self.head)
            .chain(file)
            .chain(Cursor::new(self.tail))
    }
}

/// Content type sent for the `file` part, from the file extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" | "mdx" => "text/markdown",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}
