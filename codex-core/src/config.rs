//! Run configuration.
//!
//! The option set is flat; callers build a [`SyncOptions`] from flags or
//! environment and call [`SyncOptions::validate`] before any work starts.

use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://api.spark.my.alaispark.app";
pub const DEFAULT_FILE_EXTENSIONS: &str = "pdf,txt,md,mdx,png,jpg,jpeg,webp,gif,mp3,mp4";
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Everything a single sync run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Bearer credential sent on every call.
    pub api_key: String,
    pub codex_id: String,
    /// Local root to reconcile.
    pub directory: PathBuf,
    pub api_base_url: String,
    /// Allowed suffixes without the leading dot. Case-sensitive.
    pub extensions: Vec<String>,
    pub dry_run: bool,
    pub delete_removed: bool,
    pub page_size: usize,
    pub timeout_secs: u64,
    /// Extra attempts for transient failures on per-item calls.
    pub max_retries: u32,
}

impl SyncOptions {
    /// Options with every default applied.
    pub fn new(api_key: impl Into<String>, codex_id: impl Into<String>, directory: PathBuf) -> Self {
        Self {
            api_key: api_key.into(),
            codex_id: codex_id.into(),
            directory,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            extensions: parse_extensions(DEFAULT_FILE_EXTENSIONS),
            dry_run: false,
            delete_removed: true,
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Check the options and normalise the base URL.
    ///
    /// Directory existence is not checked here; the scanner owns that error.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.codex_id.trim().is_empty() {
            return Err(ConfigError::MissingCodexId);
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::NoExtensions { raw: String::new() });
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        let url = self.api_base_url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.api_base_url,
            });
        }
        self.api_base_url = url;
        Ok(self)
    }
}

/// Split a comma-separated extension list.
///
/// Entries are trimmed, a leading `.` is dropped and empty entries are
/// skipped. Case is preserved.
pub fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.'))
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .collect()
}

/// Like [`parse_extensions`] but an empty result is an error.
pub fn parse_extensions_strict(raw: &str) -> Result<Vec<String>, ConfigError> {
    let parsed = parse_extensions(raw);
    if parsed.is_empty() {
        return Err(ConfigError::NoExtensions {
            raw: raw.to_string(),
        });
    }
    Ok(parsed)
}
