//! Error types for codex-core.

use thiserror::Error;

/// Invalid or missing run configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No bearer credential was supplied.
    #[error("missing API key; set --spark-api-key or INPUT_SPARK_API_KEY")]
    MissingApiKey,

    /// No codex identifier was supplied.
    #[error("missing codex id; set --codex-id or INPUT_CODEX_ID")]
    MissingCodexId,

    /// The extension list was empty after parsing.
    #[error("no file extensions configured (got '{raw}')")]
    NoExtensions { raw: String },

    /// The API base URL is not an http(s) URL.
    #[error("invalid API base URL '{url}'; expected http:// or https://")]
    InvalidBaseUrl { url: String },

    /// A page size of zero would never make progress.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}
