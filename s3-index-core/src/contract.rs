//! # ObjectStoreClient: the single I/O seam of the pipeline
//!
//! This module defines one trait ([`ObjectStoreClient`]) and the supporting
//! request/response types for talking to a key-addressed object store:
//! paginated key listing, per-key metadata fetch, and object writes.
//!
//! ## Interface & Extensibility
//! - Implement [`ObjectStoreClient`] to plug in a real store client (the CLI
//!   crate ships an AWS S3 implementation) or a test double.
//! - All methods are async and return [`StoreError`] values that carry
//!   enough context for diagnosis (message, HTTP status, request id).
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so consumers can generate
//!   deterministic mocks for unit/integration tests. Mocks are exported
//!   behind the `test-export-mocks` feature.

use async_trait::async_trait;

use crate::model::FileMetadata;

/// One entry of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Full key within the bucket.
    pub key: String,
    /// True when the key denotes an explicit folder (separator-terminated,
    /// no further content).
    pub is_folder_marker: bool,
    /// Size in bytes, when the listing supplies it.
    pub size: Option<u64>,
    /// Last-modified timestamp, verbatim, when the listing supplies it.
    pub last_modified: Option<String>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub entries: Vec<ObjectEntry>,
    /// Opaque cursor for the next page, when `truncated` is set.
    pub next_token: Option<String>,
    pub truncated: bool,
}

/// Failure taxonomy at the store boundary.
///
/// `Transport` means the store was unreachable (network, timeout, client
/// construction); `Service` means the request arrived but was rejected
/// (authorization, not-found, throttling).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum StoreError {
    Transport {
        message: String,
    },
    Service {
        message: String,
        status_code: Option<u16>,
        request_id: Option<String>,
    },
}

impl StoreError {
    pub fn transport(message: impl Into<String>) -> Self {
        StoreError::Transport {
            message: message.into(),
        }
    }

    pub fn service(
        message: impl Into<String>,
        status_code: Option<u16>,
        request_id: Option<String>,
    ) -> Self {
        StoreError::Service {
            message: message.into(),
            status_code,
            request_id,
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Transport { message } => {
                write!(f, "store unreachable: {message}")
            }
            StoreError::Service {
                message,
                status_code,
                request_id,
            } => {
                write!(f, "store rejected request: {message}")?;
                if let Some(status) = status_code {
                    write!(f, " (status {status})")?;
                }
                if let Some(id) = request_id {
                    write!(f, " (request id {id})")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Async contract for the object store collaborator.
///
/// One client instance is reused across all calls within a run. Implementors
/// are responsible for transport, serialization, and mapping their native
/// errors onto [`StoreError`].
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    /// Fetch one page of keys under `prefix`, resuming from
    /// `continuation_token` when present.
    async fn list_page<'a>(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&'a str>,
    ) -> Result<ListPage, StoreError>;

    /// Fetch metadata for a single key.
    async fn get_metadata(&self, bucket: &str, key: &str) -> Result<FileMetadata, StoreError>;

    /// Write an object.
    async fn put_object<'a>(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        cache_control: Option<&'a str>,
    ) -> Result<(), StoreError>;
}
