//! High-level pipeline: paginated listing → tree materialization → per-folder
//! index rendering → publishing.
//!
//! This module provides the top-level orchestration for one run against a
//! bucket prefix. It implements a coordinated pipeline that:
//!   - Pages through the listing of the configured prefix and feeds every
//!     entry to the [`TreeBuilder`]
//!   - Renders a deterministic index document for each folder at or under
//!     the configured root
//!   - Writes the index documents and the embedded static assets through the
//!     [`ObjectStoreClient`] collaborator
//!   - Aggregates a [`PublishReport`] of what was written and what failed.
//!
//! # Error Handling
//! Listing is all-or-nothing: any failure while paging (or fetching fallback
//! metadata) aborts the run before anything is published, so a partial view
//! is never served. Per-object publish failures are isolated: they are
//! recorded in the report and logged, and the run continues with the
//! remaining folders and assets.
//!
//! # Callable From
//! - The CLI crate (both the publish and the listing-only mode)
//! - Integration tests, with a mocked [`ObjectStoreClient`]
//!
//! # Navigation
//! - Main entrypoint: [`publish`]
//! - Phases: [`build_tree`], [`publish_indexes`]

use serde::Serialize;
use tracing::{debug, error, info};

use crate::assets::static_assets;
use crate::config::IndexConfig;
use crate::contract::{ObjectStoreClient, StoreError};
use crate::model::FileMetadata;
use crate::render::render_index;
use crate::tree::{FolderTree, TreeBuilder};

/// Fatal pipeline failures. Everything else is best-effort and lands in the
/// report instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The listing phase failed; no tree was produced.
    Listing(StoreError),
    /// Fallback metadata fetch for a listed key failed during the listing
    /// phase.
    Metadata { key: String, source: StoreError },
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishError::Listing(err) => write!(f, "listing failed: {err}"),
            PublishError::Metadata { key, source } => {
                write!(f, "metadata fetch failed for {key}: {source}")
            }
        }
    }
}

impl std::error::Error for PublishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PublishError::Listing(err) => Some(err),
            PublishError::Metadata { source, .. } => Some(source),
        }
    }
}

/// One failed write during the publish phase.
#[derive(Debug, Clone, Serialize)]
pub struct PublishFailure {
    /// Destination key of the failed write.
    pub key: String,
    pub error: StoreError,
}

/// Outcome of one run: which keys were written and which writes failed.
#[derive(Debug, Default, Serialize)]
pub struct PublishReport {
    /// Folders considered for publishing (at or under the configured root).
    pub folders_total: usize,
    pub indexes_written: Vec<String>,
    pub assets_written: Vec<String>,
    pub failures: Vec<PublishFailure>,
}

impl PublishReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// List the configured prefix page by page and materialize the folder tree.
///
/// The next page is requested only after the current page's entries are
/// fully ingested. Entries without a listed size fall back to a
/// `get_metadata` call so the rendered sizes are never silently wrong.
pub async fn build_tree<C>(client: &C, config: &IndexConfig) -> Result<FolderTree, PublishError>
where
    C: ObjectStoreClient + ?Sized,
{
    info!(bucket = %config.bucket, root = %config.root, "[LIST] Reading prefix");

    let mut builder = TreeBuilder::new();
    let mut continuation_token: Option<String> = None;
    let mut pages = 0usize;
    let mut entries_total = 0usize;

    loop {
        let page = client
            .list_page(&config.bucket, &config.root, continuation_token.as_deref())
            .await
            .map_err(|e| {
                error!(error = %e, bucket = %config.bucket, "[LIST][ERROR] Listing page failed");
                PublishError::Listing(e)
            })?;
        pages += 1;
        entries_total += page.entries.len();
        debug!(page = pages, entries = page.entries.len(), "[LIST] Ingesting page");

        for entry in &page.entries {
            if entry.is_folder_marker {
                builder.ingest(&entry.key, true, None);
                continue;
            }
            let metadata = match entry.size {
                Some(size) => FileMetadata {
                    size,
                    last_modified: entry.last_modified.clone(),
                    ..Default::default()
                },
                None => {
                    debug!(key = %entry.key, "[LIST] Listing omitted size, fetching metadata");
                    client
                        .get_metadata(&config.bucket, &entry.key)
                        .await
                        .map_err(|e| {
                            error!(key = %entry.key, error = %e, "[LIST][ERROR] Metadata fetch failed");
                            PublishError::Metadata {
                                key: entry.key.clone(),
                                source: e,
                            }
                        })?
                }
            };
            builder.ingest(&entry.key, false, Some(metadata));
        }

        if page.truncated {
            continuation_token = page.next_token;
            if continuation_token.is_none() {
                break;
            }
        } else {
            break;
        }
    }

    let tree = builder.into_tree();
    info!(
        pages,
        entries = entries_total,
        folders = tree.len(),
        "[LIST] Listing complete"
    );
    Ok(tree)
}

/// Render and write the index document for every folder at or under the
/// configured root, then write the static assets to the root.
///
/// Write failures never abort the run; they are recorded per key.
pub async fn publish_indexes<C>(
    client: &C,
    config: &IndexConfig,
    tree: &FolderTree,
) -> PublishReport
where
    C: ObjectStoreClient + ?Sized,
{
    let ctx = config.render_context();
    let index_cache = format!("max-age={}", config.index_max_age);
    let mut report = PublishReport::default();

    for folder in tree.folders().filter(|f| f.path.starts_with(&config.root)) {
        report.folders_total += 1;
        let key = format!("{}{}", folder.path, config.index_filename);
        info!(folder = %folder.path, key = %key, "[PUBLISH] Writing index document");
        let html = render_index(folder, &ctx);
        match client
            .put_object(
                &config.bucket,
                &key,
                html.into_bytes(),
                "text/html",
                Some(&index_cache),
            )
            .await
        {
            Ok(()) => report.indexes_written.push(key),
            Err(e) => {
                error!(key = %key, error = %e, "[PUBLISH][ERROR] Index write failed, continuing");
                report.failures.push(PublishFailure { key, error: e });
            }
        }
    }

    let resource_cache = format!("max-age={}", config.resources_max_age);
    for asset in static_assets(config) {
        let key = format!("{}{}", config.root, asset.name);
        info!(key = %key, content_type = asset.content_type, "[PUBLISH] Writing static asset");
        match client
            .put_object(
                &config.bucket,
                &key,
                asset.bytes,
                asset.content_type,
                Some(&resource_cache),
            )
            .await
        {
            Ok(()) => report.assets_written.push(key),
            Err(e) => {
                error!(key = %key, error = %e, "[PUBLISH][ERROR] Asset write failed, continuing");
                report.failures.push(PublishFailure { key, error: e });
            }
        }
    }

    match serde_json::to_string_pretty(&report) {
        Ok(json) => debug!(json = %json, "[PUBLISH] Run report"),
        Err(e) => error!(error = ?e, "[PUBLISH] Failed to serialize run report"),
    }
    report
}

/// Entrypoint: one full run. Lists the prefix, builds the tree, publishes
/// every index document and the static assets.
pub async fn publish<C>(client: &C, config: &IndexConfig) -> Result<PublishReport, PublishError>
where
    C: ObjectStoreClient + ?Sized,
{
    info!(bucket = %config.bucket, root = %config.root, "[RUN] Starting index publication");
    let tree = build_tree(client, config).await?;
    let report = publish_indexes(client, config, &tree).await;
    info!(
        indexes = report.indexes_written.len(),
        assets = report.assets_written.len(),
        failures = report.failures.len(),
        "[RUN] Publication finished"
    );
    Ok(report)
}
