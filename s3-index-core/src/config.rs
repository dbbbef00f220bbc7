//! Run configuration for the index pipeline.
//!
//! A single [`IndexConfig`] value describes one publishing run: which bucket
//! and root prefix to list, which filenames are reserved for the listing
//! infrastructure, and the cache directives for the written artifacts. The
//! CLI crate maps its flags onto this struct; nothing here performs I/O.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::{ROOT_PATH, SEPARATOR};
use crate::render::RenderContext;

fn default_index_filename() -> String {
    "index.html".to_string()
}

fn default_stylesheet_filename() -> String {
    "index.css".to_string()
}

fn default_folder_icon_filename() -> String {
    "folder-icon.png".to_string()
}

fn default_parent_icon_filename() -> String {
    "folder-up-icon.png".to_string()
}

fn default_favicon_href() -> String {
    "/favicon.ico".to_string()
}

fn default_index_max_age() -> u64 {
    2
}

fn default_resources_max_age() -> u64 {
    9
}

fn default_decimal_units() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Bucket to list and publish into.
    pub bucket: String,
    /// Normalized root prefix: the root sentinel, or a separator-terminated,
    /// non-separator-leading prefix. See [`normalize_root`].
    pub root: String,
    /// Title for every generated index page.
    pub title: String,
    /// Name of the generated index document in each folder.
    #[serde(default = "default_index_filename")]
    pub index_filename: String,
    #[serde(default = "default_stylesheet_filename")]
    pub stylesheet_filename: String,
    #[serde(default = "default_folder_icon_filename")]
    pub folder_icon_filename: String,
    #[serde(default = "default_parent_icon_filename")]
    pub parent_icon_filename: String,
    #[serde(default = "default_favicon_href")]
    pub favicon_href: String,
    /// Base for stylesheet/icon links in the generated HTML. Defaults to the
    /// site-absolute root prefix.
    #[serde(default)]
    pub asset_base: Option<String>,
    /// Cache-Control max-age for the index documents, in seconds.
    #[serde(default = "default_index_max_age")]
    pub index_max_age: u64,
    /// Cache-Control max-age for the static assets, in seconds.
    #[serde(default = "default_resources_max_age")]
    pub resources_max_age: u64,
    /// SI byte units when true, binary units when false.
    #[serde(default = "default_decimal_units")]
    pub decimal_units: bool,
}

impl IndexConfig {
    /// Build a config with defaults for everything but bucket and root. The
    /// raw root is normalized here.
    pub fn new(bucket: impl Into<String>, raw_root: &str) -> Self {
        let bucket = bucket.into();
        let title = format!("Index of {bucket}");
        IndexConfig {
            bucket,
            root: normalize_root(raw_root),
            title,
            index_filename: default_index_filename(),
            stylesheet_filename: default_stylesheet_filename(),
            folder_icon_filename: default_folder_icon_filename(),
            parent_icon_filename: default_parent_icon_filename(),
            favicon_href: default_favicon_href(),
            asset_base: None,
            index_max_age: default_index_max_age(),
            resources_max_age: default_resources_max_age(),
            decimal_units: default_decimal_units(),
        }
    }

    /// Effective asset link base: configured value, or the site-absolute
    /// root prefix.
    pub fn asset_base(&self) -> String {
        match &self.asset_base {
            Some(base) => base.clone(),
            None => format!("/{}", self.root),
        }
    }

    /// Filenames that are infrastructure for the listing itself and must
    /// never appear as listed rows.
    pub fn reserved_names(&self) -> BTreeSet<String> {
        BTreeSet::from([
            self.index_filename.clone(),
            self.stylesheet_filename.clone(),
            self.folder_icon_filename.clone(),
            self.parent_icon_filename.clone(),
        ])
    }

    /// The render context shared by every folder render within this run.
    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            root_path: self.root.clone(),
            title: self.title.clone(),
            favicon_href: self.favicon_href.clone(),
            asset_base: self.asset_base(),
            stylesheet_name: self.stylesheet_filename.clone(),
            folder_icon_name: self.folder_icon_filename.clone(),
            parent_icon_name: self.parent_icon_filename.clone(),
            reserved_names: self.reserved_names(),
            decimal_units: self.decimal_units,
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            bucket = %self.bucket,
            root = %self.root,
            index_max_age = self.index_max_age,
            resources_max_age = self.resources_max_age,
            "Loaded IndexConfig"
        );
        debug!(?self, "IndexConfig loaded (full debug)");
    }
}

/// Normalize a raw root argument to either the canonical root sentinel (top
/// of the bucket) or a separator-terminated, non-separator-leading prefix.
pub fn normalize_root(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches(SEPARATOR);
    if trimmed.is_empty() {
        return ROOT_PATH.to_string();
    }
    if trimmed.ends_with(SEPARATOR) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{SEPARATOR}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_root_handles_sentinel_forms() {
        assert_eq!(normalize_root(""), ROOT_PATH);
        assert_eq!(normalize_root("/"), ROOT_PATH);
        assert_eq!(normalize_root("  "), ROOT_PATH);
    }

    #[test]
    fn normalize_root_appends_trailing_separator() {
        assert_eq!(normalize_root("public/releases"), "public/releases/");
        assert_eq!(normalize_root("public/releases/"), "public/releases/");
        assert_eq!(normalize_root("/public"), "public/");
    }

    #[test]
    fn reserved_names_cover_all_infrastructure_files() {
        let config = IndexConfig::new("my.bucket", "releases");
        let reserved = config.reserved_names();
        for name in [
            "index.html",
            "index.css",
            "folder-icon.png",
            "folder-up-icon.png",
        ] {
            assert!(reserved.contains(name), "missing {name}");
        }
    }

    #[test]
    fn asset_base_defaults_to_site_absolute_root() {
        let config = IndexConfig::new("my.bucket", "releases");
        assert_eq!(config.asset_base(), "/releases/");

        let mut config = IndexConfig::new("my.bucket", "");
        assert_eq!(config.asset_base(), "/");
        config.asset_base = Some("//cdn.example.com/releases/".to_string());
        assert_eq!(config.asset_base(), "//cdn.example.com/releases/");
    }
}
