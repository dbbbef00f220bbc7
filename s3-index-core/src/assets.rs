//! Static assets embedded into the binary and published to the root prefix:
//! the stylesheet referenced by every index document and the two icons.

use crate::config::IndexConfig;

pub const STYLESHEET: &str = include_str!("../assets/index.css");
pub const FOLDER_ICON: &[u8] = include_bytes!("../assets/folder-icon.png");
pub const PARENT_ICON: &[u8] = include_bytes!("../assets/folder-up-icon.png");

/// One asset ready for upload.
#[derive(Debug, Clone)]
pub struct StaticAsset {
    /// Filename relative to the configured root.
    pub name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// The assets to publish for a run, named per the configured reserved
/// filenames.
pub fn static_assets(config: &IndexConfig) -> Vec<StaticAsset> {
    vec![
        StaticAsset {
            name: config.stylesheet_filename.clone(),
            content_type: "text/css",
            bytes: STYLESHEET.as_bytes().to_vec(),
        },
        StaticAsset {
            name: config.folder_icon_filename.clone(),
            content_type: "image/png",
            bytes: FOLDER_ICON.to_vec(),
        },
        StaticAsset {
            name: config.parent_icon_filename.clone(),
            content_type: "image/png",
            bytes: PARENT_ICON.to_vec(),
        },
    ]
}
