//! Deterministic HTML rendering of one folder node.
//!
//! [`render_index`] is a pure function of (folder, context) to text: the same
//! tree renders to byte-identical output on every call. Ordering comes from
//! the tree's lexicographic child order, never from hash-map iteration, and
//! no timestamps are generated at render time.
//!
//! Files whose name is reserved for the listing infrastructure (the index
//! document itself, the stylesheet, the icons) are never listed, regardless
//! of which folder holds them.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::model::{leaf_name, Folder};

/// Read-only context shared by every folder render within a run.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Normalized root path; the folder with this path gets no parent row.
    pub root_path: String,
    /// Page title emitted into the HTML head.
    pub title: String,
    /// Favicon link target.
    pub favicon_href: String,
    /// Base prepended to asset filenames to form stylesheet and icon links.
    pub asset_base: String,
    /// Stylesheet filename, relative to `asset_base`.
    pub stylesheet_name: String,
    /// Folder icon filename, relative to `asset_base`.
    pub folder_icon_name: String,
    /// Parent-navigation icon filename, relative to `asset_base`.
    pub parent_icon_name: String,
    /// Filenames that must never appear as listed rows.
    pub reserved_names: BTreeSet<String>,
    /// SI units (kB/MB) when true, binary units (KiB/MiB) when false.
    pub decimal_units: bool,
}

impl RenderContext {
    fn is_reserved(&self, filename: &str) -> bool {
        self.reserved_names.contains(filename)
    }

    fn asset_href(&self, name: &str) -> String {
        format!("{}{}", self.asset_base, name)
    }
}

/// Render the index document for a single folder.
pub fn render_index(folder: &Folder, ctx: &RenderContext) -> String {
    let mut html = String::with_capacity(2048);

    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html lang=\"en\">\n");
    html.push_str("<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    let _ = writeln!(
        html,
        "  <link rel=\"shortcut icon\" type=\"image/png\" href=\"{}\">",
        ctx.favicon_href
    );
    let _ = writeln!(html, "  <title>{}</title>", ctx.title);
    let _ = writeln!(
        html,
        "  <link rel=\"stylesheet\" href=\"{}\">",
        ctx.asset_href(&ctx.stylesheet_name)
    );
    html.push_str("</head>\n");
    html.push_str("<body>\n");
    let _ = writeln!(html, "<h1>{}</h1>", folder.path);
    html.push_str("<table id=\"list\">\n");
    html.push_str("  <thead>\n");
    html.push_str("    <tr>\n");
    html.push_str("      <th class=\"icon\"></th>\n");
    html.push_str("      <th class=\"name\">Name</th>\n");
    html.push_str("      <th class=\"size\" colspan=\"2\">Size</th>\n");
    html.push_str("      <th class=\"last-modified\">Last modified</th>\n");
    html.push_str("    </tr>\n");
    html.push_str("  </thead>\n");
    html.push_str("  <tbody>\n");

    // Navigation up to the parent folder, but never past the configured root.
    if folder.path != ctx.root_path {
        html.push_str("    <tr>\n");
        let _ = writeln!(
            html,
            "      <td class=\"icon\"><a href=\"..\"><img src=\"{}\" alt=\"\"></a></td>",
            ctx.asset_href(&ctx.parent_icon_name)
        );
        html.push_str("      <td class=\"name\"><a href=\"..\">Parent Directory</a></td>\n");
        html.push_str("      <td class=\"size\"></td>\n");
        html.push_str("      <td class=\"size-units\"></td>\n");
        html.push_str("      <td class=\"last-modified\"></td>\n");
        html.push_str("    </tr>\n");
    }

    // Folders first, in path order.
    for child_path in &folder.subfolders {
        let child_name = leaf_name(child_path);
        html.push_str("    <tr>\n");
        let _ = writeln!(
            html,
            "      <td class=\"icon\"><a href=\"{child_name}\"><img src=\"{}\" alt=\"\"></a></td>",
            ctx.asset_href(&ctx.folder_icon_name)
        );
        let _ = writeln!(
            html,
            "      <td class=\"name\"><a href=\"{child_name}\">{child_name}</a></td>"
        );
        html.push_str("      <td class=\"size\"></td>\n");
        html.push_str("      <td class=\"size-units\"></td>\n");
        html.push_str("      <td class=\"last-modified\"></td>\n");
        html.push_str("    </tr>\n");
    }

    // Files next, in path order, skipping infrastructure filenames.
    for file in folder.files.values() {
        if ctx.is_reserved(&file.filename) {
            continue;
        }
        let humanized = humanize_bytes(file.size, ctx.decimal_units);
        let (size, units) = humanized.split_once(' ').unwrap_or((humanized.as_str(), ""));
        html.push_str("    <tr>\n");
        html.push_str("      <td class=\"icon\"></td>\n");
        let _ = writeln!(
            html,
            "      <td class=\"name\"><a href=\"{0}\">{0}</a></td>",
            file.filename
        );
        let _ = writeln!(html, "      <td class=\"size\">{size}</td>");
        let _ = writeln!(html, "      <td class=\"size-units\">{units}</td>");
        let _ = writeln!(
            html,
            "      <td class=\"last-modified\">{}</td>",
            file.last_modified.as_deref().unwrap_or("")
        );
        html.push_str("    </tr>\n");
    }

    html.push_str("  </tbody>\n");
    html.push_str("</table>\n");
    html.push_str("</body>\n");
    html.push_str("</html>\n");
    html
}

/// Convert a byte count into a human-readable size, e.g. 1024 into
/// `"1.0 kB"` (SI) or `"1.0 KiB"` (binary).
pub fn humanize_bytes(bytes: u64, decimal: bool) -> String {
    let base: u64 = if decimal { 1000 } else { 1024 };
    if bytes < base {
        return format!("{bytes} B");
    }
    let exp = ((bytes as f64).ln() / (base as f64).ln()) as u32;
    let scale = bytes as f64 / (base as f64).powi(exp as i32);
    let letters = if decimal {
        ["k", "M", "G", "T", "P", "E"]
    } else {
        ["K", "M", "G", "T", "P", "E"]
    };
    let letter = letters[(exp as usize - 1).min(letters.len() - 1)];
    let infix = if decimal { "" } else { "i" };
    format!("{scale:.1} {letter}{infix}B")
}
