//! MIME type detection utilities.
//!
//! Provides consistent MIME type detection for uploaded section images,
//! the preview server, and the submitted markdown file.

use std::path::Path;

/// Common MIME type constants.
pub mod types {
    // Text
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const MARKDOWN: &str = "text/markdown";

    // Images
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const AVIF: &str = "image/avif";
    pub const SVG: &str = "image/svg+xml";
    pub const BMP: &str = "image/bmp";
}

/// Guess MIME type from file extension; `None` when unknown.
pub fn from_path(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    from_extension(ext.as_deref())
}

fn from_extension(ext: Option<&str>) -> Option<&'static str> {
    let mime = match ext {
        Some("html" | "htm") => types::HTML,
        Some("txt") => types::PLAIN,
        Some("md" | "markdown") => types::MARKDOWN,

        Some("png") => types::PNG,
        Some("jpg" | "jpeg") => types::JPEG,
        Some("gif") => types::GIF,
        Some("webp") => types::WEBP,
        Some("avif") => types::AVIF,
        Some("svg") => types::SVG,
        Some("bmp") => types::BMP,

        _ => return None,
    };
    Some(mime)
}
