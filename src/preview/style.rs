//! Inline styles for section images.

use std::fmt::Write as _;

use crate::document::{DEFAULT_DIMENSION, ImagePosition, Section};
use crate::utils::html::{escape, escape_attr};

/// Shown where a markdown image matches no section.
pub const MISSING_IMAGE: &str = "Image non trouvée";

fn position_style(position: ImagePosition) -> &'static str {
    match position {
        ImagePosition::Top => "display:block;margin:0 auto 10px",
        ImagePosition::TopLeft => "float:left;margin-right:10px;margin-bottom:10px",
        ImagePosition::TopRight => "float:right;margin-left:10px;margin-bottom:10px",
    }
}

/// `style` attribute for a section image.
pub fn image_style(section: &Section) -> String {
    let mut style = String::with_capacity(96);
    let _ = write!(
        style,
        "max-width:100%;width:{}px;height:{}px;{}",
        section.image_width.unwrap_or(DEFAULT_DIMENSION),
        section.image_height.unwrap_or(DEFAULT_DIMENSION),
        position_style(section.image_position),
    );
    style
}

/// Image block for a matched section. `src` is the stored reference.
pub fn image_html(section: &Section, alt: &str) -> String {
    let alt = if alt.is_empty() { "Image" } else { alt };
    format!(
        r#"<span class="section-image"><img src="{}" alt="{}" style="{}"></span>"#,
        escape_attr(&section.image),
        escape_attr(alt),
        image_style(section),
    )
}

/// Placeholder for an image no section claims.
pub fn missing_html() -> String {
    format!(
        r#"<span class="section-image section-image-missing">{}</span>"#,
        escape(MISSING_IMAGE)
    )
}
