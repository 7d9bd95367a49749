//! `[render]` section configuration.
//!
//! Controls the shape of the generated markdown document.
//!
//! # Example
//!
//! ```toml
//! [render]
//! variant = "rich"            # rich | basic
//! asset_folder = false        # Prefix image paths with `<title>/`
//! ```

use serde::{Deserialize, Serialize};

/// Front-matter flavour.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RenderVariant {
    /// Core fields only: title, author, date, category, slug, image, cardImage.
    Basic,
    /// Core fields plus title images, `resume` and the `sections:` list (default).
    #[default]
    Rich,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Front-matter flavour.
    pub variant: RenderVariant,

    /// Emit section images as `<title>/<file>` to mimic a per-article asset folder.
    pub asset_folder: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_render_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.render.variant, RenderVariant::Rich);
        assert!(!config.render.asset_folder);
    }

    #[test]
    fn test_render_config() {
        let config = test_parse_config("[render]\nvariant = \"basic\"\nasset_folder = true");
        assert_eq!(config.render.variant, RenderVariant::Basic);
        assert!(config.render.asset_folder);
    }
}
