//! `[slug]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [slug]
//! mode = "strict"             # strict | ascii
//! separator = "dash"          # dash | underscore
//! ```

use serde::{Deserialize, Serialize};

/// How non-ASCII letters in a title are treated when deriving the slug.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlugMode {
    /// Drop every character outside `[A-Za-z0-9_-]` and whitespace (default).
    ///
    /// `"Café du Sport!"` becomes `"caf-du-sport"`.
    #[default]
    Strict,
    /// Transliterate Unicode to ASCII first, then apply the strict rule.
    ///
    /// `"Café du Sport!"` becomes `"cafe-du-sport"`.
    Ascii,
}

/// Separator character for slugs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlugSeparator {
    /// Dash separator (`-`) (default).
    #[default]
    Dash,
    /// Underscore separator (`_`).
    Underscore,
}

impl SlugSeparator {
    /// Get the character representation.
    pub const fn as_char(&self) -> char {
        match self {
            Self::Dash => '-',
            Self::Underscore => '_',
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SlugConfig {
    /// Treatment of non-ASCII letters.
    pub mode: SlugMode,
    /// Separator replacing whitespace runs.
    pub separator: SlugSeparator,
}
