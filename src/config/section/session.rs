//! `[session]` section configuration.
//!
//! Defaults applied when an editing session starts.
//!
//! # Example
//!
//! ```toml
//! [session]
//! author = "Jane"             # Pre-filled author field
//! aspect_lock = true          # Keep width/height proportional
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Author pre-filled into new documents.
    pub author: Option<String>,

    /// Whether editing one image dimension recomputes the other.
    pub aspect_lock: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            author: None,
            aspect_lock: true,
        }
    }
}
