//! Utility modules.
//!
//! - [`slug`]: title → slug derivation
//! - [`date`]: ISO date checks and today's date
//! - [`html`]: HTML escaping for the preview
//! - [`mime`]: MIME type detection

pub mod date;
pub mod html;
pub mod mime;
pub mod slug;
