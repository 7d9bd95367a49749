//! Configuration section definitions.
//!
//! Each module corresponds to a section in `postform.toml`:
//!
//! | Module    | TOML Section  | Purpose                              |
//! |-----------|---------------|--------------------------------------|
//! | `session` | `[session]`   | Defaults for a new editing session   |
//! | `slug`    | `[slug]`      | Slug derivation                      |
//! | `render`  | `[render]`    | Markdown document shape              |
//! | `preview` | `[preview]`   | HTML preview file and server         |
//! | `upload`  | `[upload]`    | Article submission                   |

mod preview;
mod render;
mod session;
mod slug;
mod upload;

pub use preview::PreviewConfig;
pub use render::{RenderConfig, RenderVariant};
pub use session::SessionConfig;
pub use slug::{SlugConfig, SlugMode, SlugSeparator};
pub use upload::{BackendConfig, ObjectStoreConfig, UploadConfig, UploadMode};
