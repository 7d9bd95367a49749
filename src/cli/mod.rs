//! Command-line interface module.
//!
//! | Command   | Action                                           |
//! |-----------|--------------------------------------------------|
//! | `init`    | write a default `postform.toml`                  |
//! | `edit`    | interactive session                              |
//! | `render`  | markdown to stdout or a file                     |
//! | `preview` | HTML preview file, or `--serve` it               |
//! | `submit`  | upload the article                               |

mod args;
pub mod edit;
pub mod init;
pub mod preview;
pub mod render;
pub mod submit;

pub use args::{Cli, Commands, SourceArgs};

use anyhow::Result;

use crate::config::FormConfig;
use crate::document::Document;
use crate::session::Session;

/// Build the document from a markdown file or a script, without prompting.
pub(crate) fn load_document(source: &SourceArgs, config: &FormConfig) -> Result<Document> {
    let mut session = Session::new(config)?;
    session.load(&source.source)?;
    Ok(session.finish())
}
