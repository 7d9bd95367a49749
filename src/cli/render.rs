//! `postform render`: print the article markdown.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use super::{SourceArgs, load_document};
use crate::config::FormConfig;
use crate::log;
use crate::markdown::render;

pub fn run(config: &FormConfig, source: &SourceArgs, output: Option<&Path>) -> Result<()> {
    let doc = load_document(source, config)?;
    let markdown = render(&doc, &config.render);

    match output {
        Some(path) => {
            fs::write(path, &markdown)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log!("render"; "wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(markdown.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
