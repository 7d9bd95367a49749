//! `postform submit`: upload the article.

use anyhow::Result;

use super::{SourceArgs, load_document};
use crate::config::{FormConfig, UploadMode};
use crate::log;
use crate::markdown::render;
use crate::upload::{self, file_name};

pub fn run(config: &FormConfig, source: &SourceArgs, dry_run: bool) -> Result<()> {
    let doc = load_document(source, config)?;

    if dry_run {
        let markdown = render(&doc, &config.render);
        let target = match config.upload.mode {
            UploadMode::Direct => config.upload.endpoint.as_str(),
            UploadMode::ObjectStore => config.upload.object_store.url.as_deref().unwrap_or_default(),
        };
        log!(
            "upload";
            "would send {} ({} bytes) to {}",
            file_name(&doc.metadata.title),
            markdown.len(),
            target
        );
        return Ok(());
    }

    let receipt = upload::submit(&doc, &config.render, &config.upload)?;
    match receipt.markdown_url {
        Some(url) => log!("done"; "article saved ({url})"),
        None => log!("done"; "article saved"),
    }
    Ok(())
}
