//! `postform preview`: write or serve the HTML preview.

use anyhow::Result;

use super::{SourceArgs, load_document};
use crate::config::FormConfig;
use crate::log;
use crate::preview::{serve::PreviewServer, write_page};

pub fn run(config: &FormConfig, source: &SourceArgs, serve: bool) -> Result<()> {
    let doc = load_document(source, config)?;

    if serve {
        let server = PreviewServer::bind(&doc, config)?;
        server.stop_on_ctrl_c();
        server.run();
        return Ok(());
    }

    let path = &config.preview.output;
    write_page(&doc, &config.render, path)?;
    log!("preview"; "wrote {}", path.display());
    Ok(())
}
