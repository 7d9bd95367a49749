//! `postform edit`: interactive session, or a script replay with `--script`.

use anyhow::Result;
use std::path::Path;

use crate::config::FormConfig;
use crate::session::Session;

pub fn run(config: &FormConfig, source: Option<&Path>, script: Option<&Path>) -> Result<()> {
    let mut session = Session::new(config)?;
    if let Some(source) = source {
        session.load(source)?;
    }
    match script {
        Some(script) => session.run_script(script),
        None => session.run_interactive(),
    }
}
