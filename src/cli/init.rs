//! `postform init`: write a commented default configuration.

use anyhow::{Context, Result, bail};
use std::fs;

use crate::config::FormConfig;
use crate::log;

/// Default config rendered as TOML under a short header.
pub fn config_template() -> Result<String> {
    let body = toml::to_string_pretty(&FormConfig::default())
        .context("Failed to serialize default config")?;
    Ok(format!(
        "# postform configuration (v{})\n\
         #\n\
         # Every key is optional. Object-store uploads also need:\n\
         #\n\
         # [upload.object_store]\n\
         # url = \"https://api.cloudinary.com/v1_1/<cloud>/raw/upload\"\n\
         #\n\
         # [upload.backend]\n\
         # url = \"http://localhost:5000/api/articles\"\n\n{body}",
        env!("CARGO_PKG_VERSION")
    ))
}

/// Write the template to `config.config_path`, or print it with `dry`.
pub fn write_config(config: &FormConfig, dry: bool, force: bool) -> Result<()> {
    let template = config_template()?;
    if dry {
        print!("{template}");
        return Ok(());
    }

    let path = &config.config_path;
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    fs::write(path, template).with_context(|| format!("Failed to write {}", path.display()))?;
    log!("init"; "wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_template_parses_back_to_defaults() {
        let template = config_template().unwrap();
        assert!(template.starts_with("# postform configuration"));

        let parsed = test_parse_config(&template);
        assert_eq!(parsed.upload, FormConfig::default().upload);
        assert_eq!(parsed.session, FormConfig::default().session);
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let config = FormConfig {
            config_path: dir.path().join("postform.toml"),
            ..Default::default()
        };

        write_config(&config, false, false).unwrap();
        assert!(write_config(&config, false, false).is_err());
        write_config(&config, false, true).unwrap();
    }
}
