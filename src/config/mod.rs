//! Configuration management for `postform.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── session    # [session]
//! │   ├── slug       # [slug]
//! │   ├── render     # [render]
//! │   ├── preview    # [preview]
//! │   └── upload     # [upload], [upload.object_store], [upload.backend]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # FormConfig (this file)
//! ```
//!
//! A missing config file is not an error: every section has defaults.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    BackendConfig, ObjectStoreConfig, PreviewConfig, RenderConfig, RenderVariant, SessionConfig,
    SlugConfig, SlugMode, SlugSeparator, UploadConfig, UploadMode,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands},
    debug, log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing postform.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Editing session defaults
    #[serde(default)]
    pub session: SessionConfig,

    /// Slug derivation
    #[serde(default)]
    pub slug: SlugConfig,

    /// Markdown document shape
    #[serde(default)]
    pub render: RenderConfig,

    /// HTML preview settings
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Submission settings
    #[serde(default)]
    pub upload: UploadConfig,
}

impl FormConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. Falls back to defaults
    /// rooted at cwd when none exists.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let (config_path, exists) = match find_config_file(&cwd, &cli.config) {
            Some(path) => (path, true),
            None => (cwd.join(&cli.config), false),
        };

        let mut config = if exists && !cli.is_init() {
            Self::from_path(&config_path)?
        } else {
            debug!("config"; "no {} found, using defaults", cli.config.display());
            Self::default()
        };

        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);
        config.config_path = config_path;
        config.finalize(&root, cli);

        if !cli.is_init() {
            config.validate()?;
        }

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Resolve paths and apply command-specific overrides.
    fn finalize(&mut self, root: &Path, cli: &Cli) {
        self.root = root.to_path_buf();
        crate::logger::set_verbose(cli.verbose);

        match &cli.command {
            Commands::Preview {
                output,
                interface,
                port,
                ..
            } => {
                Self::update_option(&mut self.preview.output, output.as_ref());
                Self::update_option(&mut self.preview.interface, interface.as_ref());
                Self::update_option(&mut self.preview.port, port.as_ref());
            }
            Commands::Submit { endpoint, .. } => {
                Self::update_option(&mut self.upload.endpoint, endpoint.as_ref());
            }
            Commands::Init { .. } | Commands::Edit { .. } | Commands::Render { .. } => {}
        }

        if self.preview.output.is_relative() {
            self.preview.output = self.root.join(&self.preview.output);
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.preview.validate(&mut diag);
        self.upload.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from TOML.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> FormConfig {
    let (parsed, ignored) = FormConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        // Invalid TOML syntax - unclosed bracket
        let result = FormConfig::parse_with_ignored("[upload\nendpoint = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_form_config_default() {
        let config = FormConfig::default();

        assert_eq!(config.config_path, PathBuf::new());
        assert!(config.session.aspect_lock);
        assert_eq!(config.preview.port, 5278);
        assert_eq!(config.upload.mode, UploadMode::Direct);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[render]\nvariant = \"basic\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = FormConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.render.variant, RenderVariant::Basic);
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let (_, ignored) = FormConfig::parse_with_ignored("[slug]\nmode = \"ascii\"").unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_validate_collects_every_section() {
        let config = test_parse_config("[preview]\nport = 0\n[upload]\ntimeout = 0");
        let err = config.validate().unwrap_err();
        let diag = match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::Diagnostics(diag)) => diag,
            other => panic!("unexpected error: {other:?}"),
        };
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let text = toml::to_string_pretty(&FormConfig::default()).unwrap();
        let parsed = test_parse_config(&text);
        assert_eq!(parsed.upload, UploadConfig::default());
        assert_eq!(parsed.preview, PreviewConfig::default());
    }
}
