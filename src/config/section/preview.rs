//! `[preview]` section configuration.
//!
//! Contains HTML preview output and preview server settings.
//!
//! # Example
//!
//! ```toml
//! [preview]
//! output = "preview.html"     # Written by `preview` (relative to config dir)
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 5278                 # HTTP port number
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the preview accessible from LAN.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

const PORT: FieldPath = FieldPath::new("preview.port");
const OUTPUT: FieldPath = FieldPath::new("preview.output");

/// Preview settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PreviewConfig {
    /// HTML file written by the `preview` command.
    pub output: PathBuf,

    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("preview.html"),
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5278,
        }
    }
}

impl PreviewConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.port == 0 {
            diag.error(PORT, "port must be between 1 and 65535");
        }
        if self.output.as_os_str().is_empty() {
            diag.error_with_hint(OUTPUT, "output path is empty", "use \"preview.html\"");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_preview_config() {
        let config = test_parse_config("[preview]\ninterface = \"0.0.0.0\"\nport = 8080");

        assert_eq!(
            config.preview.interface,
            IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
        );
        assert_eq!(config.preview.port, 8080);
    }

    #[test]
    fn test_preview_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(
            config.preview.interface,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
        assert_eq!(config.preview.port, 5278);
        assert_eq!(config.preview.output, PathBuf::from("preview.html"));
    }

    #[test]
    fn test_preview_config_ipv6() {
        let config = test_parse_config("[preview]\ninterface = \"::1\"");
        assert_eq!(config.preview.interface, IpAddr::V6(Ipv6Addr::LOCALHOST));
    }

    #[test]
    fn test_zero_port_rejected() {
        let config = test_parse_config("[preview]\nport = 0");
        let mut diag = ConfigDiagnostics::new();
        config.preview.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field, PORT);
    }
}
