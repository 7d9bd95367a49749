//! `[upload]` section configuration.
//!
//! Where and how a finished article is submitted.
//!
//! # Example
//!
//! ```toml
//! [upload]
//! mode = "direct"                              # direct | object-store
//! endpoint = "http://localhost:5000/api/upload" # Multipart endpoint (direct mode)
//! timeout = 5                                  # Request timeout in seconds
//!
//! [upload.object_store]
//! url = "https://api.cloudinary.com/v1_1/demo/raw/upload"
//! preset = "articles"
//!
//! [upload.backend]
//! url = "http://localhost:5000/api/articles"
//! ```
//!
//! In `object-store` mode the markdown file is first stored as a raw asset,
//! then the metadata and the returned public URL are posted to the backend.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

const ENDPOINT: FieldPath = FieldPath::new("upload.endpoint");
const TIMEOUT: FieldPath = FieldPath::new("upload.timeout");
const STORE_URL: FieldPath = FieldPath::new("upload.object_store.url");
const BACKEND_URL: FieldPath = FieldPath::new("upload.backend.url");

/// Submission strategy.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum UploadMode {
    /// Single multipart POST carrying the markdown file (default).
    #[default]
    Direct,
    /// Raw upload to an object store, then a JSON POST to the backend.
    ObjectStore,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UploadConfig {
    /// Submission strategy.
    pub mode: UploadMode,

    /// Multipart endpoint used in `direct` mode.
    pub endpoint: String,

    /// Request timeout in seconds.
    pub timeout: u64,

    /// Object store settings (`object-store` mode).
    pub object_store: ObjectStoreConfig,

    /// Metadata backend settings (`object-store` mode).
    pub backend: BackendConfig,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            mode: UploadMode::Direct,
            endpoint: "http://localhost:5000/api/upload".to_string(),
            timeout: 5,
            object_store: ObjectStoreConfig::default(),
            backend: BackendConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObjectStoreConfig {
    /// Raw upload URL.
    pub url: Option<String>,

    /// Unsigned upload preset sent as `upload_preset`.
    pub preset: String,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            preset: "articles".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackendConfig {
    /// Article metadata endpoint.
    pub url: Option<String>,
}

impl UploadConfig {
    /// Validate upload configuration.
    ///
    /// # Checks
    /// - `timeout` is positive.
    /// - `direct`: `endpoint` is an http(s) URL.
    /// - `object-store`: both `object_store.url` and `backend.url` are set and http(s).
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.timeout == 0 {
            diag.error_with_hint(TIMEOUT, "timeout must be positive", "the default is 5 seconds");
        }

        match self.mode {
            UploadMode::Direct => check_http_url(ENDPOINT, Some(&self.endpoint), diag),
            UploadMode::ObjectStore => {
                check_http_url(STORE_URL, self.object_store.url.as_deref(), diag);
                check_http_url(BACKEND_URL, self.backend.url.as_deref(), diag);
            }
        }
    }
}

/// Record an error unless `value` is an absolute http or https URL.
fn check_http_url(field: FieldPath, value: Option<&str>, diag: &mut ConfigDiagnostics) {
    let Some(value) = value else {
        diag.error(field, format!("{field} is required for object-store uploads"));
        return;
    };
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => diag.error(field, format!("unsupported scheme `{}`", url.scheme())),
        Err(err) => diag.error(field, format!("invalid URL `{value}`: {err}")),
    }
}
