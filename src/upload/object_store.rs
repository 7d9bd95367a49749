//! Two-step submission: raw markdown to an object store, then metadata to
//! the backend.
//!
//! ```text
//! POST <object_store.url>  multipart{file, upload_preset}  → { "secure_url": ... }
//! POST <backend.url>       json{...metadata, markdownUrl}  → 200
//! ```

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::error::UploadError;
use super::multipart::{expect_ok, raw_form};
use crate::config::UploadConfig;
use crate::document::Metadata;
use crate::log;

#[derive(Deserialize)]
struct StoreReply {
    secure_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArticlePayload<'a> {
    #[serde(flatten)]
    metadata: &'a Metadata,
    markdown_url: &'a str,
}

/// Store the markdown, then register it. Returns the public markdown URL.
pub fn submit(
    client: &Client,
    metadata: &Metadata,
    markdown: String,
    config: &UploadConfig,
) -> Result<String, UploadError> {
    let store_url = config
        .object_store
        .url
        .as_deref()
        .ok_or(UploadError::NotConfigured("upload.object_store.url"))?;
    let backend_url = config
        .backend
        .url
        .as_deref()
        .ok_or(UploadError::NotConfigured("upload.backend.url"))?;

    let form = raw_form(markdown, &metadata.title, &config.object_store.preset)?;
    let response = client
        .post(store_url)
        .multipart(form)
        .send()
        .map_err(|e| UploadError::network(store_url, e))?;
    let reply: StoreReply = expect_ok(response)?
        .json()
        .map_err(|e| UploadError::reply(store_url, e))?;
    let markdown_url = reply.secure_url.ok_or(UploadError::MissingSecureUrl)?;
    log!("upload"; "stored markdown at {}", markdown_url);

    let payload = ArticlePayload {
        metadata,
        markdown_url: &markdown_url,
    };
    let response = client
        .post(backend_url)
        .json(&payload)
        .send()
        .map_err(|e| UploadError::network(backend_url, e))?;
    expect_ok(response)?;

    Ok(markdown_url)
}
