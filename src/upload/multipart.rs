//! Multipart bodies and server replies.

use reqwest::blocking::Response;
use reqwest::blocking::multipart::{Form, Part};
use serde::Deserialize;

use super::error::{FALLBACK_MESSAGE, UploadError};
use crate::document::Category;
use crate::utils::mime::types::{MARKDOWN, PLAIN};

/// Longest plain-text body echoed back as an error message.
const MAX_MESSAGE_LEN: usize = 300;

/// `<title>.md`, or `article.md` for an untitled post.
pub fn file_name(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        "article.md".to_string()
    } else {
        format!("{title}.md")
    }
}

/// `file` + `title` + `category`, as the upload endpoint expects.
pub fn article_form(markdown: String, title: &str, category: Category) -> Result<Form, UploadError> {
    let file = Part::text(markdown)
        .file_name(file_name(title))
        .mime_str(MARKDOWN)
        .map_err(UploadError::Client)?;
    Ok(Form::new()
        .percent_encode_noop()
        .part("file", file)
        .text("title", title.to_string())
        .text("category", category.as_str()))
}

/// `file` + `upload_preset`, for an unsigned raw object-store upload.
pub fn raw_form(markdown: String, title: &str, preset: &str) -> Result<Form, UploadError> {
    let file = Part::text(markdown)
        .file_name(file_name(title))
        .mime_str(PLAIN)
        .map_err(UploadError::Client)?;
    Ok(Form::new()
        .percent_encode_noop()
        .part("file", file)
        .text("upload_preset", preset.to_string()))
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Succeed on exactly 200, otherwise turn the reply into [`UploadError::Rejected`].
pub fn expect_ok(response: Response) -> Result<Response, UploadError> {
    let status = response.status().as_u16();
    if status == 200 {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(UploadError::Rejected {
        status,
        message: server_message(&body).unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
    })
}

/// JSON `message` / `error` field, else a short plain-text body.
fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty());
    }
    if body.starts_with('<') || body.len() > MAX_MESSAGE_LEN {
        // HTML error pages and dumps are not messages
        return None;
    }
    Some(body.to_string())
}
