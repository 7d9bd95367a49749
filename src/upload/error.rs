//! Submission errors.
//!
//! Every variant is shown to the user as a single line; the document is left
//! untouched so the submission can be retried.

use thiserror::Error;

/// Shown when the server gives no usable message.
pub const FALLBACK_MESSAGE: &str = "the article could not be saved";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("cannot set up the HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("cannot reach {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A 200 reply whose body is not the expected JSON.
    #[error("unexpected reply from {url}")]
    Reply {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any status other than 200.
    #[error("{message} (HTTP {status})")]
    Rejected { status: u16, message: String },

    #[error("object store reply has no `secure_url`")]
    MissingSecureUrl,

    #[error("`{0}` is not configured")]
    NotConfigured(&'static str),
}

impl UploadError {
    pub(crate) fn network(url: &str, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn reply(url: &str, source: reqwest::Error) -> Self {
        Self::Reply {
            url: url.to_string(),
            source,
        }
    }
}
