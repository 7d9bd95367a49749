//! Article submission.
//!
//! | Mode           | Requests                                              |
//! |----------------|-------------------------------------------------------|
//! | `direct`       | one multipart POST: `file` (`<title>.md`), `title`, `category` |
//! | `object-store` | raw upload to the store, then JSON metadata to the backend |
//!
//! A request succeeds only on HTTP 200.

mod error;
mod multipart;
mod object_store;

pub use error::{FALLBACK_MESSAGE, UploadError};
pub use multipart::file_name;

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::{RenderConfig, UploadConfig, UploadMode};
use crate::document::Document;
use crate::markdown::render;
use crate::{debug, log};

/// What a successful submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Public URL of the stored markdown (`object-store` mode).
    pub markdown_url: Option<String>,
}

/// Render and submit the article.
pub fn submit(
    doc: &Document,
    render_config: &RenderConfig,
    config: &UploadConfig,
) -> Result<Receipt, UploadError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(UploadError::Client)?;
    let markdown = render(doc, render_config);
    debug!("upload"; "{} bytes, mode {:?}", markdown.len(), config.mode);

    match config.mode {
        UploadMode::Direct => {
            let form = multipart::article_form(markdown, &doc.metadata.title, doc.metadata.category)?;
            log!("upload"; "POST {}", config.endpoint);
            let response = client
                .post(&config.endpoint)
                .multipart(form)
                .send()
                .map_err(|e| UploadError::network(&config.endpoint, e))?;
            multipart::expect_ok(response)?;
            Ok(Receipt { markdown_url: None })
        }
        UploadMode::ObjectStore => {
            let url = object_store::submit(&client, &doc.metadata, markdown, config)?;
            Ok(Receipt {
                markdown_url: Some(url),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendConfig, ObjectStoreConfig};
    use std::io::Read;
    use std::net::{Ipv4Addr, SocketAddr};
    use std::thread::{self, JoinHandle};
    use tiny_http::{Response, Server};

    /// A request as seen by the fake server.
    struct Captured {
        url: String,
        content_type: String,
        body: String,
    }

    /// Answer `replies` in order, returning the base URL and the captured requests.
    fn fake_server(replies: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Captured>>) {
        let server = Server::http(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).unwrap();
        let base = format!("http://{}", server.server_addr().to_ip().unwrap());
        let handle = thread::spawn(move || {
            let mut captured = Vec::new();
            for (status, body) in replies {
                let mut request = server.recv().unwrap();
                let mut content = String::new();
                request.as_reader().read_to_string(&mut content).unwrap();
                let content_type = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Content-Type"))
                    .map(|h| h.value.to_string())
                    .unwrap_or_default();
                captured.push(Captured {
                    url: request.url().to_string(),
                    content_type,
                    body: content,
                });
                request
                    .respond(Response::from_string(body).with_status_code(status))
                    .unwrap();
            }
            captured
        });
        (base, handle)
    }

    fn article() -> Document {
        let mut doc = Document::default();
        doc.set_metadata_field("title", "Hello World").unwrap();
        doc.set_metadata_field("category", "Events").unwrap();
        doc.set_section_text(0, "Hi");
        doc
    }

    fn direct(endpoint: String) -> UploadConfig {
        UploadConfig {
            endpoint,
            ..Default::default()
        }
    }

    #[test]
    fn test_direct_upload_fields() {
        let (base, server) = fake_server(vec![(200, "{}")]);
        let config = direct(format!("{base}/api/upload"));

        let receipt = submit(&article(), &RenderConfig::default(), &config).unwrap();
        assert_eq!(receipt.markdown_url, None);

        let requests = server.join().unwrap();
        let request = &requests[0];
        assert_eq!(request.url, "/api/upload");
        assert!(request.content_type.starts_with("multipart/form-data"));
        assert!(request.body.contains(r#"name="file"; filename="Hello World.md""#));
        assert!(request.body.contains("Content-Type: text/markdown"));
        assert!(request.body.contains("slug: \"hello-world\""));
        assert!(request.body.contains("name=\"title\"\r\n\r\nHello World\r\n"));
        assert!(request.body.contains("name=\"category\"\r\n\r\nEvents\r\n"));
    }

    #[test]
    fn test_non_200_success_status_is_an_error() {
        let (base, server) = fake_server(vec![(201, "")]);
        let err = submit(&article(), &RenderConfig::default(), &direct(base)).unwrap_err();
        server.join().unwrap();

        match err {
            UploadError::Rejected { status, message } => {
                assert_eq!(status, 201);
                assert_eq!(message, FALLBACK_MESSAGE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_server_message_surfaces() {
        let (base, server) = fake_server(vec![(400, r#"{"message":"title already used"}"#)]);
        let err = submit(&article(), &RenderConfig::default(), &direct(base)).unwrap_err();
        server.join().unwrap();
        assert_eq!(err.to_string(), "title already used (HTTP 400)");
    }

    #[test]
    fn test_unreachable_endpoint() {
        // bind then drop to get a port nobody listens on
        let port = {
            let server = Server::http(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).unwrap();
            server.server_addr().to_ip().unwrap().port()
        };
        let config = direct(format!("http://127.0.0.1:{port}/api/upload"));
        let err = submit(&article(), &RenderConfig::default(), &config).unwrap_err();
        assert!(matches!(err, UploadError::Network { .. }), "{err}");
    }

    #[test]
    fn test_object_store_flow() {
        let (base, server) = fake_server(vec![
            (200, r#"{"secure_url":"https://cdn.example/raw/hello.md"}"#),
            (200, r#"{"ok":true}"#),
        ]);
        let config = UploadConfig {
            mode: UploadMode::ObjectStore,
            object_store: ObjectStoreConfig {
                url: Some(format!("{base}/raw/upload")),
                preset: "blog".to_string(),
            },
            backend: BackendConfig {
                url: Some(format!("{base}/api/articles")),
            },
            ..Default::default()
        };

        let receipt = submit(&article(), &RenderConfig::default(), &config).unwrap();
        assert_eq!(
            receipt.markdown_url.as_deref(),
            Some("https://cdn.example/raw/hello.md")
        );

        let requests = server.join().unwrap();
        assert_eq!(requests[0].url, "/raw/upload");
        assert!(requests[0].body.contains("name=\"upload_preset\"\r\n\r\nblog\r\n"));

        assert_eq!(requests[1].url, "/api/articles");
        assert!(requests[1].content_type.starts_with("application/json"));
        let payload: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
        assert_eq!(payload["title"], "Hello World");
        assert_eq!(payload["slug"], "hello-world");
        assert_eq!(payload["markdownUrl"], "https://cdn.example/raw/hello.md");
    }

    #[test]
    fn test_object_store_malformed_reply() {
        let (base, server) = fake_server(vec![(200, "<html>upload ok</html>")]);
        let store_url = format!("{base}/raw");
        let config = UploadConfig {
            mode: UploadMode::ObjectStore,
            object_store: ObjectStoreConfig {
                url: Some(store_url.clone()),
                ..Default::default()
            },
            backend: BackendConfig {
                url: Some(format!("{base}/api")),
            },
            ..Default::default()
        };
        let err = submit(&article(), &RenderConfig::default(), &config).unwrap_err();
        server.join().unwrap();

        match &err {
            UploadError::Reply { url, .. } => assert_eq!(url, &store_url),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("unexpected reply from"));
    }

    #[test]
    fn test_object_store_without_secure_url() {
        let (base, server) = fake_server(vec![(200, r#"{"url":"x"}"#)]);
        let config = UploadConfig {
            mode: UploadMode::ObjectStore,
            object_store: ObjectStoreConfig {
                url: Some(format!("{base}/raw")),
                ..Default::default()
            },
            backend: BackendConfig {
                url: Some(format!("{base}/api")),
            },
            ..Default::default()
        };
        let err = submit(&article(), &RenderConfig::default(), &config).unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, UploadError::MissingSecureUrl));
    }
}
