//! Local preview server.
//!
//! Serves a snapshot of the article taken when the server starts:
//!
//! | Path            | Content                 |
//! |-----------------|-------------------------|
//! | `/`             | preview page (HTML)     |
//! | `/article.md`   | rendered markdown       |
//!
//! Ctrl+C unblocks the request loop and returns.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::config::FormConfig;
use crate::document::Document;
use crate::markdown::render;
use crate::utils::mime::types::{HTML, MARKDOWN, PLAIN};
use crate::{debug, log};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// What a request path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Page,
    Markdown,
    NotFound,
}

fn route(url: &str) -> Route {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path {
        "/" | "/index.html" => Route::Page,
        "/article.md" => Route::Markdown,
        _ => Route::NotFound,
    }
}

struct Snapshot {
    page: String,
    markdown: String,
}

/// Bound server ready to accept requests.
pub struct PreviewServer {
    server: Arc<Server>,
    addr: SocketAddr,
    snapshot: Snapshot,
}

impl PreviewServer {
    /// Render `doc` and bind the configured address.
    pub fn bind(doc: &Document, config: &FormConfig) -> Result<Self> {
        Self::bind_at(doc, config, config.preview.interface, config.preview.port)
    }

    fn bind_at(doc: &Document, config: &FormConfig, interface: IpAddr, port: u16) -> Result<Self> {
        let snapshot = Snapshot {
            page: super::render_page(doc, &config.render),
            markdown: render(doc, &config.render),
        };
        let (server, addr) = bind_with_retry(interface, port)?;
        Ok(Self {
            server: Arc::new(server),
            addr,
            snapshot,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Handle that stops [`run`](Self::run) from another thread.
    pub fn unblocker(&self) -> impl Fn() + Send + Sync + 'static {
        let server = Arc::clone(&self.server);
        move || server.unblock()
    }

    /// Install the Ctrl+C handler that stops the server.
    pub fn stop_on_ctrl_c(&self) {
        let stop = self.unblocker();
        if let Err(e) = ctrlc::set_handler(move || {
            log!("preview"; "shutting down...");
            stop();
        }) {
            debug!("preview"; "Ctrl+C handler not installed: {e}");
        }
    }

    /// Request loop (blocking until unblocked).
    pub fn run(self) {
        log!("preview"; "http://{}", self.addr);
        for request in self.server.incoming_requests() {
            if let Err(e) = handle_request(request, &self.snapshot) {
                log!("preview"; "request error: {e}");
            }
        }
    }
}

/// Bind to the interface, trying the next ports if `base_port` is taken.
fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        match Server::http(SocketAddr::new(interface, port)) {
            Ok(server) => {
                if offset > 0 {
                    log!("preview"; "port {} in use, using {} instead", base_port, port);
                }
                let addr = server
                    .server_addr()
                    .to_ip()
                    .unwrap_or_else(|| SocketAddr::new(interface, port));
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

fn handle_request(request: Request, snapshot: &Snapshot) -> Result<()> {
    debug!("preview"; "{} {}", request.method(), request.url());
    let (status, content_type, body) = match route(request.url()) {
        Route::Page => (200, HTML, snapshot.page.as_bytes()),
        Route::Markdown => (200, MARKDOWN, snapshot.markdown.as_bytes()),
        Route::NotFound => (404, PLAIN, b"404 Not Found".as_slice()),
    };

    let header = content_type_header(content_type)?;
    if request.method() == &Method::Head {
        let response = Response::empty(StatusCode(status)).with_header(header);
        return request.respond(response).map_err(Into::into);
    }

    let response = Response::from_data(body.to_vec())
        .with_status_code(StatusCode(status))
        .with_header(header);
    request.respond(response)?;
    Ok(())
}

fn content_type_header(content_type: &'static str) -> Result<Header> {
    let value = if content_type.contains("charset") {
        content_type.to_string()
    } else {
        format!("{content_type}; charset=utf-8")
    };
    Header::from_bytes("Content-Type", value).map_err(|()| anyhow!("invalid header value"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::thread;

    #[test]
    fn test_routes() {
        assert_eq!(route("/"), Route::Page);
        assert_eq!(route("/?reload=1"), Route::Page);
        assert_eq!(route("/index.html"), Route::Page);
        assert_eq!(route("/article.md"), Route::Markdown);
        assert_eq!(route("/favicon.ico"), Route::NotFound);
    }

    #[test]
    fn test_serves_snapshot() {
        let mut doc = Document::default();
        doc.set_metadata_field("title", "Served").unwrap();
        doc.set_section_text(0, "Hello from the server");

        let config = FormConfig::default();
        let server =
            PreviewServer::bind_at(&doc, &config, IpAddr::V4(Ipv4Addr::LOCALHOST), 0).unwrap();
        let base = format!("http://{}", server.addr());
        let stop = server.unblocker();
        let handle = thread::spawn(move || server.run());

        let page = reqwest::blocking::get(format!("{base}/")).unwrap();
        assert_eq!(page.status().as_u16(), 200);
        assert!(page.text().unwrap().contains("Hello from the server"));

        let md = reqwest::blocking::get(format!("{base}/article.md")).unwrap();
        assert!(
            md.headers()["content-type"]
                .to_str()
                .unwrap()
                .starts_with("text/markdown")
        );
        assert!(md.text().unwrap().contains("slug: \"served\""));

        let missing = reqwest::blocking::get(format!("{base}/nope")).unwrap();
        assert_eq!(missing.status().as_u16(), 404);

        stop();
        handle.join().unwrap();
    }
}
