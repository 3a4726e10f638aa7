//! Static file serving.
//!
//! # Responsibilities
//! - Serve files under a fixed root via `tower_http::services::ServeDir`
//! - Answer directories that have no `index.html` with an HTML listing
//!
//! # Design Decisions
//! - The root is fixed when the service is built; the process working
//!   directory is never touched
//! - Not-found, range and conditional handling are ServeDir's own; the listing
//!   only runs when ServeDir answered 404 for a path ending in `/`
//! - Listing paths are resolved segment by segment; `..` never escapes the root

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Bytes escaped in listing links: everything but unreserved URL characters.
const HREF_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// File service for one serve directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    files: ServeDir,
}

impl StaticFiles {
    /// Build the file service for `root`. Directories resolve to their `index.html`.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            files: ServeDir::new(root).append_index_html_on_directories(true),
        }
    }

    /// Serve one request.
    pub async fn serve(&self, request: Request<Body>) -> Response {
        let method = request.method().clone();
        let path = request.uri().path().to_owned();

        let response = match self.files.clone().oneshot(request).await {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        };

        let wants_listing = response.status() == StatusCode::NOT_FOUND
            && path.ends_with('/')
            && (method == Method::GET || method == Method::HEAD);
        if !wants_listing {
            return response;
        }

        match self.list_directory(&path).await {
            Some(listing) => listing,
            None => response,
        }
    }

    /// Render the listing for `request_path`, or `None` when it is not a
    /// readable directory under the root.
    async fn list_directory(&self, request_path: &str) -> Option<Response> {
        let dir = resolve(&self.root, request_path)?;
        if !tokio::fs::metadata(&dir).await.ok()?.is_dir() {
            return None;
        }
        let mut read_dir = tokio::fs::read_dir(&dir).await.ok()?;

        let mut entries = Vec::new();
        loop {
            match read_dir.next_entry().await {
                Ok(Some(entry)) => {
                    let mut name = entry.file_name().to_string_lossy().into_owned();
                    if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
                        name.push('/');
                    }
                    entries.push(name);
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Directory listing failed");
                    return None;
                }
            }
        }
        entries.sort_by_key(|name| name.to_lowercase());

        let display_path = percent_decode_str(request_path).decode_utf8_lossy();
        let html = render_listing(&display_path, &entries);

        Some(
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8")),
                    (header::CONTENT_LENGTH, HeaderValue::from(html.len())),
                ],
                html,
            )
                .into_response(),
        )
    }
}

/// Map a request path onto a directory under `root`.
fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut dir = root.to_path_buf();
    for segment in request_path.split('/') {
        let segment = percent_decode_str(segment).decode_utf8().ok()?;
        match segment.as_ref() {
            "" | "." => continue,
            ".." => return None,
            s if s.contains(['/', '\\', '\0']) => return None,
            s => dir.push(s),
        }
    }
    Some(dir)
}

fn render_listing(display_path: &str, entries: &[String]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = format!(
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for name in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            utf8_percent_encode(name, HREF_ESCAPE),
            escape_html(name)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
