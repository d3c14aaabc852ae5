//! HTTP response handlers.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::config::SiteConfig;
use crate::embed::serve::{NOT_FOUND_HTML, NotFoundVars, livereload_snippet};
use crate::render::inject_livereload;
use crate::utils::mime::{self, types};

/// Respond with a file from the output directory.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body)
}

/// Respond with 404: the site's own `404.html` when it has one, otherwise
/// the built-in page. Either way the live reload fragment is added so the
/// tab refreshes once the page exists.
pub fn respond_not_found(request: Request, config: &SiteConfig) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 404, types::HTML);
    }

    let custom = config.build.output.join("404.html");
    let page = fs::read_to_string(&custom).unwrap_or_else(|_| {
        NOT_FOUND_HTML.render(&NotFoundVars {
            path: &super::path::request_path(request.url()),
        })
    });
    let page = if config.build.livereload {
        inject_livereload(&page, &livereload_snippet())
    } else {
        page
    };

    send_body(request, 404, types::HTML, page.into_bytes())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, types::PLAIN, b"503 Service Unavailable".to_vec())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &str) -> Result<()> {
    let response = Response::empty(StatusCode(status));
    request.respond(with_headers(response, content_type))?;
    Ok(())
}

fn send_body(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> Result<()> {
    let response = Response::from_data(body).with_status_code(StatusCode(status));
    request.respond(with_headers(response, content_type))?;
    Ok(())
}

/// Content type plus `no-store`, so a reload always fetches the new build.
fn with_headers<R: Read>(response: Response<R>, content_type: &str) -> Response<R> {
    [("Content-Type", content_type), ("Cache-Control", "no-store")]
        .into_iter()
        .filter_map(|(key, value)| Header::from_bytes(key, value).ok())
        .fold(response, |response, header| response.with_header(header))
}
