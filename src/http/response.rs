//! HTTP response building module
//!
//! Provides builders for the responses the file server sends, decoupled from
//! request handling.

use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, LOCATION};
use hyper::{Response, StatusCode};
use std::time::SystemTime;
use tokio::fs::File;

use super::body::{self, ResponseBody};
use super::cache;
use super::path::html_escape;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Build 200 response streaming a file
pub fn build_file_response(
    file: File,
    content_type: &str,
    len: u64,
    modified: Option<SystemTime>,
    is_head: bool,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, len);

    if let Some(modified) = modified {
        builder = builder.header(LAST_MODIFIED, cache::format_http_date(modified));
    }

    let body = if is_head {
        body::empty()
    } else {
        body::from_file(file)
    };

    builder
        .body(body)
        .unwrap_or_else(|e| fallback_response("200", &e))
}

/// Build 304 Not Modified response
pub fn build_304_response(modified: SystemTime) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(LAST_MODIFIED, cache::format_http_date(modified))
        .body(body::empty())
        .unwrap_or_else(|e| fallback_response("304", &e))
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<ResponseBody> {
    let content_length = content.len();
    let body = if is_head {
        body::empty()
    } else {
        body::full(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, HTML_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length)
        .body(body)
        .unwrap_or_else(|e| fallback_response("HTML", &e))
}

/// Build 301 redirect response (used to add a trailing slash to directories)
pub fn build_redirect_response(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .header(CONTENT_LENGTH, 0)
        .body(body::empty())
        .unwrap_or_else(|e| fallback_response("301", &e))
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_LENGTH, 0)
        .body(body::empty())
        .unwrap_or_else(|e| fallback_response("OPTIONS", &e))
}

/// Build 404 Not Found response
pub fn build_404_response(message: &str, is_head: bool) -> Response<ResponseBody> {
    build_error_response(StatusCode::NOT_FOUND, message, is_head)
}

/// Build 501 Not Implemented response for an unsupported method
///
/// `HEAD` is always supported, so this page always carries a body.
pub fn build_501_response(method: &str) -> Response<ResponseBody> {
    build_error_response(
        StatusCode::NOT_IMPLEMENTED,
        &format!("Unsupported method ('{method}')"),
        false,
    )
}

/// Build an HTML error page for `status`
fn build_error_response(
    status: StatusCode,
    message: &str,
    is_head: bool,
) -> Response<ResponseBody> {
    let page = error_page(status, message);
    let content_length = page.len();
    let body = if is_head {
        body::empty()
    } else {
        body::full(page)
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, HTML_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length)
        .body(body)
        .unwrap_or_else(|e| fallback_response(status.as_str(), &e))
}

fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Error response</title>
</head>
<body>
<h1>Error response</h1>
<p>Error code: {code}</p>
<p>Message: {message}.</p>
<p>Error code explanation: {code} - {reason}.</p>
</body>
</html>
"#,
        code = status.as_u16(),
        message = html_escape(message),
    )
}

/// Log a response build error and fall back to a bare 500
fn fallback_response(status: &str, error: &hyper::http::Error) -> Response<ResponseBody> {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
    let mut response = Response::new(body::empty());
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
