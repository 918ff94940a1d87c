//! Static file serving module
//!
//! Resolves request paths under the document root and serves files,
//! index files and directory listings.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, path, ResponseBody};
use crate::logger;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

const FILE_NOT_FOUND: &str = "File not found";

/// Serve a GET/HEAD request from the document root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    let decoded = path::percent_decode(ctx.path);
    let Some(relative) = path::normalize(&decoded) else {
        return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
    };

    let requested = state.root.join(relative);
    let Some(resolved) = resolve_within_root(&state.root, &requested, ctx.path).await else {
        return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
    };

    let Ok(metadata) = fs::metadata(&resolved).await else {
        return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
    };

    if metadata.is_dir() {
        return serve_directory(ctx, state, &resolved, &decoded).await;
    }

    // A trailing slash only ever names a directory
    if ctx.path.ends_with('/') {
        return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
    }

    serve_file(ctx, &resolved, &requested).await
}

/// Serve a directory: redirect to the slash form, then index file or listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
    decoded: &str,
) -> Response<ResponseBody> {
    if !ctx.path.ends_with('/') {
        return http::build_redirect_response(&redirect_location(ctx.path, ctx.query));
    }

    for index_file in &state.config.http.index_files {
        let index_path = dir.join(index_file);
        let Some(resolved) = resolve_within_root(&state.root, &index_path, ctx.path).await else {
            continue;
        };
        if fs::metadata(&resolved).await.is_ok_and(|meta| meta.is_file()) {
            return serve_file(ctx, &resolved, &index_path).await;
        }
    }

    if !state.config.http.directory_listing {
        return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
    }

    listing::serve_listing(ctx, dir, decoded).await
}

/// Slash-terminated form of a directory path, query preserved
///
/// Leading slashes are collapsed so the result can never be read as a
/// protocol-relative URL pointing at another host.
fn redirect_location(path: &str, query: Option<&str>) -> String {
    let path = path.trim_start_matches('/');
    match query {
        Some(query) => format!("/{path}/?{query}"),
        None => format!("/{path}/"),
    }
}

/// Serve a regular file, honouring `If-Modified-Since`
///
/// `resolved` is the canonical path that is opened; the content type is
/// guessed from `requested`, the name the client asked for.
async fn serve_file(
    ctx: &RequestContext<'_>,
    resolved: &Path,
    requested: &Path,
) -> Response<ResponseBody> {
    let file = match File::open(resolved).await {
        Ok(file) => file,
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to open file '{}': {e}",
                resolved.display()
            ));
            return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
        }
    };

    let metadata = match file.metadata().await {
        Ok(metadata) => metadata,
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to stat file '{}': {e}",
                resolved.display()
            ));
            return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
        }
    };

    let modified = metadata.modified().ok();
    if let Some(modified) = modified {
        if cache::is_not_modified(modified, ctx.if_modified_since, ctx.has_if_none_match) {
            return http::build_304_response(modified);
        }
    }

    http::build_file_response(
        file,
        mime::content_type_for(requested),
        metadata.len(),
        modified,
        ctx.is_head,
    )
}

/// Canonicalize `candidate` and make sure it is still inside `root`
///
/// Missing paths resolve to `None`, as do symlinks leading out of the root.
async fn resolve_within_root(
    root: &Path,
    candidate: &Path,
    request_path: &str,
) -> Option<PathBuf> {
    // Missing files are common (404), no need to log
    let canonical = fs::canonicalize(candidate).await.ok()?;
    if canonical.starts_with(root) {
        Some(canonical)
    } else {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path} -> {}",
            canonical.display()
        ));
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_location() {
        assert_eq!(redirect_location("/docs", None), "/docs/");
        assert_eq!(redirect_location("/docs", Some("a=1")), "/docs/?a=1");
        assert_eq!(redirect_location("//evil.example", None), "/evil.example/");
        assert_eq!(redirect_location("///evil.example/x", Some("q")), "/evil.example/x/?q");
    }
}
