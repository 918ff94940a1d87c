//! Directory listing module
//!
//! Renders an HTML index of a directory that has no index file.

use crate::handler::router::RequestContext;
use crate::http::{self, path, ResponseBody};
use crate::logger;
use hyper::Response;
use std::fmt::Write;
use std::io;
use std::path::Path;
use tokio::fs;

/// One entry of a rendered listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Text shown for the entry: directories get `/`, symlinks get `@`
    fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Relative link target, percent-encoded
    fn href(&self) -> String {
        let encoded = path::percent_encode_segment(&self.name);
        if self.is_dir {
            encoded + "/"
        } else {
            encoded
        }
    }
}

/// Serve a listing of `dir`; `display_path` is the decoded request path
pub async fn serve_listing(
    ctx: &RequestContext<'_>,
    dir: &Path,
    display_path: &str,
) -> Response<ResponseBody> {
    match read_entries(dir).await {
        Ok(entries) => {
            http::build_html_response(render_listing(display_path, &entries), ctx.is_head)
        }
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_404_response("No permission to list directory", ctx.is_head)
        }
    }
}

/// Read the entries of `dir`, sorted case-insensitively by name
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let file_type = entry.file_type().await?;
        let is_symlink = file_type.is_symlink();
        // Symlinks report the type of their target
        let is_dir = if is_symlink {
            fs::metadata(entry.path())
                .await
                .is_ok_and(|meta| meta.is_dir())
        } else {
            file_type.is_dir()
        };

        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|entry| entry.name.to_lowercase());
    Ok(entries)
}

/// Render the listing page
pub fn render_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", path::html_escape(display_path));
    let mut html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );

    for entry in entries {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            path::html_escape(&entry.href()),
            path::html_escape(&entry.display_name()),
        );
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}
