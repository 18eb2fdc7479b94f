//! HTML views.
//!
//! Pure functions from view data to markup. Every file name is escaped.

use std::fmt::Write;

use crate::datetime::format_listing_time;
use crate::file::StoredFile;

/// Data for the listing page.
#[derive(Debug)]
pub struct ListingView<'a> {
    /// Files found by the scan.
    pub files: &'a [StoredFile],
    /// Whether delete controls are shown.
    pub admin: bool,
    /// Active filter, echoed into the search box.
    pub filter: &'a str,
    /// Timezone for modification times.
    pub timezone: &'a str,
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"/css/style.css\">\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

/// Render the file listing.
pub fn render_listing(view: &ListingView<'_>) -> String {
    let mut body = String::new();

    body.push_str("<h1>Files</h1>\n");
    let _ = writeln!(
        body,
        "<form method=\"get\" action=\"/\"><input type=\"text\" name=\"f\" value=\"{}\">\
         <button type=\"submit\">Search</button></form>",
        escape_html(view.filter)
    );
    if view.admin {
        body.push_str("<p><a href=\"/addfile\">Upload a file</a></p>\n");
    }

    body.push_str("<table>\n<tr><th>#</th><th>Name</th><th>Size</th><th>Modified</th>");
    if view.admin {
        body.push_str("<th></th>");
    }
    body.push_str("</tr>\n");

    for file in view.files {
        let query = urlencoding::encode(&file.name);
        let name = escape_html(&file.name);
        let _ = write!(
            body,
            "<tr><td>{}</td><td><a href=\"/download?f={query}\">{name}</a></td><td>{}</td><td>{}</td>",
            file.id,
            file.size_bytes,
            format_listing_time(&file.modified_at, view.timezone),
        );
        if view.admin {
            let _ = write!(body, "<td><a href=\"/rmfile?f={query}\">delete</a></td>");
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</table>\n");

    if view.files.is_empty() {
        body.push_str("<p>No files.</p>\n");
    }

    page("Files", &body)
}

/// Render the upload form.
pub fn render_upload_form() -> String {
    let body = "<h1>Upload</h1>\n\
        <form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n\
        <input type=\"file\" name=\"file\">\n\
        <button type=\"submit\">Upload</button>\n\
        </form>\n\
        <form method=\"post\" action=\"/upload/f\" enctype=\"multipart/form-data\">\n\
        <input type=\"file\" name=\"file\">\n\
        <button type=\"submit\">Upload and overwrite</button>\n\
        </form>\n\
        <p><a href=\"/\">Back to files</a></p>\n";

    page("Upload", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_files() -> Vec<StoredFile> {
        vec![StoredFile {
            id: 1,
            name: "<script>&.txt".to_string(),
            size_bytes: 42,
            modified_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        }]
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">'&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain.txt"), "plain.txt");
    }

    #[test]
    fn test_render_listing_escapes_names() {
        let files = sample_files();
        let html = render_listing(&ListingView {
            files: &files,
            admin: false,
            filter: "",
            timezone: "UTC",
        });

        assert!(html.contains("&lt;script&gt;&amp;.txt"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("/download?f=%3Cscript%3E%26.txt"));
        assert!(html.contains("2024/01/15 10:30:00"));
        assert!(html.contains("<td>42</td>"));
    }

    #[test]
    fn test_render_listing_delete_links_for_admin_only() {
        let files = sample_files();
        let mut view = ListingView {
            files: &files,
            admin: false,
            filter: "",
            timezone: "UTC",
        };
        assert!(!render_listing(&view).contains("/rmfile"));

        view.admin = true;
        let html = render_listing(&view);
        assert!(html.contains("/rmfile?f=%3Cscript%3E%26.txt"));
        assert!(html.contains("/addfile"));
    }

    #[test]
    fn test_render_listing_echoes_filter() {
        let html = render_listing(&ListingView {
            files: &[],
            admin: false,
            filter: "\"foo",
            timezone: "UTC",
        });
        assert!(html.contains("value=\"&quot;foo\""));
        assert!(html.contains("No files."));
    }

    #[test]
    fn test_render_upload_form() {
        let html = render_upload_form();
        assert!(html.contains("action=\"/upload\""));
        assert!(html.contains("action=\"/upload/f\""));
        assert!(html.contains("name=\"file\""));
    }
}
