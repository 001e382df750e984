//! Preview page opened from a citation deep link.
//!
//! Embeds the material's PDF at the resolved page. The page is either a
//! confident snippet match or, failing that, the link's page hint.

use super::components::{base_html, html_escape};
use crate::models::LinkDescriptor;

/// Where the page shown in the preview came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrigin {
    Located,
    Hint,
}

pub fn render_preview(
    link: &LinkDescriptor,
    page: u32,
    origin: PageOrigin,
    file_available: bool,
) -> String {
    let (status_class, status_text) = match origin {
        PageOrigin::Located => ("located", format!("Page {} (matched snippet)", page)),
        PageOrigin::Hint => ("hint", format!("Page {}", page)),
    };

    let body = if file_available {
        format!(
            r#"<iframe src="/files/{}.pdf#page={}" title="{}"></iframe>"#,
            urlencoding::encode(&link.material_id),
            page,
            html_escape(&link.title)
        )
    } else {
        r#"<div class="pdf-preview-empty">No file available for preview.</div>"#.to_string()
    };

    let snippet_html = if link.snippet.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div class="snippet">&ldquo;{}&rdquo;</div>"#,
            html_escape(&link.snippet)
        )
    };

    let content = format!(
        r#"<div class="pdf-viewer-page">
            <div class="pdf-viewer-toolbar">
                <span>{title}</span>
                <span class="page-status {status_class}">{status_text}</span>
                <span class="spacer"></span>
                <button onclick="window.close()">Close</button>
            </div>
            {snippet_html}
            <div class="pdf-viewer-body">{body}</div>
        </div>"#,
        title = html_escape(&link.title),
    );

    base_html(&link.title, &content)
}
