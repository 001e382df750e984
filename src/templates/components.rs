//! Shared HTML helpers: escaping and the base page template.

use super::styles::STYLE;

// ============================================================================
// Text Escaping
// ============================================================================

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ============================================================================
// Base Template
// ============================================================================

pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    {content}
</body>
</html>"#,
        title = html_escape(title),
        content = content,
    )
}
