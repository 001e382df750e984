//! HTML for a resolved answer and its numbered sources list.

use super::components::html_escape;
use crate::links::build_link;
use crate::models::{CitationLink, RenderedSegment, SourceRecord};

// ============================================================================
// Answer Body
// ============================================================================

/// One `<p>` per answer line. Blank lines become spacer paragraphs, resolved
/// citations become preview links, and unresolved ones stay literal text.
pub fn render_answer(segments: &[RenderedSegment]) -> String {
    let mut html = String::from(r#"<div class="answer-content">"#);
    let mut line = String::new();

    for segment in segments {
        match segment {
            RenderedSegment::Text { content } => line.push_str(&html_escape(content)),
            RenderedSegment::LiteralCitation { raw } => line.push_str(&html_escape(raw)),
            RenderedSegment::Citation { links, .. } => line.push_str(&render_citation(links)),
            RenderedSegment::BlankLine => html.push_str(r#"<p class="blank"></p>"#),
            RenderedSegment::Newline => flush_line(&mut html, &mut line),
        }
    }
    flush_line(&mut html, &mut line);

    html.push_str("</div>");
    html
}

fn flush_line(html: &mut String, line: &mut String) {
    if !line.is_empty() {
        html.push_str("<p>");
        html.push_str(line);
        html.push_str("</p>");
        line.clear();
    }
}

/// `[Source 1, Source 3]` with each resolvable entry linked independently.
fn render_citation(links: &[CitationLink]) -> String {
    let entries: Vec<String> = links
        .iter()
        .map(|link| match &link.url {
            Some(url) => format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer" title="{}">{}</a>"#,
                html_escape(url),
                html_escape(link.material_title.as_deref().unwrap_or("Click to preview source")),
                html_escape(&link.label)
            ),
            None => format!(r#"<span class="unlinked">{}</span>"#, html_escape(&link.label)),
        })
        .collect();

    format!(r#"<span class="citation">[{}]</span>"#, entries.join(", "))
}

// ============================================================================
// Sources List
// ============================================================================

pub fn render_sources_list(sources: &[SourceRecord]) -> String {
    if sources.is_empty() {
        return String::new();
    }

    let mut cards = String::new();
    for (i, source) in sources.iter().enumerate() {
        let mut location = String::new();
        if let Some(page) = source.page.filter(|&p| p > 0) {
            location.push_str(&format!("<span>Page {}</span>", page));
        }
        if let Some(ref section) = source.section {
            location.push_str(&format!("<span>{}</span>", html_escape(section)));
        }

        let body = format!(
            r#"<div class="source-header">
                <span class="source-number">#{}</span>
                <span class="source-type">{}</span>
                <span class="source-score">{:.0}%</span>
            </div>
            <div class="source-title">{}</div>
            <div class="source-location">{}</div>"#,
            i + 1,
            html_escape(&source.material_type),
            source.similarity_score * 100.0,
            html_escape(source.material_title.as_deref().unwrap_or("Untitled")),
            location
        );

        match build_link(source) {
            Some(link) => cards.push_str(&format!(
                r#"<a class="source-card" href="{}" target="_blank" rel="noopener noreferrer" title="Click to preview source">{}</a>"#,
                html_escape(&link.preview_path()),
                body
            )),
            None => cards.push_str(&format!(r#"<div class="source-card static">{}</div>"#, body)),
        }
    }

    format!(
        r#"<div class="sources-list"><h3>Sources ({})</h3><div class="sources-grid">{}</div></div>"#,
        sources.len(),
        cards
    )
}
