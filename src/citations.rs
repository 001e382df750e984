//! Citation parsing: split generated answers into prose and `[Source N]` markers,
//! resolve marker indices against the retrieved source list, and assemble the
//! render-ready segment list consumed by the templates and the JSON API.

use crate::links::build_link;
use crate::models::{
    CitationLink, CitationRef, RenderedSegment, ResolvedCitation, Segment, SourceRecord,
};

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

#[cfg(test)]
#[path = "citations_test.rs"]
mod citations_test;

/// `[Source 2]` or `[Source 1, Source 3, ...]`. Nothing else is a citation.
static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[Source [0-9]+(?:, Source [0-9]+)*\]").expect("citation pattern is valid")
});

static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"));

// ============================================================================
// Parsing
// ============================================================================

/// Split answer text into text, citation, and line-break segments.
///
/// Parsing is total: concatenating [`Segment::source_text`] over the result
/// reproduces `answer` exactly. It never fails; bracketed text that does not
/// follow the citation grammar stays in a text segment.
pub fn parse(answer: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    if answer.is_empty() {
        return segments;
    }

    for (i, line) in answer.split('\n').enumerate() {
        if i > 0 {
            segments.push(Segment::Newline);
        }
        if line.trim().is_empty() {
            segments.push(Segment::BlankLine {
                raw: line.to_string(),
            });
            continue;
        }
        parse_line(line, &mut segments);
    }

    segments
}

fn parse_line(line: &str, segments: &mut Vec<Segment>) {
    let mut last = 0;
    for m in CITATION_RE.find_iter(line) {
        if m.start() > last {
            segments.push(Segment::Text {
                content: line[last..m.start()].to_string(),
            });
        }
        segments.push(Segment::Citation {
            raw: m.as_str().to_string(),
            referenced_indices: parse_indices(m.as_str()),
        });
        last = m.end();
    }
    if last < line.len() {
        segments.push(Segment::Text {
            content: line[last..].to_string(),
        });
    }
}

/// Digit groups in order, duplicates kept. Groups too large to represent map to
/// `usize::MAX`, which no source list can reach.
fn parse_indices(marker: &str) -> Vec<usize> {
    DIGITS_RE
        .find_iter(marker)
        .map(|d| d.as_str().parse().unwrap_or(usize::MAX))
        .collect()
}

// ============================================================================
// Resolution
// ============================================================================

/// Look up one 1-based index. Out-of-range indices are unresolved, never an error.
pub fn resolve_index(index: usize, sources: &[SourceRecord]) -> CitationRef<'_> {
    match index.checked_sub(1).and_then(|i| sources.get(i)) {
        Some(source) => CitationRef::Resolved { index, source },
        None => CitationRef::Unresolved { index },
    }
}

/// Resolve every index of a citation independently; partial resolution is allowed.
pub fn resolve<'a>(
    raw: &str,
    referenced_indices: &[usize],
    sources: &'a [SourceRecord],
) -> ResolvedCitation<'a> {
    ResolvedCitation {
        raw: raw.to_string(),
        refs: referenced_indices
            .iter()
            .map(|&index| resolve_index(index, sources))
            .collect(),
    }
}

// ============================================================================
// Render-Ready Assembly
// ============================================================================

/// Parse `answer`, resolve its citations against `sources`, and attach a deep
/// link to every resolved reference that has a material id.
pub fn resolve_answer(answer: &str, sources: &[SourceRecord]) -> Vec<RenderedSegment> {
    let segments = parse(answer);
    let mut unresolved = 0usize;

    let rendered: Vec<RenderedSegment> = segments
        .into_iter()
        .map(|segment| match segment {
            Segment::Text { content } => RenderedSegment::Text { content },
            Segment::Newline => RenderedSegment::Newline,
            Segment::BlankLine { .. } => RenderedSegment::BlankLine,
            Segment::Citation {
                raw,
                referenced_indices,
            } => {
                let citation = resolve(&raw, &referenced_indices, sources);
                if citation.is_unresolved() {
                    unresolved += 1;
                    return RenderedSegment::LiteralCitation { raw };
                }
                RenderedSegment::Citation {
                    links: citation.refs.iter().map(citation_link).collect(),
                    raw,
                }
            }
        })
        .collect();

    debug!(
        segments = rendered.len(),
        sources = sources.len(),
        unresolved,
        "resolved answer citations"
    );
    rendered
}

fn citation_link(reference: &CitationRef<'_>) -> CitationLink {
    let index = reference.index();
    let label = format!("Source {}", index);
    match reference {
        CitationRef::Resolved { source, .. } => {
            let link = build_link(source);
            CitationLink {
                index,
                label,
                resolved: true,
                material_title: source.material_title.clone(),
                url: link.as_ref().map(|l| l.preview_path()),
                link,
            }
        }
        CitationRef::Unresolved { .. } => CitationLink {
            index,
            label,
            resolved: false,
            material_title: None,
            link: None,
            url: None,
        },
    }
}
