//! Data models for citation resolution.
//!
//! This module contains the core data structures shared by the parser, the link
//! builder, the snippet locator, and the HTTP layer: retrieved source records,
//! parsed answer segments, deep-link descriptors, and locator results.

use serde::{Deserialize, Serialize};

// ============================================================================
// Retrieved Sources
// ============================================================================

/// One entry of the numbered source list returned alongside an answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceRecord {
    /// 1-based position in the retrieved list.
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub material_id: Option<String>,
    #[serde(default)]
    pub material_title: Option<String>,
    #[serde(default)]
    pub material_type: String,
    /// Page hint from ingestion. Frequently wrong, sometimes absent or zero.
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub similarity_score: f64,
}

// ============================================================================
// Parsed Answer Segments
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Text {
        content: String,
    },
    Citation {
        raw: String,
        referenced_indices: Vec<usize>,
    },
    /// A `\n` in the answer text.
    Newline,
    /// A line holding nothing but whitespace (a paragraph gap).
    BlankLine {
        raw: String,
    },
}

impl Segment {
    /// The exact slice of answer text this segment was produced from.
    pub fn source_text(&self) -> &str {
        match self {
            Segment::Text { content } => content,
            Segment::Citation { raw, .. } => raw,
            Segment::Newline => "\n",
            Segment::BlankLine { raw } => raw,
        }
    }
}

/// One referenced index of a citation after checking it against the source list.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CitationRef<'a> {
    Resolved {
        index: usize,
        source: &'a SourceRecord,
    },
    Unresolved {
        index: usize,
    },
}

impl CitationRef<'_> {
    pub fn index(&self) -> usize {
        match self {
            CitationRef::Resolved { index, .. } | CitationRef::Unresolved { index } => *index,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, CitationRef::Resolved { .. })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResolvedCitation<'a> {
    pub raw: String,
    pub refs: Vec<CitationRef<'a>>,
}

impl ResolvedCitation<'_> {
    /// True when no referenced index could be resolved; the marker renders as literal text.
    pub fn is_unresolved(&self) -> bool {
        self.refs.iter().all(|r| !r.is_resolved())
    }
}

// ============================================================================
// Deep Links
// ============================================================================

/// Everything a separate viewer needs to reopen a source at the right spot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkDescriptor {
    pub material_id: String,
    pub page_hint: u32,
    pub title: String,
    pub snippet: String,
}

// ============================================================================
// Render-Ready Answer (JSON API)
// ============================================================================

/// A single `Source N` entry inside a rendered citation group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitationLink {
    pub index: usize,
    /// Display label, e.g. "Source 2".
    pub label: String,
    pub resolved: bool,
    pub material_title: Option<String>,
    pub link: Option<LinkDescriptor>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedSegment {
    Text { content: String },
    /// Every index unresolved: render `raw` verbatim.
    LiteralCitation { raw: String },
    Citation { raw: String, links: Vec<CitationLink> },
    Newline,
    BlankLine,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveRequest {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveResponse {
    pub segments: Vec<RenderedSegment>,
    pub report: CitationReport,
}

// ============================================================================
// Snippet Location
// ============================================================================

/// Score of one page during a single locate pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageScore {
    pub page_index: u32,
    pub matched_token_count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "result", content = "page", rename_all = "snake_case")]
pub enum LocateOutcome {
    Page(u32),
    /// Keep showing the hinted (or currently displayed) page.
    NoConfidentMatch,
}

impl LocateOutcome {
    pub fn page(self) -> Option<u32> {
        match self {
            LocateOutcome::Page(p) => Some(p),
            LocateOutcome::NoConfidentMatch => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LocateResponse {
    /// Page the viewer should show.
    pub page: u32,
    /// Whether `page` came from a confident snippet match rather than the hint.
    pub located: bool,
    pub hint: u32,
}

// ============================================================================
// Citation Coverage
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitationReport {
    pub citations_found: usize,
    pub sources_used: usize,
    pub cited_sources: Vec<usize>,
    pub uncited_sources: Vec<usize>,
    pub unresolved_indices: Vec<usize>,
    pub accuracy: f64,
}
