//! Deep links from a cited source to the page it came from.
//!
//! A [`LinkDescriptor`] is a flat set of four string fields so it can travel in
//! a URL query string (`material_id`, `page`, `title`, `snippet`) and be decoded
//! on the viewer side without loss.

use crate::error::LinkDecodeError;
use crate::models::{LinkDescriptor, SourceRecord};

use url::Url;

/// Maximum snippet length, in characters. The locator tolerates the cut landing mid-word.
pub const SNIPPET_CHARS: usize = 160;

/// Title shown when the source carries none.
pub const DEFAULT_TITLE: &str = "PDF Preview";

// ============================================================================
// Building
// ============================================================================

/// Build the deep link for a source, or `None` when it has no material to open.
pub fn build_link(source: &SourceRecord) -> Option<LinkDescriptor> {
    let material_id = source.material_id.as_deref().filter(|id| !id.is_empty())?;

    Some(LinkDescriptor {
        material_id: material_id.to_string(),
        page_hint: page_hint(source.page),
        title: source
            .material_title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        snippet: truncate_snippet(&source.text),
    })
}

/// Hard cut to the first [`SNIPPET_CHARS`] characters. No word-boundary trimming.
pub fn truncate_snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}

fn page_hint(page: Option<i64>) -> u32 {
    page.filter(|&p| p > 0)
        .and_then(|p| u32::try_from(p).ok())
        .unwrap_or(1)
}

// ============================================================================
// Encoding
// ============================================================================

impl LinkDescriptor {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("material_id", self.material_id.clone()),
            ("page", self.page_hint.to_string()),
            ("title", self.title.clone()),
            ("snippet", self.snippet.clone()),
        ]
    }

    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Server-side preview route for this link.
    pub fn preview_path(&self) -> String {
        format!("/preview?{}", self.to_query_string())
    }

    /// Client-side hash route, e.g. `https://host/app#/preview?material_id=...`.
    pub fn preview_url(&self, base: &str) -> String {
        format!("{}#/preview?{}", base, self.to_query_string())
    }

    // ========================================================================
    // Decoding
    // ========================================================================

    /// Decode a query string (with or without a leading `?`).
    ///
    /// Mirrors the viewer's defaults: a missing, unparsable, or non-positive
    /// page becomes 1, a missing title becomes [`DEFAULT_TITLE`], a missing
    /// snippet becomes empty. A missing material id is an error.
    pub fn from_query(query: &str) -> Result<Self, LinkDecodeError> {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut material_id = None;
        let mut page = None;
        let mut title = None;
        let mut snippet = None;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "material_id" => material_id = Some(value.into_owned()),
                "page" => page = Some(value.into_owned()),
                "title" => title = Some(value.into_owned()),
                "snippet" => snippet = Some(value.into_owned()),
                _ => {}
            }
        }

        let material_id = material_id
            .filter(|id| !id.is_empty())
            .ok_or(LinkDecodeError::MissingMaterialId)?;

        Ok(LinkDescriptor {
            material_id,
            page_hint: page
                .and_then(|p| p.trim().parse::<i64>().ok())
                .map(|p| page_hint(Some(p)))
                .unwrap_or(1),
            title: title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            snippet: snippet.unwrap_or_default(),
        })
    }

    /// Decode a full link. The query may live in the URL itself or, for hash
    /// routes, after the `?` inside the fragment.
    pub fn from_url(link: &str) -> Result<Self, LinkDecodeError> {
        let url = Url::parse(link).map_err(|e| LinkDecodeError::InvalidUrl(e.to_string()))?;

        if let Some(query) = url.fragment().and_then(|f| f.split_once('?')).map(|(_, q)| q) {
            return Self::from_query(query);
        }
        Self::from_query(url.query().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &str) -> SourceRecord {
        SourceRecord {
            index: 1,
            material_id: Some("42".to_string()),
            material_title: Some("Operating Systems, Lecture 3".to_string()),
            material_type: "pdf".to_string(),
            page: Some(7),
            section: None,
            text: text.to_string(),
            similarity_score: 0.82,
        }
    }

    #[test]
    fn test_build_link_basic() {
        let link = build_link(&source("Paging divides memory into frames.")).unwrap();
        assert_eq!(link.material_id, "42");
        assert_eq!(link.page_hint, 7);
        assert_eq!(link.title, "Operating Systems, Lecture 3");
        assert_eq!(link.snippet, "Paging divides memory into frames.");
    }

    #[test]
    fn test_build_link_without_material_id() {
        let mut s = source("text");
        s.material_id = None;
        assert!(build_link(&s).is_none());

        s.material_id = Some(String::new());
        assert!(build_link(&s).is_none());
    }

    #[test]
    fn test_build_link_is_pure() {
        let s = source("Deadlock requires mutual exclusion, hold and wait, no preemption.");
        assert_eq!(build_link(&s), build_link(&s));
    }

    #[test]
    fn test_page_hint_defaults() {
        let mut s = source("text");
        s.page = None;
        assert_eq!(build_link(&s).unwrap().page_hint, 1);
        s.page = Some(0);
        assert_eq!(build_link(&s).unwrap().page_hint, 1);
        s.page = Some(-3);
        assert_eq!(build_link(&s).unwrap().page_hint, 1);
    }

    #[test]
    fn test_default_title() {
        let mut s = source("text");
        s.material_title = None;
        assert_eq!(build_link(&s).unwrap().title, DEFAULT_TITLE);
    }

    #[test]
    fn test_snippet_hard_cut_at_160() {
        let text: String = "abcdefghij".repeat(50);
        assert_eq!(text.chars().count(), 500);
        let link = build_link(&source(&text)).unwrap();
        assert_eq!(link.snippet.chars().count(), 160);
        assert!(text.starts_with(&link.snippet));
    }

    #[test]
    fn test_snippet_counts_characters_not_bytes() {
        let text: String = "é".repeat(200);
        let snippet = truncate_snippet(&text);
        assert_eq!(snippet.chars().count(), 160);
        assert_eq!(snippet.len(), 320);
    }

    #[test]
    fn test_query_string_round_trip_unicode() {
        let link = LinkDescriptor {
            material_id: "17".to_string(),
            page_hint: 12,
            title: "Café & Co. = 100% \"quoted\"".to_string(),
            snippet: "naïve Σ-algebra + 日本語 #frag ?q=1&x=2".to_string(),
        };
        let query = link.to_query_string();
        assert!(!query.contains(' '));
        assert_eq!(LinkDescriptor::from_query(&query).unwrap(), link);
    }

    #[test]
    fn test_json_round_trip() {
        let link = build_link(&source("Ünïcödé snippet — with dashes")).unwrap();
        let json = serde_json::to_string(&link).unwrap();
        let back: LinkDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, link);
    }

    #[test]
    fn test_preview_url_decodes_from_hash_route() {
        let link = build_link(&source("Round robin uses a time quantum.")).unwrap();
        let url = link.preview_url("https://example.edu/app/");
        assert!(url.starts_with("https://example.edu/app/#/preview?material_id=42"));
        assert_eq!(LinkDescriptor::from_url(&url).unwrap(), link);
    }

    #[test]
    fn test_from_url_plain_query() {
        let link = LinkDescriptor::from_url(
            "http://localhost:3000/preview?material_id=9&page=3&title=Notes&snippet=a%20b",
        )
        .unwrap();
        assert_eq!(link.material_id, "9");
        assert_eq!(link.page_hint, 3);
        assert_eq!(link.snippet, "a b");
    }

    #[test]
    fn test_from_query_defaults() {
        let link = LinkDescriptor::from_query("?material_id=5&page=abc").unwrap();
        assert_eq!(link.page_hint, 1);
        assert_eq!(link.title, DEFAULT_TITLE);
        assert_eq!(link.snippet, "");

        let link = LinkDescriptor::from_query("material_id=5&page=-2").unwrap();
        assert_eq!(link.page_hint, 1);
    }

    #[test]
    fn test_from_query_requires_material_id() {
        assert_eq!(
            LinkDescriptor::from_query("page=2&title=x"),
            Err(LinkDecodeError::MissingMaterialId)
        );
        assert!(matches!(
            LinkDescriptor::from_url("not a url"),
            Err(LinkDecodeError::InvalidUrl(_))
        ));
    }
}
