//! Tests for snippet normalization and page location.
//!
//! Documents are in-memory page lists so scoring order and extraction failures
//! can be controlled exactly.

use super::*;
use proptest::prelude::*;
use std::sync::Mutex;

// ============================================================================
// Helpers
// ============================================================================

/// In-memory document. `None` pages fail extraction. Records the order pages
/// were requested in.
struct MemoryDoc {
    pages: Vec<Option<String>>,
    requested: Mutex<Vec<u32>>,
}

impl MemoryDoc {
    fn new(pages: &[Option<&str>]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.map(str::to_string)).collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn from_text(pages: &[&str]) -> Self {
        Self::new(&pages.iter().map(|p| Some(*p)).collect::<Vec<_>>())
    }

    fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

impl PageTextProvider for MemoryDoc {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    async fn extract_text(&self, page: u32) -> Result<String, PageTextError> {
        self.requested.lock().unwrap().push(page);
        match self.pages.get(page as usize - 1) {
            Some(Some(text)) => Ok(text.clone()),
            Some(None) => Err(PageTextError::Unreadable {
                page,
                reason: "corrupt content stream".to_string(),
            }),
            None => Err(PageTextError::OutOfRange {
                page,
                count: self.page_count(),
            }),
        }
    }
}

/// Invalidates the given session when `trigger_page` is extracted.
struct TearDownDoc<'a> {
    inner: MemoryDoc,
    session: &'a PreviewSession,
    trigger_page: u32,
}

impl PageTextProvider for TearDownDoc<'_> {
    fn page_count(&self) -> u32 {
        self.inner.page_count()
    }

    async fn extract_text(&self, page: u32) -> Result<String, PageTextError> {
        if page == self.trigger_page {
            self.session.invalidate();
        }
        self.inner.extract_text(page).await
    }
}

const SNIPPET: &str = "The scheduler picks the process with the shortest remaining burst time, \
     preempting the running one whenever a shorter job arrives.";

// ============================================================================
// Normalization Tests
// ============================================================================

#[test]
fn test_normalize_basic() {
    assert_eq!(normalize("Hello, World!"), "hello world");
    assert_eq!(normalize("  Lots \t of\n\nspace  "), "lots of space");
    assert_eq!(normalize("k-CFA: (fast)"), "k cfa fast");
}

#[test]
fn test_normalize_non_ascii_becomes_space() {
    assert_eq!(normalize("naïve café"), "na ve caf");
    assert_eq!(normalize("日本語"), "");
}

#[test]
fn test_snippet_tokens_limit_keeps_repeats() {
    let tokens = snippet_tokens(SNIPPET);
    assert_eq!(tokens.len(), MAX_TOKENS);
    assert_eq!(tokens[0], "the");
    assert_eq!(tokens[1], "scheduler");
    assert_eq!(tokens.iter().filter(|t| *t == "the").count(), 3);
    assert_eq!(tokens[11], "preempting");

    assert_eq!(snippet_tokens("lock lock lock lock lock"), vec!["lock"; 5]);

    let many = (0..30).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
    assert_eq!(snippet_tokens(&many).len(), MAX_TOKENS);
    assert!(snippet_tokens("!!! ... ???").is_empty());
}

#[test]
fn test_scan_order() {
    assert_eq!(scan_order(4, Some(3)), vec![3, 1, 2, 4]);
    assert_eq!(scan_order(4, None), vec![1, 2, 3, 4]);
    assert_eq!(scan_order(4, Some(9)), vec![1, 2, 3, 4]);
    assert!(scan_order(0, Some(1)).is_empty());
}

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(s in "\\PC*") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once.clone());
    }
}

// ============================================================================
// Locate Tests
// ============================================================================

#[tokio::test]
async fn test_locate_finds_page_with_all_tokens() {
    let snippet = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";
    let doc = MemoryDoc::from_text(&[
        "Nothing relevant here at all.",
        "Lima kilo juliet india hotel golf foxtrot echo delta charlie bravo alpha.",
        "Also unrelated text.",
    ]);
    assert_eq!(
        locate(&doc, snippet, Some(1)).await,
        Ok(LocateOutcome::Page(2))
    );
}

#[tokio::test]
async fn test_locate_below_threshold_is_no_match() {
    let doc = MemoryDoc::from_text(&[
        "a scheduler is here",
        "process with something",
        "nothing",
    ]);
    // Best page holds 2 tokens, threshold is 4.
    for preferred in [None, Some(1), Some(2), Some(3)] {
        assert_eq!(
            locate(&doc, SNIPPET, preferred).await,
            Ok(LocateOutcome::NoConfidentMatch)
        );
    }
}

#[tokio::test]
async fn test_locate_short_snippet_threshold() {
    // Two tokens: both must appear.
    let doc = MemoryDoc::from_text(&["mutex only", "mutex and semaphore"]);
    assert_eq!(
        locate(&doc, "Mutex, semaphore.", None).await,
        Ok(LocateOutcome::Page(2))
    );
}

#[tokio::test]
async fn test_locate_repeated_tokens_count_each_occurrence() {
    // Five tokens, four required; "alpha" and "beta" each count twice.
    let doc = MemoryDoc::from_text(&["unrelated", "alpha beta here"]);
    assert_eq!(
        locate(&doc, "alpha beta alpha beta gamma", None).await,
        Ok(LocateOutcome::Page(2))
    );

    // A repeated word alone still needs four hits, which it gets wherever it appears.
    let doc = MemoryDoc::from_text(&["nothing", "a lock here"]);
    assert_eq!(
        locate(&doc, "lock lock lock lock lock", None).await,
        Ok(LocateOutcome::Page(2))
    );

    // Three occurrences of one word against four required.
    let doc = MemoryDoc::from_text(&["mutex here", "other"]);
    assert_eq!(
        locate(&doc, "mutex mutex mutex semaphore", None).await,
        Ok(LocateOutcome::NoConfidentMatch)
    );
}

#[tokio::test]
async fn test_locate_preferred_page_wins_ties() {
    let text = "the scheduler picks the process with the shortest remaining burst";
    let doc = MemoryDoc::from_text(&[text, "filler", text]);
    assert_eq!(
        locate(&doc, SNIPPET, Some(3)).await,
        Ok(LocateOutcome::Page(3))
    );
    // Without a preference the earliest page wins.
    assert_eq!(locate(&doc, SNIPPET, None).await, Ok(LocateOutcome::Page(1)));
}

#[tokio::test]
async fn test_locate_strictly_better_page_beats_preferred() {
    let doc = MemoryDoc::from_text(&[
        "the scheduler picks the process",
        "the scheduler picks the process with the shortest remaining burst time",
    ]);
    assert_eq!(
        locate(&doc, SNIPPET, Some(1)).await,
        Ok(LocateOutcome::Page(2))
    );
}

#[tokio::test]
async fn test_locate_scores_preferred_page_first() {
    let doc = MemoryDoc::from_text(&["a", "b", "c", "d"]);
    locate(&doc, SNIPPET, Some(3)).await.unwrap();
    assert_eq!(doc.requested(), vec![3, 1, 2, 4]);
}

#[tokio::test]
async fn test_locate_substring_containment() {
    // Tokens match inside longer words; the cut-off "preempt" still matches.
    let doc = MemoryDoc::from_text(&["", "Preemption of schedulers; processes; timeouts"]);
    assert_eq!(
        locate(&doc, "preempt scheduler process time", None).await,
        Ok(LocateOutcome::Page(2))
    );
}

#[tokio::test]
async fn test_locate_tolerates_extraction_failures() {
    let doc = MemoryDoc::new(&[
        None,
        Some("the scheduler picks the process with the shortest remaining burst time"),
        None,
    ]);
    assert_eq!(
        locate(&doc, SNIPPET, Some(1)).await,
        Ok(LocateOutcome::Page(2))
    );
    assert_eq!(doc.requested(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_locate_all_pages_fail() {
    let doc = MemoryDoc::new(&[None, None]);
    assert_eq!(
        locate(&doc, SNIPPET, Some(2)).await,
        Ok(LocateOutcome::NoConfidentMatch)
    );
}

#[tokio::test]
async fn test_locate_empty_document_and_snippet() {
    let empty = MemoryDoc::from_text(&[]);
    assert_eq!(
        locate(&empty, SNIPPET, Some(1)).await,
        Ok(LocateOutcome::NoConfidentMatch)
    );

    let doc = MemoryDoc::from_text(&["anything"]);
    assert_eq!(
        locate(&doc, "  --  ", None).await,
        Ok(LocateOutcome::NoConfidentMatch)
    );
    assert!(doc.requested().is_empty());
}

#[tokio::test]
async fn test_locate_rejects_page_zero() {
    let doc = MemoryDoc::from_text(&["x"]);
    assert_eq!(
        locate(&doc, SNIPPET, Some(0)).await,
        Err(LocateError::InvalidPreferredPage(0))
    );
}

// ============================================================================
// Preview Session Tests
// ============================================================================

#[tokio::test]
async fn test_session_relocate_moves_page() {
    let session = PreviewSession::new(1);
    let doc = MemoryDoc::from_text(&[
        "intro",
        "filler",
        "the scheduler picks the process with the shortest remaining burst time",
    ]);
    let outcome = session.relocate(&doc, SNIPPET).await.unwrap();
    assert_eq!(outcome, Some(LocateOutcome::Page(3)));
    assert_eq!(session.current_page(), 3);
    assert_eq!(doc.requested()[0], 1);
}

#[tokio::test]
async fn test_session_no_match_keeps_page() {
    let session = PreviewSession::new(2);
    let doc = MemoryDoc::from_text(&["a", "b", "c"]);
    let outcome = session.relocate(&doc, SNIPPET).await.unwrap();
    assert_eq!(outcome, Some(LocateOutcome::NoConfidentMatch));
    assert_eq!(session.current_page(), 2);
}

#[tokio::test]
async fn test_session_torn_down_mid_scan_does_not_commit() {
    let session = PreviewSession::new(1);
    let doc = TearDownDoc {
        inner: MemoryDoc::from_text(&[
            "intro",
            "the scheduler picks the process with the shortest remaining burst time",
            "tail",
        ]),
        session: &session,
        trigger_page: 2,
    };
    let outcome = session.relocate(&doc, SNIPPET).await.unwrap();
    assert_eq!(outcome, None);
    assert_eq!(session.current_page(), 1);
    // Scan stopped before page 3.
    assert_eq!(doc.inner.requested(), vec![1, 2]);
}

#[test]
fn test_session_stale_ticket() {
    let session = PreviewSession::new(1);
    let first = session.begin();
    let second = session.begin();
    assert!(!session.commit(first, LocateOutcome::Page(5)));
    assert_eq!(session.current_page(), 1);
    assert!(session.commit(second, LocateOutcome::Page(5)));
    assert_eq!(session.current_page(), 5);
}

#[test]
fn test_session_initial_page_is_positive() {
    assert_eq!(PreviewSession::new(0).current_page(), 1);
}
