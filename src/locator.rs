//! Snippet-based page location.
//!
//! Page hints stored with retrieved passages are often wrong. Given a document
//! that can hand out per-page text, the locator finds the page containing a
//! short snippet by normalized token containment, and reports
//! [`LocateOutcome::NoConfidentMatch`] when no page clears the threshold so the
//! caller keeps the hinted page.

use crate::error::{LocateError, PageTextError};
use crate::models::{LocateOutcome, PageScore};

use std::future::Future;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::{debug, warn};

#[cfg(test)]
#[path = "locator_test.rs"]
mod locator_test;

/// Only the leading tokens of a snippet are searched for.
pub const MAX_TOKENS: usize = 12;

/// Snippet tokens a page must contain to count as a match. Guards against
/// one-word coincidences in long documents.
pub const REQUIRED_TOKENS: usize = 4;

// ============================================================================
// Document Capability
// ============================================================================

/// A loaded document that can report its length and extract page text.
///
/// `extract_text` may be slow and is awaited once per scanned page, in order.
pub trait PageTextProvider {
    fn page_count(&self) -> u32;

    /// Text of a 1-based page.
    fn extract_text(&self, page: u32) -> impl Future<Output = Result<String, PageTextError>> + Send;
}

// ============================================================================
// Normalization
// ============================================================================

/// Replace everything outside `[A-Za-z0-9\s]` with a space, collapse whitespace
/// runs, trim, lowercase.
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Leading search tokens of a snippet: at most [`MAX_TOKENS`], repeats kept.
/// A repeated word counts once per occurrence, both toward the threshold and
/// toward a page's score.
pub fn snippet_tokens(snippet: &str) -> Vec<String> {
    normalize(snippet)
        .split(' ')
        .filter(|t| !t.is_empty())
        .take(MAX_TOKENS)
        .map(str::to_string)
        .collect()
}

/// Number of `tokens` occurring as substrings of already-normalized page text.
fn count_matches(tokens: &[String], normalized_page: &str) -> usize {
    tokens
        .iter()
        .filter(|t| normalized_page.contains(t.as_str()))
        .count()
}

/// Preferred page first (when in range), then every other page ascending.
fn scan_order(page_count: u32, preferred: Option<u32>) -> Vec<u32> {
    let preferred = preferred.filter(|p| (1..=page_count).contains(p));
    preferred
        .into_iter()
        .chain((1..=page_count).filter(|&p| Some(p) != preferred))
        .collect()
}

// ============================================================================
// Locating
// ============================================================================

/// Find the page of `document` that best matches `snippet`.
///
/// Returns [`LocateOutcome::Page`] when the best page contains at least
/// `min(4, tokens)` of the snippet's leading tokens; ties go to the page scored first,
/// so the preferred page wins ties. Unreadable pages score 0. Fails only on a
/// preferred page of 0.
pub async fn locate<P: PageTextProvider>(
    document: &P,
    snippet: &str,
    preferred_page: Option<u32>,
) -> Result<LocateOutcome, LocateError> {
    Ok(locate_while(document, snippet, preferred_page, || true)
        .await?
        .unwrap_or(LocateOutcome::NoConfidentMatch))
}

/// Like [`locate`], but checks `live` before each page and returns `Ok(None)`
/// as soon as it reports false.
async fn locate_while<P, F>(
    document: &P,
    snippet: &str,
    preferred_page: Option<u32>,
    live: F,
) -> Result<Option<LocateOutcome>, LocateError>
where
    P: PageTextProvider,
    F: Fn() -> bool,
{
    if preferred_page == Some(0) {
        return Err(LocateError::InvalidPreferredPage(0));
    }

    let tokens = snippet_tokens(snippet);
    if tokens.is_empty() {
        return Ok(Some(LocateOutcome::NoConfidentMatch));
    }
    let required = REQUIRED_TOKENS.min(tokens.len());

    let page_count = document.page_count();
    let mut best: Option<PageScore> = None;

    for page in scan_order(page_count, preferred_page) {
        if !live() {
            debug!(page, "locate abandoned");
            return Ok(None);
        }

        let matched = match document.extract_text(page).await {
            Ok(text) => count_matches(&tokens, &normalize(&text)),
            Err(e) => {
                warn!(page, error = %e, "page text unavailable, scoring as 0");
                0
            }
        };

        if best.map_or(true, |b| matched > b.matched_token_count) {
            best = Some(PageScore {
                page_index: page,
                matched_token_count: matched,
            });
        }
    }

    let outcome = match best {
        Some(score) if score.matched_token_count >= required => {
            LocateOutcome::Page(score.page_index)
        }
        _ => LocateOutcome::NoConfidentMatch,
    };
    debug!(
        page_count,
        tokens = tokens.len(),
        required,
        best = ?best,
        outcome = ?outcome,
        "located snippet"
    );
    Ok(Some(outcome))
}

// ============================================================================
// Preview Session (caller-owned view state)
// ============================================================================

/// Handle captured when a relocation starts; stale once the view moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Page state of one open preview.
///
/// Each [`relocate`](PreviewSession::relocate) call takes a ticket; starting
/// another relocation or calling [`invalidate`](PreviewSession::invalidate)
/// makes earlier tickets stale, and a stale scan stops early and never moves
/// the displayed page.
#[derive(Debug)]
pub struct PreviewSession {
    current_page: AtomicU32,
    generation: AtomicU64,
}

impl PreviewSession {
    pub fn new(initial_page: u32) -> Self {
        Self {
            current_page: AtomicU32::new(initial_page.max(1)),
            generation: AtomicU64::new(0),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page.load(Ordering::SeqCst)
    }

    /// Start a new relocation, making every earlier ticket stale.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Tear down: whatever is in flight must not apply its result.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_live(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Apply a located page if `ticket` is still live. Returns whether it was applied.
    pub fn commit(&self, ticket: Ticket, outcome: LocateOutcome) -> bool {
        if !self.is_live(ticket) {
            return false;
        }
        if let LocateOutcome::Page(page) = outcome {
            self.current_page.store(page, Ordering::SeqCst);
        }
        true
    }

    /// Locate `snippet` starting from the currently shown page and move there on
    /// a confident match. Returns `Ok(None)` if the session was invalidated
    /// before the scan finished; the displayed page is then left alone.
    pub async fn relocate<P: PageTextProvider>(
        &self,
        document: &P,
        snippet: &str,
    ) -> Result<Option<LocateOutcome>, LocateError> {
        let ticket = self.begin();
        let preferred = Some(self.current_page());

        let outcome = locate_while(document, snippet, preferred, || self.is_live(ticket)).await?;
        match outcome {
            Some(outcome) if self.commit(ticket, outcome) => Ok(Some(outcome)),
            _ => Ok(None),
        }
    }
}
