//! Citation resolution and snippet-based page location for a retrieval-augmented
//! chat client.
//!
//! Answers cite retrieved sources with `[Source N]` markers. This crate parses
//! those markers, resolves them against the source list, builds deep links that
//! reopen the cited material, and relocates the cited page inside a PDF by
//! matching the passage snippet against extracted page text.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub mod citations;
pub mod error;
pub mod evaluation;
pub mod handlers;
pub mod links;
pub mod locator;
pub mod models;
pub mod pdf;
pub mod templates;

// ============================================================================
// Configuration
// ============================================================================

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_MATERIALS_DIR: &str = "materials";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    /// Directory holding `{material_id}.pdf` files.
    pub materials_dir: PathBuf,
}

impl Config {
    /// Defaults overridden by `CITELINK_BIND` and `CITELINK_MATERIALS_DIR`.
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("CITELINK_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            materials_dir: env::var("CITELINK_MATERIALS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MATERIALS_DIR)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            materials_dir: PathBuf::from(DEFAULT_MATERIALS_DIR),
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Server state. Nothing about a resolution outlives its request; only
/// extracted page text is kept between requests.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub page_text: PageTextCache,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        if let Err(e) = fs::create_dir_all(&config.materials_dir) {
            warn!(
                dir = %config.materials_dir.display(),
                error = %e,
                "cannot create materials directory; previews will fall back to page hints"
            );
        }
        Self {
            config,
            page_text: PageTextCache::new(),
        }
    }
}

/// Validate that an existing path stays within the given base directory.
/// Returns the canonical path on success, or an error message on failure.
pub fn validate_path_within(base: &Path, target: &Path) -> Result<PathBuf, String> {
    let canonical_base =
        fs::canonicalize(base).map_err(|e| format!("Cannot resolve base directory: {}", e))?;
    let canonical =
        fs::canonicalize(target).map_err(|e| format!("Cannot resolve path: {}", e))?;

    if canonical.starts_with(&canonical_base) {
        Ok(canonical)
    } else {
        Err("Path escapes base directory".to_string())
    }
}

// Re-export commonly used types
pub use models::{
    CitationLink, CitationRef, CitationReport, LinkDescriptor, LocateOutcome, PageScore,
    RenderedSegment, ResolvedCitation, Segment, SourceRecord,
};

pub use citations::{parse, resolve, resolve_answer, resolve_index};

pub use links::{build_link, truncate_snippet, DEFAULT_TITLE, SNIPPET_CHARS};

pub use locator::{
    locate, normalize, snippet_tokens, PageTextProvider, PreviewSession, Ticket, MAX_TOKENS,
    REQUIRED_TOKENS,
};

pub use evaluation::citation_report;

pub use error::{LinkDecodeError, LocateError, MaterialError, PageTextError};

pub use pdf::{PageTextCache, PdfDocument};
