//! PDF page text for the snippet locator.
//!
//! Text is pulled out once when a material is opened, trying both the native
//! `pdf-extract` crate and poppler's `pdftotext`, and keeping whichever yields
//! more text. Extraction is CPU-bound, so it runs on the blocking pool, and its
//! result is cached per file until the file changes.

use crate::error::{MaterialError, PageTextError};
use crate::locator::PageTextProvider;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tracing::{debug, warn};

/// Material ids are used as file stems; anything else is rejected.
fn is_valid_material_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Resolve `{materials_dir}/{material_id}.pdf`, refusing ids that could escape the directory.
pub fn material_path(materials_dir: &Path, material_id: &str) -> Result<PathBuf, MaterialError> {
    if !is_valid_material_id(material_id) {
        return Err(MaterialError::InvalidId(material_id.to_string()));
    }
    let path = materials_dir.join(format!("{}.pdf", material_id));
    if !path.exists() {
        return Err(MaterialError::NotFound(material_id.to_string()));
    }
    crate::validate_path_within(materials_dir, &path)
        .map_err(|_| MaterialError::InvalidId(material_id.to_string()))
}

// ============================================================================
// Text Extraction
// ============================================================================

/// Per-page text via the `pdf-extract` crate.
fn run_pdf_extract(bytes: &[u8]) -> Result<Vec<String>, String> {
    pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| format!("pdf-extract failed: {}", e))
}

/// Per-page text via `pdftotext`, which separates pages with form feeds.
fn run_pdftotext(path: &Path) -> Result<Vec<String>, String> {
    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg(path.as_os_str())
        .arg("-")
        .output()
        .map_err(|e| format!("Failed to run pdftotext: {}. Is poppler installed?", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("pdftotext failed: {}", stderr));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    let mut pages: Vec<String> = text.split('\x0c').map(str::to_string).collect();
    // Output ends with a form feed after the last page.
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    Ok(pages)
}

fn text_volume(pages: &[String]) -> usize {
    pages
        .iter()
        .map(|p| p.chars().filter(|c| !c.is_whitespace()).count())
        .sum()
}

/// Try every extraction method and keep the one that recovered the most text.
fn extract_pages_best(path: &Path, bytes: &[u8]) -> Result<Vec<String>, MaterialError> {
    let mut candidates: Vec<Vec<String>> = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    for result in [run_pdf_extract(bytes), run_pdftotext(path)] {
        match result {
            Ok(pages) => candidates.push(pages),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "extraction method failed");
                errors.push(e);
            }
        }
    }

    candidates
        .into_iter()
        .max_by_key(|pages| text_volume(pages))
        .ok_or_else(|| MaterialError::Extraction(errors.join("; ")))
}

// ============================================================================
// Document
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct PdfDocument {
    pages: Vec<String>,
}

impl PdfDocument {
    /// Load a PDF and extract the text of every page.
    pub async fn open(path: &Path) -> Result<Self, MaterialError> {
        let bytes = tokio::fs::read(path).await?;
        let path_buf = path.to_path_buf();

        let pages =
            tokio::task::spawn_blocking(move || extract_pages_best(&path_buf, &bytes)).await??;

        if text_volume(&pages) == 0 {
            warn!(path = %path.display(), pages = pages.len(), "PDF has no extractable text");
        }
        debug!(path = %path.display(), pages = pages.len(), "opened PDF");
        Ok(Self { pages })
    }

    pub fn from_pages(pages: Vec<String>) -> Self {
        Self { pages }
    }
}

// ============================================================================
// Page Text Cache
// ============================================================================

/// File identity used to detect a replaced or edited PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    len: u64,
    modified: Option<SystemTime>,
}

impl FileStamp {
    async fn of(path: &Path) -> Result<Self, MaterialError> {
        let meta = tokio::fs::metadata(path).await?;
        Ok(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Extracted documents keyed by path, so repeated previews of one material
/// extract its text once.
#[derive(Debug, Clone, Default)]
pub struct PageTextCache {
    entries: Arc<Mutex<HashMap<PathBuf, (FileStamp, Arc<PdfDocument>)>>>,
}

impl PageTextCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached document for `path`, extracting it when absent or stale.
    pub async fn open(&self, path: &Path) -> Result<Arc<PdfDocument>, MaterialError> {
        let stamp = FileStamp::of(path).await?;

        if let Some(doc) = self.lookup(path, stamp) {
            debug!(path = %path.display(), "page text cache hit");
            return Ok(doc);
        }

        let doc = Arc::new(PdfDocument::open(path).await?);
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(path.to_path_buf(), (stamp, Arc::clone(&doc)));
        }
        Ok(doc)
    }

    fn lookup(&self, path: &Path, stamp: FileStamp) -> Option<Arc<PdfDocument>> {
        let entries = self.entries.lock().ok()?;
        entries
            .get(path)
            .filter(|(cached, _)| *cached == stamp)
            .map(|(_, doc)| Arc::clone(doc))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PageTextProvider for PdfDocument {
    fn page_count(&self) -> u32 {
        u32::try_from(self.pages.len()).unwrap_or(u32::MAX)
    }

    async fn extract_text(&self, page: u32) -> Result<String, PageTextError> {
        page.checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .cloned()
            .ok_or(PageTextError::OutOfRange {
                page,
                count: self.page_count(),
            })
    }
}
