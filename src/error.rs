//! Error types for citation links, page text extraction, and snippet location.

use thiserror::Error;

/// Page numbers are 1-based; a caller passing page 0 is a bug, not bad data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocateError {
    #[error("preferred page must be positive, got {0}")]
    InvalidPreferredPage(u32),
}

/// Failure to pull text out of one page. The locator scores such pages as 0.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageTextError {
    #[error("page {page} is out of range (document has {count} pages)")]
    OutOfRange { page: u32, count: u32 },
    #[error("page {page} is unreadable: {reason}")]
    Unreadable { page: u32, reason: String },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinkDecodeError {
    #[error("link has no material_id")]
    MissingMaterialId,
    #[error("invalid link URL: {0}")]
    InvalidUrl(String),
}

/// Problems opening a material's PDF on the server side.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("invalid material id: {0}")]
    InvalidId(String),
    #[error("material not found: {0}")]
    NotFound(String),
    #[error("cannot read PDF: {0}")]
    Io(#[from] std::io::Error),
    #[error("text extraction failed: {0}")]
    Extraction(String),
    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
