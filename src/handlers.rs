//! HTTP route handlers.
//!
//! Answer resolution is pure and recomputed on every request. Preview and
//! locate requests open the material's PDF and relocate the cited page,
//! falling back to the link's page hint whenever that is not possible.

use crate::citations::resolve_answer;
use crate::evaluation::citation_report;
use crate::locator::{locate, PageTextProvider};
use crate::models::{LinkDescriptor, LocateOutcome, LocateResponse, ResolveRequest, ResolveResponse};
use crate::pdf::material_path;
use crate::templates::{render_answer, render_preview, render_sources_list, PageOrigin};
use crate::AppState;

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

// ============================================================================
// Answer Resolution
// ============================================================================

/// POST /api/answer/resolve: segments with per-source deep links, plus a coverage report.
pub async fn resolve_answer_api(Json(req): Json<ResolveRequest>) -> Json<ResolveResponse> {
    Json(ResolveResponse {
        segments: resolve_answer(&req.answer, &req.sources),
        report: citation_report(&req.answer, &req.sources),
    })
}

/// POST /api/answer/render: the answer body as HTML, followed by the sources list.
pub async fn render_answer_api(Json(req): Json<ResolveRequest>) -> Html<String> {
    let segments = resolve_answer(&req.answer, &req.sources);
    Html(format!(
        "{}{}",
        render_answer(&segments),
        render_sources_list(&req.sources)
    ))
}

// ============================================================================
// Preview and Locate
// ============================================================================

/// GET /preview?material_id=..&page=..&title=..&snippet=..
pub async fn preview(State(state): State<Arc<AppState>>, RawQuery(query): RawQuery) -> Response {
    let link = match LinkDescriptor::from_query(query.as_deref().unwrap_or("")) {
        Ok(link) => link,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let resolved = relocate_page(&state, &link).await;
    Html(render_preview(
        &link,
        resolved.page,
        resolved.origin,
        resolved.file_available,
    ))
    .into_response()
}

/// GET /api/locate?material_id=..&page=..&snippet=..
pub async fn locate_api(State(state): State<Arc<AppState>>, RawQuery(query): RawQuery) -> Response {
    let link = match LinkDescriptor::from_query(query.as_deref().unwrap_or("")) {
        Ok(link) => link,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let resolved = relocate_page(&state, &link).await;
    Json(LocateResponse {
        page: resolved.page,
        located: resolved.origin == PageOrigin::Located,
        hint: link.page_hint,
    })
    .into_response()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResolvedPage {
    page: u32,
    origin: PageOrigin,
    file_available: bool,
}

fn hinted(link: &LinkDescriptor, file_available: bool) -> ResolvedPage {
    ResolvedPage {
        page: link.page_hint,
        origin: PageOrigin::Hint,
        file_available,
    }
}

/// Open the material and look for the snippet, starting at the hinted page.
/// Every failure degrades to the hint.
async fn relocate_page(state: &AppState, link: &LinkDescriptor) -> ResolvedPage {
    let path = match material_path(&state.config.materials_dir, &link.material_id) {
        Ok(path) => path,
        Err(e) => {
            warn!(material_id = %link.material_id, error = %e, "material unavailable");
            return hinted(link, false);
        }
    };

    let doc = match state.page_text.open(&path).await {
        Ok(doc) => doc,
        Err(e) => {
            warn!(material_id = %link.material_id, error = %e, "cannot read material text");
            return hinted(link, true);
        }
    };

    relocate_in(doc.as_ref(), link).await
}

/// Locate within an opened document. A hint past the end of the document
/// shows the last page.
async fn relocate_in<P: PageTextProvider>(doc: &P, link: &LinkDescriptor) -> ResolvedPage {
    let page_count = doc.page_count();
    let hint = if page_count > 0 {
        link.page_hint.min(page_count)
    } else {
        link.page_hint
    };

    match locate(doc, &link.snippet, Some(hint)).await {
        Ok(LocateOutcome::Page(page)) => {
            info!(material_id = %link.material_id, hint, page, "relocated citation page");
            ResolvedPage {
                page,
                origin: PageOrigin::Located,
                file_available: true,
            }
        }
        Ok(LocateOutcome::NoConfidentMatch) => ResolvedPage {
            page: hint,
            origin: PageOrigin::Hint,
            file_available: true,
        },
        Err(e) => {
            warn!(material_id = %link.material_id, error = %e, "locate rejected page hint");
            hinted(link, true)
        }
    }
}
