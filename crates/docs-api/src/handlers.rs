//! # Request Handlers
//!
//! Axum request handlers for the preview API.
//! Each view is one mounted page; block operations act on a single view.

use crate::state::{AppState, MountedView};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use docs_core::{
    BlockSnapshot, CopyStatus, DiagramPanel, DocPage, ViewSnapshot, WidgetError,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Select variant request
#[derive(Debug, Deserialize)]
pub struct SelectVariantRequest {
    /// Variant key to activate
    pub variant: String,
}

/// Select variant response
#[derive(Debug, Serialize)]
pub struct SelectVariantResponse {
    /// False when the key was not part of the block (selection unchanged)
    pub accepted: bool,
    pub block: BlockSnapshot,
}

/// Copy response
#[derive(Debug, Serialize)]
pub struct CopyResponse {
    pub block_id: String,
    pub copy_status: CopyStatus,
    /// How long the status stays before reverting to idle
    pub reverts_in_ms: u64,
}

/// Render diagram request
#[derive(Debug, Deserialize)]
pub struct RenderDiagramRequest {
    pub definition: String,
}

/// Mounted view response
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub view_id: Uuid,
    pub mounted_at: String,
    #[serde(flatten)]
    pub snapshot: ViewSnapshot,
}

impl ViewResponse {
    fn new(view_id: Uuid, mounted: &MountedView) -> Self {
        Self {
            view_id,
            mounted_at: mounted.mounted_at.to_rfc3339(),
            snapshot: mounted.view.snapshot(),
        }
    }
}

/// Page summary for listings
#[derive(Debug, Serialize)]
pub struct PageSummary {
    pub id: String,
    pub title: String,
    pub blocks: usize,
    pub diagrams: usize,
}

impl From<&DocPage> for PageSummary {
    fn from(page: &DocPage) -> Self {
        Self {
            id: page.id.clone(),
            title: page.title.clone(),
            blocks: page.blocks.len(),
            diagrams: page.diagrams.len(),
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn widget_error_to_response(err: WidgetError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn parse_view_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Invalid view id: {}", raw), 400).with_details(e.to_string())),
        )
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "gateway-docs",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List all pages
pub async fn list_pages(State(state): State<AppState>) -> impl IntoResponse {
    let pages: Vec<PageSummary> = state.catalog.pages.iter().map(PageSummary::from).collect();
    Json(serde_json::json!({
        "count": pages.len(),
        "pages": pages,
    }))
}

/// Get a single page's content
pub async fn get_page(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .catalog
        .require(&page_id)
        .map_err(widget_error_to_response)?;

    Ok(Json(page.clone()))
}

/// Mount a view of a page
#[instrument(skip(state))]
pub async fn mount_view(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> Result<(StatusCode, Json<ViewResponse>), ApiError> {
    let (view_id, mounted) = state
        .mount_view(&page_id)
        .map_err(widget_error_to_response)?;

    info!("Mounted view {} of page {}", view_id, page_id);

    Ok((StatusCode::CREATED, Json(ViewResponse::new(view_id, &mounted))))
}

/// Get a view snapshot
pub async fn get_view(
    State(state): State<AppState>,
    Path(view_id): Path<String>,
) -> Result<Json<ViewResponse>, ApiError> {
    let view_id = parse_view_id(&view_id)?;
    let mounted = state.views.get(&view_id).map_err(widget_error_to_response)?;

    Ok(Json(ViewResponse::new(view_id, &mounted)))
}

/// Unmount a view
#[instrument(skip(state))]
pub async fn unmount_view(
    State(state): State<AppState>,
    Path(view_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let view_id = parse_view_id(&view_id)?;
    let mounted = state
        .views
        .remove(&view_id)
        .map_err(widget_error_to_response)?;

    // Cancels pending timers now if no request still holds the view
    if let Ok(view) = std::sync::Arc::try_unwrap(mounted.view) {
        view.unmount();
    }

    info!("Unmounted view {}", view_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Switch a block's variant
#[instrument(skip(state, request), fields(variant = %request.variant))]
pub async fn select_variant(
    State(state): State<AppState>,
    Path((view_id, block_id)): Path<(String, String)>,
    Json(request): Json<SelectVariantRequest>,
) -> Result<Json<SelectVariantResponse>, ApiError> {
    let view_id = parse_view_id(&view_id)?;
    let mounted = state.views.get(&view_id).map_err(widget_error_to_response)?;

    let accepted = mounted
        .view
        .select_variant(&block_id, &request.variant)
        .map_err(widget_error_to_response)?;

    if !accepted {
        warn!(
            "Variant {} is not offered by block {}",
            request.variant, block_id
        );
    }

    let block = mounted
        .view
        .block_snapshot(&block_id)
        .map_err(widget_error_to_response)?;

    Ok(Json(SelectVariantResponse { accepted, block }))
}

/// Copy a block's active variant to the clipboard
#[instrument(skip(state))]
pub async fn copy_block(
    State(state): State<AppState>,
    Path((view_id, block_id)): Path<(String, String)>,
) -> Result<Json<CopyResponse>, ApiError> {
    let view_id = parse_view_id(&view_id)?;
    let mounted = state.views.get(&view_id).map_err(widget_error_to_response)?;

    let copy_status = mounted.view.copy(&block_id).await.map_err(|e| {
        error!("Copy failed for {}/{}: {}", view_id, block_id, e);
        widget_error_to_response(e)
    })?;

    Ok(Json(CopyResponse {
        block_id,
        copy_status,
        reverts_in_ms: mounted.view.feedback_window().as_millis() as u64,
    }))
}

/// Render a diagram definition, falling back to its source on failure
#[instrument(skip(state, request), fields(len = request.definition.len()))]
pub async fn render_diagram(
    State(state): State<AppState>,
    Json(request): Json<RenderDiagramRequest>,
) -> Json<DiagramPanel> {
    let panel = docs_core::render_diagram(request.definition, state.renderer.as_ref()).await;
    Json(panel)
}
