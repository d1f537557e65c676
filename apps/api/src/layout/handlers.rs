//! Axum route handlers for the Layout API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::layout::cache::Published;
use crate::layout::document::LayoutDocument;
use crate::layout::engine::LayoutOptions;
use crate::layout::menu::NormalizedMenu;
use crate::layout::regions::PageSpec;
use crate::layout::template::Template;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    pub template_id: String,
    pub menu: NormalizedMenu,
    /// Overrides the template's default page geometry.
    #[serde(default)]
    pub page_spec: Option<PageSpec>,
    #[serde(default)]
    pub options: LayoutOptions,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/templates/:id
///
/// Validates and publishes a template. Published templates are immutable: a second PUT for
/// the same id is rejected with 409.
pub async fn handle_put_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(template): Json<Template>,
) -> Result<(StatusCode, Json<Template>), AppError> {
    if template.id != id {
        return Err(AppError::Validation(format!(
            "template id '{}' does not match path id '{id}'",
            template.id
        )));
    }

    match state.templates.publish(template)? {
        Published::Inserted(template) => Ok((StatusCode::CREATED, Json(Template::clone(&template)))),
        Published::AlreadyPresent(_) => Err(AppError::Conflict(format!(
            "template '{id}' is already published"
        ))),
    }
}

/// GET /api/v1/templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Template>, AppError> {
    let template = state
        .templates
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("template '{id}'")))?;
    Ok(Json(Template::clone(&template)))
}

/// POST /api/v1/layout
///
/// Lays out a normalized menu with a published template. The engine is CPU-bound and runs on
/// the blocking pool.
pub async fn handle_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<LayoutDocument>, AppError> {
    let template = state
        .templates
        .get(&request.template_id)
        .ok_or_else(|| AppError::NotFound(format!("template '{}'", request.template_id)))?;

    let engine = state.engine;
    let LayoutRequest {
        menu,
        page_spec,
        options,
        ..
    } = request;
    let page_spec = page_spec.unwrap_or(template.page);

    let document = tokio::task::spawn_blocking(move || {
        engine.run(&menu, &template, &page_spec, &options)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout: {e}")))??;

    info!(
        template_id = %document.template_id,
        pages = document.pages.len(),
        "Layout request served"
    );
    Ok(Json(document))
}
