use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::layout::validator::InvariantViolation;

/// Errors raised by the layout engine.
///
/// Every variant is fatal for the run that produced it. Configuration variants point at a
/// template authoring bug; `InvariantViolations` only appears when validation is enabled.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid page spec: {0}")]
    InvalidPageSpec(String),

    #[error(
        "Body region height must be positive: content height {content_height}pt, \
         header + title + footer = {fixed_total}pt"
    )]
    BodyHeightNotPositive {
        content_height: f64,
        fixed_total: f64,
    },

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error(
        "Content budget for {variant} declares total_height {declared}pt \
         but its footprint is {footprint}pt"
    )]
    ContentBudgetMismatch {
        variant: String,
        declared: f64,
        footprint: f64,
    },

    #[error("Template '{template_id}' has no {variant} tile variant")]
    MissingVariant {
        template_id: String,
        variant: String,
    },

    #[error("Invalid {variant} tile variant: {reason}")]
    InvalidVariant { variant: String, reason: String },

    #[error("Template id '{found}' does not match the requested id '{expected}'")]
    TemplateIdMismatch { expected: String, found: String },

    #[error("Invalid safe zone #{index}: {reason}")]
    InvalidSafeZone { index: usize, reason: String },

    #[error(
        "{what} needs {row_span} grid rows but an empty body only holds {rows_per_page}"
    )]
    FootprintNeverFits {
        what: String,
        row_span: u32,
        rows_per_page: u32,
    },

    #[error("Layout violated {} invariant(s)", .0.len())]
    InvariantViolations(Vec<InvariantViolation>),
}

impl LayoutError {
    /// True for template / page geometry problems (as opposed to engine bugs).
    pub fn is_configuration(&self) -> bool {
        !matches!(self, LayoutError::InvariantViolations(_))
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
            AppError::Layout(LayoutError::InvariantViolations(violations)) => {
                tracing::error!(count = violations.len(), "Layout invariant violations");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INVARIANT_VIOLATION",
                    self.to_string(),
                    serde_json::to_value(violations).ok(),
                )
            }
            AppError::Layout(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "TEMPLATE_CONFIGURATION_ERROR",
                e.to_string(),
                None,
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
