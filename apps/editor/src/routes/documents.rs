use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::editor::render::render;
use crate::editor::session::EditMode;
use crate::errors::AppError;
use crate::export::adapter::{export_filename, ExportFormat};
use crate::export::lines::{flatten, to_markdown, ExportLine};
use crate::models::document::Document;
use crate::models::intake::parse_document;
use crate::surface::html::to_html;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    pub resume_json: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub resume_json: Value,
    #[serde(default)]
    pub editing: bool,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub html: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub resume_json: Value,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub format: ExportFormat,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub lines: Vec<ExportLine>,
    pub markdown: String,
    pub filename: String,
}

/// POST /api/v1/documents/validate
pub async fn handle_validate(
    Json(req): Json<DocumentRequest>,
) -> Result<Json<Document>, AppError> {
    let document = parse_document(&req.resume_json)?;
    Ok(Json(document))
}

/// POST /api/v1/documents/render
pub async fn handle_render(Json(req): Json<RenderRequest>) -> Result<Json<RenderResponse>, AppError> {
    let document = parse_document(&req.resume_json)?;
    let mode = if req.editing {
        EditMode::Editing
    } else {
        EditMode::Viewing
    };
    let surface = render(&document, mode);
    Ok(Json(RenderResponse {
        html: to_html(&surface),
    }))
}

/// POST /api/v1/documents/export
pub async fn handle_export(Json(req): Json<ExportRequest>) -> Result<Json<ExportResponse>, AppError> {
    let document = parse_document(&req.resume_json)?;
    let markdown = to_markdown(&document);
    let filename = export_filename(&markdown, req.company_name.as_deref(), req.format);
    info!(%filename, sections = document.sections.len(), "Prepared export");

    Ok(Json(ExportResponse {
        lines: flatten(&document),
        markdown,
        filename,
    }))
}
