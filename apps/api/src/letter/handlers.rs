//! Axum route handlers for the Letters API.
//!
//! Every request carries the current text and flags; nothing is stored between
//! calls, so each handler runs one complete render cycle.

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::letter::cycle::{header_lines_for, RenderCycle};
use crate::letter::model::{HeaderSource, LayoutFlags, ParagraphBlock};
use crate::models::{Applicant, JobTarget};
use crate::render::filename::{attachment_name, content_disposition, default_export_name};
use crate::render::preview::render_preview_html;
use crate::render::{export_blocking, ExportFormat};
use crate::state::AppState;

/// Number of characters the export had to replace; `0` when the document is
/// faithful to the text.
pub const SUBSTITUTED_CHARACTERS_HEADER: &str = "x-substituted-characters";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CanonicalRequest {
    /// Template output, before any editing.
    pub raw_text: String,
    #[serde(default)]
    pub flags: LayoutFlags,
    pub header_lines: Option<Vec<String>>,
    pub applicant: Option<Applicant>,
}

#[derive(Debug, Serialize)]
pub struct CanonicalResponse {
    pub text: String,
    pub header_lines: Vec<String>,
    pub consumed_lines: usize,
    pub header_source: HeaderSource,
    pub blocks: Vec<ParagraphBlock>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    /// Current contents of the edit surface.
    pub text: String,
    #[serde(default)]
    pub flags: LayoutFlags,
    pub header_lines: Option<Vec<String>>,
    pub applicant: Option<Applicant>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub html: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub text: String,
    #[serde(default)]
    pub flags: LayoutFlags,
    pub header_lines: Option<Vec<String>>,
    pub applicant: Option<Applicant>,
    /// Download name without extension; derived from the job when absent.
    pub file_name: Option<String>,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/letters/canonical
///
/// First pass: turns template output into the canonical editable text.
pub async fn handle_canonical(
    State(state): State<AppState>,
    Json(request): Json<CanonicalRequest>,
) -> Result<Json<CanonicalResponse>, AppError> {
    ensure_within_limit(&request.raw_text, state.config.max_letter_bytes)?;

    let fallback = fallback_header(request.header_lines, request.applicant.as_ref(), &request.flags);
    let text = RenderCycle::from_template(&request.raw_text, request.flags.clone(), fallback.clone())
        .canonical_text();

    // Describe the text the editor will hold next, not the template output.
    let parsed = RenderCycle::new(text.clone(), request.flags, fallback).parse();

    Ok(Json(CanonicalResponse {
        text,
        header_lines: parsed.header.lines,
        consumed_lines: parsed.header.consumed,
        header_source: parsed.header.source,
        blocks: parsed.blocks,
    }))
}

/// POST /api/v1/letters/preview
///
/// Second pass over the edited text, rendered as HTML.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    ensure_within_limit(&request.text, state.config.max_letter_bytes)?;

    let fallback = fallback_header(request.header_lines, request.applicant.as_ref(), &request.flags);
    let plan = RenderCycle::new(request.text, request.flags, fallback).layout_plan();

    Ok(Json(PreviewResponse {
        html: render_preview_html(&plan),
    }))
}

/// POST /api/v1/letters/export/:format
///
/// Second pass over the edited text, rendered to `docx` or `pdf` and returned
/// as an attachment. Replaced characters are reported in
/// [`SUBSTITUTED_CHARACTERS_HEADER`].
pub async fn handle_export(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let format: ExportFormat = format.parse().map_err(AppError::Validation)?;
    ensure_within_limit(&request.text, state.config.max_letter_bytes)?;

    let fallback = fallback_header(request.header_lines, request.applicant.as_ref(), &request.flags);
    let cycle = RenderCycle::new(request.text, request.flags, fallback);
    let detection = cycle.detect();
    let document = export_blocking(
        format,
        state.page_config.clone(),
        cycle.text,
        cycle.flags.header_block_enabled,
        detection.lines,
        detection.consumed,
    )
    .await?;

    let default_name = &state.config.default_export_name;
    let name = match request.file_name.filter(|name| !name.trim().is_empty()) {
        Some(name) => name,
        None => {
            let job = JobTarget {
                company: request.company,
                position: request.position,
            };
            default_export_name(&job, Local::now().date_naive(), default_name)
        }
    };
    let file_name = attachment_name(&name, default_name, format);
    debug!("Export download name: {file_name}");

    let disposition = HeaderValue::from_str(&content_disposition(&file_name))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid Content-Disposition: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(format.mime_type())),
            (header::CONTENT_DISPOSITION, disposition),
            (
                HeaderName::from_static(SUBSTITUTED_CHARACTERS_HEADER),
                HeaderValue::from(document.substituted_chars),
            ),
        ],
        document.bytes,
    )
        .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Explicit header lines win; otherwise they are built from the applicant.
fn fallback_header(
    header_lines: Option<Vec<String>>,
    applicant: Option<&Applicant>,
    flags: &LayoutFlags,
) -> Vec<String> {
    match (header_lines, applicant) {
        (Some(lines), _) => lines,
        (None, Some(applicant)) => header_lines_for(applicant, flags),
        (None, None) => Vec::new(),
    }
}

fn ensure_within_limit(text: &str, max_bytes: usize) -> Result<(), AppError> {
    if text.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "letter text is {} bytes; the limit is {max_bytes}",
            text.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_header_prefers_explicit_lines() {
        let applicant = Applicant {
            name: "Jane Doe".to_string(),
            ..Default::default()
        };
        let flags = LayoutFlags::new(true, false);

        let explicit = fallback_header(Some(vec!["Custom".to_string()]), Some(&applicant), &flags);
        assert_eq!(explicit, vec!["Custom"]);

        let built = fallback_header(None, Some(&applicant), &flags);
        assert_eq!(built, vec!["Jane Doe"]);

        assert!(fallback_header(None, None, &flags).is_empty());
    }

    #[test]
    fn test_ensure_within_limit() {
        assert!(ensure_within_limit("short", 10).is_ok());
        assert!(matches!(
            ensure_within_limit("far too long", 5),
            Err(AppError::Validation(_))
        ));
    }
}
