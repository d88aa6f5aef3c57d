//! Export backends: turn one [`LayoutPlan`] into document bytes.
//!
//! The plan already fixes alignment, spacing and spacer placement. A backend
//! only decides how a line is encoded in its format, so the two outputs of the
//! same plan stay visually consistent.
//!
//! Characters a format cannot carry are replaced, never dropped, and the count
//! travels back with the bytes so callers can tell the user.
//!
//! Rendering is CPU-bound: async callers go through [`export_blocking`], which
//! runs the export on the blocking pool.

pub mod docx;
pub mod filename;
pub mod pdf;
pub mod preview;
mod winansi;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::layout::{LayoutPlan, PageConfig};

pub use docx::DocxRenderer;
pub use pdf::PdfRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("DOCX packaging failed: {0}")]
    Docx(String),

    #[error("Render task failed: {0}")]
    TaskJoin(String),
}

/// Target document encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Word-processing document (Office Open XML).
    Docx,
    /// Fixed-page document.
    Pdf,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "docx" => Ok(ExportFormat::Docx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unsupported export format '{other}'")),
        }
    }
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

/// Output of one backend run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    /// Characters replaced with a placeholder because the format cannot
    /// represent them.
    pub substituted_chars: usize,
}

/// One output encoding of the shared layout plan.
pub trait DocumentRenderer: Send + Sync {
    fn format(&self) -> ExportFormat;

    /// Must produce an openable document even for an empty plan.
    fn render(&self, plan: &LayoutPlan) -> Result<RenderedDocument, RenderError>;
}

pub fn renderer_for(format: ExportFormat, page: &PageConfig) -> Box<dyn DocumentRenderer> {
    match format {
        ExportFormat::Docx => Box::new(DocxRenderer),
        ExportFormat::Pdf => Box::new(PdfRenderer::new(page.clone())),
    }
}

/// Builds the plan for an edited text and renders it in one step.
pub fn export_document(
    format: ExportFormat,
    page: &PageConfig,
    text: &str,
    header_enabled: bool,
    header_lines: &[String],
    consumed_lines: usize,
) -> Result<RenderedDocument, RenderError> {
    let plan = LayoutPlan::build(text, header_enabled, header_lines, consumed_lines);
    let renderer = renderer_for(format, page);
    let document = renderer.render(&plan)?;

    if document.substituted_chars > 0 {
        warn!(
            "{:?} export replaced {} unrepresentable character(s)",
            renderer.format(),
            document.substituted_chars
        );
    }
    info!(
        "Rendered {:?} export ({} bytes)",
        renderer.format(),
        document.bytes.len()
    );
    Ok(document)
}

/// [`export_document`] on tokio's blocking pool.
pub async fn export_blocking(
    format: ExportFormat,
    page: PageConfig,
    text: String,
    header_enabled: bool,
    header_lines: Vec<String>,
    consumed_lines: usize,
) -> Result<RenderedDocument, RenderError> {
    tokio::task::spawn_blocking(move || {
        export_document(
            format,
            &page,
            &text,
            header_enabled,
            &header_lines,
            consumed_lines,
        )
    })
    .await
    .map_err(|e| RenderError::TaskJoin(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::default_page_config;

    #[test]
    fn test_export_format_serde_lowercase() {
        let format: ExportFormat = serde_json::from_str(r#""pdf""#).unwrap();
        assert_eq!(format, ExportFormat::Pdf);
        assert_eq!(serde_json::to_string(&ExportFormat::Docx).unwrap(), r#""docx""#);
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert_eq!("docx".parse::<ExportFormat>(), Ok(ExportFormat::Docx));
        assert!("txt".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_metadata() {
        assert_eq!(ExportFormat::Docx.extension(), "docx");
        assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
        assert!(ExportFormat::Docx.mime_type().contains("wordprocessingml"));
    }

    #[test]
    fn test_renderer_for_matches_format() {
        let page = default_page_config();
        for format in [ExportFormat::Docx, ExportFormat::Pdf] {
            assert_eq!(renderer_for(format, &page).format(), format);
        }
    }

    #[test]
    fn test_export_document_empty_text_both_formats() {
        let page = default_page_config();
        let docx = export_document(ExportFormat::Docx, &page, "", true, &[], 0).unwrap();
        let pdf = export_document(ExportFormat::Pdf, &page, "", true, &[], 0).unwrap();

        assert!(docx.bytes.starts_with(b"PK"), "docx must be a zip package");
        assert!(pdf.bytes.starts_with(b"%PDF-"));
        assert_eq!(docx.substituted_chars, 0);
        assert_eq!(pdf.substituted_chars, 0);
    }

    #[test]
    fn test_export_document_reports_substitutions_per_format() {
        let page = default_page_config();
        let text = "Łódź \u{7}";

        // WinAnsi has no Ł or ź; XML cannot carry the bell in either format.
        let pdf = export_document(ExportFormat::Pdf, &page, text, false, &[], 0).unwrap();
        let docx = export_document(ExportFormat::Docx, &page, text, false, &[], 0).unwrap();
        assert_eq!(pdf.substituted_chars, 3);
        assert_eq!(docx.substituted_chars, 1);
    }

    #[tokio::test]
    async fn test_export_blocking_runs_both_backends_concurrently() {
        let page = default_page_config();
        let header = vec!["Jane Doe".to_string()];
        let text = " Jane Doe\n\nDear Sir,\n\nRegards".to_string();

        let (docx, pdf) = tokio::join!(
            export_blocking(
                ExportFormat::Docx,
                page.clone(),
                text.clone(),
                true,
                header.clone(),
                2
            ),
            export_blocking(ExportFormat::Pdf, page, text, true, header, 2),
        );
        assert!(docx.unwrap().bytes.starts_with(b"PK"));
        assert!(pdf.unwrap().bytes.starts_with(b"%PDF-"));
    }
}
