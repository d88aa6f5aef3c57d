//! Word-processing backend built on `docx-rs`.
//!
//! Every line becomes its own paragraph carrying the unit's alignment and
//! spacing; spacer units become empty paragraphs with the same spacing.
//! `docx-rs` escapes markup characters in text runs; characters XML 1.0
//! cannot carry at all are replaced here.

use std::borrow::Cow;
use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, LineSpacing, LineSpacingType, Paragraph, Run};
use tracing::warn;

use crate::layout::plan::{Alignment, LayoutPlan, LayoutUnit, Spacing, UnitRole};
use crate::render::{DocumentRenderer, ExportFormat, RenderError, RenderedDocument};

/// Twips per point.
const TWIPS_PER_PT: f32 = 20.0;
/// `w:line` value for single spacing under the `auto` rule.
const SINGLE_LINE: f32 = 240.0;

pub struct DocxRenderer;

impl DocumentRenderer for DocxRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    fn render(&self, plan: &LayoutPlan) -> Result<RenderedDocument, RenderError> {
        let mut docx = Docx::new();
        let mut substituted_chars = 0;

        for unit in &plan.units {
            match unit.role {
                UnitRole::Spacer => {
                    docx = docx.add_paragraph(styled(Paragraph::new(), unit));
                }
                UnitRole::Header | UnitRole::Body => {
                    for line in &unit.lines {
                        let (text, replaced) = xml_safe(line);
                        if replaced > 0 {
                            warn!("DOCX line has {replaced} control character(s): {line:?}");
                        }
                        substituted_chars += replaced;
                        let run = Run::new().add_text(text);
                        docx = docx.add_paragraph(styled(Paragraph::new().add_run(run), unit));
                    }
                }
            }
        }

        let mut buf = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buf)
            .map_err(|e| RenderError::Docx(e.to_string()))?;
        Ok(RenderedDocument {
            bytes: buf.into_inner(),
            substituted_chars,
        })
    }
}

fn styled(paragraph: Paragraph, unit: &LayoutUnit) -> Paragraph {
    let alignment = match unit.alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Right => AlignmentType::Right,
    };
    paragraph
        .align(alignment)
        .line_spacing(line_spacing(unit.spacing))
}

fn line_spacing(spacing: Spacing) -> LineSpacing {
    LineSpacing::new()
        .before((spacing.before_pt * TWIPS_PER_PT).round() as _)
        .after((spacing.after_pt * TWIPS_PER_PT).round() as _)
        .line((spacing.line_multiple * SINGLE_LINE).round() as _)
        .line_rule(LineSpacingType::Auto)
}

/// Replaces characters outside the XML 1.0 `Char` production with U+FFFD and
/// returns how many were replaced.
fn xml_safe(line: &str) -> (Cow<'_, str>, usize) {
    fn allowed(c: char) -> bool {
        matches!(c,
            '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}')
    }

    let replaced = line.chars().filter(|c| !allowed(*c)).count();
    if replaced == 0 {
        return (Cow::Borrowed(line), 0);
    }
    let cleaned = line
        .chars()
        .map(|c| if allowed(c) { c } else { '\u{FFFD}' })
        .collect();
    (Cow::Owned(cleaned), replaced)
}
