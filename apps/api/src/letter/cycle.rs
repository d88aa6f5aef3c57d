//! Render cycle: one explicit bundle of text and flags per host event.
//!
//! Flow (first pass):  template output → merge header/recipient → detect →
//!                     segment → assemble → canonical editable text
//! Flow (second pass): edited text → detect → layout plan → backends
//!
//! Nothing is cached between cycles: the host re-supplies the current text on
//! every event and the consumed line count is recomputed each time.

use std::borrow::Cow;

use tracing::debug;

use crate::layout::plan::LayoutPlan;
use crate::letter::assemble::assemble_text;
use crate::letter::header::detect_header;
use crate::letter::model::{HeaderDetection, LayoutFlags, ParsedLetter};
use crate::letter::segment::segment_blocks;
use crate::models::Applicant;

/// Fallback header lines built from the applicant's identity fields.
///
/// Empty when the header block is disabled.
pub fn header_lines_for(applicant: &Applicant, flags: &LayoutFlags) -> Vec<String> {
    if !flags.header_block_enabled {
        return Vec::new();
    }

    let mut lines: Vec<String> = [
        &applicant.name,
        &applicant.address_line1,
        &applicant.address_line2,
    ]
    .iter()
    .map(|value| value.trim())
    .filter(|value| !value.is_empty())
    .map(str::to_string)
    .collect();

    let home_location = applicant.home_location();
    if !home_location.is_empty() {
        lines.push(home_location);
    }
    lines
}

/// Pulls the recipient block up against the sender block in template output.
///
/// Only the first blank-line separator is collapsed, and only when both blocks
/// are enabled.
pub fn join_header_with_recipient<'a>(rendered: &'a str, flags: &LayoutFlags) -> Cow<'a, str> {
    if flags.header_block_enabled && flags.merge_first_block_with_header {
        Cow::Owned(rendered.replacen("\n\n", "\n", 1))
    } else {
        Cow::Borrowed(rendered)
    }
}

/// Current text plus everything needed to interpret it.
#[derive(Debug, Clone)]
pub struct RenderCycle {
    pub text: String,
    pub flags: LayoutFlags,
    pub fallback_header: Vec<String>,
}

impl RenderCycle {
    pub fn new(text: impl Into<String>, flags: LayoutFlags, fallback_header: Vec<String>) -> Self {
        Self {
            text: text.into(),
            flags,
            fallback_header,
        }
    }

    /// Classifies the text once: header detection, then body segmentation
    /// resuming after the consumed header region.
    pub fn parse(&self) -> ParsedLetter {
        parse_text(&self.text, &self.fallback_header)
    }

    /// Starts a cycle from raw template output, applying the recipient merge.
    ///
    /// Edited text must go through [`RenderCycle::new`]: the merge is a template
    /// convention and would fuse body blocks if applied again.
    pub fn from_template(rendered: &str, flags: LayoutFlags, fallback_header: Vec<String>) -> Self {
        let text = join_header_with_recipient(rendered, &flags).into_owned();
        Self::new(text, flags, fallback_header)
    }

    /// The string shown in the edit surface.
    ///
    /// Reassembling its own output yields the same header and blocks.
    pub fn canonical_text(&self) -> String {
        let parsed = self.parse();
        let assembled = assemble_text(
            &parsed.header.lines,
            &parsed.blocks,
            self.flags.merge_first_block_with_header,
        );
        if assembled.is_empty() {
            return self.text.clone();
        }
        assembled
    }

    /// Header detection on the current text; the inputs of the export contract.
    pub fn detect(&self) -> HeaderDetection {
        detect_header(&self.text, &self.fallback_header)
    }

    /// Second pass over edited text: the plan both export backends render.
    ///
    /// The text is classified once and the plan is grouped from the tagged
    /// lines. With the header disabled there is no header concept, so every
    /// line falls into the body.
    pub fn layout_plan(&self) -> LayoutPlan {
        let parsed = if self.flags.header_block_enabled {
            self.parse()
        } else {
            parse_text(&self.text, &[])
        };
        let plan = LayoutPlan::from_tagged(parsed.tagged_lines());
        debug!(
            "Layout plan: {} units, {} lines (header {:?}, consumed {})",
            plan.units.len(),
            plan.rendered_line_count(),
            parsed.header.source,
            parsed.header.consumed
        );
        plan
    }
}

fn parse_text(text: &str, fallback_header: &[String]) -> ParsedLetter {
    let header = detect_header(text, fallback_header);
    let skip = if header.has_header() { header.consumed } else { 0 };
    let blocks = segment_blocks(text, skip);
    debug!(
        "Parsed letter: header {:?} ({} lines, consumed {}), {} blocks",
        header.source,
        header.lines.len(),
        header.consumed,
        blocks.len()
    );
    ParsedLetter { header, blocks }
}
