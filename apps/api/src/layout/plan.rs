//! Block layout plan: the alignment and spacing policy shared by every backend.
//!
//! The plan is the only place that decides which lines are right-aligned,
//! where spacer units go and how paragraphs are spaced. Backends walk the
//! units and perform nothing but their format's literal encoding.

use serde::Serialize;

use crate::letter::model::{tag_lines, TaggedLine};
use crate::letter::segment::segment_blocks;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitRole {
    /// Sender block, rendered first.
    Header,
    /// One paragraph block of the letter body.
    Body,
    /// Visible blank line between two body blocks.
    Spacer,
}

/// Paragraph spacing applied to every line of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spacing {
    pub before_pt: f32,
    pub after_pt: f32,
    /// Multiple of single line spacing.
    pub line_multiple: f32,
}

impl Spacing {
    pub const TIGHT: Spacing = Spacing {
        before_pt: 0.0,
        after_pt: 0.0,
        line_multiple: 1.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutUnit {
    pub role: UnitRole,
    pub alignment: Alignment,
    pub spacing: Spacing,
    pub lines: Vec<String>,
}

impl LayoutUnit {
    fn new(role: UnitRole, lines: Vec<String>) -> Self {
        let alignment = match role {
            UnitRole::Header => Alignment::Right,
            UnitRole::Body | UnitRole::Spacer => Alignment::Left,
        };
        Self {
            role,
            alignment,
            spacing: Spacing::TIGHT,
            lines,
        }
    }

    fn spacer() -> Self {
        Self::new(UnitRole::Spacer, vec![String::new()])
    }
}

/// Ordered units of one letter, ready for any backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutPlan {
    pub units: Vec<LayoutUnit>,
}

// ────────────────────────────────────────────────────────────────────────────
// Plan construction
// ────────────────────────────────────────────────────────────────────────────

impl LayoutPlan {
    /// Derives the plan for an edited text.
    ///
    /// The header only claims `consumed_lines` of the text when it is enabled and
    /// non-empty. With the header disabled the would-be header lines fall back
    /// into body segmentation, so toggling the flag never deletes content.
    pub fn build(
        text: &str,
        header_enabled: bool,
        header_lines: &[String],
        consumed_lines: usize,
    ) -> Self {
        let header: &[String] = if header_enabled { header_lines } else { &[] };
        let skip = if header.is_empty() { 0 } else { consumed_lines };
        let blocks = segment_blocks(text, skip);

        Self::from_tagged(tag_lines(header, &blocks))
    }

    /// Groups classified lines into units: consecutive header lines form the
    /// right-aligned header unit, consecutive body lines a body unit, and every
    /// block break becomes a spacer.
    pub fn from_tagged<'a>(lines: impl IntoIterator<Item = TaggedLine<'a>>) -> Self {
        let mut units: Vec<LayoutUnit> = Vec::new();

        for tagged in lines {
            let (role, line) = match tagged {
                TaggedLine::Header(line) => (UnitRole::Header, line.trim()),
                TaggedLine::Body(line) => (UnitRole::Body, line),
                TaggedLine::Break => {
                    units.push(LayoutUnit::spacer());
                    continue;
                }
            };
            match units.last_mut() {
                Some(unit) if unit.role == role => unit.lines.push(line.to_string()),
                _ => units.push(LayoutUnit::new(role, vec![line.to_string()])),
            }
        }

        Self { units }
    }

    /// Lines of header and body units; spacers are not content.
    pub fn rendered_line_count(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| unit.role != UnitRole::Spacer)
            .map(|unit| unit.lines.len())
            .sum()
    }
}

#[cfg(test)]
impl LayoutPlan {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn header(&self) -> Option<&LayoutUnit> {
        self.units.iter().find(|unit| unit.role == UnitRole::Header)
    }

    pub fn body_units(&self) -> impl Iterator<Item = &LayoutUnit> {
        self.units.iter().filter(|unit| unit.role == UnitRole::Body)
    }
}
