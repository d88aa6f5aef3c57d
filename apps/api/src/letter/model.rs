//! Block model shared by every stage of the render → edit → export cycle.
//!
//! Plain text is the only medium that carries structure between stages. A line
//! that belongs to the right-aligned header block starts with a single space;
//! everything else is body text split into paragraph blocks on blank lines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prefix that marks a header line inside the editable text.
pub const HEADER_LINE_PREFIX: char = ' ';

/// Number of raw lines attributed to the header region during one parse pass.
///
/// Not reconstructible from the header lines alone (embedded blank lines are
/// consumed too), so it travels next to them whenever the same text is reparsed.
pub type ConsumedLineCount = usize;

// ────────────────────────────────────────────────────────────────────────────
// Layout flags
// ────────────────────────────────────────────────────────────────────────────

/// Named layout switches supplied by the host on every render cycle.
///
/// Only the two named fields drive the block model. Any other section toggles the
/// host sends (greeting, subject, ...) are kept in `sections` untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutFlags {
    /// The sender header is a distinct right-aligned unit.
    #[serde(default)]
    pub header_block_enabled: bool,
    /// The first paragraph block sits directly under the header in the editable text.
    #[serde(default)]
    pub merge_first_block_with_header: bool,
    #[serde(flatten)]
    pub sections: BTreeMap<String, bool>,
}

impl LayoutFlags {
    #[cfg(test)]
    pub fn new(header_block_enabled: bool, merge_first_block_with_header: bool) -> Self {
        Self {
            header_block_enabled,
            merge_first_block_with_header,
            sections: BTreeMap::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Paragraph blocks
// ────────────────────────────────────────────────────────────────────────────

/// A left-aligned run of consecutive non-blank lines.
///
/// Never empty. Lines carry no trailing whitespace when produced by segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParagraphBlock(Vec<String>);

impl ParagraphBlock {
    /// Returns `None` for an empty line list.
    pub fn new(lines: Vec<String>) -> Option<Self> {
        if lines.is_empty() {
            None
        } else {
            Some(Self(lines))
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.0
    }

    pub fn into_lines(self) -> Vec<String> {
        self.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Header detection result
// ────────────────────────────────────────────────────────────────────────────

/// Where the header lines of a parse pass came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderSource {
    /// No fallback lines were supplied, so there is no header concept at all.
    Absent,
    /// Space-prefixed lines were found at the top of the text.
    Recovered,
    /// Nothing was recognised; the caller's fallback lines stand in.
    Fallback,
}

/// Outcome of [`detect_header`](crate::letter::header::detect_header).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderDetection {
    pub lines: Vec<String>,
    pub consumed: ConsumedLineCount,
    pub source: HeaderSource,
}

impl HeaderDetection {
    pub fn absent() -> Self {
        Self {
            lines: Vec::new(),
            consumed: 0,
            source: HeaderSource::Absent,
        }
    }

    pub fn has_header(&self) -> bool {
        !self.lines.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parsed letter
// ────────────────────────────────────────────────────────────────────────────

/// Classification of a single line after one detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaggedLine<'a> {
    Header(&'a str),
    Body(&'a str),
    /// Boundary between two paragraph blocks.
    Break,
}

/// Header and body of one text, classified exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLetter {
    pub header: HeaderDetection,
    pub blocks: Vec<ParagraphBlock>,
}

impl ParsedLetter {
    /// Walks the letter in reading order: header lines, then body lines with a
    /// `Break` between consecutive blocks.
    pub fn tagged_lines(&self) -> impl Iterator<Item = TaggedLine<'_>> + '_ {
        tag_lines(&self.header.lines, &self.blocks)
    }
}

/// Tags header lines and paragraph blocks in reading order.
pub fn tag_lines<'a>(
    header: &'a [String],
    blocks: &'a [ParagraphBlock],
) -> impl Iterator<Item = TaggedLine<'a>> + 'a {
    let header = header.iter().map(|line| TaggedLine::Header(line.as_str()));

    let body = blocks.iter().enumerate().flat_map(|(idx, block)| {
        let brk = (idx > 0).then_some(TaggedLine::Break);
        brk.into_iter()
            .chain(block.lines().iter().map(|line| TaggedLine::Body(line.as_str())))
    });

    header.chain(body)
}
