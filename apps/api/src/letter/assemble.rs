//! Reassembly: turns header lines and paragraph blocks back into the canonical
//! editable text.
//!
//! Header lines are written with the single-space prefix so the next detection
//! pass recovers them. Units are separated by exactly one blank line.

use crate::letter::model::{ParagraphBlock, HEADER_LINE_PREFIX};

/// Builds the canonical text for the edit surface.
///
/// With `merge_first_block` the first block follows the header lines directly,
/// with no blank separator. Blank header entries do not survive a later
/// detection pass, so callers only pass non-blank header lines.
pub fn assemble_text(
    header_lines: &[String],
    blocks: &[ParagraphBlock],
    merge_first_block: bool,
) -> String {
    let mut units: Vec<String> = Vec::with_capacity(blocks.len() + 1);
    let mut remaining = blocks;
    let mut follows_header = !header_lines.is_empty();

    if !header_lines.is_empty() {
        let mut unit: Vec<String> = header_lines
            .iter()
            .map(|line| format!("{HEADER_LINE_PREFIX}{line}"))
            .collect();

        if merge_first_block {
            if let Some((first, rest)) = blocks.split_first() {
                unit.extend(without_leading_prefix(first.lines()));
                remaining = rest;
                follows_header = false;
            }
        }
        units.push(unit.join("\n"));
    }

    for block in remaining {
        let body = if follows_header {
            without_leading_prefix(block.lines()).join("\n")
        } else {
            block.lines().join("\n")
        };
        let body = body.trim_matches('\n');
        if !body.is_empty() {
            units.push(body.to_string());
            follows_header = false;
        }
    }

    // Only line breaks are trimmed at the front: the first header line keeps its prefix.
    units
        .join("\n\n")
        .trim_start_matches(['\n', '\r'])
        .trim_end()
        .to_string()
}

/// Strips the header prefix from the first line of the unit right under the
/// header; otherwise an indented body line would be read back as a header line.
fn without_leading_prefix(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 {
                line.trim_start_matches(HEADER_LINE_PREFIX).to_string()
            } else {
                line.clone()
            }
        })
        .collect()
}
