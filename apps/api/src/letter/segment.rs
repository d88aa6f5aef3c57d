//! Block segmentation: splits body text into paragraph blocks on blank lines.

use crate::letter::model::ParagraphBlock;

/// Drops the first `skip_lines` raw lines, then groups the rest into blocks.
///
/// Runs of blank lines collapse into a single boundary; lines are right-stripped;
/// empty blocks are never produced.
pub fn segment_blocks(text: &str, skip_lines: usize) -> Vec<ParagraphBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    let remaining = text
        .split('\n')
        .skip(skip_lines)
        .skip_while(|line| line.trim().is_empty());

    for line in remaining {
        if line.trim().is_empty() {
            blocks.extend(ParagraphBlock::new(std::mem::take(&mut current)));
            continue;
        }
        current.push(line.trim_end().to_string());
    }
    blocks.extend(ParagraphBlock::new(current));

    blocks
}
