//! Header detection: recovers the right-aligned sender block from free text.
//!
//! The only signal is the single leading space on each header line. Leading
//! blank lines are skipped, blank lines after the first header line are treated
//! as spacing inside the header, and the first other line ends the scan.

use crate::letter::model::{HeaderDetection, HeaderSource, HEADER_LINE_PREFIX};

/// Splits the leading header region off `text`.
///
/// With empty `fallback` there is no header concept and nothing is consumed.
/// When no prefixed line is found the fallback lines are returned with a
/// consumed count equal to their length.
pub fn detect_header(text: &str, fallback: &[String]) -> HeaderDetection {
    if fallback.is_empty() {
        return HeaderDetection::absent();
    }

    let mut collected: Vec<String> = Vec::new();
    let mut consumed = 0usize;
    let mut started = false;

    for line in text.split('\n') {
        let blank = line.trim().is_empty();

        if !started && blank {
            consumed += 1;
            continue;
        }
        started = true;

        if line.starts_with(HEADER_LINE_PREFIX) {
            collected.push(line.trim().to_string());
            consumed += 1;
            continue;
        }

        if blank && !collected.is_empty() {
            consumed += 1;
            continue;
        }

        break;
    }

    if collected.is_empty() {
        return HeaderDetection {
            lines: fallback.to_vec(),
            consumed: fallback.len(),
            source: HeaderSource::Fallback,
        };
    }

    HeaderDetection {
        lines: collected,
        consumed,
        source: HeaderSource::Recovered,
    }
}
