//! Text encoding for the built-in Helvetica font (WinAnsiEncoding).
//!
//! Base-14 fonts carry no Unicode mapping of their own, so every shown string
//! is a byte string in the font's encoding. Characters with no WinAnsi slot
//! become `?` and are counted, so the caller can report the loss.

/// No-break space; keeps an empty line a real, extractable glyph run.
pub const NBSP: u8 = 0xA0;

const REPLACEMENT: u8 = b'?';

/// Upper half of WinAnsi that differs from Latin-1.
#[rustfmt::skip]
const SPECIALS: [(char, u8); 27] = [
    ('\u{20AC}', 0x80), ('\u{201A}', 0x82), ('\u{0192}', 0x83), ('\u{201E}', 0x84),
    ('\u{2026}', 0x85), ('\u{2020}', 0x86), ('\u{2021}', 0x87), ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89), ('\u{0160}', 0x8A), ('\u{2039}', 0x8B), ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E), ('\u{2018}', 0x91), ('\u{2019}', 0x92), ('\u{201C}', 0x93),
    ('\u{201D}', 0x94), ('\u{2022}', 0x95), ('\u{2013}', 0x96), ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98), ('\u{2122}', 0x99), ('\u{0161}', 0x9A), ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C), ('\u{017E}', 0x9E), ('\u{0178}', 0x9F),
];

fn byte_for(c: char) -> Option<u8> {
    match c {
        '\t' => Some(b' '),
        ' '..='~' => Some(c as u8),
        '\u{A0}'..='\u{FF}' => Some(c as u32 as u8),
        _ => SPECIALS
            .iter()
            .find(|(special, _)| *special == c)
            .map(|(_, byte)| *byte),
    }
}

/// A string in WinAnsi bytes plus the number of characters replaced by `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub substituted: usize,
}

pub fn encode(text: &str) -> Encoded {
    let mut substituted = 0;
    let bytes = text
        .chars()
        .map(|c| {
            byte_for(c).unwrap_or_else(|| {
                substituted += 1;
                REPLACEMENT
            })
        })
        .collect();
    Encoded { bytes, substituted }
}

/// Encodes one rendered line; blank lines become a single no-break space.
pub fn encode_line(line: &str) -> Encoded {
    if line.trim().is_empty() {
        Encoded {
            bytes: vec![NBSP],
            substituted: 0,
        }
    } else {
        encode(line)
    }
}
