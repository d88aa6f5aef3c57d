//! Static font metrics and page geometry for the fixed-page backend.
//!
//! Widths are in em units (1/1000 of the Helvetica AFM advance widths), which is
//! exact for the built-in Helvetica the PDF backend uses. The tables cover every
//! glyph WinAnsiEncoding can show: printable ASCII, the Latin-1 upper half and
//! the typographic extras in 0x80..=0x9F.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Geometry and type size for a fixed-page letter. All values in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub margin_left_pt: f32,
    pub margin_right_pt: f32,
    pub margin_top_pt: f32,
    pub margin_bottom_pt: f32,
    pub font_size_pt: f32,
    /// Baseline-to-baseline distance for single line spacing.
    pub leading_pt: f32,
}

impl PageConfig {
    pub fn text_width_pt(&self) -> f32 {
        self.page_width_pt - self.margin_left_pt - self.margin_right_pt
    }

    /// Usable text width in em units at the configured font size.
    pub fn text_width_em(&self) -> f32 {
        self.text_width_pt() / self.font_size_pt
    }
}

/// A4 portrait, 1" margins on all sides, 12pt Helvetica on 14pt leading.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        page_width_pt: 595.28,
        page_height_pt: 841.89,
        margin_left_pt: 72.0,
        margin_right_pt: 72.0,
        margin_top_pt: 72.0,
        margin_bottom_pt: 72.0,
        font_size_pt: 12.0,
        leading_pt: 14.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Character-width table for one font.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
///
/// `latin1_widths` covers U+00A0..=U+00FF in code point order; `extra_widths`
/// lists the remaining encodable characters.
pub struct FontMetricTable {
    widths: [f32; 95],
    latin1_widths: [f32; 96],
    extra_widths: &'static [(char, f32)],
    /// Fallback width for characters the tables do not cover.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        match code {
            32..=126 => self.widths[code - 32],
            0xA0..=0xFF => self.latin1_widths[code - 0xA0],
            _ => self
                .extra_widths
                .iter()
                .find(|(extra, _)| *extra == c)
                .map_or(self.average_char_width, |(_, width)| *width),
        }
    }

    /// Width of `s` in points at `font_size_pt`.
    pub fn measure_pt(&self, s: &str, font_size_pt: f32) -> f32 {
        self.measure_str(s) * font_size_pt
    }

    /// Greedy word-wrap at `max_width_em`.
    ///
    /// A line that already fits is returned untouched so indentation and
    /// inner spacing survive. A single word wider than the column gets a line
    /// of its own. An empty line stays one empty line.
    pub fn wrap_line(&self, line: &str, max_width_em: f32) -> Vec<String> {
        if self.measure_str(line) <= max_width_em {
            return vec![line.to_string()];
        }

        let mut wrapped = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in line.split_whitespace() {
            let word_w = self.measure_str(word);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_w;
            } else if current_width + self.space_width + word_w > max_width_em {
                wrapped.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += self.space_width + word_w;
            }
        }
        if !current.is_empty() {
            wrapped.push(current);
        }
        wrapped
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width table
// ────────────────────────────────────────────────────────────────────────────

/// Helvetica (PDF base-14), from the Adobe AFM.
static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    #[rustfmt::skip]
    latin1_widths: [
        // nbsp   ¡      ¢      £      ¤      ¥      ¦      §      ¨      ©      ª      «      ¬      shy    ®      ¯
        0.278, 0.333, 0.556, 0.556, 0.556, 0.556, 0.260, 0.556, 0.333, 0.737, 0.370, 0.556, 0.584, 0.333, 0.737, 0.333,
        // °      ±      ²      ³      ´      µ      ¶      ·      ¸      ¹      º      »      ¼      ½      ¾      ¿
        0.400, 0.584, 0.333, 0.333, 0.333, 0.556, 0.537, 0.278, 0.333, 0.333, 0.365, 0.556, 0.834, 0.834, 0.834, 0.611,
        // À      Á      Â      Ã      Ä      Å      Æ      Ç      È      É      Ê      Ë      Ì      Í      Î      Ï
        0.667, 0.667, 0.667, 0.667, 0.667, 0.667, 1.000, 0.722, 0.667, 0.667, 0.667, 0.667, 0.278, 0.278, 0.278, 0.278,
        // Ð      Ñ      Ò      Ó      Ô      Õ      Ö      ×      Ø      Ù      Ú      Û      Ü      Ý      Þ      ß
        0.722, 0.722, 0.778, 0.778, 0.778, 0.778, 0.778, 0.584, 0.778, 0.722, 0.722, 0.722, 0.722, 0.667, 0.667, 0.611,
        // à      á      â      ã      ä      å      æ      ç      è      é      ê      ë      ì      í      î      ï
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.889, 0.500, 0.556, 0.556, 0.556, 0.556, 0.278, 0.278, 0.278, 0.278,
        // ð      ñ      ò      ó      ô      õ      ö      ÷      ø      ù      ú      û      ü      ý      þ      ÿ
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.584, 0.611, 0.556, 0.556, 0.556, 0.556, 0.500, 0.556, 0.500,
    ],
    extra_widths: &HELVETICA_EXTRAS,
    average_char_width: 0.556,
    space_width: 0.278,
};

/// WinAnsi 0x80..=0x9F glyphs outside Latin-1.
#[rustfmt::skip]
static HELVETICA_EXTRAS: [(char, f32); 27] = [
    ('€', 0.556), ('‚', 0.222), ('ƒ', 0.556), ('„', 0.333), ('…', 1.000), ('†', 0.556),
    ('‡', 0.556), ('ˆ', 0.333), ('‰', 1.000), ('Š', 0.667), ('‹', 0.333), ('Œ', 1.000),
    ('Ž', 0.611), ('\u{2018}', 0.222), ('\u{2019}', 0.222), ('“', 0.333), ('”', 0.333),
    ('•', 0.350), ('–', 0.556), ('—', 1.000), ('˜', 0.333), ('™', 1.000), ('š', 0.500),
    ('›', 0.333), ('œ', 0.944), ('ž', 0.500), ('Ÿ', 0.667),
];

pub fn helvetica() -> &'static FontMetricTable {
    &HELVETICA_TABLE
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        assert_eq!(helvetica().measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        // "Rust" = R(0.722) + u(0.556) + s(0.500) + t(0.278) = 2.056
        let width = helvetica().measure_str("Rust");
        assert!((width - 2.056).abs() < 1e-3, "Rust width should be ~2.056, got {width}");
    }

    #[test]
    fn test_measure_str_winansi_upper_half() {
        let metrics = helvetica();
        // Æ 1.000 + Ç 0.722 + ø 0.611 + — 1.000 + Ÿ 0.667
        let width = metrics.measure_str("ÆÇø—Ÿ");
        assert!((width - 4.0).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn test_measure_str_outside_winansi_falls_back() {
        let metrics = helvetica();
        let width = metrics.measure_str("Ł漢");
        assert!((width - 2.0 * metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_measure_pt_scales_with_font_size() {
        let metrics = helvetica();
        let at_10 = metrics.measure_pt("Letter", 10.0);
        let at_20 = metrics.measure_pt("Letter", 20.0);
        assert!((at_20 - 2.0 * at_10).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_line_short_line_untouched() {
        let wrapped = helvetica().wrap_line("  Dear   Sir,", 40.0);
        assert_eq!(wrapped, vec!["  Dear   Sir,".to_string()]);
    }

    #[test]
    fn test_wrap_line_empty_stays_one_line() {
        assert_eq!(helvetica().wrap_line("", 40.0), vec![String::new()]);
    }

    #[test]
    fn test_wrap_line_long_line_fits_column() {
        let metrics = helvetica();
        let config = default_page_config();
        let line = "I am writing to express my interest in the analyst position \
                    advertised on your careers page, having spent six years building \
                    reporting pipelines for finance teams across three continents.";
        let wrapped = metrics.wrap_line(line, config.text_width_em());

        assert!(wrapped.len() >= 2, "expected wrapping, got {wrapped:?}");
        for piece in &wrapped {
            assert!(metrics.measure_str(piece) <= config.text_width_em());
        }
        assert_eq!(wrapped.join(" "), line.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_wrap_line_oversized_word_gets_own_line() {
        let word = "x".repeat(200);
        let wrapped = helvetica().wrap_line(&format!("a {word} b"), 10.0);
        assert_eq!(wrapped, vec!["a".to_string(), word, "b".to_string()]);
    }

    #[test]
    fn test_default_page_config_sanity() {
        let config = default_page_config();
        assert!((config.text_width_pt() - 451.28).abs() < 0.01);
        assert!(config.text_width_em() > 30.0 && config.text_width_em() < 45.0);
    }
}
