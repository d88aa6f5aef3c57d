//! Fixed-page backend built on `pdf-writer`.
//!
//! Lines are wrapped to the text column with the Helvetica metric table,
//! placed top-down on the leading grid and paginated at the bottom margin.
//! Right-aligned units are positioned by their measured width, so the header
//! block ends flush at the right margin. Text is shown in WinAnsi; characters
//! outside it are replaced and counted in the result.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::warn;

use crate::layout::font_metrics::{helvetica, PageConfig};
use crate::layout::plan::{Alignment, LayoutPlan};
use crate::render::winansi;
use crate::render::{DocumentRenderer, ExportFormat, RenderError, RenderedDocument};

const FONT_NAME: Name<'static> = Name(b"F1");

/// One shown line, positioned in page space (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

pub struct PdfRenderer {
    page: PageConfig,
}

impl PdfRenderer {
    pub fn new(page: PageConfig) -> Self {
        Self { page }
    }

    /// Wraps and places every line of the plan. Always returns at least one
    /// page, so an empty plan still exports as a single blank page.
    pub fn paginate(&self, plan: &LayoutPlan) -> Vec<Vec<PlacedLine>> {
        let page = &self.page;
        let metrics = helvetica();
        let column_em = page.text_width_em();
        let top = page.page_height_pt - page.margin_top_pt - page.font_size_pt;

        let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
        let mut y = top;

        for unit in &plan.units {
            let leading = page.leading_pt * unit.spacing.line_multiple;
            y -= unit.spacing.before_pt;

            for line in &unit.lines {
                for piece in metrics.wrap_line(line, column_em) {
                    if y < page.margin_bottom_pt {
                        pages.push(Vec::new());
                        y = top;
                    }
                    // A word wider than the column still starts at the left margin.
                    let x = match unit.alignment {
                        Alignment::Left => page.margin_left_pt,
                        Alignment::Right => (page.page_width_pt
                            - page.margin_right_pt
                            - metrics.measure_pt(&piece, page.font_size_pt))
                        .max(page.margin_left_pt),
                    };
                    if let Some(current) = pages.last_mut() {
                        current.push(PlacedLine { x, y, text: piece });
                    }
                    y -= leading;
                }
            }

            y -= unit.spacing.after_pt;
        }

        pages
    }
}

impl DocumentRenderer for PdfRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, plan: &LayoutPlan) -> Result<RenderedDocument, RenderError> {
        let pages = self.paginate(plan);
        let mut substituted_chars = 0;

        let catalog_id = Ref::new(1);
        let tree_id = Ref::new(2);
        let font_id = Ref::new(3);
        let info_id = Ref::new(4);

        // Page i uses objects 5 + 2i (page) and 6 + 2i (content stream).
        let page_ids: Vec<(Ref, Ref)> = (0..pages.len() as i32)
            .map(|i| (Ref::new(5 + 2 * i), Ref::new(6 + 2 * i)))
            .collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(page_ids.len() as i32);
        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.document_info(info_id).producer(TextStr("letterpress"));

        let media_box = Rect::new(0.0, 0.0, self.page.page_width_pt, self.page.page_height_pt);

        for (lines, (page_id, content_id)) in pages.iter().zip(&page_ids) {
            let mut page = pdf.page(*page_id);
            page.media_box(media_box);
            page.parent(tree_id);
            page.contents(*content_id);
            page.resources().fonts().pair(FONT_NAME, font_id);
            page.finish();

            let mut content = Content::new();
            for line in lines {
                let encoded = winansi::encode_line(&line.text);
                if encoded.substituted > 0 {
                    warn!(
                        "PDF line has {} character(s) outside WinAnsi: {:?}",
                        encoded.substituted, line.text
                    );
                }
                substituted_chars += encoded.substituted;

                content.begin_text();
                content.set_font(FONT_NAME, self.page.font_size_pt);
                content.next_line(line.x, line.y);
                content.show(Str(&encoded.bytes));
                content.end_text();
            }
            pdf.stream(*content_id, &content.finish());
        }

        Ok(RenderedDocument {
            bytes: pdf.finish(),
            substituted_chars,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::default_page_config;

    fn renderer() -> PdfRenderer {
        PdfRenderer::new(default_page_config())
    }

    fn plan(text: &str, header: &[&str], consumed: usize) -> LayoutPlan {
        let header: Vec<String> = header.iter().map(|s| s.to_string()).collect();
        LayoutPlan::build(text, true, &header, consumed)
    }

    #[test]
    fn test_empty_plan_is_one_blank_page() {
        let pages = renderer().paginate(&LayoutPlan::default());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());

        let document = renderer().render(&LayoutPlan::default()).unwrap();
        assert!(document.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_header_flush_right_body_at_left_margin() {
        let config = default_page_config();
        let metrics = helvetica();
        let pages = renderer().paginate(&plan(" Jane Doe\n 123 Elm St\n\nDear Sir,", &["Jane Doe", "123 Elm St"], 3));
        let lines = &pages[0];

        let right_edge = config.page_width_pt - config.margin_right_pt;
        for header in &lines[..2] {
            let end = header.x + metrics.measure_pt(&header.text, config.font_size_pt);
            assert!((end - right_edge).abs() < 1e-2, "{header:?}");
        }
        assert_eq!(lines[2].text, "Dear Sir,");
        assert_eq!(lines[2].x, config.margin_left_pt);
    }

    #[test]
    fn test_lines_descend_on_leading_grid() {
        let config = default_page_config();
        let pages = renderer().paginate(&plan("One\nTwo\n\nThree", &[], 0));
        let ys: Vec<f32> = pages[0].iter().map(|l| l.y).collect();

        // One, Two, spacer, Three.
        assert_eq!(ys.len(), 4);
        for pair in ys.windows(2) {
            assert!((pair[0] - pair[1] - config.leading_pt).abs() < 1e-3);
        }
        assert_eq!(pages[0][2].text, "");
    }

    #[test]
    fn test_long_letter_paginates() {
        let body: Vec<String> = (0..120).map(|i| format!("line {i}")).collect();
        let pages = renderer().paginate(&plan(&body.join("\n"), &[], 0));

        assert_eq!(pages.len(), 3);
        assert_eq!(pages.iter().map(Vec::len).sum::<usize>(), 120);
        let bottom = default_page_config().margin_bottom_pt;
        assert!(pages.iter().flatten().all(|line| line.y >= bottom));
    }

    #[test]
    fn test_long_line_is_wrapped_inside_column() {
        let long = "word ".repeat(80);
        let pages = renderer().paginate(&plan(long.trim_end(), &[], 0));
        assert!(pages[0].len() > 1);
    }

    #[test]
    fn test_text_extracts_with_markup_characters() {
        let document = renderer()
            .render(&plan(" Jane Doe\n\nA & B <C>\n\nRegards", &["Jane Doe"], 2))
            .unwrap();
        assert_eq!(document.substituted_chars, 0);
        let text = pdf_extract::extract_text_from_mem(&document.bytes).unwrap();

        assert!(text.contains("A & B <C>"), "extracted: {text:?}");
        let header_at = text.find("Jane Doe").unwrap();
        let body_at = text.find("Regards").unwrap();
        assert!(header_at < body_at);
    }

    #[test]
    fn test_unencodable_characters_are_counted() {
        let document = renderer()
            .render(&LayoutPlan::build("Łódź, Zoë Müller — Ďakujem", false, &[], 0))
            .unwrap();
        assert_eq!(document.substituted_chars, 3);

        let text = pdf_extract::extract_text_from_mem(&document.bytes).unwrap();
        assert!(text.contains("Zoë Müller"), "extracted: {text:?}");
    }

    #[test]
    fn test_accented_header_ends_flush_right() {
        let config = default_page_config();
        let pages = renderer().paginate(&plan(" Zoë Ærø\n\nBody", &["Zoë Ærø"], 2));
        let header = &pages[0][0];

        // Z .611 + o .556 + ë .556 + space .278 + Æ 1.000 + r .333 + ø .611
        let width_em = helvetica().measure_str("Zoë Ærø");
        assert!((width_em - 3.945).abs() < 1e-3, "width {width_em}");
        let end = header.x + width_em * config.font_size_pt;
        assert!((end - (config.page_width_pt - config.margin_right_pt)).abs() < 1e-2);
    }

    #[test]
    fn test_oversized_right_aligned_word_clamped_to_left_margin() {
        let config = default_page_config();
        let word = "W".repeat(80);
        let pages = renderer().paginate(&plan(&format!(" {word}\n\nBody"), &[word.as_str()], 2));
        assert_eq!(pages[0][0].x, config.margin_left_pt);
    }
}
