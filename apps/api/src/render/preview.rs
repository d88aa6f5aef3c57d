//! HTML preview of a layout plan for the edit surface.

use std::fmt::Write;

use crate::layout::plan::{Alignment, LayoutPlan, UnitRole};

const FRAME_STYLE: &str = "font-family: 'Courier New', monospace; white-space: pre-wrap; \
                           border: 1px solid #ddd; padding: 1rem; background: #f8f9fb;";
const STACK_STYLE: &str = "display: flex; flex-direction: column; gap: 1rem;";

/// Renders the plan as nested `div`s: one per header/body unit, lines joined
/// by `<br>`. Spacer units are left to the stack gap.
pub fn render_preview_html(plan: &LayoutPlan) -> String {
    let mut html = format!("<div style=\"{FRAME_STYLE}\"><div style=\"{STACK_STYLE}\">");

    for unit in plan.units.iter().filter(|u| u.role != UnitRole::Spacer) {
        let align = match unit.alignment {
            Alignment::Left => "left",
            Alignment::Right => "right",
        };
        let lines: Vec<String> = unit
            .lines
            .iter()
            .map(|line| html_escape::encode_text(line).into_owned())
            .collect();
        // Writing to a String cannot fail.
        let _ = write!(
            html,
            "<div style=\"text-align: {align};\">{}</div>",
            lines.join("<br>")
        );
    }

    html.push_str("</div></div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_escapes_and_aligns() {
        let header = vec!["Jane <Doe>".to_string()];
        let plan = LayoutPlan::build(" Jane <Doe>\n\nA & B\nline 2\n\nBye", true, &header, 2);
        let html = render_preview_html(&plan);

        assert!(html.contains("<div style=\"text-align: right;\">Jane &lt;Doe&gt;</div>"));
        assert!(html.contains("<div style=\"text-align: left;\">A &amp; B<br>line 2</div>"));
        assert_eq!(html.matches("text-align:").count(), 3, "spacers are not rendered");
    }

    #[test]
    fn test_preview_of_empty_plan_is_empty_frame() {
        let html = render_preview_html(&LayoutPlan::default());
        assert!(html.starts_with("<div"));
        assert!(!html.contains("text-align"));
    }
}
