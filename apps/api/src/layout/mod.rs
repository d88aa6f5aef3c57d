// Layout policy shared by the export backends: one block-layout plan per
// letter, plus the font metrics the fixed-page backend positions text with.

pub mod font_metrics;
pub mod plan;

pub use font_metrics::{default_page_config, PageConfig};
pub use plan::LayoutPlan;
