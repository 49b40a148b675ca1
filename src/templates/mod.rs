//! HTML templates and styling for the companion pages.
//!
//! - `styles` - CSS constants, light and dark palettes
//! - `components` - nav bar, notices, base template, escaping and markdown
//! - `panel` - summary panel and notes widget

mod components;
mod panel;
mod styles;

pub use components::{base_html, html_escape, nav_bar, render_markdown, render_notice, render_notices};
pub use panel::{panel_column, render_notes_widget, render_panel, render_summary_view, Column};
pub use styles::STYLE;
