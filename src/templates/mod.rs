//! HTML templates and styling.
//!
//! ## Module Structure
//!
//! - `styles` - CSS constants and theme definitions
//! - `components` - Escaping and the base page template
//! - `answer` - Resolved answer body and numbered sources list
//! - `viewer` - Citation preview page

mod answer;
mod components;
mod styles;
mod viewer;

pub use answer::{render_answer, render_sources_list};
pub use components::{base_html, html_escape};
pub use styles::STYLE;
pub use viewer::{render_preview, PageOrigin};
