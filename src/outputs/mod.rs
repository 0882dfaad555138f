//! Output generation for the news section of the briefing.
//!
//! # Submodules
//!
//! - [`json`]: Writes the full [`Briefing`] to JSON for downstream renderers
//! - [`markdown`]: Renders a human-readable digest with per-category counts
//!   and sample headlines
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── news.json
//!
//! markdown_output_dir/
//! └── 2025-05-06.md
//! ```
//!
//! [`Briefing`]: crate::models::Briefing

pub mod json;
pub mod markdown;
