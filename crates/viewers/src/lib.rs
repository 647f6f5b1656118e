//! Views for Sabot's data tab
//!
//! This crate draws datasets:
//! - Table (striped grid of filtered rows)
//! - Chart (line / bar / scatter over two columns)

pub mod chart_view;
pub mod table_view;

pub use chart_view::{chart_ui, parse_hex_color};
pub use table_view::table_ui;
