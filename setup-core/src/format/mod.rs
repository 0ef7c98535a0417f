//! Plain-text formatters for engine results.

pub mod text;

pub use text::{format_comparison, format_groups, format_listing, format_summary};
