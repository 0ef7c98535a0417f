//! Setup comparison: normalised values, difference maps and aligned rows.

pub mod engine;
pub mod result;
pub mod values;

pub use engine::{comparison_rows, count, diff, diff_sections};
pub use result::{diff_key, ComparisonGroup, ComparisonRow, DiffMap};
pub use values::{comparable_value, compound_color, display_value, CompoundColor};
