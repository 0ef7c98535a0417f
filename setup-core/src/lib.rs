//! Setup engine for Le Mans Ultimate `.svm` car setup files.
//!
//! Parses setup text into sections and entries, applies display labels,
//! groups entries into display categories, compares two setups field by field,
//! resolves technical car names to display identities and builds the ordered
//! setup listing used by selection menus. Everything here is pure: reference
//! tables come in as TOML text and no function touches the filesystem.

pub mod category;
pub mod compare;
pub mod document;
pub mod format;
pub mod identity;
pub mod labels;
pub mod listing;
pub mod parser;
pub mod tables;

pub use category::{
    apply_row_layout, classify, Category, CategoryDefinition, CategoryTable, Classification,
    GroupSpec, MatchOn, SectionFilter,
};
pub use compare::{
    comparable_value, comparison_rows, compound_color, count, diff, diff_key, diff_sections,
    display_value, ComparisonGroup, ComparisonRow, CompoundColor, DiffMap,
};
pub use document::{Entry, Metadata, ParsedDocument, Section};
pub use format::{format_comparison, format_groups, format_listing, format_summary};
pub use identity::{CarIdentity, CarTable, IdentityResolver};
pub use labels::{label_section, LabelMapping, LabelResolution, LabelTable, LabeledEntry, LabeledSection};
pub use listing::{
    build_listing, setup_key, split_setup_key, ListingItem, ListingOptions, SetupIndex,
    SetupRecord, TrackDirectory, TrackInfo, TrackListing, DEFAULT_CLASS_ORDER,
};
pub use parser::{parse, parse_bytes};
pub use tables::{
    parse_cars, parse_categories, parse_labels, parse_tracks, ReferenceTables, TableKind,
    TableLoadError,
};
