use std::collections::BTreeMap;

use serde::Serialize;

use crate::compare::values::CompoundColor;

/// Separator between section and entry key in a [`DiffMap`] key.
pub const DIFF_KEY_SEPARATOR: &str = "::";

/// Build the `"Section::Key"` identifier used by [`DiffMap`].
pub fn diff_key(section: &str, key: &str) -> String {
    format!("{section}{DIFF_KEY_SEPARATOR}{key}")
}

/// Per-field difference flags between two setups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiffMap {
    entries: BTreeMap<String, bool>,
}

impl DiffMap {
    pub(crate) fn insert(&mut self, key: String, differs: bool) {
        self.entries.insert(key, differs);
    }

    /// Flag for a `"Section::Key"` identifier, if the key was compared.
    pub fn get(&self, key: &str) -> Option<bool> {
        self.entries.get(key).copied()
    }

    /// True when the entry was compared and differs.
    pub fn differs(&self, section: &str, key: &str) -> bool {
        self.get(&diff_key(section, key)).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(key, flag)| (key.as_str(), *flag))
    }

    /// Identifiers flagged as differing, in key order.
    pub fn changed_keys(&self) -> Vec<&str> {
        self.iter()
            .filter_map(|(key, differs)| differs.then_some(key))
            .collect()
    }
}

/// One compared field, aligned across both setups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub key: String,
    pub label: String,
    /// Display value on the primary side; `None` when the field is missing there.
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub differs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compound_color: Option<CompoundColor>,
}

/// Rows of one display group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonGroup {
    pub name: String,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonGroup {
    pub fn changed(&self) -> usize {
        self.rows.iter().filter(|row| row.differs).count()
    }
}
