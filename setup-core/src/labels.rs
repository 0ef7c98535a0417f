//! Human-readable labels for setup entries.
//!
//! A [`LabelTable`] maps either a bare entry key (`FuelCapacitySetting`) or a
//! section-qualified key (`GENERAL.FuelCapacitySetting`) to a display label, or
//! to the `REMOVE` sentinel which hides the entry altogether. Qualified keys win
//! over bare keys; keys missing from the table display as themselves.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document::{Entry, Section};
use crate::parser::COMMENT_MARKER;

/// Table value that hides an entry instead of renaming it.
pub const SUPPRESS_SENTINEL: &str = "REMOVE";

/// What a label table says about one key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum LabelMapping {
    Display(String),
    Suppress,
}

impl From<String> for LabelMapping {
    fn from(value: String) -> Self {
        if value == SUPPRESS_SENTINEL {
            LabelMapping::Suppress
        } else {
            LabelMapping::Display(value)
        }
    }
}

impl From<LabelMapping> for String {
    fn from(value: LabelMapping) -> Self {
        match value {
            LabelMapping::Display(label) => label,
            LabelMapping::Suppress => SUPPRESS_SENTINEL.to_string(),
        }
    }
}

/// Outcome of looking a key up in a [`LabelTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelResolution<'a> {
    Label(&'a str),
    Suppressed,
}

/// Label overrides keyed by `KEY` or `SECTION.KEY`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    mappings: HashMap<String, LabelMapping>,
}

impl LabelTable {
    pub fn new(mappings: HashMap<String, LabelMapping>) -> Self {
        Self { mappings }
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Raw mapping for an exact table key.
    pub fn get(&self, table_key: &str) -> Option<&LabelMapping> {
        self.mappings.get(table_key)
    }

    /// Resolve the display label for `key` inside `section`.
    ///
    /// The section name is matched exactly as stored in the table.
    pub fn resolve<'a>(&'a self, key: &'a str, section: &str) -> LabelResolution<'a> {
        let qualified = format!("{section}.{key}");
        let mapping = self
            .mappings
            .get(&qualified)
            .or_else(|| self.mappings.get(key));

        match mapping {
            Some(LabelMapping::Display(label)) => LabelResolution::Label(label),
            Some(LabelMapping::Suppress) => LabelResolution::Suppressed,
            None => LabelResolution::Label(key),
        }
    }

    /// True when `key` is hidden in `section`.
    pub fn is_suppressed(&self, key: &str, section: &str) -> bool {
        self.resolve(key, section) == LabelResolution::Suppressed
    }
}

/// An entry paired with its resolved display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledEntry {
    #[serde(flatten)]
    pub entry: Entry,
    pub label: String,
}

impl LabeledEntry {
    pub fn key(&self) -> &str {
        &self.entry.key
    }
}

/// A section after labels have been applied and hidden settings removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledSection {
    pub name: String,
    pub entries: Vec<LabeledEntry>,
    pub lines: Vec<String>,
}

impl LabeledSection {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.lines.is_empty()
    }

    /// Verbatim lines that are not the source line of a kept entry.
    pub fn extra_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|line| !self.entries.iter().any(|entry| entry.entry.raw == *line))
    }
}

/// Apply labels to a section.
///
/// Suppressed entries are dropped, and so is any verbatim line (commented out
/// or not) whose leading key is suppressed. When several entries share a key,
/// the last one wins and takes the position of the first.
pub fn label_section(section: &Section, labels: &LabelTable) -> LabeledSection {
    let mut entries: Vec<LabeledEntry> = Vec::with_capacity(section.entries.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for entry in &section.entries {
        let label = match labels.resolve(&entry.key, &section.name) {
            LabelResolution::Label(label) => label.to_string(),
            LabelResolution::Suppressed => continue,
        };
        let labeled = LabeledEntry {
            entry: entry.clone(),
            label,
        };

        match positions.get(entry.key.as_str()) {
            Some(&index) => entries[index] = labeled,
            None => {
                positions.insert(entry.key.as_str(), entries.len());
                entries.push(labeled);
            }
        }
    }

    let lines = section
        .lines
        .iter()
        .filter(|line| match extract_line_key(line) {
            Some(key) => !labels.is_suppressed(key, &section.name),
            None => true,
        })
        .cloned()
        .collect();

    LabeledSection {
        name: section.name.clone(),
        entries,
        lines,
    }
}

/// Pull the setting key out of a verbatim line such as `//FuelSetting=3`.
///
/// The key ends at the earlier of `=` or `:`. Returns `None` when the line has
/// no separator or the key would be empty.
pub fn extract_line_key(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let body = trimmed
        .strip_prefix(COMMENT_MARKER)
        .map(str::trim)
        .unwrap_or(trimmed);

    let split_at = body.find(['=', ':'].as_slice())?;
    let key = body[..split_at].trim();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::{
        extract_line_key, label_section, LabelMapping, LabelResolution, LabelTable,
    };
    use crate::document::{Entry, Section};

    fn table(pairs: &[(&str, &str)]) -> LabelTable {
        let mappings: HashMap<String, LabelMapping> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), LabelMapping::from(v.to_string())))
            .collect();
        LabelTable::new(mappings)
    }

    #[test]
    fn qualified_key_beats_bare_key() {
        let labels = table(&[
            ("CamberSetting", "Camber"),
            ("FRONTLEFT.CamberSetting", "FL Camber"),
        ]);

        assert_eq!(
            labels.resolve("CamberSetting", "FRONTLEFT"),
            LabelResolution::Label("FL Camber")
        );
        assert_eq!(
            labels.resolve("CamberSetting", "REARLEFT"),
            LabelResolution::Label("Camber")
        );
        assert_eq!(
            labels.resolve("UnknownSetting", "GENERAL"),
            LabelResolution::Label("UnknownSetting")
        );
    }

    #[test]
    fn qualified_lookup_is_case_sensitive_on_section() {
        let labels = table(&[("HEADER.Note", "REMOVE")]);
        assert!(labels.is_suppressed("Note", "HEADER"));
        assert!(!labels.is_suppressed("Note", "header"));
    }

    #[test]
    fn suppressed_entries_and_lines_are_removed() {
        let labels = table(&[("HEADER.Note", "REMOVE"), ("UpgradeSetting", "REMOVE")]);
        let mut header = Section::new("HEADER");
        let note = Entry::new("Note", "remove-me");
        let vehicle = Entry::new("VehicleClassSetting", "\"Toyota_GR010\"");
        header.lines.push(note.raw.clone());
        header.lines.push(vehicle.raw.clone());
        header.lines.push("//Note=0".to_string());
        header.lines.push("  // UpgradeSetting: (2,0,0,0)".to_string());
        header.lines.push("Freeform line".to_string());
        header.entries.push(note);
        header.entries.push(vehicle);

        let labeled = label_section(&header, &labels);
        let keys: Vec<&str> = labeled.entries.iter().map(|e| e.key()).collect();

        assert_eq!(keys, vec!["VehicleClassSetting"]);
        assert_eq!(
            labeled.lines,
            vec![
                "VehicleClassSetting=\"Toyota_GR010\"".to_string(),
                "Freeform line".to_string(),
            ]
        );
        assert_eq!(labeled.extra_lines().collect::<Vec<_>>(), vec!["Freeform line"]);
    }

    #[test]
    fn duplicate_keys_keep_last_value_at_first_position() {
        let labels = LabelTable::default();
        let mut section = Section::new("GENERAL");
        section.entries.push(Entry::new("A", "first"));
        section.entries.push(Entry::new("B", "only"));
        section.entries.push(Entry::new("A", "second"));

        let labeled = label_section(&section, &labels);
        let pairs: Vec<(&str, &str)> = labeled
            .entries
            .iter()
            .map(|e| (e.key(), e.entry.value.as_str()))
            .collect();

        assert_eq!(pairs, vec![("A", "second"), ("B", "only")]);
    }

    #[test]
    fn line_key_uses_earliest_separator() {
        assert_eq!(extract_line_key("//FuelSetting=3"), Some("FuelSetting"));
        assert_eq!(extract_line_key("  // Note: a=b"), Some("Note"));
        assert_eq!(extract_line_key("Key = x: y"), Some("Key"));
        assert_eq!(extract_line_key("no separator here"), None);
        assert_eq!(extract_line_key("//=value"), None);
        assert_eq!(extract_line_key(""), None);
    }

    #[test]
    fn sentinel_round_trips_through_string() {
        assert_eq!(LabelMapping::from("REMOVE".to_string()), LabelMapping::Suppress);
        assert_eq!(String::from(LabelMapping::Suppress), "REMOVE");
    }
}
