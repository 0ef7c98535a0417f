use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::category::{classify, Category, Classification};
use crate::compare::result::{diff_key, ComparisonGroup, ComparisonRow, DiffMap};
use crate::compare::values::{comparable_value, compound_color, display_value};
use crate::document::ParsedDocument;
use crate::labels::{LabelTable, LabeledEntry, LabeledSection};

/// Diff two setups under one display category.
pub fn diff(
    category: &Category,
    primary: &ParsedDocument,
    secondary: &ParsedDocument,
    labels: &LabelTable,
) -> DiffMap {
    let left = classify(primary, category, labels);
    let right = classify(secondary, category, labels);
    let map = diff_sections(&left.groups, &right.groups);
    debug!(
        category = %category.id,
        compared = map.len(),
        changed = count(&map),
        "compared setups"
    );
    map
}

/// Diff already-classified sections.
///
/// A key present on one side only compares against an empty value.
pub fn diff_sections(primary: &[LabeledSection], secondary: &[LabeledSection]) -> DiffMap {
    let left = comparable_map(primary);
    let right = comparable_map(secondary);

    let keys: BTreeSet<&String> = left.keys().chain(right.keys()).collect();
    let mut map = DiffMap::default();
    for key in keys {
        let left_value = left.get(key).map(String::as_str).unwrap_or("");
        let right_value = right.get(key).map(String::as_str).unwrap_or("");
        map.insert(key.clone(), left_value != right_value);
    }
    map
}

/// Number of differing fields.
pub fn count(map: &DiffMap) -> usize {
    map.iter().filter(|(_, differs)| *differs).count()
}

fn comparable_map(sections: &[LabeledSection]) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for section in sections {
        for entry in &section.entries {
            values.insert(
                diff_key(&section.name, entry.key()),
                comparable_value(&entry.entry),
            );
        }
    }
    values
}

/// Align two classifications row by row for side-by-side display.
///
/// Groups and rows follow the primary side; anything only the secondary side
/// has is appended after it.
pub fn comparison_rows(
    primary: &Classification,
    secondary: &Classification,
    map: &DiffMap,
) -> Vec<ComparisonGroup> {
    let mut names: Vec<&str> = Vec::new();
    for group in primary.groups.iter().chain(&secondary.groups) {
        if !names.contains(&group.name.as_str()) {
            names.push(&group.name);
        }
    }

    names
        .into_iter()
        .map(|name| {
            let left = find_group(primary, name);
            let right = find_group(secondary, name);

            let mut keys: Vec<&str> = Vec::new();
            for entry in left.into_iter().chain(right).flat_map(|g| g.entries.iter()) {
                if !keys.contains(&entry.key()) {
                    keys.push(entry.key());
                }
            }

            let rows = keys
                .into_iter()
                .map(|key| {
                    let left_entry = left.and_then(|g| find_entry(g, key));
                    let right_entry = right.and_then(|g| find_entry(g, key));
                    build_row(name, key, left_entry, right_entry, map)
                })
                .collect();

            ComparisonGroup {
                name: name.to_string(),
                rows,
            }
        })
        .collect()
}

fn build_row(
    group: &str,
    key: &str,
    left: Option<&LabeledEntry>,
    right: Option<&LabeledEntry>,
    map: &DiffMap,
) -> ComparisonRow {
    let label = left
        .or(right)
        .map(|entry| entry.label.clone())
        .unwrap_or_else(|| key.to_string());
    let primary = left.map(|entry| display_value(&entry.entry));
    let secondary = right.map(|entry| display_value(&entry.entry));
    let color = left
        .zip(primary.as_deref())
        .and_then(|(entry, value)| compound_color(&entry.entry, value));

    ComparisonRow {
        key: key.to_string(),
        label,
        primary,
        secondary,
        differs: map.differs(group, key),
        compound_color: color,
    }
}

fn find_group<'a>(classification: &'a Classification, name: &str) -> Option<&'a LabeledSection> {
    classification.groups.iter().find(|group| group.name == name)
}

// Last match, so a key collected from several sections shows the value that was compared.
fn find_entry<'a>(group: &'a LabeledSection, key: &str) -> Option<&'a LabeledEntry> {
    group.entries.iter().rev().find(|entry| entry.key() == key)
}
