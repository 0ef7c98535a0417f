//! Display categories and the classifier that fills them.
//!
//! A category is either a *filter* over whole sections or an ordered list of
//! *groups* that pull individual entries out of any section. Both shapes go
//! through [`classify`], which always reports the original section names so a
//! caller can explain an empty result.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{Entry, ParsedDocument, Section};
use crate::labels::{label_section, LabelTable, LabeledSection};

/// A named display category with its selection rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub id: String,
    pub label: String,
    /// Optional row layout hint: section names to show side by side.
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    #[serde(flatten)]
    pub definition: CategoryDefinition,
}

impl Category {
    /// Category used for an unknown id: every section, labeled with the id.
    pub fn fallback(id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: id.to_string(),
            rows: Vec::new(),
            definition: CategoryDefinition::Filter(SectionFilter::default()),
        }
    }
}

/// The two supported selection shapes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryDefinition {
    Filter(SectionFilter),
    Groups {
        #[serde(rename = "group")]
        groups: Vec<GroupSpec>,
    },
}

/// Selects whole sections by name or name keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SectionFilter {
    /// Section names accepted as-is (case-insensitive).
    #[serde(default)]
    pub sections: Vec<String>,
    /// Substrings of section names (case-insensitive).
    #[serde(default)]
    pub section_keywords: Vec<String>,
    /// When non-empty, keep only entries whose key, value or comment contains one.
    #[serde(default)]
    pub entry_keywords: Vec<String>,
}

impl SectionFilter {
    fn is_unconstrained(&self) -> bool {
        self.sections.is_empty() && self.section_keywords.is_empty()
    }

    fn matches_section(&self, name: &str) -> bool {
        if self.is_unconstrained() {
            return true;
        }
        let name = name.to_lowercase();
        self.sections
            .iter()
            .any(|allowed| allowed.to_lowercase() == name)
            || self
                .section_keywords
                .iter()
                .any(|keyword| name.contains(&keyword.to_lowercase()))
    }

    fn matches_entry(&self, entry: &Entry) -> bool {
        if self.entry_keywords.is_empty() {
            return true;
        }
        let haystacks = [
            entry.key.to_lowercase(),
            entry.value.to_lowercase(),
            entry.comment.to_lowercase(),
        ];
        self.entry_keywords.iter().any(|keyword| {
            let keyword = keyword.to_lowercase();
            haystacks.iter().any(|field| field.contains(&keyword))
        })
    }
}

/// What a group target is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOn {
    #[default]
    Label,
    Key,
}

/// One output group of a group-form category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GroupSpec {
    pub name: String,
    /// Labels or keys to collect, in display order.
    pub targets: Vec<String>,
    #[serde(default)]
    pub match_on: MatchOn,
    /// Restrict the scan to these sections (case-insensitive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_sections: Option<Vec<String>>,
}

/// Result of classifying one document under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub groups: Vec<LabeledSection>,
    /// Every section name of the source document, regardless of matches.
    pub available_section_names: Vec<String>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Ordered collection of categories loaded from the rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn ids(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn find(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Category for `id`, or [`Category::fallback`] when none is declared.
    pub fn get_or_fallback(&self, id: &str) -> Category {
        self.find(id)
            .cloned()
            .unwrap_or_else(|| Category::fallback(id))
    }
}

/// Select and regroup a document's entries for one category.
pub fn classify(
    document: &ParsedDocument,
    category: &Category,
    labels: &LabelTable,
) -> Classification {
    let available_section_names = document.section_names();
    let groups = match &category.definition {
        CategoryDefinition::Filter(filter) => filter_sections(&document.sections, filter, labels),
        CategoryDefinition::Groups { groups } => group_entries(&document.sections, groups, labels),
    };

    debug!(
        category = %category.id,
        groups = groups.len(),
        "classified setup document"
    );

    Classification {
        groups,
        available_section_names,
    }
}

fn filter_sections(
    sections: &[Section],
    filter: &SectionFilter,
    labels: &LabelTable,
) -> Vec<LabeledSection> {
    sections
        .iter()
        .filter(|section| filter.matches_section(&section.name))
        .map(|section| {
            let (entries, dropped): (Vec<&Entry>, Vec<&Entry>) = section
                .entries
                .iter()
                .partition(|entry| filter.matches_entry(entry));
            // Source lines of filtered-out entries go with them.
            let dropped: HashSet<&str> = dropped.iter().map(|entry| entry.raw.as_str()).collect();
            let narrowed = Section {
                name: section.name.clone(),
                entries: entries.into_iter().cloned().collect(),
                lines: section
                    .lines
                    .iter()
                    .filter(|line| !dropped.contains(line.as_str()))
                    .cloned()
                    .collect(),
            };
            label_section(&narrowed, labels)
        })
        .filter(|section| !section.is_empty())
        .collect()
}

fn group_entries(
    sections: &[Section],
    groups: &[GroupSpec],
    labels: &LabelTable,
) -> Vec<LabeledSection> {
    let labeled: Vec<LabeledSection> = sections
        .iter()
        .map(|section| label_section(section, labels))
        .collect();

    groups
        .iter()
        .map(|group| {
            let allowed: Option<HashSet<String>> = group
                .source_sections
                .as_ref()
                .map(|names| names.iter().map(|name| name.to_uppercase()).collect());

            let scanned: Vec<&LabeledSection> = labeled
                .iter()
                .filter(|section| match &allowed {
                    Some(allowed) => allowed.contains(&section.name.to_uppercase()),
                    None => true,
                })
                .collect();

            let mut entries = Vec::new();
            for target in &group.targets {
                for section in &scanned {
                    entries.extend(
                        section
                            .entries
                            .iter()
                            .filter(|entry| match group.match_on {
                                MatchOn::Label => &entry.label == target,
                                MatchOn::Key => entry.key() == target,
                            })
                            .cloned(),
                    );
                }
            }

            LabeledSection {
                name: group.name.clone(),
                entries,
                lines: Vec::new(),
            }
        })
        .filter(|group| !group.entries.is_empty())
        .collect()
}

/// Arrange sections into display rows following a layout hint.
///
/// Each hint row keeps the sections it names that are present, in hint order.
/// Sections no hint mentions follow, one per row, in their original order.
pub fn apply_row_layout(
    sections: &[LabeledSection],
    rows: &[Vec<String>],
) -> Vec<Vec<LabeledSection>> {
    let mut out = Vec::new();
    let mut mentioned: HashSet<String> = HashSet::new();

    for row in rows {
        let mut placed = Vec::new();
        for name in row {
            mentioned.insert(name.to_uppercase());
            if let Some(section) = sections
                .iter()
                .find(|section| section.name.eq_ignore_ascii_case(name))
            {
                placed.push(section.clone());
            }
        }
        if !placed.is_empty() {
            out.push(placed);
        }
    }

    for section in sections {
        if !mentioned.contains(&section.name.to_uppercase()) {
            out.push(vec![section.clone()]);
        }
    }

    out
}
