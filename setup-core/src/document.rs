use serde::Serialize;

/// One `key=value` line of a setup file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Trimmed left-hand side. Never empty.
    pub key: String,
    /// Trimmed right-hand side, without the inline annotation.
    pub value: String,
    /// Trimmed inline annotation after `//`, or an empty string.
    pub comment: String,
    /// The source line exactly as read.
    pub raw: String,
}

impl Entry {
    /// Build an entry with no inline annotation.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        let raw = format!("{key}={value}");
        Self {
            key,
            value,
            comment: String::new(),
            raw,
        }
    }

    /// Attach an inline annotation, rebuilding `raw` to match.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self.raw = format!("{}={} // {}", self.key, self.value, self.comment);
        self
    }
}

/// A bracketed block of a setup file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Header name, trimmed.
    pub name: String,
    /// Parsed `key=value` lines in source order.
    pub entries: Vec<Entry>,
    /// Every non-blank source line of the block, entries included.
    pub lines: Vec<String>,
}

impl Section {
    /// Create an empty section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// True when the section holds neither entries nor lines.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.lines.is_empty()
    }

    /// Return the first entry with the provided key.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Compare the section name against `name`, ignoring ASCII case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Values pulled out of well-known entries while parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Technical car identifier from `HEADER.VehicleClassSetting`, unquoted.
    pub vehicle_class: Option<String>,
}

/// A fully parsed setup file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    /// Original file text.
    #[serde(skip_serializing)]
    pub raw: String,
    /// Sections in source order.
    pub sections: Vec<Section>,
    pub metadata: Metadata,
}

impl ParsedDocument {
    /// Return the first section whose name matches `name` case-insensitively.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.is_named(name))
    }

    /// Names of every section, in source order.
    pub fn section_names(&self) -> Vec<String> {
        self.sections
            .iter()
            .map(|section| section.name.clone())
            .collect()
    }

    /// Total number of parsed entries across all sections.
    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|section| section.entries.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{Entry, ParsedDocument, Section};

    #[test]
    fn section_lookup_ignores_case() {
        let mut general = Section::new("GENERAL");
        general.entries.push(Entry::new("Symmetric", "1"));
        let doc = ParsedDocument {
            raw: String::new(),
            sections: vec![general],
            metadata: Default::default(),
        };

        let found = doc.section("general").expect("section should match");
        assert_eq!(found.entry("Symmetric").map(|e| e.value.as_str()), Some("1"));
        assert!(doc.section("ENGINE").is_none());
    }

    #[test]
    fn with_comment_rebuilds_raw_line() {
        let entry = Entry::new("FuelCapacitySetting", "0").with_comment("16.0L (4.5 laps)");
        assert_eq!(entry.raw, "FuelCapacitySetting=0 // 16.0L (4.5 laps)");
    }
}
