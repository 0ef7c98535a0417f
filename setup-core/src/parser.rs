use tracing::debug;

use crate::document::{Entry, Metadata, ParsedDocument, Section};

/// Name given to content that appears before the first `[Header]`.
pub const DEFAULT_SECTION_NAME: &str = "HEADER";
/// Name given to a `[]` or `[   ]` header.
pub const UNNAMED_SECTION_NAME: &str = "Unnamed";
/// Section that carries file-level metadata.
pub const HEADER_SECTION_NAME: &str = "HEADER";
/// Entry inside [`HEADER_SECTION_NAME`] holding the technical car name.
pub const VEHICLE_CLASS_KEY: &str = "VehicleClassSetting";
/// Marker that starts a comment line or an inline annotation.
pub const COMMENT_MARKER: &str = "//";

/// Parse setup file bytes.
///
/// Returns `None` when the input is not valid UTF-8 text. Any text input parses.
pub fn parse_bytes(raw: &[u8]) -> Option<ParsedDocument> {
    match std::str::from_utf8(raw) {
        Ok(text) => Some(parse(text)),
        Err(err) => {
            debug!(error = %err, "setup bytes are not utf-8 text");
            None
        }
    }
}

/// Parse setup file text into sections, entries and metadata.
///
/// Parsing never fails. Every non-blank, non-header line is kept verbatim in
/// its section's `lines`; those that read as `key=value` also become entries.
pub fn parse(raw: &str) -> ParsedDocument {
    let mut sections: Vec<Section> = Vec::new();
    let mut current = Section::new(DEFAULT_SECTION_NAME);

    for line in raw.split(&['\n', '\r'][..]) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(name) = header_name(trimmed) {
            let finished = std::mem::replace(&mut current, Section::new(name));
            if !finished.is_empty() {
                sections.push(finished);
            }
            continue;
        }

        current.lines.push(line.to_string());
        if let Some(entry) = classify_line(line, trimmed) {
            current.entries.push(entry);
        }
    }

    if !current.is_empty() || sections.is_empty() {
        sections.push(current);
    }

    let metadata = extract_metadata(&sections);
    debug!(
        sections = sections.len(),
        vehicle_class = metadata.vehicle_class.as_deref().unwrap_or(""),
        "parsed setup document"
    );

    ParsedDocument {
        raw: raw.to_string(),
        sections,
        metadata,
    }
}

fn header_name(trimmed: &str) -> Option<String> {
    let inner = trimmed.strip_prefix('[')?.strip_suffix(']')?;
    let name = inner.trim();
    if name.is_empty() {
        Some(UNNAMED_SECTION_NAME.to_string())
    } else {
        Some(name.to_string())
    }
}

fn classify_line(line: &str, trimmed: &str) -> Option<Entry> {
    if trimmed.starts_with(COMMENT_MARKER) {
        return None;
    }

    let (left, right) = line.split_once('=')?;
    let key = left.trim();
    if key.is_empty() {
        return None;
    }

    let (value, comment) = match right.split_once(COMMENT_MARKER) {
        Some((value, comment)) => (value.trim(), comment.trim()),
        None => (right.trim(), ""),
    };

    Some(Entry {
        key: key.to_string(),
        value: value.to_string(),
        comment: comment.to_string(),
        raw: line.to_string(),
    })
}

fn extract_metadata(sections: &[Section]) -> Metadata {
    let vehicle_class = sections
        .iter()
        .find(|section| section.is_named(HEADER_SECTION_NAME))
        .and_then(|header| header.entry(VEHICLE_CLASS_KEY))
        .map(|entry| unquote(&entry.value))
        .filter(|value| !value.is_empty());

    Metadata { vehicle_class }
}

fn unquote(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{parse, parse_bytes, DEFAULT_SECTION_NAME, UNNAMED_SECTION_NAME};
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_value_and_inline_annotation() {
        let doc = parse("[GENERAL]\nFuelCapacitySetting=0 // 16.0L (4.5 laps)\n");
        let general = doc.section("GENERAL").expect("general section");
        let entry = general.entry("FuelCapacitySetting").expect("fuel entry");

        assert_eq!(entry.value, "0");
        assert_eq!(entry.comment, "16.0L (4.5 laps)");
        assert_eq!(entry.raw, "FuelCapacitySetting=0 // 16.0L (4.5 laps)");
    }

    #[test]
    fn leading_content_lands_in_default_section() {
        let doc = parse("Orphan=1\n[ENGINE]\nRevLimitSetting=0\n");
        assert_eq!(doc.sections[0].name, DEFAULT_SECTION_NAME);
        assert_eq!(doc.sections[0].entries[0].key, "Orphan");
        assert_eq!(doc.sections[1].name, "ENGINE");
    }

    #[test]
    fn empty_header_is_named_unnamed() {
        let doc = parse("[   ]\nA=1\n");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].name, UNNAMED_SECTION_NAME);
    }

    #[test]
    fn empty_sections_are_skipped() {
        let doc = parse("[FIRST]\n\n[SECOND]\nKey=1\n");
        assert_eq!(doc.section_names(), vec!["SECOND".to_string()]);
    }

    #[test]
    fn empty_input_yields_one_empty_default_section() {
        let doc = parse("");
        assert_eq!(doc.sections.len(), 1);
        assert!(doc.sections[0].is_empty());
        assert_eq!(doc.metadata.vehicle_class, None);
    }

    #[test]
    fn non_entry_lines_are_kept_verbatim() {
        let doc = parse("[HEADER]\n// Note: defaults commented out\nmalformed line\n=orphan value\n");
        let header = doc.section("HEADER").expect("header");

        assert!(header.entries.is_empty());
        assert_eq!(
            header.lines,
            vec![
                "// Note: defaults commented out".to_string(),
                "malformed line".to_string(),
                "=orphan value".to_string(),
            ]
        );
    }

    #[test]
    fn entry_lines_are_also_kept_verbatim() {
        let doc = parse("[GENERAL]\nA=1\n// c\n");
        let general = doc.section("GENERAL").expect("general");

        assert_eq!(general.entries.len(), 1);
        assert_eq!(general.lines, vec!["A=1".to_string(), "// c".to_string()]);
    }

    #[test]
    fn commented_out_setting_is_not_an_entry() {
        let doc = parse("[GENERAL]\n//FuelSetting=3 // 4L\n");
        let general = doc.section("GENERAL").expect("general");
        assert!(general.entries.is_empty());
        assert_eq!(general.lines, vec!["//FuelSetting=3 // 4L".to_string()]);
    }

    #[test]
    fn accepts_crlf_and_lone_cr() {
        let doc = parse("[GENERAL]\r\nA=1\rB=2\r\n");
        let general = doc.section("GENERAL").expect("general");
        let keys: Vec<&str> = general.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(general.entries[0].raw, "A=1");
    }

    #[test]
    fn extracts_unquoted_vehicle_class() {
        let doc = parse("[header]\nVehicleClassSetting=\"GT3 BMW_M4_LMGT3 WEC2025\"\n");
        assert_eq!(
            doc.metadata.vehicle_class.as_deref(),
            Some("GT3 BMW_M4_LMGT3 WEC2025")
        );
    }

    #[test]
    fn invalid_utf8_yields_no_document() {
        assert!(parse_bytes(&[0x5b, 0xff, 0xfe, 0x5d]).is_none());
        assert!(parse_bytes(b"[GENERAL]\nA=1\n").is_some());
    }
}
