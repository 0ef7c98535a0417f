use std::fs;
use std::path::PathBuf;

use setup_core::labels::extract_line_key;
use setup_core::{
    apply_row_layout, classify, parse, CategoryDefinition, ParsedDocument, ReferenceTables,
};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn load(path: &str) -> ParsedDocument {
    let raw = fs::read_to_string(fixture(path)).expect("fixture should be readable");
    parse(&raw)
}

fn tables() -> ReferenceTables {
    ReferenceTables::embedded().expect("embedded tables should load")
}

#[test]
fn suppressed_settings_never_reach_any_category() {
    let tables = tables();
    for path in ["fixtures/hy_toyota_race.svm", "fixtures/lmgt3_bmw_race.svm"] {
        let doc = load(path);
        for category in tables.categories.categories() {
            let result = classify(&doc, category, &tables.labels);
            for group in &result.groups {
                // Group-form names are not section names, so check against every
                // source section the entry could have come from.
                for entry in &group.entries {
                    let hidden = doc.sections.iter().any(|section| {
                        section.entry(entry.key()) == Some(&entry.entry)
                            && tables.labels.is_suppressed(entry.key(), &section.name)
                    });
                    assert!(!hidden, "{path}/{}: {} leaked", category.id, entry.key());
                }
                for line in &group.lines {
                    if let Some(key) = extract_line_key(line) {
                        assert!(
                            !tables.labels.is_suppressed(key, &group.name),
                            "{path}/{}: line {line:?} leaked",
                            category.id
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn chassis_and_aero_selects_whole_sections() {
    let tables = tables();
    let doc = load("fixtures/hy_toyota_race.svm");
    let category = tables
        .categories
        .find("chassis_and_aero")
        .expect("chassis category");
    assert!(matches!(category.definition, CategoryDefinition::Filter(_)));

    let result = classify(&doc, category, &tables.labels);
    let names: Vec<&str> = result.groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["HEADER", "GENERAL", "LEFTFENDER", "RIGHTFENDER", "FRONTWING", "REARWING", "BODYAERO"]
    );

    let header = &result.groups[0];
    assert_eq!(header.entries[0].label, "Car Name");
    assert_eq!(header.extra_lines().collect::<Vec<_>>(), vec!["//VEH=Toyota_GR010_7.veh"]);

    let general = &result.groups[1];
    let labels: Vec<&str> = general.entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["Notes", "Symmetric", "Fuel Ratio", "Virtual Energy"]);
    assert_eq!(general.extra_lines().collect::<Vec<_>>(), vec!["//FuelSetting=91//N/A"]);
    assert!(general.lines.contains(&general.entries[0].entry.raw));

    let rows = apply_row_layout(&result.groups, &category.rows);
    let row_names: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| row.iter().map(|s| s.name.as_str()).collect())
        .collect();
    assert_eq!(
        row_names,
        vec![
            vec!["HEADER", "GENERAL"],
            vec!["FRONTWING", "REARWING"],
            vec!["LEFTFENDER", "RIGHTFENDER"],
            vec!["BODYAERO"],
        ]
    );
}

#[test]
fn powertrain_groups_follow_target_order() {
    let tables = tables();
    let doc = load("fixtures/hy_toyota_race.svm");
    let category = tables.categories.find("powertrain").expect("powertrain");

    let result = classify(&doc, category, &tables.labels);
    let names: Vec<&str> = result.groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Engine", "Fuel", "Gearbox", "Differential", "Electronics"]);

    let engine: Vec<&str> = result.groups[0]
        .entries
        .iter()
        .map(|e| e.label.as_str())
        .collect();
    assert_eq!(
        engine,
        vec!["Rev Limit", "Engine Mixture", "Regen Level", "Electric Motor Map", "Engine Braking"]
    );
    assert!(result.groups.iter().all(|g| g.lines.is_empty()));
}

#[test]
fn corner_groups_only_read_their_own_section() {
    let tables = tables();
    let doc = load("fixtures/lmgt3_bmw_race.svm");
    let category = tables.categories.find("suspension").expect("suspension");

    let result = classify(&doc, category, &tables.labels);
    let front_left = result
        .groups
        .iter()
        .find(|g| g.name == "Front Left")
        .expect("front left group");
    let values: Vec<(&str, &str)> = front_left
        .entries
        .iter()
        .map(|e| (e.label.as_str(), e.entry.comment.as_str()))
        .collect();
    assert_eq!(
        values,
        vec![("Ride Height", "5.2 cm"), ("Spring", "Stiff"), ("Camber", "-3.5 deg")]
    );
}

#[test]
fn missing_sections_are_reported_for_empty_results() {
    let tables = tables();
    let doc = parse("[BASIC]\nDownforce=0.5\n");
    let category = tables.categories.find("dampers").expect("dampers");

    let result = classify(&doc, category, &tables.labels);
    assert!(result.is_empty());
    assert_eq!(result.available_section_names, vec!["BASIC".to_string()]);
}

#[test]
fn unknown_category_shows_every_visible_section() {
    let tables = tables();
    let doc = load("fixtures/lmgt3_bmw_race.svm");
    let category = tables.categories.get_or_fallback("everything");

    let result = classify(&doc, &category, &tables.labels);
    assert_eq!(result.groups.len(), doc.sections.len());
}
