//! Reference tables: tracks, cars, labels and display categories.
//!
//! Each table is parsed from TOML text. Embedded copies ship with the crate so
//! the engine works without any files; callers that want overrides read the
//! text themselves and hand it to the matching `parse_*` function.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::category::{Category, CategoryDefinition, CategoryTable};
use crate::identity::{CarIdentity, CarTable};
use crate::labels::{LabelMapping, LabelTable};
use crate::listing::{TrackDirectory, TrackInfo};

const EMBEDDED_TRACKS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tables/tracks.toml"));
const EMBEDDED_CARS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tables/cars.toml"));
const EMBEDDED_LABELS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tables/labels.toml"));
const EMBEDDED_CATEGORIES: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tables/categories.toml"
));

/// Errors returned when a reference table cannot be built.
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("failed to parse {source_name}: {source}")]
    Parse {
        source_name: String,
        source: toml::de::Error,
    },
    #[error("invalid {source_name}: {reason}")]
    Invalid { source_name: String, reason: String },
}

/// Which of the four tables a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Tracks,
    Cars,
    Labels,
    Categories,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::Tracks,
        TableKind::Cars,
        TableKind::Labels,
        TableKind::Categories,
    ];

    /// Conventional file name inside a tables directory.
    pub fn file_name(self) -> &'static str {
        match self {
            TableKind::Tracks => "tracks.toml",
            TableKind::Cars => "cars.toml",
            TableKind::Labels => "labels.toml",
            TableKind::Categories => "categories.toml",
        }
    }

    pub fn embedded_text(self) -> &'static str {
        match self {
            TableKind::Tracks => EMBEDDED_TRACKS,
            TableKind::Cars => EMBEDDED_CARS,
            TableKind::Labels => EMBEDDED_LABELS,
            TableKind::Categories => EMBEDDED_CATEGORIES,
        }
    }
}

/// All reference data the engine needs, loaded once and passed around.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTables {
    pub tracks: TrackDirectory,
    pub cars: CarTable,
    pub labels: LabelTable,
    pub categories: CategoryTable,
}

impl ReferenceTables {
    /// Tables compiled into the crate.
    pub fn embedded() -> Result<Self, TableLoadError> {
        Ok(Self {
            tracks: parse_tracks(EMBEDDED_TRACKS, "embedded tracks")?,
            cars: parse_cars(EMBEDDED_CARS, "embedded cars")?,
            labels: parse_labels(EMBEDDED_LABELS, "embedded labels")?,
            categories: parse_categories(EMBEDDED_CATEGORIES, "embedded categories")?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TrackFile {
    #[serde(default)]
    track: Vec<TrackRow>,
}

#[derive(Debug, Deserialize)]
struct TrackRow {
    folder: String,
    country_code: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct CarFile {
    #[serde(default)]
    car: Vec<CarIdentity>,
}

#[derive(Debug, Deserialize)]
struct LabelFile {
    #[serde(default)]
    labels: HashMap<String, LabelMapping>,
}

#[derive(Debug, Deserialize)]
struct CategoryFile {
    #[serde(default)]
    category: Vec<Category>,
}

fn from_toml<T: for<'de> Deserialize<'de>>(raw: &str, source_name: &str) -> Result<T, TableLoadError> {
    toml::from_str(raw).map_err(|source| TableLoadError::Parse {
        source_name: source_name.to_string(),
        source,
    })
}

fn invalid(source_name: &str, reason: String) -> TableLoadError {
    TableLoadError::Invalid {
        source_name: source_name.to_string(),
        reason,
    }
}

/// Parse a track directory (`[[track]]` rows).
pub fn parse_tracks(raw: &str, source_name: &str) -> Result<TrackDirectory, TableLoadError> {
    let file: TrackFile = from_toml(raw, source_name)?;
    let mut tracks = BTreeMap::new();
    for row in file.track {
        if row.folder.trim().is_empty() {
            return Err(invalid(source_name, "track folder must not be empty".to_string()));
        }
        let info = TrackInfo {
            country_code: row.country_code,
            display_name: row.display_name,
        };
        if tracks.insert(row.folder.clone(), info).is_some() {
            return Err(invalid(source_name, format!("duplicate track folder '{}'", row.folder)));
        }
    }
    debug!(source = source_name, tracks = tracks.len(), "loaded track table");
    Ok(TrackDirectory::new(tracks))
}

/// Parse a car identity table (`[[car]]` rows, order preserved).
pub fn parse_cars(raw: &str, source_name: &str) -> Result<CarTable, TableLoadError> {
    let file: CarFile = from_toml(raw, source_name)?;
    if let Some(car) = file.car.iter().find(|car| car.technical.is_empty()) {
        return Err(invalid(
            source_name,
            format!("car '{}' has an empty technical fragment", car.display_name),
        ));
    }
    debug!(source = source_name, cars = file.car.len(), "loaded car table");
    Ok(CarTable::new(file.car))
}

/// Parse a label table (`[labels]` key/value pairs).
pub fn parse_labels(raw: &str, source_name: &str) -> Result<LabelTable, TableLoadError> {
    let file: LabelFile = from_toml(raw, source_name)?;
    if let Some(key) = file.labels.iter().find_map(|(key, mapping)| match mapping {
        LabelMapping::Display(label) if label.trim().is_empty() => Some(key),
        _ => None,
    }) {
        return Err(invalid(source_name, format!("label for '{key}' is empty")));
    }
    debug!(source = source_name, labels = file.labels.len(), "loaded label table");
    Ok(LabelTable::new(file.labels))
}

/// Parse the category rule table (`[[category]]` rows).
pub fn parse_categories(raw: &str, source_name: &str) -> Result<CategoryTable, TableLoadError> {
    let file: CategoryFile = from_toml(raw, source_name)?;
    let mut seen = HashSet::new();
    for category in &file.category {
        if !seen.insert(category.id.as_str()) {
            return Err(invalid(source_name, format!("duplicate category id '{}'", category.id)));
        }
        if let CategoryDefinition::Groups { groups } = &category.definition {
            if let Some(group) = groups.iter().find(|group| group.targets.is_empty()) {
                return Err(invalid(
                    source_name,
                    format!("group '{}' of category '{}' has no targets", group.name, category.id),
                ));
            }
        }
    }
    debug!(
        source = source_name,
        categories = file.category.len(),
        "loaded category table"
    );
    Ok(CategoryTable::new(file.category))
}
