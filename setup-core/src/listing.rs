//! Setup listings for selection menus.
//!
//! Turns a directory-derived index of setups per track into ordered groups:
//! tracks in the order they were added to the index, setups sorted by car
//! class, brand and name, with optional class filtering and exclusion of an
//! already selected setup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::{CarIdentity, IdentityResolver};

/// Class display order used when the caller does not supply one.
pub const DEFAULT_CLASS_ORDER: [&str; 6] = ["hy", "lmgt3", "lmp2_elms", "lmp2_wec", "gte", "lmp3"];

/// Country and display name of a track folder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrackInfo {
    pub country_code: String,
    pub display_name: String,
}

/// Track metadata keyed by on-disk folder name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackDirectory {
    tracks: BTreeMap<String, TrackInfo>,
}

impl TrackDirectory {
    pub fn new(tracks: BTreeMap<String, TrackInfo>) -> Self {
        Self { tracks }
    }

    pub fn get(&self, folder: &str) -> Option<&TrackInfo> {
        self.tracks.get(folder)
    }

    pub fn contains(&self, folder: &str) -> bool {
        self.tracks.contains_key(folder)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// One saved setup as seen in the settings directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SetupRecord {
    /// File stem of the setup.
    pub name: String,
    /// `VehicleClassSetting` read from the file; empty when unknown.
    #[serde(default)]
    pub car_technical_name: String,
}

impl SetupRecord {
    pub fn new(name: impl Into<String>, car_technical_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            car_technical_name: car_technical_name.into(),
        }
    }
}

/// Available setups grouped by track folder, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupIndex {
    tracks: Vec<(String, Vec<SetupRecord>)>,
}

impl SetupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a setup; a track seen for the first time goes after the others.
    pub fn insert(&mut self, track: impl Into<String>, record: SetupRecord) {
        let track = track.into();
        match self.tracks.iter_mut().find(|(name, _)| *name == track) {
            Some((_, records)) => records.push(record),
            None => self.tracks.push((track, vec![record])),
        }
    }

    /// Look up a setup by track folder and setup name.
    pub fn find(&self, track: &str, name: &str) -> Option<&SetupRecord> {
        self.tracks
            .iter()
            .find(|(folder, _)| folder == track)?
            .1
            .iter()
            .find(|record| record.name == name)
    }

    /// Look up a setup by its `track/name` key.
    pub fn find_key(&self, setup_key: &str) -> Option<&SetupRecord> {
        let (track, name) = split_setup_key(setup_key);
        if track.is_empty() || name.is_empty() {
            return None;
        }
        self.find(track, name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SetupRecord])> {
        self.tracks
            .iter()
            .map(|(track, records)| (track.as_str(), records.as_slice()))
    }

    pub fn setup_count(&self) -> usize {
        self.tracks.iter().map(|(_, records)| records.len()).sum()
    }
}

/// Compose the `track/name` key of a setup.
pub fn setup_key(track: &str, name: &str) -> String {
    format!("{track}/{name}")
}

/// Split a `track/name` key at its first `/`.
///
/// A key without a separator is treated as a bare setup name.
pub fn split_setup_key(setup_key: &str) -> (&str, &str) {
    match setup_key.split_once('/') {
        Some((track, name)) => (track, name),
        None => ("", setup_key),
    }
}

/// Filtering and ordering knobs for [`build_listing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingOptions {
    /// `track/name` key to leave out, e.g. the setup already chosen on the other side.
    pub exclude_key: Option<String>,
    /// Class codes in display order; other classes sort after these.
    pub class_order: Vec<String>,
    /// When set, only setups of these classes are listed.
    pub class_filter: Option<Vec<String>>,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            exclude_key: None,
            class_order: DEFAULT_CLASS_ORDER.iter().map(|c| c.to_string()).collect(),
            class_filter: None,
        }
    }
}

/// One selectable setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingItem {
    pub name: String,
    pub identity: Option<CarIdentity>,
}

impl ListingItem {
    fn class(&self) -> &str {
        self.identity.as_ref().map(|i| i.class.as_str()).unwrap_or("")
    }

    fn brand(&self) -> &str {
        self.identity.as_ref().map(|i| i.brand.as_str()).unwrap_or("")
    }
}

/// Setups of one track, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackListing {
    pub track: String,
    pub track_label: String,
    pub country_code: Option<String>,
    pub items: Vec<ListingItem>,
}

/// Build the grouped, filtered and sorted setup listing.
pub fn build_listing(
    index: &SetupIndex,
    tracks: &TrackDirectory,
    resolver: &IdentityResolver,
    options: &ListingOptions,
) -> Vec<TrackListing> {
    index
        .iter()
        .filter_map(|(track, records)| {
            let mut items: Vec<ListingItem> = records
                .iter()
                .filter(|record| !record.name.is_empty())
                .filter(|record| {
                    options.exclude_key.as_deref() != Some(setup_key(track, &record.name).as_str())
                })
                .map(|record| ListingItem {
                    name: record.name.clone(),
                    identity: resolver.resolve(&record.car_technical_name),
                })
                .filter(|item| match &options.class_filter {
                    Some(allowed) => allowed.iter().any(|class| class == item.class()),
                    None => true,
                })
                .collect();

            if items.is_empty() {
                return None;
            }
            sort_items(&mut items, &options.class_order);

            let info = tracks.get(track);
            Some(TrackListing {
                track: track.to_string(),
                track_label: info
                    .map(|info| info.display_name.clone())
                    .filter(|label| !label.is_empty())
                    .unwrap_or_else(|| track.to_string()),
                country_code: info
                    .map(|info| info.country_code.clone())
                    .filter(|code| !code.is_empty()),
                items,
            })
        })
        .collect()
}

/// Sort by class rank, then brand, then setup name. Stable.
pub fn sort_items(items: &mut [ListingItem], class_order: &[String]) {
    items.sort_by(|a, b| {
        class_rank(a.class(), class_order)
            .cmp(&class_rank(b.class(), class_order))
            .then_with(|| a.brand().cmp(b.brand()))
            .then_with(|| a.name.cmp(&b.name))
    });
}

// Unranked classes all share the rank after the last ranked one.
fn class_rank(class: &str, class_order: &[String]) -> usize {
    class_order
        .iter()
        .position(|ranked| ranked == class)
        .unwrap_or(class_order.len())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{split_setup_key, SetupIndex, SetupRecord};

    #[test]
    fn split_setup_key_handles_missing_separator() {
        assert_eq!(split_setup_key("Bahrain/TestSetup"), ("Bahrain", "TestSetup"));
        assert_eq!(split_setup_key("TestName"), ("", "TestName"));
        assert_eq!(split_setup_key(""), ("", ""));
        assert_eq!(split_setup_key("Spa/a/b"), ("Spa", "a/b"));
    }

    #[test]
    fn index_lookup_by_key() {
        let mut index = SetupIndex::new();
        index.insert("Spa", SetupRecord::new("Quali", "Toyota_GR010"));

        assert!(index.find_key("Spa/Quali").is_some());
        assert!(index.find_key("Quali").is_none());
        assert!(index.find("Monza", "Quali").is_none());
        assert_eq!(index.setup_count(), 1);
    }

    #[test]
    fn index_keeps_tracks_in_insertion_order() {
        let mut index = SetupIndex::new();
        index.insert("Spa", SetupRecord::new("Race", ""));
        index.insert("Bahrain", SetupRecord::new("Race", ""));
        index.insert("Spa", SetupRecord::new("Quali", ""));

        let tracks: Vec<(&str, usize)> = index
            .iter()
            .map(|(track, records)| (track, records.len()))
            .collect();
        assert_eq!(tracks, vec![("Spa", 2), ("Bahrain", 1)]);
    }
}
