//! Settings directory scanning.
//!
//! The simulator keeps one folder per track under `UserData/player/Settings`.
//! Only folders named in the track table are read, and only `.svm` files in
//! them. Each file contributes its stem as the setup name and its
//! `VehicleClassSetting` as the technical car name.

use std::fs;
use std::path::{Path, PathBuf};

use setup_core::{parse_bytes, SetupIndex, SetupRecord, TrackDirectory};
use thiserror::Error;
use tracing::{debug, warn};

const SETUP_EXTENSION: &str = "svm";

/// Errors returned when the settings directory cannot be listed.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read settings directory {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Build the setup index for a settings directory.
///
/// Unreadable setup files are still listed, without a car.
pub fn scan_settings_dir(dir: &Path, tracks: &TrackDirectory) -> Result<SetupIndex, ScanError> {
    let mut index = SetupIndex::new();

    for track_dir in sorted_entries(dir)? {
        if !track_dir.is_dir() {
            continue;
        }
        let Some(track) = file_name(&track_dir) else {
            continue;
        };
        if !tracks.contains(&track) {
            debug!(folder = %track, "skipping folder that is not a known track");
            continue;
        }

        for path in sorted_entries(&track_dir)? {
            if !is_setup_file(&path) {
                continue;
            }
            let Some(name) = path.file_stem().map(|stem| stem.to_string_lossy().into_owned())
            else {
                continue;
            };
            index.insert(track.clone(), SetupRecord::new(name, vehicle_class(&path)));
        }
    }

    debug!(
        dir = %dir.display(),
        setups = index.setup_count(),
        "scanned settings directory"
    );
    Ok(index)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let io_error = |source| ScanError::Io {
        path: dir.display().to_string(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        paths.push(entry.map_err(io_error)?.path());
    }
    paths.sort();
    Ok(paths)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

fn is_setup_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SETUP_EXTENSION))
}

fn vehicle_class(path: &Path) -> String {
    let document = match fs::read(path) {
        Ok(bytes) => parse_bytes(&bytes),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read setup file");
            return String::new();
        }
    };
    match document {
        Some(document) => document.metadata.vehicle_class.unwrap_or_default(),
        None => {
            warn!(path = %path.display(), "setup file is not utf-8 text");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use setup_core::ReferenceTables;

    use super::scan_settings_dir;

    #[test]
    fn reads_known_track_folders_and_svm_files_only() {
        let tables = ReferenceTables::embedded().expect("tables");
        let dir = tempfile::tempdir().expect("tempdir");
        let spa = dir.path().join("Spa");
        fs::create_dir(&spa).expect("spa");
        fs::write(
            spa.join("Race.svm"),
            "VehicleClassSetting=\"Toyota_GR010 WEC2024\"\n[GENERAL]\nSymmetric=1\n",
        )
        .expect("race");
        fs::write(spa.join("Quali.SVM"), "[GENERAL]\nSymmetric=1\n").expect("quali");
        fs::write(spa.join("notes.txt"), "not a setup").expect("notes");
        fs::write(spa.join("Broken.svm"), [0xff, 0xfe, 0x00]).expect("broken");

        let other = dir.path().join("MyFolder");
        fs::create_dir(&other).expect("other");
        fs::write(other.join("Race.svm"), "[GENERAL]\n").expect("other race");

        let index = scan_settings_dir(dir.path(), &tables.tracks).expect("scan");
        assert_eq!(index.setup_count(), 3);

        let race = index.find("Spa", "Race").expect("race setup");
        assert_eq!(race.car_technical_name, "Toyota_GR010 WEC2024");
        assert_eq!(index.find("Spa", "Quali").map(|r| r.car_technical_name.as_str()), Some(""));
        assert_eq!(index.find("Spa", "Broken").map(|r| r.car_technical_name.as_str()), Some(""));
        assert!(index.find("MyFolder", "Race").is_none());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tables = ReferenceTables::embedded().expect("tables");
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(scan_settings_dir(&dir.path().join("missing"), &tables.tracks).is_err());
    }
}
