//! Reference table loading with per-file overrides.
//!
//! Every table starts from the copy embedded in `setup-core`. When a tables
//! directory is given, each of `tracks.toml`, `cars.toml`, `labels.toml` and
//! `categories.toml` found there replaces its embedded counterpart. A file that
//! cannot be read or parsed is skipped with a warning.

use std::fs;
use std::path::Path;

use serde::Serialize;
use setup_core::{
    parse_cars, parse_categories, parse_labels, parse_tracks, ReferenceTables, TableKind,
    TableLoadError,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors returned when loading reference tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read table file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Table(#[from] TableLoadError),
}

/// Where one table came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSource {
    pub file: &'static str,
    /// `embedded` or `file:<path>`.
    pub origin: String,
    pub entries: usize,
}

/// Reference tables plus their provenance.
#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub tables: ReferenceTables,
    pub sources: Vec<TableSource>,
}

/// Load all reference tables, applying overrides from `dir` when given.
pub fn load_tables(dir: Option<&Path>) -> Result<LoadedTables, ConfigError> {
    if let Some(dir) = dir {
        if !dir.is_dir() {
            warn!(
                dir = %dir.display(),
                "tables directory not found; using embedded tables"
            );
        }
    }

    let (tracks, tracks_origin) = resolve(dir, TableKind::Tracks, parse_tracks)?;
    let (cars, cars_origin) = resolve(dir, TableKind::Cars, parse_cars)?;
    let (labels, labels_origin) = resolve(dir, TableKind::Labels, parse_labels)?;
    let (categories, categories_origin) = resolve(dir, TableKind::Categories, parse_categories)?;

    let sources = vec![
        source(TableKind::Tracks, tracks_origin, tracks.len()),
        source(TableKind::Cars, cars_origin, cars.len()),
        source(TableKind::Labels, labels_origin, labels.len()),
        source(
            TableKind::Categories,
            categories_origin,
            categories.categories().len(),
        ),
    ];

    Ok(LoadedTables {
        tables: ReferenceTables {
            tracks,
            cars,
            labels,
            categories,
        },
        sources,
    })
}

/// Read one table file from disk.
pub fn read_table_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn source(kind: TableKind, origin: String, entries: usize) -> TableSource {
    TableSource {
        file: kind.file_name(),
        origin,
        entries,
    }
}

fn resolve<T>(
    dir: Option<&Path>,
    kind: TableKind,
    parse: fn(&str, &str) -> Result<T, TableLoadError>,
) -> Result<(T, String), ConfigError> {
    if let Some(dir) = dir {
        let path = dir.join(kind.file_name());
        if path.is_file() {
            let loaded = read_table_file(&path).and_then(|raw| {
                parse(&raw, &path.display().to_string()).map_err(ConfigError::from)
            });
            match loaded {
                Ok(table) => {
                    debug!(path = %path.display(), "loaded table override");
                    return Ok((table, format!("file:{}", path.display())));
                }
                Err(err) => warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to load table override; using embedded table"
                ),
            }
        }
    }

    let name = format!("embedded {}", kind.file_name());
    let table = parse(kind.embedded_text(), &name)?;
    Ok((table, "embedded".to_string()))
}
