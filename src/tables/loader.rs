use std::fs::File;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::tables::records::{CooccurrencePair, OccurrenceRecord, RecordError, RootFrequency};
use crate::tables::TableSet;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported table format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("Invalid row {row} in {path}: {source}")]
    InvalidRow {
        path: PathBuf,
        row: usize,
        #[source]
        source: RecordError,
    },
}

/// Locations of the three source tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePaths {
    pub occurrences: PathBuf,
    pub frequencies: PathBuf,
    pub cooccurrences: PathBuf,
}

// Reads once, never retries.
// A failed load is permanent for the engine built from it.
pub struct TableLoader {
    paths: TablePaths,
}

impl TableLoader {
    pub fn new(paths: TablePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &TablePaths {
        &self.paths
    }

    /// Read all three tables, failing on the first unreadable file or
    /// invalid row.
    pub fn load(&self) -> Result<TableSet, LoadError> {
        let occurrences: Vec<OccurrenceRecord> = read_table(&self.paths.occurrences)?;
        validate_rows(&self.paths.occurrences, &occurrences, OccurrenceRecord::validate)?;

        let frequencies: Vec<RootFrequency> = read_table(&self.paths.frequencies)?;
        validate_rows(&self.paths.frequencies, &frequencies, RootFrequency::validate)?;

        let cooccurrences: Vec<CooccurrencePair> = read_table(&self.paths.cooccurrences)?;
        validate_rows(&self.paths.cooccurrences, &cooccurrences, CooccurrencePair::validate)?;

        let inconsistent = frequencies.iter().filter(|row| !row.is_consistent()).count();
        if inconsistent > 0 {
            warn!(
                rows = inconsistent,
                "frequency rows where total != period_a + period_b; ratios use period counts"
            );
        }

        Ok(TableSet {
            occurrences,
            frequencies,
            cooccurrences,
        })
    }

    /// Like [`TableLoader::load`], but any failure yields three empty tables
    /// together so callers only ever see one "tables absent" state.
    pub fn load_or_empty(&self) -> TableSet {
        match self.load() {
            Ok(tables) => {
                info!(
                    occurrences = tables.occurrences.len(),
                    roots = tables.frequencies.len(),
                    pairs = tables.cooccurrences.len(),
                    "analytics tables loaded"
                );
                tables
            }
            Err(e) => {
                error!(error = %e, "failed to load analytics tables; continuing with empty tables");
                TableSet::empty()
            }
        }
    }
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_path(path)
                .map_err(|source| LoadError::Csv {
                    path: path.to_path_buf(),
                    source,
                })?;
            reader
                .deserialize()
                .collect::<Result<Vec<T>, csv::Error>>()
                .map_err(|source| LoadError::Csv {
                    path: path.to_path_buf(),
                    source,
                })
        }
        Some("json") => {
            let f = File::open(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_reader(f).map_err(|source| LoadError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn validate_rows<T>(
    path: &Path,
    rows: &[T],
    check: impl Fn(&T) -> Result<(), RecordError>,
) -> Result<(), LoadError> {
    for (row, record) in rows.iter().enumerate() {
        check(record).map_err(|source| LoadError::InvalidRow {
            path: path.to_path_buf(),
            row: row + 1,
            source,
        })?;
    }
    Ok(())
}
