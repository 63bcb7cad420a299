use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use c19_types::{InfectionReport, RawEntry};

/// Scan a dump directory and discover all raw-entry JSON files.
///
/// The retrieval side writes one JSON array of entries per crawl run
/// into the dump directory. We take every `*.json` file at any depth
/// and sort the paths so repeated runs process dumps in a stable order.
pub fn scan_dumps(root: &Path) -> Vec<PathBuf> {
    let mut results: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    results.sort();
    results
}

/// Load the raw entries from one dump file.
///
/// Returns None when the file cannot be read or is not a JSON array of
/// entries; the caller decides whether to skip or abort.
pub fn load_entries(path: &Path) -> Option<Vec<RawEntry>> {
    let json = fs::read_to_string(path).ok()?;
    serde_json::from_str(&json).ok()
}

/// Read back a records CSV written by the extract phase.
///
/// Expected format:
///   | location  |    date    | count |
///   | Stockholm | 2020-01-01 |   1   |
///
/// Empty location/date fields deserialize as absent.
pub fn read_records_csv(path: &Path) -> Result<Vec<InfectionReport>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    reader.deserialize().collect()
}
