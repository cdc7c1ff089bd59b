//! Per-year local holiday files.
//!
//! Municipal holidays are not part of any national calendar, so they are
//! kept in one JSON file per year: `festivos_rivas_<YEAR>.json`, holding an
//! array of ISO dates:
//!
//! ```json
//! ["2025-06-16", "2025-10-24"]
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::HolidaySource;

/// File name prefix for local holiday files.
const FILE_PREFIX: &str = "festivos_rivas_";

/// Reads local holiday files from a directory.
#[derive(Debug, Clone)]
pub struct OverrideDir {
    dir: PathBuf,
}

impl OverrideDir {
    /// Use files in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding local holidays for `year`.
    pub fn file_for(&self, year: i32) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{year}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl HolidaySource for OverrideDir {
    /// A missing file means no local holidays. An unreadable or malformed
    /// file is logged and treated the same way.
    fn holidays(&self, year: i32) -> HashSet<NaiveDate> {
        let path = self.file_for(year);

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no local holiday file");
                return HashSet::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read local holiday file");
                return HashSet::new();
            }
        };

        let entries: Vec<String> = match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse local holiday file");
                return HashSet::new();
            }
        };

        entries
            .iter()
            .filter_map(|entry| match NaiveDate::parse_from_str(entry, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    warn!(path = %path.display(), entry = %entry, "ignoring invalid date");
                    None
                }
            })
            .collect()
    }
}
