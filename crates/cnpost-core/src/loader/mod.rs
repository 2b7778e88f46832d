// crates/cnpost-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the Physical Layer (I/O, Decompression) and delegates to the
//! format parsers (TSV vs JSON). Snapshot handling lives in `builder`.

use crate::config::DataPaths;
use crate::error::{CnPostError, Result};
use crate::model::{ReferenceDb, ReferenceTables};
use serde::de::DeserializeOwned;
use std::io::{BufReader, ErrorKind};
use std::path::Path;
use tracing::info;

pub mod common_io;
pub mod tsv;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "builder")]
pub mod builder;

use tsv::TsvRow;

/// On-disk layout of a reference table, decided by file extension
/// (`.json` / `.json.gz` vs everything else).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Tsv,
    Json,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let name = name.strip_suffix(".gz").unwrap_or(&name);
        if name.ends_with(".json") {
            TableFormat::Json
        } else {
            TableFormat::Tsv
        }
    }
}

/// Reads every row of one reference table.
///
/// Anything that stops the file from being read is reported as unavailable
/// reference data; rows that are read but malformed are invalid data.
pub fn load_rows<T>(path: &Path, what: &str) -> Result<Vec<T>>
where
    T: TsvRow + DeserializeOwned,
{
    let reader = common_io::open_stream(path, what)?;
    let rows = match TableFormat::from_path(path) {
        TableFormat::Tsv => tsv::read_table(BufReader::new(reader))
            .and_then(|table| table.rows_as::<T>(what)),
        #[cfg(feature = "json")]
        TableFormat::Json => json::read_rows::<T>(reader),
        #[cfg(not(feature = "json"))]
        TableFormat::Json => Err(CnPostError::InvalidData(format!(
            "{} is JSON but the 'json' feature is disabled",
            path.display()
        ))),
    };
    let rows = rows.map_err(|e| match e {
        // Readable but not UTF-8, e.g. a GBK export.
        CnPostError::Io(io) if io.kind() == ErrorKind::InvalidData => {
            CnPostError::InvalidData(format!("{what}: {io}"))
        }
        CnPostError::Io(io) => CnPostError::unavailable(what, io),
        other => other,
    })?;

    info!(table = what, path = %path.display(), rows = rows.len(), "loaded reference table");
    Ok(rows)
}

impl ReferenceTables {
    /// Loads all three tables. Any missing table is fatal.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        Ok(Self {
            splits: load_rows(&paths.split_divisions, "split divisions")?,
            standard: load_rows(&paths.standard_postcodes, "standard postcodes")?,
            codes: load_rows(&paths.admin_codes, "admin codes")?,
        })
    }
}

impl ReferenceDb {
    /// **Standard Loader:** reads the source tables and builds the indexes.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        Ok(Self::from_tables(ReferenceTables::load(paths)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(TableFormat::from_path(Path::new("a/codes.json")), TableFormat::Json);
        assert_eq!(TableFormat::from_path(Path::new("a/codes.JSON.gz")), TableFormat::Json);
        assert_eq!(TableFormat::from_path(Path::new("a/codes.tsv.gz")), TableFormat::Tsv);
        assert_eq!(TableFormat::from_path(Path::new("a/codes")), TableFormat::Tsv);
    }
}
