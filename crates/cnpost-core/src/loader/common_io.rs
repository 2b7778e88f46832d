// crates/cnpost-core/src/loader/common_io.rs
use crate::error::{CnPostError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

#[cfg(feature = "compact")]
use flate2::read::GzDecoder;

/// `true` when the file name ends in `.gz`.
pub fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Opens a reference file, buffers it, and transparently un-gzips `.gz` files.
///
/// A file that cannot be opened is reported as unavailable reference data
/// under the name `what`.
pub fn open_stream(path: &Path, what: &str) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        CnPostError::unavailable(what, format!("cannot open {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    if is_gzip(path) {
        #[cfg(feature = "compact")]
        {
            return Ok(Box::new(GzDecoder::new(reader)));
        }
        #[cfg(not(feature = "compact"))]
        {
            return Err(CnPostError::InvalidData(format!(
                "{} is gzip-compressed but 'compact' is disabled",
                path.display()
            )));
        }
    }

    Ok(Box::new(reader))
}

/// Default snapshot location next to a source table: `<file>.<suffix>`.
pub fn get_cache_path(source_path: &Path, suffix: &str) -> PathBuf {
    let filename = source_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "reference".to_string());
    source_path.with_file_name(format!("{filename}.{suffix}"))
}
