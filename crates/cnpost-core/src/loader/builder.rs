// crates/cnpost-core/src/loader/builder.rs

//! Compiles the reference tables into a single bincode snapshot and reuses it
//! while the source tables it was built from are unchanged.

use super::common_io;
use crate::common::DbStats;
use crate::config::DataPaths;
use crate::error::{CnPostError, Result};
use crate::model::{ReferenceDb, ReferenceTables};
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, info, warn};

#[cfg(feature = "compact")]
use flate2::{write::GzEncoder, Compression};

/// Bumped whenever the layout of [`ReferenceTables`] changes.
pub const SNAPSHOT_VERSION: u32 = 2;

/// Upper bound for a snapshot payload.
const SNAPSHOT_LIMIT: u64 = 512 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    Gzip,
    None,
}

impl CompressionMode {
    /// Gzip when the target path ends in `.gz`.
    pub fn for_path(path: &Path) -> Self {
        if common_io::is_gzip(path) {
            CompressionMode::Gzip
        } else {
            CompressionMode::None
        }
    }
}

/// Identity of one source table at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SourceStamp {
    path: PathBuf,
    len: Option<u64>,
    modified: Option<(u64, u32)>,
}

impl SourceStamp {
    fn of(path: &Path) -> Self {
        let meta = fs::metadata(path).ok();
        Self {
            path: absolute_path(path),
            len: meta.as_ref().map(|m| m.len()),
            modified: meta
                .and_then(|m| m.modified().ok())
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| (d.as_secs(), d.subsec_nanos())),
        }
    }

    /// Same file, unchanged. A source that has since been removed only has to
    /// keep its path.
    fn covers(&self, current: &SourceStamp) -> bool {
        if self.path != current.path {
            return false;
        }
        current.len.is_none() || (self.len == current.len && self.modified == current.modified)
    }
}

fn source_stamps(paths: &DataPaths) -> Vec<SourceStamp> {
    paths.sources().iter().map(|p| SourceStamp::of(p)).collect()
}

/// Canonical form of `path`; for a missing file the parent is canonicalized.
fn absolute_path(path: &Path) -> PathBuf {
    if let Ok(p) = fs::canonicalize(path) {
        return p;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() { Path::new(".") } else { parent };
            fs::canonicalize(parent)
                .map(|p| p.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    /// Empty for snapshots written by [`ReferenceDb::save_snapshot`].
    sources: Vec<SourceStamp>,
    tables: ReferenceTables,
}

impl Snapshot {
    fn read(path: &Path) -> Result<Self> {
        let reader = common_io::open_stream(path, "snapshot")?;
        let snapshot: Snapshot = bincode_options().deserialize_from(reader)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(CnPostError::InvalidData(format!(
                "snapshot version {} is not supported (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        Ok(snapshot)
    }

    /// The snapshot was built from exactly these source tables.
    fn is_fresh_for(&self, current: &[SourceStamp]) -> bool {
        if self.sources.len() != current.len() {
            return false;
        }
        for (built, now) in self.sources.iter().zip(current) {
            if !built.covers(now) {
                debug!(source = %now.path.display(), "snapshot is stale");
                return false;
            }
        }
        true
    }
}

fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new().with_limit(SNAPSHOT_LIMIT)
}

// -----------------------------------------------------------------------------
// UNIVERSAL BUILDER
// -----------------------------------------------------------------------------

/// Reads the source tables named in `paths` and writes them to `out_path`.
pub fn build_snapshot(
    paths: &DataPaths,
    out_path: &Path,
    compression: CompressionMode,
) -> Result<DbStats> {
    info!(out = %out_path.display(), ?compression, "building reference snapshot");

    let sources = source_stamps(paths);
    let db = ReferenceDb::load(paths)?;
    db.write_snapshot(sources, out_path, compression)?;
    Ok(db.stats())
}

impl ReferenceDb {
    /// **Smart Load:** uses the configured snapshot when it was built from the
    /// current source tables, otherwise loads the sources and refreshes the
    /// snapshot best-effort.
    pub fn load_cached(paths: &DataPaths) -> Result<Self> {
        let Some(snapshot) = paths.snapshot.as_deref() else {
            return Self::load(paths);
        };

        // 1. Check Cache
        let sources = source_stamps(paths);
        if snapshot.exists() {
            match Snapshot::read(snapshot) {
                Ok(snap) if snap.is_fresh_for(&sources) => {
                    info!(path = %snapshot.display(), "loaded reference snapshot");
                    return Ok(Self::from_tables(snap.tables));
                }
                Ok(_) => info!(path = %snapshot.display(), "snapshot is stale, rebuilding"),
                Err(e) => warn!(path = %snapshot.display(), error = %e, "snapshot unusable, rebuilding"),
            }
        }

        // 2. Build
        let db = Self::load(paths)?;

        // 3. Cache
        if let Err(e) = db.write_snapshot(sources, snapshot, CompressionMode::for_path(snapshot)) {
            warn!(path = %snapshot.display(), error = %e, "could not write snapshot");
        }

        Ok(db)
    }

    /// Loads a snapshot without checking it against any source table.
    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let snapshot = Snapshot::read(path)?;
        info!(path = %path.display(), "loaded reference snapshot");
        Ok(Self::from_tables(snapshot.tables))
    }

    /// Writes the tables without source stamps; [`ReferenceDb::load_cached`]
    /// never treats such a snapshot as fresh.
    pub fn save_snapshot(&self, path: impl AsRef<Path>, compression: CompressionMode) -> Result<()> {
        self.write_snapshot(Vec::new(), path.as_ref(), compression)
    }

    fn write_snapshot(
        &self,
        sources: Vec<SourceStamp>,
        path: &Path,
        compression: CompressionMode,
    ) -> Result<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            sources,
            tables: self.tables().clone(),
        };
        write_generic(path, &snapshot, compression)
    }
}

// -----------------------------------------------------------------------------
// GENERIC WRITER
// -----------------------------------------------------------------------------

fn write_generic<T: Serialize>(path: &Path, value: &T, compression: CompressionMode) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    match compression {
        CompressionMode::Gzip => {
            #[cfg(feature = "compact")]
            {
                let mut encoder = GzEncoder::new(writer, Compression::default());
                bincode_options().serialize_into(&mut encoder, value)?;
                encoder.finish()?.flush()?;
            }
            #[cfg(not(feature = "compact"))]
            {
                return Err(CnPostError::InvalidData(
                    "Gzip requested but 'compact' disabled".into(),
                ));
            }
        }
        CompressionMode::None => {
            bincode_options().serialize_into(&mut writer, value)?;
            writer.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_compare_path_size_and_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("codes.tsv");
        fs::write(&table, "province\n").unwrap();
        let built = SourceStamp::of(&table);
        assert!(built.covers(&SourceStamp::of(&table)));

        fs::write(&table, "province\n北京市\n").unwrap();
        assert!(!built.covers(&SourceStamp::of(&table)));

        let other = dir.path().join("other.tsv");
        fs::write(&other, "province\n").unwrap();
        assert!(!built.covers(&SourceStamp::of(&other)));

        // Removed since the build: the path alone decides.
        fs::remove_file(&table).unwrap();
        assert!(built.covers(&SourceStamp::of(&table)));
    }

    #[test]
    fn unstamped_snapshot_is_never_fresh() {
        let snap = Snapshot {
            version: SNAPSHOT_VERSION,
            sources: Vec::new(),
            tables: ReferenceTables::default(),
        };
        let current = vec![SourceStamp::of(Path::new("split_divisions.tsv"))];
        assert!(!snap.is_fresh_for(&current));
    }

    #[test]
    fn compression_follows_extension() {
        assert_eq!(CompressionMode::for_path(Path::new("x.bin.gz")), CompressionMode::Gzip);
        assert_eq!(CompressionMode::for_path(Path::new("x.bin")), CompressionMode::None);
    }
}
