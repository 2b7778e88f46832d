// crates/cnpost-core/src/config.rs

//! Pipeline configuration.
//!
//! Everything the resolvers need besides the reference data itself: where the
//! tables live, how far the prefix ladder descends, which suffixes define a
//! core name, and how wide a batch run fans out. Loaded from TOML; every key
//! is optional.
//!
//! ```toml
//! min_prefix_len = 3
//! workers = 8
//! stage = "codes"
//!
//! [data]
//! split_divisions = "data/split_divisions.tsv"
//! standard_postcodes = "data/standard_postcodes.tsv.gz"
//! admin_codes = "data/admin_codes.json"
//! aliases = "data/area_alias_map.tsv"
//! snapshot = "data/reference.snap.bin.gz"
//! ```

use crate::error::{CnPostError, Result};
use crate::model::Stage;
use crate::text::DEFAULT_AREA_SUFFIXES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Locations of the reference datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataPaths {
    pub split_divisions: PathBuf,
    pub standard_postcodes: PathBuf,
    pub admin_codes: PathBuf,
    /// Alias file; a missing file degrades to an empty alias table.
    pub aliases: Option<PathBuf>,
    /// Compiled snapshot of the three tables (feature `builder`).
    pub snapshot: Option<PathBuf>,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            split_divisions: PathBuf::from("data/split_divisions.tsv"),
            standard_postcodes: PathBuf::from("data/standard_postcodes.tsv"),
            admin_codes: PathBuf::from("data/admin_codes.tsv"),
            aliases: Some(PathBuf::from("data/area_alias_map.tsv")),
            snapshot: None,
        }
    }
}

impl DataPaths {
    /// The three tables the pipeline cannot run without.
    pub fn sources(&self) -> [&Path; 3] {
        [
            self.split_divisions.as_path(),
            self.standard_postcodes.as_path(),
            self.admin_codes.as_path(),
        ]
    }

    /// Rebases relative paths onto `base`.
    pub fn rebase(&mut self, base: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        fix(&mut self.split_divisions);
        fix(&mut self.standard_postcodes);
        fix(&mut self.admin_codes);
        if let Some(p) = self.aliases.as_mut() {
            fix(p);
        }
        if let Some(p) = self.snapshot.as_mut() {
            fix(p);
        }
    }
}

/// Explicit configuration handed to [`Pipeline::new`](crate::Pipeline::new).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub data: DataPaths,
    /// Shortest postcode prefix the fuzzy ladder tries (inclusive).
    pub min_prefix_len: usize,
    /// Suffixes stripped by `core_name`, highest priority first.
    pub area_suffixes: Vec<String>,
    /// Batch worker threads; 0 means one per available CPU.
    pub workers: usize,
    /// Last stage a run executes.
    pub stage: Stage,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data: DataPaths::default(),
            min_prefix_len: 3,
            area_suffixes: DEFAULT_AREA_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            workers: 0,
            stage: Stage::default(),
        }
    }
}

impl PipelineConfig {
    /// Longest prefix tried by the fuzzy ladder: a postcode minus its last digit.
    pub const MAX_PREFIX_LEN: usize = 5;

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Loads a TOML file; relative data paths are taken relative to the file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CnPostError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut cfg = Self::from_toml_str(&text)?;
        if let Some(dir) = path.parent() {
            cfg.data.rebase(dir);
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=Self::MAX_PREFIX_LEN).contains(&self.min_prefix_len) {
            return Err(CnPostError::Config(format!(
                "min_prefix_len must be between 1 and {}, got {}",
                Self::MAX_PREFIX_LEN,
                self.min_prefix_len
            )));
        }
        if self.area_suffixes.iter().any(|s| s.trim().is_empty()) {
            return Err(CnPostError::Config(
                "area_suffixes must not contain empty entries".into(),
            ));
        }
        Ok(())
    }

    /// Worker count with 0 expanded to the available parallelism.
    pub fn effective_workers(&self) -> usize {
        match self.workers {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        }
    }
}
