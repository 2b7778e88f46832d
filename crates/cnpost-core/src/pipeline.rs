// crates/cnpost-core/src/pipeline.rs

//! # Pipeline
//!
//! Chains the three resolvers: postcode -> location, district -> canonical
//! district, location -> administrative codes. Reference data and the alias
//! table are loaded once and only read afterwards, so one `Pipeline` can be
//! shared by any number of threads.

use crate::alias::AliasTable;
use crate::config::PipelineConfig;
use crate::error::{CnPostError, Result};
use crate::model::{
    AliasResolution, CodeResolution, LocationEnrichment, PostcodeRecord, ReferenceDb, Stage,
};
use crate::resolve::{AliasResolver, CodeResolver, PostcodeResolver};
use crate::text::extract_postcode;
use crate::traits::ReferenceStore;
use std::thread;
use tracing::{debug, info};

pub struct Pipeline<S = ReferenceDb> {
    store: S,
    aliases: AliasTable,
    config: PipelineConfig,
}

impl Pipeline<ReferenceDb> {
    /// Loads the reference tables and the alias file named in `config`.
    ///
    /// With the `builder` feature a configured snapshot is used when fresh and
    /// refreshed otherwise. A missing alias file only disables aliasing.
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        #[cfg(feature = "builder")]
        let db = ReferenceDb::load_cached(&config.data)?;
        #[cfg(not(feature = "builder"))]
        let db = ReferenceDb::load(&config.data)?;

        let aliases = AliasTable::load_or_empty(config.data.aliases.as_deref());
        Self::new(db, aliases, config)
    }
}

impl<S: ReferenceStore> Pipeline<S> {
    pub fn new(store: S, aliases: AliasTable, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            aliases,
            config,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn postcode_resolver(&self) -> PostcodeResolver {
        PostcodeResolver::new(self.config.min_prefix_len)
    }

    fn alias_resolver(&self) -> AliasResolver<'_> {
        AliasResolver::new(&self.aliases, &self.config.area_suffixes)
    }

    fn code_resolver(&self) -> CodeResolver<'_> {
        CodeResolver::new(&self.config.area_suffixes)
    }

    /// Resolves one postcode through the configured stage.
    pub fn resolve(&self, postcode: &str) -> Result<PostcodeRecord> {
        self.resolve_through(postcode, self.config.stage)
    }

    /// Resolves one postcode, stopping after `stage`.
    ///
    /// A postcode no tier can place comes back at [`Level::None`] with every
    /// location field empty; the alias and code stages are skipped for it.
    ///
    /// [`Level::None`]: crate::Level::None
    pub fn resolve_through(&self, postcode: &str, stage: Stage) -> Result<PostcodeRecord> {
        let mut record = PostcodeRecord::new(postcode);
        record.apply_location(self.postcode_resolver().resolve(&self.store, postcode)?);
        if !record.is_resolved() {
            return Ok(record);
        }

        if stage >= Stage::Alias {
            let alias = self.resolve_alias(&record.province, &record.city, &record.district);
            record.apply_alias(alias);
        }

        if stage >= Stage::Codes {
            let codes =
                self.resolve_codes(&record.province, &record.city, &record.canonical_district)?;
            record.apply_codes(codes);
        }

        Ok(record)
    }

    /// Resolves a raw input line. Lines without exactly six digits yield
    /// [`PostcodeRecord::malformed`].
    pub fn resolve_line(&self, line: &str) -> Result<PostcodeRecord> {
        match extract_postcode(line) {
            Some(postcode) => self.resolve(&postcode),
            None => {
                debug!(line, "no postcode in input line");
                Ok(PostcodeRecord::malformed())
            }
        }
    }

    /// Resolves every line, spreading contiguous chunks over the configured
    /// number of worker threads. Output order matches input order.
    ///
    /// The first error any worker hits aborts the whole batch.
    pub fn resolve_batch<L>(&self, lines: &[L]) -> Result<Vec<PostcodeRecord>>
    where
        L: AsRef<str> + Sync,
    {
        if lines.is_empty() {
            return Ok(Vec::new());
        }
        let workers = self.config.effective_workers().clamp(1, lines.len());
        let chunk_size = lines.len().div_ceil(workers);

        let parts: Vec<Result<Vec<PostcodeRecord>>> = thread::scope(|scope| {
            let handles: Vec<_> = lines
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|line| self.resolve_line(line.as_ref()))
                            .collect::<Result<Vec<_>>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(part) => part,
                    Err(_) => Err(CnPostError::Worker("worker thread panicked".into())),
                })
                .collect()
        });

        let mut records = Vec::with_capacity(lines.len());
        for part in parts {
            records.extend(part?);
        }

        let resolved = records.iter().filter(|r| r.is_resolved()).count();
        info!(lines = lines.len(), resolved, workers, "batch resolved");
        Ok(records)
    }

    /// Canonicalizes a district name through the alias table.
    pub fn resolve_alias(&self, province: &str, city: &str, district: &str) -> AliasResolution {
        self.alias_resolver().resolve(province, city, district)
    }

    /// Looks up administrative codes for a location.
    pub fn resolve_codes(
        &self,
        province: &str,
        city: &str,
        district: &str,
    ) -> Result<CodeResolution> {
        self.code_resolver().resolve(&self.store, province, city, district)
    }

    /// Runs the alias and code stages on a location obtained elsewhere, for
    /// example from a geocoder.
    pub fn enrich_location(
        &self,
        province: &str,
        city: &str,
        district: &str,
    ) -> Result<LocationEnrichment> {
        let alias = self.resolve_alias(province, city, district);
        let codes = self.resolve_codes(province, city, &alias.canonical_district)?;
        Ok(LocationEnrichment {
            province: province.to_string(),
            city: city.to_string(),
            district: district.to_string(),
            alias,
            codes,
        })
    }
}
