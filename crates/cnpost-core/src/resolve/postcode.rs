// crates/cnpost-core/src/resolve/postcode.rs
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::model::{Level, ResolvedLocation, SourceNote, SplitDivisionEntry, StandardPostcodeEntry};
use crate::text::is_postcode;
use crate::traits::ReferenceStore;
use tracing::debug;

/// Resolves a 6-digit postcode to province / city / district.
///
/// Postcodes ending in `00` denote city or district aggregates and are looked
/// up in the split-division table; all others go to the standard table. When
/// no exact row exists, the resolver retries with ever shorter prefixes
/// (5 digits down to `min_prefix_len`), preferring district rows over city
/// rows at each length.
#[derive(Debug, Clone, Copy)]
pub struct PostcodeResolver {
    min_prefix_len: usize,
}

impl Default for PostcodeResolver {
    fn default() -> Self {
        Self { min_prefix_len: 3 }
    }
}

impl PostcodeResolver {
    pub fn new(min_prefix_len: usize) -> Self {
        Self {
            min_prefix_len: min_prefix_len.clamp(1, PipelineConfig::MAX_PREFIX_LEN),
        }
    }

    /// Prefix lengths in the order they are tried: longest first.
    fn prefix_lengths(&self) -> impl Iterator<Item = usize> {
        (self.min_prefix_len..=PipelineConfig::MAX_PREFIX_LEN).rev()
    }

    /// Runs the tier ladder. Input that is not exactly six ASCII digits, and
    /// postcodes no tier can place, come back as [`Level::None`].
    pub fn resolve<S: ReferenceStore + ?Sized>(
        &self,
        store: &S,
        postcode: &str,
    ) -> Result<ResolvedLocation> {
        if !is_postcode(postcode) {
            return Ok(ResolvedLocation::default());
        }

        let location = if postcode.ends_with("00") {
            self.resolve_split(store, postcode)?
        } else {
            self.resolve_standard(store, postcode)?
        };

        match location {
            Some(loc) if !loc.is_empty() => {
                debug!(postcode, level = %loc.level, note = %loc.source_note, "postcode resolved");
                Ok(loc)
            }
            _ => {
                debug!(postcode, "postcode not found");
                Ok(ResolvedLocation::default())
            }
        }
    }

    fn resolve_split<S: ReferenceStore + ?Sized>(
        &self,
        store: &S,
        postcode: &str,
    ) -> Result<Option<ResolvedLocation>> {
        if let Some(row) = store.split_by_area_postcode(postcode)? {
            return Ok(Some(area_location(row, SourceNote::AreaExact)));
        }
        if let Some(row) = store.split_by_city_postcode(postcode)? {
            return Ok(Some(city_location(row, SourceNote::CityExact)));
        }
        for len in self.prefix_lengths() {
            let prefix = &postcode[..len];
            if let Some(row) = store.split_by_area_prefix(prefix)? {
                return Ok(Some(area_location(row, SourceNote::LikeArea(len))));
            }
            if let Some(row) = store.split_by_city_prefix(prefix)? {
                return Ok(Some(city_location(row, SourceNote::LikeCity(len))));
            }
        }
        Ok(None)
    }

    fn resolve_standard<S: ReferenceStore + ?Sized>(
        &self,
        store: &S,
        postcode: &str,
    ) -> Result<Option<ResolvedLocation>> {
        if let Some(row) = store.standard_by_postcode(postcode)? {
            return Ok(Some(std_location(row, SourceNote::StdExact)));
        }
        for len in self.prefix_lengths() {
            if let Some(row) = store.standard_by_prefix(&postcode[..len])? {
                return Ok(Some(std_location(row, SourceNote::LikeStd(len))));
            }
        }
        Ok(None)
    }
}

fn area_location(row: SplitDivisionEntry, note: SourceNote) -> ResolvedLocation {
    ResolvedLocation {
        province: row.province,
        city: row.city,
        district: row.area,
        address: String::new(),
        level: Level::Area,
        source_note: note,
    }
}

/// City-level rows never carry a district, even if the row names one.
fn city_location(row: SplitDivisionEntry, note: SourceNote) -> ResolvedLocation {
    ResolvedLocation {
        province: row.province,
        city: row.city,
        district: String::new(),
        address: String::new(),
        level: Level::City,
        source_note: note,
    }
}

fn std_location(row: StandardPostcodeEntry, note: SourceNote) -> ResolvedLocation {
    ResolvedLocation {
        province: row.province,
        city: row.city,
        district: row.district,
        address: row.address,
        level: Level::Std,
        source_note: note,
    }
}
