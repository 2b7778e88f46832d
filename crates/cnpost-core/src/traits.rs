// crates/cnpost-core/src/traits.rs
use crate::error::Result;
use crate::model::{AdminCodeEntry, SplitDivisionEntry, StandardPostcodeEntry};

/// Read-only access to the reference datasets.
///
/// The resolvers only ever talk to the data through this trait, so the same
/// tier logic runs against the in-memory [`ReferenceDb`](crate::ReferenceDb)
/// or against an external store. Every probe is fallible: a store that cannot
/// answer must return [`CnPostError::ReferenceUnavailable`] instead of
/// pretending the row does not exist.
///
/// Ordering contract shared by all implementations:
/// - exact probes return the first row in source order carrying the key
/// - prefix probes return the row with the smallest matching postcode
/// - substring probes return the first matching row in source order
///
/// [`CnPostError::ReferenceUnavailable`]: crate::CnPostError::ReferenceUnavailable
pub trait ReferenceStore: Send + Sync {
    /// Split-division row whose `area_postcode` equals `postcode`.
    fn split_by_area_postcode(&self, postcode: &str) -> Result<Option<SplitDivisionEntry>>;

    /// Split-division row whose `city_postcode` equals `postcode`.
    fn split_by_city_postcode(&self, postcode: &str) -> Result<Option<SplitDivisionEntry>>;

    /// Split-division row with the smallest `area_postcode` starting with `prefix`.
    fn split_by_area_prefix(&self, prefix: &str) -> Result<Option<SplitDivisionEntry>>;

    /// Split-division row with the smallest `city_postcode` starting with `prefix`.
    fn split_by_city_prefix(&self, prefix: &str) -> Result<Option<SplitDivisionEntry>>;

    fn standard_by_postcode(&self, postcode: &str) -> Result<Option<StandardPostcodeEntry>>;

    fn standard_by_prefix(&self, prefix: &str) -> Result<Option<StandardPostcodeEntry>>;

    /// Code row for the exact `(province, city, area)` triple.
    fn code_by_pca(&self, province: &str, city: &str, area: &str)
        -> Result<Option<AdminCodeEntry>>;

    /// First code row in `(province, city)` whose area contains `core`.
    fn code_by_pc_area_containing(
        &self,
        province: &str,
        city: &str,
        core: &str,
    ) -> Result<Option<AdminCodeEntry>>;

    /// Code row for the exact `(province, area)` pair.
    fn code_by_pa(&self, province: &str, area: &str) -> Result<Option<AdminCodeEntry>>;

    /// First code row in `province` whose area contains `core`.
    fn code_by_p_area_containing(
        &self,
        province: &str,
        core: &str,
    ) -> Result<Option<AdminCodeEntry>>;

    /// Code row for the exact `(province, city)` pair.
    fn code_by_pc(&self, province: &str, city: &str) -> Result<Option<AdminCodeEntry>>;
}
