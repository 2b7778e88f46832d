// crates/cnpost-core/src/common.rs
use serde::{Deserialize, Serialize};

/// Simple aggregate statistics for the reference database.
///
/// Returned by [`ReferenceDb::stats`](crate::ReferenceDb::stats). Row counts
/// are taken after load; the postcode counts are distinct indexed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStats {
    pub split_divisions: usize,
    pub area_postcodes: usize,
    pub city_postcodes: usize,
    pub standard_postcodes: usize,
    pub admin_codes: usize,
}
