// crates/cnpost-core/src/model/reference.rs
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One row of the split-division table: a district (or a city-only row) with
/// the postcodes assigned to it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitDivisionEntry {
    pub province: String,
    pub city: String,
    #[serde(alias = "district")]
    pub area: String,
    #[serde(alias = "areapostcode")]
    pub area_postcode: String,
    #[serde(alias = "citypostcode")]
    pub city_postcode: String,
}

/// One row of the standard postcode table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardPostcodeEntry {
    pub postcode: String,
    pub province: String,
    pub city: String,
    #[serde(alias = "area")]
    pub district: String,
    pub address: String,
}

/// One row of the administrative code table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminCodeEntry {
    pub province: String,
    pub city: String,
    #[serde(alias = "district")]
    pub area: String,
    pub province_code: String,
    pub city_code: String,
    #[serde(alias = "district_code")]
    pub area_code: String,
}

/// Raw reference rows, in source order. This is what snapshots persist.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub splits: Vec<SplitDivisionEntry>,
    pub standard: Vec<StandardPostcodeEntry>,
    pub codes: Vec<AdminCodeEntry>,
}

/// In-memory reference database.
///
/// Rows are kept in source order; every index stores row positions. Postcode
/// indexes are ordered so prefix probes are range scans, and composite keys
/// are tuples rather than joined strings.
///
/// Built once through [`ReferenceDb::from_tables`] (see `convert.rs`) and
/// never mutated afterwards, so it can be shared freely between threads.
#[derive(Clone, Debug, Default)]
pub struct ReferenceDb {
    pub(crate) tables: ReferenceTables,

    /// area_postcode -> first split row carrying it.
    pub(crate) area_postcodes: BTreeMap<String, usize>,
    /// city_postcode -> first split row carrying it.
    pub(crate) city_postcodes: BTreeMap<String, usize>,
    /// postcode -> first standard row carrying it.
    pub(crate) std_postcodes: BTreeMap<String, usize>,

    pub(crate) codes_by_pca: HashMap<(String, String, String), usize>,
    pub(crate) codes_by_pa: HashMap<(String, String), usize>,
    pub(crate) codes_by_pc: HashMap<(String, String), usize>,
    /// Code rows per province, in source order (substring scans).
    pub(crate) codes_in_province: HashMap<String, Vec<usize>>,
    /// Code rows per (province, city), in source order (substring scans).
    pub(crate) codes_in_city: HashMap<(String, String), Vec<usize>>,
}

impl ReferenceDb {
    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn into_tables(self) -> ReferenceTables {
        self.tables
    }
}
