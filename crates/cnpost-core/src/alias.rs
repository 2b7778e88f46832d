// crates/cnpost-core/src/alias.rs

//! # Alias Table
//!
//! Maps legacy or colloquial district names to their current canonical name.
//! Built once from a tab-separated file and read-only afterwards.
//!
//! Two indexes are derived from each row:
//! - `(province, alias) -> target_area` for every row
//! - `(province, city, alias) -> target_area` for rows that name a city
//!
//! Both keep the order in which keys first appeared in the file, which makes
//! the first-match scans of the alias resolver reproducible. A later row with
//! the same key overwrites the target but keeps the original position.

use crate::error::Result;
use crate::loader::common_io;
use crate::loader::tsv::{self, take, Column, TsvRow};
use crate::text::normalize;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// One row of the alias file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasEntry {
    pub province: String,
    pub city: String,
    pub alias: String,
    pub target_area: String,
}

impl TsvRow for AliasEntry {
    const COLUMNS: &'static [Column] = &[
        Column::optional(&["province"]),
        Column::optional(&["city"]),
        Column::optional(&["alias"]),
        Column::optional(&["target_area"]),
    ];

    fn from_fields(fields: Vec<String>) -> Self {
        let mut f = fields.into_iter();
        Self {
            province: take(&mut f),
            city: take(&mut f),
            alias: take(&mut f),
            target_area: take(&mut f),
        }
    }
}

/// Province-scoped alias key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProvinceAlias {
    pub province: String,
    pub alias: String,
}

/// City-scoped alias key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CityAlias {
    pub province: String,
    pub city: String,
    pub alias: String,
}

#[derive(Clone, Debug, Default)]
pub struct AliasTable {
    by_province: IndexMap<ProvinceAlias, String>,
    by_city: IndexMap<CityAlias, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from entries in file order.
    ///
    /// Fields are normalized; rows without a province, alias or target are
    /// skipped.
    pub fn from_entries<I: IntoIterator<Item = AliasEntry>>(entries: I) -> Self {
        let mut table = Self::default();
        for entry in entries {
            table.insert(&entry);
        }
        table
    }

    /// Adds a province-scoped alias. Empty keys or targets are ignored.
    pub fn insert_province_alias(&mut self, province: &str, alias: &str, target: &str) {
        let (province, alias, target) = (normalize(province), normalize(alias), normalize(target));
        if province.is_empty() || alias.is_empty() || target.is_empty() {
            return;
        }
        self.by_province.insert(ProvinceAlias { province, alias }, target);
    }

    /// Adds a city-scoped alias. Empty keys or targets are ignored.
    pub fn insert_city_alias(&mut self, province: &str, city: &str, alias: &str, target: &str) {
        let (province, city) = (normalize(province), normalize(city));
        let (alias, target) = (normalize(alias), normalize(target));
        if province.is_empty() || city.is_empty() || alias.is_empty() || target.is_empty() {
            return;
        }
        self.by_city.insert(CityAlias { province, city, alias }, target);
    }

    fn insert(&mut self, entry: &AliasEntry) {
        let province = normalize(&entry.province);
        let city = normalize(&entry.city);
        let alias = normalize(&entry.alias);
        let target = normalize(&entry.target_area);
        if province.is_empty() || alias.is_empty() || target.is_empty() {
            return;
        }
        if !city.is_empty() {
            self.by_city.insert(
                CityAlias {
                    province: province.clone(),
                    city,
                    alias: alias.clone(),
                },
                target.clone(),
            );
        }
        self.by_province
            .insert(ProvinceAlias { province, alias }, target);
    }

    /// Parses an alias file from any reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let table = tsv::read_table(reader)?;
        let entries: Vec<AliasEntry> = table.rows_as("aliases")?;
        Ok(Self::from_entries(entries))
    }

    /// Loads an alias file; a missing or unreadable file is an error.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = common_io::open_stream(path, "aliases")?;
        let table = Self::from_reader(BufReader::new(reader))?;
        info!(
            path = %path.display(),
            province_aliases = table.by_province.len(),
            city_aliases = table.by_city.len(),
            "loaded alias table"
        );
        Ok(table)
    }

    /// Loads an alias file, falling back to an empty table when the file is
    /// absent or cannot be read. Every district then passes through unchanged.
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load_from_path(path) {
            Ok(table) => table,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "alias file not usable, aliases disabled");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_province.is_empty() && self.by_city.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_province.len()
    }

    pub fn city_len(&self) -> usize {
        self.by_city.len()
    }

    /// Exact `(province, alias)` lookup on normalized keys.
    pub fn province_target(&self, province: &str, alias: &str) -> Option<&str> {
        self.by_province
            .get(&ProvinceAlias {
                province: province.to_string(),
                alias: alias.to_string(),
            })
            .map(String::as_str)
    }

    /// Exact `(province, city, alias)` lookup on normalized keys.
    pub fn city_target(&self, province: &str, city: &str, alias: &str) -> Option<&str> {
        self.by_city
            .get(&CityAlias {
                province: province.to_string(),
                city: city.to_string(),
                alias: alias.to_string(),
            })
            .map(String::as_str)
    }

    /// `(alias, target)` pairs of a province, in file order.
    pub fn province_aliases<'a>(
        &'a self,
        province: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.by_province
            .iter()
            .filter(move |(key, _)| key.province == province)
            .map(|(key, target)| (key.alias.as_str(), target.as_str()))
    }

    /// `(alias, target)` pairs of a (province, city), in file order.
    pub fn city_aliases<'a>(
        &'a self,
        province: &'a str,
        city: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.by_city
            .iter()
            .filter(move |(key, _)| key.province == province && key.city == city)
            .map(|(key, target)| (key.alias.as_str(), target.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const FILE: &str = "\u{FEFF}province\tcity\talias\ttarget_area\tnote\n\
        广东省\t\t穗城区\t越秀区\tmerged 1960\n\
        广东省\t广州市\t东山区\t越秀区\n\
        广东省\t\t芳村区\t荔湾区\n\
        \t\t无省区\t某区\n\
        广东省\t\t\t空别名\n";

    #[test]
    fn builds_both_indexes() {
        let table = AliasTable::from_reader(Cursor::new(FILE)).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.city_len(), 1);
        assert_eq!(table.province_target("广东省", "穗城区"), Some("越秀区"));
        assert_eq!(table.province_target("广东省", "东山区"), Some("越秀区"));
        assert_eq!(table.city_target("广东省", "广州市", "东山区"), Some("越秀区"));
        assert_eq!(table.city_target("广东省", "", "穗城区"), None);
    }

    #[test]
    fn header_order_does_not_matter() {
        let data = "target_area\talias\tprovince\n越秀区\t穗城区\t广东省\n";
        let table = AliasTable::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(table.province_target("广东省", "穗城区"), Some("越秀区"));
    }

    #[test]
    fn later_rows_overwrite_but_keep_position() {
        let data = "province\talias\ttarget_area\n\
                    广东省\t甲区\t一区\n\
                    广东省\t乙区\t二区\n\
                    广东省\t甲区\t三区\n";
        let table = AliasTable::from_reader(Cursor::new(data)).unwrap();
        let pairs: Vec<_> = table.province_aliases("广东省").collect();
        assert_eq!(pairs, vec![("甲区", "三区"), ("乙区", "二区")]);
    }

    #[test]
    fn fields_are_normalized() {
        let data = "province\talias\ttarget_area\n 广东省 \t穗城区（旧）\t越秀区\u{3000}\n";
        let table = AliasTable::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(table.province_target("广东省", "穗城区"), Some("越秀区"));
    }

    #[test]
    fn missing_file_degrades_to_empty_table() {
        let table = AliasTable::load_or_empty(Some(Path::new("/no/such/alias.tsv")));
        assert!(table.is_empty());
        assert!(AliasTable::load_or_empty(None).is_empty());
    }
}
