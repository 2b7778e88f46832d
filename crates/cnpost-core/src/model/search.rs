// crates/cnpost-core/src/model/search.rs
use crate::error::Result;
use crate::model::reference::{
    AdminCodeEntry, ReferenceDb, SplitDivisionEntry, StandardPostcodeEntry,
};
use crate::traits::ReferenceStore;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Smallest key starting with `prefix`, as a row position.
fn first_with_prefix(index: &BTreeMap<String, usize>, prefix: &str) -> Option<usize> {
    if prefix.is_empty() {
        return None;
    }
    index
        .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
        .next()
        .filter(|(key, _)| key.starts_with(prefix))
        .map(|(_, &row)| row)
}

impl ReferenceDb {
    fn split_row(&self, row: Option<usize>) -> Option<SplitDivisionEntry> {
        row.and_then(|i| self.tables.splits.get(i)).cloned()
    }

    fn standard_row(&self, row: Option<usize>) -> Option<StandardPostcodeEntry> {
        row.and_then(|i| self.tables.standard.get(i)).cloned()
    }

    fn code_row(&self, row: Option<usize>) -> Option<AdminCodeEntry> {
        row.and_then(|i| self.tables.codes.get(i)).cloned()
    }

    fn first_code_containing<'a>(
        &self,
        rows: impl IntoIterator<Item = &'a usize>,
        core: &str,
    ) -> Option<AdminCodeEntry> {
        if core.is_empty() {
            return None;
        }
        rows.into_iter()
            .filter_map(|&i| self.tables.codes.get(i))
            .find(|row| row.area.contains(core))
            .cloned()
    }
}

impl ReferenceStore for ReferenceDb {
    fn split_by_area_postcode(&self, postcode: &str) -> Result<Option<SplitDivisionEntry>> {
        Ok(self.split_row(self.area_postcodes.get(postcode).copied()))
    }

    fn split_by_city_postcode(&self, postcode: &str) -> Result<Option<SplitDivisionEntry>> {
        Ok(self.split_row(self.city_postcodes.get(postcode).copied()))
    }

    fn split_by_area_prefix(&self, prefix: &str) -> Result<Option<SplitDivisionEntry>> {
        Ok(self.split_row(first_with_prefix(&self.area_postcodes, prefix)))
    }

    fn split_by_city_prefix(&self, prefix: &str) -> Result<Option<SplitDivisionEntry>> {
        Ok(self.split_row(first_with_prefix(&self.city_postcodes, prefix)))
    }

    fn standard_by_postcode(&self, postcode: &str) -> Result<Option<StandardPostcodeEntry>> {
        Ok(self.standard_row(self.std_postcodes.get(postcode).copied()))
    }

    fn standard_by_prefix(&self, prefix: &str) -> Result<Option<StandardPostcodeEntry>> {
        Ok(self.standard_row(first_with_prefix(&self.std_postcodes, prefix)))
    }

    fn code_by_pca(
        &self,
        province: &str,
        city: &str,
        area: &str,
    ) -> Result<Option<AdminCodeEntry>> {
        let key = (province.to_string(), city.to_string(), area.to_string());
        Ok(self.code_row(self.codes_by_pca.get(&key).copied()))
    }

    fn code_by_pc_area_containing(
        &self,
        province: &str,
        city: &str,
        core: &str,
    ) -> Result<Option<AdminCodeEntry>> {
        let key = (province.to_string(), city.to_string());
        Ok(self
            .codes_in_city
            .get(&key)
            .and_then(|rows| self.first_code_containing(rows, core)))
    }

    fn code_by_pa(&self, province: &str, area: &str) -> Result<Option<AdminCodeEntry>> {
        let key = (province.to_string(), area.to_string());
        Ok(self.code_row(self.codes_by_pa.get(&key).copied()))
    }

    fn code_by_p_area_containing(
        &self,
        province: &str,
        core: &str,
    ) -> Result<Option<AdminCodeEntry>> {
        Ok(self
            .codes_in_province
            .get(province)
            .and_then(|rows| self.first_code_containing(rows, core)))
    }

    fn code_by_pc(&self, province: &str, city: &str) -> Result<Option<AdminCodeEntry>> {
        let key = (province.to_string(), city.to_string());
        Ok(self.code_row(self.codes_by_pc.get(&key).copied()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::reference::ReferenceTables;

    fn split(area: &str, area_pc: &str, city_pc: &str) -> SplitDivisionEntry {
        SplitDivisionEntry {
            province: "广东省".into(),
            city: "广州市".into(),
            area: area.into(),
            area_postcode: area_pc.into(),
            city_postcode: city_pc.into(),
        }
    }

    fn code(city: &str, area: &str, area_code: &str) -> AdminCodeEntry {
        AdminCodeEntry {
            province: "广东省".into(),
            city: city.into(),
            area: area.into(),
            province_code: "440000".into(),
            city_code: "440100".into(),
            area_code: area_code.into(),
        }
    }

    #[test]
    fn prefix_probe_returns_smallest_matching_postcode() {
        let db = ReferenceDb::from_tables(ReferenceTables {
            splits: vec![
                split("海珠区", "510220", ""),
                split("越秀区", "510030", ""),
                split("荔湾区", "510100", ""),
            ],
            ..ReferenceTables::default()
        });
        let hit = db.split_by_area_prefix("510").unwrap().unwrap();
        assert_eq!(hit.area, "越秀区");
        let hit = db.split_by_area_prefix("5102").unwrap().unwrap();
        assert_eq!(hit.area, "海珠区");
        assert!(db.split_by_area_prefix("5103").unwrap().is_none());
        assert!(db.split_by_area_prefix("").unwrap().is_none());
    }

    #[test]
    fn prefix_probe_skips_smaller_non_matching_keys() {
        let db = ReferenceDb::from_tables(ReferenceTables {
            splits: vec![split("", "", "510000"), split("", "", "511400")],
            ..ReferenceTables::default()
        });
        let hit = db.split_by_city_prefix("5114").unwrap().unwrap();
        assert_eq!(hit.city_postcode, "511400");
    }

    #[test]
    fn substring_probe_follows_source_order() {
        let db = ReferenceDb::from_tables(ReferenceTables {
            codes: vec![
                code("广州市", "天河区", "440106"),
                code("广州市", "天河北区", "440199"),
            ],
            ..ReferenceTables::default()
        });
        let hit = db
            .code_by_pc_area_containing("广东省", "广州市", "天河")
            .unwrap()
            .unwrap();
        assert_eq!(hit.area_code, "440106");
        assert!(db
            .code_by_p_area_containing("广东省", "")
            .unwrap()
            .is_none());
    }

    #[test]
    fn composite_keys_do_not_collide_on_delimiters() {
        let db = ReferenceDb::from_tables(ReferenceTables {
            codes: vec![code("a|b", "c", "1"), code("a", "b|c", "2")],
            ..ReferenceTables::default()
        });
        let hit = db.code_by_pca("广东省", "a", "b|c").unwrap().unwrap();
        assert_eq!(hit.area_code, "2");
    }
}
