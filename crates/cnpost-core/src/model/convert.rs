// crates/cnpost-core/src/model/convert.rs
use crate::common::DbStats;
use crate::model::reference::{
    AdminCodeEntry, ReferenceDb, ReferenceTables, SplitDivisionEntry, StandardPostcodeEntry,
};
use std::collections::BTreeMap;

/// Trims every field in place; the reference exports carry stray padding.
fn trim_in_place(s: &mut String) {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_string();
    }
}

fn tidy_split(row: &mut SplitDivisionEntry) {
    trim_in_place(&mut row.province);
    trim_in_place(&mut row.city);
    trim_in_place(&mut row.area);
    trim_in_place(&mut row.area_postcode);
    trim_in_place(&mut row.city_postcode);
}

fn tidy_standard(row: &mut StandardPostcodeEntry) {
    trim_in_place(&mut row.postcode);
    trim_in_place(&mut row.province);
    trim_in_place(&mut row.city);
    trim_in_place(&mut row.district);
    trim_in_place(&mut row.address);
}

fn tidy_code(row: &mut AdminCodeEntry) {
    trim_in_place(&mut row.province);
    trim_in_place(&mut row.city);
    trim_in_place(&mut row.area);
    trim_in_place(&mut row.province_code);
    trim_in_place(&mut row.city_code);
    trim_in_place(&mut row.area_code);
}

/// Records `key -> row` unless the key is empty or already present, so
/// duplicates resolve to the first row in source order.
fn index_first(index: &mut BTreeMap<String, usize>, key: &str, row: usize) {
    if !key.is_empty() {
        index.entry(key.to_string()).or_insert(row);
    }
}

impl ReferenceDb {
    /// **Standard Converter:** raw rows -> indexed database.
    pub fn from_tables(mut tables: ReferenceTables) -> Self {
        tables.splits.iter_mut().for_each(tidy_split);
        tables.standard.iter_mut().for_each(tidy_standard);
        tables.codes.iter_mut().for_each(tidy_code);

        let mut db = ReferenceDb::default();

        for (i, row) in tables.splits.iter().enumerate() {
            index_first(&mut db.area_postcodes, &row.area_postcode, i);
            index_first(&mut db.city_postcodes, &row.city_postcode, i);
        }

        for (i, row) in tables.standard.iter().enumerate() {
            index_first(&mut db.std_postcodes, &row.postcode, i);
        }

        for (i, row) in tables.codes.iter().enumerate() {
            let p = row.province.clone();
            let c = row.city.clone();
            let a = row.area.clone();

            if !a.is_empty() {
                db.codes_by_pca
                    .entry((p.clone(), c.clone(), a.clone()))
                    .or_insert(i);
                db.codes_by_pa.entry((p.clone(), a)).or_insert(i);
            }
            if !c.is_empty() {
                db.codes_by_pc.entry((p.clone(), c.clone())).or_insert(i);
            }
            db.codes_in_city.entry((p.clone(), c)).or_default().push(i);
            db.codes_in_province.entry(p).or_default().push(i);
        }

        db.tables = tables;
        db
    }

    pub fn stats(&self) -> DbStats {
        DbStats {
            split_divisions: self.tables.splits.len(),
            area_postcodes: self.area_postcodes.len(),
            city_postcodes: self.city_postcodes.len(),
            standard_postcodes: self.tables.standard.len(),
            admin_codes: self.tables.codes.len(),
        }
    }
}
