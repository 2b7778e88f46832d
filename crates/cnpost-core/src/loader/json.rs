// crates/cnpost-core/src/loader/json.rs

// ---------------------------------------------------------------------------
// FILE GUARD: This entire file is skipped if 'json' feature is missing.
// ---------------------------------------------------------------------------
#![cfg(feature = "json")]

use crate::error::Result;
use serde::de::DeserializeOwned;
use std::io::Read;

/// Reads a JSON array of row objects. Missing fields default to empty.
pub fn read_rows<T: DeserializeOwned>(reader: impl Read) -> Result<Vec<T>> {
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AdminCodeEntry, SplitDivisionEntry};

    #[test]
    fn legacy_field_names_are_accepted() {
        let data = r#"[{"province":"北京市","city":"北京市","district":"东城区","areapostcode":"100010"}]"#;
        let rows: Vec<SplitDivisionEntry> = read_rows(data.as_bytes()).unwrap();
        assert_eq!(rows[0].area, "东城区");
        assert_eq!(rows[0].area_postcode, "100010");
        assert_eq!(rows[0].city_postcode, "");
    }

    #[test]
    fn malformed_json_is_an_error() {
        let res: Result<Vec<AdminCodeEntry>> = read_rows("[{".as_bytes());
        assert!(res.is_err());
    }
}
