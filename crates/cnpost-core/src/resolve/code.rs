// crates/cnpost-core/src/resolve/code.rs
use crate::error::Result;
use crate::model::{AdminCodeEntry, CodeMatch, CodeResolution};
use crate::text::{core_name, normalize};
use crate::traits::ReferenceStore;
use tracing::debug;

/// Maps a (province, city, district) triple to administrative codes.
///
/// Tiers, from most to least specific, stopping at the first hit:
/// 1. full triple: exact `(province, city, area)`, then the first area of
///    `(province, city)` containing the district's core name (`fuzzy_pca`)
/// 2. province + district: exact `(province, area)`, then the first area of
///    the province containing the core name (`fuzzy_pa`)
/// 3. province + city: exact `(province, city)`, yielding no area code
///
/// A city code is only reported by tier 2 when a city was supplied, so a
/// complete code triple always comes from a complete input triple.
#[derive(Debug, Clone, Copy)]
pub struct CodeResolver<'a> {
    suffixes: &'a [String],
}

impl<'a> CodeResolver<'a> {
    pub fn new(suffixes: &'a [String]) -> Self {
        Self { suffixes }
    }

    pub fn resolve<S: ReferenceStore + ?Sized>(
        &self,
        store: &S,
        province: &str,
        city: &str,
        district: &str,
    ) -> Result<CodeResolution> {
        let province = normalize(province);
        let city = normalize(city);
        let district = normalize(district);
        let core = core_name(&district, self.suffixes);

        if province.is_empty() {
            return Ok(CodeResolution::default());
        }

        if !city.is_empty() && !district.is_empty() {
            if let Some(row) = store.code_by_pca(&province, &city, &district)? {
                return Ok(hit(row, CodeMatch::Exact, true, true));
            }
            if !core.is_empty() {
                if let Some(row) = store.code_by_pc_area_containing(&province, &city, core)? {
                    return Ok(hit(row, CodeMatch::FuzzyPca, true, true));
                }
            }
        }

        if !district.is_empty() {
            let with_city = !city.is_empty();
            if let Some(row) = store.code_by_pa(&province, &district)? {
                return Ok(hit(row, CodeMatch::Exact, with_city, true));
            }
            if !core.is_empty() {
                if let Some(row) = store.code_by_p_area_containing(&province, core)? {
                    return Ok(hit(row, CodeMatch::FuzzyPa, with_city, true));
                }
            }
        }

        if !city.is_empty() {
            if let Some(row) = store.code_by_pc(&province, &city)? {
                return Ok(hit(row, CodeMatch::Exact, true, false));
            }
        }

        debug!(%province, %city, %district, "no administrative code");
        Ok(CodeResolution::default())
    }
}

fn hit(row: AdminCodeEntry, matched: CodeMatch, city_code: bool, area_code: bool) -> CodeResolution {
    debug!(
        province = %row.province,
        city = %row.city,
        area = %row.area,
        matched = matched.as_str(),
        "administrative code matched"
    );
    CodeResolution {
        province_code: row.province_code,
        city_code: if city_code { row.city_code } else { String::new() },
        area_code: if area_code { row.area_code } else { String::new() },
        matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReferenceDb, ReferenceTables};
    use crate::text::DEFAULT_AREA_SUFFIXES;

    fn suffixes() -> Vec<String> {
        DEFAULT_AREA_SUFFIXES.iter().map(|s| s.to_string()).collect()
    }

    fn code(city: &str, area: &str, city_code: &str, area_code: &str) -> AdminCodeEntry {
        AdminCodeEntry {
            province: "广东省".into(),
            city: city.into(),
            area: area.into(),
            province_code: "440000".into(),
            city_code: city_code.into(),
            area_code: area_code.into(),
        }
    }

    fn db() -> ReferenceDb {
        ReferenceDb::from_tables(ReferenceTables {
            codes: vec![
                code("广州市", "", "440100", ""),
                code("广州市", "越秀区", "440100", "440104"),
                code("广州市", "天河区", "440100", "440106"),
                code("深圳市", "宝安区", "440300", "440306"),
            ],
            ..ReferenceTables::default()
        })
    }

    #[test]
    fn exact_triple() {
        let sfx = suffixes();
        let res = CodeResolver::new(&sfx)
            .resolve(&db(), "广东省", "广州市", "越秀区")
            .unwrap();
        assert_eq!(res.matched, CodeMatch::Exact);
        assert_eq!(
            (res.province_code.as_str(), res.city_code.as_str(), res.area_code.as_str()),
            ("440000", "440100", "440104")
        );
        assert!(res.is_complete());
    }

    #[test]
    fn fuzzy_within_city() {
        let sfx = suffixes();
        let res = CodeResolver::new(&sfx)
            .resolve(&db(), "广东省", "广州市", "天河县")
            .unwrap();
        assert_eq!(res.matched, CodeMatch::FuzzyPca);
        assert_eq!(res.area_code, "440106");
        assert_eq!(res.matched.note(), "fuzzy_pca");
    }

    #[test]
    fn province_level_match_when_city_disagrees() {
        let sfx = suffixes();
        let resolver = CodeResolver::new(&sfx);

        let res = resolver.resolve(&db(), "广东省", "广州市", "宝安区").unwrap();
        assert_eq!(res.matched, CodeMatch::Exact);
        assert_eq!(res.area_code, "440306");
        assert_eq!(res.city_code, "440300");

        let res = resolver.resolve(&db(), "广东省", "", "宝安县").unwrap();
        assert_eq!(res.matched, CodeMatch::FuzzyPa);
        assert_eq!(res.area_code, "440306");
        assert_eq!(res.city_code, "");
        assert!(!res.is_complete());
    }

    #[test]
    fn city_only_match_has_no_area_code() {
        let sfx = suffixes();
        let res = CodeResolver::new(&sfx)
            .resolve(&db(), "广东省", "广州市", "")
            .unwrap();
        assert_eq!(res.matched, CodeMatch::Exact);
        assert_eq!(res.province_code, "440000");
        assert_eq!(res.city_code, "440100");
        assert_eq!(res.area_code, "");
        assert!(!res.is_empty());
    }

    #[test]
    fn total_miss_is_empty() {
        let sfx = suffixes();
        let resolver = CodeResolver::new(&sfx);
        let res = resolver.resolve(&db(), "广东省", "珠海市", "香洲区").unwrap();
        assert!(res.is_empty());
        assert_eq!(res.matched, CodeMatch::None);
        assert_eq!(res.matched.note(), "");

        assert!(resolver.resolve(&db(), "", "广州市", "越秀区").unwrap().is_empty());
    }

    #[test]
    fn inputs_are_normalized() {
        let sfx = suffixes();
        let res = CodeResolver::new(&sfx)
            .resolve(&db(), " 广东省", "广州市\u{3000}", "越秀区（原东山区）")
            .unwrap();
        assert_eq!(res.area_code, "440104");
        assert_eq!(res.matched, CodeMatch::Exact);
    }
}
