// crates/cnpost-core/src/resolve/alias.rs
use crate::alias::AliasTable;
use crate::model::{AliasHit, AliasResolution};
use crate::text::{core_name, normalize};
use tracing::debug;

/// Canonicalizes a raw district name through the alias table.
///
/// Tiers, each tried only when the previous ones found nothing:
/// 1. `pa`: exact `(province, district)`
/// 2. `pa_core` / `pa_core_contains`: first province alias whose core name
///    equals, contains, or is contained in the district's core name
/// 3. `pca`: exact `(province, city, district)`, only with a city
/// 4. `pca_core`: first city alias with an identical core name, only with a city
///
/// The scans in tiers 2 and 4 follow alias file order; the first candidate
/// wins even when a later one would match more closely.
#[derive(Debug, Clone, Copy)]
pub struct AliasResolver<'a> {
    table: &'a AliasTable,
    suffixes: &'a [String],
}

impl<'a> AliasResolver<'a> {
    pub fn new(table: &'a AliasTable, suffixes: &'a [String]) -> Self {
        Self { table, suffixes }
    }

    pub fn resolve(&self, province: &str, city: &str, district: &str) -> AliasResolution {
        let province_n = normalize(province);
        let city_n = normalize(city);
        let district_n = normalize(district);

        let hit = if district_n.is_empty() {
            None
        } else {
            self.find(&province_n, &city_n, &district_n)
        };

        match hit {
            Some((target, hit)) => {
                debug!(province, city, district, target = %target, hit = %hit, "alias applied");
                AliasResolution {
                    canonical_district: target,
                    hit,
                }
            }
            None => AliasResolution {
                canonical_district: district.to_string(),
                hit: AliasHit::None,
            },
        }
    }

    fn find(&self, province: &str, city: &str, district: &str) -> Option<(String, AliasHit)> {
        let table = self.table;

        if let Some(target) = table.province_target(province, district) {
            return Some((target.to_string(), AliasHit::Pa));
        }

        let core = core_name(district, self.suffixes);
        if !core.is_empty() {
            for (alias, target) in table.province_aliases(province) {
                let alias_core = core_name(alias, self.suffixes);
                if alias_core == core {
                    return Some((target.to_string(), AliasHit::PaCore));
                }
                if alias_core.contains(core) || core.contains(alias_core) {
                    return Some((target.to_string(), AliasHit::PaCoreContains));
                }
            }
        }

        if city.is_empty() {
            return None;
        }

        if let Some(target) = table.city_target(province, city, district) {
            return Some((target.to_string(), AliasHit::Pca));
        }

        if !core.is_empty() {
            for (alias, target) in table.city_aliases(province, city) {
                if core_name(alias, self.suffixes) == core {
                    return Some((target.to_string(), AliasHit::PcaCore));
                }
            }
        }

        None
    }
}
