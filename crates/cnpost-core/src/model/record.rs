// crates/cnpost-core/src/model/record.rs
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Granularity reached by the postcode resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// District-level row of the split-division table.
    Area,
    /// City-level row of the split-division table.
    City,
    /// Row of the standard postcode table.
    Std,
    /// Nothing matched; the record is terminal.
    #[default]
    None,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Area => "area",
            Level::City => "city",
            Level::Std => "std",
            Level::None => "none",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tier of the postcode resolver produced the location.
///
/// Prefix tiers carry the prefix length that matched (`like_area_p4` etc).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SourceNote {
    #[default]
    None,
    AreaExact,
    CityExact,
    LikeArea(usize),
    LikeCity(usize),
    StdExact,
    LikeStd(usize),
}

impl fmt::Display for SourceNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceNote::None => Ok(()),
            SourceNote::AreaExact => f.write_str("area_exact"),
            SourceNote::CityExact => f.write_str("city_exact"),
            SourceNote::LikeArea(len) => write!(f, "like_area_p{len}"),
            SourceNote::LikeCity(len) => write!(f, "like_city_p{len}"),
            SourceNote::StdExact => f.write_str("std_exact"),
            SourceNote::LikeStd(len) => write!(f, "like_std_p{len}"),
        }
    }
}

impl Serialize for SourceNote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Which alias tier canonicalized the district, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasHit {
    #[default]
    None,
    Pa,
    PaCore,
    PaCoreContains,
    Pca,
    PcaCore,
}

impl AliasHit {
    pub fn as_str(&self) -> &'static str {
        match self {
            AliasHit::None => "none",
            AliasHit::Pa => "pa",
            AliasHit::PaCore => "pa_core",
            AliasHit::PaCoreContains => "pa_core_contains",
            AliasHit::Pca => "pca",
            AliasHit::PcaCore => "pca_core",
        }
    }

    /// `true` for the tiers that are scoped by city.
    pub fn is_city_scoped(&self) -> bool {
        matches!(self, AliasHit::Pca | AliasHit::PcaCore)
    }
}

impl fmt::Display for AliasHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the administrative codes were found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeMatch {
    Exact,
    FuzzyPca,
    FuzzyPa,
    #[default]
    None,
}

impl CodeMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeMatch::Exact => "exact",
            CodeMatch::FuzzyPca => "fuzzy_pca",
            CodeMatch::FuzzyPa => "fuzzy_pa",
            CodeMatch::None => "none",
        }
    }

    /// The annotation written to the `code_match_note` column.
    ///
    /// Exact matches are unannotated, and so is a total miss: callers tell
    /// those apart by looking at which code fields are filled.
    pub fn note(&self) -> &'static str {
        match self {
            CodeMatch::FuzzyPca => "fuzzy_pca",
            CodeMatch::FuzzyPa => "fuzzy_pa",
            CodeMatch::Exact | CodeMatch::None => "",
        }
    }
}

/// Pipeline stage a run stops after. Each stage includes the previous ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Resolve,
    Alias,
    #[default]
    Codes,
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resolve" => Ok(Stage::Resolve),
            "alias" => Ok(Stage::Alias),
            "codes" => Ok(Stage::Codes),
            other => Err(format!(
                "unknown stage '{other}' (expected resolve, alias or codes)"
            )),
        }
    }
}

/// Output of the postcode resolver for one postcode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub province: String,
    pub city: String,
    pub district: String,
    pub address: String,
    pub level: Level,
    pub source_note: SourceNote,
}

impl ResolvedLocation {
    pub fn is_empty(&self) -> bool {
        self.province.is_empty() && self.city.is_empty() && self.district.is_empty()
    }
}

/// Output of the alias resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AliasResolution {
    pub canonical_district: String,
    pub hit: AliasHit,
}

impl AliasResolution {
    /// The alias target, or `None` when no alias applied.
    pub fn target(&self) -> Option<&str> {
        (self.hit != AliasHit::None).then_some(self.canonical_district.as_str())
    }
}

/// Output of the code resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeResolution {
    pub province_code: String,
    pub city_code: String,
    pub area_code: String,
    pub matched: CodeMatch,
}

impl CodeResolution {
    /// `true` when no code at all was found.
    pub fn is_empty(&self) -> bool {
        self.province_code.is_empty() && self.city_code.is_empty() && self.area_code.is_empty()
    }

    /// `true` when all three codes are present.
    pub fn is_complete(&self) -> bool {
        !self.province_code.is_empty() && !self.city_code.is_empty() && !self.area_code.is_empty()
    }
}

/// Alias and code results for a location supplied from outside the postcode
/// resolver (e.g. a geocoder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationEnrichment {
    pub province: String,
    pub city: String,
    pub district: String,
    pub alias: AliasResolution,
    pub codes: CodeResolution,
}

/// The unit of work flowing through the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostcodeRecord {
    pub postcode: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub level: Level,
    pub source_note: SourceNote,
    pub canonical_district: String,
    pub alias_hit: AliasHit,
    pub province_code: String,
    pub city_code: String,
    pub area_code: String,
    pub code_match: CodeMatch,
    pub address: String,
}

const RESOLVE_COLUMNS: [&str; 6] = ["postcode", "province", "city", "district", "level", "source_note"];
const ALIAS_COLUMNS: [&str; 2] = ["canonical_district", "alias_hit"];
const CODE_COLUMNS: [&str; 4] = ["province_code", "city_code", "area_code", "code_match_note"];

impl PostcodeRecord {
    /// A fresh, unresolved record for `postcode`.
    pub fn new(postcode: impl Into<String>) -> Self {
        Self {
            postcode: postcode.into(),
            ..Self::default()
        }
    }

    /// The all-empty record produced for input that carries no usable postcode.
    pub fn malformed() -> Self {
        Self::default()
    }

    pub fn is_malformed(&self) -> bool {
        self.postcode.is_empty()
    }

    pub fn is_resolved(&self) -> bool {
        self.level != Level::None
    }

    /// Copies the resolver output into the record. An empty location leaves
    /// the record at [`Level::None`].
    pub fn apply_location(&mut self, location: ResolvedLocation) {
        if location.is_empty() || location.level == Level::None {
            return;
        }
        self.province = location.province;
        self.city = location.city;
        self.district = location.district;
        self.address = location.address;
        self.level = location.level;
        self.source_note = location.source_note;
        self.canonical_district = self.district.clone();
    }

    pub fn apply_alias(&mut self, alias: AliasResolution) {
        self.canonical_district = alias.canonical_district;
        self.alias_hit = alias.hit;
    }

    pub fn apply_codes(&mut self, codes: CodeResolution) {
        self.province_code = codes.province_code;
        self.city_code = codes.city_code;
        self.area_code = codes.area_code;
        self.code_match = codes.matched;
    }

    /// Column names emitted for `stage`.
    pub fn columns(stage: Stage) -> Vec<&'static str> {
        let mut cols = RESOLVE_COLUMNS.to_vec();
        if stage >= Stage::Alias {
            cols.extend(ALIAS_COLUMNS);
        }
        if stage >= Stage::Codes {
            cols.extend(CODE_COLUMNS);
        }
        cols
    }

    /// Field values in the order of [`PostcodeRecord::columns`].
    pub fn row(&self, stage: Stage) -> Vec<String> {
        if self.is_malformed() {
            return vec![String::new(); Self::columns(stage).len()];
        }
        let mut row = vec![
            self.postcode.clone(),
            self.province.clone(),
            self.city.clone(),
            self.district.clone(),
            self.level.to_string(),
            self.source_note.to_string(),
        ];
        if stage >= Stage::Alias {
            row.push(self.canonical_district.clone());
            row.push(self.alias_hit.to_string());
        }
        if stage >= Stage::Codes {
            row.push(self.province_code.clone());
            row.push(self.city_code.clone());
            row.push(self.area_code.clone());
            row.push(self.code_match.note().to_string());
        }
        row
    }
}
