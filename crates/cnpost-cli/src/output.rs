//! JSON responses for single lookups and TSV rendering for batches.

use cnpost_core::{
    AliasHit, LocationEnrichment, Pipeline, PostcodeRecord, ReferenceStore, Stage,
};
use serde::Serialize;
use std::io::{self, Write};

/// Outcome of a single lookup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    Ok,
    MissingPostcode,
    MalformedPostcode,
    NotFound,
}

impl LookupStatus {
    pub fn message(&self) -> &'static str {
        match self {
            LookupStatus::Ok => "OK",
            LookupStatus::MissingPostcode => "missing postcode",
            LookupStatus::MalformedPostcode => "malformed postcode, expected 6 digits",
            LookupStatus::NotFound => "no matching postcode found",
        }
    }

    /// Process exit code: 0 on success, 1 when nothing matched, 2 for bad input.
    pub fn exit_code(&self) -> u8 {
        match self {
            LookupStatus::Ok => 0,
            LookupStatus::NotFound => 1,
            LookupStatus::MissingPostcode | LookupStatus::MalformedPostcode => 2,
        }
    }
}

/// `{success, message, data}` envelope printed by `cnpost lookup`.
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: Option<LookupData>,
    #[serde(skip)]
    pub status: LookupStatus,
}

/// A resolved record with empty fields rendered as `null`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LookupData {
    pub postcode: String,
    pub province: Option<String>,
    pub city: Option<String>,
    pub area: Option<String>,
    /// District after alias canonicalization.
    pub final_area: Option<String>,
    pub level: Option<String>,
    pub source_note: Option<String>,
    /// Alias target, only set when an alias applied.
    pub new_area: Option<String>,
    pub alias_hit: Option<String>,
    pub address: Option<String>,
    pub province_code: Option<String>,
    pub city_code: Option<String>,
    pub area_code: Option<String>,
    pub code_match_note: Option<String>,
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

impl From<&PostcodeRecord> for LookupData {
    fn from(rec: &PostcodeRecord) -> Self {
        let aliased = rec.alias_hit != AliasHit::None;
        Self {
            postcode: rec.postcode.clone(),
            province: non_empty(&rec.province),
            city: non_empty(&rec.city),
            area: non_empty(&rec.district),
            final_area: non_empty(&rec.canonical_district),
            level: non_empty(rec.level.as_str()),
            source_note: non_empty(&rec.source_note.to_string()),
            new_area: if aliased { non_empty(&rec.canonical_district) } else { None },
            alias_hit: if aliased { Some(rec.alias_hit.to_string()) } else { None },
            address: non_empty(&rec.address),
            province_code: non_empty(&rec.province_code),
            city_code: non_empty(&rec.city_code),
            area_code: non_empty(&rec.area_code),
            code_match_note: non_empty(rec.code_match.note()),
        }
    }
}

impl LookupResponse {
    fn failure(status: LookupStatus) -> Self {
        Self {
            success: false,
            message: status.message(),
            data: None,
            status,
        }
    }

    /// Validates `raw`, resolves it and wraps the outcome.
    ///
    /// Only reference-store failures are errors; bad input and unknown
    /// postcodes become unsuccessful responses.
    pub fn lookup<S: ReferenceStore>(
        pipeline: &Pipeline<S>,
        raw: &str,
    ) -> cnpost_core::Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::failure(LookupStatus::MissingPostcode));
        }
        let Some(postcode) = cnpost_core::text::extract_postcode(raw) else {
            return Ok(Self::failure(LookupStatus::MalformedPostcode));
        };
        let record = pipeline.resolve(&postcode)?;
        if !record.is_resolved() {
            return Ok(Self::failure(LookupStatus::NotFound));
        }
        Ok(Self {
            success: true,
            message: LookupStatus::Ok.message(),
            data: Some(LookupData::from(&record)),
            status: LookupStatus::Ok,
        })
    }
}

/// JSON view of [`LocationEnrichment`] printed by `cnpost locate`.
#[derive(Debug, Serialize)]
pub struct LocateResponse<'a> {
    pub province: &'a str,
    pub city: &'a str,
    pub district: &'a str,
    pub final_area: &'a str,
    pub alias_hit: &'static str,
    pub province_code: Option<String>,
    pub city_code: Option<String>,
    pub area_code: Option<String>,
    pub code_match: &'static str,
}

impl<'a> From<&'a LocationEnrichment> for LocateResponse<'a> {
    fn from(e: &'a LocationEnrichment) -> Self {
        Self {
            province: &e.province,
            city: &e.city,
            district: &e.district,
            final_area: &e.alias.canonical_district,
            alias_hit: e.alias.hit.as_str(),
            province_code: non_empty(&e.codes.province_code),
            city_code: non_empty(&e.codes.city_code),
            area_code: non_empty(&e.codes.area_code),
            code_match: e.codes.matched.as_str(),
        }
    }
}

/// Writes records as TSV with the column set of `stage`.
pub fn write_tsv<W: Write>(
    mut out: W,
    records: &[PostcodeRecord],
    stage: Stage,
    header: bool,
) -> io::Result<()> {
    if header {
        writeln!(out, "{}", PostcodeRecord::columns(stage).join("\t"))?;
    }
    for rec in records {
        writeln!(out, "{}", rec.row(stage).join("\t"))?;
    }
    out.flush()
}
