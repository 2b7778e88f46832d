// crates/cnpost-core/src/model/mod.rs
pub mod convert;
pub mod record;
pub mod reference;
pub mod search;

pub use record::{
    AliasHit, AliasResolution, CodeMatch, CodeResolution, Level, LocationEnrichment,
    PostcodeRecord, ResolvedLocation, SourceNote, Stage,
};
pub use reference::{
    AdminCodeEntry, ReferenceDb, ReferenceTables, SplitDivisionEntry, StandardPostcodeEntry,
};

#[cfg(not(feature = "compact"))]
pub const CACHE_SUFFIX: &str = "snap.bin";
#[cfg(feature = "compact")]
pub const CACHE_SUFFIX: &str = "snap.bin.gz";
