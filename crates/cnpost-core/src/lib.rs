// crates/cnpost-core/src/lib.rs

pub mod alias; // Alias file + ordered indexes
pub mod common;
pub mod config;
pub mod error;
pub mod loader; // TSV / JSON / snapshot readers
pub mod model; // Records + in-memory reference database
pub mod pipeline;
pub mod resolve; // The three tier ladders
pub mod text; // normalize, core_name, postcode extraction
pub mod traits;

// Re-exports
pub use crate::error::{CnPostError, Result};
pub use model::*;
pub use crate::alias::{AliasEntry, AliasTable};
pub use crate::common::DbStats;
pub use crate::config::{DataPaths, PipelineConfig};
pub use crate::pipeline::Pipeline;
pub use crate::resolve::{AliasResolver, CodeResolver, PostcodeResolver};
// Export the store trait (needed to call the probes directly)
pub use crate::traits::ReferenceStore;
#[cfg(feature = "builder")]
pub use crate::loader::builder::{build_snapshot, CompressionMode};
