// crates/cnpost-core/src/resolve/mod.rs

//! The three resolution stages. Each one is a small, copyable value holding
//! its configuration; reference data is passed in per call.

pub mod alias;
pub mod code;
pub mod postcode;

pub use alias::AliasResolver;
pub use code::CodeResolver;
pub use postcode::PostcodeResolver;
