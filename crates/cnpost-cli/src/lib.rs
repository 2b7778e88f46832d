//! cnpost-cli
//! ==========
//!
//! Command-line front end for the `cnpost-core` postcode resolver.
//!
//! The binary (`cnpost`) is the primary deliverable. The library target holds
//! the response and TSV formatting used by the binary so it can be tested
//! without spawning a process.
//!
//! Quick start
//! -----------
//!
//! ```text
//! cnpost --help
//! cnpost lookup 510100
//! cnpost batch -i postcodes.txt -o enriched.tsv --stage codes
//! cnpost alias 广东省 穗城区
//! cnpost codes 广东省 广州市 越秀区
//! cnpost build --out data/reference.snap.bin.gz
//! ```
//!
//! Reference data is read from `data/` relative to the working directory
//! unless a `--config` file or one of the path flags says otherwise.
//!
//! For programmatic access use the `cnpost-core` crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod output;
