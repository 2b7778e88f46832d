//! Basic usage example for cnpost-rs
//!
//! This example demonstrates how to:
//! - Load the reference tables from `data/`
//! - Resolve single postcodes and read the provenance
//! - Stop the pipeline after an earlier stage
//! - Run a batch of raw input lines
//!
//! Run from the repository root: `cargo run --example basic_lookup`

use cnpost_core::{Pipeline, PipelineConfig, PostcodeRecord, Result, Stage};

fn main() -> Result<()> {
    println!("=== cnpost-rs Basic Lookup Example ===\n");

    println!("Loading reference data...");
    let pipeline = Pipeline::from_config(PipelineConfig::default())?;
    let stats = pipeline.store().stats();
    println!(
        "✓ Loaded {} split divisions, {} standard postcodes, {} admin codes\n",
        stats.split_divisions, stats.standard_postcodes, stats.admin_codes
    );

    // Example 1: Resolve postcodes hitting different tiers
    println!("--- Example 1: Resolve postcodes ---");
    for postcode in ["100700", "100000", "510100", "510630", "100900", "999999"] {
        let rec = pipeline.resolve(postcode)?;
        if rec.is_resolved() {
            println!(
                "{postcode}: {} {} {} [{} / {}] -> {} ({})",
                rec.province,
                rec.city,
                rec.district,
                rec.level,
                rec.source_note,
                rec.canonical_district,
                rec.area_code
            );
        } else {
            println!("{postcode}: not found");
        }
    }
    println!();

    // Example 2: Location only, no alias or codes
    println!("--- Example 2: Stop after the resolve stage ---");
    let rec = pipeline.resolve_through("510100", Stage::Resolve)?;
    println!("{}", PostcodeRecord::columns(Stage::Resolve).join("\t"));
    println!("{}\n", rec.row(Stage::Resolve).join("\t"));

    // Example 3: Batch of raw lines
    println!("--- Example 3: Batch ---");
    let lines = ["100006", " 518-101 ", "abc", "102299"];
    println!("{}", PostcodeRecord::columns(Stage::Codes).join("\t"));
    for rec in pipeline.resolve_batch(&lines)? {
        println!("{}", rec.row(Stage::Codes).join("\t"));
    }

    Ok(())
}
