//! cnpost — Command-line interface for cnpost-core
//!
//! Resolves Chinese 6-digit postcodes to province / city / district,
//! canonicalizes legacy district names, and attaches administrative codes.
//!
//! Usage examples
//! --------------
//!
//! - Single lookup, JSON response
//!   $ cnpost lookup 510100
//!
//! - Batch: one postcode per line in, TSV out
//!   $ cnpost batch -i postcodes.txt -o enriched.tsv
//!   $ cat postcodes.txt | cnpost -j 8 batch --stage alias
//!
//! - Alias and code lookups for a known location
//!   $ cnpost alias 广东省 穗城区
//!   $ cnpost codes 广东省 广州市 越秀区
//!   $ cnpost locate 北京市 北京市 崇文区
//!
//! - Compile the tables into a snapshot and inspect them
//!   $ cnpost build --out data/reference.snap.bin.gz
//!   $ cnpost stats
//!
//! Data source
//! -----------
//!
//! Tables are read from `data/` by default. A TOML file given with
//! `--config` replaces the defaults, and the path flags override single
//! entries on top of that. With `--snapshot` the compiled snapshot is used
//! while it was built from the same tables, and rebuilt otherwise.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use cnpost_cli::output::{self, LocateResponse, LookupResponse};
use cnpost_core::{Pipeline, PipelineConfig, ReferenceDb};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

fn init_logging(args: &CliArgs) {
    let level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    // RUST_LOG wins over -v / -q when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Config file (if any) with the command-line overrides applied.
fn load_config(args: &CliArgs) -> anyhow::Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(p) = &args.split {
        config.data.split_divisions = p.clone();
    }
    if let Some(p) = &args.standard {
        config.data.standard_postcodes = p.clone();
    }
    if let Some(p) = &args.codes {
        config.data.admin_codes = p.clone();
    }
    if let Some(p) = &args.aliases {
        config.data.aliases = Some(p.clone());
    }
    if let Some(p) = &args.snapshot {
        config.data.snapshot = Some(p.clone());
    }
    if let Some(n) = args.workers {
        config.workers = n;
    }
    if let Some(n) = args.min_prefix {
        config.min_prefix_len = n;
    }

    config.validate()?;
    Ok(config)
}

fn load_db(config: &PipelineConfig) -> anyhow::Result<ReferenceDb> {
    #[cfg(feature = "builder")]
    let db = ReferenceDb::load_cached(&config.data)?;
    #[cfg(not(feature = "builder"))]
    let db = ReferenceDb::load(&config.data)?;
    Ok(db)
}

fn read_lines(input: Option<&std::path::Path>) -> anyhow::Result<Vec<String>> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    Ok(reader.lines().collect::<io::Result<Vec<_>>>()?)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();
    init_logging(&args);
    let mut config = load_config(&args)?;

    match args.command {
        Commands::Lookup { postcode } => {
            let pipeline = Pipeline::from_config(config)?;
            let response = LookupResponse::lookup(&pipeline, &postcode)?;
            print_json(&response)?;
            return Ok(ExitCode::from(response.status.exit_code()));
        }

        Commands::Batch {
            input,
            output: out_path,
            stage,
            no_header,
        } => {
            if let Some(stage) = stage {
                config.stage = stage;
            }
            let stage = config.stage;
            let pipeline = Pipeline::from_config(config)?;
            let lines = read_lines(input.as_deref())?;
            let records = pipeline.resolve_batch(&lines)?;

            let out: Box<dyn Write> = match &out_path {
                Some(path) => Box::new(
                    File::create(path).with_context(|| format!("creating {}", path.display()))?,
                ),
                None => Box::new(io::stdout().lock()),
            };
            output::write_tsv(BufWriter::new(out), &records, stage, !no_header)?;
        }

        Commands::Alias {
            province,
            district,
            city,
        } => {
            let pipeline = Pipeline::new(
                ReferenceDb::default(),
                cnpost_core::AliasTable::load_or_empty(config.data.aliases.as_deref()),
                config,
            )?;
            let res = pipeline.resolve_alias(&province, &city, &district);
            match res.target() {
                Some(target) => println!("{district} -> {target} ({})", res.hit),
                None => println!("{district} (no alias)"),
            }
        }

        Commands::Codes {
            province,
            city,
            district,
        } => {
            let pipeline = Pipeline::new(load_db(&config)?, Default::default(), config)?;
            let codes = pipeline.resolve_codes(&province, &city, &district)?;
            if codes.is_empty() {
                eprintln!("No administrative code for: {province} {city} {district}");
                return Ok(ExitCode::from(1));
            }
            println!("Province code: {}", codes.province_code);
            println!("City code: {}", codes.city_code);
            println!("Area code: {}", codes.area_code);
            println!("Match: {}", codes.matched.as_str());
        }

        Commands::Locate {
            province,
            city,
            district,
        } => {
            let pipeline = Pipeline::from_config(config)?;
            let enrichment = pipeline.enrich_location(&province, &city, &district)?;
            print_json(&LocateResponse::from(&enrichment))?;
        }

        Commands::Build { out, no_compress } => {
            #[cfg(feature = "builder")]
            {
                use cnpost_core::loader::common_io::get_cache_path;
                use cnpost_core::{build_snapshot, CompressionMode, CACHE_SUFFIX};

                let out = out.unwrap_or_else(|| {
                    let suffix = if no_compress { "snap.bin" } else { CACHE_SUFFIX };
                    get_cache_path(&config.data.split_divisions, suffix)
                });
                let compression = if no_compress {
                    CompressionMode::None
                } else {
                    CompressionMode::for_path(&out)
                };
                let stats = build_snapshot(&config.data, &out, compression)?;
                info!(out = %out.display(), "snapshot written");
                println!("Snapshot: {}", out.display());
                println!("  Split divisions: {}", stats.split_divisions);
                println!("  Standard postcodes: {}", stats.standard_postcodes);
                println!("  Admin codes: {}", stats.admin_codes);
            }
            #[cfg(not(feature = "builder"))]
            {
                let _ = (out, no_compress);
                anyhow::bail!("snapshot support is disabled (feature 'builder')");
            }
        }

        Commands::Stats => {
            let stats = load_db(&config)?.stats();
            let aliases = cnpost_core::AliasTable::load_or_empty(config.data.aliases.as_deref());
            println!("Reference data statistics:");
            println!("  Split divisions: {}", stats.split_divisions);
            println!("    Area postcodes: {}", stats.area_postcodes);
            println!("    City postcodes: {}", stats.city_postcodes);
            println!("  Standard postcodes: {}", stats.standard_postcodes);
            println!("  Admin codes: {}", stats.admin_codes);
            println!("  Aliases: {} ({} city-scoped)", aliases.len(), aliases.city_len());
        }
    }

    Ok(ExitCode::SUCCESS)
}
