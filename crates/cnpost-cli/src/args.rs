use clap::{ArgAction, Parser, Subcommand};
use cnpost_core::Stage;
use std::path::PathBuf;

/// CLI arguments for cnpost
#[derive(Debug, Parser)]
#[command(
    name = "cnpost",
    version,
    about = "Resolve Chinese postcodes to province / city / district and administrative codes"
)]
pub struct CliArgs {
    /// TOML configuration file (data paths, prefix floor, suffixes, workers)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Split-division table (overrides the config file)
    #[arg(long = "split", global = true)]
    pub split: Option<PathBuf>,

    /// Standard postcode table
    #[arg(long = "standard", global = true)]
    pub standard: Option<PathBuf>,

    /// Administrative code table
    #[arg(long = "codes", global = true)]
    pub codes: Option<PathBuf>,

    /// Alias file (province, city, alias, target_area)
    #[arg(long = "aliases", global = true)]
    pub aliases: Option<PathBuf>,

    /// Compiled snapshot, reused while built from the current tables
    #[arg(long = "snapshot", global = true)]
    pub snapshot: Option<PathBuf>,

    /// Batch worker threads (0 = one per CPU)
    #[arg(short = 'j', long = "workers", global = true)]
    pub workers: Option<usize>,

    /// Shortest postcode prefix tried by the fuzzy ladder (1-5)
    #[arg(long = "min-prefix", global = true)]
    pub min_prefix: Option<usize>,

    /// More log output (debug)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Only warnings and errors
    #[arg(short = 'q', long = "quiet", global = true, action = ArgAction::SetTrue, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve one postcode and print a JSON response
    Lookup {
        /// Postcode; non-digits are ignored (e.g. 510-030)
        postcode: String,
    },

    /// Resolve one postcode per input line and write TSV
    Batch {
        /// Input file (default: stdin)
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Last stage to run: resolve, alias or codes
        #[arg(short = 's', long = "stage")]
        stage: Option<Stage>,

        /// Skip the header row
        #[arg(long = "no-header")]
        no_header: bool,
    },

    /// Canonicalize a district name through the alias table
    Alias {
        province: String,
        district: String,

        /// City, enables the city-scoped alias tiers
        #[arg(long = "city", default_value = "")]
        city: String,
    },

    /// Look up administrative codes (pass "" for an unknown city or district)
    Codes {
        province: String,
        city: String,
        district: String,
    },

    /// Alias + codes for a location from a geocoder, as JSON
    Locate {
        province: String,
        city: String,
        district: String,
    },

    /// Compile the reference tables into a snapshot
    Build {
        /// Output path (default: next to the split-division table)
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,

        /// Write an uncompressed snapshot
        #[arg(long = "no-compress")]
        no_compress: bool,
    },

    /// Show a summary of the reference data
    Stats,
}
