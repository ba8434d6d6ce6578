//! `interseg`: segment interaction data against a population registry and
//! compare actual with expected interaction volumes.

use clap::{Parser, Subcommand};
use interseg_core::config::AppConfig;
use interseg_core::error::ErrorCode;
use interseg_core::init_tracing;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

mod commands;
mod error;

#[derive(Parser)]
#[command(name = "interseg", version, propagate_version = true)]
#[command(about = "Segment interaction networks and compare actual with expected interactions")]
struct Cli {
    /// Population registry archive (defaults to registry.archive_path)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replace member ids with their segment: `<id>\t<value>...` -> `<segment>\t<value>...`
    Segment {
        field: String,
        file: Option<PathBuf>,
    },
    /// Count population members per segment
    Counts { field: String },
    /// Simpson diversity index of an individual's connections
    Diversity {
        weightedness: String,
        #[arg(short, long, default_value = "all")]
        segmenter: String,
        files: Vec<PathBuf>,
    },
    /// Weighted Simpson diversity index of every vertex in an edge list
    NetworkDiversity { file: Option<PathBuf> },
    /// Actual vs expected connections of an individual with a focal segment
    Rpd {
        field: String,
        weightedness: String,
        focal: String,
        file: Option<PathBuf>,
    },
    /// Actual vs expected interactions between segments of a reduced network
    RpdNetwork {
        field: String,
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Two-sample KS test between segments of `<segment>\t<value>` input
    Ks {
        weightedness: String,
        /// Skip segments with fewer data points
        #[arg(long)]
        threshold: Option<usize>,
        #[arg(long)]
        json: bool,
        file: Option<PathBuf>,
    },
    /// Convert a tab-separated registry export into an archive
    BuildArchive { tsv: PathBuf, out: PathBuf },
}

fn log_level(verbose: u8, configured: &str) -> &str {
    match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: failed to load configuration: {}", err);
            return ExitCode::from(ErrorCode::InvalidArgument.exit_status());
        }
    };
    init_tracing(log_level(cli.verbose, &config.log.level), config.log.json);

    let context = commands::Context {
        registry_path: cli
            .registry
            .or_else(|| config.registry.archive_path.as_ref().map(PathBuf::from)),
        analysis: config.analysis,
    };

    match commands::run(cli.command, &context) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = error::error_code_for(&err);
            error!("{} ({})", err, code);
            eprintln!("error: {:#}", err);
            ExitCode::from(code.exit_status())
        }
    }
}
