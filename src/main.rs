use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use mediacheck::registry::{mime_types, resolve_tag};
use mediacheck::{
    DetectorParameters, DirectorySource, FormatTag, ValidationConfig, ValidationReport, Validator,
};

#[derive(Parser)]
#[command(name = "mediacheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check media datastreams against their format's binary layout", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output (repeat for per-assertion tracing)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a file on disk
    Check {
        file: PathBuf,

        /// Format name or MIME type
        #[arg(short, long)]
        format: String,

        /// Detector parameter as name=value
        #[arg(short, long = "param")]
        params: Vec<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a datastream of an object in a directory store
    Store {
        object: String,

        #[arg(short, long)]
        format: String,

        /// Datastream identifier, defaults to the configured one
        #[arg(short, long)]
        datastream: Option<String>,

        /// Store root, overrides the configured one
        #[arg(short, long)]
        root: Option<PathBuf>,

        #[arg(short, long = "param")]
        params: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// List supported formats and their MIME types
    Formats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(cli: &Cli, config: &ValidationConfig) {
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => config.log_level.parse().unwrap_or(Level::INFO),
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns whether every finding passed.
fn run(cli: Cli) -> Result<bool> {
    let config = match &cli.config {
        Some(path) => ValidationConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ValidationConfig::default(),
    };
    init_tracing(&cli, &config);

    match cli.command {
        Commands::Check {
            file,
            format,
            params,
            json,
        } => {
            let params = parse_params(&params)?;
            let validator = Validator::new(config);
            let data =
                fs::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;
            let report = validator.validate(&format, &params, Some(data.as_slice()))?;
            print_report(&report, json)?;
            Ok(report.passed())
        }
        Commands::Store {
            object,
            format,
            datastream,
            root,
            params,
            json,
        } => {
            let params = parse_params(&params)?;
            let root = root
                .or_else(|| config.store_root.clone())
                .context("No store root given and none configured")?;
            let source = DirectorySource::new(root);
            let validator = Validator::new(config);
            let report = validator.validate_datastream(
                &source,
                &object,
                datastream.as_deref(),
                &format,
                &params,
            )?;
            print_report(&report, json)?;
            Ok(report.passed())
        }
        Commands::Formats => {
            for tag in FormatTag::ALL {
                let detectors: Vec<_> = resolve_tag(tag).iter().map(|k| k.name()).collect();
                let mimes: Vec<_> = mime_types(tag).collect();
                println!(
                    "{:<6} detectors: {:<6} mime: {}",
                    tag,
                    detectors.join(","),
                    mimes.join(", ")
                );
            }
            Ok(true)
        }
    }
}

fn parse_params(raw: &[String]) -> Result<DetectorParameters> {
    DetectorParameters::parse_pairs(raw.iter().map(String::as_str))
        .context("Parameters must be given as name=value")
}

fn print_report(report: &ValidationReport, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{text}");
    } else {
        println!("{report}");
    }
    Ok(())
}
