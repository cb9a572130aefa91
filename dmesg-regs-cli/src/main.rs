//! dmesg-regs command line interface
//!
//! Scans a kernel log for arm64 register dumps and writes one block per CPU
//! context, ready for `arm64_core_set -l` in crash.
//!
//! ```text
//! dmesg-regs -f dmesg.txt
//! dmesg-regs -f dmesg.txt -o regvalue.txt
//! dmesg-regs -f dmesg.txt --format json
//! dmesg-regs load -l regvalue.txt --cpus 8
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dmesg_regs::{
    format_core_regs, format_report, load_core_regs, scan_file, OutputFormat,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Extract arm64 core registers from a kernel crash log
#[derive(Parser, Debug, Clone)]
#[command(name = "dmesg-regs", author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input log containing register dumps
    #[arg(short = 'f', long = "infile", value_name = "PATH")]
    infile: Option<PathBuf>,

    /// Write output here instead of stdout
    #[arg(short = 'o', long = "outfile", value_name = "PATH")]
    outfile: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Load a register report into per-CPU core registers, as crash does
    Load {
        /// Report previously written by dmesg-regs
        #[arg(short = 'l', long = "load", value_name = "PATH")]
        report: PathBuf,

        /// Number of CPUs to load; entries for higher indexes are ignored
        #[arg(long, default_value_t = 8)]
        cpus: usize,

        /// Write output here instead of stdout
        #[arg(short = 'o', long = "outfile", value_name = "PATH")]
        outfile: Option<PathBuf>,
    },
}

#[derive(Debug, Clone)]
struct RunConfig {
    infile: Option<PathBuf>,
    outfile: Option<PathBuf>,
    format: OutputFormat,
}

impl From<Args> for RunConfig {
    fn from(value: Args) -> Self {
        Self {
            infile: value.infile,
            outfile: value.outfile,
            format: value.format,
        }
    }
}

// Logs go to stderr; stdout carries the report.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run(config: RunConfig) -> Result<()> {
    let Some(infile) = config.infile else {
        warn!("no --infile given, nothing to scan");
        return Ok(());
    };

    let sets = scan_file(&infile)
        .with_context(|| format!("failed to scan {}", infile.display()))?;
    info!(
        infile = %infile.display(),
        cores = sets.len(),
        "extracted register sets"
    );

    let mut report = format_report(&sets, config.format).context("failed to render report")?;
    if !report.is_empty() && !report.ends_with('\n') {
        report.push('\n');
    }

    write_report(config.outfile.as_deref(), &report)
}

fn run_load(report: &Path, cpus: usize, outfile: Option<&Path>) -> Result<()> {
    let cores = load_core_regs(report, cpus)
        .with_context(|| format!("failed to load {}", report.display()))?;
    info!(report = %report.display(), cpus, "loaded core registers");

    write_report(outfile, &format_core_regs(&cores))
}

fn write_report(outfile: Option<&Path>, report: &str) -> Result<()> {
    match outfile {
        Some(path) => fs::write(path, report)
            .with_context(|| format!("failed to write report to {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(report.as_bytes())
                .context("failed to write report to stdout")?;
            stdout.flush().context("failed to flush stdout")
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    match args.command.clone() {
        Some(Commands::Load {
            report,
            cpus,
            outfile,
        }) => run_load(&report, cpus, outfile.as_deref()),
        None => run(RunConfig::from(args)),
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn test_args__short_flags__then_parsed() {
        let args = Args::try_parse_from(["dmesg-regs", "-f", "in.log", "-o", "out.txt"]).unwrap();
        assert_eq!(args.infile, Some(PathBuf::from("in.log")));
        assert_eq!(args.outfile, Some(PathBuf::from("out.txt")));
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_args__long_flags_and_json__then_parsed() {
        let args = Args::try_parse_from([
            "dmesg-regs",
            "--infile",
            "in.log",
            "--format",
            "json",
            "--verbose",
        ])
        .unwrap();
        let config = RunConfig::from(args);
        assert_eq!(config.infile, Some(PathBuf::from("in.log")));
        assert_eq!(config.outfile, None);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_args__load_subcommand__then_parsed() {
        let args =
            Args::try_parse_from(["dmesg-regs", "load", "-l", "regvalue.txt", "--cpus", "4"])
                .unwrap();
        match args.command {
            Some(Commands::Load { report, cpus, outfile }) => {
                assert_eq!(report, PathBuf::from("regvalue.txt"));
                assert_eq!(cpus, 4);
                assert_eq!(outfile, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_args__no_subcommand__then_scan_flags() {
        let args = Args::try_parse_from(["dmesg-regs", "-f", "in.log"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn test_args__unknown_format__then_error() {
        assert!(Args::try_parse_from(["dmesg-regs", "-f", "x", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_run__no_infile__then_noop() {
        let config = RunConfig {
            infile: None,
            outfile: None,
            format: OutputFormat::Text,
        };
        assert!(run(config).is_ok());
    }
}
