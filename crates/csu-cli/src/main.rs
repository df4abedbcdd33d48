//! csu CLI - coding standard checker and fixer for PHP
//!
//! Sniffs:
//! - RN.Spacing.{Namespace,Use,Class,Const,Property,Function}: empty lines before declarations
//! - RN.Spacing.AssignmentOperators: spacing around `=` and `=>`, honouring vertical alignment
//! - RN.Spacing.FunctionCallParameters: spacing inside argument lists, honouring argument grids
//! - RN.Classes.MemberOrdering: order of class members by configured weights
//! - RN.Capitalization.BooleanNULL: case of `true`, `false` and `null`
//! - RN.CodeAnalysis.MaximumPHPVersion: language features beyond a configured PHP version

mod config;
mod output;
mod process;

use anyhow::Result;
use clap::Parser;
use colored::*;
use rayon::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use output::{OutputFormat, Reporter};
use process::{process_file, write_file, ProcessResult};

#[derive(Parser)]
#[command(name = "csu")]
#[command(version)]
#[command(about = "Check and fix PHP coding standard violations")]
struct Cli {
    /// Files or directories to process
    #[arg(required_unless_present = "list_sniffs")]
    paths: Vec<PathBuf>,

    /// Apply fixes to files
    #[arg(long)]
    fix: bool,

    /// Show verbose output
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Sniffs to run (can be specified multiple times). Overrides config file.
    #[arg(long, short = 's', value_name = "SNIFF")]
    sniff: Vec<String>,

    /// Output format: text, json, diff (default: text, or the config file's)
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    json: bool,

    /// Path to config file (default: auto-detect .csu.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long)]
    no_config: bool,

    /// List available sniffs and exit
    #[arg(long)]
    list_sniffs: bool,

    /// Ignore @codingStandardsIgnoreRule annotations
    #[arg(long)]
    ignore_annotations: bool,

    /// Highest PHP version files may require. Overrides config file.
    #[arg(long, value_name = "VERSION")]
    php_version: Option<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

/// Logs go to stderr so they never mix with JSON or diff output
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("CSU_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config file
    let config = if cli.no_config {
        Config::default()
    } else if let Some(config_path) = &cli.config {
        let cfg = Config::load_path(config_path)?;
        info!(path = %config_path.display(), "using config");
        cfg
    } else {
        match Config::load()? {
            Some((cfg, path)) => {
                info!(path = %path.display(), "using config");
                cfg
            }
            None => Config::default(),
        }
    };

    let registry = config.registry(&cli.sniff, cli.php_version.as_deref())?;

    // Handle --list-sniffs
    if cli.list_sniffs {
        println!("{}", "Available sniffs:".bold());
        for sniff in registry.list() {
            let state = if sniff.active { "" } else { " (inactive)" };
            println!("  {} - {}{}", sniff.name.green(), sniff.description, state.dimmed());
        }
        return Ok(ExitCode::SUCCESS);
    }

    // Determine output format
    let format_name = if cli.json {
        "json"
    } else {
        cli.format
            .as_deref()
            .or(config.output.format.as_deref())
            .unwrap_or("text")
    };
    let output_format = OutputFormat::from_str(format_name).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid output format '{}'. Valid options: text, json, diff",
            format_name
        )
    })?;

    if registry.is_empty() {
        eprintln!("{}: No sniffs enabled", "Error".red());
        return Ok(ExitCode::from(1));
    }

    let options = config.run_options(cli.ignore_annotations)?;
    let fix_mode = cli.fix;
    // The diff format shows what --fix would change
    let compute_fixes = fix_mode || output_format == OutputFormat::Diff;

    debug!(
        mode = if fix_mode { "fix" } else { "check" },
        sniffs = registry.len(),
        ignore_annotations = options.ignore_annotations,
        "starting run"
    );

    // Collect all file paths first
    let mut file_paths: Vec<PathBuf> = Vec::new();
    let mut missing_paths: Vec<PathBuf> = Vec::new();

    for path in &cli.paths {
        if path.is_file() {
            file_paths.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "php"))
            {
                let file_path = entry.path();
                if config.should_exclude(file_path) {
                    debug!(path = %file_path.display(), "excluded");
                } else {
                    file_paths.push(file_path.to_path_buf());
                }
            }
        } else {
            missing_paths.push(path.clone());
        }
    }
    file_paths.sort();

    // Process files in parallel; each worker gets its own run context
    let results: Vec<Result<ProcessResult>> = file_paths
        .par_iter()
        .map(|path| process_file(path, &registry, &options, compute_fixes))
        .collect();

    let mut reporter = Reporter::new(output_format, cli.verbose);

    for path in &missing_paths {
        if output_format == OutputFormat::Text {
            eprintln!("{}: Path does not exist: {}", "Warning".yellow(), path.display());
        }
    }

    for (path, result) in file_paths.iter().zip(results) {
        report_result(path, result, fix_mode, &mut reporter)?;
    }

    let summary = reporter.summary();
    let exit_code = if summary.failures > 0 {
        ExitCode::from(1)
    } else if summary.errors > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    };

    reporter.finish(fix_mode)?;

    Ok(exit_code)
}

/// Report a file result, writing fixes in fix mode
fn report_result(
    path: &PathBuf,
    result: Result<ProcessResult>,
    fix_mode: bool,
    reporter: &mut Reporter,
) -> Result<()> {
    let result = match result {
        Ok(result) => result,
        Err(e) => {
            reporter.report_error(path, &format!("{:#}", e));
            return Ok(());
        }
    };

    if fix_mode {
        if let Some(new_source) = &result.new_source {
            write_file(path, new_source)?;
        }
        reporter.report_file(
            path,
            result.remaining,
            result.fixed,
            &result.old_source,
            result.new_source.as_deref(),
        );
    } else {
        reporter.report_file(
            path,
            result.diagnostics,
            0,
            &result.old_source,
            result.new_source.as_deref(),
        );
    }
    Ok(())
}
