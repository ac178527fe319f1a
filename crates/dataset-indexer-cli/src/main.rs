mod commands;
mod logging;
mod progress;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::Parser;
use colored::*;
use commands::Cli;
use dataset_indexer_core::{config, IndexEngine, ScanOptions};
use dotenv::dotenv;
use progress::CliReporter;
use tracing::{error, info, warn};

/// Exit status when the address does not exist.
const EXIT_ADDRESS_NOT_FOUND: i32 = 2;

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    match run(&args) {
        Ok(()) => {}
        Err(err) => match err.downcast_ref::<dataset_indexer_core::Error>() {
            Some(core_err) if core_err.is_not_found() => {
                eprintln!("error: {}", core_err);
                process::exit(EXIT_ADDRESS_NOT_FOUND);
            }
            _ => {
                error!("Error: {:#}", err);
                process::exit(1);
            }
        },
    }
}

fn run(args: &Cli) -> anyhow::Result<()> {
    let config = config::load_configuration(args.config.as_deref())
        .context("Error loading configuration")?;

    let address = resolve_path(&args.address);
    let outdir = resolve_path(args.outdir.as_deref().unwrap_or(&config.outdir));

    let engine = IndexEngine::new(ScanOptions::from_config(&config));
    let reporter = CliReporter::new();
    let result = engine.run(&address, &outdir, &reporter);
    reporter.finish_bar();
    let result = result?;

    info!(
        "Scan: {}, Write: {}",
        format!("{:.2}s", result.scan_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.write_duration.as_secs_f64()).green(),
    );
    info!(
        "{} dataset folders, {} echo files, {} summary rows",
        format!("{}", result.dataset_folders).cyan(),
        format!("{}", result.echo_files).cyan(),
        format!("{}", result.summary_rows).cyan(),
    );

    if reporter.warnings() > 0 {
        warn!("{} folder(s) or file(s) were skipped or degraded", reporter.warnings());
    }
    if result.errors.is_empty() {
        info!("Completed with no critical errors.");
    } else {
        warn!(
            "Completed with {} error(s). See {}",
            format!("{}", result.errors.len()).red(),
            result.errors_path.display()
        );
    }

    Ok(())
}

/// Expand a leading `~` and make the path absolute, resolving symlinks when
/// the path exists.
fn resolve_path(raw: &str) -> PathBuf {
    let expanded = expand_home(raw);
    fs::canonicalize(&expanded)
        .or_else(|_| std::path::absolute(&expanded))
        .unwrap_or(expanded)
}

fn expand_home(raw: &str) -> PathBuf {
    let home = || dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if raw == "~" {
        home()
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home().join(rest)
    } else {
        Path::new(raw).to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~"), home);
            assert_eq!(expand_home("~/data/run1"), home.join("data/run1"));
        }
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("rel/~x"), PathBuf::from("rel/~x"));
    }

    #[test]
    fn test_resolve_path_is_absolute() {
        assert!(resolve_path("some/relative/dir").is_absolute());

        let tmp = tempfile::tempdir().unwrap();
        let resolved = resolve_path(&tmp.path().display().to_string());
        assert_eq!(resolved, fs::canonicalize(tmp.path()).unwrap());
    }
}
