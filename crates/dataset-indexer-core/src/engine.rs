use crate::config::ScanOptions;
use crate::error::Error;
use crate::output::{self, ERROR_LOG_FILE_NAME, INDEX_FILE_NAME, SUMMARY_FILE_NAME};
use crate::progress::ScanReporter;
use crate::scanner;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct IndexEngine {
    options: ScanOptions,
}

#[derive(Debug)]
pub struct ScanResult {
    pub scan_duration: Duration,
    pub write_duration: Duration,
    pub dataset_folders: usize,
    pub echo_files: usize,
    pub summary_rows: usize,
    pub errors: Vec<String>,
    pub index_path: PathBuf,
    pub summary_path: PathBuf,
    pub errors_path: PathBuf,
}

impl IndexEngine {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scan `address` and write `dataset_index.json`, `summary.csv` and
    /// `errors.log` into `outdir`.
    ///
    /// Nothing is written when the address does not exist.
    pub fn run(
        &self,
        address: &Path,
        outdir: &Path,
        reporter: &dyn ScanReporter,
    ) -> Result<ScanResult, Error> {
        info!("Scanning address: {}", address.display());
        let scan_start = Instant::now();
        let outcome = scanner::scan_address(address, &self.options, reporter)?;
        let scan_duration = scan_start.elapsed();
        debug!(
            "Scan completed in {:.2}s: {} folders, {} rows, {} errors",
            scan_duration.as_secs_f64(),
            outcome.index.len(),
            outcome.rows.len(),
            outcome.errors.len(),
        );
        if outcome.index.is_empty() {
            warn!("No dataset folders found under {}", address.display());
        }

        let write_start = Instant::now();
        fs::create_dir_all(outdir)?;

        let index_path = outdir.join(INDEX_FILE_NAME);
        output::write_json_atomic(&index_path, &outcome.index)?;
        info!("Wrote {}", index_path.display());

        let summary_path = outdir.join(SUMMARY_FILE_NAME);
        output::write_summary_csv(&summary_path, &outcome.rows)?;
        info!("Wrote {}", summary_path.display());

        let errors_path = outdir.join(ERROR_LOG_FILE_NAME);
        output::write_error_log(&errors_path, &outcome.errors)?;

        Ok(ScanResult {
            scan_duration,
            write_duration: write_start.elapsed(),
            dataset_folders: outcome.index.len(),
            echo_files: outcome.index.echo_count(),
            summary_rows: outcome.rows.len(),
            errors: outcome.errors,
            index_path,
            summary_path,
            errors_path,
        })
    }
}
