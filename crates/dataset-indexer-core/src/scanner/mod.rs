//! Scanner module: discovery, per-folder pairing and aggregation.
//!
//! - [`walk`]: finds the directories that directly hold tabular files.
//! - [`folder`]: pairs the pressure file of one folder with its echo files.
//! - [`scan_address`]: runs both over an address and merges the results.

pub mod folder;
pub mod walk;

pub use folder::{scan_folder, FolderScan};
pub use walk::discover;

use crate::config::ScanOptions;
use crate::error::Error;
use crate::model::{DatasetIndex, SummaryRow};
use crate::progress::ScanReporter;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Merged result of scanning one address.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub index: DatasetIndex,
    pub rows: Vec<SummaryRow>,
    pub errors: Vec<String>,
}

/// Discover every dataset folder under `address`, scan each in discovery
/// order and merge the results. Folders sharing a base name get keys
/// `name`, `name#2`, `name#3`, ...
///
/// Fails only when `address` does not exist; per-folder and per-file problems
/// end up in [`ScanOutcome::errors`].
pub fn scan_address(
    address: &Path,
    options: &ScanOptions,
    reporter: &dyn ScanReporter,
) -> Result<ScanOutcome, Error> {
    reporter.on_discovery_start(address);
    let discovery_start = Instant::now();
    let folders = discover(address, options, reporter)?;
    reporter.on_discovery_complete(folders.len(), discovery_start.elapsed().as_secs_f64());
    info!("Found {} dataset folder(s)", folders.len());

    let scan_start = Instant::now();
    let mut outcome = ScanOutcome::default();
    for folder in &folders {
        let scan = scan_folder(folder, options, reporter);
        let base = folder
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let echo_files = scan.entries.len();
        let key = outcome.index.insert(&base, scan.entries);
        debug!("{} -> {} ({} echo file(s))", folder.display(), key, echo_files);
        reporter.on_folder_scanned(&key, folder, echo_files);

        outcome.rows.extend(scan.rows);
        outcome.errors.extend(scan.errors);
    }

    reporter.on_scan_complete(
        outcome.rows.len(),
        outcome.errors.len(),
        scan_start.elapsed().as_secs_f64(),
    );
    Ok(outcome)
}
