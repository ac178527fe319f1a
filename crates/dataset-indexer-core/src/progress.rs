use std::path::Path;

/// Trait for reporting scan progress and non-fatal problems.
///
/// Passed by reference into every scanning stage; the CLI implements it with an
/// indicatif spinner. All methods have default no-op implementations.
pub trait ScanReporter {
    fn on_discovery_start(&self, _root: &Path) {}
    fn on_folder_discovered(&self, _folder: &Path, _folders_found: usize) {}
    fn on_discovery_complete(&self, _total_folders: usize, _duration_secs: f64) {}
    fn on_folder_scanned(&self, _key: &str, _folder: &Path, _echo_files: usize) {}
    fn on_scan_complete(&self, _summary_rows: usize, _errors: usize, _duration_secs: f64) {}
    /// A directory or file was skipped or degraded; the scan continues.
    fn on_warning(&self, _message: &str) {}
}

/// No-op reporter for silent operation.
pub struct SilentReporter;

impl ScanReporter for SilentReporter {}
