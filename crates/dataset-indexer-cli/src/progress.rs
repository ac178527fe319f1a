use dataset_indexer_core::ScanReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::time::Duration;

/// CLI progress reporter using an indicatif spinner.
///
/// - Discovery phase: spinner counting dataset folders found
/// - Folder phase: spinner showing the folder key being scanned
///
/// Warnings are already logged by the scanner; the reporter only counts them.
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
    warnings: Cell<usize>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
            warnings: Cell::new(0),
        }
    }

    pub fn warnings(&self) -> usize {
        self.warnings.get()
    }

    fn start_spinner(&self, message: String) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));

        if let Some(old) = self.bar.borrow_mut().replace(pb) {
            old.finish_and_clear();
        }
    }

    fn set_message(&self, message: String) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(message);
        }
    }

    pub fn finish_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl ScanReporter for CliReporter {
    fn on_discovery_start(&self, root: &Path) {
        self.start_spinner(format!("Discovering dataset folders under {}...", root.display()));
    }

    fn on_folder_discovered(&self, _folder: &Path, folders_found: usize) {
        self.set_message(format!("Discovering... {} dataset folders found", folders_found));
    }

    fn on_discovery_complete(&self, total_folders: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Discovery complete: {} dataset folders in {:.2}s",
            total_folders, duration_secs
        );
        self.start_spinner("Scanning dataset folders...".to_string());
    }

    fn on_folder_scanned(&self, key: &str, _folder: &Path, echo_files: usize) {
        self.set_message(format!("Scanned {} ({} echo files)", key, echo_files));
    }

    fn on_scan_complete(&self, summary_rows: usize, errors: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} summary rows, {} errors in {:.2}s",
            summary_rows, errors, duration_secs
        );
    }

    fn on_warning(&self, _message: &str) {
        self.warnings.set(self.warnings.get() + 1);
    }
}
