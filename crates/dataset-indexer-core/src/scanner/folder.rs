use crate::config::ScanOptions;
use crate::model::{
    EchoEntry, PressureStats, SummaryRow, NOTE_EMPTY_OR_UNREADABLE, NOTE_MISSING_PRESSURE,
};
use crate::progress::ScanReporter;
use crate::shape::{self, Shape};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Everything one dataset folder contributes to the scan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FolderScan {
    pub entries: Vec<EchoEntry>,
    pub rows: Vec<SummaryRow>,
    pub errors: Vec<String>,
}

struct TabularFile {
    path: PathBuf,
    name: String,
}

/// Pair the pressure file of `folder` with each of its echo files and build
/// the summary rows. Only files directly inside `folder` are considered.
pub fn scan_folder(
    folder: &Path,
    options: &ScanOptions,
    reporter: &dyn ScanReporter,
) -> FolderScan {
    let mut scan = FolderScan::default();
    let folder_path = folder.display().to_string();

    let files = match list_tabular_files(folder, options) {
        Ok(files) => files,
        Err(err) => {
            let message = format!("failed to list {}: {}", folder_path, err);
            warn!("{}", message);
            reporter.on_warning(&message);
            scan.errors.push(message);
            return scan;
        }
    };
    if files.is_empty() {
        return scan;
    }

    let press = files.iter().find(|f| options.is_pressure_file(&f.name));
    let pressure = match press {
        Some(p) => {
            let press_shape = inspect_file(&p.path, reporter, &mut scan.errors);
            PressureStats {
                file: Some(p.name.clone()),
                rows: press_shape.rows,
                cols: press_shape.cols,
                size_bytes: shape::size(&p.path),
            }
        }
        None => {
            scan.errors
                .push(format!("{} not found in {}", options.pressure_file, folder_path));
            PressureStats::default()
        }
    };
    let press_canonical = press.map(|p| canonical(&p.path));

    for file in &files {
        if press_canonical.as_ref() == Some(&canonical(&file.path)) {
            continue;
        }

        let echo_shape = inspect_file(&file.path, reporter, &mut scan.errors);
        let size_bytes = shape::size(&file.path);

        scan.entries.push(EchoEntry {
            echo: file.name.clone(),
            press: pressure.file.clone(),
        });

        let mut notes: Vec<&str> = Vec::new();
        if echo_shape.is_empty() {
            notes.push(NOTE_EMPTY_OR_UNREADABLE);
        }
        if press.is_none() {
            notes.push(NOTE_MISSING_PRESSURE);
        }

        scan.rows.push(SummaryRow::echo(
            &folder_path,
            &file.name,
            echo_shape.rows,
            echo_shape.cols,
            size_bytes,
            &pressure,
            notes.join("; "),
        ));
    }

    if scan.entries.is_empty() && press.is_some() {
        scan.rows.push(SummaryRow::pressure_only(&folder_path, &pressure));
    }

    scan
}

/// Tabular files directly in `folder`, sorted by name ignoring case, ties
/// broken by the exact name.
fn list_tabular_files(
    folder: &Path,
    options: &ScanOptions,
) -> std::io::Result<Vec<TabularFile>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("Skipping unreadable entry in {}: {}", folder.display(), err);
                continue;
            }
        };
        let path = entry.path();
        if options.is_tabular(&path) {
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push(TabularFile { path, name });
        }
    }

    files.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(files)
}

/// Shape of one file. A failure is logged, recorded in `errors` and degraded
/// to [`Shape::EMPTY`].
fn inspect_file(path: &Path, reporter: &dyn ScanReporter, errors: &mut Vec<String>) -> Shape {
    shape::inspect(path).unwrap_or_else(|err| {
        let message = format!("unreadable tabular file {}: {}", path.display(), err);
        warn!("{}", message);
        reporter.on_warning(&message);
        errors.push(message);
        Shape::EMPTY
    })
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
