use crate::config::ScanOptions;
use crate::error::Error;
use crate::progress::ScanReporter;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

/// Find every directory under `address` that directly holds a tabular file.
///
/// A file address scans from its parent directory. The root comes first when
/// it qualifies, then subdirectories at any depth in file-name order.
/// Directories reached through more than one path (symlinks) are reported once,
/// under the first path seen.
pub fn discover(
    address: &Path,
    options: &ScanOptions,
    reporter: &dyn ScanReporter,
) -> Result<Vec<PathBuf>, Error> {
    let root = if address.is_file() {
        address
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    } else {
        address
    };

    if !root.exists() {
        return Err(not_found(address));
    }

    let root_has_tabular = match contains_tabular(root, options) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(not_found(address)),
        Err(err) => {
            let message = if err.kind() == io::ErrorKind::PermissionDenied {
                format!("Permission denied: {}", root.display())
            } else {
                format!("Error listing {}: {}", root.display(), err)
            };
            warn!("{}", message);
            reporter.on_warning(&message);
            return Ok(Vec::new());
        }
    };

    let mut found: Vec<PathBuf> = Vec::new();
    if root_has_tabular {
        found.push(root.to_path_buf());
        reporter.on_folder_discovered(root, found.len());
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && options.is_ignored(entry.path())));

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                if err.loop_ancestor().is_some() {
                    warn!("Skipping symlink loop: {}", err);
                } else {
                    // Unreadable directories are reported when they are listed below.
                    debug!("Walk error: {}", err);
                }
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let dir = entry.path();
        match contains_tabular(dir, options) {
            Ok(true) => {
                found.push(dir.to_path_buf());
                reporter.on_folder_discovered(dir, found.len());
            }
            Ok(false) => {}
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                let message = format!("Permission denied: {}", dir.display());
                warn!("{}", message);
                reporter.on_warning(&message);
            }
            Err(err) => {
                let message = format!("Error scanning folder {}: {}", dir.display(), err);
                error!("{}", message);
                reporter.on_warning(&message);
            }
        }
    }

    Ok(dedupe_canonical(found))
}

fn not_found(address: &Path) -> Error {
    Error::AddressNotFound {
        address: address.display().to_string(),
    }
}

/// Whether `dir` directly (non-recursively) holds a tabular file.
fn contains_tabular(dir: &Path, options: &ScanOptions) -> io::Result<bool> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if options.is_tabular(&entry.path()) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Drop later paths that resolve to an already-seen directory, keeping order.
fn dedupe_canonical(dirs: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    dirs.into_iter()
        .filter(|dir| {
            let canonical = fs::canonicalize(dir).unwrap_or_else(|_| dir.clone());
            seen.insert(canonical)
        })
        .collect()
}
