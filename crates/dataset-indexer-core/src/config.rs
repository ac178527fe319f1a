use crate::error::Error;
use config::{Config, Environment, File as ConfigFile};
use glob::Pattern;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::Path;
use tracing::error;

pub const DEFAULT_OUTDIR: &str = "artifacts";
pub const DEFAULT_PRESSURE_FILE: &str = "pressure.csv";
pub const DEFAULT_TABULAR_EXTENSION: &str = "csv";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub outdir: String,
    pub pressure_file: String,
    pub tabular_extension: String,
    pub ignore_patterns: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            outdir: DEFAULT_OUTDIR.to_string(),
            pressure_file: DEFAULT_PRESSURE_FILE.to_string(),
            tabular_extension: DEFAULT_TABULAR_EXTENSION.to_string(),
            ignore_patterns: Vec::new(),
        }
    }
}

/// Load configuration from `path` when given (the file must exist), otherwise
/// from an optional `indexer.*` file in the working directory. `INDEXER_*`
/// environment variables override both.
pub fn load_configuration(path: Option<&Path>) -> Result<AppConfig, Error> {
    let file_source = match path {
        Some(path) => ConfigFile::from(path).required(true),
        None => ConfigFile::with_name("indexer").required(false),
    };

    let builder = Config::builder()
        .add_source(file_source)
        .add_source(Environment::with_prefix("INDEXER"))
        .build()?;
    Ok(builder.try_deserialize::<AppConfig>()?)
}

/// Scan-time view of [`AppConfig`]: the names the scanner matches against and
/// the compiled ignore globs.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub pressure_file: String,
    pub tabular_extension: String,
    pub ignore_patterns: Vec<Pattern>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl ScanOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        let ignore_patterns = config
            .ignore_patterns
            .iter()
            .filter_map(|glob| match Pattern::new(glob) {
                Ok(p) => Some(p),
                Err(e) => {
                    error!("Invalid glob pattern '{}': {}", glob, e);
                    None
                }
            })
            .collect();

        Self {
            pressure_file: config.pressure_file.clone(),
            tabular_extension: config.tabular_extension.trim_start_matches('.').to_string(),
            ignore_patterns,
        }
    }

    /// A regular file (symlinks followed) whose extension matches, ignoring case.
    pub fn is_tabular(&self, path: &Path) -> bool {
        path.is_file() && self.has_tabular_extension(path)
    }

    pub fn has_tabular_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .map_or(false, |ext| ext.eq_ignore_ascii_case(&self.tabular_extension))
    }

    /// Exact file-name match against the pressure file name, ignoring case.
    pub fn is_pressure_file(&self, file_name: &str) -> bool {
        file_name.to_lowercase() == self.pressure_file.to_lowercase()
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let options = ScanOptions::default();
        assert_eq!(options.pressure_file, "pressure.csv");
        assert_eq!(options.tabular_extension, "csv");
        assert!(options.ignore_patterns.is_empty());
    }

    #[test]
    fn test_pressure_match_is_exact_and_case_insensitive() {
        let options = ScanOptions::default();
        assert!(options.is_pressure_file("pressure.csv"));
        assert!(options.is_pressure_file("Pressure.CSV"));
        assert!(!options.is_pressure_file("pressure_1.csv"));
        assert!(!options.is_pressure_file("old_pressure.csv"));
        assert!(!options.is_pressure_file("pressure.csv.bak"));
    }

    #[test]
    fn test_tabular_extension_ignores_case() {
        let options = ScanOptions::default();
        assert!(options.has_tabular_extension(Path::new("/data/a.csv")));
        assert!(options.has_tabular_extension(Path::new("/data/B.CSV")));
        assert!(!options.has_tabular_extension(Path::new("/data/a.tsv")));
        assert!(!options.has_tabular_extension(Path::new("/data/.csv")));
        assert!(!options.has_tabular_extension(Path::new("/data/csv")));
    }

    #[test]
    fn test_invalid_ignore_pattern_is_dropped() {
        let config = AppConfig {
            ignore_patterns: vec!["**/skip".to_string(), "[".to_string()],
            ..AppConfig::default()
        };
        let options = ScanOptions::from_config(&config);
        assert_eq!(options.ignore_patterns.len(), 1);
        assert!(options.is_ignored(Path::new("/data/skip")));
        assert!(!options.is_ignored(Path::new("/data/keep")));
    }

    #[test]
    fn test_load_configuration_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            "outdir = \"out\"\npressure_file = \"PRESS.csv\"\nignore_patterns = [\"**/tmp\"]\n",
        )
        .unwrap();

        let config = load_configuration(Some(&path)).unwrap();
        assert_eq!(config.outdir, "out");
        assert_eq!(config.pressure_file, "PRESS.csv");
        assert_eq!(config.tabular_extension, "csv");
        assert_eq!(config.ignore_patterns, vec!["**/tmp".to_string()]);
    }

    #[test]
    fn test_load_configuration_missing_explicit_file() {
        let dir = tempdir().unwrap();
        let result = load_configuration(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
