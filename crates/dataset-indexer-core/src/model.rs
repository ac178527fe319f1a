use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::HashSet;

pub const NOTE_EMPTY_OR_UNREADABLE: &str = "empty_or_unreadable";
pub const NOTE_MISSING_PRESSURE: &str = "missing_pressure_csv";
pub const NOTE_ONLY_PRESSURE: &str = "only_pressure_csv";

/// One non-pressure tabular file and the pressure file it pairs with.
/// `echo` is the bare file name, relative to its dataset folder.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct EchoEntry {
    pub echo: String,
    pub press: Option<String>,
}

/// Pressure statistics shared by every row of one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PressureStats {
    pub file: Option<String>,
    pub rows: usize,
    pub cols: usize,
    pub size_bytes: Option<u64>,
}

/// One record of `summary.csv`. Field order and names are the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct SummaryRow {
    pub folder_path: String,
    pub echo_file: Option<String>,
    pub echo_rows: Option<usize>,
    pub echo_cols: Option<usize>,
    pub echo_size_bytes: Option<u64>,
    pub pressure_file: Option<String>,
    pub pressure_rows: usize,
    pub pressure_cols: usize,
    pub pressure_size_bytes: Option<u64>,
    pub note: String,
}

impl SummaryRow {
    pub fn echo(
        folder_path: &str,
        echo_file: &str,
        rows: usize,
        cols: usize,
        size_bytes: Option<u64>,
        pressure: &PressureStats,
        note: String,
    ) -> Self {
        Self {
            folder_path: folder_path.to_string(),
            echo_file: Some(echo_file.to_string()),
            echo_rows: Some(rows),
            echo_cols: Some(cols),
            echo_size_bytes: size_bytes,
            pressure_file: pressure.file.clone(),
            pressure_rows: pressure.rows,
            pressure_cols: pressure.cols,
            pressure_size_bytes: pressure.size_bytes,
            note,
        }
    }

    /// Visibility row for a folder holding a pressure file and no echoes.
    pub fn pressure_only(folder_path: &str, pressure: &PressureStats) -> Self {
        Self {
            folder_path: folder_path.to_string(),
            echo_file: None,
            echo_rows: None,
            echo_cols: None,
            echo_size_bytes: None,
            pressure_file: pressure.file.clone(),
            pressure_rows: pressure.rows,
            pressure_cols: pressure.cols,
            pressure_size_bytes: pressure.size_bytes,
            note: NOTE_ONLY_PRESSURE.to_string(),
        }
    }
}

/// First free key among `base`, `base#2`, `base#3`, ...
pub fn folder_key(base: &str, used: &HashSet<String>) -> String {
    let mut key = base.to_string();
    let mut i = 2;
    while used.contains(&key) {
        key = format!("{}#{}", base, i);
        i += 1;
    }
    key
}

/// Folder key → echo entries, kept in insertion (discovery) order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetIndex {
    folders: Vec<(String, Vec<EchoEntry>)>,
    used_keys: HashSet<String>,
}

impl DatasetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a folder's entries under a collision-free key derived from
    /// `base` and return the key that was used.
    pub fn insert(&mut self, base: &str, entries: Vec<EchoEntry>) -> String {
        let key = folder_key(base, &self.used_keys);
        self.used_keys.insert(key.clone());
        self.folders.push((key.clone(), entries));
        key
    }

    pub fn get(&self, key: &str) -> Option<&[EchoEntry]> {
        self.folders
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, entries)| entries.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.folders.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn echo_count(&self) -> usize {
        self.folders.iter().map(|(_, entries)| entries.len()).sum()
    }
}

impl Serialize for DatasetIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.folders.len()))?;
        for (key, entries) in &self.folders {
            map.serialize_entry(key, entries)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(echo: &str) -> EchoEntry {
        EchoEntry {
            echo: echo.to_string(),
            press: Some("pressure.csv".to_string()),
        }
    }

    #[test]
    fn test_folder_key_probes_suffixes() {
        let mut used = HashSet::new();
        assert_eq!(folder_key("trial", &used), "trial");
        used.insert("trial".to_string());
        assert_eq!(folder_key("trial", &used), "trial#2");
        used.insert("trial#2".to_string());
        assert_eq!(folder_key("trial", &used), "trial#3");
    }

    #[test]
    fn test_index_keys_in_insertion_order() {
        let mut index = DatasetIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.insert("trial", vec![entry("a.csv")]), "trial");
        assert_eq!(index.insert("run1", vec![]), "run1");
        assert_eq!(index.insert("trial", vec![entry("b.csv")]), "trial#2");

        let keys: Vec<&str> = index.keys().collect();
        assert_eq!(keys, vec!["trial", "run1", "trial#2"]);
        assert_eq!(index.get("trial#2").unwrap()[0].echo, "b.csv");
        assert_eq!(index.echo_count(), 2);
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_literal_suffixed_base_does_not_collide() {
        let mut index = DatasetIndex::new();
        index.insert("trial#2", vec![]);
        index.insert("trial", vec![]);
        assert_eq!(index.insert("trial", vec![]), "trial#3");
    }

    #[test]
    fn test_index_serializes_as_ordered_object() {
        let mut index = DatasetIndex::new();
        index.insert("zeta", vec![entry("e1.csv")]);
        index.insert(
            "alpha",
            vec![EchoEntry {
                echo: "e2.csv".to_string(),
                press: None,
            }],
        );

        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(
            json,
            r#"{"zeta":[{"echo":"e1.csv","press":"pressure.csv"}],"alpha":[{"echo":"e2.csv","press":null}]}"#
        );
    }
}
