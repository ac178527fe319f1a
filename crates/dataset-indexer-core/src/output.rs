use crate::error::Error;
use crate::model::SummaryRow;
use csv::{Terminator, WriterBuilder};
use serde::Serialize;
use std::fs::{self, File};
use std::fmt::Write as _;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const INDEX_FILE_NAME: &str = "dataset_index.json";
pub const SUMMARY_FILE_NAME: &str = "summary.csv";
pub const ERROR_LOG_FILE_NAME: &str = "errors.log";

fn ensure_parent(path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write `value` as two-space-indented, ASCII-only JSON to `<path>.tmp`, then
/// rename it over `path` so readers never observe a partial file.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), Error> {
    ensure_parent(path)?;

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        let json = escape_non_ascii(&serde_json::to_string_pretty(value)?);
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Replace every non-ASCII character with `\uXXXX` escapes (UTF-16 surrogate
/// pairs above the BMP). Non-ASCII only ever appears inside JSON strings.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{:04x}", unit);
            }
        }
    }
    out
}

/// Write the summary table: header row, then one CRLF-terminated record per
/// row with absent values left empty.
pub fn write_summary_csv(path: &Path, rows: &[SummaryRow]) -> Result<(), Error> {
    ensure_parent(path)?;

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .has_headers(false)
        .from_path(path)?;
    writer.write_record([
        "folder_path",
        "echo_file",
        "echo_rows",
        "echo_cols",
        "echo_size_bytes",
        "pressure_file",
        "pressure_rows",
        "pressure_cols",
        "pressure_size_bytes",
        "note",
    ])?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// One error per line with a trailing newline; an empty file when there are
/// none.
pub fn write_error_log(path: &Path, errors: &[String]) -> Result<(), Error> {
    ensure_parent(path)?;

    let mut contents = errors.join("\n");
    if !errors.is_empty() {
        contents.push('\n');
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DatasetIndex, EchoEntry, PressureStats};
    use tempfile::tempdir;

    fn pressure() -> PressureStats {
        PressureStats {
            file: Some("pressure.csv".to_string()),
            rows: 4,
            cols: 2,
            size_bytes: Some(40),
        }
    }

    #[test]
    fn test_summary_csv_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("summary.csv");
        let rows = vec![
            SummaryRow::echo("/data/run1", "echo_a.csv", 3, 3, Some(30), &pressure(), String::new()),
            SummaryRow::pressure_only("/data/run2", &pressure()),
        ];

        write_summary_csv(&path, &rows).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "folder_path,echo_file,echo_rows,echo_cols,echo_size_bytes,pressure_file,pressure_rows,pressure_cols,pressure_size_bytes,note\r\n\
             /data/run1,echo_a.csv,3,3,30,pressure.csv,4,2,40,\r\n\
             /data/run2,,,,,pressure.csv,4,2,40,only_pressure_csv\r\n"
        );
    }

    #[test]
    fn test_summary_csv_quotes_when_needed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let rows = vec![SummaryRow::echo(
            "/data/a,b",
            "e.csv",
            0,
            0,
            None,
            &PressureStats::default(),
            "empty_or_unreadable; missing_pressure_csv".to_string(),
        )];

        write_summary_csv(&path, &rows).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let last = text.lines().last().unwrap();
        assert_eq!(
            last,
            "\"/data/a,b\",e.csv,0,0,,,0,0,,empty_or_unreadable; missing_pressure_csv"
        );
    }

    #[test]
    fn test_json_written_atomically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset_index.json");
        let mut index = DatasetIndex::new();
        index.insert(
            "run1",
            vec![EchoEntry {
                echo: "a.csv".to_string(),
                press: None,
            }],
        );

        write_json_atomic(&path, &index).unwrap();

        assert!(!dir.path().join("dataset_index.json.tmp").exists());
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "{\n  \"run1\": [\n    {\n      \"echo\": \"a.csv\",\n      \"press\": null\n    }\n  ]\n}"
        );
    }

    #[test]
    fn test_json_escapes_non_ascii_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset_index.json");
        let mut index = DatasetIndex::new();
        index.insert(
            "Messung_é",
            vec![EchoEntry {
                echo: "échantillon_😀.csv".to_string(),
                press: None,
            }],
        );

        write_json_atomic(&path, &index).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.is_ascii());
        assert!(text.contains(r#""Messung_\u00e9""#), "{}", text);
        assert!(text.contains(r#""\u00e9chantillon_\ud83d\ude00.csv""#), "{}", text);

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["Messung_é"][0]["echo"], "échantillon_😀.csv");
    }

    #[test]
    fn test_error_log_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("errors.log");

        write_error_log(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        let errors = vec!["first".to_string(), "second".to_string()];
        write_error_log(&path, &errors).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
