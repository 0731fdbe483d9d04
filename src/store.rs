//! Persistence for the record collection and the small settings values.
//!
//! A flat key-value layout: one document holds the full JSON-encoded
//! record array, and a few sibling keys hold the anniversary setting and
//! the merit counter as plain text. Every key is a file under the data
//! directory, and every write is a whole-document atomic replace.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info, warn};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::{Category, JournalError, Record, Result};

/// Key holding the full record array.
const RECORDS_KEY: &str = "lulu_app_data.json";
/// Key holding the anniversary reference date.
const ANNIVERSARY_DATE_KEY: &str = "lulu_anniversary_date";
/// Key holding the anniversary label.
const ANNIVERSARY_TITLE_KEY: &str = "lulu_anniversary_title";
/// Key holding the wooden-fish tap counter.
const MERIT_COUNT_KEY: &str = "lulu_merit_count";

/// Default anniversary applied on first run.
pub const DEFAULT_ANNIVERSARY_DATE: &str = "2025-12-28";
pub const DEFAULT_ANNIVERSARY_TITLE: &str = "我们相识";

/// How many characters of an embedded image survive CSV export.
const CSV_IMAGE_PREFIX_LEN: usize = 50;

/// Manages the storage and retrieval of journal records and settings.
///
/// The store is a pass-through serializer: it never mutates records on
/// its own.
pub struct RecordStore {
    /// Directory holding all persisted documents
    data_dir: PathBuf,
}

impl RecordStore {
    /// Creates a store rooted at `data_dir`, creating the directory if
    /// needed.
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        if !data_dir.exists() {
            debug!("Data directory does not exist, creating: {}", data_dir.display());
            fs::create_dir_all(&data_dir).map_err(|_| JournalError::DirectoryError {
                path: data_dir.clone(),
            })?;
        }

        Ok(Self { data_dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(key)
    }

    /// Loads the persisted record collection.
    ///
    /// Fails soft: a missing or corrupt document degrades to an empty
    /// collection and is only logged, never raised to the caller.
    pub fn load(&self) -> Vec<Record> {
        let path = self.key_path(RECORDS_KEY);

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No record document at {}, starting empty", path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read record document {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Record>>(&raw) {
            Ok(records) => {
                debug!("Loaded {} records from {}", records.len(), path.display());
                records
            }
            Err(e) => {
                warn!(
                    "Record document {} is corrupt ({}), starting empty",
                    path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Serializes and persists the full collection as one atomic
    /// whole-document replace.
    ///
    /// A write rejected for lack of space surfaces as
    /// [`JournalError::QuotaExceeded`]; the previously persisted document
    /// is left intact either way.
    pub fn save(&self, records: &[Record]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.write_atomic(RECORDS_KEY, json.as_bytes())?;
        info!("Saved {} records", records.len());
        Ok(())
    }

    /// Atomically replaces the document at `key` with `bytes`.
    fn write_atomic(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.key_path(key);
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut temp_file = NamedTempFile::new_in(dir).map_err(map_write_error)?;
        temp_file.write_all(bytes).map_err(map_write_error)?;
        temp_file.flush().map_err(map_write_error)?;
        temp_file
            .persist(&path)
            .map_err(|e| map_write_error(e.error))?;

        Ok(())
    }

    /// Pretty-prints the collection as a downloadable JSON backup.
    pub fn export_json(&self, records: &[Record], output: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        fs::write(output, json)?;
        info!(
            "Exported {} records as JSON to {}",
            records.len(),
            output.display()
        );
        Ok(())
    }

    /// Default date-stamped name for a JSON backup.
    pub fn default_json_export_name() -> String {
        format!("lulu_backup_{}.json", Utc::now().format("%Y-%m-%d"))
    }

    /// Writes the collection as a spreadsheet-friendly CSV summary.
    ///
    /// Lossy by design: embedded image payloads are truncated to a short
    /// placeholder, so this is not a backup format.
    pub fn export_csv(&self, records: &[Record], output: &Path) -> Result<()> {
        fs::write(output, records_to_csv(records))?;
        info!(
            "Exported {} records as CSV to {}",
            records.len(),
            output.display()
        );
        Ok(())
    }

    /// Default date-stamped name for a CSV export.
    pub fn default_csv_export_name() -> String {
        format!("lulu_records_{}.csv", Utc::now().format("%Y-%m-%d"))
    }

    /// Parses, validates, and persists an imported JSON backup, replacing
    /// the entire collection.
    ///
    /// Any parse failure or shape mismatch returns
    /// [`JournalError::InvalidFormat`] before anything is written, so
    /// existing state is untouched on failure.
    pub fn import_json(&self, bytes: &[u8]) -> Result<Vec<Record>> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| JournalError::InvalidFormat {
                message: format!("Not valid JSON: {}", e),
            })?;

        let items = value.as_array().ok_or_else(|| JournalError::InvalidFormat {
            message: "Top-level value must be an array of records".to_string(),
        })?;

        for (index, item) in items.iter().enumerate() {
            validate_record_shape(item).map_err(|message| JournalError::InvalidFormat {
                message: format!("Record {}: {}", index, message),
            })?;
        }

        let records: Vec<Record> =
            serde_json::from_value(value).map_err(|e| JournalError::InvalidFormat {
                message: format!("Record array failed to deserialize: {}", e),
            })?;

        self.save(&records)?;
        info!("Imported {} records, previous collection replaced", records.len());
        Ok(records)
    }

    /// Loads the anniversary date and title, writing and returning the
    /// defaults the first time around.
    pub fn load_anniversary(&self) -> Result<(String, String)> {
        let date = match self.read_setting(ANNIVERSARY_DATE_KEY) {
            Some(date) => date,
            None => {
                debug!("No anniversary date stored, applying default");
                self.write_atomic(ANNIVERSARY_DATE_KEY, DEFAULT_ANNIVERSARY_DATE.as_bytes())?;
                DEFAULT_ANNIVERSARY_DATE.to_string()
            }
        };

        let title = match self.read_setting(ANNIVERSARY_TITLE_KEY) {
            Some(title) => title,
            None => {
                self.write_atomic(ANNIVERSARY_TITLE_KEY, DEFAULT_ANNIVERSARY_TITLE.as_bytes())?;
                DEFAULT_ANNIVERSARY_TITLE.to_string()
            }
        };

        Ok((date, title))
    }

    /// Persists the anniversary date and label together.
    pub fn save_anniversary(&self, date: &str, title: &str) -> Result<()> {
        self.write_atomic(ANNIVERSARY_DATE_KEY, date.as_bytes())?;
        self.write_atomic(ANNIVERSARY_TITLE_KEY, title.as_bytes())?;
        info!("Anniversary updated: {} ({})", date, title);
        Ok(())
    }

    /// Loads the tap counter; absent or unreadable degrades to 0.
    pub fn load_merit(&self) -> u64 {
        self.read_setting(MERIT_COUNT_KEY)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Persists the tap counter.
    pub fn save_merit(&self, count: u64) -> Result<()> {
        self.write_atomic(MERIT_COUNT_KEY, count.to_string().as_bytes())
    }

    fn read_setting(&self, key: &str) -> Option<String> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read setting {}: {}", path.display(), e);
                None
            }
        }
    }
}

fn map_write_error(e: io::Error) -> JournalError {
    match e.kind() {
        io::ErrorKind::StorageFull | io::ErrorKind::QuotaExceeded => JournalError::QuotaExceeded,
        _ => JournalError::Io(e),
    }
}

/// Renders the collection as CSV with a UTF-8 BOM so spreadsheet tools
/// pick the right encoding.
fn records_to_csv(records: &[Record]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push("ID,Date,Title,Category,Content,ImageURL".to_string());

    for record in records {
        let date = DateTime::<Utc>::from_timestamp_millis(record.date)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        let image = match &record.image {
            Some(image) => {
                let prefix: String = image.chars().take(CSV_IMAGE_PREFIX_LEN).collect();
                format!("\"{}...\"", prefix)
            }
            None => String::new(),
        };

        lines.push(format!(
            "{},{},{},{},{},{}",
            record.id,
            date,
            csv_quote(&record.title),
            record.category,
            csv_quote(&record.content),
            image
        ));
    }

    format!("\u{FEFF}{}", lines.join("\n"))
}

/// Encloses a free-text field in quotes, doubling internal quotes.
fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Field presence/type checks for one imported record object.
fn validate_record_shape(value: &Value) -> std::result::Result<(), String> {
    let obj = value.as_object().ok_or("expected an object")?;

    for field in ["id", "title", "content"] {
        match obj.get(field) {
            Some(v) if v.is_string() => {}
            Some(_) => return Err(format!("field '{}' must be a string", field)),
            None => return Err(format!("missing field '{}'", field)),
        }
    }

    match obj.get("category").and_then(Value::as_str) {
        Some(label) if Category::from_label(label).is_some() => {}
        Some(label) => return Err(format!("unknown category '{}'", label)),
        None => return Err("missing or non-string field 'category'".to_string()),
    }

    match obj.get("date") {
        Some(v) if v.as_i64().is_some() => {}
        Some(_) => return Err("field 'date' must be an integer".to_string()),
        None => return Err("missing field 'date'".to_string()),
    }

    for field in ["image", "bgColor", "sticker"] {
        if let Some(v) = obj.get(field) {
            if !v.is_string() && !v.is_null() {
                return Err(format!("field '{}' must be a string when present", field));
            }
        }
    }

    Ok(())
}
