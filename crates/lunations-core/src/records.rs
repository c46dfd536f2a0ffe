//! Record table of already-reported articles
//!
//! A CSV file with a fixed five-column schema:
//!
//! | column    | type      |
//! |-----------|-----------|
//! | `id`      | int32     |
//! | `updated` | bytes(26) |
//! | `title`   | bytes(500)|
//! | `bibcode` | bytes(100)|
//! | `pubdate` | bytes(100)|
//!
//! Rows are only ever appended; the whole file is rewritten on save. The id
//! column is the deduplication key across runs.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Record file {path} is unreadable (utf-8: {utf8}; latin-1: {latin1})")]
    Unreadable {
        path: PathBuf,
        utf8: String,
        latin1: String,
    },

    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int32,
    /// Fixed-width byte string
    Bytes(usize),
}

/// Descriptor for a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    pub dtype: ColumnType,
}

const UPDATED_BYTES: usize = 26;
const TITLE_BYTES: usize = 500;
const BIBCODE_BYTES: usize = 100;
const PUBDATE_BYTES: usize = 100;

/// The record table schema, in file column order
pub const RECORD_SCHEMA: [ColumnDescriptor; 5] = [
    ColumnDescriptor { name: "id", dtype: ColumnType::Int32 },
    ColumnDescriptor { name: "updated", dtype: ColumnType::Bytes(UPDATED_BYTES) },
    ColumnDescriptor { name: "title", dtype: ColumnType::Bytes(TITLE_BYTES) },
    ColumnDescriptor { name: "bibcode", dtype: ColumnType::Bytes(BIBCODE_BYTES) },
    ColumnDescriptor { name: "pubdate", dtype: ColumnType::Bytes(PUBDATE_BYTES) },
];

/// One reported article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i32,
    pub updated: String,
    pub title: String,
    pub bibcode: String,
    pub pubdate: String,
}

impl Record {
    /// Clip string fields to their schema widths
    fn clipped(self) -> Self {
        Self {
            id: self.id,
            updated: truncate_bytes(self.updated, UPDATED_BYTES),
            title: truncate_bytes(self.title, TITLE_BYTES),
            bibcode: truncate_bytes(self.bibcode, BIBCODE_BYTES),
            pubdate: truncate_bytes(self.pubdate, PUBDATE_BYTES),
        }
    }
}

/// Truncate to at most `width` bytes without splitting a character
fn truncate_bytes(mut s: String, width: usize) -> String {
    if s.len() > width {
        let mut end = width;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}

/// Text encodings tried, in order, when loading the record file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordEncoding {
    Utf8,
    Latin1,
}

impl RecordEncoding {
    fn decode(&self, bytes: &[u8]) -> Result<String, String> {
        match self {
            RecordEncoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| e.to_string()),
            // Every byte maps to the code point of the same value
            RecordEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// The in-memory record table
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    ids: HashSet<i32>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table at `path`, or an empty table if the file does not exist.
    ///
    /// The file is decoded as UTF-8 and parsed; if either step fails it is
    /// decoded as Latin-1 and parsed again. Failure under both is an error.
    pub fn load(path: &Path) -> Result<Self, RecordError> {
        if !path.exists() {
            tracing::info!("No record file at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let bytes = fs::read(path).map_err(|e| RecordError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let utf8 = match Self::parse_with(&bytes, RecordEncoding::Utf8) {
            Ok(store) => return Ok(store),
            Err(e) => e,
        };
        tracing::warn!("Record file is not valid UTF-8 CSV ({}), retrying as Latin-1", utf8);

        Self::parse_with(&bytes, RecordEncoding::Latin1).map_err(|latin1| {
            RecordError::Unreadable {
                path: path.to_path_buf(),
                utf8,
                latin1,
            }
        })
    }

    fn parse_with(bytes: &[u8], encoding: RecordEncoding) -> Result<Self, String> {
        let text = encoding.decode(bytes)?;
        Self::parse(&text)
    }

    /// Parse CSV text with a header row matching [`RECORD_SCHEMA`]
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers().map_err(|e| e.to_string())?;
        let expected: Vec<&str> = RECORD_SCHEMA.iter().map(|c| c.name).collect();
        let found: Vec<&str> = headers.iter().collect();
        if found != expected {
            return Err(format!(
                "unexpected columns {:?}, expected {:?}",
                found, expected
            ));
        }

        let mut store = Self::new();
        for result in reader.deserialize::<Record>() {
            let record = result.map_err(|e| e.to_string())?;
            store.push(record);
        }
        Ok(store)
    }

    fn push(&mut self, record: Record) {
        self.ids.insert(record.id);
        self.records.push(record);
    }

    /// Whether an article id has already been reported
    pub fn contains(&self, id: i32) -> bool {
        self.ids.contains(&id)
    }

    /// Append a row, clipping fields to their schema widths
    pub fn append(&mut self, record: Record) {
        self.push(record.clipped());
    }

    /// Every reported article id
    pub fn ids(&self) -> &HashSet<i32> {
        &self.ids
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the whole table to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<(), RecordError> {
        let write_err = |message: String| RecordError::Write {
            path: path.to_path_buf(),
            message,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|e| write_err(e.to_string()))?;

        writer
            .write_record(RECORD_SCHEMA.iter().map(|c| c.name))
            .map_err(|e| write_err(e.to_string()))?;
        for record in &self.records {
            writer
                .serialize(record)
                .map_err(|e| write_err(e.to_string()))?;
        }
        writer.flush().map_err(|e| write_err(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(id: i32, title: &str) -> Record {
        Record {
            id,
            updated: "2024-04-02 09:15:00.000000".to_string(),
            title: title.to_string(),
            bibcode: format!("2024ApJ...{}", id),
            pubdate: "2024-03-00".to_string(),
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::load(&dir.path().join("records.csv")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.csv");

        let mut store = RecordStore::new();
        store.append(record(12, "Dust, \"gas\", and stars"));
        store.append(record(34, "Quasars"));
        store.save(&path).unwrap();

        let loaded = RecordStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.contains(12));
        assert!(loaded.contains(34));
        assert!(!loaded.contains(56));
        assert_eq!(loaded.records()[0].title, "Dust, \"gas\", and stars");
    }

    #[test]
    fn test_empty_store_writes_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.csv");

        RecordStore::new().save(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim(), "id,updated,title,bibcode,pubdate");

        let loaded = RecordStore::load(&path).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_latin1_fallback() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.csv");

        let mut bytes = b"id,updated,title,bibcode,pubdate\n7,2024-01-01 00:00:00.000000,Caf".to_vec();
        bytes.push(0xE9); // é in Latin-1, invalid as UTF-8
        bytes.extend_from_slice(b",2024A&A...1,2024-01-00\n");
        fs::write(&path, bytes).unwrap();

        let loaded = RecordStore::load(&path).unwrap();
        assert!(loaded.contains(7));
        assert_eq!(loaded.records()[0].title, "Café");
    }

    #[test]
    fn test_unreadable_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(&path, "id,updated,title,bibcode,pubdate\nnot-a-number,x,y,z,w\n").unwrap();

        let err = RecordStore::load(&path).unwrap_err();
        assert!(matches!(err, RecordError::Unreadable { .. }));
    }

    #[test]
    fn test_wrong_schema_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(&path, "id,title\n1,x\n").unwrap();

        assert!(RecordStore::load(&path).is_err());
    }

    #[test]
    fn test_ids() {
        let mut store = RecordStore::new();
        store.append(record(12, "Quasars"));
        store.append(record(34, "Pulsars"));

        let expected: HashSet<i32> = [12, 34].into_iter().collect();
        assert_eq!(store.ids(), &expected);
    }

    #[test]
    fn test_utf8_titles_are_not_read_as_latin1() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.csv");
        let title = "Ångström-scale dust near η Carinae: café au lait";

        let mut store = RecordStore::new();
        store.append(record(9, title));
        store.save(&path).unwrap();

        let loaded = RecordStore::load(&path).unwrap();
        assert_eq!(loaded.records()[0].title, title);

        fs::write(
            &path,
            format!("id,updated,title,bibcode,pubdate\n10,2024-01-01 00:00:00.000000,{},x,2024-01-00\n", title),
        )
        .unwrap();
        let loaded = RecordStore::load(&path).unwrap();
        assert_eq!(loaded.records()[0].title, title);
    }

    #[test]
    fn test_append_clips_title() {
        let mut store = RecordStore::new();
        store.append(record(1, &"é".repeat(300)));

        let title = &store.records()[0].title;
        assert!(title.len() <= 500);
        assert_eq!(title.chars().count(), 250);
    }
}
