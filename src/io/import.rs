use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::domain::{EntryForm, JournalEntry, RawLine, Side};

/// Input encodings understood by the loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Guess from a file extension; anything that isn't `.csv` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
            _ => InputFormat::Json,
        }
    }
}

/// Lines read from an input, plus records that could not be read at all.
#[derive(Debug, Clone, Default)]
pub struct LineImport {
    pub lines: Vec<RawLine>,
    pub errors: Vec<ImportError>,
}

/// Error that occurred while reading one record
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub error: String,
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

// Form fields arrive as loosely typed JSON: amounts may be numbers or
// strings, account ids may be numbers, and the side may be anything.
#[derive(Debug, Deserialize)]
struct JsonLine {
    #[serde(default)]
    account: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    amount: Option<Value>,
    #[serde(default, alias = "entry_type")]
    side: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct JsonForm {
    #[serde(default)]
    entry_date: Option<Value>,
    #[serde(default)]
    reference: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default, alias = "items")]
    lines: Vec<JsonLine>,
}

#[derive(Debug, Deserialize)]
struct CsvLine {
    #[serde(default)]
    account: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    side: Option<String>,
    #[serde(default)]
    amount: Option<String>,
}

impl JsonLine {
    fn into_raw(self) -> RawLine {
        RawLine {
            account: self.account.and_then(value_text),
            description: self.description.and_then(value_text),
            amount: self.amount.and_then(value_text),
            side: self
                .side
                .and_then(value_text)
                .and_then(|s| Side::from_str(&s)),
        }
    }
}

impl CsvLine {
    fn into_raw(self) -> RawLine {
        RawLine {
            account: self.account.filter(|s| !s.is_empty()),
            description: self.description.filter(|s| !s.is_empty()),
            amount: self.amount.filter(|s| !s.is_empty()),
            side: self.side.as_deref().and_then(Side::from_str),
        }
    }
}

/// Render a scalar JSON value as the text a form field would hold.
fn value_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Read entry lines from CSV with an `account,description,side,amount` header.
/// Columns may be missing or in any order.
pub fn read_lines_csv<R: Read>(reader: R) -> Result<LineImport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut import = LineImport::default();

    for (line_num, result) in csv_reader.deserialize::<CsvLine>().enumerate() {
        let line = line_num + 2; // +2 for header and 0-indexing
        match result {
            Ok(record) => import.lines.push(record.into_raw()),
            Err(e) => import.errors.push(ImportError {
                line,
                error: format!("CSV parse error: {}", e),
            }),
        }
    }

    Ok(import)
}

/// Read entry lines from a JSON array.
pub fn read_lines_json<R: Read>(reader: R) -> Result<LineImport> {
    let lines: Vec<JsonLine> =
        serde_json::from_reader(reader).context("Expected a JSON array of entry lines")?;
    Ok(LineImport {
        lines: lines.into_iter().map(JsonLine::into_raw).collect(),
        errors: Vec::new(),
    })
}

/// Read an entry form (header fields plus `lines`) from JSON.
pub fn read_entry_form_json<R: Read>(reader: R) -> Result<EntryForm> {
    let form: JsonForm =
        serde_json::from_reader(reader).context("Expected a JSON journal entry form")?;
    Ok(EntryForm {
        entry_date: form.entry_date.and_then(value_text),
        reference: form.reference.and_then(value_text),
        description: form.description.and_then(value_text),
        lines: form.lines.into_iter().map(JsonLine::into_raw).collect(),
    })
}

/// Read a journal (JSON array of entries, as written by the JSON export).
pub fn read_journal_json<R: Read>(reader: R) -> Result<Vec<JournalEntry>> {
    serde_json::from_reader(reader).context("Expected a JSON array of journal entries")
}

pub fn load_lines(path: &Path) -> Result<LineImport> {
    let reader = open(path)?;
    let import = match InputFormat::from_path(path) {
        InputFormat::Csv => read_lines_csv(reader),
        InputFormat::Json => read_lines_json(reader),
    };
    import.with_context(|| format!("Failed to read entry lines from {}", path.display()))
}

pub fn load_entry_form(path: &Path) -> Result<EntryForm> {
    read_entry_form_json(open(path)?)
        .with_context(|| format!("Failed to read entry form from {}", path.display()))
}

pub fn load_journal(path: &Path) -> Result<Vec<JournalEntry>> {
    read_journal_json(open(path)?)
        .with_context(|| format!("Failed to read journal from {}", path.display()))
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    Ok(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(InputFormat::from_path(Path::new("lines.CSV")), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("lines.json")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("lines")), InputFormat::Json);
    }

    #[test]
    fn test_read_lines_csv() {
        let data = "side,amount,account,description\n\
                    debit,100.00,6000,Rent\n\
                    credit,,1000,\n\
                    sideways,abc,,\n";
        let import = read_lines_csv(data.as_bytes()).unwrap();

        assert!(import.errors.is_empty());
        assert_eq!(import.lines.len(), 3);
        assert_eq!(import.lines[0].side, Some(Side::Debit));
        assert_eq!(import.lines[0].amount.as_deref(), Some("100.00"));
        assert_eq!(import.lines[0].description.as_deref(), Some("Rent"));
        assert_eq!(import.lines[1].amount, None);
        assert_eq!(import.lines[1].description, None);
        assert_eq!(import.lines[2].side, None);
        assert_eq!(import.lines[2].amount.as_deref(), Some("abc"));
    }

    #[test]
    fn test_read_lines_json_accepts_loose_types() {
        let data = r#"[
            {"account": 1000, "amount": 9.991, "side": "credit"},
            {"account": "6000", "amount": "10", "entry_type": "debit"},
            {"amount": null, "side": 3}
        ]"#;
        let import = read_lines_json(data.as_bytes()).unwrap();

        assert_eq!(import.lines[0].account.as_deref(), Some("1000"));
        assert_eq!(import.lines[0].amount.as_deref(), Some("9.991"));
        assert_eq!(import.lines[1].side, Some(Side::Debit));
        assert_eq!(import.lines[2].amount, None);
        assert_eq!(import.lines[2].side, None);
    }

    #[test]
    fn test_read_entry_form_json() {
        let data = r#"{
            "entry_date": "2024-03-01",
            "reference": "JE-7",
            "items": [{"account": "6000", "amount": 5, "side": "debit"}]
        }"#;
        let form = read_entry_form_json(data.as_bytes()).unwrap();

        assert_eq!(form.entry_date.as_deref(), Some("2024-03-01"));
        assert_eq!(form.reference.as_deref(), Some("JE-7"));
        assert_eq!(form.description, None);
        assert_eq!(form.lines.len(), 1);
    }

    #[test]
    fn test_read_lines_json_rejects_non_array() {
        assert!(read_lines_json(r#"{"amount": 1}"#.as_bytes()).is_err());
    }
}
