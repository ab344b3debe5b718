use anyhow::Result;
use std::io::Write;

use crate::domain::{JournalEntry, format_amount};

/// Output encodings for journal exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// Write entries as CSV: an entries section, a blank row, then an items
/// section keyed by entry id. Returns the number of entries written.
pub fn export_journal_csv<W: Write>(entries: &[&JournalEntry], mut writer: W) -> Result<usize> {
    {
        let mut csv_writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(&mut writer);

        csv_writer.write_record(["Journal Entries"])?;
        csv_writer.write_record(["ID", "Date", "Reference", "Description", "Status"])?;

        for entry in entries {
            csv_writer.write_record([
                entry.id.to_string(),
                entry.entry_date.format("%Y-%m-%d").to_string(),
                entry.reference.clone().unwrap_or_default(),
                entry.description.clone().unwrap_or_default(),
                entry.status.label().to_string(),
            ])?;
        }
        csv_writer.flush()?;
    }

    writer.write_all(b"\n")?;

    {
        let mut csv_writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(&mut writer);

        csv_writer.write_record(["Journal Items"])?;
        csv_writer.write_record([
            "Journal Entry ID",
            "Account",
            "Description",
            "Debit Amount",
            "Credit Amount",
        ])?;

        for entry in entries {
            for item in &entry.items {
                csv_writer.write_record([
                    entry.id.to_string(),
                    item.account.clone(),
                    item.description.clone().unwrap_or_default(),
                    format_amount(item.debit_amount()),
                    format_amount(item.credit_amount()),
                ])?;
            }
        }
        csv_writer.flush()?;
    }

    writer.flush()?;
    Ok(entries.len())
}

/// Write entries as a pretty-printed JSON array; readable by `read_journal_json`.
pub fn export_journal_json<W: Write>(entries: &[&JournalEntry], mut writer: W) -> Result<usize> {
    serde_json::to_writer_pretty(&mut writer, entries)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(entries.len())
}

pub fn export_journal<W: Write>(
    entries: &[&JournalEntry],
    format: ExportFormat,
    writer: W,
) -> Result<usize> {
    match format {
        ExportFormat::Csv => export_journal_csv(entries, writer),
        ExportFormat::Json => export_journal_json(entries, writer),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::{JournalItem, Side};
    use crate::io::read_journal_json;

    fn sample_entry() -> JournalEntry {
        JournalEntry::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            vec![
                JournalItem::new("6000", Side::Debit, Decimal::new(12005, 2))
                    .with_description("Rent"),
                JournalItem::new("1000", Side::Credit, Decimal::new(12005, 2)),
            ],
        )
        .with_reference("JE-1")
    }

    #[test]
    fn test_export_csv_sections() {
        let entry = sample_entry();
        let mut out = Vec::new();
        let count = export_journal_csv(&[&entry], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(count, 1);
        assert_eq!(lines[0], "Journal Entries");
        assert_eq!(lines[1], "ID,Date,Reference,Description,Status");
        assert_eq!(lines[2], format!("{},2024-03-01,JE-1,,Draft", entry.id));
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Journal Items");
        assert_eq!(lines[6], format!("{},6000,Rent,120.05,0.00", entry.id));
        assert_eq!(lines[7], format!("{},1000,,0.00,120.05", entry.id));
    }

    #[test]
    fn test_export_json_reads_back() {
        let entry = sample_entry();
        let mut out = Vec::new();
        export_journal(&[&entry], ExportFormat::Json, &mut out).unwrap();

        let entries = read_journal_json(out.as_slice()).unwrap();
        assert_eq!(entries, vec![entry]);
    }
}
