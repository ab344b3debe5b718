use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::application::{EntryFilter, JournalService, ValidatorConfig};
use crate::domain::{
    BalanceResult, ENTRY_DATE_FORMAT, EntryStatus, JournalEntry, SubmissionReport, format_amount,
};
use crate::io::{ExportFormat, export_journal, load_entry_form, load_journal, load_lines};

/// journal-balance - double-entry journal checks
#[derive(Parser)]
#[command(name = "journal-balance")]
#[command(about = "Check that journal entries balance before they are submitted or posted")]
#[command(version)]
pub struct Cli {
    /// Largest debit/credit difference still treated as rounding noise
    #[arg(short, long, global = true, default_value = "0.01")]
    pub tolerance: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show debit and credit totals for a set of entry lines
    Totals {
        /// Lines file: CSV (account,description,side,amount) or JSON array
        input: PathBuf,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Run the pre-submission checks on a journal entry form (JSON)
    Check {
        /// Entry form file
        input: PathBuf,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List journal entries
    List {
        /// Journal file (JSON array of entries)
        journal: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Post a draft journal entry and write the updated journal
    Post {
        /// Journal file (JSON array of entries)
        journal: PathBuf,

        /// Entry ID to post
        id: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export journal entries to CSV or JSON
    Export {
        /// Journal file (JSON array of entries)
        journal: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,
    },
}

#[derive(clap::Args)]
pub struct FilterArgs {
    /// Filter from entry date (YYYY-MM-DD)
    #[arg(long)]
    pub from_date: Option<String>,

    /// Filter to entry date (YYYY-MM-DD)
    #[arg(long)]
    pub to_date: Option<String>,

    /// Filter by status: draft, posted
    #[arg(long)]
    pub status: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> Result<EntryFilter> {
        let from_date = self
            .from_date
            .as_deref()
            .map(parse_date)
            .transpose()
            .context("Invalid from-date")?;
        let to_date = self
            .to_date
            .as_deref()
            .map(parse_date)
            .transpose()
            .context("Invalid to-date")?;
        let status = self
            .status
            .as_deref()
            .map(|s| {
                EntryStatus::from_str(s).ok_or_else(|| {
                    anyhow::anyhow!("Invalid status '{}'. Valid statuses: draft, posted", s)
                })
            })
            .transpose()?;

        Ok(EntryFilter {
            from_date,
            to_date,
            status,
        })
    }
}

/// Outcome of a command that doesn't fail but should not exit cleanly,
/// such as an unbalanced entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Rejected,
}

impl Cli {
    pub fn run(self) -> Result<Outcome> {
        let config = ValidatorConfig::parse_tolerance(&self.tolerance)?;

        match self.command {
            Commands::Totals { input, format } => run_totals_command(config, &input, &format),
            Commands::Check { input, format } => run_check_command(config, &input, &format),
            Commands::List { journal, filter } => {
                let service = JournalService::with_entries(config, load_journal(&journal)?);
                run_list_command(&service, &filter.to_filter()?)?;
                Ok(Outcome::Ok)
            }
            Commands::Post {
                journal,
                id,
                output,
            } => {
                let entry_id =
                    Uuid::parse_str(&id).context("Invalid entry ID format (expected UUID)")?;
                let mut service = JournalService::with_entries(config, load_journal(&journal)?);
                let entry = service.post_entry(entry_id)?;
                eprintln!(
                    "Posted journal entry {} ({})",
                    entry.id,
                    entry.entry_date.format(ENTRY_DATE_FORMAT)
                );

                let entries: Vec<&JournalEntry> = service.entries().iter().collect();
                export_journal(&entries, ExportFormat::Json, open_output(output.as_deref())?)?;
                Ok(Outcome::Ok)
            }
            Commands::Export {
                journal,
                filter,
                output,
                format,
            } => {
                let service = JournalService::with_entries(config, load_journal(&journal)?);
                let export_format = ExportFormat::from_str(&format).ok_or_else(|| {
                    anyhow::anyhow!("Invalid export format '{}'. Valid formats: csv, json", format)
                })?;
                let entries = service.list_entries(&filter.to_filter()?);
                let count =
                    export_journal(&entries, export_format, open_output(output.as_deref())?)?;
                if output.is_some() {
                    eprintln!("Exported {} journal entries", count);
                }
                Ok(Outcome::Ok)
            }
        }
    }
}

fn run_totals_command(config: ValidatorConfig, input: &Path, format: &str) -> Result<Outcome> {
    let import = load_lines(input)?;
    for error in &import.errors {
        eprintln!("Skipped {}", error);
    }

    let service = JournalService::new(config);
    let result = service.totals(&import.lines);

    match format {
        "json" => print_json(&TotalsView::from(result))?,
        "table" => print_totals(&result),
        _ => anyhow::bail!("Invalid format '{}'. Valid formats: table, json", format),
    }

    Ok(if result.is_balanced {
        Outcome::Ok
    } else {
        Outcome::Rejected
    })
}

fn run_check_command(config: ValidatorConfig, input: &Path, format: &str) -> Result<Outcome> {
    let form = load_entry_form(input)?;
    let service = JournalService::new(config);
    let report = service.check(&form);

    match format {
        "json" => print_json(&report)?,
        "table" => print_report(&report),
        _ => anyhow::bail!("Invalid format '{}'. Valid formats: table, json", format),
    }

    Ok(if report.is_accepted() {
        Outcome::Ok
    } else {
        Outcome::Rejected
    })
}

fn run_list_command(service: &JournalService, filter: &EntryFilter) -> Result<()> {
    let entries = service.list_entries(filter);
    if entries.is_empty() {
        println!("No journal entries found.");
        return Ok(());
    }

    println!(
        "{:<12} {:<12} {:<8} {:>12} {:<10} DESCRIPTION",
        "DATE", "REFERENCE", "STATUS", "AMOUNT", "BALANCE"
    );
    println!("{}", "-".repeat(72));

    let tolerance = service.config().tolerance;
    for entry in entries {
        let balance = entry.balance(tolerance);
        println!(
            "{:<12} {:<12} {:<8} {:>12} {:<10} {}",
            entry.entry_date.format(ENTRY_DATE_FORMAT),
            truncate(entry.reference.as_deref().unwrap_or(""), 12),
            entry.status.label(),
            format_amount(balance.total_debit),
            if balance.is_balanced { "OK" } else { "UNBALANCED" },
            truncate(entry.description.as_deref().unwrap_or(""), 30)
        );
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct TotalsView {
    total_debit: String,
    total_credit: String,
    difference: String,
    is_balanced: bool,
}

impl From<BalanceResult> for TotalsView {
    fn from(result: BalanceResult) -> Self {
        Self {
            total_debit: result.total_debit.to_string(),
            total_credit: result.total_credit.to_string(),
            difference: result.difference().to_string(),
            is_balanced: result.is_balanced,
        }
    }
}

fn print_totals(result: &BalanceResult) {
    println!("  {:<12} {:>12}", "Debits:", format!("${}", format_amount(result.total_debit)));
    println!("  {:<12} {:>12}", "Credits:", format!("${}", format_amount(result.total_credit)));
    println!("  {}", "-".repeat(25));
    println!(
        "  {:<12} {:>12}  {}",
        "Difference:",
        format!("${}", format_amount(result.difference())),
        if result.is_balanced {
            "BALANCED"
        } else {
            "UNBALANCED"
        }
    );
}

fn print_report(report: &SubmissionReport) {
    print_totals(&report.balance);
    println!();

    if report.is_accepted() {
        println!("Journal entry can be submitted.");
    } else {
        println!("Journal entry cannot be submitted:");
        for issue in &report.issues {
            println!("  - {}", issue);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut out = stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(stdout()),
    })
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, ENTRY_DATE_FORMAT).context("Date must be in YYYY-MM-DD format")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Rent", 12), "Rent");
        assert_eq!(truncate("Quarterly insurance premium", 12), "Quarterly...");
    }

    #[test]
    fn test_filter_args() {
        let args = FilterArgs {
            from_date: Some("2024-01-01".into()),
            to_date: None,
            status: Some("Posted".into()),
        };
        let filter = args.to_filter().unwrap();
        assert_eq!(filter.from_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.status, Some(EntryStatus::Posted));

        let bad = FilterArgs {
            from_date: None,
            to_date: Some("01/31/2024".into()),
            status: None,
        };
        assert!(bad.to_filter().is_err());
    }

    #[test]
    fn test_cli_parses_global_tolerance() {
        let cli = Cli::try_parse_from(["journal-balance", "totals", "lines.csv", "-t", "0.05"])
            .unwrap();
        assert_eq!(cli.tolerance, "0.05");
        assert!(matches!(cli.command, Commands::Totals { .. }));
    }
}
