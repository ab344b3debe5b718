use anyhow::Result;
use clap::Parser;
use journal_balance::cli::{Cli, Outcome};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    journal_balance::logging::init(cli.verbose);

    Ok(match cli.run()? {
        Outcome::Ok => ExitCode::SUCCESS,
        Outcome::Rejected => ExitCode::FAILURE,
    })
}
