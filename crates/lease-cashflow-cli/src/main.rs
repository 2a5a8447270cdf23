mod commands;
mod config;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::edit::EditArgs;
use commands::equalize::EqualizeArgs;
use commands::monthly::MonthlyArgs;
use commands::term::TermArgs;
use config::AppConfig;

/// Commercial lease cash flow schedules and equalized comparisons
#[derive(Parser)]
#[command(
    name = "leasecf",
    version,
    about = "Commercial lease cash flow schedules and equalized comparisons",
    long_about = "Turns structured lease descriptions into month-by-month cash flow \
                  schedules with decimal precision: rent steps, free rent, opex \
                  escalation, parking, upfront costs, sublease offsets, NPV and \
                  annual rollups. Compares competing scenarios over a common window."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the monthly cash flow engine for one scenario
    Monthly(MonthlyArgs),
    /// Compare scenarios over a shared calendar window
    Equalize(EqualizeArgs),
    /// Apply field edits to a scenario, keeping free rent consistent
    Edit(EditArgs),
    /// Derive the lease term in months from two dates
    Term(TermArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let config = AppConfig::load().unwrap_or_else(|e| fail(e));
    if let Err(e) = telemetry::init(&config.telemetry) {
        fail(e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Monthly(args) => commands::monthly::run_monthly(args, &config),
        Commands::Equalize(args) => commands::equalize::run_equalize(args, &config),
        Commands::Edit(args) => commands::edit::run_edit(args),
        Commands::Term(args) => commands::term::run_term(args),
        Commands::Version => {
            println!("leasecf {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}
