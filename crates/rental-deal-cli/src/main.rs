mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::scenarios::{CompareArgs, OfferGridArgs, SnapshotArgs};
use commands::stress_test::{AnalyzeArgs, StressTestArgs};
use commands::underwriting::{CashFlowArgs, DealScoreArgs, MortgageArgs};

/// Rental property deal analysis
#[derive(Parser)]
#[command(
    name = "deal",
    version,
    about = "Rental property deal analysis",
    long_about = "A CLI for underwriting residential rental deals with decimal precision. \
                  Computes mortgage payments, cash flow and return ratios, adjusted deal \
                  scores, stress tests with break-even thresholds, and offer/rate grids."
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
    /// Monthly payment and lifetime totals for a fixed-rate mortgage
    Mortgage(MortgageArgs),
    /// Cash flow, cap rate, cash-on-cash and related ratios for one offer
    CashFlow(CashFlowArgs),
    /// Adjust an external deal score for the offer's discount to list
    DealScore(DealScoreArgs),
    /// Stress shocks, break-even thresholds and risk rating for one offer
    StressTest(StressTestArgs),
    /// Full deal analysis: cash flow, score, stress test and risk
    Analyze(AnalyzeArgs),
    /// Sweep offer price against interest rate
    OfferGrid(OfferGridArgs),
    /// Capture an analysed offer as a saved scenario
    Snapshot(SnapshotArgs),
    /// Compare saved scenarios side by side
    Compare(CompareArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Mortgage(args) => commands::underwriting::run_mortgage(args),
        Commands::CashFlow(args) => commands::underwriting::run_cash_flow(args),
        Commands::DealScore(args) => commands::underwriting::run_deal_score(args),
        Commands::StressTest(args) => commands::stress_test::run_stress_test(args),
        Commands::Analyze(args) => commands::stress_test::run_analyze(args),
        Commands::OfferGrid(args) => commands::scenarios::run_offer_grid(args),
        Commands::Snapshot(args) => commands::scenarios::run_snapshot(args),
        Commands::Compare(args) => commands::scenarios::run_compare(args),
        Commands::Version => {
            println!("deal {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
