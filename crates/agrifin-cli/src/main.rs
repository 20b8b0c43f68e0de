mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::amortization::AmortizeArgs;
use commands::analytics::AnalyticsArgs;
use commands::product::ProductArgs;
use commands::repayment::{InstallmentsArgs, LoanSummaryArgs};

/// Loan amortization and repayment analytics
#[derive(Parser)]
#[command(
    name = "agrifin",
    version,
    about = "Loan amortization and repayment analytics",
    long_about = "Computes fixed monthly payments, amortization schedules, dated \
                  installment plans and borrower repayment analytics for \
                  agricultural loans, with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Currency symbol for table and minimal output
    #[arg(long, default_value = "$", global = true)]
    currency: String,

    /// Log computation details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote the fixed monthly payment for a loan
    Payment(AmortizeArgs),
    /// Full amortization schedule with principal/interest split
    Schedule(AmortizeArgs),
    /// Total interest and repayment for a loan
    Totals(AmortizeArgs),
    /// Amortize a catalog loan product (JSON/YAML)
    Product(ProductArgs),
    /// Dated monthly installments for a newly booked loan
    Installments(InstallmentsArgs),
    /// Repayment position of a single loan
    LoanSummary(LoanSummaryArgs),
    /// Borrower dashboard across all loans
    Analytics(AnalyticsArgs),
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

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::Totals(args) => commands::amortization::run_totals(args),
        Commands::Product(args) => commands::product::run_product(args),
        Commands::Installments(args) => commands::repayment::run_installments(args),
        Commands::LoanSummary(args) => commands::repayment::run_loan_summary(args),
        Commands::Analytics(args) => commands::analytics::run_analytics(args),
        Commands::Version => {
            println!("agrifin {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value, &cli.currency);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
