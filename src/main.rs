mod cmd;
mod engine;
mod money;

use clap::{Parser, Subcommand};

/// UK take-home pay calculator
#[derive(Parser)]
#[command(
    name = "takehome",
    version,
    about = "UK take-home pay: income tax, National Insurance and capital gains for 2026/27"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show take-home pay with the tax and NI breakdown
    Summary(cmd::summary::SummaryCommand),
    /// Explain the calculation step by step
    Explain(cmd::explain::ExplainCommand),
    /// Export a CSV or printable HTML tax statement
    Export(cmd::export::ExportCommand),
    /// Calculate every row of a CSV file
    Batch(cmd::batch::BatchCommand),
    /// Print expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Summary(summary) => summary.exec(),
        Command::Explain(explain) => explain.exec(),
        Command::Export(export) => export.exec(),
        Command::Batch(batch) => batch.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
