use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;
mod loader;

use error::CliResult;

#[derive(Parser)]
#[command(name = "hrms-export")]
#[command(about = "HRMS export CLI - Spreadsheet-ready CSV exports of HR records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export records to a CSV file using a job definition
    Export {
        /// Job definition file (YAML)
        #[arg(short, long)]
        job: PathBuf,

        /// Records file (JSON array, paged JSON response, or CSV)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory the CSV file is written to
        #[arg(short, long, default_value = "exports")]
        output_dir: PathBuf,

        /// Append today's date to the file name
        #[arg(long)]
        date_suffix: bool,
    },

    /// Print the CSV a job would produce without writing a file
    Preview {
        /// Job definition file (YAML)
        #[arg(short, long)]
        job: PathBuf,

        /// Records file (JSON array, paged JSON response, or CSV)
        #[arg(short, long)]
        input: PathBuf,

        /// Maximum number of records to render
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            job,
            input,
            output_dir,
            date_suffix,
        } => commands::export::execute(job, input, output_dir, date_suffix),

        Commands::Preview { job, input, limit } => commands::preview::execute(job, input, limit),
    }
}
