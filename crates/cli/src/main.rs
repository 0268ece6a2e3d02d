// RowFuse CLI - headless merge operations

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use rowfuse_cli::exit_codes::EXIT_SUCCESS;
use rowfuse_cli::merge::{cmd_inspect, cmd_run, cmd_validate, Format};

#[derive(Parser)]
#[command(name = "rowfuse")]
#[command(about = "Config-driven CSV merge (headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the configured sources and export the result
    #[command(after_help = "\
Examples:
  rowfuse run roster.merge.toml
  rowfuse run roster.merge.toml -t json
  rowfuse run roster.merge.toml -o merged.csv --all-fields")]
    Run {
        /// Path to the .merge.toml config file
        config: PathBuf,

        /// Output format
        #[arg(long, short = 't', value_enum, default_value = "csv")]
        format: Format,

        /// Write output to file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Also export incidental fields beyond the declared columns
        #[arg(long)]
        all_fields: bool,
    },

    /// Validate a merge config without running
    #[command(after_help = "\
Examples:
  rowfuse validate roster.merge.toml")]
    Validate {
        /// Path to the .merge.toml config file
        config: PathBuf,
    },

    /// Show a CSV file's header fields and row count
    #[command(after_help = "\
Examples:
  rowfuse inspect members.csv
  rowfuse inspect legacy.csv --no-headers")]
    Inspect {
        /// CSV file to inspect
        file: PathBuf,

        /// Treat the first row as data, not headers
        #[arg(long)]
        no_headers: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, format, output, all_fields } => {
            cmd_run(config, format, output, all_fields)
        }
        Commands::Validate { config } => cmd_validate(config),
        Commands::Inspect { file, no_headers } => cmd_inspect(file, no_headers),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}
