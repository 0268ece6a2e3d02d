//! `rowfuse run` — config-driven multi-source merge.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use rowfuse_io::{export, text};
use rowfuse_merge::{run, Dataset, MergeConfig, MergeInput, SourceText};

use crate::exit_codes::{EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_SOURCE_READ, EXIT_WRITE};
use crate::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Json,
}

fn cli_err(code: u8, message: impl Into<String>) -> CliError {
    CliError { code, message: message.into(), hint: None }
}

/// Load and validate the config document.
fn load_config(config_path: &Path) -> Result<MergeConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| cli_err(EXIT_SOURCE_READ, format!("cannot read config: {e}")))?;
    MergeConfig::from_toml(&config_str).map_err(|e| cli_err(EXIT_INVALID_CONFIG, e.to_string()))
}

/// Read the config's source files, relative to the config's directory.
fn load_sources(base_dir: &Path, files: &[String]) -> Result<Vec<SourceText>, CliError> {
    files
        .iter()
        .map(|file| {
            let path = base_dir.join(file);
            let content = text::read_file_as_utf8(&path)
                .map_err(|e| cli_err(EXIT_SOURCE_READ, format!("cannot read {}: {e}", path.display())))?;
            Ok(SourceText::new(file.clone(), content))
        })
        .collect()
}

pub fn cmd_run(
    config_path: PathBuf,
    format: Format,
    output: Option<PathBuf>,
    all_fields: bool,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    if config.sources.main.is_empty() && config.sources.linked.is_empty() {
        return Err(CliError {
            code: EXIT_INVALID_CONFIG,
            message: "config lists no source files".into(),
            hint: Some("add [sources] main = [\"...\"] to the config".into()),
        });
    }

    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let input = MergeInput {
        main: load_sources(base_dir, &config.sources.main)?,
        linked: load_sources(base_dir, &config.sources.linked)?,
    };

    let result = run(&config, &input);

    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }

    let payload = match format {
        Format::Csv => {
            let columns = export::export_columns(&result, &config.columns, all_fields);
            let mut buf = Vec::new();
            export::write_csv(&mut buf, &result.records, &columns)
                .map_err(|e| cli_err(EXIT_WRITE, e))?;
            buf
        }
        Format::Json => {
            let doc = serde_json::json!({
                "meta": result.meta,
                "summary": result.summary,
                "fields": result.fields,
                "warnings": result.warnings,
                "records": export::records_to_json(&result.records, &result.fields),
            });
            let mut buf = serde_json::to_vec_pretty(&doc)
                .map_err(|e| cli_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
            buf.push(b'\n');
            buf
        }
    };

    match output {
        Some(ref path) => {
            std::fs::write(path, payload)
                .map_err(|e| cli_err(EXIT_WRITE, format!("cannot write {}: {e}", path.display())))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            std::io::stdout()
                .write_all(&payload)
                .map_err(|e| cli_err(EXIT_WRITE, e.to_string()))?;
        }
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "merged {} rows — {} matched, {} unmatched, {} linked keys, {} warning(s)",
        s.main_rows, s.matched, s.unmatched, s.linked_keys, s.warnings,
    );

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    println!(
        "config OK: {} main source(s), {} linked source(s), {} column(s)",
        config.sources.main.len(),
        config.sources.linked.len(),
        config.columns.len(),
    );
    Ok(())
}

pub fn cmd_inspect(file: PathBuf, no_headers: bool) -> Result<(), CliError> {
    let content = text::read_file_as_utf8(&file)
        .map_err(|e| cli_err(EXIT_SOURCE_READ, format!("cannot read {}: {e}", file.display())))?;

    let name = file.display().to_string();
    let dataset = Dataset::parse(&name, &content, !no_headers)
        .map_err(|e| cli_err(EXIT_ERROR, e.to_string()))?;

    println!("{}: {} field(s), {} row(s)", name, dataset.headers.len(), dataset.records.len());
    for header in &dataset.headers {
        println!("  {header}");
    }
    Ok(())
}
