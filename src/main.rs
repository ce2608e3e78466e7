use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sheet_tables::config::{ExtractConfig, LabelPolicy};
use sheet_tables::excel;
use sheet_tables::extract::extract_workbook;
use sheet_tables::json_export::{self, OutputShape};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Spreadsheet file path (xlsx, xlsm, xlsb, xls, ods)
    #[arg(required = true)]
    file_path: PathBuf,

    /// JSON file with extraction settings; flags below override it
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Only extract tables from this sheet
    #[arg(long, short = 's')]
    sheet: Option<String>,

    /// How multi-row headers collapse: 'last' (most specific label wins) or 'join'
    #[arg(long, short = 'p')]
    label_policy: Option<String>,

    /// Minimum share of filled cells for a table seed (0..1)
    #[arg(long)]
    density_threshold: Option<f64>,

    /// Deepest header accepted
    #[arg(long)]
    max_header_depth: Option<usize>,

    /// Add a column with the caption found above or below each table
    #[arg(long)]
    attach_category: bool,

    /// Output shape: 't' for {header, rows} tables, 'r' for header-keyed records
    #[arg(long, short = 'f', default_value = "t")]
    format: String,

    /// Write JSON to this file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,

    /// More logging on stderr (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn extract_config(&self) -> Result<ExtractConfig> {
        let mut config = match &self.config {
            Some(path) => ExtractConfig::from_file(path)
                .with_context(|| format!("Unable to load config: {}", path.display()))?,
            None => ExtractConfig::default(),
        };

        if let Some(policy) = &self.label_policy {
            config.label_policy = LabelPolicy::from_str(policy)?;
        }
        if let Some(threshold) = self.density_threshold {
            config.density_threshold = threshold;
        }
        if let Some(depth) = self.max_header_depth {
            config.max_header_depth = depth;
        }
        if self.attach_category {
            config.attach_category = true;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _tracing = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let shape = match OutputShape::from_str(&cli.format) {
        Ok(shape) => shape,
        Err(_) => anyhow::bail!("Invalid output format: {}", cli.format),
    };
    let config = cli.extract_config()?;

    let limits = excel::ReadLimits::from(&config);
    let mut workbook = excel::open_workbook_with_limits(&cli.file_path, limits)
        .with_context(|| format!("Unable to open {}", cli.file_path.display()))?;
    if let Some(name) = &cli.sheet {
        workbook = workbook.retain_sheet(name)?;
    }

    let tables = extract_workbook(&workbook, &config, None);
    info!(
        file = workbook.get_file_path(),
        sheets = tables.len(),
        tables = tables.values().map(Vec::len).sum::<usize>(),
        "extraction complete"
    );

    let json_string = json_export::export_tables_json(&tables, shape, cli.compact)?;
    match &cli.output {
        Some(path) => json_export::write_json_to_file(&json_string, path)?,
        None => println!("{}", json_string),
    }

    Ok(())
}
