//! Hobart CLI binary.
//!
//! Lists registered factors and generates their panels from a CSV market
//! data directory.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use hobart::prelude::{Factor, FactorCatalog, FactorType, PanelSummary};
use hobart_data::CsvMarketData;
use hobart_factors::{DEFINITIONS, list_factor_names};
use hobart_output::{ExportFormat, write_panel_to};

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: point-in-time factor panel engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered factors
    List {
        /// Filter by factor type (normal, pool or risk)
        #[arg(long)]
        factor_type: Option<String>,
    },

    /// Generate factor panels over a date window
    Run {
        /// Factor names to generate; defaults to every registered factor
        #[arg(long = "factor")]
        factors: Vec<String>,

        /// First trading date of the window
        #[arg(long)]
        start: NaiveDate,

        /// Last trading date of the window
        #[arg(long)]
        end: NaiveDate,

        /// Market data directory (calendar.csv, prices.csv, ...)
        #[arg(long)]
        data_dir: PathBuf,

        /// Snapshot root for exposure- and report-backed factors
        #[arg(long)]
        snapshot_root: Option<PathBuf>,

        /// Directory to write panels into; prints summaries only when absent
        #[arg(long)]
        out: Option<PathBuf>,

        /// Output format (csv, json or pretty-json)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List { factor_type } => {
            let filter = factor_type.as_deref().map(parse_factor_type).transpose()?;
            list_factors(filter);
        }
        Commands::Run {
            factors,
            start,
            end,
            data_dir,
            snapshot_root,
            out,
            format,
        } => {
            run_factors(&factors, start, end, data_dir, snapshot_root, out, format)?;
        }
    }

    Ok(())
}

fn list_factors(filter: Option<FactorType>) {
    println!(
        "{:<32} {:<8} {:<9} {:<8} {:<12} DESCRIPTION",
        "NAME", "TYPE", "FREQ", "SECURITY", "FIRST START"
    );

    for def in DEFINITIONS {
        if filter.is_some_and(|t| def.meta.factor_type != t) {
            continue;
        }
        println!(
            "{:<32} {:<8} {:<9} {:<8} {:<12} {}",
            def.meta.name,
            format!("{:?}", def.meta.factor_type),
            format!("{:?}", def.meta.frequency),
            format!("{:?}", def.meta.security_type),
            def.meta.first_start.to_string(),
            def.meta.desc,
        );
    }
}

fn parse_factor_type(name: &str) -> Result<FactorType, Box<dyn std::error::Error>> {
    match name.to_lowercase().as_str() {
        "normal" => Ok(FactorType::Normal),
        "pool" => Ok(FactorType::Pool),
        "risk" => Ok(FactorType::Risk),
        other => Err(format!("unknown factor type: {other}").into()),
    }
}

fn run_factors(
    requested: &[String],
    start: NaiveDate,
    end: NaiveDate,
    data_dir: PathBuf,
    snapshot_root: Option<PathBuf>,
    out: Option<PathBuf>,
    format: ExportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let names: Vec<String> = if requested.is_empty() {
        list_factor_names().iter().map(|n| (*n).to_string()).collect()
    } else {
        requested.to_vec()
    };

    let session = Arc::new(CsvMarketData::new(data_dir));
    let catalog = FactorCatalog::new(session, snapshot_root);

    if let Some(dir) = &out {
        std::fs::create_dir_all(dir)?;
    }

    let pb = ProgressBar::new(names.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut failures = Vec::new();

    for name in &names {
        pb.set_message(name.clone());

        let factor = catalog
            .build(name)
            .ok_or_else(|| format!("unknown factor: {name} (see `hobart list`)"))?;

        match factor.run(start, end) {
            Ok(panel) => {
                let summary = PanelSummary::of(&panel);
                pb.println(format!("{name}: {summary}"));

                if let Some(dir) = &out {
                    let path = dir.join(format!("{name}.{}", format.extension()));
                    write_panel_to(&panel, format, &path)?;
                    info!("wrote {}", path.display());
                }
            }
            Err(e) => {
                pb.println(format!("{name}: failed: {e}"));
                failures.push(name.clone());
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("done");

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} factor(s) failed: {}", failures.len(), failures.join(", ")).into())
    }
}
