//! Export functionality for Hobart panels.
//!
//! Serializes a panel in its interchange shape to CSV or JSON. Missing cells
//! become empty CSV fields / JSON nulls; nothing is invented on the way out.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use hobart_engine::Panel;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" => Ok(Self::PrettyJson),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Write `panel` to `writer` in the given format.
pub fn write_panel<W: Write>(
    panel: &Panel,
    format: ExportFormat,
    writer: W,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => write_csv(panel, writer),
        ExportFormat::Json => write_json(panel, writer, false),
        ExportFormat::PrettyJson => write_json(panel, writer, true),
    }
}

/// Write `panel` to a file at `path`.
pub fn write_panel_to(
    panel: &Panel,
    format: ExportFormat,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_panel(panel, format, file)
}

fn write_csv<W: Write>(panel: &Panel, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["datetime".to_string(), "gen_time".to_string()];
    header.extend(panel.instruments().iter().cloned());
    csv_writer.write_record(&header)?;

    for (row, date) in panel.dates().iter().enumerate() {
        let mut record = Vec::with_capacity(header.len());
        record.push(date.to_string());
        record.push(
            panel.gen_times()[row]
                .map(|t| t.to_string())
                .unwrap_or_default(),
        );
        for code in panel.instruments() {
            let cell = panel.cell(*date, code);
            record.push(cell.map(|v| v.to_string()).unwrap_or_default());
        }
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn write_json<W: Write>(panel: &Panel, mut writer: W, pretty: bool) -> Result<(), ExportError> {
    let mut rows = Vec::with_capacity(panel.n_rows());
    for (row, date) in panel.dates().iter().enumerate() {
        let mut cells = serde_json::Map::new();
        for code in panel.instruments() {
            let value = panel
                .cell(*date, code)
                .map_or(serde_json::Value::Null, |v| {
                    serde_json::json!(v)
                });
            cells.insert(code.clone(), value);
        }
        rows.push(serde_json::json!({
            "datetime": date,
            "gen_time": panel.gen_times()[row],
            "cells": cells,
        }));
    }
    let document = serde_json::Value::Array(rows);

    if pretty {
        serde_json::to_writer_pretty(&mut writer, &document)?;
    } else {
        serde_json::to_writer(&mut writer, &document)?;
    }
    writer.flush()?;
    Ok(())
}
