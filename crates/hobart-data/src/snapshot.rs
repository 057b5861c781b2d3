//! Externally produced snapshot files.
//!
//! Two upstream shapes exist:
//!
//! - **Exposure directories**: one `YYYYMMDD.csv` per day, rows keyed by a
//!   prefix-style `stock_code` column plus one column per exposure; each file
//!   contributes one panel row.
//! - **Wide snapshots**: a directory of `YYYYMMDD.csv` dumps where a single
//!   file holds the whole history — a date column plus one suffix-style code
//!   column per instrument. The newest file whose name-date falls in the
//!   query window is used; when none matches, the lexicographically last
//!   file is taken as a documented fallback.
//!
//! Both are parsed into sparse observations and fed through the common
//! alignment engine like any vendor series.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::warn;

use crate::error::{DataError, Result};
use crate::symbols;
use hobart_engine::{RawObservation, RawSeriesFetcher, SourceError};

/// Directory of per-day exposure files.
#[derive(Debug, Clone)]
pub struct ExposureDir {
    root: PathBuf,
    column: String,
}

/// Parsed exposure observations for one query window.
#[derive(Debug, Clone)]
pub struct ExposureSeries {
    codes: Vec<String>,
    observations: Vec<RawObservation>,
}

impl ExposureDir {
    /// Scan `root` for `YYYYMMDD.csv` files; `column` is the exposure to
    /// extract from each.
    pub fn new(root: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            column: column.into(),
        }
    }

    /// Parse every file dated inside `[start, end]`.
    pub fn series(&self, start: NaiveDate, end: NaiveDate) -> Result<ExposureSeries> {
        let mut observations = Vec::new();
        let mut codes = Vec::new();

        for (date, path) in dated_files(&self.root)? {
            if date < start || date > end {
                continue;
            }
            self.parse_file(&path, date, &mut codes, &mut observations)?;
        }

        codes.sort_unstable();
        codes.dedup();
        Ok(ExposureSeries {
            codes,
            observations,
        })
    }

    fn parse_file(
        &self,
        path: &Path,
        date: NaiveDate,
        codes: &mut Vec<String>,
        observations: &mut Vec<RawObservation>,
    ) -> Result<()> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let key_idx = position(&headers, "stock_code").ok_or_else(|| DataError::MissingColumn {
            file: path.display().to_string(),
            column: "stock_code".to_string(),
        })?;
        let value_idx = position(&headers, &self.column).ok_or_else(|| {
            DataError::MissingColumn {
                file: path.display().to_string(),
                column: self.column.clone(),
            }
        })?;

        for record in reader.records() {
            let record = record?;
            let Some(raw_code) = record.get(key_idx) else {
                continue;
            };
            let code = match symbols::from_prefixed(raw_code) {
                Ok(code) => code,
                Err(_) => {
                    warn!("skipping unrecognized code {raw_code} in {}", path.display());
                    continue;
                }
            };
            if let Some(value) = record.get(value_idx).and_then(|v| v.parse::<f64>().ok()) {
                observations.push(RawObservation::new(code.clone(), date, value));
            }
            codes.push(code);
        }
        Ok(())
    }
}

impl RawSeriesFetcher for ExposureSeries {
    fn universe(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> std::result::Result<Vec<String>, SourceError> {
        Ok(self.codes.clone())
    }

    fn fetch(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> std::result::Result<Vec<RawObservation>, SourceError> {
        Ok(self
            .observations
            .iter()
            .filter(|o| (start..=end).contains(&o.date))
            .cloned()
            .collect())
    }
}

/// Directory of wide single-file snapshot dumps.
#[derive(Debug, Clone)]
pub struct WideSnapshotDir {
    root: PathBuf,
    date_column: String,
}

/// Parsed contents of one selected wide snapshot file.
#[derive(Debug, Clone)]
pub struct WideSnapshotSeries {
    codes: Vec<String>,
    observations: Vec<RawObservation>,
    last_date: NaiveDate,
}

impl WideSnapshotDir {
    /// Scan `root` for dump files; `date_column` names the primary date
    /// column inside each dump (upstream calls it `trade_date` in one feed
    /// and `hold_period` in another).
    pub fn new(root: impl Into<PathBuf>, date_column: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            date_column: date_column.into(),
        }
    }

    /// Select and parse the snapshot file for `[start, end]`.
    ///
    /// The newest file whose name-date lies in the window wins. When none
    /// does, the lexicographically last file is used — intent upstream is
    /// ambiguous, so the fallback is preserved and logged rather than fixed.
    pub fn series(&self, start: NaiveDate, end: NaiveDate) -> Result<WideSnapshotSeries> {
        let mut files = dated_files(&self.root)?;
        files.sort_by(|a, b| b.1.cmp(&a.1));
        let Some(newest) = files.first().cloned() else {
            return Err(DataError::NoSnapshot {
                dir: self.root.display().to_string(),
            });
        };

        let selected = files
            .into_iter()
            .find(|(date, _)| (start..=end).contains(date))
            .unwrap_or_else(|| {
                warn!(
                    "no snapshot in {} dated within {start}..{end}; falling back to {}",
                    self.root.display(),
                    newest.1.display()
                );
                newest
            });

        self.parse_file(&selected.1)
    }

    fn parse_file(&self, path: &Path) -> Result<WideSnapshotSeries> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let date_idx =
            position(&headers, &self.date_column).ok_or_else(|| DataError::MissingColumn {
                file: path.display().to_string(),
                column: self.date_column.clone(),
            })?;

        // Columns that do not rewrite to a canonical code are tolerated and
        // skipped, matching the upstream files' extra metadata columns.
        let mut columns: Vec<(usize, String)> = Vec::new();
        for (idx, name) in headers.iter().enumerate() {
            if idx == date_idx {
                continue;
            }
            if let Ok(code) = symbols::from_suffixed(name) {
                columns.push((idx, code));
            }
        }

        let mut observations = Vec::new();
        let mut last_date: Option<NaiveDate> = None;
        for record in reader.records() {
            let record = record?;
            let raw_date = record.get(date_idx).unwrap_or_default();
            let date: NaiveDate = raw_date
                .parse()
                .map_err(|_| DataError::Parse(format!("bad date {raw_date:?} in {}", path.display())))?;
            last_date = Some(last_date.map_or(date, |d| d.max(date)));
            for (idx, code) in &columns {
                if let Some(value) = record.get(*idx).and_then(|v| v.parse::<f64>().ok()) {
                    observations.push(RawObservation::new(code.clone(), date, value));
                }
            }
        }

        let last_date = last_date.ok_or_else(|| {
            DataError::Parse(format!("snapshot {} has no rows", path.display()))
        })?;
        let mut codes: Vec<String> = columns.into_iter().map(|(_, code)| code).collect();
        codes.sort_unstable();
        Ok(WideSnapshotSeries {
            codes,
            observations,
            last_date,
        })
    }
}

impl WideSnapshotSeries {
    /// Date of the snapshot's own last row. Rows after it would be pure
    /// forward-filled extrapolation, so callers clamp their window here.
    pub const fn last_date(&self) -> NaiveDate {
        self.last_date
    }
}

impl RawSeriesFetcher for WideSnapshotSeries {
    fn universe(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> std::result::Result<Vec<String>, SourceError> {
        Ok(self.codes.clone())
    }

    fn fetch(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> std::result::Result<Vec<RawObservation>, SourceError> {
        Ok(self
            .observations
            .iter()
            .filter(|o| (start..=end).contains(&o.date))
            .cloned()
            .collect())
    }
}

fn position(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// All `YYYYMMDD.csv` files under `dir`, ascending by date.
fn dated_files(dir: &Path) -> Result<Vec<(NaiveDate, PathBuf)>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        if let Ok(date) = NaiveDate::parse_from_str(stem, "%Y%m%d") {
            files.push((date, path));
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn fixture_dir(name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("hobart-snapshot-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for (file, body) in files {
            fs::write(dir.join(file), body).unwrap();
        }
        dir
    }

    #[test]
    fn test_exposure_dir_one_row_per_file() {
        let dir = fixture_dir(
            "exposures",
            &[
                (
                    "20240102.csv",
                    "stock_code,book_to_price,leverage\nSH600000,0.8,1.2\nSZ000001,0.5,2.0\n",
                ),
                (
                    "20240103.csv",
                    "stock_code,book_to_price,leverage\nSH600000,0.81,1.21\n",
                ),
                ("20240110.csv", "stock_code,book_to_price\nSH600000,0.9\n"),
            ],
        );
        let series = ExposureDir::new(&dir, "book_to_price")
            .series(d("2024-01-01"), d("2024-01-05"))
            .unwrap();
        assert_eq!(
            series.universe(d("2024-01-01"), d("2024-01-05")).unwrap(),
            ["000001.XSHE", "600000.XSHG"]
        );
        let obs = series.fetch(d("2024-01-01"), d("2024-01-05")).unwrap();
        assert_eq!(obs.len(), 3);
        assert!(obs.contains(&RawObservation::new("000001.XSHE", d("2024-01-02"), 0.5)));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_exposure_dir_missing_factor_column_is_fatal() {
        let dir = fixture_dir(
            "exposures-drift",
            &[("20240102.csv", "stock_code,leverage\nSH600000,1.2\n")],
        );
        let err = ExposureDir::new(&dir, "book_to_price")
            .series(d("2024-01-01"), d("2024-01-05"))
            .unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { .. }));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_wide_snapshot_selects_file_in_window() {
        let dir = fixture_dir(
            "wide",
            &[
                (
                    "20240102.csv",
                    "trade_date,600000.SH,000001.SZ\n2024-01-01,1,\n2024-01-02,,1\n",
                ),
                (
                    "20240110.csv",
                    "trade_date,600000.SH\n2024-01-09,1\n2024-01-10,0\n",
                ),
            ],
        );
        let series = WideSnapshotDir::new(&dir, "trade_date")
            .series(d("2024-01-01"), d("2024-01-05"))
            .unwrap();
        assert_eq!(series.last_date(), d("2024-01-02"));
        let obs = series.fetch(d("2024-01-01"), d("2024-01-05")).unwrap();
        assert_eq!(obs.len(), 2);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_wide_snapshot_falls_back_to_last_file() {
        let dir = fixture_dir(
            "wide-fallback",
            &[
                ("20230101.csv", "trade_date,600000.SH\n2023-01-01,1\n"),
                ("20230601.csv", "trade_date,600000.SH\n2023-06-01,0\n"),
            ],
        );
        let series = WideSnapshotDir::new(&dir, "trade_date")
            .series(d("2024-01-01"), d("2024-01-05"))
            .unwrap();
        // Neither file is in the window; the lexicographically last wins.
        assert_eq!(series.last_date(), d("2023-06-01"));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_wide_snapshot_missing_date_column_is_fatal() {
        let dir = fixture_dir(
            "wide-drift",
            &[("20240102.csv", "when,600000.SH\n2024-01-02,1\n")],
        );
        let err = WideSnapshotDir::new(&dir, "trade_date")
            .series(d("2024-01-01"), d("2024-01-05"))
            .unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { .. }));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_empty_dir_is_no_snapshot() {
        let dir = fixture_dir("wide-empty", &[]);
        let err = WideSnapshotDir::new(&dir, "trade_date")
            .series(d("2024-01-01"), d("2024-01-05"))
            .unwrap_err();
        assert!(matches!(err, DataError::NoSnapshot { .. }));
        fs::remove_dir_all(dir).unwrap();
    }
}
