//! A CSV-directory-backed vendor session.
//!
//! Stands in for the commercial data vendor in local runs, fixtures and the
//! CLI. One directory holds a handful of flat files:
//!
//! - `calendar.csv` — `date`
//! - `instruments.csv` — `code,kind`
//! - `prices.csv` — `code,date,field,adjust,value`
//! - `components.csv` — `index,date,code`
//! - `st.csv` — `code,date` (presence means flagged)
//! - `industry.csv` — `code,date,industry`
//! - `live.csv` — `code,value` (optional intraday snapshot)
//!
//! Dates are ISO `YYYY-MM-DD`; codes are canonical
//! `<numeric>.<EXCHANGE_SUFFIX>`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{DataError, Result};
use crate::vendor::{Adjustment, InstrumentKind, MarketDataSession, PriceField};
use hobart_engine::{LiveQuote, RawObservation};

/// Vendor session reading from a directory of CSV files.
#[derive(Debug, Clone)]
pub struct CsvMarketData {
    root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CalendarRow {
    date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct InstrumentRow {
    code: String,
    kind: InstrumentKind,
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    code: String,
    date: NaiveDate,
    field: PriceField,
    adjust: Adjustment,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct ComponentRow {
    index: String,
    date: NaiveDate,
    code: String,
}

#[derive(Debug, Deserialize)]
struct StRow {
    code: String,
    date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct IndustryRow {
    code: String,
    date: NaiveDate,
    industry: f64,
}

#[derive(Debug, Deserialize)]
struct LiveRow {
    code: String,
    value: f64,
}

impl CsvMarketData {
    /// Open a session over `root`. No file is touched until a query runs.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    fn read_rows<T: for<'de> Deserialize<'de>>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.path(file);
        if !path.exists() {
            return Err(DataError::MissingData {
                series: file.to_string(),
                reason: format!("{} does not exist", path.display()),
            });
        }
        let mut reader = csv::Reader::from_path(&path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }
}

impl MarketDataSession for CsvMarketData {
    fn trading_dates(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
        let mut dates: Vec<NaiveDate> = self
            .read_rows::<CalendarRow>("calendar.csv")?
            .into_iter()
            .map(|r| r.date)
            .filter(|d| (start..=end).contains(d))
            .collect();
        dates.sort_unstable();
        dates.dedup();
        Ok(dates)
    }

    fn instruments(&self, kind: InstrumentKind) -> Result<Vec<String>> {
        let mut codes: Vec<String> = self
            .read_rows::<InstrumentRow>("instruments.csv")?
            .into_iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.code)
            .collect();
        codes.sort_unstable();
        codes.dedup();
        Ok(codes)
    }

    fn daily_prices(
        &self,
        codes: &[String],
        field: PriceField,
        adjust: Adjustment,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawObservation>> {
        Ok(self
            .read_rows::<PriceRow>("prices.csv")?
            .into_iter()
            .filter(|r| {
                r.field == field
                    && r.adjust == adjust
                    && (start..=end).contains(&r.date)
                    && codes.contains(&r.code)
            })
            .map(|r| RawObservation::new(r.code, r.date, r.value))
            .collect())
    }

    fn index_components(
        &self,
        index: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, Vec<String>>> {
        let mut components: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
        for row in self.read_rows::<ComponentRow>("components.csv")? {
            if row.index == index && (start..=end).contains(&row.date) {
                components.entry(row.date).or_default().push(row.code);
            }
        }
        Ok(components)
    }

    fn special_treatment(
        &self,
        codes: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawObservation>> {
        Ok(self
            .read_rows::<StRow>("st.csv")?
            .into_iter()
            .filter(|r| (start..=end).contains(&r.date) && codes.contains(&r.code))
            .map(|r| RawObservation::new(r.code, r.date, 1.0))
            .collect())
    }

    fn industry(&self, codes: &[String], date: NaiveDate) -> Result<Vec<(String, f64)>> {
        // As-of lookup: the latest classification on or before `date`.
        let mut latest: BTreeMap<String, (NaiveDate, f64)> = BTreeMap::new();
        for row in self.read_rows::<IndustryRow>("industry.csv")? {
            if row.date > date || !codes.contains(&row.code) {
                continue;
            }
            match latest.get(&row.code) {
                Some((seen, _)) if *seen >= row.date => {}
                _ => {
                    latest.insert(row.code, (row.date, row.industry));
                }
            }
        }
        Ok(latest
            .into_iter()
            .map(|(code, (_, industry))| (code, industry))
            .collect())
    }

    fn snapshot(&self, codes: &[String]) -> Result<Vec<LiveQuote>> {
        if !self.path("live.csv").exists() {
            return Ok(Vec::new());
        }
        Ok(self
            .read_rows::<LiveRow>("live.csv")?
            .into_iter()
            .filter(|r| codes.contains(&r.code))
            .map(|r| LiveQuote {
                instrument: r.code,
                value: r.value,
            })
            .collect())
    }
}

impl AsRef<Path> for CsvMarketData {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn fixture_dir(name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hobart-csv-market-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for (file, body) in files {
            fs::write(dir.join(file), body).unwrap();
        }
        dir
    }

    #[test]
    fn test_trading_dates_window() {
        let dir = fixture_dir(
            "calendar",
            &[(
                "calendar.csv",
                "date\n2024-01-02\n2024-01-03\n2024-01-04\n",
            )],
        );
        let session = CsvMarketData::new(&dir);
        assert_eq!(
            session.trading_dates(d("2024-01-03"), d("2024-12-31")).unwrap(),
            [d("2024-01-03"), d("2024-01-04")]
        );
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_prices_filtered_by_field_and_adjust() {
        let dir = fixture_dir(
            "prices",
            &[(
                "prices.csv",
                "code,date,field,adjust,value\n\
                 600000.XSHG,2024-01-02,open,none,10.0\n\
                 600000.XSHG,2024-01-02,close,none,10.5\n\
                 600000.XSHG,2024-01-02,open,pre,9.8\n",
            )],
        );
        let session = CsvMarketData::new(&dir);
        let codes = vec!["600000.XSHG".to_string()];
        let obs = session
            .daily_prices(&codes, PriceField::Open, Adjustment::Pre, d("2024-01-01"), d("2024-01-31"))
            .unwrap();
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].value, 9.8);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_missing_data() {
        let dir = fixture_dir("empty", &[]);
        let session = CsvMarketData::new(&dir);
        let err = session.instruments(InstrumentKind::Stock).unwrap_err();
        assert!(matches!(err, DataError::MissingData { .. }));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_snapshot_absent_file_means_no_quotes() {
        let dir = fixture_dir("nolive", &[]);
        let session = CsvMarketData::new(&dir);
        assert!(session.snapshot(&["600000.XSHG".to_string()]).unwrap().is_empty());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_industry_is_as_of() {
        let dir = fixture_dir(
            "industry",
            &[(
                "industry.csv",
                "code,date,industry\n\
                 600000.XSHG,2023-01-01,40.0\n\
                 600000.XSHG,2024-06-01,41.0\n",
            )],
        );
        let session = CsvMarketData::new(&dir);
        let codes = vec!["600000.XSHG".to_string()];
        assert_eq!(
            session.industry(&codes, d("2024-01-02")).unwrap(),
            [("600000.XSHG".to_string(), 40.0)]
        );
        assert_eq!(
            session.industry(&codes, d("2024-07-01")).unwrap(),
            [("600000.XSHG".to_string(), 41.0)]
        );
        fs::remove_dir_all(dir).unwrap();
    }
}
