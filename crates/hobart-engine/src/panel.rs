//! The dense instrument×date panel.
//!
//! Rows are ordered by trading date; columns are the generation-time column
//! followed by the lexicographically sorted instrument universe. The column
//! set is fixed at construction: gap policies and return shifts may drop rows
//! but never columns.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Dense instrument×date matrix with a generation-time column.
///
/// Values are stored column-major, one `Vec<Option<f64>>` per instrument,
/// each exactly `dates.len()` long. `None` is a missing cell; whether that is
/// meaningful (membership) or to be filled is the gap policy's decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    dates: Vec<NaiveDate>,
    gen_time: Vec<Option<NaiveDateTime>>,
    instruments: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl Panel {
    /// Build an all-missing frame over the given date axis and universe.
    ///
    /// Dates and instruments are sorted and deduplicated; instrument columns
    /// end up lexicographically ordered regardless of fetch order.
    pub fn empty_frame(
        dates: impl IntoIterator<Item = NaiveDate>,
        instruments: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut dates: Vec<NaiveDate> = dates.into_iter().collect();
        dates.sort_unstable();
        dates.dedup();

        let mut instruments: Vec<String> = instruments.into_iter().collect();
        instruments.sort_unstable();
        instruments.dedup();

        let n = dates.len();
        let values = vec![vec![None; n]; instruments.len()];
        Self {
            gen_time: vec![None; n],
            dates,
            instruments,
            values,
        }
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    /// True if the panel has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Row dates, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Generation time per row, parallel to [`Self::dates`].
    pub fn gen_times(&self) -> &[Option<NaiveDateTime>] {
        &self.gen_time
    }

    /// Sorted instrument column names.
    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    /// The value column for one instrument, if it is part of the universe.
    pub fn column(&self, instrument: &str) -> Option<&[Option<f64>]> {
        self.column_index(instrument)
            .map(|i| self.values[i].as_slice())
    }

    /// One cell, by date and instrument.
    pub fn cell(&self, date: NaiveDate, instrument: &str) -> Option<f64> {
        let row = self.row_index(date)?;
        let col = self.column_index(instrument)?;
        self.values[col][row]
    }

    /// Index of `date` in the row axis.
    pub fn row_index(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    fn column_index(&self, instrument: &str) -> Option<usize> {
        self.instruments
            .binary_search_by(|c| c.as_str().cmp(instrument))
            .ok()
    }

    /// Write one cell. Unknown instruments are ignored: the column set is
    /// fixed at construction and partial absence is not an error.
    pub(crate) fn set_cell(&mut self, date: NaiveDate, instrument: &str, value: f64) {
        if let Some(row) = self.row_index(date) {
            if let Some(col) = self.column_index(instrument) {
                self.values[col][row] = Some(value);
            }
        }
    }

    /// Insert a row for `date` if absent, keeping the axis sorted.
    pub(crate) fn upsert_row(&mut self, date: NaiveDate) {
        if let Err(pos) = self.dates.binary_search(&date) {
            self.dates.insert(pos, date);
            self.gen_time.insert(pos, None);
            for col in &mut self.values {
                col.insert(pos, None);
            }
        }
    }

    /// Keep only rows whose date satisfies the predicate.
    pub(crate) fn retain_rows(&mut self, keep: impl Fn(NaiveDate) -> bool) {
        let mask: Vec<bool> = self.dates.iter().map(|d| keep(*d)).collect();
        retain_masked(&mut self.gen_time, &mask);
        for col in &mut self.values {
            retain_masked(col, &mask);
        }
        retain_masked(&mut self.dates, &mask);
    }

    pub(crate) fn set_gen_time(&mut self, row: usize, at: Option<NaiveDateTime>) {
        self.gen_time[row] = at;
    }

    pub(crate) fn columns_mut(&mut self) -> impl Iterator<Item = &mut Vec<Option<f64>>> {
        self.values.iter_mut()
    }

    pub(crate) fn shift_gen_times(&mut self, lookahead: usize) {
        let n = self.gen_time.len();
        for t in 0..n {
            self.gen_time[t] = if t + lookahead < n {
                self.gen_time[t + lookahead]
            } else {
                None
            };
        }
    }

    /// Share of cells that are missing, across all instrument columns.
    pub fn missing_share(&self) -> f64 {
        let total = self.n_rows() * self.instruments.len();
        if total == 0 {
            return 0.0;
        }
        let missing: usize = self
            .values
            .iter()
            .map(|col| col.iter().filter(|v| v.is_none()).count())
            .sum();
        missing as f64 / total as f64
    }

    /// Render the panel in the interchange shape: a `datetime` date column,
    /// a `gen_time` timestamp column, then one `f64` column per instrument.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
            Some(d) => d,
            None => unreachable!(),
        };

        let days: Vec<i32> = self
            .dates
            .iter()
            .map(|d| (*d - EPOCH).num_days() as i32)
            .collect();
        let datetime = Series::new("datetime".into(), days).cast(&DataType::Date)?;

        let gen_ms: Vec<Option<i64>> = self
            .gen_time
            .iter()
            .map(|t| t.map(|t| t.and_utc().timestamp_millis()))
            .collect();
        let gen_time = Series::new("gen_time".into(), gen_ms)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

        let mut columns: Vec<Column> = Vec::with_capacity(2 + self.instruments.len());
        columns.push(datetime.into());
        columns.push(gen_time.into());
        for (code, col) in self.instruments.iter().zip(&self.values) {
            columns.push(Series::new(code.as_str().into(), col.clone()).into());
        }

        DataFrame::new(columns)
    }
}

fn retain_masked<T>(v: &mut Vec<T>, mask: &[bool]) {
    let mut i = 0;
    v.retain(|_| {
        let keep = mask[i];
        i += 1;
        keep
    });
}
