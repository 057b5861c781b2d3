#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod csv_market;
pub mod error;
pub mod snapshot;
pub mod symbols;
pub mod vendor;

pub use csv_market::CsvMarketData;
pub use error::{DataError, Result};
pub use snapshot::{ExposureDir, ExposureSeries, WideSnapshotDir, WideSnapshotSeries};
pub use vendor::{Adjustment, InstrumentKind, MarketDataSession, PriceField};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
