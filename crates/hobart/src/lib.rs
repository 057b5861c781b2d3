#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export main types from sub-crates
pub use hobart_data as data;
pub use hobart_engine as engine;
pub use hobart_factors as factors;
pub use hobart_output as output;

pub mod prelude {
    //! Everything most callers need, in one import.

    pub use chrono::NaiveDate;

    pub use hobart_data::{CsvMarketData, MarketDataSession};
    pub use hobart_engine::{GapPolicy, Panel, PanelRecipe, SessionOffset, build_panel};
    pub use hobart_factors::{
        DEFINITIONS, Factor, FactorCatalog, FactorError, FactorType, available_factors,
        list_factor_names,
    };
    pub use hobart_output::{ExportFormat, PanelSummary, write_panel, write_panel_to};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_registry_reachable_through_prelude() {
        use prelude::*;
        assert!(list_factor_names().contains(&"StockOpen"));
    }
}
