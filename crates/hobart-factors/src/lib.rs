#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod adapters;
pub mod contract;
pub mod definition;
pub mod panel_factor;
pub mod registry;

pub use contract::{Factor, FactorError, FactorType, Frequency, SecurityType};
pub use definition::{FactorDef, FactorMeta, SeriesSpec};
pub use panel_factor::PanelFactor;
pub use registry::{
    DEFINITIONS, FactorCatalog, available_factors, factors_by_type, get_factor_def,
    list_factor_names,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
