#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod align;
pub mod builder;
pub mod error;
pub mod fill;
pub mod gen_time;
pub mod panel;
pub mod returns;
pub mod session;
pub mod sources;
pub mod splice;

pub use align::PanelAligner;
pub use builder::{PanelRecipe, build_panel};
pub use error::{EngineError, Result};
pub use fill::GapPolicy;
pub use panel::Panel;
pub use session::SessionOffset;
pub use sources::{
    CalendarService, LiveQuote, LiveSnapshotSource, RawObservation, RawSeriesFetcher, SourceError,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
