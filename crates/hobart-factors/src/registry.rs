//! Factor registry.
//!
//! Central table of all factor definitions. Allows lookup by name and
//! instantiation against a session built by the composition root.

use std::path::PathBuf;
use std::sync::Arc;

use crate::contract::{FactorType, Frequency, SecurityType, day};
use crate::definition::{FactorDef, FactorMeta, SeriesSpec};
use crate::panel_factor::PanelFactor;
use hobart_data::{Adjustment, InstrumentKind, MarketDataSession, PriceField};
use hobart_engine::{GapPolicy, PanelRecipe, SessionOffset};

const fn meta(
    name: &'static str,
    author: &'static str,
    desc: &'static str,
    factor_type: FactorType,
    security_type: SecurityType,
    trigger_time: &'static str,
) -> FactorMeta {
    FactorMeta {
        name,
        author,
        desc,
        factor_type,
        security_type,
        frequency: Frequency::Daily,
        trigger_time,
        first_start: day(2010, 1, 1),
    }
}

const fn recipe(
    gap_policy: GapPolicy,
    session_offset: SessionOffset,
    return_lookahead: usize,
    live_splice: bool,
) -> PanelRecipe {
    PanelRecipe {
        gap_policy,
        session_offset,
        return_lookahead,
        live_splice,
    }
}

/// Every factor definition the platform knows about.
pub const DEFINITIONS: &[FactorDef] = &[
    FactorDef {
        meta: meta(
            "StockOpen",
            "xitong",
            "stock daily open price",
            FactorType::Normal,
            SecurityType::Stock,
            "0 30 9 * * * *",
        ),
        series: SeriesSpec::DailyPrice {
            kind: InstrumentKind::Stock,
            field: PriceField::Open,
            adjust: Adjustment::None,
        },
        recipe: recipe(GapPolicy::None, SessionOffset::SessionOpen, 0, false),
    },
    FactorDef {
        meta: meta(
            "StockClose",
            "xitong",
            "stock daily close price",
            FactorType::Normal,
            SecurityType::Stock,
            "0 0 15 * * * *",
        ),
        series: SeriesSpec::DailyPrice {
            kind: InstrumentKind::Stock,
            field: PriceField::Close,
            adjust: Adjustment::None,
        },
        recipe: recipe(GapPolicy::None, SessionOffset::SessionClose, 0, false),
    },
    FactorDef {
        meta: meta(
            "StockOpenReturn",
            "xitong",
            "stock return using open price",
            FactorType::Normal,
            SecurityType::Stock,
            "0 30 9 * * * *",
        ),
        series: SeriesSpec::DailyPrice {
            kind: InstrumentKind::Stock,
            field: PriceField::Open,
            adjust: Adjustment::Pre,
        },
        recipe: recipe(GapPolicy::None, SessionOffset::SessionOpen, 1, false),
    },
    FactorDef {
        meta: meta(
            "IndexOpenReturn",
            "xitong",
            "index daily return using open price",
            FactorType::Normal,
            SecurityType::Index,
            "0 30 9 * * * *",
        ),
        series: SeriesSpec::DailyPrice {
            kind: InstrumentKind::Index,
            field: PriceField::Open,
            adjust: Adjustment::Pre,
        },
        recipe: recipe(GapPolicy::None, SessionOffset::SessionOpen, 1, true),
    },
    FactorDef {
        meta: meta(
            "StockA",
            "xitong",
            "all China market A stocks",
            FactorType::Pool,
            SecurityType::Stock,
            "0 1 0 * * * *",
        ),
        series: SeriesSpec::DailyPrice {
            kind: InstrumentKind::Stock,
            field: PriceField::Open,
            adjust: Adjustment::None,
        },
        recipe: recipe(GapPolicy::ZeroThenBinary, SessionOffset::SessionClose, 0, false),
    },
    FactorDef {
        meta: meta(
            "Stock300",
            "xitong",
            "000300.XSHG components",
            FactorType::Pool,
            SecurityType::Stock,
            "0 1 0 * * * *",
        ),
        series: SeriesSpec::IndexMembership {
            index: "000300.XSHG",
        },
        recipe: recipe(GapPolicy::ZeroThenBinary, SessionOffset::Midnight, 0, false),
    },
    FactorDef {
        meta: meta(
            "Stock500",
            "xitong",
            "000905.XSHG components",
            FactorType::Pool,
            SecurityType::Stock,
            "0 1 0 * * * *",
        ),
        series: SeriesSpec::IndexMembership {
            index: "000905.XSHG",
        },
        recipe: recipe(GapPolicy::ZeroThenBinary, SessionOffset::Midnight, 0, false),
    },
    FactorDef {
        meta: meta(
            "StockST",
            "xitong",
            "is ST stock",
            FactorType::Pool,
            SecurityType::Stock,
            "0 1 0 * * * *",
        ),
        series: SeriesSpec::SpecialTreatment,
        recipe: recipe(GapPolicy::ZeroThenBinary, SessionOffset::Midnight, 0, false),
    },
    FactorDef {
        meta: meta(
            "StockIndustryCitics2019First",
            "xitong",
            "stock citics first level industry code",
            FactorType::Normal,
            SecurityType::Stock,
            "0 1 0 * * * *",
        ),
        series: SeriesSpec::Industry,
        recipe: recipe(GapPolicy::None, SessionOffset::Midnight, 0, false),
    },
    FactorDef {
        meta: meta(
            "StockBarraBookToPrice",
            "xitong",
            "stock barra book to price exposure",
            FactorType::Risk,
            SecurityType::Stock,
            "0 0 4 * * * *",
        ),
        series: SeriesSpec::ExposureFile {
            subdir: "exposures",
            column: "book_to_price",
        },
        recipe: recipe(GapPolicy::None, SessionOffset::SessionClose, 0, false),
    },
    FactorDef {
        meta: meta(
            "StockBarraLeverage",
            "xitong",
            "stock barra leverage exposure",
            FactorType::Risk,
            SecurityType::Stock,
            "0 0 4 * * * *",
        ),
        series: SeriesSpec::ExposureFile {
            subdir: "exposures",
            column: "leverage",
        },
        recipe: recipe(GapPolicy::None, SessionOffset::SessionClose, 0, false),
    },
    FactorDef {
        meta: meta(
            "StockResearchReport",
            "shijiachen",
            "research report coverage pool",
            FactorType::Pool,
            SecurityType::Stock,
            "0 1 0 * * * *",
        ),
        series: SeriesSpec::WideSnapshot {
            subdir: "research_report",
            date_column: "trade_date",
        },
        recipe: recipe(
            GapPolicy::ForwardFillThenCalendarPrune,
            SessionOffset::Midnight,
            0,
            false,
        ),
    },
    FactorDef {
        meta: meta(
            "StockEquityIncentive",
            "shijiachen",
            "stock equity incentive pool",
            FactorType::Pool,
            SecurityType::Stock,
            "0 1 0 * * * *",
        ),
        series: SeriesSpec::WideSnapshot {
            subdir: "equity_incentive",
            date_column: "hold_period",
        },
        recipe: recipe(
            GapPolicy::ForwardFillThenCalendarPrune,
            SessionOffset::Midnight,
            0,
            false,
        ),
    },
];

/// All factor definitions.
pub fn available_factors() -> Vec<FactorDef> {
    DEFINITIONS.to_vec()
}

/// Definitions of one classification.
pub fn factors_by_type(factor_type: FactorType) -> Vec<FactorDef> {
    DEFINITIONS
        .iter()
        .filter(|def| def.meta.factor_type == factor_type)
        .copied()
        .collect()
}

/// Look up one definition by name.
pub fn get_factor_def(name: &str) -> Option<FactorDef> {
    DEFINITIONS.iter().find(|def| def.meta.name == name).copied()
}

/// List all factor names.
pub fn list_factor_names() -> Vec<&'static str> {
    DEFINITIONS.iter().map(|def| def.meta.name).collect()
}

/// Instantiates factors against one shared session.
pub struct FactorCatalog {
    session: Arc<dyn MarketDataSession>,
    snapshot_root: Option<PathBuf>,
}

impl std::fmt::Debug for FactorCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactorCatalog")
            .field("snapshot_root", &self.snapshot_root)
            .finish_non_exhaustive()
    }
}

impl FactorCatalog {
    /// Create a catalog over a session; `snapshot_root` enables the
    /// snapshot-backed factors.
    pub fn new(session: Arc<dyn MarketDataSession>, snapshot_root: Option<PathBuf>) -> Self {
        Self {
            session,
            snapshot_root,
        }
    }

    /// Build the named factor, if it exists.
    pub fn build(&self, name: &str) -> Option<PanelFactor> {
        get_factor_def(name).map(|def| {
            PanelFactor::new(
                def,
                Arc::clone(&self.session),
                self.snapshot_root.clone(),
            )
        })
    }
}
