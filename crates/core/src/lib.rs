//! Fundboard Core - Holding valuation engine.
//!
//! Values a portfolio of Chinese funds and exchange-traded products from
//! market data provided by `fundboard-market-data`:
//!
//! - settlement dates per holding kind (confirmation on the first trading date
//!   on or after purchase, accrual from the trading date after that)
//! - unit cost and share count, declared or inferred from NAV history
//! - current value, profit, return and premium per holding
//! - portfolio totals and holding weights
//! - trailing seven-date return curves
//!
//! Missing data never fails a pass: affected fields stay undefined and the
//! holding carries diagnostics explaining why.

pub mod errors;
pub mod portfolio;
pub mod utils;

pub use portfolio::holdings::{Holding, HoldingKind, PricingMode};
pub use portfolio::performance::CurvePoint;
pub use portfolio::settlement::{SettlementBasis, SettlementInfo};
pub use portfolio::totals::PortfolioTotals;
pub use portfolio::valuation::{
    CostSource, Diagnostic, PriceSource, ValuationPass, ValuationResult, ValuationService,
    ValuationServiceTrait,
};
pub use utils::time_utils::{Clock, FixedClock, SystemClock};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
