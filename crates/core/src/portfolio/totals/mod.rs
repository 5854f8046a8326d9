mod aggregator;
mod totals_model;

pub use aggregator::{aggregate, apply_weights};
pub use totals_model::PortfolioTotals;
