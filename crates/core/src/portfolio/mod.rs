pub mod holdings;
pub mod performance;
pub mod settlement;
pub mod totals;
pub mod valuation;
