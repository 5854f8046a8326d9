mod holdings_model;

pub use holdings_model::{Holding, HoldingKind, PricingMode};
