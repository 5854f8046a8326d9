mod settlement_calculator;

pub use settlement_calculator::{compute_settlement, SettlementBasis, SettlementInfo};
