use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// How a holding is priced.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum HoldingKind {
    /// Priced from end-of-day NAV and an optional live estimate.
    OffExchangeFund,
    /// Has both a NAV series and a traded exchange price (LOF).
    DualQuotedFund,
    /// Traded product priced from the exchange quote only.
    ExchangeTraded,
}

impl HoldingKind {
    pub fn has_nav(&self) -> bool {
        !matches!(self, HoldingKind::ExchangeTraded)
    }

    pub fn has_quote(&self) -> bool {
        !matches!(self, HoldingKind::OffExchangeFund)
    }
}

/// Price a dual-quoted holding is valued at.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PricingMode {
    NetAssetValue,
    #[default]
    MarketPrice,
}

/// User-declared position. Immutable for the duration of a valuation pass.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub code: String,
    pub kind: HoldingKind,
    pub purchase_date: NaiveDate,
    pub invested_amount: Decimal,
    #[serde(default)]
    pub declared_unit_cost: Option<Decimal>,
    /// Only meaningful for dual-quoted holdings
    #[serde(default)]
    pub pricing_mode: Option<PricingMode>,
    /// Display name used when no source reports one
    #[serde(default)]
    pub name: Option<String>,
}

impl Holding {
    /// Pricing mode in effect; market price unless set otherwise.
    pub fn effective_pricing_mode(&self) -> PricingMode {
        self.pricing_mode.unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation("holding id is empty".to_string()));
        }
        if self.code.trim().is_empty() {
            return Err(Error::Validation(format!(
                "holding {} has an empty code",
                self.id
            )));
        }
        if self.invested_amount < Decimal::ZERO {
            return Err(Error::Validation(format!(
                "holding {} has a negative invested amount",
                self.id
            )));
        }
        Ok(())
    }
}
