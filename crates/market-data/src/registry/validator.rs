//! Record validation.
//!
//! Every provider runs its parsed record through here before returning it:
//! - Name must be non-empty
//! - Price must be finite and > 0
//! - Price must be below a sanity ceiling
//!
//! A payload that parses but carries an empty record is reported as
//! `SourceNotFound`, exactly like a 404.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use log::warn;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{EstimateSnapshot, Quote, RawEstimate, RawQuote, Venue};

/// Validation severity levels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationSeverity {
    /// Record carries no usable data - treat as not found.
    Empty,
    /// Record carries data that cannot be right - treat as malformed.
    Invalid,
    /// Accept the record but log a warning.
    Soft,
}

#[derive(Clone, Debug)]
struct ValidationIssue {
    severity: ValidationSeverity,
    message: String,
}

/// Validator configuration.
#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    /// Maximum plausible price for a fund or exchange-traded product.
    pub max_price: Option<Decimal>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_price: Some(Decimal::from(1_000_000i64)),
        }
    }
}

/// Convert a provider float to `Decimal` through its shortest round-trip text.
///
/// Returns `None` for non-finite values.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok()
}

fn positive_decimal(value: Option<f64>) -> Option<Decimal> {
    value
        .and_then(decimal_from_f64)
        .filter(|d| *d > Decimal::ZERO)
}

/// Validates parsed provider records.
#[derive(Clone, Debug, Default)]
pub struct RecordValidator {
    config: ValidatorConfig,
}

impl RecordValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a raw quote and convert it to a [`Quote`].
    pub fn validate_quote(
        &self,
        provider: &str,
        code: &str,
        venue: Venue,
        raw: RawQuote,
    ) -> Result<Quote, MarketDataError> {
        let mut issues = Vec::new();

        let name = raw.name.trim().to_string();
        if name.is_empty() {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Empty,
                message: "empty name".to_string(),
            });
        }

        let price = positive_decimal(Some(raw.price));
        match price {
            None => issues.push(ValidationIssue {
                severity: ValidationSeverity::Empty,
                message: format!("unusable price {}", raw.price),
            }),
            Some(p) => self.check_ceiling(p, &mut issues),
        }

        let change_pct = match raw.change_pct {
            Some(c) if !c.is_finite() => {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Soft,
                    message: "non-finite change, dropped".to_string(),
                });
                None
            }
            other => other.and_then(decimal_from_f64),
        };

        self.settle(provider, code, &issues)?;

        Ok(Quote {
            source_id: provider.to_string(),
            code: code.to_string(),
            venue,
            name,
            // settle() rejected a missing price above
            price: price.unwrap_or(Decimal::ZERO),
            change_pct,
            time: raw.time.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Validate a raw live estimate and convert it to an [`EstimateSnapshot`].
    pub fn validate_estimate(
        &self,
        provider: &str,
        code: &str,
        raw: RawEstimate,
    ) -> Result<EstimateSnapshot, MarketDataError> {
        let mut issues = Vec::new();

        let estimated_nav = positive_decimal(raw.estimated_nav);
        let reference_nav = positive_decimal(raw.reference_nav);
        match (estimated_nav, reference_nav) {
            (None, None) => issues.push(ValidationIssue {
                severity: ValidationSeverity::Empty,
                message: "no estimated or reference NAV".to_string(),
            }),
            (None, Some(nav)) => {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Soft,
                    message: "no estimated NAV, keeping reference NAV only".to_string(),
                });
                self.check_ceiling(nav, &mut issues);
            }
            (Some(nav), _) => self.check_ceiling(nav, &mut issues),
        }

        let reference_date = raw
            .reference_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());
        let as_of_time = raw.as_of_time.as_deref().and_then(|s| {
            NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M")
                .or_else(|_| NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S"))
                .ok()
        });
        if raw.as_of_time.is_some() && as_of_time.is_none() {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Soft,
                message: format!("unparseable estimate time {:?}", raw.as_of_time),
            });
        }

        self.settle(provider, code, &issues)?;

        Ok(EstimateSnapshot {
            code: if raw.code.trim().is_empty() {
                code.to_string()
            } else {
                raw.code.trim().to_string()
            },
            name: raw.name.trim().to_string(),
            estimated_nav,
            estimated_change_pct: raw
                .estimated_change_pct
                .and_then(decimal_from_f64)
                .map(|pct| pct / Decimal::ONE_HUNDRED),
            as_of_time,
            reference_date,
            reference_nav,
        })
    }

    fn check_ceiling(&self, value: Decimal, issues: &mut Vec<ValidationIssue>) {
        if let Some(max) = self.config.max_price {
            if value > max {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Invalid,
                    message: format!("price {} exceeds sanity ceiling {}", value, max),
                });
            }
        }
    }

    /// Turn collected issues into the outcome: empty beats invalid, soft only logs.
    fn settle(
        &self,
        provider: &str,
        code: &str,
        issues: &[ValidationIssue],
    ) -> Result<(), MarketDataError> {
        if issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Empty)
        {
            return Err(MarketDataError::not_found(provider, code));
        }

        let invalid: Vec<_> = issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Invalid)
            .map(|i| i.message.as_str())
            .collect();
        if !invalid.is_empty() {
            return Err(MarketDataError::malformed(provider, invalid.join("; ")));
        }

        for issue in issues {
            warn!("{} record for {}: {}", provider, code, issue.message);
        }
        Ok(())
    }
}
