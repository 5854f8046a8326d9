use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Home timezone of the markets priced here.
pub const DEFAULT_MARKET_TZ: Tz = chrono_tz::Asia::Shanghai;

/// Converts a UTC instant to a calendar date in the given timezone.
///
/// This is the single source of truth for deriving a market date from a
/// timestamp.
pub fn market_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Source of "today" for accrual gating and holding age.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock read in a market timezone.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(DEFAULT_MARKET_TZ)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        market_date_from_utc(Utc::now(), self.tz)
    }
}

/// Clock pinned to one date.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Whole calendar days from `start` to `end`, floored at zero.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(0)
}
