use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One point of a raw trend payload: epoch milliseconds and NAV.
#[derive(Clone, Debug, PartialEq)]
pub struct RawNavPoint {
    pub timestamp_ms: i64,
    pub nav: f64,
}

/// Trend payload as parsed from the provider, before normalization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawNavTrend {
    pub name: String,
    pub points: Vec<RawNavPoint>,
}

/// Net asset value on one trading date.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NavPoint {
    pub date: NaiveDate,
    pub net_asset_value: Decimal,
}

/// Date-ascending, date-unique sequence of positive NAV points.
///
/// The only constructor sorts and deduplicates, so the invariant holds for
/// every value of this type.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<NavPoint>", into = "Vec<NavPoint>")]
pub struct NavSeries {
    points: Vec<NavPoint>,
}

impl From<Vec<NavPoint>> for NavSeries {
    fn from(points: Vec<NavPoint>) -> Self {
        Self::from_points(points)
    }
}

impl From<NavSeries> for Vec<NavPoint> {
    fn from(series: NavSeries) -> Self {
        series.points
    }
}

impl NavSeries {
    /// Build a series from points in any order.
    ///
    /// Later points win when two share a date; non-positive values are dropped.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = NavPoint>,
    {
        let by_date: BTreeMap<NaiveDate, Decimal> = points
            .into_iter()
            .filter(|p| p.net_asset_value > Decimal::ZERO)
            .map(|p| (p.date, p.net_asset_value))
            .collect();

        Self {
            points: by_date
                .into_iter()
                .map(|(date, net_asset_value)| NavPoint {
                    date,
                    net_asset_value,
                })
                .collect(),
        }
    }

    pub fn points(&self) -> &[NavPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&NavPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&NavPoint> {
        self.points.last()
    }

    pub fn get(&self, index: usize) -> Option<&NavPoint> {
        self.points.get(index)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    /// Index of the earliest point dated on or after `date`.
    pub fn first_index_on_or_after(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.points.partition_point(|p| p.date < date);
        (idx < self.points.len()).then_some(idx)
    }

    /// NAV published exactly on `date`.
    pub fn nav_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].net_asset_value)
    }

    /// NAV of the last point dated on or before `date`.
    pub fn nav_on_or_before(&self, date: NaiveDate) -> Option<Decimal> {
        let idx = self.points.partition_point(|p| p.date <= date);
        idx.checked_sub(1)
            .map(|i| self.points[i].net_asset_value)
    }
}

/// Normalized NAV history plus the latest point and its day-over-day change.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavData {
    pub code: String,
    pub name: String,
    pub series: NavSeries,
    pub latest_nav: Decimal,
    pub latest_nav_date: NaiveDate,
    /// `latest/previous - 1`; absent with fewer than two points
    pub latest_daily_change_pct: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn p(date: NaiveDate, nav: Decimal) -> NavPoint {
        NavPoint {
            date,
            net_asset_value: nav,
        }
    }

    #[test]
    fn test_from_points_sorts_and_dedupes_last_wins() {
        let series = NavSeries::from_points(vec![
            p(d(2024, 1, 3), dec!(1.03)),
            p(d(2024, 1, 1), dec!(1.01)),
            p(d(2024, 1, 3), dec!(1.30)),
            p(d(2024, 1, 2), dec!(1.02)),
        ]);

        let dates: Vec<_> = series.dates().collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3)]);
        assert_eq!(series.nav_on(d(2024, 1, 3)), Some(dec!(1.30)));
    }

    #[test]
    fn test_from_points_drops_non_positive() {
        let series = NavSeries::from_points(vec![
            p(d(2024, 1, 1), dec!(0)),
            p(d(2024, 1, 2), dec!(-1)),
            p(d(2024, 1, 3), dec!(1.1)),
        ]);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_lookups() {
        let series = NavSeries::from_points(vec![
            p(d(2024, 1, 2), dec!(1.0)),
            p(d(2024, 1, 4), dec!(1.1)),
            p(d(2024, 1, 8), dec!(1.2)),
        ]);

        assert_eq!(series.first_index_on_or_after(d(2024, 1, 1)), Some(0));
        assert_eq!(series.first_index_on_or_after(d(2024, 1, 4)), Some(1));
        assert_eq!(series.first_index_on_or_after(d(2024, 1, 5)), Some(2));
        assert_eq!(series.first_index_on_or_after(d(2024, 1, 9)), None);

        assert_eq!(series.nav_on(d(2024, 1, 5)), None);
        assert_eq!(series.nav_on_or_before(d(2024, 1, 5)), Some(dec!(1.1)));
        assert_eq!(series.nav_on_or_before(d(2024, 1, 1)), None);
        assert_eq!(series.nav_on_or_before(d(2024, 2, 1)), Some(dec!(1.2)));
    }
}
