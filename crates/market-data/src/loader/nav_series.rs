//! NAV series loading and normalization.

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use chrono_tz::Tz;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{DataKind, NavData, NavPoint, NavSeries, RawNavTrend};
use crate::provider::NavTrendProvider;
use crate::registry::{decimal_from_f64, RequestSequencer};

/// Fetches a raw trend through the sequencer and normalizes it.
pub struct NavSeriesLoader {
    provider: Arc<dyn NavTrendProvider>,
    sequencer: Arc<RequestSequencer>,
    timeout: Duration,
    timezone: Tz,
}

impl NavSeriesLoader {
    pub fn new(
        provider: Arc<dyn NavTrendProvider>,
        sequencer: Arc<RequestSequencer>,
        timeout: Duration,
        timezone: Tz,
    ) -> Self {
        Self {
            provider,
            sequencer,
            timeout,
            timezone,
        }
    }

    /// Load the NAV history for `code`.
    ///
    /// Any source failure, and an empty series after normalization, is
    /// reported as [`MarketDataError::SeriesUnavailable`].
    pub async fn load(&self, code: &str) -> Result<NavData, MarketDataError> {
        let provider = &self.provider;
        let raw = self
            .sequencer
            .run(DataKind::NavTrend, provider.id(), code, self.timeout, || {
                provider.fetch_trend(code)
            })
            .await
            .map_err(|e| {
                warn!("NAV trend for {} from '{}' failed: {}", code, provider.id(), e);
                MarketDataError::SeriesUnavailable {
                    code: code.to_string(),
                    reason: e.to_string(),
                }
            })?;

        normalize(code, raw, self.timezone)
    }
}

/// Turn a raw trend into [`NavData`].
///
/// Timestamps become calendar dates in `timezone`. Non-finite and
/// non-positive values are dropped, duplicate dates keep the last value.
pub fn normalize(code: &str, raw: RawNavTrend, timezone: Tz) -> Result<NavData, MarketDataError> {
    let total = raw.points.len();
    let points = raw.points.into_iter().filter_map(|p| {
        let date = DateTime::from_timestamp_millis(p.timestamp_ms)?
            .with_timezone(&timezone)
            .date_naive();
        let net_asset_value = decimal_from_f64(p.nav)?;
        Some(NavPoint {
            date,
            net_asset_value,
        })
    });
    let series = NavSeries::from_points(points);

    let latest = match series.last() {
        Some(point) => *point,
        None => {
            return Err(MarketDataError::SeriesUnavailable {
                code: code.to_string(),
                reason: format!("no usable points in trend of {}", total),
            })
        }
    };

    if series.len() < total {
        debug!(
            "NAV trend for {}: kept {} of {} points",
            code,
            series.len(),
            total
        );
    }

    let latest_daily_change_pct = series
        .len()
        .checked_sub(2)
        .and_then(|i| series.get(i))
        .map(|previous| latest.net_asset_value / previous.net_asset_value - Decimal::ONE);

    Ok(NavData {
        code: code.to_string(),
        name: raw.name,
        series,
        latest_nav: latest.net_asset_value,
        latest_nav_date: latest.date,
        latest_daily_change_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawNavPoint;
    use crate::registry::SequencerMode;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const SHANGHAI: Tz = chrono_tz::Asia::Shanghai;

    // 2024-01-12 00:00 +08:00 and the following trading days
    const JAN_12: i64 = 1_704_988_800_000;
    const DAY_MS: i64 = 86_400_000;

    fn raw(points: &[(i64, f64)]) -> RawNavTrend {
        RawNavTrend {
            name: "Growth Mixed".to_string(),
            points: points
                .iter()
                .map(|&(timestamp_ms, nav)| RawNavPoint { timestamp_ms, nav })
                .collect(),
        }
    }

    #[test]
    fn test_dates_use_home_timezone() {
        // midnight in Shanghai is still the previous day in UTC
        let data = normalize("000001", raw(&[(JAN_12, 1.038)]), SHANGHAI).unwrap();
        assert_eq!(
            data.latest_nav_date,
            NaiveDate::from_ymd_opt(2024, 1, 12).unwrap()
        );

        let utc = normalize("000001", raw(&[(JAN_12, 1.038)]), chrono_tz::UTC).unwrap();
        assert_eq!(
            utc.latest_nav_date,
            NaiveDate::from_ymd_opt(2024, 1, 11).unwrap()
        );
    }

    #[test]
    fn test_drops_non_finite_dedupes_and_sorts() {
        let data = normalize(
            "000001",
            raw(&[
                (JAN_12 + 3 * DAY_MS, 1.05),
                (JAN_12, 1.0),
                (JAN_12 + DAY_MS, f64::NAN),
                (JAN_12 + 3 * DAY_MS + 3_600_000, 1.06),
                (JAN_12 + 2 * DAY_MS, f64::INFINITY),
            ]),
            SHANGHAI,
        )
        .unwrap();

        let navs: Vec<Decimal> = data.series.points().iter().map(|p| p.net_asset_value).collect();
        assert_eq!(navs, vec![dec!(1.0), dec!(1.06)]);
        assert_eq!(data.latest_nav, dec!(1.06));
        assert_eq!(data.latest_daily_change_pct, Some(dec!(0.06)));
        assert_eq!(data.name, "Growth Mixed");
    }

    #[test]
    fn test_single_point_has_no_change() {
        let data = normalize("000001", raw(&[(JAN_12, 1.2)]), SHANGHAI).unwrap();
        assert_eq!(data.latest_daily_change_pct, None);
    }

    #[test]
    fn test_empty_after_filtering_is_unavailable() {
        let err = normalize("000001", raw(&[(JAN_12, f64::NAN)]), SHANGHAI).unwrap_err();
        assert!(matches!(err, MarketDataError::SeriesUnavailable { .. }));
    }

    struct FailingTrend;

    #[async_trait]
    impl NavTrendProvider for FailingTrend {
        fn id(&self) -> &'static str {
            "PINGZHONG"
        }

        async fn fetch_trend(&self, code: &str) -> Result<RawNavTrend, MarketDataError> {
            Err(MarketDataError::not_found("PINGZHONG", code))
        }
    }

    #[tokio::test]
    async fn test_source_failure_is_series_unavailable() {
        let loader = NavSeriesLoader::new(
            Arc::new(FailingTrend),
            Arc::new(RequestSequencer::new(SequencerMode::PerKind)),
            Duration::from_secs(8),
            SHANGHAI,
        );
        let err = loader.load("000001").await.unwrap_err();
        assert!(matches!(err, MarketDataError::SeriesUnavailable { .. }));
    }
}
