//! 기간별(주/월) 손익 집계.
//!
//! 거래 발생 시각이 속한 달력 주/월로 묶어 손익을 합산합니다. 버킷은
//! 시간순 스캔 중 처음 등장한 순서대로 하나씩만 만들어지며, 거래가 없는
//! 기간은 채우지 않습니다.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Offset, Utc};
use journal_core::{AnalyticsConfig, DecimalExt, WeekStart};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 집계 단위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Week,
    Month,
}

/// 단일 기간 버킷.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodProfit {
    pub period: Period,
    /// 기간 시작일 (버킷 키)
    pub start: NaiveDate,
    /// 표시용 레이블 ("Mar 03", "Mar 2024")
    pub label: String,
    pub pnl_quote: Decimal,
    pub pnl_secondary: Decimal,
    pub trade_count: usize,
}

/// 타임스탬프를 기간 시작일로 변환하는 규칙.
#[derive(Debug, Clone, Copy)]
pub struct PeriodBucketer {
    period: Period,
    week_start: WeekStart,
    offset: FixedOffset,
}

impl PeriodBucketer {
    pub fn new(period: Period, config: &AnalyticsConfig) -> Self {
        let offset = FixedOffset::east_opt(config.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix());
        Self {
            period,
            week_start: config.week_start,
            offset,
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// 설정된 오프셋 기준 기간 시작일.
    pub fn period_start(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        let date = timestamp.with_timezone(&self.offset).date_naive();

        match self.period {
            Period::Week => {
                let first = match self.week_start {
                    WeekStart::Sunday => 6,
                    WeekStart::Monday => 0,
                };
                let today = i64::from(date.weekday().num_days_from_monday());
                let days_back = (today - first).rem_euclid(7);
                date - Duration::days(days_back)
            }
            Period::Month => date.with_day(1).unwrap_or(date),
        }
    }

    pub fn label(&self, start: NaiveDate) -> String {
        match self.period {
            Period::Week => start.format("%b %d").to_string(),
            Period::Month => start.format("%b %Y").to_string(),
        }
    }
}

/// 등장 순서를 유지하는 기간 버킷 누적기.
#[derive(Debug, Clone)]
pub struct PeriodAccumulator {
    bucketer: PeriodBucketer,
    buckets: Vec<PeriodProfit>,
    index: HashMap<NaiveDate, usize>,
}

impl PeriodAccumulator {
    pub fn new(bucketer: PeriodBucketer) -> Self {
        Self {
            bucketer,
            buckets: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// 거래 1건을 해당 기간 버킷에 더합니다.
    ///
    /// 합계가 `Decimal` 범위를 넘어 포화되면 `false`를 반환합니다.
    pub fn add(&mut self, occurred_at: DateTime<Utc>, pnl_quote: Decimal, pnl_secondary: Decimal) -> bool {
        let start = self.bucketer.period_start(occurred_at);
        let idx = match self.index.get(&start) {
            Some(&idx) => idx,
            None => {
                self.buckets.push(PeriodProfit {
                    period: self.bucketer.period(),
                    start,
                    label: self.bucketer.label(start),
                    pnl_quote: Decimal::ZERO,
                    pnl_secondary: Decimal::ZERO,
                    trade_count: 0,
                });
                self.index.insert(start, self.buckets.len() - 1);
                self.buckets.len() - 1
            }
        };

        let bucket = &mut self.buckets[idx];
        bucket.trade_count += 1;
        let quote_exact = bucket.pnl_quote.accumulate(pnl_quote);
        let secondary_exact = bucket.pnl_secondary.accumulate(pnl_secondary);
        quote_exact && secondary_exact
    }

    pub fn finish(self) -> Vec<PeriodProfit> {
        self.buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_sunday() {
        let bucketer = PeriodBucketer::new(Period::Week, &AnalyticsConfig::default());
        // 2024-03-06 수요일 → 2024-03-03 일요일
        assert_eq!(bucketer.period_start(at(2024, 3, 6, 12)), date(2024, 3, 3));
        // 일요일 자체
        assert_eq!(bucketer.period_start(at(2024, 3, 3, 0)), date(2024, 3, 3));
        // 토요일
        assert_eq!(bucketer.period_start(at(2024, 3, 9, 23)), date(2024, 3, 3));
        assert_eq!(bucketer.label(date(2024, 3, 3)), "Mar 03");
    }

    #[test]
    fn test_week_start_monday() {
        let config = AnalyticsConfig {
            week_start: WeekStart::Monday,
            ..Default::default()
        };
        let bucketer = PeriodBucketer::new(Period::Week, &config);
        assert_eq!(bucketer.period_start(at(2024, 3, 3, 12)), date(2024, 2, 26));
        assert_eq!(bucketer.period_start(at(2024, 3, 4, 0)), date(2024, 3, 4));
    }

    #[test]
    fn test_month_bucket_and_offset() {
        let bucketer = PeriodBucketer::new(Period::Month, &AnalyticsConfig::default());
        assert_eq!(bucketer.period_start(at(2024, 2, 29, 23)), date(2024, 2, 1));
        assert_eq!(bucketer.label(date(2024, 2, 1)), "Feb 2024");

        // UTC+7 에서는 2월 29일 23시(UTC)가 3월 1일
        let config = AnalyticsConfig {
            utc_offset_minutes: 7 * 60,
            ..Default::default()
        };
        let bucketer = PeriodBucketer::new(Period::Month, &config);
        assert_eq!(bucketer.period_start(at(2024, 2, 29, 23)), date(2024, 3, 1));
    }

    #[test]
    fn test_accumulator_first_encountered_order() {
        let bucketer = PeriodBucketer::new(Period::Month, &AnalyticsConfig::default());
        let mut acc = PeriodAccumulator::new(bucketer);

        assert!(acc.add(at(2024, 1, 5, 0), dec!(10), dec!(155000)));
        assert!(acc.add(at(2024, 3, 2, 0), dec!(-4), dec!(-62000)));
        assert!(acc.add(at(2024, 1, 20, 0), dec!(6), dec!(93000)));

        let buckets = acc.finish();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "Jan 2024");
        assert_eq!(buckets[0].pnl_quote, dec!(16));
        assert_eq!(buckets[0].pnl_secondary, dec!(248000));
        assert_eq!(buckets[0].trade_count, 2);
        assert_eq!(buckets[1].label, "Mar 2024");
        assert_eq!(buckets[1].pnl_quote, dec!(-4));
    }

    #[test]
    fn test_accumulator_saturates_instead_of_overflowing() {
        let bucketer = PeriodBucketer::new(Period::Week, &AnalyticsConfig::default());
        let mut acc = PeriodAccumulator::new(bucketer);

        assert!(acc.add(at(2024, 1, 5, 0), Decimal::MAX, dec!(1)));
        assert!(!acc.add(at(2024, 1, 5, 1), Decimal::MAX, dec!(1)));

        let buckets = acc.finish();
        assert_eq!(buckets[0].pnl_quote, Decimal::MAX);
        assert_eq!(buckets[0].pnl_secondary, dec!(2));
        assert_eq!(buckets[0].trade_count, 2);
    }
}
