//! 성과 스냅샷.
//!
//! 거래 목록을 시간순으로 한 번 훑으면서 모든 집계 지표와 시계열을 함께 계산합니다.
//! 스냅샷은 저장하지 않으며, 분석 화면을 열 때마다 새로 만듭니다.
//!
//! 거래별 값은 평가 엔진이 범위를 보장하지만 여러 거래의 합은 그렇지 않으므로,
//! 합계는 `Decimal` 범위에서 포화시키고 `saturated`로 표시합니다.

use journal_core::{AnalyticsConfig, DecimalExt, Emotion};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::entry::JournalEntry;
use crate::portfolio::{EquityCurve, EquityPoint, Period, PeriodAccumulator, PeriodBucketer, PeriodProfit};

/// 심리 상태별 성과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionProfit {
    pub emotion: Emotion,
    pub trade_count: usize,
    pub winning_trades: usize,
    pub pnl_quote: Decimal,
    pub pnl_secondary: Decimal,
}

impl EmotionProfit {
    /// 승률 (%).
    pub fn win_rate(&self) -> Decimal {
        if self.trade_count == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.winning_trades) / Decimal::from(self.trade_count) * dec!(100)
    }
}

/// 거래 목록 전체의 성과 요약.
///
/// 거래가 없으면 모든 값이 0이고 시계열이 빈 기본값입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    /// 총 거래 수
    pub total_trades: usize,
    /// 수익 거래 수
    pub winning_trades: usize,
    /// 손실 거래 수
    pub losing_trades: usize,
    /// 총손익 (기준 통화)
    pub total_pnl_quote_currency: Decimal,
    /// 총손익 (보조 통화)
    pub total_pnl_secondary_currency: Decimal,
    /// 거래별 손익률의 단순 합 (복리 아님)
    pub total_pnl_percent: Decimal,
    /// 승률 (%)
    pub win_rate: Decimal,
    /// 평균 절대 손익률 (%). 달성 손익비의 간이 지표로 사용
    pub average_abs_pnl_percent: Decimal,
    /// 누적 잔고 기준 최대 낙폭 (%). 표현할 수 없는 낙폭이 있었으면 `None`
    pub max_drawdown_percent: Option<Decimal>,
    /// 최대 수익 거래 (기준 통화)
    pub largest_win: Decimal,
    /// 최대 손실 거래 (기준 통화, 양수)
    pub largest_loss: Decimal,
    pub profit_by_week: Vec<PeriodProfit>,
    pub profit_by_month: Vec<PeriodProfit>,
    pub profit_by_emotion: Vec<EmotionProfit>,
    pub equity_curve: Vec<EquityPoint>,
    /// 합계 중 하나라도 `Decimal` 범위를 넘어 포화되었는지
    pub saturated: bool,
}

impl Default for AnalyticsSnapshot {
    fn default() -> Self {
        Self {
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            total_pnl_quote_currency: Decimal::ZERO,
            total_pnl_secondary_currency: Decimal::ZERO,
            total_pnl_percent: Decimal::ZERO,
            win_rate: Decimal::ZERO,
            average_abs_pnl_percent: Decimal::ZERO,
            max_drawdown_percent: Some(Decimal::ZERO),
            largest_win: Decimal::ZERO,
            largest_loss: Decimal::ZERO,
            profit_by_week: Vec::new(),
            profit_by_month: Vec::new(),
            profit_by_emotion: Vec::new(),
            equity_curve: Vec::new(),
            saturated: false,
        }
    }
}

impl AnalyticsSnapshot {
    pub fn is_empty(&self) -> bool {
        self.total_trades == 0
    }

    /// 손실 거래 비율 (%).
    pub fn loss_rate(&self) -> Decimal {
        if self.total_trades == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.losing_trades) / Decimal::from(self.total_trades) * dec!(100)
    }
}

/// 성과 분석기.
#[derive(Debug, Clone, Default)]
pub struct Analytics {
    config: AnalyticsConfig,
}

impl Analytics {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// 거래 목록의 성과 스냅샷을 계산합니다.
    ///
    /// 입력은 발생 시각 오름차순이어야 하지만, 안정 정렬로 다시 정렬하므로
    /// 순서가 섞여 있어도 같은 결과가 나옵니다. 시각이 같은 거래는 입력 순서를 유지합니다.
    pub fn summarize<T: JournalEntry>(&self, trades: &[T]) -> AnalyticsSnapshot {
        if trades.is_empty() {
            return AnalyticsSnapshot::default();
        }

        let mut ordered: Vec<&T> = trades.iter().collect();
        ordered.sort_by_key(|t| t.occurred_at());

        let mut snapshot = AnalyticsSnapshot {
            total_trades: ordered.len(),
            ..Default::default()
        };
        let mut abs_pct_sum = Decimal::ZERO;
        let mut exact = true;
        let mut curve = EquityCurve::new();
        let mut weekly = PeriodAccumulator::new(PeriodBucketer::new(Period::Week, &self.config));
        let mut monthly = PeriodAccumulator::new(PeriodBucketer::new(Period::Month, &self.config));
        let mut by_emotion: Vec<EmotionProfit> = Vec::new();
        let mut emotion_index: HashMap<Emotion, usize> = HashMap::new();

        for trade in ordered {
            let occurred_at = trade.occurred_at();
            let pnl = trade.pnl_quote();
            let pnl_secondary = trade.pnl_secondary();
            let pct = trade.pnl_percent();

            exact &= snapshot.total_pnl_quote_currency.accumulate(pnl);
            exact &= snapshot.total_pnl_secondary_currency.accumulate(pnl_secondary);
            exact &= snapshot.total_pnl_percent.accumulate(pct);
            exact &= abs_pct_sum.accumulate(pct.abs());

            // 수익/손실 분류
            if pnl > Decimal::ZERO {
                snapshot.winning_trades += 1;
                snapshot.largest_win = snapshot.largest_win.max(pnl);
            } else if pnl < Decimal::ZERO {
                snapshot.losing_trades += 1;
                snapshot.largest_loss = snapshot.largest_loss.max(pnl.abs());
            }

            curve.add_trade(occurred_at, pnl, pnl_secondary);
            exact &= weekly.add(occurred_at, pnl, pnl_secondary);
            exact &= monthly.add(occurred_at, pnl, pnl_secondary);

            let emotion = trade.emotion();
            let idx = *emotion_index.entry(emotion).or_insert_with(|| {
                by_emotion.push(EmotionProfit {
                    emotion,
                    trade_count: 0,
                    winning_trades: 0,
                    pnl_quote: Decimal::ZERO,
                    pnl_secondary: Decimal::ZERO,
                });
                by_emotion.len() - 1
            });
            let bucket = &mut by_emotion[idx];
            bucket.trade_count += 1;
            exact &= bucket.pnl_quote.accumulate(pnl);
            exact &= bucket.pnl_secondary.accumulate(pnl_secondary);
            if pnl > Decimal::ZERO {
                bucket.winning_trades += 1;
            }
        }

        let count = Decimal::from(snapshot.total_trades);
        snapshot.win_rate = Decimal::from(snapshot.winning_trades) / count * dec!(100);
        snapshot.average_abs_pnl_percent = abs_pct_sum / count;
        snapshot.max_drawdown_percent = curve.max_drawdown();
        snapshot.saturated = !exact || curve.is_saturated();
        snapshot.profit_by_week = weekly.finish();
        snapshot.profit_by_month = monthly.finish();
        snapshot.profit_by_emotion = by_emotion;
        snapshot.equity_curve = curve.into_points();

        debug!(
            trades = snapshot.total_trades,
            total_pnl = %snapshot.total_pnl_quote_currency,
            win_rate = %snapshot.win_rate.to_percent_string(),
            max_drawdown = ?snapshot.max_drawdown_percent,
            saturated = snapshot.saturated,
            "Analytics summarized"
        );

        snapshot
    }
}

/// 기본 설정(일요일 시작 주, UTC)으로 성과 스냅샷을 계산합니다.
pub fn summarize<T: JournalEntry>(trades: &[T]) -> AnalyticsSnapshot {
    Analytics::default().summarize(trades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    #[derive(Debug, Clone)]
    struct MockEntry {
        occurred_at: DateTime<Utc>,
        pnl: Decimal,
        pct: Decimal,
        emotion: Emotion,
    }

    impl JournalEntry for MockEntry {
        fn occurred_at(&self) -> DateTime<Utc> {
            self.occurred_at
        }

        fn pnl_quote(&self) -> Decimal {
            self.pnl
        }

        fn pnl_secondary(&self) -> Decimal {
            self.pnl.saturating_mul(dec!(15500))
        }

        fn pnl_percent(&self) -> Decimal {
            self.pct
        }

        fn emotion(&self) -> Emotion {
            self.emotion
        }
    }

    fn entries(pnls: &[Decimal]) -> Vec<MockEntry> {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        pnls.iter()
            .enumerate()
            .map(|(i, pnl)| MockEntry {
                occurred_at: t0 + Duration::days(i as i64),
                pnl: *pnl,
                pct: *pnl / dec!(100),
                emotion: Emotion::Calm,
            })
            .collect()
    }

    #[test]
    fn test_empty_trades() {
        let snapshot = summarize::<MockEntry>(&[]);
        assert_eq!(snapshot, AnalyticsSnapshot::default());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.max_drawdown_percent, Some(Decimal::ZERO));
        assert!(snapshot.equity_curve.is_empty());
        assert!(!snapshot.saturated);
        assert!(snapshot.profit_by_week.is_empty());
    }

    #[test]
    fn test_win_rate_two_of_three() {
        let snapshot = summarize(&entries(&[dec!(10), dec!(-5), dec!(3)]));

        assert_eq!(snapshot.total_trades, 3);
        assert_eq!(snapshot.winning_trades, 2);
        assert_eq!(snapshot.losing_trades, 1);
        assert_eq!(snapshot.win_rate.round_display(2), dec!(66.67));
        assert_eq!(snapshot.total_pnl_quote_currency, dec!(8));
        assert_eq!(snapshot.total_pnl_secondary_currency, dec!(124000));
        assert_eq!(snapshot.largest_win, dec!(10));
        assert_eq!(snapshot.largest_loss, dec!(5));
        assert_eq!(snapshot.loss_rate().round_display(2), dec!(33.33));
    }

    #[test]
    fn test_percent_aggregates() {
        let snapshot = summarize(&entries(&[dec!(10), dec!(-5), dec!(3)]));
        // 0.10 - 0.05 + 0.03
        assert_eq!(snapshot.total_pnl_percent, dec!(0.08));
        // (0.10 + 0.05 + 0.03) / 3
        assert_eq!(snapshot.average_abs_pnl_percent, dec!(0.06));
    }

    #[test]
    fn test_max_drawdown() {
        // 잔고: 100, 60, 120, 60 → 최대 낙폭 = (120 - 60) / 120 = 50%
        let snapshot = summarize(&entries(&[dec!(100), dec!(-40), dec!(60), dec!(-60)]));
        assert_eq!(snapshot.max_drawdown_percent, Some(dec!(50)));

        let balances: Vec<Decimal> = snapshot.equity_curve.iter().map(|p| p.balance_quote).collect();
        assert_eq!(balances, vec![dec!(100), dec!(60), dec!(120), dec!(60)]);
        assert_eq!(
            snapshot.equity_curve.last().map(|p| p.balance_quote),
            Some(snapshot.total_pnl_quote_currency)
        );
    }

    #[test]
    fn test_all_losses_have_zero_drawdown() {
        let snapshot = summarize(&entries(&[dec!(-10), dec!(-20)]));
        assert_eq!(snapshot.max_drawdown_percent, Some(Decimal::ZERO));
        assert_eq!(snapshot.win_rate, Decimal::ZERO);
    }

    #[test]
    fn test_unordered_input_is_sorted_stably() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mk = |offset: i64, pnl: Decimal| MockEntry {
            occurred_at: t0 + Duration::hours(offset),
            pnl,
            pct: Decimal::ZERO,
            emotion: Emotion::Calm,
        };
        // 같은 시각의 두 거래(+100, -100)는 입력 순서 유지
        let trades = vec![mk(5, dec!(7)), mk(1, dec!(100)), mk(1, dec!(-100))];

        let snapshot = summarize(&trades);
        let balances: Vec<Decimal> = snapshot.equity_curve.iter().map(|p| p.balance_quote).collect();
        assert_eq!(balances, vec![dec!(100), dec!(0), dec!(7)]);
        assert_eq!(snapshot.max_drawdown_percent, Some(dec!(100)));

        // 입력은 변경되지 않음
        assert_eq!(trades[0].pnl, dec!(7));
    }

    #[test]
    fn test_profit_by_emotion() {
        let mut trades = entries(&[dec!(10), dec!(-5), dec!(3), dec!(-8)]);
        trades[1].emotion = Emotion::Greedy;
        trades[3].emotion = Emotion::Greedy;

        let snapshot = summarize(&trades);
        assert_eq!(snapshot.profit_by_emotion.len(), 2);

        let calm = &snapshot.profit_by_emotion[0];
        assert_eq!(calm.emotion, Emotion::Calm);
        assert_eq!(calm.pnl_quote, dec!(13));
        assert_eq!(calm.win_rate(), dec!(100));

        let greedy = &snapshot.profit_by_emotion[1];
        assert_eq!(greedy.emotion, Emotion::Greedy);
        assert_eq!(greedy.pnl_quote, dec!(-13));
        assert_eq!(greedy.win_rate(), Decimal::ZERO);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let trades = entries(&[dec!(12.5), dec!(-3.25), dec!(0), dec!(7)]);
        assert_eq!(summarize(&trades), summarize(&trades));
    }

    #[test]
    fn test_huge_totals_saturate_without_panicking() {
        // 거래별로는 표현 가능한 손익이지만 합계는 Decimal 범위를 넘음
        let huge = Decimal::MAX / dec!(4);
        let mut trades = entries(&[huge; 6]);
        for t in &mut trades {
            t.pct = dec!(1);
        }

        let snapshot = summarize(&trades);
        assert!(snapshot.saturated);
        assert_eq!(snapshot.total_trades, 6);
        assert_eq!(snapshot.total_pnl_quote_currency, Decimal::MAX);
        assert_eq!(snapshot.total_pnl_secondary_currency, Decimal::MAX);
        assert_eq!(snapshot.win_rate, dec!(100));
        assert_eq!(snapshot.equity_curve.len(), 6);
        assert_eq!(snapshot.profit_by_emotion[0].pnl_quote, Decimal::MAX);
    }

    #[test]
    fn test_unrepresentable_drawdown_is_undefined() {
        // 아주 작은 고점 뒤 일반적인 손실 → 낙폭 비율이 Decimal 범위를 넘음
        let trades = entries(&[dec!(0.00000000000000000000000001), dec!(-1000000)]);

        let snapshot = summarize(&trades);
        assert_eq!(snapshot.max_drawdown_percent, None);
        assert_eq!(snapshot.equity_curve[1].drawdown_percent, None);
        assert!(!snapshot.saturated);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["maxDrawdownPercent"].is_null());
    }
}
