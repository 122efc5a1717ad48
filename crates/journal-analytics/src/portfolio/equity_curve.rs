//! 자산 곡선(Equity Curve) 모듈
//!
//! 거래별 누적 손익을 시간순으로 추적하고 고점 대비 낙폭을 계산합니다.
//!
//! 누적 잔고와 고점은 모두 0에서 시작합니다. 고점이 0 이하인 동안에는
//! (아직 한 번도 플러스 구간에 오르지 못한 상태) 낙폭을 0으로 봅니다.
//!
//! 누적 잔고는 `Decimal` 범위에서 포화되며, 표현할 수 없는 낙폭은 `None`
//! (정의되지 않음)으로 기록합니다. 어떤 입력에서도 패닉하지 않습니다.

use chrono::{DateTime, Utc};
use journal_core::DecimalExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 고점 대비 낙폭 (%).
///
/// `peak <= 0`이면 0, 결과가 `Decimal` 범위를 넘으면 `None`입니다.
pub fn drawdown_pct(peak: Decimal, balance: Decimal) -> Option<Decimal> {
    if peak <= Decimal::ZERO {
        return Some(Decimal::ZERO);
    }
    peak.checked_sub(balance)?
        .checked_div(peak)?
        .checked_mul(dec!(100))
}

/// 누적 잔고/고점/최대 낙폭 상태.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawdownTracker {
    running_balance: Decimal,
    peak: Decimal,
    max_drawdown_pct: Decimal,
    max_drawdown_at: Option<DateTime<Utc>>,
    /// 표현할 수 없는 낙폭이 한 번이라도 나왔는지
    drawdown_undefined: bool,
    /// 누적 잔고가 포화되었는지
    saturated: bool,
}

impl DrawdownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 거래 손익을 반영하고 현재 낙폭(%)을 반환합니다.
    pub fn record(&mut self, occurred_at: DateTime<Utc>, pnl: Decimal) -> Option<Decimal> {
        if !self.running_balance.accumulate(pnl) {
            self.saturated = true;
        }

        // 고점 갱신
        if self.running_balance > self.peak {
            self.peak = self.running_balance;
        }

        let drawdown = drawdown_pct(self.peak, self.running_balance);

        // 최대 낙폭 갱신
        match drawdown {
            Some(dd) if dd > self.max_drawdown_pct => {
                self.max_drawdown_pct = dd;
                self.max_drawdown_at = Some(occurred_at);
            }
            Some(_) => {}
            None => {
                if !self.drawdown_undefined {
                    self.max_drawdown_at = Some(occurred_at);
                }
                self.drawdown_undefined = true;
            }
        }

        drawdown
    }

    pub fn running_balance(&self) -> Decimal {
        self.running_balance
    }

    pub fn peak(&self) -> Decimal {
        self.peak
    }

    /// 지금까지 관측된 최대 낙폭 (%).
    ///
    /// 표현할 수 없는 낙폭이 있었다면 `None`입니다.
    pub fn max_drawdown(&self) -> Option<Decimal> {
        (!self.drawdown_undefined).then_some(self.max_drawdown_pct)
    }

    /// 최대 낙폭이 발생한 거래 시각.
    pub fn max_drawdown_at(&self) -> Option<DateTime<Utc>> {
        self.max_drawdown_at
    }

    pub fn is_saturated(&self) -> bool {
        self.saturated
    }
}

/// 자산 곡선 데이터 포인트 (거래 1건당 1개).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    /// 거래 발생 시각
    pub occurred_at: DateTime<Utc>,
    /// 이 거래까지의 누적 손익 (기준 통화)
    pub balance_quote: Decimal,
    /// 이 거래까지의 누적 손익 (보조 통화)
    pub balance_secondary: Decimal,
    /// 이 시점의 고점 대비 낙폭 (%). 표현할 수 없으면 `None`
    pub drawdown_percent: Option<Decimal>,
}

/// 거래 누적 손익 곡선.
#[derive(Debug, Clone, Default)]
pub struct EquityCurve {
    points: Vec<EquityPoint>,
    tracker: DrawdownTracker,
    balance_secondary: Decimal,
    secondary_saturated: bool,
}

impl EquityCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// 거래 1건을 곡선에 추가합니다. 시간순으로 호출해야 합니다.
    pub fn add_trade(&mut self, occurred_at: DateTime<Utc>, pnl_quote: Decimal, pnl_secondary: Decimal) {
        let drawdown_percent = self.tracker.record(occurred_at, pnl_quote);
        if !self.balance_secondary.accumulate(pnl_secondary) {
            self.secondary_saturated = true;
        }

        self.points.push(EquityPoint {
            occurred_at,
            balance_quote: self.tracker.running_balance(),
            balance_secondary: self.balance_secondary,
            drawdown_percent,
        });
    }

    pub fn points(&self) -> &[EquityPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<EquityPoint> {
        self.points
    }

    /// 현재 누적 손익 (기준 통화).
    pub fn current_balance(&self) -> Decimal {
        self.tracker.running_balance()
    }

    /// 현재 고점.
    pub fn peak(&self) -> Decimal {
        self.tracker.peak()
    }

    /// 최대 낙폭 (%).
    pub fn max_drawdown(&self) -> Option<Decimal> {
        self.tracker.max_drawdown()
    }

    pub fn max_drawdown_at(&self) -> Option<DateTime<Utc>> {
        self.tracker.max_drawdown_at()
    }

    /// 누적 잔고(기준/보조 통화) 중 하나라도 포화되었는지.
    pub fn is_saturated(&self) -> bool {
        self.tracker.is_saturated() || self.secondary_saturated
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
