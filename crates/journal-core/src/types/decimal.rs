//! 정밀한 금융 계산을 위한 Decimal 유틸리티.
//!
//! 가격, 랏 수량, 손익은 모두 `Decimal`로 다룹니다. 반올림은 화면 표시
//! 직전에만 수행하며, 계산 경로에서는 절대 반올림하지 않습니다.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// 호가 가격 타입 (기준 통화 단위).
pub type Price = Decimal;

/// 포지션 크기 타입 (계약 랏 단위).
pub type Lots = Decimal;

/// 퍼센트 타입 (5.25 = 5.25%).
pub type Percentage = Decimal;

/// `f64` 입력을 `Decimal`로 변환합니다.
///
/// NaN, 무한대처럼 유한하지 않은 값은 `None`을 반환합니다.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).map(|d| d.normalize())
}

/// Decimal 확장 트레이트.
pub trait DecimalExt {
    /// 퍼센트 문자열로 변환합니다 (예: `dec!(5.254)` → "5.25%").
    fn to_percent_string(&self) -> String;

    /// 표시용으로 반올림합니다 (0.5는 0에서 먼 쪽으로).
    fn round_display(&self, dp: u32) -> Decimal;

    /// 누적 합산. 표현 범위를 넘으면 `Decimal::MAX`/`MIN`에서 멈추고 `false`를 반환합니다.
    fn accumulate(&mut self, value: Decimal) -> bool;
}

impl DecimalExt for Decimal {
    fn to_percent_string(&self) -> String {
        format!("{:.2}%", self.round_display(2))
    }

    fn round_display(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    }

    fn accumulate(&mut self, value: Decimal) -> bool {
        match self.checked_add(value) {
            Some(sum) => {
                *self = sum;
                true
            }
            None => {
                *self = self.saturating_add(value);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_string() {
        assert_eq!(dec!(5.254).to_percent_string(), "5.25%");
        assert_eq!(dec!(66.665).to_percent_string(), "66.67%");
    }

    #[test]
    fn test_accumulate_saturates() {
        let mut total = dec!(10);
        assert!(total.accumulate(dec!(-2.5)));
        assert_eq!(total, dec!(7.5));

        let mut total = Decimal::MAX;
        assert!(!total.accumulate(dec!(1)));
        assert_eq!(total, Decimal::MAX);

        let mut total = Decimal::MIN;
        assert!(!total.accumulate(dec!(-1)));
        assert_eq!(total, Decimal::MIN);
    }

    #[test]
    fn test_decimal_from_f64() {
        assert_eq!(decimal_from_f64(2050.5), Some(dec!(2050.5)));
        assert_eq!(decimal_from_f64(0.1), Some(dec!(0.1)));
        assert_eq!(decimal_from_f64(f64::NAN), None);
        assert_eq!(decimal_from_f64(f64::INFINITY), None);
        assert_eq!(decimal_from_f64(f64::NEG_INFINITY), None);
    }
}
