//! 거래 손익 및 리스크 계산 공통 로직.
//!
//! 평가 엔진과 폼 미리보기에서 공유하는 순수 계산 함수를 제공합니다.
//! 모든 곱셈/나눗셈은 checked 연산이며, 범위를 벗어나면 `Overflow`를 반환합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::trade::Direction;
use super::validation::{ValuationError, ValuationResult};
use crate::types::{Lots, Percentage, Price};

fn checked(value: Option<Decimal>) -> ValuationResult<Decimal> {
    value.ok_or(ValuationError::Overflow)
}

/// 방향을 반영한 가격 변화.
///
/// - 롱: `exit - entry`
/// - 숏: `entry - exit`
pub fn price_delta(direction: Direction, entry_price: Price, exit_price: Price) -> ValuationResult<Decimal> {
    match direction {
        Direction::Long => checked(exit_price.checked_sub(entry_price)),
        Direction::Short => checked(entry_price.checked_sub(exit_price)),
    }
}

/// 기준 통화 손익.
///
/// `price_delta × position_size × contract_multiplier`
///
/// # Examples
///
/// ```
/// use journal_core::{pnl_quote, Direction};
/// use rust_decimal_macros::dec;
///
/// // 2050 롱 → 2055 청산, 0.10 랏, 계약 단위 100
/// let pnl = pnl_quote(Direction::Long, dec!(2050), dec!(2055), dec!(0.10), dec!(100)).unwrap();
/// assert_eq!(pnl, dec!(50));
/// ```
pub fn pnl_quote(
    direction: Direction,
    entry_price: Price,
    exit_price: Price,
    position_size: Lots,
    contract_multiplier: Decimal,
) -> ValuationResult<Decimal> {
    let delta = price_delta(direction, entry_price, exit_price)?;
    let units = checked(position_size.checked_mul(contract_multiplier))?;
    checked(delta.checked_mul(units))
}

/// 기준 통화 금액을 보조 통화로 환산합니다.
pub fn convert_to_secondary(amount: Decimal, quote_to_secondary_rate: Decimal) -> ValuationResult<Decimal> {
    checked(amount.checked_mul(quote_to_secondary_rate))
}

/// 명목 가치 (`entry_price × position_size × contract_multiplier`).
pub fn notional_value(
    entry_price: Price,
    position_size: Lots,
    contract_multiplier: Decimal,
) -> ValuationResult<Decimal> {
    let units = checked(position_size.checked_mul(contract_multiplier))?;
    checked(entry_price.checked_mul(units))
}

/// 명목 가치 대비 손익률 (백분율).
///
/// 명목 가치가 0이면 0을 반환합니다.
pub fn pnl_percent(pnl: Decimal, notional: Decimal) -> ValuationResult<Percentage> {
    if notional.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let ratio = checked(pnl.checked_div(notional))?;
    checked(ratio.checked_mul(dec!(100)))
}

/// 리스크 거리 `|entry - stop|`.
pub fn risk_distance(entry_price: Price, stop_loss: Price) -> ValuationResult<Decimal> {
    checked(entry_price.checked_sub(stop_loss)).map(|d| d.abs())
}

/// 보상 거리 `|target - entry|`.
pub fn reward_distance(entry_price: Price, take_profit: Price) -> ValuationResult<Decimal> {
    checked(take_profit.checked_sub(entry_price)).map(|d| d.abs())
}

/// 손익비 계산.
///
/// 리스크 거리가 0이면 `DegenerateRisk`를 반환합니다.
pub fn try_risk_reward_ratio(
    entry_price: Price,
    stop_loss: Price,
    take_profit: Price,
) -> ValuationResult<Decimal> {
    let risk = risk_distance(entry_price, stop_loss)?;
    if risk.is_zero() {
        return Err(ValuationError::DegenerateRisk);
    }
    let reward = reward_distance(entry_price, take_profit)?;
    checked(reward.checked_div(risk))
}

/// 손익비 (정의되지 않으면 `None`).
pub fn risk_reward_ratio(entry_price: Price, stop_loss: Price, take_profit: Price) -> Option<Decimal> {
    try_risk_reward_ratio(entry_price, stop_loss, take_profit).ok()
}

/// 리스크 예산 기준 권장 포지션 크기.
///
/// ```text
/// risk_budget = reference_balance × risk_percent / 100
/// size        = risk_budget / (|entry - stop| × contract_multiplier)
/// ```
///
/// 리스크 거리가 0이면 `DegenerateRisk`를 반환합니다.
pub fn try_suggest_position_size(
    reference_balance: Decimal,
    risk_percent: Percentage,
    entry_price: Price,
    stop_loss: Price,
    contract_multiplier: Decimal,
) -> ValuationResult<Lots> {
    let risk = risk_distance(entry_price, stop_loss)?;
    if risk.is_zero() {
        return Err(ValuationError::DegenerateRisk);
    }
    let budget = checked(reference_balance.checked_mul(risk_percent))?;
    let budget = checked(budget.checked_div(dec!(100)))?;
    let risk_per_lot = checked(risk.checked_mul(contract_multiplier))?;
    checked(budget.checked_div(risk_per_lot))
}

/// 권장 포지션 크기 (정의되지 않으면 `None`).
pub fn suggest_position_size(
    reference_balance: Decimal,
    risk_percent: Percentage,
    entry_price: Price,
    stop_loss: Price,
    contract_multiplier: Decimal,
) -> Option<Lots> {
    try_suggest_position_size(
        reference_balance,
        risk_percent,
        entry_price,
        stop_loss,
        contract_multiplier,
    )
    .ok()
}
