//! 거래 입력 검증.
//!
//! 기록된 거래가 내부적으로 일관되도록 보장하는 규칙을 정의합니다:
//! - 필수 수치 입력(진입가, 청산가, 포지션 크기)의 존재 여부
//! - 가격/크기의 양수 조건
//! - 손절가/목표가가 방향에 맞게 진입가를 감싸는지 (브래킷)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::trade::Direction;
use crate::types::Price;

/// 검증 대상 입력 필드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TradeField {
    Direction,
    EntryPrice,
    ExitPrice,
    PositionSize,
    StopLoss,
    TakeProfit,
    RiskPercent,
    Emotion,
}

impl TradeField {
    /// 표시 계층에서 사용하는 안정적인 필드 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeField::Direction => "direction",
            TradeField::EntryPrice => "entryPrice",
            TradeField::ExitPrice => "exitPrice",
            TradeField::PositionSize => "positionSize",
            TradeField::StopLoss => "stopLoss",
            TradeField::TakeProfit => "takeProfit",
            TradeField::RiskPercent => "riskPercent",
            TradeField::Emotion => "emotion",
        }
    }
}

impl std::fmt::Display for TradeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 에러 분류 (표시 계층이 메시지로 변환할 때 사용하는 판별값).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    MissingField,
    BracketInvalid,
    DegenerateRisk,
    Overflow,
}

/// 거래 평가 에러.
///
/// 모두 호출자에게 값으로 반환되는 복구 가능한 조건입니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    /// 필수 수치 입력이 없거나 숫자가 아님
    #[error("필수 입력 누락: {field}")]
    MissingField { field: TradeField },

    /// 가격/크기가 0 이하
    #[error("양수여야 하는 입력: {field} = {value}")]
    NonPositive { field: TradeField, value: Decimal },

    /// 손절가/목표가가 방향에 맞게 진입가를 감싸지 않음
    #[error(
        "잘못된 브래킷 ({direction}): 손절 {stop_loss}, 진입 {entry_price}, 목표 {take_profit}"
    )]
    BracketInvalid {
        direction: Direction,
        entry_price: Price,
        stop_loss: Price,
        take_profit: Price,
    },

    /// 리스크 거리(|진입가 - 손절가|)가 0
    #[error("리스크 거리가 0입니다")]
    DegenerateRisk,

    /// Decimal 범위를 벗어난 계산
    #[error("수치 범위 초과")]
    Overflow,
}

impl ValuationError {
    /// 에러 분류를 반환합니다.
    ///
    /// `NonPositive`는 "유효한 양수 입력 없음"으로 취급되어 `MissingField`로 분류됩니다.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValuationError::MissingField { .. } | ValuationError::NonPositive { .. } => {
                ErrorKind::MissingField
            }
            ValuationError::BracketInvalid { .. } => ErrorKind::BracketInvalid,
            ValuationError::DegenerateRisk => ErrorKind::DegenerateRisk,
            ValuationError::Overflow => ErrorKind::Overflow,
        }
    }

    /// 문제가 된 입력 필드 (해당하는 경우).
    pub fn field(&self) -> Option<TradeField> {
        match self {
            ValuationError::MissingField { field } | ValuationError::NonPositive { field, .. } => {
                Some(*field)
            }
            _ => None,
        }
    }
}

/// 평가 작업을 위한 Result 타입.
pub type ValuationResult<T> = Result<T, ValuationError>;

/// 필수 입력을 꺼냅니다.
pub fn require(value: Option<Decimal>, field: TradeField) -> ValuationResult<Decimal> {
    value.ok_or(ValuationError::MissingField { field })
}

/// 값이 0보다 큰지 확인합니다.
pub fn ensure_positive(value: Decimal, field: TradeField) -> ValuationResult<Decimal> {
    if value > Decimal::ZERO {
        Ok(value)
    } else {
        Err(ValuationError::NonPositive { field, value })
    }
}

/// 선택 입력이 있으면 양수인지 확인합니다.
pub fn ensure_positive_opt(
    value: Option<Decimal>,
    field: TradeField,
) -> ValuationResult<Option<Decimal>> {
    value.map(|v| ensure_positive(v, field)).transpose()
}

/// 손절가와 목표가가 방향에 맞게 진입가를 감싸는지 확인합니다.
///
/// - 롱: `stop_loss < entry_price < take_profit`
/// - 숏: `take_profit < entry_price < stop_loss`
///
/// 허용 오차 없이 엄격한 부등호로 비교합니다.
pub fn is_bracket_valid(
    direction: Direction,
    entry_price: Price,
    stop_loss: Price,
    take_profit: Price,
) -> bool {
    match direction {
        Direction::Long => stop_loss < entry_price && entry_price < take_profit,
        Direction::Short => take_profit < entry_price && entry_price < stop_loss,
    }
}

/// 브래킷 검증 (실패 시 `BracketInvalid`).
pub fn validate_bracket(
    direction: Direction,
    entry_price: Price,
    stop_loss: Price,
    take_profit: Price,
) -> ValuationResult<()> {
    if is_bracket_valid(direction, entry_price, stop_loss, take_profit) {
        Ok(())
    } else {
        Err(ValuationError::BracketInvalid {
            direction,
            entry_price,
            stop_loss,
            take_profit,
        })
    }
}
