//! 매매일지 거래 기록.
//!
//! 이 모듈은 거래 입력과 평가 결과 타입을 정의합니다:
//! - `Direction` - 포지션 방향 (롱/숏)
//! - `Emotion` - 진입 시 심리 상태 태그
//! - `TradeInput` - 평가 전 원시 입력
//! - `TradeForm` - 문자열 폼 입력
//! - `ValuedTrade` - 검증 및 평가가 끝난 거래

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::validation::{TradeField, ValuationError, ValuationResult};
use crate::types::{decimal_from_f64, Lots, Percentage, Price};

/// 포지션 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// 롱 - 가격 상승 시 수익
    Long,
    /// 숏 - 가격 하락 시 수익
    Short,
}

impl Direction {
    /// 반대 방향을 반환합니다.
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

impl FromStr for Direction {
    type Err = ValuationError;

    /// `long`/`short`와 폼에서 쓰는 `buy`/`sell`을 모두 받습니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" | "buy" => Ok(Direction::Long),
            "short" | "sell" => Ok(Direction::Short),
            _ => Err(ValuationError::MissingField {
                field: TradeField::Direction,
            }),
        }
    }
}

/// 진입 시 트레이더의 심리 상태.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    #[default]
    Calm,
    Emotional,
    Overconfident,
    Fearful,
    Greedy,
    Disciplined,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Calm => "calm",
            Emotion::Emotional => "emotional",
            Emotion::Overconfident => "overconfident",
            Emotion::Fearful => "fearful",
            Emotion::Greedy => "greedy",
            Emotion::Disciplined => "disciplined",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calm" => Ok(Emotion::Calm),
            "emotional" => Ok(Emotion::Emotional),
            "overconfident" => Ok(Emotion::Overconfident),
            "fearful" => Ok(Emotion::Fearful),
            "greedy" => Ok(Emotion::Greedy),
            "disciplined" => Ok(Emotion::Disciplined),
            _ => Err(format!("Unknown emotion: {}", s)),
        }
    }
}

/// 평가 전 원시 거래 입력.
///
/// 필수 수치 입력도 `Option`으로 받습니다. 누락은 평가 시점에
/// `MissingField` 에러로 보고됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeInput {
    /// 포지션 방향
    pub direction: Direction,
    /// 진입가
    pub entry_price: Option<Price>,
    /// 청산가
    pub exit_price: Option<Price>,
    /// 포지션 크기 (랏)
    pub position_size: Option<Lots>,
    /// 손절가
    #[serde(default)]
    pub stop_loss: Option<Price>,
    /// 목표가
    #[serde(default)]
    pub take_profit: Option<Price>,
    /// 계좌 대비 리스크 비율 (%)
    #[serde(default)]
    pub risk_percent: Option<Percentage>,
    /// 거래 발생 시각 (정렬/기간 집계 전용)
    pub occurred_at: DateTime<Utc>,
    /// 심리 상태
    #[serde(default)]
    pub emotion: Emotion,
    /// 메모
    #[serde(default)]
    pub notes: Option<String>,
}

impl TradeInput {
    /// 필수 입력으로 새 거래 입력을 생성합니다.
    pub fn new(
        direction: Direction,
        entry_price: Price,
        exit_price: Price,
        position_size: Lots,
    ) -> Self {
        Self {
            direction,
            entry_price: Some(entry_price),
            exit_price: Some(exit_price),
            position_size: Some(position_size),
            stop_loss: None,
            take_profit: None,
            risk_percent: None,
            occurred_at: Utc::now(),
            emotion: Emotion::default(),
            notes: None,
        }
    }

    /// 수치 입력이 전혀 없는 빈 입력을 생성합니다 (폼 초기 상태).
    pub fn empty(direction: Direction) -> Self {
        Self {
            direction,
            entry_price: None,
            exit_price: None,
            position_size: None,
            stop_loss: None,
            take_profit: None,
            risk_percent: None,
            occurred_at: Utc::now(),
            emotion: Emotion::default(),
            notes: None,
        }
    }

    /// `f64` 값으로 입력을 생성합니다.
    ///
    /// NaN, 무한대 값은 해당 필드 누락으로 취급합니다.
    pub fn from_f64(direction: Direction, entry_price: f64, exit_price: f64, position_size: f64) -> Self {
        Self {
            entry_price: decimal_from_f64(entry_price),
            exit_price: decimal_from_f64(exit_price),
            position_size: decimal_from_f64(position_size),
            ..Self::empty(direction)
        }
    }

    /// 진입가를 설정합니다.
    pub fn with_entry_price(mut self, entry_price: Price) -> Self {
        self.entry_price = Some(entry_price);
        self
    }

    /// 청산가를 설정합니다.
    pub fn with_exit_price(mut self, exit_price: Price) -> Self {
        self.exit_price = Some(exit_price);
        self
    }

    /// 포지션 크기를 설정합니다.
    pub fn with_position_size(mut self, position_size: Lots) -> Self {
        self.position_size = Some(position_size);
        self
    }

    /// 손절가를 설정합니다.
    pub fn with_stop_loss(mut self, stop_loss: Price) -> Self {
        self.stop_loss = Some(stop_loss);
        self
    }

    /// 목표가를 설정합니다.
    pub fn with_take_profit(mut self, take_profit: Price) -> Self {
        self.take_profit = Some(take_profit);
        self
    }

    /// 리스크 비율(%)을 설정합니다.
    pub fn with_risk_percent(mut self, risk_percent: Percentage) -> Self {
        self.risk_percent = Some(risk_percent);
        self
    }

    /// 발생 시각을 설정합니다.
    pub fn with_occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = occurred_at;
        self
    }

    /// 심리 상태를 설정합니다.
    pub fn with_emotion(mut self, emotion: Emotion) -> Self {
        self.emotion = emotion;
        self
    }

    /// 메모를 설정합니다.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// 사용자가 입력한 그대로의 문자열 폼.
///
/// 빈 문자열은 입력 없음, 숫자가 아닌 문자열은 해당 필드의 `MissingField`입니다.
/// 심리 상태도 같은 규칙이며, 비어 있으면 기본값(`Calm`)입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeForm {
    pub direction: String,
    pub entry_price: String,
    pub exit_price: String,
    pub position_size: String,
    pub stop_loss: String,
    pub take_profit: String,
    pub risk_percent: String,
    pub emotion: String,
    pub notes: String,
}

impl TradeForm {
    /// 폼을 `TradeInput`으로 변환합니다.
    pub fn parse(&self, occurred_at: DateTime<Utc>) -> ValuationResult<TradeInput> {
        let direction: Direction = self.direction.parse()?;
        let emotion = match self.emotion.trim() {
            "" => Emotion::default(),
            raw => raw
                .parse()
                .map_err(|_| ValuationError::MissingField { field: TradeField::Emotion })?,
        };
        let notes = Some(self.notes.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(TradeInput {
            direction,
            entry_price: parse_decimal_field(&self.entry_price, TradeField::EntryPrice)?,
            exit_price: parse_decimal_field(&self.exit_price, TradeField::ExitPrice)?,
            position_size: parse_decimal_field(&self.position_size, TradeField::PositionSize)?,
            stop_loss: parse_decimal_field(&self.stop_loss, TradeField::StopLoss)?,
            take_profit: parse_decimal_field(&self.take_profit, TradeField::TakeProfit)?,
            risk_percent: parse_decimal_field(&self.risk_percent, TradeField::RiskPercent)?,
            occurred_at,
            emotion,
            notes,
        })
    }
}

fn parse_decimal_field(raw: &str, field: TradeField) -> ValuationResult<Option<Decimal>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(raw)
        .map(Some)
        .map_err(|_| ValuationError::MissingField { field })
}

/// 검증과 평가가 끝난 거래.
///
/// 입력 필드와 평가 엔진이 계산한 파생 필드를 함께 담습니다.
/// 파생 지표의 `None`은 "정의되지 않음"을 뜻하며 JSON에서는 `null`로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuedTrade {
    pub direction: Direction,
    pub entry_price: Price,
    pub exit_price: Price,
    pub position_size: Lots,
    pub stop_loss: Option<Price>,
    pub take_profit: Option<Price>,
    pub risk_percent: Option<Percentage>,
    pub occurred_at: DateTime<Utc>,
    pub emotion: Emotion,
    pub notes: Option<String>,

    /// 기준 통화 손익
    pub pnl_quote_currency: Decimal,
    /// 보조 통화 손익
    pub pnl_secondary_currency: Decimal,
    /// 명목 가치 대비 손익률 (%)
    pub pnl_percent: Percentage,
    /// 손익비 (보상 거리 / 리스크 거리)
    pub risk_reward_ratio: Option<Decimal>,
    /// 리스크 예산 기준 권장 포지션 크기 (참고용)
    pub suggested_position_size: Option<Lots>,
}

impl ValuedTrade {
    /// 수익 거래 여부.
    pub fn is_win(&self) -> bool {
        self.pnl_quote_currency > Decimal::ZERO
    }

    /// 손실 거래 여부.
    pub fn is_loss(&self) -> bool {
        self.pnl_quote_currency < Decimal::ZERO
    }

    /// 재평가를 위해 원시 입력으로 되돌립니다.
    pub fn to_input(&self) -> TradeInput {
        TradeInput {
            direction: self.direction,
            entry_price: Some(self.entry_price),
            exit_price: Some(self.exit_price),
            position_size: Some(self.position_size),
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            risk_percent: self.risk_percent,
            occurred_at: self.occurred_at,
            emotion: self.emotion,
            notes: self.notes.clone(),
        }
    }
}
