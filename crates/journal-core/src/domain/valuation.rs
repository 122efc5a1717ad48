//! 거래 평가 엔진.
//!
//! 원시 거래 입력을 검증하고 손익(기준/보조 통화, 백분율), 손익비,
//! 권장 포지션 크기를 계산합니다. 상태가 없는 순수 계산이므로
//! 같은 입력은 항상 같은 결과를 냅니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::calculations::{
    convert_to_secondary, notional_value, pnl_percent, pnl_quote, risk_reward_ratio,
    suggest_position_size,
};
use super::trade::{Direction, TradeInput, ValuedTrade};
use super::validation::{
    ensure_positive, ensure_positive_opt, is_bracket_valid, require, validate_bracket,
    TradeField, ValuationResult,
};
use crate::config::ValuationConfig;
use crate::types::{Lots, Percentage, Price};

/// 단위 환산 상수.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationParams {
    /// 랏당 계약 단위 (금 현물: 100 oz)
    pub contract_multiplier: Decimal,
    /// 기준 통화 → 보조 통화 환율
    pub quote_to_secondary_rate: Decimal,
    /// 포지션 크기 산정용 기준 계좌 잔고
    pub reference_balance: Decimal,
}

impl Default for ValuationParams {
    fn default() -> Self {
        Self {
            contract_multiplier: dec!(100),
            quote_to_secondary_rate: dec!(15500),
            reference_balance: dec!(10000),
        }
    }
}

impl From<&ValuationConfig> for ValuationParams {
    fn from(config: &ValuationConfig) -> Self {
        Self {
            contract_multiplier: config.contract_multiplier,
            quote_to_secondary_rate: config.quote_to_secondary_rate,
            reference_balance: config.reference_balance,
        }
    }
}

/// 검증을 통과한 수치 입력.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedInputs {
    pub direction: Direction,
    pub entry_price: Price,
    pub exit_price: Price,
    pub position_size: Lots,
    pub stop_loss: Option<Price>,
    pub take_profit: Option<Price>,
    pub risk_percent: Option<Percentage>,
}

/// 폼 입력 중 실시간 미리보기.
///
/// 입력이 일부만 있어도 계산 가능한 지표만 채웁니다. 실패하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePreview {
    /// 브래킷 유효 여부 (손절가/목표가 중 하나라도 없으면 `None`)
    pub bracket_valid: Option<bool>,
    pub risk_reward_ratio: Option<Decimal>,
    pub suggested_position_size: Option<Lots>,
    /// 입력된 크기가 없으면 권장 크기로 계산한 손익
    pub pnl_quote_currency: Option<Decimal>,
    pub pnl_secondary_currency: Option<Decimal>,
    pub pnl_percent: Option<Percentage>,
}

/// 거래 평가 엔진.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValuationEngine {
    params: ValuationParams,
}

impl ValuationEngine {
    /// 주어진 환산 상수로 엔진을 생성합니다.
    pub fn new(params: ValuationParams) -> Self {
        Self { params }
    }

    /// 설정에서 엔진을 생성합니다.
    pub fn from_config(config: &ValuationConfig) -> Self {
        Self::new(ValuationParams::from(config))
    }

    /// 환산 상수를 반환합니다.
    pub fn params(&self) -> &ValuationParams {
        &self.params
    }

    /// 입력만 검증합니다 (제출 차단용).
    ///
    /// 순서: 필수 입력 존재 → 양수 조건 → 브래킷.
    pub fn validate(&self, input: &TradeInput) -> ValuationResult<ValidatedInputs> {
        let entry_price = require(input.entry_price, TradeField::EntryPrice)?;
        let exit_price = require(input.exit_price, TradeField::ExitPrice)?;
        let position_size = require(input.position_size, TradeField::PositionSize)?;

        let entry_price = ensure_positive(entry_price, TradeField::EntryPrice)?;
        let exit_price = ensure_positive(exit_price, TradeField::ExitPrice)?;
        let position_size = ensure_positive(position_size, TradeField::PositionSize)?;
        let stop_loss = ensure_positive_opt(input.stop_loss, TradeField::StopLoss)?;
        let take_profit = ensure_positive_opt(input.take_profit, TradeField::TakeProfit)?;
        let risk_percent = ensure_positive_opt(input.risk_percent, TradeField::RiskPercent)?;

        if let (Some(stop_loss), Some(take_profit)) = (stop_loss, take_profit) {
            validate_bracket(input.direction, entry_price, stop_loss, take_profit)?;
        }

        Ok(ValidatedInputs {
            direction: input.direction,
            entry_price,
            exit_price,
            position_size,
            stop_loss,
            take_profit,
            risk_percent,
        })
    }

    /// 거래를 검증하고 파생 필드를 계산합니다.
    pub fn value_trade(&self, input: &TradeInput) -> ValuationResult<ValuedTrade> {
        let v = match self.validate(input) {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, kind = ?e.kind(), "Trade rejected by validation");
                return Err(e);
            }
        };
        let p = &self.params;

        let pnl = pnl_quote(
            v.direction,
            v.entry_price,
            v.exit_price,
            v.position_size,
            p.contract_multiplier,
        )?;
        let pnl_secondary = convert_to_secondary(pnl, p.quote_to_secondary_rate)?;
        let notional = notional_value(v.entry_price, v.position_size, p.contract_multiplier)?;
        let pct = pnl_percent(pnl, notional)?;

        let rr = match (v.stop_loss, v.take_profit) {
            (Some(sl), Some(tp)) => risk_reward_ratio(v.entry_price, sl, tp),
            _ => None,
        };
        let suggested = match (v.risk_percent, v.stop_loss) {
            (Some(risk), Some(sl)) => suggest_position_size(
                p.reference_balance,
                risk,
                v.entry_price,
                sl,
                p.contract_multiplier,
            ),
            _ => None,
        };

        debug!(
            direction = %v.direction,
            entry = %v.entry_price,
            exit = %v.exit_price,
            size = %v.position_size,
            pnl = %pnl,
            pnl_percent = %pct,
            "Trade valued"
        );

        Ok(ValuedTrade {
            direction: v.direction,
            entry_price: v.entry_price,
            exit_price: v.exit_price,
            position_size: v.position_size,
            stop_loss: v.stop_loss,
            take_profit: v.take_profit,
            risk_percent: v.risk_percent,
            occurred_at: input.occurred_at,
            emotion: input.emotion,
            notes: input.notes.clone(),
            pnl_quote_currency: pnl,
            pnl_secondary_currency: pnl_secondary,
            pnl_percent: pct,
            risk_reward_ratio: rr,
            suggested_position_size: suggested,
        })
    }

    /// 저장된 거래의 파생 필드를 다시 계산합니다.
    pub fn revalue(&self, trade: &ValuedTrade) -> ValuationResult<ValuedTrade> {
        self.value_trade(&trade.to_input())
    }

    /// 폼 입력 중 미리보기를 계산합니다.
    pub fn preview(&self, input: &TradeInput) -> TradePreview {
        let p = &self.params;
        let mut preview = TradePreview::default();

        let positive = |v: Option<Decimal>| v.filter(|d| *d > Decimal::ZERO);
        let entry = positive(input.entry_price);
        let stop = positive(input.stop_loss);
        let target = positive(input.take_profit);

        let Some(entry) = entry else {
            return preview;
        };

        if let (Some(sl), Some(tp)) = (stop, target) {
            preview.bracket_valid = Some(is_bracket_valid(input.direction, entry, sl, tp));
            preview.risk_reward_ratio = risk_reward_ratio(entry, sl, tp);
        }

        if let (Some(risk), Some(sl)) = (positive(input.risk_percent), stop) {
            preview.suggested_position_size =
                suggest_position_size(p.reference_balance, risk, entry, sl, p.contract_multiplier);
        }

        let size = positive(input.position_size).or(preview.suggested_position_size);
        if let (Some(exit), Some(size)) = (positive(input.exit_price), size) {
            let pnl = pnl_quote(input.direction, entry, exit, size, p.contract_multiplier).ok();
            preview.pnl_secondary_currency =
                pnl.and_then(|v| convert_to_secondary(v, p.quote_to_secondary_rate).ok());
            preview.pnl_percent = pnl.and_then(|v| {
                notional_value(entry, size, p.contract_multiplier)
                    .and_then(|n| pnl_percent(v, n))
                    .ok()
            });
            preview.pnl_quote_currency = pnl;
        }

        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::{ErrorKind, ValuationError};

    fn engine() -> ValuationEngine {
        ValuationEngine::default()
    }

    #[test]
    fn test_value_long_trade() {
        let input = TradeInput::new(Direction::Long, dec!(2050), dec!(2055), dec!(0.10));
        let valued = engine().value_trade(&input).unwrap();

        assert_eq!(valued.pnl_quote_currency, dec!(50));
        assert_eq!(valued.pnl_secondary_currency, dec!(775000));
        // 50 / 20500 × 100
        assert_eq!(valued.pnl_percent, dec!(50) / dec!(20500) * dec!(100));
        assert_eq!(valued.risk_reward_ratio, None);
        assert_eq!(valued.suggested_position_size, None);
        assert!(valued.is_win());
    }

    #[test]
    fn test_value_short_trade() {
        let input = TradeInput::new(Direction::Short, dec!(2050), dec!(2060), dec!(0.2));
        let valued = engine().value_trade(&input).unwrap();
        assert_eq!(valued.pnl_quote_currency, dec!(-200));
        assert!(valued.is_loss());
    }

    #[test]
    fn test_risk_reward_and_sizing() {
        let input = TradeInput::new(Direction::Long, dec!(2050), dec!(2058), dec!(0.4))
            .with_stop_loss(dec!(2045))
            .with_take_profit(dec!(2060))
            .with_risk_percent(dec!(2));
        let valued = engine().value_trade(&input).unwrap();

        assert_eq!(valued.risk_reward_ratio, Some(dec!(2)));
        assert_eq!(valued.suggested_position_size, Some(dec!(0.4)));
    }

    #[test]
    fn test_sizing_without_target() {
        let input = TradeInput::new(Direction::Short, dec!(2050), dec!(2040), dec!(1))
            .with_stop_loss(dec!(2060))
            .with_risk_percent(dec!(1));
        let valued = engine().value_trade(&input).unwrap();

        // 10000 × 1% = 100 / (10 × 100)
        assert_eq!(valued.suggested_position_size, Some(dec!(0.1)));
        assert_eq!(valued.risk_reward_ratio, None);
    }

    #[test]
    fn test_degenerate_stop_leaves_sizing_undefined() {
        // 목표가가 없으면 브래킷 검증이 없으므로 손절가 = 진입가도 통과
        let input = TradeInput::new(Direction::Long, dec!(2050), dec!(2055), dec!(0.1))
            .with_stop_loss(dec!(2050))
            .with_risk_percent(dec!(2));
        let valued = engine().value_trade(&input).unwrap();
        assert_eq!(valued.suggested_position_size, None);
    }

    #[test]
    fn test_missing_fields_in_order() {
        let err = engine().value_trade(&TradeInput::empty(Direction::Long)).unwrap_err();
        assert_eq!(err, ValuationError::MissingField { field: TradeField::EntryPrice });

        let input = TradeInput::empty(Direction::Long)
            .with_entry_price(dec!(2050))
            .with_exit_price(dec!(2055));
        let err = engine().value_trade(&input).unwrap_err();
        assert_eq!(err.field(), Some(TradeField::PositionSize));
    }

    #[test]
    fn test_negative_price_rejected() {
        let input = TradeInput::new(Direction::Long, dec!(-2050), dec!(2055), dec!(0.1));
        let err = engine().value_trade(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert!(matches!(err, ValuationError::NonPositive { field: TradeField::EntryPrice, .. }));

        let input = TradeInput::new(Direction::Long, dec!(2050), dec!(2055), dec!(0.1))
            .with_stop_loss(dec!(-1));
        assert!(engine().value_trade(&input).is_err());
    }

    #[test]
    fn test_bracket_invalid() {
        let valid = TradeInput::new(Direction::Long, dec!(2050), dec!(2055), dec!(0.1))
            .with_stop_loss(dec!(2045))
            .with_take_profit(dec!(2055));
        assert!(engine().validate(&valid).is_ok());

        let invalid = valid.clone().with_stop_loss(dec!(2051));
        let err = engine().validate(&invalid).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BracketInvalid);
    }

    #[test]
    fn test_custom_params() {
        let engine = ValuationEngine::new(ValuationParams {
            contract_multiplier: dec!(1),
            quote_to_secondary_rate: dec!(2),
            reference_balance: dec!(1000),
        });
        let input = TradeInput::new(Direction::Long, dec!(10), dec!(12), dec!(3));
        let valued = engine.value_trade(&input).unwrap();
        assert_eq!(valued.pnl_quote_currency, dec!(6));
        assert_eq!(valued.pnl_secondary_currency, dec!(12));
    }

    #[test]
    fn test_revalue_is_idempotent() {
        let input = TradeInput::new(Direction::Short, dec!(2050.25), dec!(2031.75), dec!(0.37))
            .with_stop_loss(dec!(2061))
            .with_take_profit(dec!(2020))
            .with_notes("london open fade");
        let first = engine().value_trade(&input).unwrap();
        let second = engine().revalue(&first).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_preview_partial_inputs() {
        let input = TradeInput::empty(Direction::Long)
            .with_entry_price(dec!(2050))
            .with_stop_loss(dec!(2045))
            .with_take_profit(dec!(2060))
            .with_risk_percent(dec!(2));
        let preview = engine().preview(&input);

        assert_eq!(preview.bracket_valid, Some(true));
        assert_eq!(preview.risk_reward_ratio, Some(dec!(2)));
        assert_eq!(preview.suggested_position_size, Some(dec!(0.4)));
        assert_eq!(preview.pnl_quote_currency, None);

        // 청산가 입력 시 권장 크기로 손익 계산
        let preview = engine().preview(&input.with_exit_price(dec!(2060)));
        assert_eq!(preview.pnl_quote_currency, Some(dec!(400)));
        assert_eq!(preview.pnl_secondary_currency, Some(dec!(6200000)));
    }

    #[test]
    fn test_preview_invalid_bracket() {
        let input = TradeInput::empty(Direction::Short)
            .with_entry_price(dec!(2050))
            .with_stop_loss(dec!(2045))
            .with_take_profit(dec!(2060));
        let preview = engine().preview(&input);
        assert_eq!(preview.bracket_valid, Some(false));

        assert_eq!(engine().preview(&TradeInput::empty(Direction::Long)), TradePreview::default());
    }
}
