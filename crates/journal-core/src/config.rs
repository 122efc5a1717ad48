//! 설정 관리.
//!
//! 이 모듈은 매매일지 설정을 정의하고 관리합니다. 환산 상수는 평가 로직의
//! 속성이 아니므로 모두 설정으로 주입합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{JournalError, JournalResult};

/// 매매일지 설정.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct JournalConfig {
    /// 평가 엔진 설정
    pub valuation: ValuationConfig,
    /// 분석 설정
    pub analytics: AnalyticsConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 평가 엔진 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// 랏당 계약 단위
    pub contract_multiplier: Decimal,
    /// 기준 통화 → 보조 통화 환율
    pub quote_to_secondary_rate: Decimal,
    /// 포지션 크기 산정용 기준 계좌 잔고
    pub reference_balance: Decimal,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            contract_multiplier: dec!(100),
            quote_to_secondary_rate: dec!(15500),
            reference_balance: dec!(10000),
        }
    }
}

/// 주의 시작 요일.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

/// 분석 설정.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// 주별 집계의 시작 요일
    pub week_start: WeekStart,
    /// 기간 집계에 사용할 UTC 오프셋 (분)
    pub utc_offset_minutes: i32,
}

/// 로깅 설정.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

impl JournalConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 우선순위: 기본값 < 파일 < 환경 변수 (`JOURNAL__VALUATION__CONTRACT_MULTIPLIER` 등).
    pub fn load<P: AsRef<Path>>(path: P) -> JournalResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(Self::env_source());

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 환경 변수에서만 설정을 로드합니다 (나머지는 기본값).
    pub fn from_env() -> JournalResult<Self> {
        let config: Self = config::Config::builder()
            .add_source(Self::env_source())
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn env_source() -> config::Environment {
        config::Environment::with_prefix("JOURNAL")
            .separator("__")
            .try_parsing(true)
    }

    /// 설정 값을 검증합니다.
    pub fn validate(&self) -> JournalResult<()> {
        let v = &self.valuation;
        if v.contract_multiplier <= Decimal::ZERO {
            return Err(JournalError::Config(format!(
                "contract_multiplier must be positive: {}",
                v.contract_multiplier
            )));
        }
        if v.quote_to_secondary_rate <= Decimal::ZERO {
            return Err(JournalError::Config(format!(
                "quote_to_secondary_rate must be positive: {}",
                v.quote_to_secondary_rate
            )));
        }
        if v.reference_balance <= Decimal::ZERO {
            return Err(JournalError::Config(format!(
                "reference_balance must be positive: {}",
                v.reference_balance
            )));
        }
        if self.analytics.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(JournalError::Config(format!(
                "utc_offset_minutes out of range: {}",
                self.analytics.utc_offset_minutes
            )));
        }
        Ok(())
    }
}
