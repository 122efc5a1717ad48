//! 포트폴리오 분석 모듈
//!
//! # 모듈 구성
//!
//! - [`equity_curve`]: 거래별 누적 손익 곡선과 고점 대비 낙폭
//! - [`periods`]: 주별/월별 손익 버킷
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use journal_analytics::portfolio::EquityCurve;
//! use rust_decimal_macros::dec;
//!
//! let mut curve = EquityCurve::new();
//! curve.add_trade(timestamp1, dec!(50), dec!(775_000));
//! curve.add_trade(timestamp2, dec!(-20), dec!(-310_000));
//!
//! println!("최대 낙폭: {}%", curve.max_drawdown());
//! ```

pub mod equity_curve;
pub mod periods;

pub use equity_curve::*;
pub use periods::*;
