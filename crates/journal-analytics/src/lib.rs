//! 매매일지 성과 분석.
//!
//! 평가가 끝난 거래 목록을 받아 집계 지표를 계산합니다:
//! - 총 거래 수, 총손익(기준/보조 통화, 백분율 합계), 승률
//! - 평균 절대 손익률
//! - 누적 잔고 기준 최대 낙폭
//! - 주별/월별 손익, 자산 곡선
//!
//! 모든 계산은 입력을 변경하지 않는 순수 함수이며, 호출할 때마다 새로 계산됩니다.

pub mod entry;
pub mod performance;
pub mod portfolio;

pub use entry::JournalEntry;
pub use performance::summary::{summarize, Analytics, AnalyticsSnapshot, EmotionProfit};
pub use portfolio::equity_curve::{drawdown_pct, DrawdownTracker, EquityCurve, EquityPoint};
pub use portfolio::periods::{Period, PeriodAccumulator, PeriodBucketer, PeriodProfit};
