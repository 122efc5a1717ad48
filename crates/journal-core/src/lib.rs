//! # Journal Core
//!
//! 금 현물(XAU/USD) 매매일지의 핵심 도메인 모델과 거래 평가 엔진을 제공합니다.
//!
//! - 거래 입력/평가 결과 타입
//! - 평가 엔진: 손익(기준/보조 통화, 백분율), 손익비, 권장 포지션 크기
//! - 입력 검증 (필수 입력, 양수 조건, 손절/목표 브래킷)
//! - 설정 관리
//! - 로깅 인프라
//!
//! 평가 엔진은 I/O를 하지 않는 순수 함수이며, 여러 스레드에서 동시에 호출해도 안전합니다.

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
