//! 성과 분석 모듈
//!
//! - [`summary`]: 거래 목록 전체에 대한 성과 스냅샷 (승률, 총손익, 최대 낙폭, 기간별 손익)

pub mod summary;

pub use summary::*;
