//! 매매일지 시스템의 에러 타입.
//!
//! 평가 엔진 자체의 에러는 [`ValuationError`](crate::ValuationError)이며,
//! 이 모듈은 저장소/설정까지 포함한 상위 에러를 정의합니다.

use thiserror::Error;

use crate::domain::ValuationError;

/// 매매일지 에러.
#[derive(Debug, Error)]
pub enum JournalError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 거래 입력 검증 실패
    #[error("검증 에러: {0}")]
    Validation(#[from] ValuationError),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 다른 사용자의 기록에 접근
    #[error("권한 없음: {0}")]
    Forbidden(String),

    /// 저장소 에러
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 매매일지 작업을 위한 Result 타입.
pub type JournalResult<T> = Result<T, JournalError>;

impl JournalError {
    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, JournalError::Storage(_))
    }

    /// 사용자 입력으로 고칠 수 있는 에러인지 확인합니다.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            JournalError::Validation(_) | JournalError::NotFound(_) | JournalError::Forbidden(_)
        )
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        JournalError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for JournalError {
    fn from(err: config::ConfigError) -> Self {
        JournalError::Config(err.to_string())
    }
}
