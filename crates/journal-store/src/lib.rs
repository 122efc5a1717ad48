//! 매매일지 저장소와 서비스.
//!
//! - [`TradeRepository`]: 저장소 추상화 (async)
//! - [`InMemoryTradeRepository`]: 메모리 구현
//! - [`JournalService`]: 평가 → 저장 → 분석 흐름

pub mod record;
pub mod repository;
pub mod service;

pub use record::{TradeQuery, TradeRecord};
pub use repository::{InMemoryTradeRepository, TradeRepository};
pub use service::JournalService;
