//! 매매일지 저장소.
//!
//! 저장소는 평가가 끝난 레코드를 그대로 보관하며 손익을 다시 계산하지 않습니다.
//! 소유권 검사는 [`JournalService`](crate::JournalService)의 책임입니다.

use std::collections::HashMap;

use async_trait::async_trait;
use journal_core::{JournalError, JournalResult};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::record::{TradeQuery, TradeRecord};

/// 매매일지 저장소 trait.
///
/// # 구현 예시
///
/// ```ignore
/// pub struct PgTradeRepository {
///     pool: PgPool,
/// }
///
/// #[async_trait]
/// impl TradeRepository for PgTradeRepository {
///     async fn create(&self, record: TradeRecord) -> JournalResult<TradeRecord> {
///         // INSERT ... RETURNING *
///     }
///
///     // ... 나머지 메서드 구현
/// }
/// ```
#[async_trait]
pub trait TradeRepository: Send + Sync {
    /// 레코드를 저장합니다. 같은 ID가 이미 있으면 `Storage` 에러입니다.
    async fn create(&self, record: TradeRecord) -> JournalResult<TradeRecord>;

    /// ID로 레코드를 조회합니다.
    async fn get(&self, id: Uuid) -> JournalResult<Option<TradeRecord>>;

    /// 기존 레코드를 교체합니다. 없으면 `NotFound` 에러입니다.
    async fn update(&self, record: TradeRecord) -> JournalResult<TradeRecord>;

    /// 레코드를 삭제합니다. 삭제 여부를 반환합니다.
    async fn delete(&self, id: Uuid) -> JournalResult<bool>;

    /// 소유자의 레코드를 발생 시각 오름차순으로 조회합니다.
    ///
    /// 발생 시각이 같으면 생성 시각, 그것도 같으면 저장된 순서입니다.
    async fn list_by_owner(&self, owner_id: Uuid, query: &TradeQuery) -> JournalResult<Vec<TradeRecord>>;
}

/// 메모리 기반 저장소.
#[derive(Debug, Default)]
pub struct InMemoryTradeRepository {
    state: RwLock<StoreState>,
}

#[derive(Debug, Default)]
struct StoreState {
    /// 레코드와 저장 순번
    records: HashMap<Uuid, (u64, TradeRecord)>,
    next_seq: u64,
}

impl InMemoryTradeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.records.is_empty()
    }
}

#[async_trait]
impl TradeRepository for InMemoryTradeRepository {
    async fn create(&self, record: TradeRecord) -> JournalResult<TradeRecord> {
        let mut state = self.state.write().await;
        if state.records.contains_key(&record.id) {
            return Err(JournalError::Storage(format!("duplicate trade id {}", record.id)));
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        state.records.insert(record.id, (seq, record.clone()));
        info!(trade_id = %record.id, owner = %record.owner_id, "Trade record created");
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> JournalResult<Option<TradeRecord>> {
        Ok(self.state.read().await.records.get(&id).map(|(_, r)| r.clone()))
    }

    async fn update(&self, record: TradeRecord) -> JournalResult<TradeRecord> {
        let mut state = self.state.write().await;
        match state.records.get_mut(&record.id) {
            Some((_, slot)) => {
                *slot = record.clone();
                info!(trade_id = %record.id, owner = %record.owner_id, "Trade record updated");
                Ok(record)
            }
            None => Err(JournalError::NotFound(format!("trade {}", record.id))),
        }
    }

    async fn delete(&self, id: Uuid) -> JournalResult<bool> {
        let removed = self.state.write().await.records.remove(&id).is_some();
        if removed {
            info!(trade_id = %id, "Trade record deleted");
        }
        Ok(removed)
    }

    async fn list_by_owner(&self, owner_id: Uuid, query: &TradeQuery) -> JournalResult<Vec<TradeRecord>> {
        let state = self.state.read().await;
        let mut list: Vec<&(u64, TradeRecord)> = state
            .records
            .values()
            .filter(|(_, r)| r.is_owned_by(owner_id) && query.matches(r))
            .collect();

        list.sort_by(|(seq_a, a), (seq_b, b)| {
            a.trade
                .occurred_at
                .cmp(&b.trade.occurred_at)
                .then(a.created_at.cmp(&b.created_at))
                .then(seq_a.cmp(seq_b))
        });
        Ok(list.into_iter().map(|(_, r)| r.clone()).collect())
    }
}
