//! 매매일지 서비스.
//!
//! 평가 엔진, 저장소, 성과 분석을 하나로 묶습니다. 손익은 기록/수정 시점에
//! 한 번 계산되어 레코드에 저장되고, 분석은 요청할 때마다 다시 계산됩니다.

use journal_analytics::{Analytics, AnalyticsSnapshot};
use journal_core::{journal_span, JournalConfig, JournalError, JournalResult, TradeInput, ValuationEngine};
use tracing::{debug, Instrument};
use uuid::Uuid;

use crate::record::{TradeQuery, TradeRecord};
use crate::repository::TradeRepository;

/// 매매일지 서비스.
#[derive(Debug)]
pub struct JournalService<R: TradeRepository> {
    repository: R,
    engine: ValuationEngine,
    analytics: Analytics,
}

impl<R: TradeRepository> JournalService<R> {
    /// 기본 환산 상수와 분석 설정으로 서비스를 생성합니다.
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            engine: ValuationEngine::default(),
            analytics: Analytics::default(),
        }
    }

    /// 설정 파일 값으로 서비스를 생성합니다.
    pub fn from_config(repository: R, config: &JournalConfig) -> Self {
        Self {
            repository,
            engine: ValuationEngine::from_config(&config.valuation),
            analytics: Analytics::new(config.analytics.clone()),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn engine(&self) -> &ValuationEngine {
        &self.engine
    }

    /// 거래를 평가하고 저장합니다.
    ///
    /// 검증에 실패하면 아무것도 저장하지 않습니다.
    pub async fn record_trade(&self, owner_id: Uuid, input: &TradeInput) -> JournalResult<TradeRecord> {
        async {
            let trade = self.engine.value_trade(input).map_err(|e| {
                debug!(error = %e, "Trade rejected");
                JournalError::from(e)
            })?;
            self.repository.create(TradeRecord::new(owner_id, trade)).await
        }
        .instrument(journal_span!("record_trade", owner_id))
        .await
    }

    /// 기존 거래를 새 입력으로 다시 평가해 교체합니다.
    pub async fn edit_trade(&self, owner_id: Uuid, id: Uuid, input: &TradeInput) -> JournalResult<TradeRecord> {
        async {
            let mut record = self.owned_record(owner_id, id).await?;
            let trade = self.engine.value_trade(input)?;
            record.replace_trade(trade);
            self.repository.update(record).await
        }
        .instrument(journal_span!("edit_trade", owner_id, id))
        .await
    }

    /// 거래를 삭제합니다.
    pub async fn delete_trade(&self, owner_id: Uuid, id: Uuid) -> JournalResult<()> {
        async {
            self.owned_record(owner_id, id).await?;
            if self.repository.delete(id).await? {
                Ok(())
            } else {
                Err(JournalError::NotFound(format!("trade {}", id)))
            }
        }
        .instrument(journal_span!("delete_trade", owner_id, id))
        .await
    }

    /// 조건에 맞는 거래 내역을 발생 시각 오름차순으로 조회합니다.
    pub async fn history(&self, owner_id: Uuid, query: &TradeQuery) -> JournalResult<Vec<TradeRecord>> {
        self.repository.list_by_owner(owner_id, query).await
    }

    /// 소유자의 전체 거래로 성과 스냅샷을 계산합니다.
    pub async fn analytics(&self, owner_id: Uuid) -> JournalResult<AnalyticsSnapshot> {
        let records = self.repository.list_by_owner(owner_id, &TradeQuery::default()).await?;
        Ok(self.analytics.summarize(&records))
    }

    async fn owned_record(&self, owner_id: Uuid, id: Uuid) -> JournalResult<TradeRecord> {
        let record = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| JournalError::NotFound(format!("trade {}", id)))?;

        if !record.is_owned_by(owner_id) {
            return Err(JournalError::Forbidden(format!("trade {} belongs to another owner", id)));
        }
        Ok(record)
    }
}
