//! 저장된 매매일지 레코드와 조회 조건.

use chrono::{DateTime, Utc};
use journal_analytics::JournalEntry;
use journal_core::{Direction, Emotion, ValuedTrade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 매매일지 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub id: Uuid,
    /// 레코드 소유자
    pub owner_id: Uuid,
    pub trade: ValuedTrade,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TradeRecord {
    /// 새 레코드를 생성합니다.
    pub fn new(owner_id: Uuid, trade: ValuedTrade) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            trade,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, owner_id: Uuid) -> bool {
        self.owner_id == owner_id
    }

    /// 거래 내용을 교체하고 수정 시각을 갱신합니다.
    pub fn replace_trade(&mut self, trade: ValuedTrade) {
        self.trade = trade;
        self.updated_at = Utc::now();
    }
}

impl JournalEntry for TradeRecord {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.trade.occurred_at
    }

    fn pnl_quote(&self) -> Decimal {
        self.trade.pnl_quote_currency
    }

    fn pnl_secondary(&self) -> Decimal {
        self.trade.pnl_secondary_currency
    }

    fn pnl_percent(&self) -> Decimal {
        self.trade.pnl_percent
    }

    fn emotion(&self) -> Emotion {
        self.trade.emotion
    }
}

/// 거래 내역 조회 조건.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeQuery {
    /// 메모 검색어 (대소문자 무시 부분 일치)
    pub search: Option<String>,
    /// 발생 시각 하한 (포함)
    pub since: Option<DateTime<Utc>>,
    /// 발생 시각 상한 (포함)
    pub until: Option<DateTime<Utc>>,
    pub direction: Option<Direction>,
}

impl TradeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_range(mut self, since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self.until = Some(until);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// 레코드가 조건에 맞는지 확인합니다.
    pub fn matches(&self, record: &TradeRecord) -> bool {
        let trade = &record.trade;

        if let Some(direction) = self.direction {
            if trade.direction != direction {
                return false;
            }
        }
        if self.since.is_some_and(|since| trade.occurred_at < since) {
            return false;
        }
        if self.until.is_some_and(|until| trade.occurred_at > until) {
            return false;
        }

        // 빈 검색어는 조건 없음으로 취급
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => trade
                .notes
                .as_deref()
                .is_some_and(|notes| notes.to_lowercase().contains(&term.to_lowercase())),
            _ => true,
        }
    }
}
