//! 분석 입력 trait.

use chrono::{DateTime, Utc};
use journal_core::{Emotion, ValuedTrade};
use rust_decimal::Decimal;

/// 평가가 끝난 매매일지 항목.
///
/// `ValuedTrade`, 저장소 레코드 등 다양한 타입에서 분석에 필요한
/// 값만 꺼내기 위한 인터페이스입니다.
pub trait JournalEntry {
    /// 거래 발생 시각.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// 기준 통화 손익.
    fn pnl_quote(&self) -> Decimal;

    /// 보조 통화 손익.
    fn pnl_secondary(&self) -> Decimal;

    /// 명목 가치 대비 손익률 (%).
    fn pnl_percent(&self) -> Decimal;

    /// 진입 시 심리 상태.
    fn emotion(&self) -> Emotion {
        Emotion::default()
    }
}

impl JournalEntry for ValuedTrade {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn pnl_quote(&self) -> Decimal {
        self.pnl_quote_currency
    }

    fn pnl_secondary(&self) -> Decimal {
        self.pnl_secondary_currency
    }

    fn pnl_percent(&self) -> Decimal {
        self.pnl_percent
    }

    fn emotion(&self) -> Emotion {
        self.emotion
    }
}

impl<T: JournalEntry + ?Sized> JournalEntry for &T {
    fn occurred_at(&self) -> DateTime<Utc> {
        (**self).occurred_at()
    }

    fn pnl_quote(&self) -> Decimal {
        (**self).pnl_quote()
    }

    fn pnl_secondary(&self) -> Decimal {
        (**self).pnl_secondary()
    }

    fn pnl_percent(&self) -> Decimal {
        (**self).pnl_percent()
    }

    fn emotion(&self) -> Emotion {
        (**self).emotion()
    }
}
