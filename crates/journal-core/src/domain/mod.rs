//! 매매일지 도메인 모델과 평가 엔진.

mod calculations;
mod trade;
mod validation;
mod valuation;

pub use calculations::*;
pub use trade::*;
pub use validation::*;
pub use valuation::*;
