//! 시장 분석을 위한 도메인 모델.

mod analysis;
mod market_data;
mod market_data_provider;
mod signal;

pub use analysis::*;
pub use market_data::*;
pub use market_data_provider::*;
pub use signal::*;
