//! 시장 데이터 제공자.
//!
//! 이 크레이트는 `coinlens_core::MarketDataProvider` 구현체를 제공합니다:
//! - Binance 공개 REST API 캔들 조회
//! - 시드 기반 합성 캔들 피드 (오프라인 데모 및 테스트용)
//!
//! 제공자는 에러를 재시도하지 않습니다. 재시도나 대체 데이터 사용은 호출자가 결정합니다.

pub mod connector;
pub mod simulated;

pub use connector::binance::{BinanceConfig, BinanceMarketData, MAX_KLINE_LIMIT};
pub use simulated::{SyntheticCandleFeed, SyntheticFeedConfig};
