//! 네트워크 없이 사용하는 시뮬레이션 데이터.
//!
//! 오프라인 데모와 테스트를 위한 합성 캔들 피드를 제공합니다.
//!
//! # 예제
//!
//! ```ignore
//! use coinlens_exchange::simulated::SyntheticCandleFeed;
//!
//! let feed = SyntheticCandleFeed::with_seed(42);
//! let candles = feed.fetch_candles("BTCUSDT", Timeframe::H4, 100).await?;
//! ```

mod data_feed;

pub use data_feed::{SyntheticCandleFeed, SyntheticFeedConfig};
