//! 합성 캔들 데이터 피드.
//!
//! 네트워크 없이 분석 파이프라인을 실행하기 위한 랜덤 워크 OHLCV 생성기입니다.
//! 같은 시드와 심볼에 대해 항상 같은 가격 시계열을 만듭니다.
//!
//! 캔들 생성 규칙 (변동폭 = 기준가의 2%):
//! - 시가 = 직전 종가
//! - 고가 = 시가 + U(0,1) × 변동폭, 저가 = 시가 - U(0,1) × 변동폭
//! - 종가 = 저가 + U(0,1) × (고가 - 저가)
//! - 거래량 = 500,000 ~ 1,500,000

use async_trait::async_trait;
use chrono::Utc;
use coinlens_core::{Candle, MarketDataProvider, ProviderError, Timeframe};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// 변동폭 비율 (기준가 대비).
const VOLATILITY_RATIO: f64 = 0.02;

/// 가격 하한 (기준가 대비). 랜덤 워크가 0 이하로 내려가지 않도록 합니다.
const PRICE_FLOOR_RATIO: f64 = 0.01;

/// 합성 데이터 피드 설정.
#[derive(Debug, Clone)]
pub struct SyntheticFeedConfig {
    /// 난수 시드
    pub seed: u64,
    /// 마지막 캔들의 시작 시간 (epoch 밀리초). None이면 현재 시각 기준.
    pub end_time: Option<i64>,
}

impl Default for SyntheticFeedConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            end_time: None,
        }
    }
}

/// 합성 캔들 데이터 피드.
#[derive(Debug, Clone, Default)]
pub struct SyntheticCandleFeed {
    config: SyntheticFeedConfig,
}

impl SyntheticCandleFeed {
    pub fn new(config: SyntheticFeedConfig) -> Self {
        Self { config }
    }

    /// 시드만 지정하여 생성.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(SyntheticFeedConfig {
            seed,
            ..Default::default()
        })
    }

    /// 마지막 캔들 시간 고정.
    pub fn with_end_time(mut self, end_time: i64) -> Self {
        self.config.end_time = Some(end_time);
        self
    }

    /// 심볼별 기준가.
    ///
    /// BTC 포함 65,000, ETH 포함 3,500, 그 외 300.
    pub fn base_price(symbol: &str) -> f64 {
        let upper = symbol.to_uppercase();
        if upper.contains("BTC") {
            65_000.0
        } else if upper.contains("ETH") {
            3_500.0
        } else {
            300.0
        }
    }

    /// 시드와 심볼을 섞어 심볼마다 다른 난수열을 만듭니다.
    fn rng_for(&self, symbol: &str) -> StdRng {
        let mixed = symbol
            .bytes()
            .fold(self.config.seed, |acc, b| acc.rotate_left(5) ^ u64::from(b));
        StdRng::seed_from_u64(mixed)
    }

    /// 캔들 생성.
    pub fn generate(&self, symbol: &str, timeframe: Timeframe, count: usize) -> Vec<Candle> {
        let mut rng = self.rng_for(symbol);
        let base = Self::base_price(symbol);
        let swing = base * VOLATILITY_RATIO;
        let floor = base * PRICE_FLOOR_RATIO;

        let step = timeframe.as_millis();
        let end_time = self.config.end_time.unwrap_or_else(|| {
            let now = Utc::now().timestamp_millis();
            now - now.rem_euclid(step)
        });
        let start_time = end_time - step * count.saturating_sub(1) as i64;

        let mut price = base;
        let candles: Vec<Candle> = (0..count)
            .map(|i| {
                let open = price;
                let high = open + rng.gen::<f64>() * swing;
                let low = (open - rng.gen::<f64>() * swing).max(floor.min(open));
                let close = low + rng.gen::<f64>() * (high - low);
                let volume = rng.gen::<f64>() * 1_000_000.0 + 500_000.0;
                price = close;

                Candle::new(start_time + step * i as i64, open, high, low, close, volume)
            })
            .collect();

        debug!(symbol, %timeframe, count, seed = self.config.seed, "합성 캔들 생성");
        candles
    }
}

#[async_trait]
impl MarketDataProvider for SyntheticCandleFeed {
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, ProviderError> {
        if limit == 0 {
            return Err(ProviderError::InvalidRequest("limit은 1 이상이어야 합니다".to_string()));
        }
        Ok(self.generate(symbol, timeframe, limit))
    }

    fn provider_name(&self) -> &str {
        "Synthetic"
    }
}
