//! 시장 데이터 제공자 추상화.
//!
//! 거래소로부터 캔들 데이터를 조회하기 위한 거래소 중립적인 인터페이스를 제공합니다.
//! 분석 코어는 이 에러를 잡거나 재시도하지 않으며, 재시도/대체 데이터 여부는
//! 호출자가 결정합니다.

use async_trait::async_trait;
use thiserror::Error;

use super::Candle;
use crate::types::Timeframe;

// =============================================================================
// 에러 타입
// =============================================================================

/// MarketDataProvider 에러.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 네트워크 에러 (연결 실패, 타임아웃 등)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 요청 한도 초과
    #[error("요청 한도 초과: {0}")]
    RateLimited(String),

    /// API 에러
    #[error("API 에러 {code}: {message}")]
    Api { code: i32, message: String },

    /// 응답 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 잘못된 요청 (알 수 없는 심볼, 잘못된 limit 등)
    #[error("잘못된 요청: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// 재시도 가능한 에러인지 확인합니다.
    ///
    /// 코어는 재시도하지 않으며, 호출자의 판단을 돕기 위한 정보입니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Network(_) | ProviderError::RateLimited(_))
    }
}

// =============================================================================
// MarketDataProvider Trait
// =============================================================================

/// 시장 데이터 제공자 trait.
///
/// 한 거래 쌍의 최근 캔들을 시간 오름차순으로 조회합니다.
///
/// # 구현 예시
///
/// ```ignore
/// pub struct BinanceMarketData {
///     client: reqwest::Client,
/// }
///
/// #[async_trait]
/// impl MarketDataProvider for BinanceMarketData {
///     async fn fetch_candles(&self, symbol: &str, timeframe: Timeframe, limit: usize)
///         -> Result<Vec<Candle>, ProviderError> {
///         // /api/v3/klines 호출 및 변환
///     }
///
///     fn provider_name(&self) -> &str {
///         "Binance"
///     }
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 최근 캔들 조회.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Network`: 네트워크 연결 실패
    /// - `ProviderError::RateLimited`: 요청 한도 초과
    /// - `ProviderError::Api`: 거래소 API 에러
    /// - `ProviderError::Parse`: 응답 형식 오류
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, ProviderError>;

    /// 제공자 이름 반환.
    ///
    /// 로깅 및 디버깅 목적으로 사용됩니다.
    fn provider_name(&self) -> &str;
}
