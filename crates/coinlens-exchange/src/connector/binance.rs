//! Binance 시장 데이터 커넥터.
//!
//! Binance Spot 공개 REST API(`/api/v3/klines`)로 캔들을 조회합니다.
//! 인증이 필요 없는 엔드포인트만 사용하므로 API 키를 받지 않습니다.

use std::time::Duration;

use async_trait::async_trait;
use coinlens_core::{Candle, ExchangeConfig, MarketDataProvider, ProviderError, Timeframe};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, warn};

/// 한 번에 요청할 수 있는 최대 캔들 수.
pub const MAX_KLINE_LIMIT: usize = 1000;

const DEFAULT_REST_BASE_URL: &str = "https://api.binance.com";

// ============================================================================
// 설정
// ============================================================================

/// Binance 클라이언트 설정.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// REST API 기본 URL (테스트에서는 목 서버 주소)
    pub rest_base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            rest_base_url: DEFAULT_REST_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl BinanceConfig {
    /// 기본 URL 변경.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.rest_base_url = url.into();
        self
    }

    /// 타임아웃 변경.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl From<&ExchangeConfig> for BinanceConfig {
    fn from(config: &ExchangeConfig) -> Self {
        Self {
            rest_base_url: config.rest_base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        }
    }
}

// ============================================================================
// API 응답 타입
// ============================================================================

#[derive(Debug, Deserialize)]
#[allow(dead_code)] // 응답 필드 전체 매핑 (OHLCV만 사용)
struct BinanceKline(
    i64,    // 0: Open time
    String, // 1: Open
    String, // 2: High
    String, // 3: Low
    String, // 4: Close
    String, // 5: Volume
    i64,    // 6: Close time
    String, // 7: Quote asset volume
    i64,    // 8: Number of trades
    String, // 9: Taker buy base asset volume
    String, // 10: Taker buy quote asset volume
    String, // 11: Ignore
);

impl BinanceKline {
    fn into_candle(self) -> Result<Candle, ProviderError> {
        Ok(Candle::new(
            self.0,
            parse_price("open", &self.1)?,
            parse_price("high", &self.2)?,
            parse_price("low", &self.3)?,
            parse_price("close", &self.4)?,
            parse_price("volume", &self.5)?,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct BinanceError {
    code: i32,
    msg: String,
}

/// 문자열 가격을 f64로 파싱.
fn parse_price(field: &str, value: &str) -> Result<f64, ProviderError> {
    value
        .parse::<f64>()
        .map_err(|e| ProviderError::Parse(format!("{} 값 '{}' 파싱 실패: {}", field, value, e)))
}

// ============================================================================
// Binance 클라이언트
// ============================================================================

/// Binance 캔들 데이터 제공자.
#[derive(Debug, Clone)]
pub struct BinanceMarketData {
    config: BinanceConfig,
    client: Client,
}

impl BinanceMarketData {
    /// 새 Binance 클라이언트 생성.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `ProviderError::Network`를 반환합니다.
    pub fn new(config: BinanceConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self { config, client })
    }

    /// 공통 설정에서 생성.
    pub fn from_exchange_config(config: &ExchangeConfig) -> Result<Self, ProviderError> {
        Self::new(BinanceConfig::from(config))
    }

    pub fn config(&self) -> &BinanceConfig {
        &self.config
    }

    /// 공개 API 요청 (인증 불필요).
    async fn public_get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.config.rest_base_url, endpoint);
        debug!(url = %url, ?params, "GET");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        self.handle_response(response).await
    }

    /// API 응답 처리.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| {
                error!("응답 파싱 실패: {} - Body: {}", e, body);
                ProviderError::Parse(e.to_string())
            });
        }

        // 429: 요청 한도 초과, 418: 한도 초과 반복으로 IP 차단
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::IM_A_TEAPOT {
            warn!(status = status.as_u16(), "Binance 요청 한도 초과");
            return Err(ProviderError::RateLimited(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        // 에러 응답 파싱 시도
        match serde_json::from_str::<BinanceError>(&body) {
            Ok(error) => Err(map_error_code(error.code, &error.msg)),
            Err(_) => Err(ProviderError::Api {
                code: i32::from(status.as_u16()),
                message: body,
            }),
        }
    }
}

/// Binance 에러 코드를 ProviderError로 매핑.
fn map_error_code(code: i32, msg: &str) -> ProviderError {
    match code {
        -1003 => ProviderError::RateLimited(msg.to_string()),
        -1100 | -1120 | -1121 => ProviderError::InvalidRequest(msg.to_string()),
        _ => ProviderError::Api {
            code,
            message: msg.to_string(),
        },
    }
}

/// "BTC/USDT" → "BTCUSDT"
fn to_binance_symbol(symbol: &str) -> String {
    symbol.replace('/', "").to_uppercase()
}

#[async_trait]
impl MarketDataProvider for BinanceMarketData {
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, ProviderError> {
        let binance_symbol = to_binance_symbol(symbol.trim());
        if binance_symbol.is_empty() {
            return Err(ProviderError::InvalidRequest("심볼이 비어 있습니다".to_string()));
        }
        if limit == 0 || limit > MAX_KLINE_LIMIT {
            return Err(ProviderError::InvalidRequest(format!(
                "limit은 1 ~ {} 사이여야 합니다: {}",
                MAX_KLINE_LIMIT, limit
            )));
        }

        let rows: Vec<BinanceKline> = self
            .public_get(
                "/api/v3/klines",
                &[
                    ("symbol", binance_symbol),
                    ("interval", timeframe.to_binance_interval().to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        let candles = rows
            .into_iter()
            .map(BinanceKline::into_candle)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(symbol, %timeframe, count = candles.len(), "Binance 캔들 조회 완료");
        Ok(candles)
    }

    fn provider_name(&self) -> &str {
        "Binance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_conversion() {
        assert_eq!(to_binance_symbol("BTC/USDT"), "BTCUSDT");
        assert_eq!(to_binance_symbol("ethusdt"), "ETHUSDT");
    }

    #[test]
    fn test_error_code_mapping() {
        assert!(matches!(
            map_error_code(-1003, "Too many requests"),
            ProviderError::RateLimited(_)
        ));
        assert!(matches!(
            map_error_code(-1121, "Invalid symbol."),
            ProviderError::InvalidRequest(_)
        ));
        assert!(matches!(
            map_error_code(-2015, "Invalid API-key"),
            ProviderError::Api { code: -2015, .. }
        ));
    }

    #[test]
    fn test_kline_row_parsing() {
        let json = r#"[1700000000000,"37000.10","37100.00","36950.50","37050.25","123.456",1700003599999,"4567890.12",1500,"60.1","2222222.2","0"]"#;
        let row: BinanceKline = serde_json::from_str(json).unwrap();
        let candle = row.into_candle().unwrap();

        assert_eq!(candle.time, 1_700_000_000_000);
        assert_eq!(candle.open, 37000.10);
        assert_eq!(candle.high, 37100.0);
        assert_eq!(candle.low, 36950.50);
        assert_eq!(candle.close, 37050.25);
        assert_eq!(candle.volume, 123.456);
    }

    #[test]
    fn test_kline_bad_price() {
        let json = r#"[1,"abc","1","1","1","1",2,"0",0,"0","0","0"]"#;
        let row: BinanceKline = serde_json::from_str(json).unwrap();
        assert!(matches!(row.into_candle(), Err(ProviderError::Parse(_))));
    }

    #[test]
    fn test_config_from_exchange_config() {
        let exchange = ExchangeConfig {
            rest_base_url: "http://localhost:1234/".to_string(),
            timeout_secs: 3,
            ..Default::default()
        };
        let config = BinanceConfig::from(&exchange);
        assert_eq!(config.rest_base_url, "http://localhost:1234");
        assert_eq!(config.timeout_secs, 3);
    }

    #[tokio::test]
    async fn test_invalid_limit_is_rejected_before_request() {
        let provider = BinanceMarketData::new(BinanceConfig::default()).unwrap();
        let err = provider
            .fetch_candles("BTCUSDT", Timeframe::H1, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest(_)));
    }
}
