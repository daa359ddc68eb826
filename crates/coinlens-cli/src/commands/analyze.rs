//! 거래소 캔들 조회 후 분석.

use std::time::Duration;

use anyhow::{Context, Result};
use coinlens_analytics::{MarketAnalysis, MarketAnalyzer};
use coinlens_core::{MarketDataProvider, Timeframe};
use coinlens_exchange::BinanceMarketData;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use crate::output::{render, AnalysisReport, OutputFormat};
use crate::settings::Settings;

/// 분석 요청.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    /// 거래 쌍 (예: BTCUSDT, BTC/USDT)
    pub symbol: String,
    pub timeframe: Timeframe,
    /// 조회할 캔들 수. None이면 설정의 기본값.
    pub limit: Option<usize>,
    pub format: OutputFormat,
}

impl AnalyzeRequest {
    pub fn limit_or(&self, settings: &Settings) -> usize {
        self.limit.unwrap_or(settings.exchange.default_limit)
    }
}

/// 제공자에서 캔들을 받아 분석하고, 출력 문자열을 반환합니다.
///
/// 조회 실패는 재시도나 대체 데이터 없이 그대로 에러로 반환됩니다.
pub async fn analyze_with_provider(
    provider: &dyn MarketDataProvider,
    settings: &Settings,
    request: &AnalyzeRequest,
) -> Result<String> {
    let analyzer = MarketAnalyzer::new(settings.analysis.clone())
        .context("Invalid analysis configuration")?;
    let limit = request.limit_or(settings);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!(
        "Fetching {} {} candles from {}...",
        limit,
        request.timeframe,
        provider.provider_name()
    ));
    pb.enable_steady_tick(Duration::from_millis(100));

    let analysis: Result<MarketAnalysis, _> = analyzer
        .analyze_symbol(provider, &request.symbol, request.timeframe, limit)
        .await;
    pb.finish_and_clear();

    let analysis = analysis.map_err(|e| {
        error!(symbol = %request.symbol, "Analysis failed: {}", e);
        e
    })?;

    let report = AnalysisReport::new(
        &request.symbol,
        request.timeframe,
        provider.provider_name(),
        &analysis,
    );
    render(&report, request.format)
}

/// Binance에서 캔들을 조회해 분석합니다.
pub async fn run_analyze(settings: &Settings, request: AnalyzeRequest) -> Result<String> {
    let provider = BinanceMarketData::from_exchange_config(&settings.exchange)
        .context("Failed to create Binance client")?;

    info!(
        symbol = %request.symbol,
        timeframe = %request.timeframe,
        base_url = %provider.config().rest_base_url,
        "Starting analysis"
    );

    analyze_with_provider(&provider, settings, &request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use coinlens_core::{Candle, ProviderError};
    use coinlens_exchange::SyntheticCandleFeed;

    struct FailingProvider;

    #[async_trait]
    impl MarketDataProvider for FailingProvider {
        async fn fetch_candles(
            &self,
            _symbol: &str,
            _timeframe: Timeframe,
            _limit: usize,
        ) -> Result<Vec<Candle>, ProviderError> {
            Err(ProviderError::RateLimited("HTTP 429".to_string()))
        }

        fn provider_name(&self) -> &str {
            "Failing"
        }
    }

    fn request(format: OutputFormat) -> AnalyzeRequest {
        AnalyzeRequest {
            symbol: "BTCUSDT".to_string(),
            timeframe: Timeframe::H4,
            limit: Some(120),
            format,
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_hidden() {
        let err = analyze_with_provider(&FailingProvider, &Settings::default(), &request(OutputFormat::Table))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_synthetic_provider_json_output() {
        let feed = SyntheticCandleFeed::with_seed(5).with_end_time(1_700_000_000_000);
        let output = analyze_with_provider(&feed, &Settings::default(), &request(OutputFormat::Json))
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["candles"], 120);
        assert_eq!(json["provider"], "Synthetic");
    }

    #[test]
    fn test_limit_defaults_to_settings() {
        let mut req = request(OutputFormat::Table);
        req.limit = None;
        let mut settings = Settings::default();
        settings.exchange.default_limit = 250;
        assert_eq!(req.limit_or(&settings), 250);
    }
}
