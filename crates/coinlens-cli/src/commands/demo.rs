//! 합성 캔들로 오프라인 분석 실행.

use anyhow::Result;
use coinlens_exchange::{SyntheticCandleFeed, SyntheticFeedConfig};
use tracing::info;

use super::analyze::{analyze_with_provider, AnalyzeRequest};
use crate::settings::Settings;

/// 시드 기반 합성 데이터로 분석합니다. 같은 시드는 같은 결과를 냅니다.
pub async fn run_demo(settings: &Settings, request: AnalyzeRequest, seed: u64) -> Result<String> {
    let feed = SyntheticCandleFeed::new(SyntheticFeedConfig {
        seed,
        ..Default::default()
    });

    info!(symbol = %request.symbol, seed, "Running demo on synthetic candles");
    analyze_with_provider(&feed, settings, &request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use coinlens_core::Timeframe;

    #[tokio::test]
    async fn test_demo_table_output() {
        let request = AnalyzeRequest {
            symbol: "ETHUSDT".to_string(),
            timeframe: Timeframe::H1,
            limit: Some(80),
            format: OutputFormat::Table,
        };

        let output = run_demo(&Settings::default(), request, 42).await.unwrap();
        assert!(output.starts_with("ETHUSDT 1h (Synthetic, 80 candles)"));
    }
}
