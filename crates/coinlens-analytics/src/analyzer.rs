//! 분석 오케스트레이터.
//!
//! 캔들 검증 → 지표 보강 → 신호 생성 → 점수 계산 순서로 파이프라인을 실행합니다.
//! 분석기는 상태를 갖지 않으며 같은 입력에 항상 같은 결과를 반환합니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use coinlens_analytics::MarketAnalyzer;
//!
//! let analyzer = MarketAnalyzer::new(AnalyzerConfig::default())?;
//! let analysis = analyzer.analyze_candles(candles)?;
//! println!("{} ({:.0})", analysis.result.sentiment(), analysis.result.signal_strength());
//! ```

use coinlens_core::{
    analysis_span, AnalysisResult, Candle, CandleSeries, MarketDataProvider, Timeframe,
};
use serde::Serialize;
use tracing::{debug, info, Instrument};

use crate::config::AnalyzerConfig;
use crate::enrichment::{EnrichedSeries, Enricher};
use crate::error::AnalyzerResult;
use crate::scorer::MarketScorer;
use crate::signals::SignalGenerator;

/// 분석 결과와 보강된 시계열.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketAnalysis {
    /// 입력과 같은 길이의 보강 시계열 (차트용)
    pub series: EnrichedSeries,
    /// 종합 평가
    pub result: AnalysisResult,
}

/// 시장 분석기.
#[derive(Debug, Default)]
pub struct MarketAnalyzer {
    enricher: Enricher,
    signals: SignalGenerator,
    scorer: MarketScorer,
}

impl MarketAnalyzer {
    /// 설정을 검증하고 분석기를 생성합니다.
    pub fn new(config: AnalyzerConfig) -> AnalyzerResult<Self> {
        config.validate()?;
        Ok(Self {
            signals: SignalGenerator::from_config(&config),
            scorer: MarketScorer::from_config(&config),
            enricher: Enricher::new(config),
        })
    }

    /// 검증된 캔들 시계열을 분석합니다.
    pub fn analyze(&self, series: &CandleSeries) -> AnalyzerResult<MarketAnalysis> {
        let enriched = self.enricher.enrich(series)?;
        let signals = self.signals.generate(&enriched);
        let result = self.scorer.assess(&enriched, signals);

        info!(
            candles = enriched.len(),
            sentiment = %result.sentiment(),
            strength = result.signal_strength(),
            potential_roi = result.potential_roi(),
            signals = result.signals().len(),
            "시장 분석 완료"
        );

        Ok(MarketAnalysis {
            series: enriched,
            result,
        })
    }

    /// 캔들 목록을 검증한 뒤 분석합니다.
    ///
    /// # 에러
    /// 빈 입력이나 잘못된 캔들은 계산 전에 `AnalysisError::Data`로 거부됩니다.
    pub fn analyze_candles(&self, candles: Vec<Candle>) -> AnalyzerResult<MarketAnalysis> {
        let series = CandleSeries::new(candles)?;
        self.analyze(&series)
    }

    /// 제공자에서 캔들을 조회해 분석합니다.
    ///
    /// 제공자 에러는 `AnalysisError::Upstream`으로 그대로 전달되며 재시도하지 않습니다.
    pub async fn analyze_symbol(
        &self,
        provider: &dyn MarketDataProvider,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> AnalyzerResult<MarketAnalysis> {
        let span = analysis_span!("analyze_symbol", symbol, timeframe);

        async {
            debug!(provider = provider.provider_name(), limit, "캔들 조회");
            let candles = provider.fetch_candles(symbol, timeframe, limit).await?;
            self.analyze_candles(candles)
        }
        .instrument(span)
        .await
    }
}

/// 기본 설정으로 캔들 목록을 분석합니다.
pub fn analyze(candles: &[Candle]) -> AnalyzerResult<AnalysisResult> {
    MarketAnalyzer::default()
        .analyze_candles(candles.to_vec())
        .map(|analysis| analysis.result)
}
