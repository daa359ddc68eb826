//! 시장 분석 파이프라인.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 기술적 지표 (SMA, EMA, RSI, MACD, 볼린저 밴드, 스토캐스틱, ATR, OBV, 일목균형표, 피보나치)
//! - 지지/저항 레벨 탐지 및 Value Area (볼륨 프로파일)
//! - 지표 보강 시계열
//! - 매매 신호 생성
//! - 시장 심리/신호 강도/기대 수익률 점수
//!
//! 모든 계산은 동기식 순수 함수이며, 같은 입력에 대해 항상 같은 결과를 냅니다.
//! 시장 데이터 조회만 [`MarketAnalyzer::analyze_symbol`]에서 비동기로 수행합니다.
//!
//! # Re-exports
//!
//! - [`indicators`]: 지표 계산기와 파라미터
//! - [`MarketAnalyzer`], [`analyze`]: 파이프라인 진입점

pub mod analyzer;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod indicators;
pub mod scorer;
pub mod signals;
pub mod support_resistance;
pub mod volume_profile;

// 파이프라인 re-exports
pub use analyzer::{analyze, MarketAnalysis, MarketAnalyzer};
pub use config::{AnalyzerConfig, ScoringParams, SignalParams};
pub use enrichment::{EnrichedCandle, EnrichedSeries, Enricher};
pub use error::{AnalysisError, AnalyzerResult};
pub use scorer::{sentiment_description, signal_description, MarketScorer, StrengthScore};
pub use signals::SignalGenerator;

// Indicators 모듈 re-exports
pub use indicators::{
    // 변동성 지표
    AtrParams,
    BollingerBandsParams,
    BollingerBandsResult,
    // 추세 지표
    EmaParams,
    // 구간 지표
    FibonacciCalculator,
    FibonacciLevel,
    IchimokuIndicator,
    IchimokuParams,
    IchimokuResult,
    IndicatorEngine,
    IndicatorError,
    IndicatorResult,
    MacdParams,
    MacdResult,
    // 모멘텀 지표
    MomentumCalculator,
    // OBV
    ObvIndicator,
    ObvParams,
    ObvResult,
    RsiParams,
    SmaParams,
    StochasticParams,
    StochasticResult,
    TrendIndicators,
    TrendStrengthIndicator,
    TrendStrengthParams,
    VolatilityIndicators,
    FIBONACCI_RATIOS,
};

// 지지/저항 re-export
pub use support_resistance::{
    SupportResistanceDetector, SupportResistanceLevels, SupportResistanceParams, SupportSelection,
};

// Volume Profile re-export
pub use volume_profile::{
    PriceLevel, ValueArea, ValueAreaParams, VolumeProfile, VolumeProfileCalculator,
};
