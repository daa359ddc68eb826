//! 기술적 지표 모듈.
//!
//! 캔들 시계열에서 시장 분석에 사용하는 기술적 지표를 계산합니다.
//! 모든 시계열 지표는 입력과 같은 길이의 벡터를 반환하며, 워밍업 구간은 `None`입니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA**: 단순 이동평균 (Simple Moving Average)
//! - **EMA**: 지수 이동평균 (Exponential Moving Average, SMA 시드)
//! - **MACD**: 이동평균 수렴/확산 (Moving Average Convergence Divergence)
//! - **추세 강도**: 기간 대비 가격 변위 기반 휴리스틱 (표준 ADX 아님)
//! - **일목균형표**: 전환선, 기준선, 선행스팬 A/B
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 상대강도지수 (Wilder 평활)
//! - **Stochastic**: 스토캐스틱 오실레이터
//!
//! ## 변동성 지표 (Volatility Indicators)
//! - **Bollinger Bands**: 볼린저 밴드 (+ 밴드 폭 %)
//! - **ATR**: 평균 실제 범위 (Average True Range)
//!
//! ## 거래량/구간 지표
//! - **OBV**: 누적 부호 거래량 (On-Balance Volume)
//! - **Fibonacci**: 구간 전체 고가/저가 기준 되돌림 레벨
//!
//! # 데이터 부족 처리
//!
//! 입력이 지표의 최소 참조 기간보다 짧으면 에러 대신 `None`으로 채운 벡터를 반환합니다.
//! 에러는 잘못된 파라미터(기간 0 등)나 입력 길이 불일치에만 발생합니다.
//!
//! # 사용 예시
//!
//! ```ignore
//! use coinlens_analytics::indicators::{IndicatorEngine, SmaParams, RsiParams};
//!
//! let engine = IndicatorEngine::new();
//!
//! // SMA 계산
//! let sma = engine.sma(&closes, SmaParams { period: 20 })?;
//!
//! // RSI 계산
//! let rsi = engine.rsi(&closes, RsiParams { period: 14 })?;
//! ```

pub mod fibonacci;
pub mod ichimoku;
pub mod momentum;
pub mod obv;
pub mod trend;
pub mod trend_strength;
pub mod volatility;

use thiserror::Error;

pub use fibonacci::{FibonacciCalculator, FibonacciLevel, FIBONACCI_RATIOS};
pub use ichimoku::{IchimokuIndicator, IchimokuParams, IchimokuResult};
pub use momentum::{MomentumCalculator, RsiParams, StochasticParams, StochasticResult};
pub use obv::{ObvIndicator, ObvParams, ObvResult};
pub use trend::{EmaParams, MacdParams, MacdResult, SmaParams, TrendIndicators};
pub use trend_strength::{TrendStrengthIndicator, TrendStrengthParams};
pub use volatility::{AtrParams, BollingerBandsParams, BollingerBandsResult, VolatilityIndicators};

/// 지표 계산 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// 데이터 부족 오류 (구간 단위 계산에서만 사용)
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 기간 파라미터가 0이 아닌지 확인합니다.
pub(crate) fn ensure_period(name: &str, period: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} 기간은 0보다 커야 합니다",
            name
        )));
    }
    Ok(())
}

/// 여러 입력 시계열의 길이가 같은지 확인하고 그 길이를 반환합니다.
pub(crate) fn ensure_same_len(series: &[&[f64]]) -> IndicatorResult<usize> {
    let len = series.first().map(|s| s.len()).unwrap_or(0);
    if series.iter().any(|s| s.len() != len) {
        return Err(IndicatorError::InvalidParameter(
            "입력 시계열의 길이가 일치하지 않습니다".to_string(),
        ));
    }
    Ok(len)
}

/// 통합 지표 엔진.
///
/// 모든 기술적 지표 계산을 위한 통합 인터페이스를 제공합니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
    obv: ObvIndicator,
    ichimoku: IchimokuIndicator,
    trend_strength: TrendStrengthIndicator,
    fibonacci: FibonacciCalculator,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 추세 지표 ====================

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// # 반환
    /// 계산된 SMA 값들의 벡터 (처음 period-1개는 None)
    pub fn sma(&self, prices: &[f64], params: SmaParams) -> IndicatorResult<Vec<Option<f64>>> {
        self.trend.sma(prices, params)
    }

    /// 지수 이동평균 (EMA) 계산.
    pub fn ema(&self, prices: &[f64], params: EmaParams) -> IndicatorResult<Vec<Option<f64>>> {
        self.trend.ema(prices, params)
    }

    /// MACD 계산.
    ///
    /// # 반환
    /// MACD 라인, 시그널 라인, 히스토그램
    pub fn macd(&self, prices: &[f64], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        self.trend.macd(prices, params)
    }

    /// 추세 강도 휴리스틱 계산 (10 ~ 60).
    pub fn trend_strength(
        &self,
        prices: &[f64],
        params: TrendStrengthParams,
    ) -> IndicatorResult<Vec<Option<f64>>> {
        self.trend_strength.calculate(prices, params)
    }

    /// 일목균형표 계산.
    pub fn ichimoku(
        &self,
        high: &[f64],
        low: &[f64],
        params: IchimokuParams,
    ) -> IndicatorResult<Vec<IchimokuResult>> {
        self.ichimoku.calculate(high, low, params)
    }

    // ==================== 모멘텀 지표 ====================

    /// RSI (Relative Strength Index) 계산.
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들
    pub fn rsi(&self, prices: &[f64], params: RsiParams) -> IndicatorResult<Vec<Option<f64>>> {
        self.momentum.rsi(prices, params)
    }

    /// 스토캐스틱 오실레이터 계산.
    pub fn stochastic(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
        params: StochasticParams,
    ) -> IndicatorResult<Vec<StochasticResult>> {
        self.momentum.stochastic(high, low, close, params)
    }

    // ==================== 변동성 지표 ====================

    /// 볼린저 밴드 계산.
    ///
    /// # 반환
    /// 상단, 중간, 하단 밴드와 밴드 폭(%)
    pub fn bollinger_bands(
        &self,
        prices: &[f64],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        self.volatility.bollinger_bands(prices, params)
    }

    /// ATR (Average True Range) 계산.
    pub fn atr(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<f64>>> {
        self.volatility.atr(high, low, close, params)
    }

    // ==================== 거래량/구간 지표 ====================

    /// OBV (On-Balance Volume) 계산.
    pub fn obv(
        &self,
        close: &[f64],
        volume: &[f64],
        params: ObvParams,
    ) -> IndicatorResult<Vec<ObvResult>> {
        self.obv.calculate(close, volume, params)
    }

    /// 구간 전체 기준 피보나치 되돌림 레벨 계산.
    pub fn fibonacci_levels(
        &self,
        high: &[f64],
        low: &[f64],
    ) -> IndicatorResult<Vec<FibonacciLevel>> {
        self.fibonacci.levels(high, low)
    }
}
