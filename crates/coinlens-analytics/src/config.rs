//! 분석기 설정.
//!
//! 지표, 신호, 점수 계산 파라미터를 하나로 묶습니다. 모든 섹션은 `serde(default)`이므로
//! 설정 파일에는 바꾸려는 값만 적으면 됩니다.
//!
//! ```toml
//! [analysis.rsi]
//! period = 21
//!
//! [analysis.value_area]
//! enabled = false
//! ```

use serde::{Deserialize, Serialize};

use crate::indicators::{
    AtrParams, BollingerBandsParams, EmaParams, IchimokuParams, IndicatorError, IndicatorResult,
    MacdParams, ObvParams, RsiParams, StochasticParams, TrendStrengthParams,
};
use crate::support_resistance::SupportResistanceParams;
use crate::volume_profile::ValueAreaParams;

/// 신호 생성 임계값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    /// RSI 과매도 기준 (기본: 30).
    pub rsi_oversold: f64,
    /// RSI 과매수 기준 (기본: 70).
    pub rsi_overbought: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }
}

/// 심리/강도 점수 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    /// 강세/약세 판정에 MACD > 시그널 (약세는 반대) 조건 포함 여부 (기본: true).
    pub require_macd_confirmation: bool,
    /// 이 값 미만의 볼린저 밴드 폭(%)은 저변동성 구간 (기본: 10).
    pub narrow_band_width: f64,
    /// 이 값 초과의 볼린저 밴드 폭(%)은 고변동성 구간 (기본: 30).
    pub wide_band_width: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            require_macd_confirmation: true,
            narrow_band_width: 10.0,
            wide_band_width: 30.0,
        }
    }
}

/// 분석기 전체 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// 단기 EMA (기본: 20)
    pub ema_fast: EmaParams,
    /// 장기 EMA (기본: 50)
    pub ema_slow: EmaParams,
    pub rsi: RsiParams,
    pub macd: MacdParams,
    pub bollinger: BollingerBandsParams,
    pub stochastic: StochasticParams,
    pub atr: AtrParams,
    pub trend_strength: TrendStrengthParams,
    pub ichimoku: IchimokuParams,
    pub obv: ObvParams,
    pub support_resistance: SupportResistanceParams,
    pub value_area: ValueAreaParams,
    pub signals: SignalParams,
    pub scoring: ScoringParams,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            ema_fast: EmaParams { period: 20 },
            ema_slow: EmaParams { period: 50 },
            rsi: RsiParams::default(),
            macd: MacdParams::default(),
            bollinger: BollingerBandsParams::default(),
            stochastic: StochasticParams::default(),
            atr: AtrParams::default(),
            trend_strength: TrendStrengthParams::default(),
            ichimoku: IchimokuParams::default(),
            obv: ObvParams::default(),
            support_resistance: SupportResistanceParams::default(),
            value_area: ValueAreaParams::default(),
            signals: SignalParams::default(),
            scoring: ScoringParams::default(),
        }
    }
}

impl AnalyzerConfig {
    /// 기간 간 관계와 임계값을 검증합니다.
    ///
    /// 개별 기간이 0인 경우는 각 지표 계산에서 검출됩니다.
    pub fn validate(&self) -> IndicatorResult<()> {
        if self.ema_fast.period >= self.ema_slow.period {
            return Err(IndicatorError::InvalidParameter(format!(
                "단기 EMA 기간({})은 장기 EMA 기간({})보다 짧아야 합니다",
                self.ema_fast.period, self.ema_slow.period
            )));
        }

        if self.macd.fast_period >= self.macd.slow_period {
            return Err(IndicatorError::InvalidParameter(format!(
                "MACD 단기 기간({})은 장기 기간({})보다 짧아야 합니다",
                self.macd.fast_period, self.macd.slow_period
            )));
        }

        let sr = &self.support_resistance;
        if sr.neighbors == 0 {
            return Err(IndicatorError::InvalidParameter(
                "지지/저항 비교 이웃 수는 1 이상이어야 합니다".to_string(),
            ));
        }
        if !sr.merge_tolerance.is_finite() || sr.merge_tolerance < 0.0 {
            return Err(IndicatorError::InvalidParameter(format!(
                "지지/저항 병합 허용 오차는 0 이상이어야 합니다: {}",
                sr.merge_tolerance
            )));
        }

        let s = &self.signals;
        if !(0.0..=100.0).contains(&s.rsi_oversold)
            || !(0.0..=100.0).contains(&s.rsi_overbought)
            || s.rsi_oversold >= s.rsi_overbought
        {
            return Err(IndicatorError::InvalidParameter(format!(
                "RSI 과매도/과매수 기준이 잘못되었습니다: {} / {}",
                s.rsi_oversold, s.rsi_overbought
            )));
        }

        if self.scoring.narrow_band_width > self.scoring.wide_band_width {
            return Err(IndicatorError::InvalidParameter(
                "저변동성 밴드 폭 기준은 고변동성 기준보다 클 수 없습니다".to_string(),
            ));
        }

        Ok(())
    }
}
