//! 시장 심리와 신호 강도 점수.
//!
//! 최신 보강 캔들로 심리(강세/약세/중립)를 판정하고, 50점에서 시작해
//! 독립적인 가감점 규칙을 더해 0~100 강도 점수를 만듭니다.
//! 기대 수익률은 변동성(ATR 또는 고가-저가 범위)을 심리에 따라 스케일링합니다.
//!
//! # 강도 점수 규칙
//!
//! | 조건 | 점수 |
//! |------|------|
//! | 종가 > 단기 EMA > 장기 EMA | +10 |
//! | 종가 < 단기 EMA < 장기 EMA | -10 |
//! | RSI > 70 | -5 |
//! | RSI < 30 | +5 |
//! | MACD > 시그널, MACD > 0 | +7 |
//! | MACD < 시그널, MACD < 0 | -7 |
//! | 밴드 폭 < 10% | -5 |
//! | 밴드 폭 > 30% | +5 |
//! | 저항선 또는 VAH 상향 돌파 | +8 |
//! | 지지선 또는 VAL 하향 이탈 | -8 |

use coinlens_core::{
    AnalysisResult, Sentiment, Signal, MAX_POTENTIAL_ROI, MAX_SIGNAL_STRENGTH,
    MIN_SIGNAL_STRENGTH,
};
use tracing::debug;

use crate::config::{AnalyzerConfig, ScoringParams};
use crate::enrichment::{EnrichedCandle, EnrichedSeries};

/// 강도 점수 시작값.
pub const BASE_STRENGTH: f64 = 50.0;

/// ATR이 없을 때 고가-저가 평균을 구하는 캔들 수.
const RANGE_WINDOW: usize = 14;

const TREND_WEIGHT: f64 = 10.0;
const RSI_WEIGHT: f64 = 5.0;
const MACD_WEIGHT: f64 = 7.0;
const BAND_WIDTH_WEIGHT: f64 = 5.0;
const BREAKOUT_WEIGHT: f64 = 8.0;

const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;
const RSI_MIDLINE: f64 = 50.0;

/// 종가 대비 이 비율 이하의 MACD-시그널 차이는 0으로 취급.
const MACD_TOLERANCE_RATIO: f64 = 1e-9;

/// 심리 설명 문구.
pub fn sentiment_description(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Bullish => {
            "Multiple indicators suggest a bullish trend. Price is above key moving averages with positive momentum."
        }
        Sentiment::Bearish => {
            "Multiple indicators suggest a bearish trend. Price is below key moving averages with negative momentum."
        }
        Sentiment::Neutral => {
            "Mixed signals from different indicators. The market appears to be in a consolidation phase."
        }
    }
}

/// 강도 점수 설명 문구.
pub fn signal_description(strength: f64) -> &'static str {
    if strength > 70.0 {
        "Strong confluence of multiple indicators suggesting high probability setup."
    } else if strength > 50.0 {
        "Moderate signal strength with some confirming indicators."
    } else {
        "Weak signal strength. Consider waiting for more confirmation."
    }
}

/// 강도 점수와 반영된 근거.
#[derive(Debug, Clone, PartialEq)]
pub struct StrengthScore {
    /// 0 ~ 100
    pub score: f64,
    pub reasons: Vec<String>,
}

impl StrengthScore {
    fn new() -> Self {
        Self {
            score: BASE_STRENGTH,
            reasons: Vec::new(),
        }
    }

    fn apply(&mut self, delta: f64, reason: &str) {
        self.score += delta;
        self.reasons.push(format!("{reason} ({delta:+})"));
    }
}

/// 심리/강도/기대 수익률 계산기.
#[derive(Debug, Clone, Default)]
pub struct MarketScorer {
    params: ScoringParams,
}

impl MarketScorer {
    pub fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.scoring)
    }

    /// 최신 캔들로 시장 심리를 판정합니다.
    ///
    /// MACD 확인이 켜져 있으면 강세는 MACD가 시그널 아래에 있지 않을 때,
    /// 약세는 위에 있지 않을 때만 인정합니다.
    /// 필요한 지표 중 하나라도 정의되지 않으면 중립입니다.
    pub fn sentiment(&self, latest: &EnrichedCandle) -> Sentiment {
        let (Some(fast), Some(slow), Some(rsi)) = (latest.ema_fast, latest.ema_slow, latest.rsi)
        else {
            return Sentiment::Neutral;
        };
        let close = latest.close();

        // 부동소수점 오차 수준의 차이는 같은 값으로 본다
        let tolerance = close.abs() * MACD_TOLERANCE_RATIO;
        let macd_diff = match (latest.macd, latest.macd_signal) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        };
        let macd_confirms = |bullish: bool| {
            if !self.params.require_macd_confirmation {
                return true;
            }
            match macd_diff {
                Some(d) if bullish => d >= -tolerance,
                Some(d) => d <= tolerance,
                None => false,
            }
        };

        if close > fast && fast > slow && rsi > RSI_MIDLINE && macd_confirms(true) {
            Sentiment::Bullish
        } else if close < fast && fast < slow && rsi < RSI_MIDLINE && macd_confirms(false) {
            Sentiment::Bearish
        } else {
            Sentiment::Neutral
        }
    }

    /// 강도 점수를 계산합니다. 결과는 `[0, 100]`으로 제한됩니다.
    pub fn strength(&self, series: &EnrichedSeries) -> StrengthScore {
        let mut score = StrengthScore::new();
        let Some(latest) = series.latest() else {
            return score;
        };
        let close = latest.close();

        if let (Some(fast), Some(slow)) = (latest.ema_fast, latest.ema_slow) {
            if close > fast && fast > slow {
                score.apply(TREND_WEIGHT, "Price above rising moving averages");
            } else if close < fast && fast < slow {
                score.apply(-TREND_WEIGHT, "Price below falling moving averages");
            }
        }

        if let Some(rsi) = latest.rsi {
            if rsi > RSI_OVERBOUGHT {
                score.apply(-RSI_WEIGHT, "RSI overbought");
            } else if rsi < RSI_OVERSOLD {
                score.apply(RSI_WEIGHT, "RSI oversold");
            }
        }

        if let (Some(macd), Some(signal)) = (latest.macd, latest.macd_signal) {
            if macd > signal && macd > 0.0 {
                score.apply(MACD_WEIGHT, "MACD above signal line in positive territory");
            } else if macd < signal && macd < 0.0 {
                score.apply(-MACD_WEIGHT, "MACD below signal line in negative territory");
            }
        }

        if let Some(width) = latest.bb_width {
            if width < self.params.narrow_band_width {
                score.apply(-BAND_WIDTH_WEIGHT, "Narrow Bollinger Bands");
            } else if width > self.params.wide_band_width {
                score.apply(BAND_WIDTH_WEIGHT, "Wide Bollinger Bands");
            }
        }

        if let Some(prev) = series.previous() {
            let (prev_close, levels, area) = (
                prev.close(),
                series.support_resistance(),
                series.value_area(),
            );
            let broke_up = |level: f64| prev_close <= level && close > level;
            let broke_down = |level: f64| prev_close >= level && close < level;

            if levels.nearest_resistance().is_some_and(broke_up)
                || area.is_some_and(|a| broke_up(a.high))
            {
                score.apply(BREAKOUT_WEIGHT, "Breakout above resistance");
            }
            if levels.nearest_support().is_some_and(broke_down)
                || area.is_some_and(|a| broke_down(a.low))
            {
                score.apply(-BREAKOUT_WEIGHT, "Breakdown below support");
            }
        }

        score.score = score.score.clamp(MIN_SIGNAL_STRENGTH, MAX_SIGNAL_STRENGTH);
        score
    }

    /// 최신 종가 대비 변동성(%)을 계산합니다.
    ///
    /// ATR이 정의되어 있으면 ATR을, 아니면 최근 14개 캔들의 고가-저가 평균을 사용합니다.
    pub fn volatility_percent(&self, series: &EnrichedSeries) -> f64 {
        let Some(latest) = series.latest() else {
            return 0.0;
        };
        let close = latest.close();
        if close <= 0.0 {
            return 0.0;
        }

        let range = latest.atr.unwrap_or_else(|| {
            let candles = series.as_slice();
            let window = &candles[candles.len().saturating_sub(RANGE_WINDOW)..];
            window.iter().map(|c| c.candle.range()).sum::<f64>() / window.len() as f64
        });

        range / close * 100.0
    }

    /// 기대 수익률(%)을 계산합니다. 결과는 `[-5, 5]`로 제한됩니다.
    pub fn potential_roi(&self, sentiment: Sentiment, series: &EnrichedSeries) -> f64 {
        let vol = self.volatility_percent(series);
        let roi = match sentiment {
            Sentiment::Bullish => 2.0 + vol * 0.5,
            Sentiment::Bearish => -2.0 - vol * 0.5,
            Sentiment::Neutral => vol * 0.3,
        };
        roi.clamp(-MAX_POTENTIAL_ROI, MAX_POTENTIAL_ROI)
    }

    /// 보강 시계열과 신호 목록으로 최종 분석 결과를 만듭니다.
    pub fn assess(&self, series: &EnrichedSeries, signals: Vec<Signal>) -> AnalysisResult {
        let sentiment = series
            .latest()
            .map(|latest| self.sentiment(latest))
            .unwrap_or_default();
        let strength = self.strength(series);
        let roi = self.potential_roi(sentiment, series);

        debug!(
            %sentiment,
            strength = strength.score,
            potential_roi = roi,
            reasons = strength.reasons.len(),
            "점수 계산 완료"
        );

        AnalysisResult::new(
            sentiment,
            sentiment_description(sentiment),
            strength.score,
            signal_description(strength.score),
            roi,
            signals,
        )
        .with_reasons(strength.reasons)
    }
}
