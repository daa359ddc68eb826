//! 시장 분석 결과 타입.
//!
//! - `Sentiment` - 시장 심리 (강세/약세/중립)
//! - `AnalysisResult` - 심리, 신호 강도, 기대 수익률, 매매 신호 목록

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Signal;

/// 신호 강도 하한.
pub const MIN_SIGNAL_STRENGTH: f64 = 0.0;
/// 신호 강도 상한.
pub const MAX_SIGNAL_STRENGTH: f64 = 100.0;
/// 기대 수익률 절대값 상한 (%).
pub const MAX_POTENTIAL_ROI: f64 = 5.0;

/// 시장 심리.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    /// 강세
    Bullish,
    /// 약세
    Bearish,
    /// 중립 (혼조/횡보)
    #[default]
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Bullish => write!(f, "bullish"),
            Sentiment::Bearish => write!(f, "bearish"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

/// 종합 시장 분석 결과.
///
/// `signal_strength`는 항상 `[0, 100]`, `potential_roi`는 항상 `[-5, 5]` 범위입니다.
/// 역직렬화도 생성자를 거치므로 범위 밖 값은 제한됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnalysisResultData")]
pub struct AnalysisResult {
    sentiment: Sentiment,
    sentiment_description: String,
    signal_strength: f64,
    signal_description: String,
    potential_roi: f64,
    signals: Vec<Signal>,
    reasons: Vec<String>,
}

/// 역직렬화용 원시 필드.
#[derive(Deserialize)]
struct AnalysisResultData {
    sentiment: Sentiment,
    sentiment_description: String,
    signal_strength: f64,
    signal_description: String,
    potential_roi: f64,
    #[serde(default)]
    signals: Vec<Signal>,
    #[serde(default)]
    reasons: Vec<String>,
}

impl From<AnalysisResultData> for AnalysisResult {
    fn from(data: AnalysisResultData) -> Self {
        AnalysisResult::new(
            data.sentiment,
            data.sentiment_description,
            data.signal_strength,
            data.signal_description,
            data.potential_roi,
            data.signals,
        )
        .with_reasons(data.reasons)
    }
}

impl AnalysisResult {
    /// 분석 결과를 생성합니다. 강도와 수익률은 허용 범위로 제한됩니다.
    pub fn new(
        sentiment: Sentiment,
        sentiment_description: impl Into<String>,
        signal_strength: f64,
        signal_description: impl Into<String>,
        potential_roi: f64,
        signals: Vec<Signal>,
    ) -> Self {
        Self {
            sentiment,
            sentiment_description: sentiment_description.into(),
            signal_strength: clamp_or(signal_strength, MIN_SIGNAL_STRENGTH, MAX_SIGNAL_STRENGTH, 50.0),
            signal_description: signal_description.into(),
            potential_roi: clamp_or(potential_roi, -MAX_POTENTIAL_ROI, MAX_POTENTIAL_ROI, 0.0),
            signals,
            reasons: Vec::new(),
        }
    }

    /// 판단 근거 목록을 설정합니다.
    pub fn with_reasons(mut self, reasons: Vec<String>) -> Self {
        self.reasons = reasons;
        self
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    pub fn sentiment_description(&self) -> &str {
        &self.sentiment_description
    }

    /// 종합 신호 강도 (0 ~ 100).
    pub fn signal_strength(&self) -> f64 {
        self.signal_strength
    }

    pub fn signal_description(&self) -> &str {
        &self.signal_description
    }

    /// 기대 수익률 (%, -5 ~ 5).
    pub fn potential_roi(&self) -> f64 {
        self.potential_roi
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// 강도 점수에 반영된 판단 근거.
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }
}

/// 범위로 제한하되 NaN이면 기본값을 사용합니다.
fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_clamps_ranges() {
        let result = AnalysisResult::new(Sentiment::Bullish, "", 130.0, "", 9.5, vec![]);
        assert_eq!(result.signal_strength(), 100.0);
        assert_eq!(result.potential_roi(), 5.0);

        let result = AnalysisResult::new(Sentiment::Bearish, "", -20.0, "", -12.0, vec![]);
        assert_eq!(result.signal_strength(), 0.0);
        assert_eq!(result.potential_roi(), -5.0);
    }

    #[test]
    fn test_result_nan_falls_back() {
        let result = AnalysisResult::new(Sentiment::Neutral, "", f64::NAN, "", f64::NAN, vec![]);
        assert_eq!(result.signal_strength(), 50.0);
        assert_eq!(result.potential_roi(), 0.0);
    }

    #[test]
    fn test_deserialize_applies_clamp() {
        let json = r#"{
            "sentiment": "bullish",
            "sentiment_description": "",
            "signal_strength": 250.0,
            "signal_description": "",
            "potential_roi": -40.0,
            "reasons": ["Trend (+10)"]
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.sentiment(), Sentiment::Bullish);
        assert_eq!(result.signal_strength(), 100.0);
        assert_eq!(result.potential_roi(), -5.0);
        assert!(result.signals().is_empty());
        assert_eq!(result.reasons(), ["Trend (+10)"]);
    }

    #[test]
    fn test_sentiment_display() {
        assert_eq!(Sentiment::Bullish.to_string(), "bullish");
        assert_eq!(Sentiment::default(), Sentiment::Neutral);
    }
}
