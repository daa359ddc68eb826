//! 분석 파이프라인의 매매 신호.
//!
//! 이 모듈은 신호 생성기가 만드는 매매 신호 관련 타입을 정의합니다:
//! - `SignalType` - 신호 방향 (매수/매도)
//! - `SignalSource` - 신호를 발생시킨 지표 종류
//! - `Signal` - 불변 매매 신호 엔티티

use serde::{Deserialize, Serialize};
use std::fmt;

/// 신호 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    /// 매수
    Buy,
    /// 매도
    Sell,
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalType::Buy => write!(f, "BUY"),
            SignalType::Sell => write!(f, "SELL"),
        }
    }
}

/// 신호를 발생시킨 지표.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    /// RSI 과매수/과매도 이탈
    Rsi,
    /// MACD 시그널 라인 교차
    Macd,
    /// 볼린저 밴드 반등/거부
    BollingerBands,
    /// 단기/장기 EMA 교차
    EmaCrossover,
    /// Value Area 경계 돌파
    ValueArea,
}

impl SignalSource {
    /// 표시용 지표 이름.
    pub fn name(&self) -> &'static str {
        match self {
            SignalSource::Rsi => "RSI",
            SignalSource::Macd => "MACD",
            SignalSource::BollingerBands => "Bollinger Bands",
            SignalSource::EmaCrossover => "EMA Crossover",
            SignalSource::ValueArea => "Value Area",
        }
    }
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 분석 결과에 포함되는 매매 신호.
///
/// 생성 이후에는 읽기 전용입니다. 필드는 접근자로만 노출됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    signal_type: SignalType,
    time: i64,
    price: f64,
    indicator: SignalSource,
    strength: f64,
    description: String,
    target_price: f64,
    stop_loss: f64,
    potential_roi: f64,
}

impl Signal {
    /// 새 신호를 생성합니다.
    ///
    /// 목표가/손절가는 진입가로 초기화되며 `with_levels`로 설정합니다.
    pub fn new(signal_type: SignalType, indicator: SignalSource, time: i64, price: f64) -> Self {
        Self {
            signal_type,
            time,
            price,
            indicator,
            strength: 50.0,
            description: String::new(),
            target_price: price,
            stop_loss: price,
            potential_roi: 0.0,
        }
    }

    /// 매수 신호를 생성합니다.
    pub fn buy(indicator: SignalSource, time: i64, price: f64) -> Self {
        Self::new(SignalType::Buy, indicator, time, price)
    }

    /// 매도 신호를 생성합니다.
    pub fn sell(indicator: SignalSource, time: i64, price: f64) -> Self {
        Self::new(SignalType::Sell, indicator, time, price)
    }

    /// 신호 강도를 설정합니다 (0 ~ 100으로 제한).
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength.clamp(0.0, 100.0);
        self
    }

    /// 설명을 설정합니다.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// 목표가와 손절가를 설정합니다.
    pub fn with_levels(mut self, target_price: f64, stop_loss: f64) -> Self {
        self.target_price = target_price;
        self.stop_loss = stop_loss;
        self
    }

    /// 기대 수익률(%)을 설정합니다.
    pub fn with_potential_roi(mut self, potential_roi: f64) -> Self {
        self.potential_roi = potential_roi;
        self
    }

    pub fn signal_type(&self) -> SignalType {
        self.signal_type
    }

    /// 신호 발생 캔들 시간 (epoch 밀리초).
    pub fn time(&self) -> i64 {
        self.time
    }

    /// 진입 가격.
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn indicator(&self) -> SignalSource {
        self.indicator
    }

    /// 표시용 지표 이름.
    pub fn indicator_name(&self) -> &'static str {
        self.indicator.name()
    }

    /// 신호 강도 (0 ~ 100).
    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn target_price(&self) -> f64 {
        self.target_price
    }

    pub fn stop_loss(&self) -> f64 {
        self.stop_loss
    }

    /// 목표가 기준 기대 수익률 (%).
    pub fn potential_roi(&self) -> f64 {
        self.potential_roi
    }

    /// 매수 신호인지 확인합니다.
    pub fn is_buy(&self) -> bool {
        self.signal_type == SignalType::Buy
    }

    /// 강한 신호인지 확인합니다 (강도 >= 70).
    pub fn is_strong(&self) -> bool {
        self.strength >= 70.0
    }
}
