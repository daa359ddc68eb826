//! 매매 신호 생성기.
//!
//! 보강된 시계열의 마지막 두 캔들을 비교하여 이산적인 교차/돌파 이벤트를 찾고,
//! 이벤트마다 하나의 신호를 만듭니다. 이벤트가 없으면 빈 목록을 반환합니다.
//!
//! | 지표 | 매수 | 매도 | 강도 | 목표/손절 |
//! |------|------|------|------|-----------|
//! | RSI | 30 상향 돌파 | 70 하향 돌파 | 75 | ±3% / ∓2% |
//! | MACD | 시그널 상향 교차 | 시그널 하향 교차 | 65 | ±2.5% / ∓1.5% |
//! | 볼린저 밴드 | 하단 밴드 반등 | 상단 밴드 거부 | 70 | 중간 밴드 / 밴드 ∓1% |
//! | EMA 교차 | 단기 > 장기 | 단기 < 장기 | 80 | ±3% / ∓2% |
//! | Value Area | VAH 상향 돌파 | VAL 하향 이탈 | 60 | Value Area 폭 / 반대 경계 |

use coinlens_core::Signal;
use coinlens_core::SignalSource;
use tracing::debug;

use crate::config::{AnalyzerConfig, SignalParams};
use crate::enrichment::{EnrichedCandle, EnrichedSeries};
use crate::volume_profile::ValueArea;

const RSI_STRENGTH: f64 = 75.0;
const MACD_STRENGTH: f64 = 65.0;
const BOLLINGER_STRENGTH: f64 = 70.0;
const EMA_STRENGTH: f64 = 80.0;
const VALUE_AREA_STRENGTH: f64 = 60.0;

/// 이전 값이 기준 아래에 있다가 현재 값이 기준 위로 올라섰는지 확인합니다.
///
/// 기준은 캔들마다 다를 수 있습니다 (예: 시그널 라인, 밴드).
/// 네 값 중 하나라도 정의되지 않으면 교차가 아닙니다.
fn crossed_above(
    prev: Option<f64>,
    prev_level: Option<f64>,
    curr: Option<f64>,
    curr_level: Option<f64>,
) -> bool {
    match (prev, prev_level, curr, curr_level) {
        (Some(p), Some(pl), Some(c), Some(cl)) => p < pl && c > cl,
        _ => false,
    }
}

/// 이전 값이 기준 위에 있다가 현재 값이 기준 아래로 내려갔는지 확인합니다.
fn crossed_below(
    prev: Option<f64>,
    prev_level: Option<f64>,
    curr: Option<f64>,
    curr_level: Option<f64>,
) -> bool {
    match (prev, prev_level, curr, curr_level) {
        (Some(p), Some(pl), Some(c), Some(cl)) => p > pl && c < cl,
        _ => false,
    }
}

/// 진입가 대비 비율로 목표가/손절가를 정한 신호.
fn percent_signal(
    signal: Signal,
    price: f64,
    strength: f64,
    target_pct: f64,
    stop_pct: f64,
    description: impl Into<String>,
) -> Signal {
    signal
        .with_strength(strength)
        .with_levels(price * (1.0 + target_pct / 100.0), price * (1.0 + stop_pct / 100.0))
        .with_potential_roi(target_pct.abs())
        .with_description(description)
}

/// 매매 신호 생성기.
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    params: SignalParams,
    value_area_enabled: bool,
}

impl SignalGenerator {
    pub fn new(params: SignalParams, value_area_enabled: bool) -> Self {
        Self {
            params,
            value_area_enabled,
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.signals, config.value_area.enabled)
    }

    /// 마지막 두 캔들에서 신호를 생성합니다.
    ///
    /// 캔들이 2개 미만이면 빈 목록입니다. 신호 순서는 RSI, MACD, 볼린저 밴드,
    /// EMA 교차, Value Area 순으로 고정입니다.
    pub fn generate(&self, series: &EnrichedSeries) -> Vec<Signal> {
        let (Some(prev), Some(curr)) = (series.previous(), series.latest()) else {
            return Vec::new();
        };

        let mut signals = Vec::new();
        signals.extend(self.rsi_signal(prev, curr));
        signals.extend(macd_signal(prev, curr));
        signals.extend(bollinger_signal(prev, curr));
        signals.extend(ema_signal(prev, curr));
        if self.value_area_enabled {
            if let Some(area) = series.value_area() {
                signals.extend(value_area_signal(prev, curr, area));
            }
        }

        debug!(count = signals.len(), time = curr.time(), "신호 생성 완료");
        signals
    }

    fn rsi_signal(&self, prev: &EnrichedCandle, curr: &EnrichedCandle) -> Option<Signal> {
        let oversold = Some(self.params.rsi_oversold);
        let overbought = Some(self.params.rsi_overbought);
        let (time, price) = (curr.time(), curr.close());

        if crossed_above(prev.rsi, oversold, curr.rsi, oversold) {
            Some(percent_signal(
                Signal::buy(SignalSource::Rsi, time, price),
                price,
                RSI_STRENGTH,
                3.0,
                -2.0,
                format!(
                    "RSI crossed above {}, indicating a potential reversal from oversold conditions.",
                    self.params.rsi_oversold
                ),
            ))
        } else if crossed_below(prev.rsi, overbought, curr.rsi, overbought) {
            Some(percent_signal(
                Signal::sell(SignalSource::Rsi, time, price),
                price,
                RSI_STRENGTH,
                -3.0,
                2.0,
                format!(
                    "RSI crossed below {}, indicating a potential reversal from overbought conditions.",
                    self.params.rsi_overbought
                ),
            ))
        } else {
            None
        }
    }
}

fn macd_signal(prev: &EnrichedCandle, curr: &EnrichedCandle) -> Option<Signal> {
    let (time, price) = (curr.time(), curr.close());

    if crossed_above(prev.macd, prev.macd_signal, curr.macd, curr.macd_signal) {
        Some(percent_signal(
            Signal::buy(SignalSource::Macd, time, price),
            price,
            MACD_STRENGTH,
            2.5,
            -1.5,
            "MACD line crossed above signal line, indicating bullish momentum.",
        ))
    } else if crossed_below(prev.macd, prev.macd_signal, curr.macd, curr.macd_signal) {
        Some(percent_signal(
            Signal::sell(SignalSource::Macd, time, price),
            price,
            MACD_STRENGTH,
            -2.5,
            1.5,
            "MACD line crossed below signal line, indicating bearish momentum.",
        ))
    } else {
        None
    }
}

/// 볼린저 밴드 반등/거부. 목표가는 중간 밴드, 손절가는 밴드 바깥 1%.
fn bollinger_signal(prev: &EnrichedCandle, curr: &EnrichedCandle) -> Option<Signal> {
    let (time, price) = (curr.time(), curr.close());
    let prev_close = Some(prev.close());
    let curr_close = Some(price);
    let middle = curr.bb_middle?;

    if crossed_above(prev_close, prev.bb_lower, curr_close, curr.bb_lower) {
        let lower = curr.bb_lower?;
        Some(
            Signal::buy(SignalSource::BollingerBands, time, price)
                .with_strength(BOLLINGER_STRENGTH)
                .with_levels(middle, lower * 0.99)
                .with_potential_roi((middle / price - 1.0) * 100.0)
                .with_description(
                    "Price bounced off the lower Bollinger Band, indicating potential reversal.",
                ),
        )
    } else if crossed_below(prev_close, prev.bb_upper, curr_close, curr.bb_upper) {
        let upper = curr.bb_upper?;
        Some(
            Signal::sell(SignalSource::BollingerBands, time, price)
                .with_strength(BOLLINGER_STRENGTH)
                .with_levels(middle, upper * 1.01)
                .with_potential_roi((1.0 - middle / price) * 100.0)
                .with_description(
                    "Price rejected at the upper Bollinger Band, indicating potential reversal.",
                ),
        )
    } else {
        None
    }
}

fn ema_signal(prev: &EnrichedCandle, curr: &EnrichedCandle) -> Option<Signal> {
    let (time, price) = (curr.time(), curr.close());

    if crossed_above(prev.ema_fast, prev.ema_slow, curr.ema_fast, curr.ema_slow) {
        Some(percent_signal(
            Signal::buy(SignalSource::EmaCrossover, time, price),
            price,
            EMA_STRENGTH,
            3.0,
            -2.0,
            "EMA 20 crossed above EMA 50, indicating a bullish trend change.",
        ))
    } else if crossed_below(prev.ema_fast, prev.ema_slow, curr.ema_fast, curr.ema_slow) {
        Some(percent_signal(
            Signal::sell(SignalSource::EmaCrossover, time, price),
            price,
            EMA_STRENGTH,
            -3.0,
            2.0,
            "EMA 20 crossed below EMA 50, indicating a bearish trend change.",
        ))
    } else {
        None
    }
}

/// Value Area 경계 돌파.
///
/// 경계에 정확히 닿았던 직전 캔들도 돌파 전으로 봅니다.
/// 목표가는 진입가 ± Value Area 폭, 손절가는 반대쪽 경계입니다.
fn value_area_signal(
    prev: &EnrichedCandle,
    curr: &EnrichedCandle,
    area: ValueArea,
) -> Option<Signal> {
    let (time, price) = (curr.time(), curr.close());
    let width = area.width();
    let roi = width / price * 100.0;

    if prev.close() <= area.high && price > area.high {
        Some(
            Signal::buy(SignalSource::ValueArea, time, price)
                .with_strength(VALUE_AREA_STRENGTH)
                .with_levels(price + width, area.low)
                .with_potential_roi(roi)
                .with_description(
                    "Price broke above the value area high, indicating acceptance at higher prices.",
                ),
        )
    } else if prev.close() >= area.low && price < area.low {
        Some(
            Signal::sell(SignalSource::ValueArea, time, price)
                .with_strength(VALUE_AREA_STRENGTH)
                .with_levels(price - width, area.high)
                .with_potential_roi(roi)
                .with_description(
                    "Price broke below the value area low, indicating acceptance at lower prices.",
                ),
        )
    } else {
        None
    }
}
