//! 지표 보강 단계.
//!
//! 원본 캔들 시계열에 지표 값을 붙여 하나의 정렬된 시계열(`EnrichedSeries`)을 만듭니다.
//! 각 지표 벡터는 캔들 수와 길이가 같아야 하며, 다르면 `AnalysisError::Misaligned`로 실패합니다.
//! 구간 단위 값(피보나치, 지지/저항, Value Area)은 캔들마다 복사하지 않고 시계열에 한 번만 저장합니다.

use coinlens_core::{Candle, CandleSeries};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, AnalyzerResult};
use crate::indicators::{FibonacciLevel, IndicatorEngine};
use crate::support_resistance::{SupportResistanceDetector, SupportResistanceLevels};
use crate::volume_profile::{ValueArea, VolumeProfileCalculator};

/// 지표가 붙은 캔들.
///
/// 워밍업 구간의 지표는 `None`입니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnrichedCandle {
    /// 원본 시계열에서의 위치
    pub index: usize,
    #[serde(flatten)]
    pub candle: Candle,
    /// 단기 EMA (기본 20)
    pub ema_fast: Option<f64>,
    /// 장기 EMA (기본 50)
    pub ema_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    /// 볼린저 밴드 폭 (%)
    pub bb_width: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    /// 추세 강도 휴리스틱 (10 ~ 60)
    pub trend_strength: Option<f64>,
    pub atr: Option<f64>,
    pub obv: f64,
    pub tenkan: Option<f64>,
    pub kijun: Option<f64>,
    pub senkou_a: Option<f64>,
    pub senkou_b: Option<f64>,
}

impl EnrichedCandle {
    pub fn time(&self) -> i64 {
        self.candle.time
    }

    pub fn close(&self) -> f64 {
        self.candle.close
    }
}

/// 지표가 보강된 캔들 시계열.
///
/// 항상 원본 캔들과 같은 길이와 순서를 가지며 비어 있지 않습니다.
/// `Enricher`로만 만들 수 있으며 출력용 직렬화만 지원합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedSeries {
    candles: Vec<EnrichedCandle>,
    fibonacci: Vec<FibonacciLevel>,
    levels: SupportResistanceLevels,
    value_area: Option<ValueArea>,
}

impl EnrichedSeries {
    /// 캔들 수.
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 인덱스로 조회.
    pub fn get(&self, index: usize) -> Option<&EnrichedCandle> {
        self.candles.get(index)
    }

    /// 가장 최근 캔들.
    pub fn latest(&self) -> Option<&EnrichedCandle> {
        self.candles.last()
    }

    /// 최근 캔들 직전 캔들 (캔들이 1개면 None).
    pub fn previous(&self) -> Option<&EnrichedCandle> {
        self.candles.len().checked_sub(2).and_then(|i| self.candles.get(i))
    }

    /// 캔들 시간(epoch 밀리초)으로 조회.
    pub fn find_by_time(&self, time: i64) -> Option<&EnrichedCandle> {
        self.candles
            .binary_search_by_key(&time, |c| c.candle.time)
            .ok()
            .map(|i| &self.candles[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnrichedCandle> {
        self.candles.iter()
    }

    pub fn as_slice(&self) -> &[EnrichedCandle] {
        &self.candles
    }

    /// 구간 전체 기준 피보나치 레벨.
    pub fn fibonacci_levels(&self) -> &[FibonacciLevel] {
        &self.fibonacci
    }

    /// 지지/저항 레벨.
    pub fn support_resistance(&self) -> &SupportResistanceLevels {
        &self.levels
    }

    /// Value Area (비활성화되었거나 계산 불가하면 None).
    pub fn value_area(&self) -> Option<ValueArea> {
        self.value_area
    }

    /// 구성 요소를 직접 지정해 만듭니다 (점수/신호 테스트용).
    #[cfg(test)]
    pub(crate) fn from_parts(
        candles: Vec<EnrichedCandle>,
        levels: SupportResistanceLevels,
        value_area: Option<ValueArea>,
    ) -> Self {
        Self {
            candles,
            fibonacci: Vec::new(),
            levels,
            value_area,
        }
    }
}

impl<'a> IntoIterator for &'a EnrichedSeries {
    type Item = &'a EnrichedCandle;
    type IntoIter = std::slice::Iter<'a, EnrichedCandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}

/// 지표 길이가 캔들 수와 같은지 확인합니다.
fn ensure_aligned(indicator: &'static str, expected: usize, actual: usize) -> AnalyzerResult<()> {
    if expected != actual {
        return Err(AnalysisError::Misaligned {
            indicator,
            expected,
            actual,
        });
    }
    Ok(())
}

/// 보강 단계 실행기.
#[derive(Debug, Default)]
pub struct Enricher {
    engine: IndicatorEngine,
    config: AnalyzerConfig,
}

impl Enricher {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            engine: IndicatorEngine::new(),
            config,
        }
    }

    /// 가장 긴 워밍업 기간 (이보다 짧은 구간은 일부 지표가 정의되지 않음).
    pub fn longest_warmup(&self) -> usize {
        let c = &self.config;
        [
            c.ema_slow.period,
            c.macd.slow_period + c.macd.signal_period - 1,
            c.bollinger.period,
            c.rsi.period + 1,
            c.ichimoku.senkou_b_period,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// 캔들 시계열에 지표를 보강합니다.
    pub fn enrich(&self, series: &CandleSeries) -> AnalyzerResult<EnrichedSeries> {
        let c = &self.config;
        let n = series.len();
        let closes = series.closes();
        let highs = series.highs();
        let lows = series.lows();
        let volumes = series.volumes();

        if n < self.longest_warmup() {
            warn!(
                candles = n,
                warmup = self.longest_warmup(),
                "캔들 수가 워밍업 기간보다 적어 일부 지표가 정의되지 않습니다"
            );
        }

        let ema_fast = self.engine.ema(&closes, c.ema_fast)?;
        ensure_aligned("EMA (fast)", n, ema_fast.len())?;
        let ema_slow = self.engine.ema(&closes, c.ema_slow)?;
        ensure_aligned("EMA (slow)", n, ema_slow.len())?;
        let rsi = self.engine.rsi(&closes, c.rsi)?;
        ensure_aligned("RSI", n, rsi.len())?;
        let macd = self.engine.macd(&closes, c.macd)?;
        ensure_aligned("MACD", n, macd.len())?;
        let bands = self.engine.bollinger_bands(&closes, c.bollinger)?;
        ensure_aligned("Bollinger Bands", n, bands.len())?;
        let stoch = self.engine.stochastic(&highs, &lows, &closes, c.stochastic)?;
        ensure_aligned("Stochastic", n, stoch.len())?;
        let strength = self.engine.trend_strength(&closes, c.trend_strength)?;
        ensure_aligned("Trend Strength", n, strength.len())?;
        let atr = self.engine.atr(&highs, &lows, &closes, c.atr)?;
        ensure_aligned("ATR", n, atr.len())?;
        let obv = self.engine.obv(&closes, &volumes, c.obv)?;
        ensure_aligned("OBV", n, obv.len())?;
        let ichimoku = self.engine.ichimoku(&highs, &lows, c.ichimoku)?;
        ensure_aligned("Ichimoku", n, ichimoku.len())?;

        let fibonacci = self.engine.fibonacci_levels(&highs, &lows)?;
        let levels =
            SupportResistanceDetector::new(c.support_resistance.clone()).detect(series.as_slice())?;
        let value_area = if c.value_area.enabled {
            VolumeProfileCalculator::from_params(&c.value_area)
                .calculate(series.as_slice())
                .map(|profile| profile.value_area())
        } else {
            None
        };

        let candles = series
            .iter()
            .enumerate()
            .map(|(i, candle)| EnrichedCandle {
                index: i,
                candle: *candle,
                ema_fast: ema_fast[i],
                ema_slow: ema_slow[i],
                rsi: rsi[i],
                macd: macd[i].macd,
                macd_signal: macd[i].signal,
                macd_histogram: macd[i].histogram,
                bb_upper: bands[i].upper,
                bb_middle: bands[i].middle,
                bb_lower: bands[i].lower,
                bb_width: bands[i].width_percent,
                stoch_k: stoch[i].k,
                stoch_d: stoch[i].d,
                trend_strength: strength[i],
                atr: atr[i],
                obv: obv[i].obv,
                tenkan: ichimoku[i].tenkan,
                kijun: ichimoku[i].kijun,
                senkou_a: ichimoku[i].senkou_a,
                senkou_b: ichimoku[i].senkou_b,
            })
            .collect();

        debug!(
            candles = n,
            value_area = value_area.is_some(),
            "지표 보강 완료"
        );

        Ok(EnrichedSeries {
            candles,
            fibonacci,
            levels,
            value_area,
        })
    }
}
