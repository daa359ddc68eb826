//! 이동평균 계열 지표: SMA, EMA, MACD.
//!
//! EMA는 첫 `period`개 값의 SMA로 시작하므로 SMA와 같은 시점부터 값이 생깁니다.
//! MACD는 두 EMA가 모두 정의된 시점부터, 시그널은 그 뒤 `signal_period - 1`개 이후부터 정의됩니다.

use serde::{Deserialize, Serialize};

use super::{ensure_period, IndicatorResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmaParams {
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaParams {
    /// 평활 기간 (k = 2 / (period + 1))
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub fast_period: usize,
    pub slow_period: usize,
    /// MACD 라인에 적용할 EMA 기간
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// 한 시점의 MACD 값. `histogram == macd - signal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균. 인덱스 `i`의 값은 `prices[i + 1 - period..=i]`의 평균입니다.
    pub fn sma(&self, prices: &[f64], params: SmaParams) -> IndicatorResult<Vec<Option<f64>>> {
        ensure_period("SMA", params.period)?;

        let mut sma = vec![None; prices.len()];
        for (offset, window) in prices.windows(params.period).enumerate() {
            sma[offset + params.period - 1] = Some(window.iter().sum::<f64>() / params.period as f64);
        }

        Ok(sma)
    }

    /// 지수 이동평균 (SMA 시드, k = 2 / (period + 1)).
    pub fn ema(&self, prices: &[f64], params: EmaParams) -> IndicatorResult<Vec<Option<f64>>> {
        let period = params.period;
        ensure_period("EMA", period)?;

        let mut result = vec![None; prices.len()];
        if prices.len() < period {
            return Ok(result);
        }

        let multiplier = 2.0 / (period as f64 + 1.0);

        let mut prev_ema = prices[..period].iter().sum::<f64>() / period as f64;
        result[period - 1] = Some(prev_ema);

        // p*k + e*(1-k) 와 같은 값이지만 평탄한 구간에서 오차가 생기지 않는 형태
        for (i, price) in prices.iter().enumerate().skip(period) {
            prev_ema += multiplier * (price - prev_ema);
            result[i] = Some(prev_ema);
        }

        Ok(result)
    }

    /// MACD (단기 EMA - 장기 EMA), 시그널 (MACD의 EMA), 히스토그램.
    pub fn macd(&self, prices: &[f64], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        ensure_period("MACD 단기", params.fast_period)?;
        ensure_period("MACD 장기", params.slow_period)?;
        ensure_period("MACD 시그널", params.signal_period)?;

        let fast_ema = self.ema(
            prices,
            EmaParams {
                period: params.fast_period,
            },
        )?;
        let slow_ema = self.ema(
            prices,
            EmaParams {
                period: params.slow_period,
            },
        )?;

        let macd_line: Vec<Option<f64>> = fast_ema
            .iter()
            .zip(&slow_ema)
            .map(|(fast, slow)| match (fast, slow) {
                (Some(f), Some(s)) => Some(f - s),
                _ => None,
            })
            .collect();

        // 시그널 라인 계산 (정의된 MACD 값들의 EMA)
        let macd_values: Vec<f64> = macd_line.iter().flatten().copied().collect();
        let signal_ema = self.ema(
            &macd_values,
            EmaParams {
                period: params.signal_period,
            },
        )?;

        // 정의된 MACD 값 순서대로 시그널을 붙임
        let mut signals = signal_ema.into_iter();
        let result = macd_line
            .into_iter()
            .map(|line| match line {
                Some(macd) => {
                    let signal = signals.next().flatten();
                    MacdResult {
                        macd: Some(macd),
                        signal,
                        histogram: signal.map(|s| macd - s),
                    }
                }
                None => MacdResult::default(),
            })
            .collect();

        Ok(result)
    }
}
