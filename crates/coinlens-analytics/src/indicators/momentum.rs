//! 모멘텀 지표 (Momentum Indicators).
//!
//! 가격 모멘텀과 과매수/과매도 상태를 측정하는 지표들을 제공합니다.
//! - RSI (Relative Strength Index)
//! - Stochastic Oscillator

use serde::{Deserialize, Serialize};

use super::{ensure_period, ensure_same_len, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 스토캐스틱 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticParams {
    /// %K 기간 (기본: 14).
    pub k_period: usize,
    /// %D 기간 (smoothing, 기본: 3).
    pub d_period: usize,
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
        }
    }
}

/// 스토캐스틱 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StochasticResult {
    /// %K (Fast Stochastic).
    pub k: Option<f64>,
    /// %D (Slow Stochastic, %K의 이동평균).
    pub d: Option<f64>,
}

/// 상승/하락이 모두 없는 구간의 RSI (중립).
const NEUTRAL_RSI: f64 = 50.0;

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭
    ///
    /// Wilder 평활을 사용합니다. 첫 평균은 처음 `period`개 변화량의 단순 평균이고,
    /// 이후 평균 = (이전 평균 × (period - 1) + 현재 변화량) / period 입니다.
    ///
    /// - 평균 하락폭이 0이고 평균 상승폭이 양수이면 100
    /// - 평균 상승폭과 하락폭이 모두 0이면 50 (중립)
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들 (처음 `period`개는 None)
    pub fn rsi(&self, prices: &[f64], params: RsiParams) -> IndicatorResult<Vec<Option<f64>>> {
        let period = params.period;
        ensure_period("RSI", period)?;

        let mut result = vec![None; prices.len()];
        if prices.len() <= period {
            return Ok(result);
        }

        // 가격 변화를 상승/하락으로 분리 (인덱스 i는 prices[i] - prices[i-1])
        let (gains, losses): (Vec<f64>, Vec<f64>) = prices
            .windows(2)
            .map(|w| {
                let delta = w[1] - w[0];
                (delta.max(0.0), (-delta).max(0.0))
            })
            .unzip();

        let period_f = period as f64;
        let mut avg_gain = gains[..period].iter().sum::<f64>() / period_f;
        let mut avg_loss = losses[..period].iter().sum::<f64>() / period_f;
        result[period] = Some(Self::rsi_value(avg_gain, avg_loss));

        for i in period..gains.len() {
            avg_gain = (avg_gain * (period_f - 1.0) + gains[i]) / period_f;
            avg_loss = (avg_loss * (period_f - 1.0) + losses[i]) / period_f;
            result[i + 1] = Some(Self::rsi_value(avg_gain, avg_loss));
        }

        Ok(result)
    }

    /// 평균 상승폭/하락폭으로 RSI 값을 계산합니다.
    fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            if avg_gain == 0.0 {
                NEUTRAL_RSI
            } else {
                100.0
            }
        } else {
            let rs = avg_gain / avg_loss;
            (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
        }
    }

    /// 스토캐스틱 오실레이터 계산.
    ///
    /// %K = (현재가 - 최저가) / (최고가 - 최저가) × 100
    /// %D = %K의 이동평균
    ///
    /// 최고가와 최저가가 같으면 %K는 50(중립)입니다.
    ///
    /// # 반환
    /// %K, %D 값들 (%K는 k_period-1, %D는 k_period+d_period-2 인덱스부터 정의)
    pub fn stochastic(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
        params: StochasticParams,
    ) -> IndicatorResult<Vec<StochasticResult>> {
        ensure_period("스토캐스틱 %K", params.k_period)?;
        ensure_period("스토캐스틱 %D", params.d_period)?;
        let len = ensure_same_len(&[high, low, close])?;

        // %K 계산
        let k_values: Vec<Option<f64>> = (0..len)
            .map(|i| {
                if i + 1 < params.k_period {
                    return None;
                }
                let start = i + 1 - params.k_period;
                let highest = high[start..=i].iter().copied().fold(f64::MIN, f64::max);
                let lowest = low[start..=i].iter().copied().fold(f64::MAX, f64::min);

                let range = highest - lowest;
                if range <= 0.0 {
                    Some(50.0) // 범위가 0이면 중립값
                } else {
                    Some(((close[i] - lowest) / range * 100.0).clamp(0.0, 100.0))
                }
            })
            .collect();

        // %D 계산 (%K의 이동평균, 창 전체가 정의된 경우만)
        let result = (0..len)
            .map(|i| {
                let d = if i + 1 < params.d_period {
                    None
                } else {
                    let window = &k_values[i + 1 - params.d_period..=i];
                    window
                        .iter()
                        .copied()
                        .sum::<Option<f64>>()
                        .map(|sum| sum / params.d_period as f64)
                };
                StochasticResult { k: k_values[i], d }
            })
            .collect();

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_prices() -> Vec<f64> {
        vec![
            100.0, 102.0, 101.0, 103.0, 105.0, 104.0, 106.0, 108.0, 107.0, 109.0, 111.0, 110.0,
            112.0, 114.0, 113.0, 115.0,
        ]
    }

    #[test]
    fn test_rsi_calculation() {
        let momentum = MomentumCalculator::new();
        let prices = sample_prices();

        let rsi = momentum.rsi(&prices, RsiParams { period: 14 }).unwrap();

        assert_eq!(rsi.len(), prices.len());
        // 처음 14개는 None
        assert!(rsi[..14].iter().all(Option::is_none));
        assert!(rsi[14].is_some());

        // RSI 값이 0-100 범위
        for value in rsi.iter().flatten() {
            assert!((0.0..=100.0).contains(value));
        }
    }

    #[test]
    fn test_rsi_wilder_first_value() {
        let momentum = MomentumCalculator::new();
        // 변화량: +2, -1, +2 → 평균 상승 4/3, 평균 하락 1/3, RS = 4
        let prices = [10.0, 12.0, 11.0, 13.0];

        let rsi = momentum.rsi(&prices, RsiParams { period: 3 }).unwrap();

        assert_eq!(rsi[..3], [None, None, None]);
        assert!((rsi[3].unwrap() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_bullish_market() {
        let momentum = MomentumCalculator::new();

        // 계속 상승하는 시장: 하락폭이 없으므로 100
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();

        let rsi = momentum.rsi(&prices, RsiParams { period: 14 }).unwrap();
        assert_eq!(rsi[19], Some(100.0));
    }

    #[test]
    fn test_rsi_flat_market_is_neutral() {
        let momentum = MomentumCalculator::new();
        let prices = vec![100.0; 30];

        let rsi = momentum.rsi(&prices, RsiParams::default()).unwrap();
        assert!(rsi[14..].iter().all(|v| *v == Some(50.0)));
    }

    #[test]
    fn test_rsi_short_input() {
        let momentum = MomentumCalculator::new();
        let rsi = momentum.rsi(&[1.0; 14], RsiParams { period: 14 }).unwrap();
        assert_eq!(rsi.len(), 14);
        assert!(rsi.iter().all(Option::is_none));
    }

    #[test]
    fn test_stochastic_calculation() {
        let momentum = MomentumCalculator::new();

        let high: Vec<f64> = (0..20).map(|i| 105.0 + i as f64).collect();
        let low: Vec<f64> = (0..20).map(|i| 95.0 + i as f64).collect();
        let close: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();

        let stoch = momentum
            .stochastic(&high, &low, &close, StochasticParams::default())
            .unwrap();

        // 결과 길이 확인
        assert_eq!(stoch.len(), 20);
        assert!(stoch[12].k.is_none());
        assert!(stoch[13].k.is_some());
        assert!(stoch[14].d.is_none());
        assert!(stoch[15].d.is_some());

        // %K, %D 값이 0-100 범위
        for s in &stoch {
            if let Some(k) = s.k {
                assert!((0.0..=100.0).contains(&k));
            }
            if let Some(d) = s.d {
                assert!((0.0..=100.0).contains(&d));
            }
        }
    }

    #[test]
    fn test_stochastic_flat_range_is_neutral() {
        let momentum = MomentumCalculator::new();
        let flat = vec![100.0; 20];

        let stoch = momentum
            .stochastic(&flat, &flat, &flat, StochasticParams::default())
            .unwrap();

        assert_eq!(stoch[19].k, Some(50.0));
        assert_eq!(stoch[19].d, Some(50.0));
    }

    #[test]
    fn test_stochastic_length_mismatch() {
        let momentum = MomentumCalculator::new();
        let result = momentum.stochastic(&[1.0, 2.0], &[1.0], &[1.0, 2.0], StochasticParams::default());
        assert!(result.is_err());
    }
}
