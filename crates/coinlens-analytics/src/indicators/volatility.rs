//! 볼린저 밴드와 ATR.
//!
//! 두 지표 모두 입력과 같은 길이의 벡터를 반환합니다. 볼린저 밴드는 마지막
//! `period`개 종가의 모표준편차를, ATR은 Wilder 평활을 사용합니다.

use serde::{Deserialize, Serialize};

use super::{ensure_period, ensure_same_len, IndicatorError, IndicatorResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerBandsParams {
    /// 중간선 SMA 기간 (기본: 20)
    pub period: usize,
    /// 밴드 폭 = 표준편차 × 이 값 (기본: 2.0)
    pub std_dev_multiplier: f64,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

/// 한 시점의 볼린저 밴드. 워밍업 구간에서는 모든 필드가 `None`입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    pub upper: Option<f64>,
    pub middle: Option<f64>,
    pub lower: Option<f64>,
    /// 밴드 안에서 종가의 상대 위치 (하단 0, 상단 1). 밴드 폭이 0이면 0.5.
    pub percent_b: Option<f64>,
    /// (upper - lower) / middle × 100
    pub width_percent: Option<f64>,
}

impl BollingerBandsResult {
    /// 구간 종가들과 현재가로 밴드를 계산합니다.
    fn from_window(window: &[f64], price: f64, k: f64) -> Self {
        let n = window.len() as f64;
        let middle = window.iter().sum::<f64>() / n;
        let variance = window.iter().map(|p| (p - middle).powi(2)).sum::<f64>() / n;
        let half_width = k * variance.max(0.0).sqrt();

        let upper = middle + half_width;
        let lower = middle - half_width;
        let percent_b = if upper > lower {
            (price - lower) / (upper - lower)
        } else {
            0.5
        };

        Self {
            upper: Some(upper),
            middle: Some(middle),
            lower: Some(lower),
            percent_b: Some(percent_b),
            width_percent: (middle != 0.0).then(|| (upper - lower) / middle * 100.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtrParams {
    /// 평활 기간 (기본: 14)
    pub period: usize,
}

impl Default for AtrParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 캔들별 True Range. 첫 캔들은 직전 종가가 없으므로 고가 - 저가입니다.
fn true_ranges(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    (0..high.len())
        .map(|i| {
            let range = high[i] - low[i];
            match i.checked_sub(1).map(|p| close[p]) {
                Some(prev) => range.max((high[i] - prev).abs()).max((low[i] - prev).abs()),
                None => range,
            }
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드.
    ///
    /// 배수가 0 이상이므로 값이 있는 모든 시점에서 upper >= middle >= lower 입니다.
    /// 처음 `period - 1`개는 비어 있습니다.
    pub fn bollinger_bands(
        &self,
        prices: &[f64],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        ensure_period("볼린저 밴드", params.period)?;

        let k = params.std_dev_multiplier;
        if !k.is_finite() || k < 0.0 {
            return Err(IndicatorError::InvalidParameter(format!(
                "표준편차 배수는 0 이상의 유한한 수여야 합니다: {}",
                k
            )));
        }

        let mut bands = vec![BollingerBandsResult::default(); prices.len()];
        for (offset, window) in prices.windows(params.period).enumerate() {
            let i = offset + params.period - 1;
            bands[i] = BollingerBandsResult::from_window(window, prices[i], k);
        }

        Ok(bands)
    }

    /// Average True Range.
    ///
    /// 첫 값(인덱스 `period - 1`)은 True Range의 단순 평균이고, 이후는
    /// `atr = (atr × (period - 1) + tr) / period` 로 갱신합니다.
    pub fn atr(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<f64>>> {
        let period = params.period;
        ensure_period("ATR", period)?;
        let len = ensure_same_len(&[high, low, close])?;

        let mut atr = vec![None; len];
        if len < period {
            return Ok(atr);
        }

        let tr = true_ranges(high, low, close);
        let n = period as f64;
        let mut current = tr[..period].iter().sum::<f64>() / n;
        atr[period - 1] = Some(current);

        for (i, value) in tr.iter().enumerate().skip(period) {
            current = (current * (n - 1.0) + value) / n;
            atr[i] = Some(current);
        }

        Ok(atr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 지그재그 상승 (+2, -1 반복) 20개.
    fn zigzag() -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..20)
            .map(|i| 100.0 + (i / 2) as f64 * 3.0 + if i % 2 == 1 { 2.0 } else { 0.0 })
            .collect();
        let high = close.iter().map(|c| c + 2.0).collect();
        let low = close.iter().map(|c| c - 2.0).collect();
        (high, low, close)
    }

    #[test]
    fn test_true_range_uses_previous_close() {
        // 갭 상승: 직전 종가 90, 당일 100 ~ 104
        let tr = true_ranges(&[95.0, 104.0], &[85.0, 100.0], &[90.0, 102.0]);
        assert_eq!(tr, vec![10.0, 14.0]);
    }

    #[test]
    fn test_bollinger_warmup_and_ordering() {
        let (_, _, close) = zigzag();
        let params = BollingerBandsParams {
            period: 10,
            ..Default::default()
        };

        let bb = VolatilityIndicators::new().bollinger_bands(&close, params).unwrap();
        assert_eq!(bb.len(), close.len());
        assert_eq!(bb[8], BollingerBandsResult::default());
        assert!(bb[9].upper.is_some() && bb[9].lower.is_some());

        let (u, m, l) = (
            bb[15].upper.unwrap(),
            bb[15].middle.unwrap(),
            bb[15].lower.unwrap(),
        );
        assert!(u > m);
        assert!(m > l);
        assert!((bb[15].width_percent.unwrap() - (u - l) / m * 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_bollinger_flat_series_collapses() {
        let volatility = VolatilityIndicators::new();
        let prices = vec![100.0; 25];

        let bb = volatility
            .bollinger_bands(&prices, BollingerBandsParams::default())
            .unwrap();

        let last = bb[24];
        assert_eq!(last.upper, Some(100.0));
        assert_eq!(last.middle, Some(100.0));
        assert_eq!(last.lower, Some(100.0));
        assert_eq!(last.percent_b, Some(0.5));
        assert_eq!(last.width_percent, Some(0.0));
    }

    #[test]
    fn test_bollinger_rejects_negative_multiplier() {
        let volatility = VolatilityIndicators::new();
        let params = BollingerBandsParams {
            period: 20,
            std_dev_multiplier: -1.0,
        };
        assert!(volatility.bollinger_bands(&[1.0; 30], params).is_err());
    }

    #[test]
    fn test_atr_warmup_and_sign() {
        let (high, low, close) = zigzag();
        let atr = VolatilityIndicators::new()
            .atr(&high, &low, &close, AtrParams::default())
            .unwrap();

        assert_eq!(atr.len(), close.len());
        assert_eq!(atr.iter().position(Option::is_some), Some(13));
        assert!(atr.iter().flatten().all(|v| *v > 0.0));
    }

    #[test]
    fn test_atr_constant_range() {
        let volatility = VolatilityIndicators::new();
        // 갭 없는 동일 범위 캔들: 모든 TR = 4
        let close = vec![100.0; 20];
        let high = vec![102.0; 20];
        let low = vec![98.0; 20];

        let atr = volatility
            .atr(&high, &low, &close, AtrParams::default())
            .unwrap();

        assert!(atr[13..].iter().all(|v| *v == Some(4.0)));
    }

    #[test]
    fn test_atr_short_input() {
        let volatility = VolatilityIndicators::new();
        let atr = volatility
            .atr(&[2.0; 5], &[1.0; 5], &[1.5; 5], AtrParams::default())
            .unwrap();
        assert_eq!(atr, vec![None; 5]);
    }
}
