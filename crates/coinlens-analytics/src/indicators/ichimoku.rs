//! 일목균형표 (Ichimoku Kinko Hyo).
//!
//! - 전환선 (Tenkan-sen): 단기 구간 (최고가 + 최저가) / 2
//! - 기준선 (Kijun-sen): 중기 구간 (최고가 + 최저가) / 2
//! - 선행스팬 A (Senkou Span A): (전환선 + 기준선) / 2
//! - 선행스팬 B (Senkou Span B): 장기 구간 (최고가 + 최저가) / 2
//!
//! 선행스팬은 미래 방향으로 이동시키지 않고 계산 시점에 정렬합니다.

use serde::{Deserialize, Serialize};

use super::{ensure_period, ensure_same_len, IndicatorResult};

/// 일목균형표 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IchimokuParams {
    /// 전환선 기간 (기본: 9).
    pub tenkan_period: usize,
    /// 기준선 기간 (기본: 26).
    pub kijun_period: usize,
    /// 선행스팬 B 기간 (기본: 52).
    pub senkou_b_period: usize,
}

impl Default for IchimokuParams {
    fn default() -> Self {
        Self {
            tenkan_period: 9,
            kijun_period: 26,
            senkou_b_period: 52,
        }
    }
}

/// 일목균형표 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IchimokuResult {
    /// 전환선.
    pub tenkan: Option<f64>,
    /// 기준선.
    pub kijun: Option<f64>,
    /// 선행스팬 A.
    pub senkou_a: Option<f64>,
    /// 선행스팬 B.
    pub senkou_b: Option<f64>,
}

/// 일목균형표 계산기.
#[derive(Debug, Default)]
pub struct IchimokuIndicator;

impl IchimokuIndicator {
    /// 새로운 일목균형표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 일목균형표 계산.
    ///
    /// 각 선은 자신의 참조 기간이 채워지기 전까지 None입니다.
    /// 선행스팬 A는 전환선과 기준선이 모두 정의된 시점부터 계산됩니다.
    pub fn calculate(
        &self,
        high: &[f64],
        low: &[f64],
        params: IchimokuParams,
    ) -> IndicatorResult<Vec<IchimokuResult>> {
        ensure_period("전환선", params.tenkan_period)?;
        ensure_period("기준선", params.kijun_period)?;
        ensure_period("선행스팬 B", params.senkou_b_period)?;
        let len = ensure_same_len(&[high, low])?;

        let result = (0..len)
            .map(|i| {
                let tenkan = midpoint(high, low, i, params.tenkan_period);
                let kijun = midpoint(high, low, i, params.kijun_period);
                let senkou_a = match (tenkan, kijun) {
                    (Some(t), Some(k)) => Some((t + k) / 2.0),
                    _ => None,
                };

                IchimokuResult {
                    tenkan,
                    kijun,
                    senkou_a,
                    senkou_b: midpoint(high, low, i, params.senkou_b_period),
                }
            })
            .collect();

        Ok(result)
    }
}

/// 인덱스 `i`까지 최근 `period`개 구간의 (최고가 + 최저가) / 2.
fn midpoint(high: &[f64], low: &[f64], i: usize, period: usize) -> Option<f64> {
    if i + 1 < period {
        return None;
    }
    let start = i + 1 - period;
    let highest = high[start..=i].iter().copied().fold(f64::MIN, f64::max);
    let lowest = low[start..=i].iter().copied().fold(f64::MAX, f64::min);
    Some((highest + lowest) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ichimoku_warmup() {
        let indicator = IchimokuIndicator::new();
        let high: Vec<f64> = (0..60).map(|i| 110.0 + i as f64).collect();
        let low: Vec<f64> = (0..60).map(|i| 90.0 + i as f64).collect();

        let result = indicator
            .calculate(&high, &low, IchimokuParams::default())
            .unwrap();

        assert_eq!(result.len(), 60);
        assert!(result[7].tenkan.is_none());
        assert!(result[8].tenkan.is_some());
        assert!(result[24].kijun.is_none());
        assert!(result[25].kijun.is_some());
        assert!(result[24].senkou_a.is_none());
        assert!(result[25].senkou_a.is_some());
        assert!(result[50].senkou_b.is_none());
        assert!(result[51].senkou_b.is_some());
    }

    #[test]
    fn test_ichimoku_values() {
        let indicator = IchimokuIndicator::new();
        let high: Vec<f64> = (0..60).map(|i| 110.0 + i as f64).collect();
        let low: Vec<f64> = (0..60).map(|i| 90.0 + i as f64).collect();

        let result = indicator
            .calculate(&high, &low, IchimokuParams::default())
            .unwrap();

        // i = 8: 최고가 118, 최저가 90 → 104
        assert_eq!(result[8].tenkan, Some(104.0));
        // i = 25: 최고가 135, 최저가 90 → 112.5, 전환선 (135 + 107) / 2 = 121
        assert_eq!(result[25].kijun, Some(112.5));
        assert_eq!(result[25].senkou_a, Some((121.0 + 112.5) / 2.0));
    }

    #[test]
    fn test_ichimoku_short_input() {
        let indicator = IchimokuIndicator::new();
        let result = indicator
            .calculate(&[2.0; 5], &[1.0; 5], IchimokuParams::default())
            .unwrap();
        assert!(result.iter().all(|r| *r == IchimokuResult::default()));
    }
}
