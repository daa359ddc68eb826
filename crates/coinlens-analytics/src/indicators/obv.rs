//! OBV (On-Balance Volume) 지표.
//!
//! 거래량을 이용하여 매수/매도 압력의 누적 흐름을 추적하는 지표입니다.
//!
//! ## 계산 방식
//! - 종가 상승: OBV += 거래량
//! - 종가 하락: OBV -= 거래량
//! - 종가 동일: OBV 변화 없음
//!
//! ## 활용
//! - 가격 상승 + OBV 상승: 거래량이 뒷받침하는 상승 추세
//! - 가격 상승 + OBV 하락: 약한 상승 (다이버전스)

use serde::{Deserialize, Serialize};

use super::{ensure_same_len, IndicatorResult};

/// OBV 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObvParams {
    /// 초기값 (기본: 0).
    pub initial_value: f64,
}

impl Default for ObvParams {
    fn default() -> Self {
        Self { initial_value: 0.0 }
    }
}

/// OBV 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObvResult {
    /// OBV 값.
    pub obv: f64,
    /// OBV 변화량 (전 캔들 대비).
    pub change: f64,
}

/// OBV 계산기.
#[derive(Debug, Default)]
pub struct ObvIndicator;

impl ObvIndicator {
    /// 새로운 OBV 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// OBV (On-Balance Volume) 계산.
    ///
    /// 첫 캔들은 비교 대상이 없으므로 초기값 그대로입니다.
    /// 빈 입력에는 빈 결과를 반환합니다.
    ///
    /// # 반환
    /// 각 시점의 OBV 값과 변화량
    pub fn calculate(
        &self,
        close: &[f64],
        volume: &[f64],
        params: ObvParams,
    ) -> IndicatorResult<Vec<ObvResult>> {
        let len = ensure_same_len(&[close, volume])?;

        let mut result = Vec::with_capacity(len);
        let mut current_obv = params.initial_value;

        for i in 0..len {
            let change = if i == 0 {
                0.0
            } else if close[i] > close[i - 1] {
                volume[i]
            } else if close[i] < close[i - 1] {
                -volume[i]
            } else {
                0.0
            };

            current_obv += change;
            result.push(ObvResult {
                obv: current_obv,
                change,
            });
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> (Vec<f64>, Vec<f64>) {
        let close = vec![100.0, 102.0, 101.0, 101.0, 104.0];
        let volume = vec![1000.0, 1500.0, 800.0, 900.0, 2000.0];
        (close, volume)
    }

    #[test]
    fn test_obv_calculation() {
        let obv = ObvIndicator::new();
        let (close, volume) = sample_data();

        let result = obv.calculate(&close, &volume, ObvParams::default()).unwrap();

        assert_eq!(result.len(), 5);
        assert_eq!(result[0].obv, 0.0);
        // 상승: +1500
        assert_eq!(result[1].obv, 1500.0);
        // 하락: -800
        assert_eq!(result[2].obv, 700.0);
        // 보합: 변화 없음
        assert_eq!(result[3].obv, 700.0);
        assert_eq!(result[3].change, 0.0);
        // 상승: +2000
        assert_eq!(result[4].obv, 2700.0);
    }

    #[test]
    fn test_obv_with_custom_initial() {
        let obv = ObvIndicator::new();
        let (close, volume) = sample_data();

        let result = obv
            .calculate(&close, &volume, ObvParams { initial_value: 10_000.0 })
            .unwrap();

        assert_eq!(result[0].obv, 10_000.0);
        assert_eq!(result[4].obv, 12_700.0);
    }

    #[test]
    fn test_mismatched_length_error() {
        let obv = ObvIndicator::new();
        let result = obv.calculate(&[1.0, 2.0], &[1.0], ObvParams::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_data() {
        let obv = ObvIndicator::new();
        let result = obv.calculate(&[], &[], ObvParams::default()).unwrap();
        assert!(result.is_empty());
    }
}
