//! 피보나치 되돌림 레벨.
//!
//! 분석 구간 전체의 최저가와 최고가 사이를 고정 비율로 나눈 가격 레벨입니다.
//! 시점별 값이 아니라 구간당 한 번 계산됩니다.

use serde::{Deserialize, Serialize};

use super::{ensure_same_len, IndicatorError, IndicatorResult};

/// 되돌림 비율 (최저가 기준).
pub const FIBONACCI_RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

/// 피보나치 레벨.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevel {
    /// 비율 (0.0 ~ 1.0).
    pub ratio: f64,
    /// 가격 = 최저가 + (최고가 - 최저가) × 비율.
    pub price: f64,
}

/// 피보나치 레벨 계산기.
#[derive(Debug, Default)]
pub struct FibonacciCalculator;

impl FibonacciCalculator {
    /// 새로운 피보나치 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 구간 전체의 피보나치 되돌림 레벨을 계산합니다.
    ///
    /// 비율 오름차순으로 7개 레벨을 반환합니다. 비율 1.0은 최고가와 정확히 같습니다.
    ///
    /// # 에러
    /// 빈 입력이면 `InsufficientData`
    pub fn levels(&self, high: &[f64], low: &[f64]) -> IndicatorResult<Vec<FibonacciLevel>> {
        let len = ensure_same_len(&[high, low])?;
        if len == 0 {
            return Err(IndicatorError::InsufficientData {
                required: 1,
                provided: 0,
            });
        }

        let highest = high.iter().copied().fold(f64::MIN, f64::max);
        let lowest = low.iter().copied().fold(f64::MAX, f64::min);
        let range = highest - lowest;

        let levels = FIBONACCI_RATIOS
            .iter()
            .map(|&ratio| FibonacciLevel {
                ratio,
                price: if ratio == 1.0 {
                    highest
                } else {
                    lowest + range * ratio
                },
            })
            .collect();

        Ok(levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fibonacci_levels() {
        let calculator = FibonacciCalculator::new();
        let high = [110.0, 150.0, 130.0];
        let low = [100.0, 120.0, 105.0];

        let levels = calculator.levels(&high, &low).unwrap();

        assert_eq!(levels.len(), 7);
        assert_eq!(levels[0].price, 100.0);
        assert_eq!(levels[3].ratio, 0.5);
        assert_eq!(levels[3].price, 125.0);
        assert_eq!(levels[6].price, 150.0);
        assert!(levels.windows(2).all(|w| w[0].price <= w[1].price));
    }

    #[test]
    fn test_fibonacci_empty_input() {
        let calculator = FibonacciCalculator::new();
        let err = calculator.levels(&[], &[]).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InsufficientData {
                required: 1,
                provided: 0
            }
        );
    }
}
