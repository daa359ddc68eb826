//! 추세 강도 휴리스틱.
//!
//! 참조 기간 동안의 상대 가격 변위로 추세의 세기를 근사합니다.
//! 방향성 지수(ADX)를 대체하는 표준 지표가 아니며, 값은 항상 `[10, 60]` 범위입니다.
//!
//! 강도 = min(60, 10 + |P(i) - P(i-n)| / P(i-n) × 100 × 5)

use serde::{Deserialize, Serialize};

use super::{ensure_period, IndicatorResult};

/// 추세 강도 하한.
pub const TREND_STRENGTH_FLOOR: f64 = 10.0;
/// 추세 강도 상한.
pub const TREND_STRENGTH_CAP: f64 = 60.0;
/// 변위(%)에 곱하는 배수.
const DISPLACEMENT_SCALE: f64 = 5.0;

/// 추세 강도 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendStrengthParams {
    /// 참조 기간 (기본: 14).
    pub period: usize,
}

impl Default for TrendStrengthParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 추세 강도 계산기.
#[derive(Debug, Default)]
pub struct TrendStrengthIndicator;

impl TrendStrengthIndicator {
    /// 새로운 추세 강도 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 추세 강도 계산.
    ///
    /// # 반환
    /// 각 시점의 강도 (처음 `period`개는 None)
    pub fn calculate(
        &self,
        prices: &[f64],
        params: TrendStrengthParams,
    ) -> IndicatorResult<Vec<Option<f64>>> {
        let period = params.period;
        ensure_period("추세 강도", period)?;

        let result = (0..prices.len())
            .map(|i| {
                if i < period {
                    return None;
                }
                let base = prices[i - period];
                if base == 0.0 {
                    return Some(TREND_STRENGTH_FLOOR);
                }
                let displacement = (prices[i] - base).abs() / base.abs() * 100.0;
                Some(
                    (TREND_STRENGTH_FLOOR + displacement * DISPLACEMENT_SCALE)
                        .clamp(TREND_STRENGTH_FLOOR, TREND_STRENGTH_CAP),
                )
            })
            .collect();

        Ok(result)
    }
}
