//! 지지/저항 레벨 탐지.
//!
//! 캔들 구간에서 국소 저점/고점을 찾아 가까운 가격끼리 묶은 뒤,
//! 지지선과 저항선을 각각 정해진 개수만큼 반환합니다.
//!
//! # 알고리즘
//!
//! 1. 양 끝 `edge`개를 제외한 캔들마다 좌우 `neighbors`개 캔들보다 저가가
//!    엄격하게 낮으면 국소 저점, 고가가 엄격하게 높으면 국소 고점으로 표시
//! 2. 레벨을 오름차순 정렬 후, 직전 레벨과의 상대 거리가 허용 오차 미만이면
//!    같은 그룹으로 묶고 그룹 평균을 레벨로 사용
//! 3. 저항선은 낮은 그룹부터 최대 `max_levels`개 선택. 지지선은 기본적으로
//!    낮은 그룹부터 고르며, `SupportSelection::Nearest`면 높은 그룹부터 고름
//! 4. 부족하면 최근 종가 기준 고정 비율(지지 -2/-5/-7%, 저항 +2/+5/+7%)로 채움

use coinlens_core::Candle;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::{IndicatorError, IndicatorResult};

/// 지지선 그룹 선택 순서.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportSelection {
    /// 가장 낮은 그룹부터 (오름차순)
    #[default]
    Lowest,
    /// 현재가에 가까운 높은 그룹부터 (내림차순)
    Nearest,
}

/// 지지/저항 탐지 파라미터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportResistanceParams {
    /// 탐색에서 제외할 양 끝 캔들 수 (기본: 5).
    pub edge: usize,
    /// 비교할 좌우 이웃 캔들 수 (기본: 2).
    pub neighbors: usize,
    /// 그룹 병합 상대 거리 (기본: 0.005 = 0.5%).
    pub merge_tolerance: f64,
    /// 지지/저항 각각의 레벨 수 (기본: 3).
    pub max_levels: usize,
    /// 지지선 그룹 선택 순서 (기본: 낮은 그룹부터).
    pub support_selection: SupportSelection,
    /// 지지선 보충 비율 (최근 종가 대비, 기본: -2%, -5%, -7%).
    pub support_offsets: Vec<f64>,
    /// 저항선 보충 비율 (최근 종가 대비, 기본: +2%, +5%, +7%).
    pub resistance_offsets: Vec<f64>,
}

impl Default for SupportResistanceParams {
    fn default() -> Self {
        Self {
            edge: 5,
            neighbors: 2,
            merge_tolerance: 0.005,
            max_levels: 3,
            support_selection: SupportSelection::Lowest,
            support_offsets: vec![-0.02, -0.05, -0.07],
            resistance_offsets: vec![0.02, 0.05, 0.07],
        }
    }
}

/// 지지/저항 레벨.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistanceLevels {
    /// 지지선 (탐지된 레벨은 `support_selection` 순서, 이후 보충 레벨)
    pub support: Vec<f64>,
    /// 저항선 (탐지된 레벨은 낮은 가격부터, 이후 보충 레벨)
    pub resistance: Vec<f64>,
    /// 보충 없이 탐지된 지지선 수
    pub detected_support: usize,
    /// 보충 없이 탐지된 저항선 수
    pub detected_resistance: usize,
}

impl SupportResistanceLevels {
    /// 가장 높은 지지선. 목록 순서와 무관합니다.
    pub fn nearest_support(&self) -> Option<f64> {
        self.support.iter().copied().reduce(f64::max)
    }

    /// 가장 낮은 저항선. 목록 순서와 무관합니다.
    pub fn nearest_resistance(&self) -> Option<f64> {
        self.resistance.iter().copied().reduce(f64::min)
    }
}

/// 지지/저항 탐지기.
#[derive(Debug, Clone, Default)]
pub struct SupportResistanceDetector {
    params: SupportResistanceParams,
}

impl SupportResistanceDetector {
    /// 새 탐지기 생성.
    pub fn new(params: SupportResistanceParams) -> Self {
        Self { params }
    }

    /// 지지/저항 레벨을 탐지합니다.
    ///
    /// 입력이 짧아 국소 극점이 없더라도 보충 레벨로 항상 `max_levels`개씩 반환합니다.
    /// 보충 비율 목록이 `max_levels`보다 짧으면 그만큼만 채웁니다.
    ///
    /// # 에러
    /// 빈 입력이면 `InsufficientData`, 병합 허용 오차가 음수/NaN이면 `InvalidParameter`
    pub fn detect(&self, candles: &[Candle]) -> IndicatorResult<SupportResistanceLevels> {
        let p = &self.params;
        let latest_close = candles
            .last()
            .map(|c| c.close)
            .ok_or(IndicatorError::InsufficientData {
                required: 1,
                provided: 0,
            })?;

        if p.merge_tolerance.is_nan() || p.merge_tolerance < 0.0 {
            return Err(IndicatorError::InvalidParameter(format!(
                "병합 허용 오차는 0 이상이어야 합니다: {}",
                p.merge_tolerance
            )));
        }

        let (minima, maxima) = self.find_extrema(candles);

        let mut support = group_similar_levels(minima, p.merge_tolerance);
        if p.support_selection == SupportSelection::Nearest {
            support.reverse();
        }
        support.truncate(p.max_levels);

        let mut resistance = group_similar_levels(maxima, p.merge_tolerance);
        resistance.truncate(p.max_levels);

        let detected_support = support.len();
        let detected_resistance = resistance.len();

        fill_with_offsets(&mut support, latest_close, &p.support_offsets, p.max_levels);
        fill_with_offsets(&mut resistance, latest_close, &p.resistance_offsets, p.max_levels);

        debug!(
            candles = candles.len(),
            detected_support,
            detected_resistance,
            "지지/저항 레벨 탐지 완료"
        );

        Ok(SupportResistanceLevels {
            support,
            resistance,
            detected_support,
            detected_resistance,
        })
    }

    /// 국소 저점(저가)과 국소 고점(고가)을 찾습니다.
    fn find_extrema(&self, candles: &[Candle]) -> (Vec<f64>, Vec<f64>) {
        let edge = self.params.edge.max(self.params.neighbors);
        let k = self.params.neighbors;
        let mut minima = Vec::new();
        let mut maxima = Vec::new();

        if candles.len() <= edge * 2 {
            return (minima, maxima);
        }

        for i in edge..candles.len() - edge {
            let neighbours = (1..=k).flat_map(|d| [&candles[i - d], &candles[i + d]]);
            let current = &candles[i];

            let (mut is_min, mut is_max) = (true, true);
            for other in neighbours {
                is_min &= current.low < other.low;
                is_max &= current.high > other.high;
            }

            if is_min {
                minima.push(current.low);
            }
            if is_max {
                maxima.push(current.high);
            }
        }

        (minima, maxima)
    }
}

/// 가까운 가격 레벨을 묶어 그룹 평균을 오름차순으로 반환합니다.
///
/// 정렬된 레벨에서 직전 레벨과의 상대 거리가 `tolerance` 미만이면 같은 그룹입니다.
fn group_similar_levels(mut levels: Vec<f64>, tolerance: f64) -> Vec<f64> {
    levels.sort_by(f64::total_cmp);

    let mut grouped = Vec::new();
    let mut group: Vec<f64> = Vec::new();

    for level in levels {
        if let Some(&prev) = group.last() {
            if (level - prev) / prev >= tolerance {
                grouped.push(mean(&group));
                group.clear();
            }
        }
        group.push(level);
    }

    if !group.is_empty() {
        grouped.push(mean(&group));
    }

    grouped
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// 레벨 수가 `target`보다 적으면 종가 대비 비율 레벨로 채웁니다.
fn fill_with_offsets(levels: &mut Vec<f64>, close: f64, offsets: &[f64], target: usize) {
    let missing = target.saturating_sub(levels.len());
    levels.extend(offsets.iter().take(missing).map(|o| close * (1.0 + o)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle_hl(time: i64, high: f64, low: f64) -> Candle {
        let mid = (high + low) / 2.0;
        Candle::new(time, mid, high, low, mid, 100.0)
    }

    /// 저가/고가 목록으로 캔들 생성.
    fn build(lows: &[f64], highs: &[f64]) -> Vec<Candle> {
        lows.iter()
            .zip(highs)
            .enumerate()
            .map(|(i, (&l, &h))| candle_hl(i as i64, h, l))
            .collect()
    }

    #[test]
    fn test_group_similar_levels() {
        // 100과 100.4는 0.5% 미만 차이 → 묶음, 110은 별도
        let grouped = group_similar_levels(vec![110.0, 100.4, 100.0], 0.005);
        assert_eq!(grouped.len(), 2);
        assert!((grouped[0] - 100.2).abs() < 1e-9);
        assert_eq!(grouped[1], 110.0);

        assert!(group_similar_levels(vec![], 0.005).is_empty());
    }

    #[test]
    fn test_short_input_uses_offsets() {
        let detector = SupportResistanceDetector::default();
        let candles = build(&[99.0; 5], &[101.0; 5]);

        let levels = detector.detect(&candles).unwrap();

        assert_eq!(levels.detected_support, 0);
        assert_eq!(levels.detected_resistance, 0);
        assert_eq!(levels.support.len(), 3);
        assert_eq!(levels.resistance.len(), 3);

        // 최근 종가 100 기준
        assert!((levels.support[0] - 98.0).abs() < 1e-9);
        assert!((levels.support[1] - 95.0).abs() < 1e-9);
        assert!((levels.support[2] - 93.0).abs() < 1e-9);
        assert!((levels.resistance[0] - 102.0).abs() < 1e-9);
        assert!((levels.resistance[2] - 107.0).abs() < 1e-9);
    }

    #[test]
    fn test_detects_local_extrema() {
        let detector = SupportResistanceDetector::default();
        // 인덱스 7에서 저점 90, 인덱스 11에서 고점 120
        let mut lows = vec![100.0; 20];
        let mut highs = vec![110.0; 20];
        lows[7] = 90.0;
        highs[11] = 120.0;

        let levels = detector.detect(&build(&lows, &highs)).unwrap();

        assert_eq!(levels.detected_support, 1);
        assert_eq!(levels.support[0], 90.0);
        assert_eq!(levels.detected_resistance, 1);
        assert_eq!(levels.resistance[0], 120.0);

        // 나머지는 보충 레벨 (종가 105 기준 -2%, -5%)
        assert_eq!(levels.support.len(), 3);
        assert!((levels.support[1] - 102.9).abs() < 1e-9);
        assert_eq!(levels.nearest_resistance(), Some(120.0));
    }

    #[test]
    fn test_edges_are_ignored() {
        let detector = SupportResistanceDetector::default();
        let mut lows = vec![100.0; 20];
        lows[3] = 80.0; // 앞쪽 5개 안
        lows[17] = 80.0; // 뒤쪽 5개 안
        let highs = vec![110.0; 20];

        let levels = detector.detect(&build(&lows, &highs)).unwrap();
        assert_eq!(levels.detected_support, 0);
    }

    #[test]
    fn test_plateau_is_not_extremum() {
        let detector = SupportResistanceDetector::default();
        // 동일한 저가가 이어지면 엄격 비교를 만족하지 않음
        let mut lows = vec![100.0; 20];
        lows[8] = 90.0;
        lows[9] = 90.0;
        let highs = vec![110.0; 20];

        let levels = detector.detect(&build(&lows, &highs)).unwrap();
        assert_eq!(levels.detected_support, 0);
    }

    /// 저점 90, 95, 98, 99가 각각 떨어져 있는 30개 캔들.
    fn four_support_groups() -> Vec<Candle> {
        let mut lows = vec![100.0; 30];
        let highs = vec![110.0; 30];
        for (i, level) in [(7, 90.0), (12, 95.0), (17, 98.0), (22, 99.0)] {
            lows[i] = level;
        }
        build(&lows, &highs)
    }

    #[test]
    fn test_support_keeps_lowest_groups_by_default() {
        let detector = SupportResistanceDetector::default();
        let levels = detector.detect(&four_support_groups()).unwrap();

        assert_eq!(levels.support, vec![90.0, 95.0, 98.0]);
        assert_eq!(levels.detected_support, 3);
        assert_eq!(levels.nearest_support(), Some(98.0));
    }

    #[test]
    fn test_nearest_selection_keeps_highest_groups() {
        let detector = SupportResistanceDetector::new(SupportResistanceParams {
            support_selection: SupportSelection::Nearest,
            ..Default::default()
        });
        let levels = detector.detect(&four_support_groups()).unwrap();

        assert_eq!(levels.support, vec![99.0, 98.0, 95.0]);
        assert_eq!(levels.nearest_support(), Some(99.0));
    }

    #[test]
    fn test_nearest_levels_ignore_order() {
        let levels = SupportResistanceLevels {
            support: vec![90.0, 98.0, 95.0],
            resistance: vec![120.0, 107.0, 112.0],
            detected_support: 1,
            detected_resistance: 1,
        };
        assert_eq!(levels.nearest_support(), Some(98.0));
        assert_eq!(levels.nearest_resistance(), Some(107.0));
        assert_eq!(SupportResistanceLevels::default().nearest_support(), None);
    }

    #[test]
    fn test_empty_input_is_error() {
        let detector = SupportResistanceDetector::default();
        assert!(detector.detect(&[]).is_err());
    }
}
