//! 볼륨 프로파일 (매물대) 및 Value Area 계산.
//!
//! 분석 구간의 캔들에서 가격대별 거래량을 집계합니다.
//!
//! # 주요 지표
//!
//! - **POC (Point of Control)**: 최대 거래량이 집중된 가격대
//! - **Value Area (VA)**: 전체 거래량의 일정 비율(기본 70%)이 집중된 가격 범위
//! - **VAH/VAL**: Value Area High/Low (포함된 가격대의 상단/하단 경계)
//!
//! # 예시
//!
//! ```rust,ignore
//! use coinlens_analytics::volume_profile::{ValueAreaParams, VolumeProfileCalculator};
//!
//! let calculator = VolumeProfileCalculator::from_params(&ValueAreaParams::default());
//! if let Some(profile) = calculator.calculate(series.as_slice()) {
//!     println!("POC: {}", profile.poc);
//!     println!("Value Area: {} ~ {}", profile.value_area_low, profile.value_area_high);
//! }
//! ```

use coinlens_core::Candle;
use serde::{Deserialize, Serialize};

/// Value Area 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueAreaParams {
    /// Value Area 계산 및 관련 신호 사용 여부 (기본: true).
    pub enabled: bool,
    /// 가격 레벨 수 (기본: 20).
    pub num_levels: usize,
    /// Value Area 거래량 비율 (기본: 0.7).
    pub value_area_ratio: f64,
}

impl Default for ValueAreaParams {
    fn default() -> Self {
        Self {
            enabled: true,
            num_levels: 20,
            value_area_ratio: 0.70,
        }
    }
}

/// 가격대별 거래량 레벨.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// 가격 (레벨 중심 가격)
    pub price: f64,
    /// 해당 가격대의 총 거래량
    pub volume: f64,
    /// 전체 거래량 대비 비율 (%)
    pub volume_pct: f64,
}

/// 볼륨 프로파일 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfile {
    /// 가격대별 거래량 레벨 (가격 오름차순)
    pub price_levels: Vec<PriceLevel>,
    /// POC (Point of Control) - 최대 거래량 가격
    pub poc: f64,
    /// POC 인덱스
    pub poc_index: usize,
    /// Value Area High
    pub value_area_high: f64,
    /// Value Area Low
    pub value_area_low: f64,
    /// 전체 거래량
    pub total_volume: f64,
    /// 분석 기간 (캔들 수)
    pub period: usize,
}

/// Value Area 요약 (POC, VAL, VAH).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueArea {
    /// Point of Control
    pub poc: f64,
    /// Value Area Low
    pub low: f64,
    /// Value Area High
    pub high: f64,
}

impl ValueArea {
    /// Value Area 폭 (VAH - VAL).
    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

impl VolumeProfile {
    /// POC/VAL/VAH 요약을 반환합니다.
    pub fn value_area(&self) -> ValueArea {
        ValueArea {
            poc: self.poc,
            low: self.value_area_low,
            high: self.value_area_high,
        }
    }

    /// Value Area 폭 (VAH - VAL).
    pub fn value_area_width(&self) -> f64 {
        self.value_area_high - self.value_area_low
    }

    /// 가격이 Value Area 안에 있는지 확인합니다.
    pub fn contains(&self, price: f64) -> bool {
        (self.value_area_low..=self.value_area_high).contains(&price)
    }
}

/// 볼륨 프로파일 계산기.
#[derive(Debug, Clone)]
pub struct VolumeProfileCalculator {
    /// 가격 레벨 수 (기본: 20)
    num_levels: usize,
    /// Value Area 비율 (기본: 0.7 = 70%)
    value_area_ratio: f64,
}

impl Default for VolumeProfileCalculator {
    fn default() -> Self {
        Self::new(20)
    }
}

impl VolumeProfileCalculator {
    /// 새 계산기 생성.
    ///
    /// * `num_levels` - 가격 레벨 수 (5~100으로 제한)
    pub fn new(num_levels: usize) -> Self {
        Self {
            num_levels: num_levels.clamp(5, 100),
            value_area_ratio: 0.70,
        }
    }

    /// 파라미터로 계산기를 생성합니다.
    pub fn from_params(params: &ValueAreaParams) -> Self {
        Self::new(params.num_levels).with_value_area_ratio(params.value_area_ratio)
    }

    /// Value Area 비율 설정 (0.5~0.9로 제한, NaN은 기본값).
    pub fn with_value_area_ratio(mut self, ratio: f64) -> Self {
        self.value_area_ratio = if ratio.is_nan() { 0.70 } else { ratio.clamp(0.5, 0.9) };
        self
    }

    /// 볼륨 프로파일 계산.
    ///
    /// # 반환
    ///
    /// 볼륨 프로파일 결과. 캔들이 2개 미만이거나, 가격 범위 또는 총 거래량이 0이면 None
    pub fn calculate(&self, candles: &[Candle]) -> Option<VolumeProfile> {
        if candles.len() < 2 {
            return None;
        }

        // 1. 가격 범위 계산
        let price_low = candles.iter().map(|c| c.low).fold(f64::MAX, f64::min);
        let price_high = candles.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        if price_high <= price_low {
            return None;
        }

        // 2. 각 레벨의 거래량 집계
        let level_size = (price_high - price_low) / self.num_levels as f64;
        let mut volumes = vec![0.0; self.num_levels];
        for candle in candles {
            self.distribute_volume(candle, price_low, level_size, &mut volumes);
        }

        let total_volume: f64 = volumes.iter().sum();
        if total_volume <= 0.0 {
            return None;
        }

        // 3. PriceLevel 구조체 생성
        let price_levels: Vec<PriceLevel> = volumes
            .iter()
            .enumerate()
            .map(|(i, &volume)| PriceLevel {
                price: price_low + level_size * (i as f64 + 0.5),
                volume,
                volume_pct: volume / total_volume * 100.0,
            })
            .collect();

        // 4. POC 계산 (최대 거래량 레벨, 동률이면 낮은 가격)
        let poc_index = price_levels
            .iter()
            .enumerate()
            .fold(0, |best, (i, level)| {
                if level.volume > price_levels[best].volume {
                    i
                } else {
                    best
                }
            });

        // 5. Value Area 계산 (레벨 경계 기준)
        let (low_index, high_index) =
            self.expand_value_area(&price_levels, poc_index, total_volume);

        Some(VolumeProfile {
            poc: price_levels[poc_index].price,
            poc_index,
            value_area_low: price_low + level_size * low_index as f64,
            value_area_high: price_low + level_size * (high_index + 1) as f64,
            price_levels,
            total_volume,
            period: candles.len(),
        })
    }

    /// 가격이 속한 레벨 인덱스 (범위 밖은 양 끝 레벨로 제한).
    fn level_index(&self, price: f64, price_low: f64, level_size: f64) -> usize {
        let raw = ((price - price_low) / level_size).floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.num_levels - 1)
        }
    }

    /// 캔들 거래량을 고가-저가 범위에 걸친 레벨에 균등 분배합니다.
    fn distribute_volume(
        &self,
        candle: &Candle,
        price_low: f64,
        level_size: f64,
        levels: &mut [f64],
    ) {
        if candle.volume <= 0.0 {
            return;
        }

        let start = self.level_index(candle.low, price_low, level_size);
        let end = self.level_index(candle.high, price_low, level_size);
        let per_level = candle.volume / (end - start + 1) as f64;

        for level in &mut levels[start..=end] {
            *level += per_level;
        }
    }

    /// POC에서 양방향으로 거래량이 큰 쪽부터 확장하여 Value Area 인덱스 범위를 구합니다.
    fn expand_value_area(
        &self,
        levels: &[PriceLevel],
        poc_index: usize,
        total_volume: f64,
    ) -> (usize, usize) {
        let target_volume = total_volume * self.value_area_ratio;
        let last = levels.len() - 1;
        let mut included_volume = levels[poc_index].volume;
        let mut low_index = poc_index;
        let mut high_index = poc_index;

        while included_volume < target_volume && (low_index > 0 || high_index < last) {
            let next_low = (low_index > 0).then(|| levels[low_index - 1].volume);
            let next_high = (high_index < last).then(|| levels[high_index + 1].volume);

            match (next_low, next_high) {
                (Some(lo), Some(hi)) if lo >= hi => {
                    low_index -= 1;
                    included_volume += lo;
                }
                (_, Some(hi)) => {
                    high_index += 1;
                    included_volume += hi;
                }
                (Some(lo), None) => {
                    low_index -= 1;
                    included_volume += lo;
                }
                (None, None) => break,
            }
        }

        (low_index, high_index)
    }
}
