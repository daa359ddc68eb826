//! 시장 데이터 타입 및 구조체.
//!
//! 이 모듈은 시장 데이터 관련 타입을 정의합니다:
//! - `Candle` - OHLCV 캔들스틱 데이터
//! - `CandleSeries` - 검증을 통과한 캔들 시계열

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};

/// OHLCV 캔들스틱 데이터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 캔들 시작 시간 (epoch 밀리초)
    pub time: i64,
    /// 시가
    pub open: f64,
    /// 고가
    pub high: f64,
    /// 저가
    pub low: f64,
    /// 종가
    pub close: f64,
    /// 거래량 (기준 자산 단위)
    pub volume: f64,
}

impl Candle {
    /// 새 캔들을 생성합니다.
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 캔들 시작 시간을 UTC 시각으로 반환합니다.
    pub fn open_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
    }

    /// 캔들 몸통 크기(절대값)를 반환합니다.
    pub fn body_size(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 음봉(종가 < 시가)인지 확인합니다.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// 대표가(고가+저가+종가 평균)를 반환합니다.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// 전 캔들 종가 기준 True Range를 반환합니다.
    ///
    /// TR = max(고가 - 저가, |고가 - 전일종가|, |저가 - 전일종가|)
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        let hl = self.range();
        match prev_close {
            Some(pc) => hl.max((self.high - pc).abs()).max((self.low - pc).abs()),
            None => hl,
        }
    }

    /// 단일 캔들의 필드 유효성을 검사합니다.
    fn check_fields(&self, index: usize) -> DataResult<()> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];

        for (name, value) in fields {
            if !value.is_finite() {
                return Err(DataError::malformed(
                    index,
                    format!("{} 값이 유한한 수가 아닙니다: {}", name, value),
                ));
            }
        }

        for (name, value) in &fields[..4] {
            if *value <= 0.0 {
                return Err(DataError::malformed(
                    index,
                    format!("{} 가격은 0보다 커야 합니다: {}", name, value),
                ));
            }
        }

        if self.volume < 0.0 {
            return Err(DataError::malformed(
                index,
                format!("거래량은 음수일 수 없습니다: {}", self.volume),
            ));
        }

        if self.high < self.low {
            return Err(DataError::malformed(
                index,
                format!("고가({})가 저가({})보다 낮습니다", self.high, self.low),
            ));
        }

        for (name, value) in [("open", self.open), ("close", self.close)] {
            if value < self.low || value > self.high {
                return Err(DataError::malformed(
                    index,
                    format!(
                        "{}({})이 고가/저가 범위 [{}, {}]를 벗어났습니다",
                        name, value, self.low, self.high
                    ),
                ));
            }
        }

        Ok(())
    }
}

/// 검증된 캔들 시계열.
///
/// 생성 시점에 다음을 보장합니다:
/// - 최소 1개 이상의 캔들
/// - 모든 가격/거래량이 유한한 수, 가격 > 0, 거래량 >= 0, 고가 >= 저가, 시가/종가는 [저가, 고가] 범위 안
/// - 시간이 엄격하게 오름차순 (중복 없음)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// 캔들 목록을 검증하여 시계열을 생성합니다.
    ///
    /// # 에러
    ///
    /// - `DataError::EmptyInput`: 캔들이 없는 경우
    /// - `DataError::MalformedInput`: 시간 역전/중복 또는 비정상 수치
    pub fn new(candles: Vec<Candle>) -> DataResult<Self> {
        if candles.is_empty() {
            return Err(DataError::EmptyInput);
        }

        for (i, candle) in candles.iter().enumerate() {
            candle.check_fields(i)?;

            if i > 0 {
                let prev = candles[i - 1].time;
                if candle.time == prev {
                    return Err(DataError::malformed(
                        i,
                        format!("중복된 캔들 시간: {}", candle.time),
                    ));
                }
                if candle.time < prev {
                    return Err(DataError::malformed(
                        i,
                        format!("캔들 시간이 역전되었습니다: {} < {}", candle.time, prev),
                    ));
                }
            }
        }

        Ok(Self { candles })
    }

    /// 캔들 개수.
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// 검증된 시계열은 항상 비어 있지 않습니다.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 캔들 슬라이스.
    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    /// 캔들 반복자.
    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    /// 가장 최근 캔들.
    pub fn latest(&self) -> &Candle {
        // 생성 시 비어 있지 않음을 검증함
        &self.candles[self.candles.len() - 1]
    }

    /// 종가 시계열.
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// 고가 시계열.
    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    /// 저가 시계열.
    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }

    /// 거래량 시계열.
    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }

    /// 내부 캔들 벡터를 반환합니다.
    pub fn into_inner(self) -> Vec<Candle> {
        self.candles
    }
}

impl TryFrom<Vec<Candle>> for CandleSeries {
    type Error = DataError;

    fn try_from(candles: Vec<Candle>) -> Result<Self, Self::Error> {
        Self::new(candles)
    }
}

impl<'a> IntoIterator for &'a CandleSeries {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(time: i64, close: f64) -> Candle {
        Candle::new(time, close, close + 1.0, close - 1.0, close, 10.0)
    }

    #[test]
    fn test_candle_helpers() {
        let c = Candle::new(0, 100.0, 110.0, 95.0, 105.0, 1000.0);
        assert_eq!(c.range(), 15.0);
        assert_eq!(c.body_size(), 5.0);
        assert!(c.is_bullish());
        assert!(!c.is_bearish());
        assert!((c.typical_price() - 103.333_333).abs() < 1e-3);

        // 갭 상승: 전일 종가 80 → TR = 110 - 80
        assert_eq!(c.true_range(Some(80.0)), 30.0);
        assert_eq!(c.true_range(None), 15.0);
    }

    #[test]
    fn test_series_accepts_valid_input() {
        let series = CandleSeries::new(vec![candle(1, 100.0), candle(2, 101.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.latest().close, 101.0);
        assert_eq!(series.closes(), vec![100.0, 101.0]);
    }

    #[test]
    fn test_series_rejects_empty() {
        assert_eq!(CandleSeries::new(vec![]), Err(DataError::EmptyInput));
    }

    #[test]
    fn test_series_rejects_duplicate_time() {
        let err = CandleSeries::new(vec![candle(1, 100.0), candle(1, 101.0)]).unwrap_err();
        assert_eq!(err.index(), Some(1));
    }

    #[test]
    fn test_series_rejects_non_monotonic_time() {
        let err =
            CandleSeries::new(vec![candle(5, 100.0), candle(6, 100.0), candle(3, 100.0)])
                .unwrap_err();
        assert_eq!(err.index(), Some(2));
    }

    #[test]
    fn test_series_rejects_bad_fields() {
        let mut nan = candle(1, 100.0);
        nan.close = f64::NAN;
        assert!(CandleSeries::new(vec![nan]).is_err());

        let mut inverted = candle(1, 100.0);
        inverted.high = 90.0;
        assert!(CandleSeries::new(vec![inverted]).is_err());

        let mut negative_volume = candle(1, 100.0);
        negative_volume.volume = -1.0;
        assert!(CandleSeries::new(vec![negative_volume]).is_err());

        let mut zero_price = candle(1, 100.0);
        zero_price.low = 0.0;
        assert!(CandleSeries::new(vec![zero_price]).is_err());

        let mut close_above_high = candle(1, 100.0);
        close_above_high.close = 120.0;
        assert!(CandleSeries::new(vec![close_above_high]).is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn valid_candles() -> impl Strategy<Value = Vec<Candle>> {
            prop::collection::vec((1.0f64..1_000.0, 0.0f64..1.0, 0.0f64..1.0, 0.0f64..500.0), 1..50)
                .prop_map(|rows| {
                    rows.into_iter()
                        .enumerate()
                        .map(|(i, (low, span, pos, volume))| {
                            let high = low * (1.0 + span * 0.1);
                            let close = low + (high - low) * pos;
                            Candle::new(i as i64 * 60_000, low, high, low, close, volume)
                        })
                        .collect()
                })
        }

        proptest! {
            #[test]
            fn prop_valid_candles_are_accepted(candles in valid_candles()) {
                let n = candles.len();
                let series = CandleSeries::new(candles).unwrap();
                prop_assert_eq!(series.len(), n);
                prop_assert_eq!(series.closes().len(), n);
            }

            #[test]
            fn prop_swapped_timestamps_are_rejected(
                candles in valid_candles().prop_filter("at least two candles", |c| c.len() >= 2),
                pick in any::<prop::sample::Index>(),
            ) {
                let mut candles = candles;
                let i = pick.index(candles.len() - 1) + 1;
                candles[i].time = candles[i - 1].time;

                let err = CandleSeries::new(candles).unwrap_err();
                prop_assert_eq!(err.index(), Some(i));
            }
        }
    }
}
