//! 캔들스틱 데이터를 위한 타임프레임 정의.
//!
//! 이 모듈은 분석 대상 캔들의 시간 간격을 나타내는 타입을 정의합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 캔들스틱 타임프레임.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// 1분봉
    M1,
    /// 3분봉
    M3,
    /// 5분봉
    M5,
    /// 15분봉
    M15,
    /// 30분봉
    M30,
    /// 1시간봉
    H1,
    /// 2시간봉
    H2,
    /// 4시간봉
    H4,
    /// 6시간봉
    H6,
    /// 12시간봉
    H12,
    /// 일봉
    D1,
    /// 주봉
    W1,
}

impl Timeframe {
    /// 지원하는 모든 타임프레임 (짧은 순).
    pub const ALL: [Timeframe; 12] = [
        Timeframe::M1,
        Timeframe::M3,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H2,
        Timeframe::H4,
        Timeframe::H6,
        Timeframe::H12,
        Timeframe::D1,
        Timeframe::W1,
    ];

    /// 이 타임프레임의 기간을 반환합니다.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.as_minutes() * 60)
    }

    /// 이 타임프레임의 분 단위 값을 반환합니다.
    pub fn as_minutes(&self) -> u64 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M3 => 3,
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
            Timeframe::H2 => 2 * 60,
            Timeframe::H4 => 4 * 60,
            Timeframe::H6 => 6 * 60,
            Timeframe::H12 => 12 * 60,
            Timeframe::D1 => 24 * 60,
            Timeframe::W1 => 7 * 24 * 60,
        }
    }

    /// 이 타임프레임의 밀리초 단위 값을 반환합니다.
    pub fn as_millis(&self) -> i64 {
        (self.as_minutes() * 60_000) as i64
    }

    /// 바이낸스 간격 문자열로 변환합니다.
    pub fn to_binance_interval(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M3 => "3m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::H2 => "2h",
            Timeframe::H4 => "4h",
            Timeframe::H6 => "6h",
            Timeframe::H12 => "12h",
            Timeframe::D1 => "1d",
            Timeframe::W1 => "1w",
        }
    }

    /// 바이낸스 간격 문자열에서 파싱합니다.
    pub fn from_binance_interval(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|tf| tf.to_binance_interval() == s)
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::H4
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_binance_interval())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_binance_interval(s).ok_or_else(|| format!("Invalid timeframe: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_duration() {
        assert_eq!(Timeframe::M1.duration().as_secs(), 60);
        assert_eq!(Timeframe::H1.duration().as_secs(), 3600);
        assert_eq!(Timeframe::D1.duration().as_secs(), 86400);
        assert_eq!(Timeframe::H4.as_millis(), 4 * 3_600_000);
    }

    #[test]
    fn test_timeframe_binance() {
        assert_eq!(Timeframe::M15.to_binance_interval(), "15m");
        assert_eq!(Timeframe::from_binance_interval("4h"), Some(Timeframe::H4));
        assert_eq!(Timeframe::from_binance_interval("1M"), None);
    }

    #[test]
    fn test_timeframe_round_trip_all() {
        for tf in Timeframe::ALL {
            assert_eq!(tf.to_string().parse::<Timeframe>().unwrap(), tf);
        }
        assert!("7h".parse::<Timeframe>().is_err());
    }
}
