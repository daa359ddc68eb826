//! tracing 기반 로깅 초기화.
//!
//! 분석 결과는 stdout으로 나가므로 로그는 항상 stderr에 씁니다.
//! 형식은 세 가지입니다:
//! - **pretty**: 터미널에서 읽기 위한 여러 줄 형식
//! - **json**: 로그 수집기에 넘기는 한 줄 JSON
//! - **compact**: 한 줄 텍스트

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

use crate::config::LoggingConfig;

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl LogFormat {
    const ALL: [LogFormat; 3] = [LogFormat::Pretty, LogFormat::Json, LogFormat::Compact];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LoggingError::UnknownFormat(s.to_string()))
    }
}

/// 로깅 초기화 에러.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("알 수 없는 로그 형식: {0} (pretty, json, compact)")]
    UnknownFormat(String),

    #[error("잘못된 로그 필터 '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    /// 전역 subscriber가 이미 설치됨
    #[error("로깅이 이미 초기화되었습니다: {0}")]
    AlreadyInitialized(String),
}

/// 설정에서 필터를 만듭니다. `RUST_LOG`가 있으면 설정값보다 우선합니다.
fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| LoggingError::InvalidFilter {
        filter: config.level.clone(),
        reason: e.to_string(),
    })
}

/// 전역 tracing subscriber를 설치합니다.
///
/// 프로세스에서 한 번만 호출할 수 있으며, 두 번째 호출은
/// `LoggingError::AlreadyInitialized`를 반환합니다.
///
/// ```no_run
/// use coinlens_core::{init_logging, LogFormat, LoggingConfig};
///
/// let config = LoggingConfig {
///     level: "coinlens_analytics=debug,info".to_string(),
///     format: LogFormat::Json,
///     ..Default::default()
/// };
/// init_logging(&config).unwrap();
/// ```
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.with_file)
        .with_line_number(config.with_file)
        .with_span_events(span_events);

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!(format = %config.format, level = %config.level, "로깅 초기화");
    Ok(())
}

/// 분석 요청 span (심볼, 타임프레임, 캔들 수 필드).
#[macro_export]
macro_rules! analysis_span {
    ($name:expr, $symbol:expr) => {
        tracing::info_span!($name, symbol = %$symbol)
    };
    ($name:expr, $symbol:expr, $timeframe:expr) => {
        tracing::info_span!($name, symbol = %$symbol, timeframe = %$timeframe)
    };
    ($name:expr, $symbol:expr, $timeframe:expr, $candles:expr) => {
        tracing::info_span!(
            $name,
            symbol = %$symbol,
            timeframe = %$timeframe,
            candles = $candles
        )
    };
}
