//! 공통 설정 섹션.
//!
//! 로깅과 시장 데이터 제공자 설정을 정의합니다. 분석 파라미터는
//! `coinlens-analytics::AnalyzerConfig`에 있으며, 실행 파일이 이들을 묶어 로드합니다.

use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 필터 지시문 (예: "info", "coinlens_analytics=debug,info")
    pub level: String,
    pub format: LogFormat,
    /// span 진입/종료 이벤트 기록
    pub span_events: bool,
    /// 파일명과 줄 번호 기록
    pub with_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            span_events: false,
            with_file: false,
        }
    }
}

/// 거래소(시장 데이터) 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// 거래소 이름
    pub name: String,
    /// REST API 기본 URL
    pub rest_base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 기본 캔들 요청 개수
    pub default_limit: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            name: "binance".to_string(),
            rest_base_url: "https://api.binance.com".to_string(),
            timeout_secs: 10,
            default_limit: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_partial_deserialize() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"format": "json", "span_events": true}"#).unwrap();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.span_events);

        assert!(serde_json::from_str::<LoggingConfig>(r#"{"format": "xml"}"#).is_err());
    }

    #[test]
    fn test_exchange_config_partial_deserialize() {
        let config: ExchangeConfig =
            serde_json::from_str(r#"{"default_limit": 250}"#).unwrap();
        assert_eq!(config.default_limit, 250);
        assert_eq!(config.rest_base_url, "https://api.binance.com");
    }
}
