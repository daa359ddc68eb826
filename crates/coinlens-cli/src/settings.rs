//! 실행 설정 로드.
//!
//! 우선순위: 기본값 → TOML 설정 파일 → `COINLENS__` 환경 변수.
//!
//! ```bash
//! COINLENS__EXCHANGE__DEFAULT_LIMIT=500
//! COINLENS__ANALYSIS__RSI__PERIOD=21
//! COINLENS__LOGGING__FORMAT=json
//! ```

use std::path::Path;

use coinlens_analytics::AnalyzerConfig;
use coinlens_core::{ExchangeConfig, LoggingConfig};
use serde::{Deserialize, Serialize};

/// 설정 파일을 지정하지 않았을 때 찾아보는 경로 (확장자 제외).
pub const DEFAULT_CONFIG_PATH: &str = "config/coinlens";

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "COINLENS";

/// CLI 전체 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub exchange: ExchangeConfig,
    pub analysis: AnalyzerConfig,
}

impl Settings {
    /// 설정을 로드합니다.
    ///
    /// `path`가 주어지면 해당 파일이 반드시 있어야 하고, 없으면 기본 경로를
    /// 있을 때만 읽습니다. 분석 파라미터가 유효하지 않으면 에러를 반환합니다.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        let settings: Settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings
            .analysis
            .validate()
            .map_err(|e| config::ConfigError::Message(format!("analysis 설정 오류: {}", e)))?;

        Ok(settings)
    }
}
