//! coinlens CLI 구성 요소.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 설정 로드 (파일 + 환경 변수)
//! - 분석 명령 (Binance, 합성 데이터)
//! - 결과 출력 (표 / JSON)

pub mod commands;
pub mod output;
pub mod settings;

pub use output::OutputFormat;
pub use settings::Settings;
