//! # Coinlens Core
//!
//! 시장 분석 파이프라인의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 분석 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - OHLCV 캔들 및 검증된 캔들 시계열
//! - 매매 신호 및 분석 결과
//! - 타임프레임 정의
//! - 시장 데이터 제공자 추상화
//! - 설정 및 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
