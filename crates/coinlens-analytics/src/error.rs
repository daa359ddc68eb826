//! 분석 파이프라인 에러 타입.

use coinlens_core::{DataError, ProviderError};
use thiserror::Error;

use crate::indicators::IndicatorError;

/// 분석 에러.
///
/// 입력 검증 에러와 시장 데이터 제공자 에러는 원본 그대로 전달됩니다.
/// 분석기는 어떤 에러도 재시도하지 않습니다.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// 입력 캔들 검증 실패 (빈 입력, 잘못된 캔들)
    #[error(transparent)]
    Data(#[from] DataError),

    /// 지표 파라미터 오류
    #[error("지표 계산 실패: {0}")]
    Indicator(#[from] IndicatorError),

    /// 시장 데이터 제공자 에러
    #[error(transparent)]
    Upstream(#[from] ProviderError),

    /// 지표 시계열 길이가 캔들 수와 다름
    #[error("{indicator} 시계열 길이 불일치: 기대 {expected}, 실제 {actual}")]
    Misaligned {
        indicator: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// 분석 결과 타입.
pub type AnalyzerResult<T> = Result<T, AnalysisError>;

impl AnalysisError {
    /// 빈 입력 에러인지 확인합니다.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, AnalysisError::Data(DataError::EmptyInput))
    }
}
