//! 입력 데이터 에러 타입.
//!
//! 이 모듈은 분석 파이프라인에 들어오는 캔들 데이터의 검증 에러를 정의합니다.
//! 계산을 시작하기 전에 발생하며, 분석기는 이 에러로 즉시 실패합니다.

use thiserror::Error;

/// 캔들 데이터 검증 에러.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// 캔들이 하나도 없음
    #[error("캔들 데이터가 비어 있습니다")]
    EmptyInput,

    /// 잘못된 캔들 (시간 역전, 중복 시간, 비정상 수치 등)
    #[error("잘못된 캔들 데이터 (index {index}): {reason}")]
    MalformedInput { index: usize, reason: String },
}

/// 데이터 검증 결과 타입.
pub type DataResult<T> = Result<T, DataError>;

impl DataError {
    /// 특정 인덱스의 잘못된 입력 에러를 생성합니다.
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        DataError::MalformedInput {
            index,
            reason: reason.into(),
        }
    }

    /// 문제가 된 캔들 인덱스를 반환합니다.
    pub fn index(&self) -> Option<usize> {
        match self {
            DataError::EmptyInput => None,
            DataError::MalformedInput { index, .. } => Some(*index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_index() {
        let err = DataError::malformed(7, "중복 시간");
        assert_eq!(err.index(), Some(7));
        assert!(err.to_string().contains("index 7"));

        assert_eq!(DataError::EmptyInput.index(), None);
    }
}
