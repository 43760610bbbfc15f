//! 변환기 에러 타입
//!
//! [`TransformError`]는 액션 생성(설정 해석, 패턴 로딩, grok 컴파일)과
//! 이벤트 단위 실행에서 발생하는 모든 에러를 표현합니다.
//! `From<TransformError> for SluiceError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use sluice_core::error::{ObjectError, SluiceError};

/// 변환기 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// 액션 설정 오류 (인자 개수, 필수 필드 누락, 알 수 없는 액션, YAML 디코딩 실패)
    #[error("config error: action '{action}': {reason}")]
    Config {
        /// 액션 이름
        action: String,
        /// 에러 사유
        reason: String,
    },

    /// 매크로 확장 결과가 유효한 정규식이 아니거나 매크로가 순환 참조함
    #[error("compile error: '{expr}': {reason}")]
    Compile {
        /// 원래 match 표현식
        expr: String,
        /// 실패 사유
        reason: String,
    },

    /// 패턴 소스 로딩 실패 (로그만 남기고 건너뜀)
    #[error("pattern load error: {source_name}: {reason}")]
    PatternLoad {
        /// 파일 경로 또는 URL
        source_name: String,
        /// 실패 사유
        reason: String,
    },

    /// 라이브러리에 없는 매크로 이름
    #[error("unresolved macro '%{{{name}}}' in '{expr}'")]
    UnresolvedMacro {
        /// 매크로 이름
        name: String,
        /// 원래 match 표현식
        expr: String,
    },

    /// 매칭 결과에 남은 필드가 없음 (이벤트 단위)
    #[error("match group with grok {expr} is empty")]
    MatchEmpty {
        /// match 표현식
        expr: String,
    },

    /// 이벤트 문서 조작 실패
    #[error("object error: {0}")]
    Object(#[from] ObjectError),

    /// 변환 체인의 특정 단계에서 발생한 에러
    #[error("step {index} ({action}): {source}")]
    Step {
        /// 단계 번호 (0부터)
        index: usize,
        /// 액션 표현식
        action: String,
        /// 원인 에러
        #[source]
        source: Box<TransformError>,
    },
}

impl TransformError {
    /// 설정 에러를 생성합니다.
    pub fn config(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// 이벤트 단위 에러인지 여부
    ///
    /// 생성 시점 에러(설정, 컴파일, 매크로)와 구분할 때 사용합니다.
    pub fn is_per_event(&self) -> bool {
        match self {
            Self::MatchEmpty { .. } | Self::Object(_) => true,
            Self::Step { source, .. } => source.is_per_event(),
            _ => false,
        }
    }

    /// 단계 정보를 붙입니다.
    pub fn at_step(self, index: usize, action: impl Into<String>) -> Self {
        Self::Step {
            index,
            action: action.into(),
            source: Box::new(self),
        }
    }
}

impl From<TransformError> for SluiceError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Object(e) => SluiceError::Object(e),
            other => SluiceError::Transform(other.to_string()),
        }
    }
}
