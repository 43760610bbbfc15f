//! 에러 타입 — 도메인별 에러 정의

/// sluice 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum SluiceError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Object 접근자 에러
    #[error("object error: {0}")]
    Object(#[from] ObjectError),

    /// 변환(액션 생성/실행) 에러
    #[error("transform error: {0}")]
    Transform(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Object 접근자 에러
///
/// 값 부재(absent)는 에러가 아닙니다. 경로 자체가 잘못되었거나
/// 구조를 표현/순회할 수 없을 때만 발생합니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectError {
    /// 빈 경로 또는 빈 세그먼트
    #[error("invalid path '{path}': empty segment")]
    InvalidPath { path: String },

    /// 평탄화/키 변환 불가 (깊이 초과, 키 충돌 등)
    #[error("serialization error: {0}")]
    Serialization(String),
}
