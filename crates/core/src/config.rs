//! 설정 관리 — sluice.toml 파싱 및 런타임 설정
//!
//! [`SluiceConfig`]는 에이전트 전체 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`SLUICE_TRANSFORMER_ON_ERROR=drop` 형식)
//! 3. 설정 파일 (`sluice.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), sluice_core::error::SluiceError> {
//! use sluice_core::config::SluiceConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = SluiceConfig::load("sluice.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = SluiceConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, SluiceError};

/// 이벤트 본문 최대 크기 기본값 (1 MiB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// sluice 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SluiceConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 변환기 설정
    #[serde(default)]
    pub transformer: TransformerSection,
}

impl SluiceConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SluiceError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SluiceError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SluiceError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                SluiceError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, SluiceError> {
        toml::from_str(toml_str).map_err(|e| {
            SluiceError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `SLUICE_{SECTION}_{FIELD}`
    /// 예: `SLUICE_GENERAL_LOG_LEVEL=debug`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "SLUICE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "SLUICE_GENERAL_LOG_FORMAT");

        // Transformer
        override_string(
            &mut self.transformer.actions_file,
            "SLUICE_TRANSFORMER_ACTIONS_FILE",
        );
        override_csv(
            &mut self.transformer.pattern_paths,
            "SLUICE_TRANSFORMER_PATTERN_PATHS",
        );
        override_string(&mut self.transformer.on_error, "SLUICE_TRANSFORMER_ON_ERROR");
        override_usize(
            &mut self.transformer.max_body_size,
            "SLUICE_TRANSFORMER_MAX_BODY_SIZE",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), SluiceError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        let valid_policies = ["drop", "keep"];
        if !valid_policies.contains(&self.transformer.on_error.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "transformer.on_error".to_owned(),
                reason: format!("must be one of: {}", valid_policies.join(", ")),
            }
            .into());
        }

        if self.transformer.max_body_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "transformer.max_body_size".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self
            .transformer
            .pattern_paths
            .iter()
            .any(|p| p.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "transformer.pattern_paths".to_owned(),
                reason: "entries must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 변환기 설정 (`[transformer]` 섹션)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerSection {
    /// 액션 목록 YAML 파일 경로 (비어 있으면 CLI 인자로 지정)
    pub actions_file: String,
    /// 모든 grok 액션의 `patternPaths` 앞에 추가되는 패턴 소스
    pub pattern_paths: Vec<String>,
    /// 변환 실패 이벤트 처리 방식 (drop, keep)
    pub on_error: String,
    /// 이벤트 본문 최대 크기 (바이트)
    pub max_body_size: usize,
}

impl TransformerSection {
    /// 실패한 이벤트를 버리는 정책인지 여부
    pub fn drops_on_error(&self) -> bool {
        self.on_error == "drop"
    }
}

impl Default for TransformerSection {
    fn default() -> Self {
        Self {
            actions_file: String::new(),
            pattern_paths: Vec::new(),
            on_error: "keep".to_owned(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
