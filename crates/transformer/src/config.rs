//! 변환 체인 설정 — YAML 액션 목록과 액션별 설정 디코딩
//!
//! # 설정 형식
//! ```yaml
//! actions:
//!   - action: "grok(body)"
//!     match: "^%{IPV4:client} %{WORD:method} %{UNIXPATH:path}$"
//!     ignoreBlank: true
//!   - action: "move(client, http.client)"
//!     if: "exist(client)"
//!   - action: "del(noise)"
//!     ignoreError: true
//! ```
//!
//! `action`, `if`, `ignoreError` 이외의 키는 모두 해당 액션의 설정으로 전달됩니다.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::TransformError;

/// 변환 체인 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformerConfig {
    /// 순서대로 실행할 액션 목록
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

impl TransformerConfig {
    /// YAML 문자열에서 설정을 파싱합니다.
    ///
    /// 파싱 에러 메시지에는 줄/열 위치가 포함됩니다.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TransformError> {
        serde_yaml::from_str(yaml).map_err(|e| TransformError::config("actions", pretty_error(&e)))
    }

    /// YAML 파일에서 설정을 로드합니다.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TransformError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TransformError::config(
                "actions",
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        Self::from_yaml_str(&content)
    }
}

/// 체인의 한 단계
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// 액션 표현식 (`name(arg, ...)`)
    pub action: String,
    /// 실행 조건 (`exist(field)`)
    #[serde(default, rename = "if", skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// 실패해도 다음 단계로 진행할지 여부
    #[serde(default, rename = "ignoreError", alias = "ignore_error")]
    pub ignore_error: bool,
    /// 액션별 설정 (나머지 키)
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl ActionSpec {
    /// 액션 표현식만으로 단계를 생성합니다.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            condition: None,
            ignore_error: false,
            extra: serde_yaml::Mapping::new(),
        }
    }

    /// 액션별 설정 키를 추가합니다.
    pub fn with(mut self, key: &str, value: impl Into<serde_yaml::Value>) -> Self {
        self.extra
            .insert(serde_yaml::Value::from(key), value.into());
        self
    }

    /// 실행 조건을 지정합니다.
    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// 실패 무시 여부를 지정합니다.
    pub fn ignore_error(mut self, ignore: bool) -> Self {
        self.ignore_error = ignore;
        self
    }

    /// 액션별 설정을 YAML 값으로 반환합니다.
    pub fn raw_config(&self) -> serde_yaml::Value {
        serde_yaml::Value::Mapping(self.extra.clone())
    }
}

/// 액션별 원시 설정을 타입 있는 설정으로 디코딩합니다.
///
/// null 설정은 빈 매핑으로 취급합니다.
///
/// # Errors
/// 디코딩 실패 시 [`TransformError::Config`] (serde 메시지 포함)
pub fn decode<T: DeserializeOwned>(
    raw: &serde_yaml::Value,
    action: &str,
) -> Result<T, TransformError> {
    let raw = if raw.is_null() {
        serde_yaml::Value::Mapping(serde_yaml::Mapping::new())
    } else {
        raw.clone()
    };
    serde_yaml::from_value(raw).map_err(|e| TransformError::config(action, pretty_error(&e)))
}

fn pretty_error(err: &serde_yaml::Error) -> String {
    match err.location() {
        Some(loc) => format!(
            "{err} (line {}, column {})",
            loc.line(),
            loc.column()
        ),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Sample {
        name: String,
        #[serde(default)]
        count: u32,
    }

    #[test]
    fn parse_action_list() {
        let yaml = r#"
actions:
  - action: "grok(body)"
    match: "%{INT:n}"
  - action: "del(a)"
    if: "exist(a)"
    ignoreError: true
"#;
        let config = TransformerConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.actions.len(), 2);
        assert_eq!(config.actions[0].action, "grok(body)");
        assert_eq!(
            config.actions[0].extra.get("match"),
            Some(&serde_yaml::Value::from("%{INT:n}"))
        );
        assert_eq!(config.actions[1].condition.as_deref(), Some("exist(a)"));
        assert!(config.actions[1].ignore_error);
        assert!(config.actions[1].extra.is_empty());
    }

    #[test]
    fn parse_empty_document() {
        let config = TransformerConfig::from_yaml_str("actions: []").unwrap();
        assert!(config.actions.is_empty());
    }

    #[test]
    fn parse_error_includes_location() {
        let err = TransformerConfig::from_yaml_str("actions:\n  - action: [unclosed\n").unwrap_err();
        assert!(err.to_string().contains("line"));
    }

    #[test]
    fn missing_action_key_is_error() {
        let err = TransformerConfig::from_yaml_str("actions:\n  - match: x\n").unwrap_err();
        assert!(err.to_string().contains("action"));
    }

    #[test]
    fn decode_typed_config() {
        let raw: serde_yaml::Value = serde_yaml::from_str("name: x\ncount: 3").unwrap();
        let sample: Sample = decode(&raw, "sample").unwrap();
        assert_eq!(
            sample,
            Sample {
                name: "x".to_owned(),
                count: 3
            }
        );
    }

    #[test]
    fn decode_unknown_field_is_config_error() {
        let raw: serde_yaml::Value = serde_yaml::from_str("name: x\nnmae: y").unwrap();
        let err = decode::<Sample>(&raw, "sample").unwrap_err();
        assert!(matches!(err, TransformError::Config { .. }));
        assert!(err.to_string().contains("nmae"));
    }

    #[test]
    fn decode_null_as_empty_mapping() {
        #[derive(Debug, Deserialize, Default)]
        struct AllDefault {
            #[serde(default)]
            flag: bool,
        }
        let cfg: AllDefault = decode(&serde_yaml::Value::Null, "x").unwrap();
        assert!(!cfg.flag);
    }

    #[test]
    fn spec_builder_helpers() {
        let spec = ActionSpec::new("flatten(a)")
            .with("separator", ".")
            .when("exist(a)")
            .ignore_error(true);
        assert_eq!(spec.condition.as_deref(), Some("exist(a)"));
        assert!(spec.ignore_error);
        let raw = spec.raw_config();
        assert_eq!(raw.get("separator"), Some(&serde_yaml::Value::from(".")));
    }
}
