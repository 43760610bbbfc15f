//! replaceKeys 액션 — 정규식에 맞는 키 이름을 모든 깊이에서 바꿉니다.
//!
//! ```yaml
//! - action: "replaceKeys()"
//!   pattern: "^kubernetes\\.io/"
//!   replacement: "k8s_"
//! ```
//!
//! 치환 문자열은 `regex` 크레이트 문법(`$1`, `${name}`)을 따릅니다.

use regex::Regex;
use serde::{Deserialize, Serialize};
use sluice_core::event::{Event, eventops};
use sluice_core::object::{Object, convert_map_keys};

use crate::action::Action;
use crate::config::decode;
use crate::error::TransformError;

/// replaceKeys 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplaceKeysConfig {
    /// 키 정규식
    pub pattern: String,
    /// 치환 문자열
    #[serde(default)]
    pub replacement: String,
}

/// `replaceKeys(key?)` 액션
#[derive(Debug)]
pub struct ReplaceKeysAction {
    key: Option<String>,
    pattern: Regex,
    replacement: String,
}

impl ReplaceKeysAction {
    /// 레지스트리 생성자
    pub fn create(
        args: &[String],
        raw: &serde_yaml::Value,
    ) -> Result<Box<dyn Action>, TransformError> {
        let key = match args {
            [] => None,
            [key] => Some(key.clone()),
            _ => {
                return Err(TransformError::config(
                    "replaceKeys",
                    "invalid args, usage: replaceKeys() or replaceKeys(key)",
                ));
            }
        };
        let config: ReplaceKeysConfig = decode(raw, "replaceKeys")?;
        let pattern = Regex::new(&config.pattern).map_err(|e| TransformError::Compile {
            expr: config.pattern.clone(),
            reason: e.to_string(),
        })?;
        Ok(Box::new(Self {
            key,
            pattern,
            replacement: config.replacement,
        }))
    }

    fn rename(&self, key: &str) -> String {
        if !self.pattern.is_match(key) {
            return String::new();
        }
        self.pattern
            .replace_all(key, self.replacement.as_str())
            .into_owned()
    }
}

impl Action for ReplaceKeysAction {
    fn name(&self) -> &str {
        "replaceKeys"
    }

    fn act(&self, event: &mut Event) -> Result<(), TransformError> {
        match &self.key {
            None => convert_map_keys(event.header_mut(), |k| self.rename(k))?,
            Some(key) => {
                let Some(mut value) = eventops::get(event, key)
                    .filter(|v| v.is_map())
                    .map(|v| v.into_owned())
                else {
                    return Ok(());
                };
                Object::new(&mut value).convert_keys(|k| self.rename(k))?;
                eventops::set(event, key, value)?;
            }
        }
        Ok(())
    }
}
