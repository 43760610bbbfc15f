//! flatten 액션 — 중첩 매핑을 구분자로 이어 붙인 한 단계 매핑으로 바꿉니다.
//!
//! ```yaml
//! - action: "flatten()"        # 헤더 전체
//! - action: "flatten(kubernetes)"
//!   separator: "."
//! ```

use serde::{Deserialize, Serialize};
use sluice_core::event::{Event, eventops};
use sluice_core::object::{Object, flatten_map};
use sluice_core::value::Value;

use crate::action::Action;
use crate::config::decode;
use crate::error::TransformError;

/// 기본 구분자
pub const DEFAULT_SEPARATOR: &str = "_";

/// flatten 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlattenConfig {
    /// 키 구분자
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_owned()
}

/// `flatten(key?)` 액션
#[derive(Debug)]
pub struct FlattenAction {
    key: Option<String>,
    separator: String,
}

impl FlattenAction {
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
                    "flatten",
                    "invalid args, usage: flatten() or flatten(key)",
                ));
            }
        };
        let config: FlattenConfig = decode(raw, "flatten")?;
        Ok(Box::new(Self {
            key,
            separator: config.separator,
        }))
    }
}

impl Action for FlattenAction {
    fn name(&self) -> &str {
        "flatten"
    }

    fn act(&self, event: &mut Event) -> Result<(), TransformError> {
        match &self.key {
            None => {
                let flat = flatten_map(event.header(), &self.separator)?;
                event.replace_header(flat);
            }
            Some(key) => {
                let Some(mut value) = eventops::get(event, key)
                    .filter(|v| v.is_map())
                    .map(|v| v.into_owned())
                else {
                    return Ok(());
                };
                let flat = Object::new(&mut value).flat_key_value(&self.separator)?;
                eventops::set(event, key, Value::Map(flat))?;
            }
        }
        Ok(())
    }
}
