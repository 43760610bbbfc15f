//! 값 모델 — 이벤트 헤더를 구성하는 닫힌 합 타입
//!
//! 로그 이벤트의 형태는 정적으로 알 수 없으므로 모든 필드 값은 [`Value`] 하나로 표현합니다.
//! 매핑은 [`Map`] (`BTreeMap`)을 사용하므로 키 순회 순서가 항상 결정적입니다.
//!
//! `#[serde(untagged)]` 직렬화를 사용하므로 JSON/YAML 문서가 그대로 매핑됩니다.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 문자열 키 → 값 매핑
pub type Map = BTreeMap<String, Value>;

/// 이벤트 필드 값
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// null
    #[default]
    Null,
    /// 불리언
    Bool(bool),
    /// 정수
    Int(i64),
    /// 실수
    Float(f64),
    /// 문자열
    String(String),
    /// 배열
    Array(Vec<Value>),
    /// 중첩 매핑
    Map(Map),
}

impl Value {
    /// 빈 매핑 값을 생성합니다.
    pub fn new_map() -> Self {
        Self::Map(Map::new())
    }

    /// null 여부
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// 매핑 여부
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// 문자열이면 `&str`을 반환합니다.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// 매핑이면 참조를 반환합니다.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// 매핑이면 가변 참조를 반환합니다.
    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// 값의 종류 이름 (로그/에러 메시지용)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }
}

/// 스칼라는 그대로, 배열/매핑은 JSON 텍스트로 출력합니다. null은 빈 문자열입니다.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
            Self::Array(_) | Self::Map(_) => {
                let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&text)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Self::Map(m)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                // u64 범위를 넘는 정수와 실수는 f64로 표현
                None => Self::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(arr) => Self::Array(arr.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(obj) => {
                Self::Map(obj.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}
