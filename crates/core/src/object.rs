//! Object 접근자 — 중첩 매핑에 대한 경로 기반 조회/설정/삭제/평탄화/키 변환
//!
//! 이벤트 문서의 형태는 소스마다 다르므로, 필드를 다루는 모든 액션은
//! 문서 구조를 미리 알지 못해도 동작하는 경로 접근자를 사용합니다.
//!
//! - [`ObjectRef`]: 읽기 전용 뷰. 값이 없으면 "no value" 상태(`None`)를 감쌉니다.
//! - [`Object`]: `&mut Value`를 감싸는 쓰기 뷰. 설정/삭제/키 변환을 수행합니다.
//!
//! "값 없음"은 에러가 아닙니다. 조회는 경로가 하나라도 끊기면 항상 "no value"를
//! 반환하며, 중간 결과를 반환하지 않습니다.
//!
//! # 사용 예시
//! ```
//! use sluice_core::object::Object;
//! use sluice_core::value::Value;
//!
//! let mut doc = Value::new_map();
//! let mut obj = Object::new(&mut doc);
//! obj.set_path("d.e", Value::from("f")).unwrap();
//! assert_eq!(obj.get_path("d.e").as_str(), Some("f"));
//! assert!(obj.get_path("d.x").is_absent());
//! ```

use crate::error::ObjectError;
use crate::value::{Map, Value};

/// 평탄화/키 변환 시 허용하는 최대 중첩 깊이
pub const MAX_DEPTH: usize = 128;

/// 점(`.`)으로 구분된 경로를 세그먼트로 분리합니다.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('.').collect()
}

/// 점 구분 경로가 쓰기 가능한 형태인지 검사합니다.
///
/// # Errors
/// 빈 세그먼트가 있으면 [`ObjectError::InvalidPath`]
pub fn validate_path(path: &str) -> Result<(), ObjectError> {
    validate_segments(&split_path(path)).map(|_| ())
}

// ─── ObjectRef ───────────────────────────────────────────────────────

/// 읽기 전용 Object 뷰
///
/// `None`은 "no value" 센티넬입니다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectRef<'a> {
    data: Option<&'a Value>,
}

impl<'a> ObjectRef<'a> {
    /// 값을 감싸는 뷰를 생성합니다.
    pub fn new(data: &'a Value) -> Self {
        Self { data: Some(data) }
    }

    /// "no value" 뷰를 생성합니다.
    pub fn absent() -> Self {
        Self { data: None }
    }

    /// 단일 세그먼트 조회
    ///
    /// 감싼 값이 매핑이 아니거나 키가 없으면 "no value"를 반환합니다.
    pub fn get(&self, key: &str) -> ObjectRef<'a> {
        if key.is_empty() {
            return Self::absent();
        }
        match self.data {
            Some(Value::Map(map)) => Self {
                data: map.get(key),
            },
            _ => Self::absent(),
        }
    }

    /// 세그먼트 목록을 순서대로 따라 내려갑니다 (all-or-nothing).
    ///
    /// 세그먼트가 없으면 감싼 값 자신을 반환합니다.
    pub fn get_paths<S: AsRef<str>>(&self, paths: &[S]) -> ObjectRef<'a> {
        let mut current = *self;
        for segment in paths {
            current = current.get(segment.as_ref());
            if current.is_absent() {
                break;
            }
        }
        current
    }

    /// 점 구분 경로로 조회합니다.
    pub fn get_path(&self, query: &str) -> ObjectRef<'a> {
        self.get_paths(&split_path(query))
    }

    /// 감싼 값을 반환합니다.
    pub fn value(&self) -> Option<&'a Value> {
        self.data
    }

    /// "no value" 여부
    pub fn is_absent(&self) -> bool {
        self.data.is_none()
    }

    /// 문자열 값이면 `&str`을 반환합니다.
    pub fn as_str(&self) -> Option<&'a str> {
        self.data.and_then(Value::as_str)
    }

    /// 값을 문자열로 변환합니다. "no value"는 빈 문자열입니다.
    pub fn to_string_lossy(&self) -> String {
        self.data.map(Value::to_string).unwrap_or_default()
    }
}

// ─── Object ──────────────────────────────────────────────────────────

/// 쓰기 가능한 Object 뷰
///
/// 문서를 소유하지 않고 한 번의 조작 동안만 `&mut Value`를 빌립니다.
#[derive(Debug)]
pub struct Object<'a> {
    data: &'a mut Value,
}

impl<'a> Object<'a> {
    /// 값을 감싸는 Object를 생성합니다.
    pub fn new(data: &'a mut Value) -> Self {
        Self { data }
    }

    /// 읽기 전용 뷰
    pub fn view(&self) -> ObjectRef<'_> {
        ObjectRef::new(self.data)
    }

    /// 감싼 값
    pub fn value(&self) -> &Value {
        self.data
    }

    /// 단일 세그먼트 조회
    pub fn get(&self, key: &str) -> ObjectRef<'_> {
        self.view().get(key)
    }

    /// 세그먼트 목록 조회
    pub fn get_paths<S: AsRef<str>>(&self, paths: &[S]) -> ObjectRef<'_> {
        self.view().get_paths(paths)
    }

    /// 점 구분 경로 조회
    pub fn get_path(&self, query: &str) -> ObjectRef<'_> {
        self.view().get_path(query)
    }

    /// 경로에 값을 설정합니다.
    ///
    /// 없는 중간 세그먼트는 빈 매핑으로 생성합니다. 매핑이 아닌 중간 값(루트 포함)은
    /// 새 매핑으로 덮어씁니다.
    ///
    /// # Errors
    /// 세그먼트가 없거나 빈 세그먼트가 있으면 [`ObjectError::InvalidPath`]
    pub fn set_paths<S: AsRef<str>>(&mut self, paths: &[S], value: Value) -> Result<(), ObjectError> {
        let segments = validate_segments(paths)?;
        if !self.data.is_map() {
            if !self.data.is_null() {
                tracing::debug!(
                    kind = self.data.kind(),
                    "overwriting non-map value with a new map"
                );
            }
            *self.data = Value::new_map();
        }
        if let Value::Map(map) = &mut *self.data {
            set_in(map, &segments, value);
        }
        Ok(())
    }

    /// 점 구분 경로에 값을 설정합니다.
    pub fn set_path(&mut self, path: &str, value: Value) -> Result<(), ObjectError> {
        self.set_paths(&split_path(path), value)
    }

    /// 경로의 마지막 키를 부모 매핑에서 제거합니다.
    ///
    /// 중간 경로가 없으면 아무것도 하지 않습니다. 제거된 값이 있으면 반환합니다.
    pub fn del_paths<S: AsRef<str>>(&mut self, paths: &[S]) -> Option<Value> {
        let (last, parents) = paths.split_last()?;
        let mut current: &mut Value = self.data;
        for segment in parents {
            current = match current {
                Value::Map(map) => map.get_mut(segment.as_ref())?,
                _ => return None,
            };
        }
        current.as_map_mut()?.remove(last.as_ref())
    }

    /// 점 구분 경로를 삭제합니다.
    pub fn del_path(&mut self, path: &str) -> Option<Value> {
        self.del_paths(&split_path(path))
    }

    /// 중첩 매핑을 한 단계 매핑으로 평탄화합니다.
    ///
    /// 키는 원래 경로 세그먼트를 `separator`로 이어 붙인 값입니다.
    /// 매핑이 아닌 리프 값은 그대로 복사합니다. null 루트는 빈 매핑을 반환합니다.
    ///
    /// # Errors
    /// - 루트가 매핑도 null도 아닌 경우
    /// - 중첩 깊이가 [`MAX_DEPTH`]를 초과하는 경우
    /// - 서로 다른 경로가 같은 평탄화 키로 합쳐지는 경우
    pub fn flat_key_value(&self, separator: &str) -> Result<Map, ObjectError> {
        match &*self.data {
            Value::Map(map) => flatten_map(map, separator),
            Value::Null => Ok(Map::new()),
            other => Err(ObjectError::Serialization(format!(
                "cannot flatten {} value",
                other.kind()
            ))),
        }
    }

    /// 모든 깊이의 키에 `key_fn`을 적용하여 이름을 바꿉니다.
    ///
    /// `key_fn`이 빈 문자열을 반환하면 키를 유지합니다. 값(중첩 매핑 포함)은 그대로
    /// 새 키로 옮겨지며, 중첩 매핑은 부모 키 변경 여부와 무관하게 재귀 처리됩니다.
    /// 같은 레벨에서 새 키가 기존 키와 겹치면 키 순서상 나중에 삽입된 값이 남습니다.
    ///
    /// # Errors
    /// 중첩 깊이가 [`MAX_DEPTH`]를 초과하면 문서를 변경하지 않고 에러를 반환합니다.
    pub fn convert_keys<F>(&mut self, key_fn: F) -> Result<(), ObjectError>
    where
        F: FnMut(&str) -> String,
    {
        match &mut *self.data {
            Value::Map(map) => convert_map_keys(map, key_fn),
            _ => Ok(()),
        }
    }
}

// ─── 매핑 루트 ───────────────────────────────────────────────────────
//
// 이벤트 헤더처럼 루트가 항상 매핑인 문서를 `Value`로 감싸지 않고 다룹니다.

/// 매핑 루트에서 세그먼트 목록을 조회합니다.
pub fn get_in_map<'a, S: AsRef<str>>(map: &'a Map, paths: &[S]) -> ObjectRef<'a> {
    match paths.split_first() {
        Some((head, rest)) if !head.as_ref().is_empty() => map
            .get(head.as_ref())
            .map_or_else(ObjectRef::absent, |child| ObjectRef::new(child).get_paths(rest)),
        _ => ObjectRef::absent(),
    }
}

/// 매핑 루트에 값을 설정합니다. 동작은 [`Object::set_paths`]와 같습니다.
///
/// # Errors
/// 세그먼트가 없거나 빈 세그먼트가 있으면 [`ObjectError::InvalidPath`]
pub fn set_in_map<S: AsRef<str>>(
    map: &mut Map,
    paths: &[S],
    value: Value,
) -> Result<(), ObjectError> {
    let segments = validate_segments(paths)?;
    set_in(map, &segments, value);
    Ok(())
}

/// 매핑 루트에서 경로를 삭제합니다. 동작은 [`Object::del_paths`]와 같습니다.
pub fn del_in_map<S: AsRef<str>>(map: &mut Map, paths: &[S]) -> Option<Value> {
    let (head, rest) = paths.split_first()?;
    if rest.is_empty() {
        return map.remove(head.as_ref());
    }
    Object::new(map.get_mut(head.as_ref())?).del_paths(rest)
}

/// 매핑 루트를 평탄화합니다. 동작은 [`Object::flat_key_value`]와 같습니다.
///
/// # Errors
/// 중첩 깊이 초과 또는 평탄화 키 충돌 시 [`ObjectError::Serialization`]
pub fn flatten_map(map: &Map, separator: &str) -> Result<Map, ObjectError> {
    let mut out = Map::new();
    flatten_into(map, "", separator, 0, &mut out)?;
    Ok(out)
}

/// 매핑 루트의 모든 키를 변환합니다. 동작은 [`Object::convert_keys`]와 같습니다.
///
/// # Errors
/// 중첩 깊이가 [`MAX_DEPTH`]를 초과하면 매핑을 변경하지 않고 에러를 반환합니다.
pub fn convert_map_keys<F>(map: &mut Map, mut key_fn: F) -> Result<(), ObjectError>
where
    F: FnMut(&str) -> String,
{
    check_depth(map, 0)?;
    rename_keys(map, &mut key_fn);
    Ok(())
}

// --- 내부 헬퍼 ---

fn validate_segments<S: AsRef<str>>(paths: &[S]) -> Result<Vec<&str>, ObjectError> {
    let segments: Vec<&str> = paths.iter().map(AsRef::as_ref).collect();
    if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
        return Err(ObjectError::InvalidPath {
            path: segments.join("."),
        });
    }
    Ok(segments)
}

fn set_in(map: &mut Map, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            map.insert((*last).to_owned(), value);
        }
        [head, rest @ ..] => {
            let child = map
                .entry((*head).to_owned())
                .or_insert_with(Value::new_map);
            if !child.is_map() {
                if !child.is_null() {
                    tracing::debug!(
                        field = *head,
                        kind = child.kind(),
                        "overwriting non-map value with a new map"
                    );
                }
                *child = Value::new_map();
            }
            if let Value::Map(inner) = child {
                set_in(inner, rest, value);
            }
        }
    }
}

fn flatten_into(
    map: &Map,
    prefix: &str,
    separator: &str,
    depth: usize,
    out: &mut Map,
) -> Result<(), ObjectError> {
    if depth > MAX_DEPTH {
        return Err(ObjectError::Serialization(format!(
            "nesting deeper than {MAX_DEPTH} levels at '{prefix}'"
        )));
    }

    for (key, value) in map {
        let flat_key = if depth == 0 {
            key.clone()
        } else {
            format!("{prefix}{separator}{key}")
        };

        match value {
            Value::Map(inner) => flatten_into(inner, &flat_key, separator, depth + 1, out)?,
            leaf => {
                if out.insert(flat_key.clone(), leaf.clone()).is_some() {
                    return Err(ObjectError::Serialization(format!(
                        "flattened key '{flat_key}' collides with an existing key"
                    )));
                }
            }
        }
    }

    Ok(())
}

fn check_depth(map: &Map, depth: usize) -> Result<(), ObjectError> {
    if depth > MAX_DEPTH {
        return Err(ObjectError::Serialization(format!(
            "nesting deeper than {MAX_DEPTH} levels"
        )));
    }
    for value in map.values() {
        if let Value::Map(inner) = value {
            check_depth(inner, depth + 1)?;
        }
    }
    Ok(())
}

fn rename_keys<F>(map: &mut Map, key_fn: &mut F)
where
    F: FnMut(&str) -> String,
{
    let entries = std::mem::take(map);
    for (key, mut value) in entries {
        if let Value::Map(inner) = &mut value {
            rename_keys(inner, key_fn);
        }
        let renamed = key_fn(&key);
        let key = if renamed.is_empty() { key } else { renamed };
        map.insert(key, value);
    }
}
