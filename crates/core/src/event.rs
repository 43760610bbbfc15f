//! 이벤트 모델 — 헤더 문서와 원본 본문
//!
//! [`Event`]는 수집된 로그 한 건을 나타냅니다. 헤더는 중첩 매핑이고 본문은
//! 원본 바이트입니다. 변환 액션은 이벤트를 소유하지 않고 한 번의 호출 동안
//! `&mut Event`로 빌려 사용합니다.
//!
//! 필드 접근은 [`eventops`]의 경로 헬퍼를 통해 수행합니다. 특수 경로 `body`는
//! 헤더가 아니라 원본 본문을 가리킵니다.

use bytes::Bytes;

use crate::value::Map;

/// 원본 본문을 가리키는 특수 필드 이름
pub const BODY_FIELD: &str = "body";

/// 로그 이벤트
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    header: Map,
    body: Bytes,
}

impl Event {
    /// 헤더와 본문으로 이벤트를 생성합니다.
    pub fn new(header: Map, body: impl Into<Bytes>) -> Self {
        Self {
            header,
            body: body.into(),
        }
    }

    /// 빈 헤더와 본문으로 이벤트를 생성합니다.
    pub fn from_body(body: impl Into<Bytes>) -> Self {
        Self::new(Map::new(), body)
    }

    /// 헤더 매핑
    pub fn header(&self) -> &Map {
        &self.header
    }

    /// 변경 가능한 헤더 매핑
    pub fn header_mut(&mut self) -> &mut Map {
        &mut self.header
    }

    /// 헤더 전체를 교체합니다.
    pub fn replace_header(&mut self, header: Map) {
        self.header = header;
    }

    /// 원본 본문
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// 본문을 교체합니다.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// 헤더와 본문으로 분해합니다.
    pub fn into_parts(self) -> (Map, Bytes) {
        (self.header, self.body)
    }
}

/// 이벤트 필드 경로 헬퍼
///
/// 경로는 점 구분 형식(`a.b.c`)이며, `body`는 원본 본문을 가리킵니다.
pub mod eventops {
    use std::borrow::Cow;

    use super::{BODY_FIELD, Event};
    use crate::error::ObjectError;
    use crate::object::{ObjectRef, del_in_map, get_in_map, set_in_map, split_path};
    use crate::value::Value;

    fn lookup<'a>(event: &'a Event, path: &str) -> ObjectRef<'a> {
        get_in_map(&event.header, &split_path(path))
    }

    /// 경로의 값을 조회합니다.
    ///
    /// 본문은 UTF-8 손실 변환된 문자열 값으로 반환됩니다. 빈 본문은 값 없음입니다.
    pub fn get<'a>(event: &'a Event, path: &str) -> Option<Cow<'a, Value>> {
        if path == BODY_FIELD {
            if event.body.is_empty() {
                return None;
            }
            let text = String::from_utf8_lossy(&event.body).into_owned();
            return Some(Cow::Owned(Value::String(text)));
        }
        lookup(event, path).value().map(Cow::Borrowed)
    }

    /// 경로의 값을 문자열로 조회합니다. 값이 없으면 빈 문자열입니다.
    pub fn get_string(event: &Event, path: &str) -> String {
        if path == BODY_FIELD {
            return String::from_utf8_lossy(&event.body).into_owned();
        }
        lookup(event, path).to_string_lossy()
    }

    /// 경로에 값을 설정합니다. `body`는 값의 문자열 표현을 본문 바이트로 씁니다.
    pub fn set(event: &mut Event, path: &str, value: Value) -> Result<(), ObjectError> {
        if path == BODY_FIELD {
            event.body = value.to_string().into_bytes().into();
            return Ok(());
        }
        set_in_map(&mut event.header, &split_path(path), value)
    }

    /// 경로를 삭제합니다. `body`는 본문을 비웁니다. 삭제된 값이 있으면 반환합니다.
    pub fn del(event: &mut Event, path: &str) -> Option<Value> {
        if path == BODY_FIELD {
            let body = std::mem::take(&mut event.body);
            if body.is_empty() {
                return None;
            }
            return Some(Value::String(String::from_utf8_lossy(&body).into_owned()));
        }
        del_in_map(&mut event.header, &split_path(path))
    }

    /// 경로에 null이 아닌 값이 있는지 확인합니다.
    pub fn exist(event: &Event, path: &str) -> bool {
        if path == BODY_FIELD {
            return !event.body.is_empty();
        }
        lookup(event, path)
            .value()
            .is_some_and(|v| !v.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::eventops;
    use super::*;
    use crate::value::Value;

    fn sample() -> Event {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"a":"b","c":1,"d":{"e":"f","n":null}}"#).unwrap();
        let header = match Value::from(json) {
            Value::Map(m) => m,
            _ => unreachable!(),
        };
        Event::new(header, "raw line")
    }

    #[test]
    fn default_event_is_empty() {
        let event = Event::default();
        assert!(event.header().is_empty());
        assert!(event.body().is_empty());
    }

    #[test]
    fn get_string_reads_header_and_body() {
        let event = sample();
        assert_eq!(eventops::get_string(&event, "a"), "b");
        assert_eq!(eventops::get_string(&event, "c"), "1");
        assert_eq!(eventops::get_string(&event, "d.e"), "f");
        assert_eq!(eventops::get_string(&event, "body"), "raw line");
        assert_eq!(eventops::get_string(&event, "missing.path"), "");
    }

    #[test]
    fn get_borrows_header_values() {
        let event = sample();
        let value = eventops::get(&event, "d.e").unwrap();
        assert!(matches!(value, std::borrow::Cow::Borrowed(_)));
        assert_eq!(value.as_str(), Some("f"));
        assert!(eventops::get(&event, "nope").is_none());
    }

    #[test]
    fn get_body_is_lossy_string() {
        let event = Event::from_body(vec![b'o', b'k', 0xff]);
        let value = eventops::get(&event, "body").unwrap();
        assert_eq!(value.as_str(), Some("ok\u{fffd}"));
    }

    #[test]
    fn set_writes_nested_path() {
        let mut event = sample();
        eventops::set(&mut event, "x.y", Value::from("z")).unwrap();
        assert_eq!(eventops::get_string(&event, "x.y"), "z");
    }

    #[test]
    fn set_body_replaces_bytes() {
        let mut event = sample();
        eventops::set(&mut event, "body", Value::from("new body")).unwrap();
        assert_eq!(event.body().as_ref(), b"new body");
        assert!(!event.header().contains_key("body"));
    }

    #[test]
    fn set_rejects_empty_segment() {
        let mut event = sample();
        assert!(eventops::set(&mut event, "a..b", Value::Null).is_err());
    }

    #[test]
    fn set_invalid_path_leaves_header_untouched() {
        let mut event = sample();
        let before = event.clone();
        assert!(eventops::set(&mut event, "x.", Value::from(1_i64)).is_err());
        assert_eq!(event, before);
    }

    #[test]
    fn header_mut_edits_document() {
        let mut event = sample();
        event.header_mut().insert(String::new(), Value::from("blank"));
        assert_eq!(event.header().get(""), Some(&Value::from("blank")));
        assert_eq!(eventops::get_string(&event, ""), "");
    }

    #[test]
    fn del_removes_field_and_body() {
        let mut event = sample();
        assert_eq!(eventops::del(&mut event, "a"), Some(Value::from("b")));
        assert!(!eventops::exist(&event, "a"));

        assert!(eventops::del(&mut event, "body").is_some());
        assert!(event.body().is_empty());
        assert!(eventops::del(&mut event, "body").is_none());
    }

    #[test]
    fn exist_treats_null_and_missing_as_absent() {
        let event = sample();
        assert!(eventops::exist(&event, "a"));
        assert!(eventops::exist(&event, "d.e"));
        assert!(!eventops::exist(&event, "d.n"));
        assert!(!eventops::exist(&event, "a.c"));
        assert!(!eventops::exist(&event, "zzz"));
        assert!(eventops::exist(&event, "body"));
        assert!(!eventops::exist(&Event::default(), "body"));
    }

    #[test]
    fn into_parts_returns_header_and_body() {
        let (header, body) = sample().into_parts();
        assert_eq!(header.get("a"), Some(&Value::from("b")));
        assert_eq!(body.as_ref(), b"raw line");
    }

    #[test]
    fn replace_header_swaps_document() {
        let mut event = sample();
        let mut header = Map::new();
        header.insert("k".to_owned(), Value::from("v"));
        event.replace_header(header);
        assert_eq!(event.header().len(), 1);
        assert_eq!(eventops::get_string(&event, "k"), "v");
    }
}
