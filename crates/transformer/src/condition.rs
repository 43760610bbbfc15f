//! 실행 조건 — 액션 단계를 필드 존재 여부에 따라 건너뜁니다.
//!
//! 지원하는 조건은 `exist(field)` 하나입니다.

use sluice_core::event::{Event, eventops};

use crate::action::ActionExpr;
use crate::error::TransformError;

/// 이벤트에 대한 불리언 조건
pub trait Condition: Send + Sync {
    /// 조건 이름
    fn name(&self) -> &str;

    /// 이벤트가 조건을 만족하는지 검사합니다.
    fn check(&self, event: &Event) -> bool;
}

/// `exist(field)` — 필드가 존재하고 null이 아니면 참
#[derive(Debug, Clone)]
pub struct Exist {
    field: String,
}

impl Exist {
    /// 새 조건을 생성합니다.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Condition for Exist {
    fn name(&self) -> &str {
        "exist"
    }

    fn check(&self, event: &Event) -> bool {
        eventops::exist(event, &self.field)
    }
}

/// 조건 표현식을 파싱합니다.
///
/// # Errors
/// 알 수 없는 조건 이름이거나 인자 개수가 맞지 않으면 [`TransformError::Config`]
pub fn parse_condition(expr: &str) -> Result<Box<dyn Condition>, TransformError> {
    let parsed = ActionExpr::parse(expr)?;
    match parsed.name.as_str() {
        "exist" => match parsed.args.as_slice() {
            [field] => Ok(Box::new(Exist::new(field.as_str()))),
            _ => Err(TransformError::config("exist", "usage: exist(field)")),
        },
        other => Err(TransformError::config(
            other,
            "unknown condition, supported: exist",
        )),
    }
}

#[cfg(test)]
mod tests {
    use sluice_core::value::Value;

    use super::*;

    fn event() -> Event {
        let mut event = Event::from_body("line");
        eventops::set(&mut event, "a.b", Value::from("x")).unwrap();
        eventops::set(&mut event, "n", Value::Null).unwrap();
        event
    }

    #[test]
    fn exist_true_for_present_field() {
        assert!(Exist::new("a.b").check(&event()));
        assert!(Exist::new("a").check(&event()));
    }

    #[test]
    fn exist_false_for_missing_or_null() {
        let event = event();
        assert!(!Exist::new("a.c").check(&event));
        assert!(!Exist::new("n").check(&event));
        assert!(!Exist::new("a.b.c").check(&event));
    }

    #[test]
    fn parse_exist_expression() {
        let cond = parse_condition("exist(a.b)").unwrap();
        assert_eq!(cond.name(), "exist");
        assert!(cond.check(&event()));
    }

    #[test]
    fn parse_rejects_unknown_condition() {
        let err = match parse_condition("equal(a, b)") {
            Err(e) => e,
            Ok(_) => panic!("expected error"),
        };
        assert!(err.to_string().contains("unknown condition"));
    }

    #[test]
    fn parse_rejects_wrong_arity() {
        assert!(parse_condition("exist()").is_err());
        assert!(parse_condition("exist(a, b)").is_err());
    }
}
