//! 단순 필드 액션 — add, copy, move, del, underRoot

use sluice_core::event::{Event, eventops};
use sluice_core::value::Value;

use crate::action::Action;
use crate::error::TransformError;

fn expect_args<'a, const N: usize>(
    action: &str,
    usage: &str,
    args: &'a [String],
) -> Result<&'a [String; N], TransformError> {
    args.try_into()
        .map_err(|_| TransformError::config(action, format!("invalid args, {usage}")))
}

// ─── add ─────────────────────────────────────────────────────────────

/// `add(key, value)` — 문자열 값을 설정합니다.
#[derive(Debug)]
pub struct AddAction {
    key: String,
    value: String,
}

impl AddAction {
    /// 레지스트리 생성자
    pub fn create(
        args: &[String],
        _raw: &serde_yaml::Value,
    ) -> Result<Box<dyn Action>, TransformError> {
        let [key, value] = expect_args::<2>("add", "usage: add(key, value)", args)?;
        Ok(Box::new(Self {
            key: key.clone(),
            value: value.clone(),
        }))
    }
}

impl Action for AddAction {
    fn name(&self) -> &str {
        "add"
    }

    fn act(&self, event: &mut Event) -> Result<(), TransformError> {
        eventops::set(event, &self.key, Value::from(self.value.as_str()))?;
        Ok(())
    }
}

// ─── copy ────────────────────────────────────────────────────────────

/// `copy(from, to)` — 값이 있으면 복사합니다.
#[derive(Debug)]
pub struct CopyAction {
    from: String,
    to: String,
}

impl CopyAction {
    /// 레지스트리 생성자
    pub fn create(
        args: &[String],
        _raw: &serde_yaml::Value,
    ) -> Result<Box<dyn Action>, TransformError> {
        let [from, to] = expect_args::<2>("copy", "usage: copy(from, to)", args)?;
        Ok(Box::new(Self {
            from: from.clone(),
            to: to.clone(),
        }))
    }
}

impl Action for CopyAction {
    fn name(&self) -> &str {
        "copy"
    }

    fn act(&self, event: &mut Event) -> Result<(), TransformError> {
        let Some(value) = eventops::get(event, &self.from).map(|v| v.into_owned()) else {
            return Ok(());
        };
        eventops::set(event, &self.to, value)?;
        Ok(())
    }
}

// ─── move ────────────────────────────────────────────────────────────

/// `move(from, to)` — 값을 옮기고 원래 필드를 삭제합니다.
#[derive(Debug)]
pub struct MoveAction {
    from: String,
    to: String,
}

impl MoveAction {
    /// 레지스트리 생성자
    pub fn create(
        args: &[String],
        _raw: &serde_yaml::Value,
    ) -> Result<Box<dyn Action>, TransformError> {
        let [from, to] = expect_args::<2>("move", "usage: move(from, to)", args)?;
        Ok(Box::new(Self {
            from: from.clone(),
            to: to.clone(),
        }))
    }
}

impl Action for MoveAction {
    fn name(&self) -> &str {
        "move"
    }

    fn act(&self, event: &mut Event) -> Result<(), TransformError> {
        if self.from == self.to {
            return Ok(());
        }
        let Some(value) = eventops::del(event, &self.from) else {
            return Ok(());
        };
        eventops::set(event, &self.to, value)?;
        Ok(())
    }
}

// ─── del ─────────────────────────────────────────────────────────────

/// `del(key, ...)` — 하나 이상의 필드를 삭제합니다.
#[derive(Debug)]
pub struct DelAction {
    keys: Vec<String>,
}

impl DelAction {
    /// 레지스트리 생성자
    pub fn create(
        args: &[String],
        _raw: &serde_yaml::Value,
    ) -> Result<Box<dyn Action>, TransformError> {
        if args.is_empty() {
            return Err(TransformError::config(
                "del",
                "invalid args, usage: del(key, ...)",
            ));
        }
        Ok(Box::new(Self {
            keys: args.to_vec(),
        }))
    }
}

impl Action for DelAction {
    fn name(&self) -> &str {
        "del"
    }

    fn act(&self, event: &mut Event) -> Result<(), TransformError> {
        for key in &self.keys {
            eventops::del(event, key);
        }
        Ok(())
    }
}

// ─── underRoot ───────────────────────────────────────────────────────

/// `underRoot(key)` — 매핑 필드의 내용을 헤더 최상위로 올립니다.
#[derive(Debug)]
pub struct UnderRootAction {
    key: String,
}

impl UnderRootAction {
    /// 레지스트리 생성자
    pub fn create(
        args: &[String],
        _raw: &serde_yaml::Value,
    ) -> Result<Box<dyn Action>, TransformError> {
        let [key] = expect_args::<1>("underRoot", "usage: underRoot(key)", args)?;
        Ok(Box::new(Self { key: key.clone() }))
    }
}

impl Action for UnderRootAction {
    fn name(&self) -> &str {
        "underRoot"
    }

    fn act(&self, event: &mut Event) -> Result<(), TransformError> {
        let is_map = eventops::get(event, &self.key).is_some_and(|v| v.is_map());
        if !is_map {
            return Ok(());
        }
        if let Some(Value::Map(inner)) = eventops::del(event, &self.key) {
            // 각 키는 경로가 아닌 최상위 키 하나
            event.header_mut().extend(inner);
        }
        Ok(())
    }
}
