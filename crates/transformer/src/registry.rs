//! 액션 레지스트리 — 이름 → 생성자 테이블
//!
//! [`ActionRegistryBuilder`]로 생성자를 등록한 뒤 [`ActionRegistryBuilder::build`]로
//! 고정합니다. 완성된 [`ActionRegistry`]는 읽기 전용이며, 전역 상태 대신
//! 변환기 빌더에 명시적으로 전달합니다.
//!
//! # 사용 예시
//! ```
//! use sluice_transformer::registry::ActionRegistry;
//!
//! let registry = ActionRegistry::with_builtins();
//! let raw: serde_yaml::Value = serde_yaml::from_str("match: '%{INT:n}'").unwrap();
//! let action = registry.create("grok", &["body".to_owned()], &raw).unwrap();
//! assert_eq!(action.name(), "grok");
//! ```

use std::collections::HashMap;

use crate::action::Action;
use crate::actions::{
    AddAction, CopyAction, DelAction, FlattenAction, MoveAction, ReplaceKeysAction,
    UnderRootAction,
};
use crate::error::TransformError;
use crate::grok::{GROK_ACTION_NAME, GrokAction};

/// 액션 생성자 — (위치 인자, 원시 설정) → 액션
pub type ActionCtor =
    fn(&[String], &serde_yaml::Value) -> Result<Box<dyn Action>, TransformError>;

/// 고정된 액션 레지스트리
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    ctors: HashMap<String, ActionCtor>,
}

impl ActionRegistry {
    /// 레지스트리 빌더를 생성합니다.
    pub fn builder() -> ActionRegistryBuilder {
        ActionRegistryBuilder::new()
    }

    /// 이 크레이트의 모든 내장 액션이 등록된 레지스트리를 생성합니다.
    pub fn with_builtins() -> Self {
        ActionRegistryBuilder::with_builtins().build()
    }

    /// 이름으로 액션을 생성합니다.
    ///
    /// # Errors
    /// 등록되지 않은 이름이면 [`TransformError::Config`], 그 외에는 생성자의 에러
    pub fn create(
        &self,
        name: &str,
        args: &[String],
        raw: &serde_yaml::Value,
    ) -> Result<Box<dyn Action>, TransformError> {
        let ctor = self
            .ctors
            .get(name)
            .ok_or_else(|| TransformError::config(name, "unknown action"))?;
        ctor(args, raw)
    }

    /// 등록 여부
    pub fn contains(&self, name: &str) -> bool {
        self.ctors.contains_key(name)
    }

    /// 이름순으로 정렬된 등록 이름 목록
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ctors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// 등록된 액션 수
    pub fn len(&self) -> usize {
        self.ctors.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.ctors.is_empty()
    }
}

/// 레지스트리 빌더
#[derive(Debug, Default)]
pub struct ActionRegistryBuilder {
    ctors: HashMap<String, ActionCtor>,
}

impl ActionRegistryBuilder {
    /// 빈 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 내장 액션이 미리 등록된 빌더를 생성합니다.
    ///
    /// 내장 이름은 고유하므로 등록이 실패하지 않습니다.
    pub fn with_builtins() -> Self {
        let builtins: [(&str, ActionCtor); 8] = [
            (GROK_ACTION_NAME, GrokAction::create),
            ("add", AddAction::create),
            ("copy", CopyAction::create),
            ("move", MoveAction::create),
            ("del", DelAction::create),
            ("underRoot", UnderRootAction::create),
            ("flatten", FlattenAction::create),
            ("replaceKeys", ReplaceKeysAction::create),
        ];
        Self {
            ctors: builtins
                .into_iter()
                .map(|(name, ctor)| (name.to_owned(), ctor))
                .collect(),
        }
    }

    /// 생성자를 등록합니다.
    ///
    /// # Errors
    /// 같은 이름이 이미 등록되어 있으면 [`TransformError::Config`]
    pub fn register(
        mut self,
        name: impl Into<String>,
        ctor: ActionCtor,
    ) -> Result<Self, TransformError> {
        let name = name.into();
        if self.ctors.contains_key(&name) {
            return Err(TransformError::config(name, "action already registered"));
        }
        self.ctors.insert(name, ctor);
        Ok(self)
    }

    /// 레지스트리를 고정합니다.
    pub fn build(self) -> ActionRegistry {
        tracing::debug!(count = self.ctors.len(), "action registry built");
        ActionRegistry { ctors: self.ctors }
    }
}

#[cfg(test)]
mod tests {
    use sluice_core::event::Event;

    use super::*;

    struct Noop;

    impl Action for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn act(&self, _event: &mut Event) -> Result<(), TransformError> {
            Ok(())
        }
    }

    fn noop_ctor(
        _args: &[String],
        _raw: &serde_yaml::Value,
    ) -> Result<Box<dyn Action>, TransformError> {
        Ok(Box::new(Noop))
    }

    #[test]
    fn builtins_are_registered() {
        let registry = ActionRegistry::with_builtins();
        assert_eq!(
            registry.names(),
            vec![
                "add",
                "copy",
                "del",
                "flatten",
                "grok",
                "move",
                "replaceKeys",
                "underRoot"
            ]
        );
        assert_eq!(registry.len(), 8);
    }

    #[test]
    fn register_custom_action() {
        let registry = ActionRegistry::builder()
            .register("noop", noop_ctor)
            .unwrap()
            .build();
        assert!(registry.contains("noop"));
        let action = registry
            .create("noop", &[], &serde_yaml::Value::Null)
            .unwrap();
        assert_eq!(action.name(), "noop");
    }

    #[test]
    fn duplicate_registration_is_error() {
        let err = ActionRegistryBuilder::with_builtins()
            .register("grok", noop_ctor)
            .unwrap_err();
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn unknown_action_is_config_error() {
        let registry = ActionRegistry::with_builtins();
        match registry.create("nope", &[], &serde_yaml::Value::Null) {
            Err(TransformError::Config { action, reason }) => {
                assert_eq!(action, "nope");
                assert_eq!(reason, "unknown action");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn create_propagates_ctor_errors() {
        let registry = ActionRegistry::with_builtins();
        assert!(
            registry
                .create("grok", &[], &serde_yaml::Value::Null)
                .is_err()
        );
    }

    #[test]
    fn registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ActionRegistry>();
    }
}
