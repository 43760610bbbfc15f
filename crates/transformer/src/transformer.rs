//! 변환 체인 — 설정된 액션을 순서대로 이벤트에 적용합니다.
//!
//! # 사용 예시
//! ```
//! use sluice_core::event::{Event, eventops};
//! use sluice_transformer::config::TransformerConfig;
//! use sluice_transformer::registry::ActionRegistry;
//! use sluice_transformer::transformer::TransformerBuilder;
//!
//! let config = TransformerConfig::from_yaml_str(r#"
//! actions:
//!   - action: "grok(body)"
//!     match: "^%{WORD:method} %{UNIXPATH:path}$"
//!   - action: "add(source, web)"
//! "#).unwrap();
//!
//! let registry = ActionRegistry::with_builtins();
//! let transformer = TransformerBuilder::new(&registry).build(&config).unwrap();
//!
//! let mut event = Event::from_body("GET /index.html");
//! transformer.transform(&mut event).unwrap();
//! assert_eq!(eventops::get_string(&event, "method"), "GET");
//! assert_eq!(eventops::get_string(&event, "source"), "web");
//! ```

use std::time::Instant;

use sluice_core::event::Event;
use sluice_core::metrics as sluice_metrics;

use crate::action::{Action, ActionExpr};
use crate::condition::{Condition, parse_condition};
use crate::config::{ActionSpec, TransformerConfig};
use crate::error::TransformError;
use crate::grok::GROK_ACTION_NAME;
use crate::registry::ActionRegistry;

const PATTERN_PATHS_KEY: &str = "patternPaths";

/// 이벤트 한 건의 변환 결과
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// 실행된 단계 수
    pub applied: usize,
    /// 조건 불만족으로 건너뛴 단계 수
    pub skipped: usize,
    /// `ignoreError`로 무시된 실패 수
    pub ignored_errors: usize,
}

struct Step {
    expr: String,
    condition: Option<Box<dyn Condition>>,
    ignore_error: bool,
    action: Box<dyn Action>,
}

/// 컴파일된 변환 체인
///
/// 생성 이후 불변이며 `Send + Sync`입니다.
pub struct Transformer {
    steps: Vec<Step>,
}

impl Transformer {
    /// 단계 수
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// 단계가 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// 각 단계의 액션 표현식
    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.expr.as_str())
    }

    /// 이벤트에 모든 단계를 순서대로 적용합니다.
    ///
    /// # Errors
    /// `ignoreError`가 아닌 단계가 실패하면 [`TransformError::Step`]을 반환하며
    /// 이후 단계는 실행하지 않습니다.
    pub fn transform(&self, event: &mut Event) -> Result<Outcome, TransformError> {
        let started = Instant::now();
        let mut outcome = Outcome::default();
        let result = self.run_steps(event, &mut outcome);

        let label = if result.is_ok() { "success" } else { "failure" };
        metrics::counter!(
            sluice_metrics::TRANSFORMER_EVENTS_TOTAL,
            sluice_metrics::LABEL_RESULT => label
        )
        .increment(1);
        metrics::histogram!(sluice_metrics::TRANSFORMER_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        result.map(|()| outcome)
    }

    fn run_steps(&self, event: &mut Event, outcome: &mut Outcome) -> Result<(), TransformError> {
        for (index, step) in self.steps.iter().enumerate() {
            let enabled = step
                .condition
                .as_ref()
                .is_none_or(|condition| condition.check(event));
            if !enabled {
                outcome.skipped += 1;
                continue;
            }

            match step.action.act(event) {
                Ok(()) => outcome.applied += 1,
                Err(e) => {
                    metrics::counter!(
                        sluice_metrics::TRANSFORMER_ACTION_ERRORS_TOTAL,
                        sluice_metrics::LABEL_ACTION => step.action.name().to_owned()
                    )
                    .increment(1);

                    if step.ignore_error {
                        tracing::debug!(step = index, action = %step.expr, error = %e, "ignoring action error");
                        outcome.ignored_errors += 1;
                        continue;
                    }
                    return Err(e.at_step(index, step.expr.clone()));
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Transformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformer")
            .field("steps", &self.step_names().collect::<Vec<_>>())
            .finish()
    }
}

/// 변환 체인 빌더
pub struct TransformerBuilder<'a> {
    registry: &'a ActionRegistry,
    global_pattern_paths: Vec<String>,
}

impl<'a> TransformerBuilder<'a> {
    /// 레지스트리를 사용하는 빌더를 생성합니다.
    pub fn new(registry: &'a ActionRegistry) -> Self {
        Self {
            registry,
            global_pattern_paths: Vec::new(),
        }
    }

    /// 모든 grok 단계의 `patternPaths` 앞에 추가할 패턴 소스를 지정합니다.
    pub fn global_pattern_paths(mut self, paths: impl IntoIterator<Item = String>) -> Self {
        self.global_pattern_paths = paths.into_iter().collect();
        self
    }

    /// 설정의 모든 단계를 생성합니다. 하나라도 실패하면 즉시 에러를 반환합니다.
    pub fn build(&self, config: &TransformerConfig) -> Result<Transformer, TransformError> {
        let mut steps = Vec::with_capacity(config.actions.len());
        for (index, spec) in config.actions.iter().enumerate() {
            let step = self
                .build_step(spec)
                .map_err(|e| e.at_step(index, spec.action.clone()))?;
            steps.push(step);
        }

        tracing::info!(steps = steps.len(), "transformer built");
        Ok(Transformer { steps })
    }

    fn build_step(&self, spec: &ActionSpec) -> Result<Step, TransformError> {
        let expr = ActionExpr::parse(&spec.action)?;
        let condition = spec
            .condition
            .as_deref()
            .map(parse_condition)
            .transpose()?;

        let mut raw = spec.extra.clone();
        if expr.name == GROK_ACTION_NAME && !self.global_pattern_paths.is_empty() {
            self.inject_pattern_paths(&mut raw);
        }

        let action = self
            .registry
            .create(&expr.name, &expr.args, &serde_yaml::Value::Mapping(raw))?;

        Ok(Step {
            expr: expr.to_string(),
            condition,
            ignore_error: spec.ignore_error,
            action,
        })
    }

    fn inject_pattern_paths(&self, raw: &mut serde_yaml::Mapping) {
        let mut paths: Vec<serde_yaml::Value> = self
            .global_pattern_paths
            .iter()
            .map(|p| serde_yaml::Value::from(p.as_str()))
            .collect();
        match raw.get(PATTERN_PATHS_KEY) {
            Some(serde_yaml::Value::Sequence(own)) => paths.extend(own.iter().cloned()),
            Some(other) => paths.push(other.clone()),
            None => {}
        }
        raw.insert(
            serde_yaml::Value::from(PATTERN_PATHS_KEY),
            serde_yaml::Value::Sequence(paths),
        );
    }
}
