//! grok 액션 — 소스 필드를 매칭하여 추출한 필드를 이벤트에 기록합니다.
//!
//! ```yaml
//! - action: "grok(body)"          # 결과를 헤더 최상위에 기록
//!   match: "^%{IPV4:ip} %{WORD:method}$"
//! - action: "grok(message, http)" # 결과를 http 매핑으로 기록하고 message 삭제
//!   match: "%{WORD:method} %{UNIXPATH:path}"
//!   ignoreBlank: false
//!   patternPaths: ["/etc/sluice/patterns"]
//!   pattern:
//!     METHOD: "GET|POST"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sluice_core::event::{Event, eventops};
use sluice_core::metrics as sluice_metrics;
use sluice_core::object::validate_path;
use sluice_core::value::Value;

use super::compiler::GrokCompiler;
use super::matcher::GrokMatcher;
use super::pattern::PatternLibrary;
use crate::action::{Action, HEADER_ROOT};
use crate::config::decode;
use crate::error::TransformError;

/// 레지스트리 등록 이름
pub const GROK_ACTION_NAME: &str = "grok";

/// 인자 오류 시 안내 문구
pub const GROK_USAGE: &str = "usage: grok(key) or grok(key, to)";

/// grok 액션 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GrokConfig {
    /// match 표현식 (필수)
    #[serde(rename = "match")]
    pub match_expr: String,
    /// 빈 캡처를 버릴지 여부 (기본값 true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_blank: Option<bool>,
    /// 패턴 소스 (디렉토리, 파일, URL)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pattern_paths: Vec<String>,
    /// 인라인 패턴 (가장 높은 우선순위)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pattern: BTreeMap<String, String>,
}

impl GrokConfig {
    /// 내장 패턴 → 패턴 소스 → 인라인 패턴 순서로 라이브러리를 구성합니다.
    ///
    /// 소스 로딩 실패는 기록만 하고 계속 진행합니다.
    pub fn build_library(&self) -> PatternLibrary {
        let mut library = PatternLibrary::builtin();
        if !self.pattern_paths.is_empty() {
            library.load_sources(&self.pattern_paths);
        }
        library.extend(
            self.pattern
                .iter()
                .map(|(name, fragment)| (name.clone(), fragment.clone())),
        );
        library
    }
}

/// grok 액션
#[derive(Debug)]
pub struct GrokAction {
    key: String,
    to: String,
    matcher: GrokMatcher,
}

impl GrokAction {
    /// 위치 인자와 원시 YAML 설정으로 액션을 생성합니다.
    ///
    /// # Errors
    /// - 인자가 1개 또는 2개가 아닌 경우, `match`가 없거나 비어 있는 경우,
    ///   알 수 없는 설정 키가 있는 경우: [`TransformError::Config`]
    /// - 매크로 확장/정규식 컴파일 실패: [`TransformError::UnresolvedMacro`],
    ///   [`TransformError::Compile`]
    pub fn new(args: &[String], raw: &serde_yaml::Value) -> Result<Self, TransformError> {
        let (key, to) = match args {
            [key] => (key.clone(), HEADER_ROOT.to_owned()),
            [key, to] => (key.clone(), to.clone()),
            _ => {
                return Err(TransformError::config(
                    GROK_ACTION_NAME,
                    format!("invalid args, {GROK_USAGE}"),
                ));
            }
        };
        let config: GrokConfig = decode(raw, GROK_ACTION_NAME)?;
        Self::with_config(key, to, &config)
    }

    /// 타입 있는 설정으로 액션을 생성합니다.
    ///
    /// 목적지 경로와 (루트 모드의) 캡처 이름은 이 시점에 검증하므로
    /// 이벤트 처리 중에는 경로 에러가 발생하지 않습니다.
    pub fn with_config(
        key: impl Into<String>,
        to: impl Into<String>,
        config: &GrokConfig,
    ) -> Result<Self, TransformError> {
        if config.match_expr.trim().is_empty() {
            return Err(TransformError::config(
                GROK_ACTION_NAME,
                "'match' is required",
            ));
        }

        let to = to.into();
        if to != HEADER_ROOT {
            validate_path(&to).map_err(|e| {
                TransformError::config(GROK_ACTION_NAME, format!("invalid destination: {e}"))
            })?;
        }

        let library = config.build_library();
        let compiled = GrokCompiler::new(&library)?.compile(&config.match_expr)?;
        // 루트 모드에서만 캡처 이름이 경로로 해석됨
        if to == HEADER_ROOT {
            for name in compiled.capture_names().iter().flatten() {
                validate_path(name).map_err(|e| {
                    TransformError::config(GROK_ACTION_NAME, format!("invalid capture name: {e}"))
                })?;
            }
        }
        let matcher = GrokMatcher::new(compiled, config.ignore_blank.unwrap_or(true));

        Ok(Self {
            key: key.into(),
            to,
            matcher,
        })
    }

    /// 레지스트리 생성자
    pub fn create(
        args: &[String],
        raw: &serde_yaml::Value,
    ) -> Result<Box<dyn Action>, TransformError> {
        Ok(Box::new(Self::new(args, raw)?))
    }

    /// 소스 필드
    pub fn key(&self) -> &str {
        &self.key
    }

    /// 목적지 필드 (`_root`이면 헤더 최상위)
    pub fn to(&self) -> &str {
        &self.to
    }

    /// 매처
    pub fn matcher(&self) -> &GrokMatcher {
        &self.matcher
    }
}

impl Action for GrokAction {
    fn name(&self) -> &str {
        GROK_ACTION_NAME
    }

    fn act(&self, event: &mut Event) -> Result<(), TransformError> {
        let input = eventops::get_string(event, &self.key);
        let fields = self.matcher.extract(&input);

        if fields.is_empty() {
            metrics::counter!(sluice_metrics::GROK_MATCH_EMPTY_TOTAL).increment(1);
            return Err(TransformError::MatchEmpty {
                expr: self.matcher.compiled().expr().to_owned(),
            });
        }

        if self.to == HEADER_ROOT {
            for (field, value) in fields {
                eventops::set(event, &field, value)?;
            }
        } else {
            eventops::set(event, &self.to, Value::Map(fields))?;
        }

        // 루트 모드에서 소스 키와 같은 이름의 캡처도 함께 삭제됨
        if self.key != self.to {
            eventops::del(event, &self.key);
        }

        Ok(())
    }
}
