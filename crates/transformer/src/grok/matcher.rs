//! grok 매처 — 컴파일된 표현식을 입력에 적용하여 이름 있는 캡처를 추출합니다.

use sluice_core::value::{Map, Value};

use super::compiler::CompiledGrok;

/// 컴파일된 grok과 빈 값 처리 정책
#[derive(Debug, Clone)]
pub struct GrokMatcher {
    compiled: CompiledGrok,
    ignore_blank: bool,
}

impl GrokMatcher {
    /// 새 매처를 생성합니다.
    pub fn new(compiled: CompiledGrok, ignore_blank: bool) -> Self {
        Self {
            compiled,
            ignore_blank,
        }
    }

    /// 컴파일된 표현식
    pub fn compiled(&self) -> &CompiledGrok {
        &self.compiled
    }

    /// 빈 캡처를 버리는지 여부
    pub fn ignore_blank(&self) -> bool {
        self.ignore_blank
    }

    /// 입력에서 캡처 이름 → 문자열 값을 추출합니다.
    ///
    /// 매칭되지 않으면 빈 매핑을 반환합니다. 이름 없는 그룹은 건너뛰며,
    /// `ignore_blank`이면 빈 문자열 캡처도 건너뜁니다. 참여하지 않은 그룹은
    /// 빈 문자열로 취급합니다.
    pub fn extract(&self, input: &str) -> Map {
        let mut fields = Map::new();
        let Some(caps) = self.compiled.regex().captures(input) else {
            return fields;
        };

        for (idx, name) in self.compiled.capture_names().iter().enumerate() {
            let Some(name) = name else {
                continue;
            };
            let text = caps.get(idx).map_or("", |m| m.as_str());
            if self.ignore_blank && text.is_empty() {
                continue;
            }
            fields.insert(name.clone(), Value::from(text));
        }
        fields
    }
}
