//! grok 컴파일러 — `%{NAME}` / `%{NAME:alias}` 매크로 확장 및 정규식 컴파일
//!
//! 확장은 재귀 하강 방식입니다. 토큰의 조각을 먼저 완전히 확장한 뒤
//! `(조각)` 또는 `(?P<alias>조각)`으로 치환합니다. 확장 중인 이름 스택으로
//! 순환 참조를 감지하며, 깊이는 [`MAX_EXPANSION_DEPTH`]로 제한합니다.
//!
//! 형식에 맞지 않는 토큰(`%{}`, `%{a-b}` 등)은 그대로 남깁니다.

use regex::Regex;

use super::pattern::PatternLibrary;
use crate::error::TransformError;

/// 매크로 확장 최대 깊이
pub const MAX_EXPANSION_DEPTH: usize = 64;

const TOKEN_PATTERN: &str = r"%\{(\w+)(?::([\w.]+))?\}";

/// 컴파일된 grok 표현식
///
/// 생성 이후 불변이며 스레드 간 공유할 수 있습니다.
#[derive(Debug, Clone)]
pub struct CompiledGrok {
    expr: String,
    regex: Regex,
    names: Vec<Option<String>>,
}

impl CompiledGrok {
    /// 원래 match 표현식
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// 확장 후 정규식
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// 캡처 그룹 이름 (엔진 순서, 0번은 전체 매치, 이름 없는 그룹은 `None`)
    pub fn capture_names(&self) -> &[Option<String>] {
        &self.names
    }
}

/// 매크로 확장기
pub struct GrokCompiler<'a> {
    library: &'a PatternLibrary,
    token: Regex,
}

impl<'a> GrokCompiler<'a> {
    /// 라이브러리를 참조하는 컴파일러를 생성합니다.
    pub fn new(library: &'a PatternLibrary) -> Result<Self, TransformError> {
        let token = Regex::new(TOKEN_PATTERN).map_err(|e| TransformError::Compile {
            expr: TOKEN_PATTERN.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self { library, token })
    }

    /// match 표현식을 확장하고 정규식으로 컴파일합니다.
    ///
    /// # Errors
    /// - 라이브러리에 없는 매크로: [`TransformError::UnresolvedMacro`]
    /// - 순환 참조, 깊이 초과, 잘못된 정규식: [`TransformError::Compile`]
    pub fn compile(&self, expr: &str) -> Result<CompiledGrok, TransformError> {
        let expanded = self.expand(expr)?;
        let regex = Regex::new(&expanded).map_err(|e| TransformError::Compile {
            expr: expr.to_owned(),
            reason: e.to_string(),
        })?;
        let names = regex
            .capture_names()
            .map(|name| name.map(str::to_owned))
            .collect();

        tracing::debug!(expr, expanded = %expanded, "compiled grok expression");

        Ok(CompiledGrok {
            expr: expr.to_owned(),
            regex,
            names,
        })
    }

    /// match 표현식의 모든 매크로를 확장합니다.
    pub fn expand(&self, expr: &str) -> Result<String, TransformError> {
        let mut stack = Vec::new();
        self.expand_inner(expr, expr, &mut stack)
    }

    fn expand_inner(
        &self,
        root: &str,
        text: &str,
        stack: &mut Vec<String>,
    ) -> Result<String, TransformError> {
        if stack.len() > MAX_EXPANSION_DEPTH {
            return Err(TransformError::Compile {
                expr: root.to_owned(),
                reason: format!("macro expansion deeper than {MAX_EXPANSION_DEPTH} levels"),
            });
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for caps in self.token.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let name = name.as_str();
            out.push_str(&text[last..whole.start()]);

            if stack.iter().any(|n| n == name) {
                let mut cycle = stack.clone();
                cycle.push(name.to_owned());
                return Err(TransformError::Compile {
                    expr: root.to_owned(),
                    reason: format!("recursive macro reference: {}", cycle.join(" -> ")),
                });
            }

            let fragment = self.library.get(name).ok_or_else(|| {
                tracing::error!(name, expr = root, "unresolved grok macro");
                TransformError::UnresolvedMacro {
                    name: name.to_owned(),
                    expr: root.to_owned(),
                }
            })?;

            stack.push(name.to_owned());
            let expanded = self.expand_inner(root, fragment, stack)?;
            stack.pop();

            match caps.get(2) {
                Some(alias) => {
                    out.push_str("(?P<");
                    out.push_str(alias.as_str());
                    out.push('>');
                    out.push_str(&expanded);
                    out.push(')');
                }
                None => {
                    out.push('(');
                    out.push_str(&expanded);
                    out.push(')');
                }
            }
            last = whole.end();
        }

        out.push_str(&text[last..]);
        Ok(out)
    }
}
