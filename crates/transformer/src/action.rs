//! 액션 trait과 액션 표현식 파서
//!
//! 액션은 이벤트 한 건에 적용되는 이름 있는 변환 단계입니다.
//! 설정 파일에서는 `grok(body, parsed)`처럼 이름과 위치 인자로 표기합니다.

use sluice_core::event::Event;

use crate::error::TransformError;

/// 필드 대신 헤더 최상위를 가리키는 목적지 센티넬
pub const HEADER_ROOT: &str = "_root";

/// 이벤트 변환 액션
///
/// 생성 이후에는 불변이며 여러 워커가 공유할 수 있습니다.
/// 한 이벤트는 한 번에 하나의 워커만 소유합니다 (`&mut Event`).
pub trait Action: Send + Sync {
    /// 액션 이름 (레지스트리 등록 이름)
    fn name(&self) -> &str;

    /// 이벤트에 변환을 적용합니다.
    fn act(&self, event: &mut Event) -> Result<(), TransformError>;
}

/// 파싱된 액션 표현식 — `name(arg, arg, ...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionExpr {
    /// 액션 이름
    pub name: String,
    /// 위치 인자 (앞뒤 공백 제거됨)
    pub args: Vec<String>,
}

impl ActionExpr {
    /// `name(arg, arg)` 형식의 문자열을 파싱합니다.
    ///
    /// `name()`은 인자가 없는 표현식입니다.
    ///
    /// # Errors
    /// 괄호가 없거나, 이름이 비어 있거나, 닫는 괄호 뒤에 문자가 있거나,
    /// 빈 인자가 있으면 [`TransformError::Config`]를 반환합니다.
    pub fn parse(expr: &str) -> Result<Self, TransformError> {
        let expr = expr.trim();
        let invalid = |reason: &str| TransformError::config(expr, reason);

        let open = expr
            .find('(')
            .ok_or_else(|| invalid("expected 'name(args)'"))?;
        let close = expr
            .rfind(')')
            .ok_or_else(|| invalid("missing closing parenthesis"))?;
        if close < open {
            return Err(invalid("missing closing parenthesis"));
        }
        if close != expr.len() - 1 {
            return Err(invalid("unexpected characters after ')'"));
        }

        let name = expr[..open].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(invalid("invalid action name"));
        }

        let inner = expr[open + 1..close].trim();
        let args = if inner.is_empty() {
            Vec::new()
        } else {
            inner
                .split(',')
                .map(|arg| {
                    let arg = arg.trim();
                    if arg.is_empty() {
                        Err(invalid("empty argument"))
                    } else {
                        Ok(arg.to_owned())
                    }
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            name: name.to_owned(),
            args,
        })
    }
}

impl std::fmt::Display for ActionExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.args.join(", "))
    }
}

impl std::str::FromStr for ActionExpr {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
