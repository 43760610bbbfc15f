//! grok — 패턴 매크로 기반 필드 추출
//!
//! # 아키텍처
//! - [`pattern`]: 내장 패턴 테이블과 파일/URL 소스 로딩
//! - [`compiler`]: `%{NAME:alias}` 재귀 확장 및 정규식 컴파일
//! - [`matcher`]: 캡처 추출과 빈 값 정책
//! - [`action`]: 이벤트에 결과를 기록하는 grok 액션
//!
//! ```text
//! builtins + patternPaths + pattern  ->  PatternLibrary
//!                 match expression   ->  GrokCompiler  ->  CompiledGrok
//!                         event      ->  GrokMatcher   ->  fields  ->  Event
//! ```

pub mod action;
pub mod compiler;
pub mod matcher;
pub mod pattern;

pub use action::{GROK_ACTION_NAME, GROK_USAGE, GrokAction, GrokConfig};
pub use compiler::{CompiledGrok, GrokCompiler, MAX_EXPANSION_DEPTH};
pub use matcher::GrokMatcher;
pub use pattern::{BUILTIN_PATTERNS, PatternLibrary};
