#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`grok`]: 패턴 라이브러리, 매크로 컴파일러, 매처, grok 액션
//! - [`actions`]: add, copy, move, del, underRoot, flatten, replaceKeys
//! - [`action`]: 액션 trait과 `name(arg, ...)` 표현식 파서
//! - [`registry`]: 이름 → 생성자 레지스트리
//! - [`condition`]: `exist(field)` 실행 조건
//! - [`transformer`]: 액션 체인 빌드 및 실행
//! - [`config`]: YAML 액션 목록과 액션별 설정 디코딩
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! actions.yml -> TransformerConfig -> TransformerBuilder(ActionRegistry) -> Transformer
//!                                                                   |
//!                                          Event -> [step -> step -> ...] -> Event
//! ```

pub mod action;
pub mod actions;
pub mod condition;
pub mod config;
pub mod error;
pub mod grok;
pub mod registry;
pub mod transformer;

// --- 주요 타입 re-export ---

// 액션
pub use action::{Action, ActionExpr, HEADER_ROOT};

// grok
pub use grok::{CompiledGrok, GrokAction, GrokCompiler, GrokConfig, GrokMatcher, PatternLibrary};

// 레지스트리
pub use registry::{ActionCtor, ActionRegistry, ActionRegistryBuilder};

// 변환 체인
pub use transformer::{Outcome, Transformer, TransformerBuilder};

// 설정
pub use config::{ActionSpec, TransformerConfig};

// 에러
pub use error::TransformError;
