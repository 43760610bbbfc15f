//! grok 이외의 내장 필드 액션
//!
//! - [`field`]: add, copy, move, del, underRoot
//! - [`flatten`]: 중첩 매핑 평탄화
//! - [`replace_keys`]: 정규식 기반 키 이름 변경

pub mod field;
pub mod flatten;
pub mod replace_keys;

pub use field::{AddAction, CopyAction, DelAction, MoveAction, UnderRootAction};
pub use flatten::{FlattenAction, FlattenConfig};
pub use replace_keys::{ReplaceKeysAction, ReplaceKeysConfig};
