#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod object;
pub mod value;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, ObjectError, SluiceError};

// 설정
pub use config::SluiceConfig;

// 이벤트
pub use event::{Event, eventops};

// 값 모델 / Object 접근자
pub use object::{Object, ObjectRef};
pub use value::{Map, Value};
