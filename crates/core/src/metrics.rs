//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 변환기는 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 익스포터는 설치하지 않으므로 레코더가 없으면 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `sluice_`
//! - 모듈명: `transformer_`, `grok_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(sluice_core::metrics::TRANSFORMER_EVENTS_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 액션 이름 레이블 키 (grok, add, copy, ...)
pub const LABEL_ACTION: &str = "action";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Transformer 메트릭 ─────────────────────────────────────────────

/// Transformer: 처리한 전체 이벤트 수 (counter, label: result)
pub const TRANSFORMER_EVENTS_TOTAL: &str = "sluice_transformer_events_total";

/// Transformer: 액션 실행 실패 수 (counter, label: action)
pub const TRANSFORMER_ACTION_ERRORS_TOTAL: &str = "sluice_transformer_action_errors_total";

/// Transformer: 정책에 따라 버려진 이벤트 수 (counter)
pub const TRANSFORMER_EVENTS_DROPPED_TOTAL: &str = "sluice_transformer_events_dropped_total";

/// Transformer: 이벤트 한 건 변환 소요 시간 (histogram, 초)
pub const TRANSFORMER_DURATION_SECONDS: &str = "sluice_transformer_duration_seconds";

// ─── Grok 메트릭 ────────────────────────────────────────────────────

/// Grok: 로딩에 실패한 패턴 소스 수 (counter)
pub const GROK_PATTERN_LOAD_FAILURES_TOTAL: &str = "sluice_grok_pattern_load_failures_total";

/// Grok: 매칭 결과가 비어 있던 이벤트 수 (counter)
pub const GROK_MATCH_EMPTY_TOTAL: &str = "sluice_grok_match_empty_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 프로세스 시작 시 한 번 호출합니다. 전역 레코더가 없으면 아무 동작도 하지 않습니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        TRANSFORMER_EVENTS_TOTAL,
        "Total number of events passed through the transformer"
    );
    describe_counter!(
        TRANSFORMER_ACTION_ERRORS_TOTAL,
        "Total number of failed action invocations"
    );
    describe_counter!(
        TRANSFORMER_EVENTS_DROPPED_TOTAL,
        "Total number of events dropped after a transform failure"
    );
    describe_histogram!(
        TRANSFORMER_DURATION_SECONDS,
        "Time spent transforming a single event"
    );
    describe_counter!(
        GROK_PATTERN_LOAD_FAILURES_TOTAL,
        "Total number of pattern sources that failed to load"
    );
    describe_counter!(
        GROK_MATCH_EMPTY_TOTAL,
        "Total number of grok matches that produced no fields"
    );
}
