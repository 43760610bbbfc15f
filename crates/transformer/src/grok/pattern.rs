//! 패턴 라이브러리 — 매크로 이름 → 정규식 조각
//!
//! 각 grok 액션은 자기만의 라이브러리를 가집니다. 레이어 순서는 다음과 같으며
//! 나중 레이어가 같은 이름을 덮어씁니다.
//!
//! 1. 내장 패턴 ([`BUILTIN_PATTERNS`])
//! 2. 패턴 소스 (디렉토리, 단일 파일, `http://` / `https://` URL)
//! 3. 인라인 `pattern` 설정
//!
//! # 소스 형식
//! ```text
//! # 주석
//! NGINX_STATUS %{INT}
//! MYWORD \b\w+\b
//! ```
//! 빈 줄과 `#`로 시작하는 줄은 무시합니다. 첫 공백을 기준으로 이름과 조각을 나누고
//! 조각의 앞뒤 공백은 제거합니다.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use sluice_core::metrics as sluice_metrics;

use crate::error::TransformError;

/// HTTP 패턴 소스 요청 타임아웃
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// 내장 패턴 테이블
pub const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("USERNAME", r"[a-zA-Z0-9._-]+"),
    ("USER", r"%{USERNAME}"),
    ("INT", r"(?:[+-]?(?:[0-9]+))"),
    ("WORD", r"\b\w+\b"),
    (
        "UUID",
        r"[A-Fa-f0-9]{8}-(?:[A-Fa-f0-9]{4}-){3}[A-Fa-f0-9]{12}",
    ),
    (
        "IPV4",
        r"(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)",
    ),
    ("PATH", r"(?:%{UNIXPATH}|%{WINPATH})"),
    ("UNIXPATH", r"(/[\w_%!$@:.,-]?/?)(\S+)?"),
    ("WINPATH", r"([A-Za-z]:|\\)(?:\\[^\\?*]*)+"),
    ("MONTHNUM", r"(?:0?[1-9]|1[0-2])"),
    ("MONTHDAY", r"(?:(?:0[1-9])|(?:[12][0-9])|(?:3[01])|[1-9])"),
    ("YEAR", r"(\d\d){1,2}"),
    ("DATE_US", r"%{MONTHNUM}[/-]%{MONTHDAY}[/-]%{YEAR}"),
    ("DATE_EU", r"%{MONTHDAY}[./-]%{MONTHNUM}[./-]%{YEAR}"),
    ("DATE_CN", r"%{YEAR}[./-]%{MONTHNUM}[./-]%{MONTHDAY}"),
    ("DATE", r"%{DATE_US}|%{DATE_EU}|%{DATE_CN}"),
    ("HOUR", r"(?:2[0123]|[01]?[0-9])"),
    ("MINUTE", r"(?:[0-5][0-9])"),
    ("SECOND", r"(?:(?:[0-5][0-9]|60)(?:[:.,][0-9]+)?)"),
    ("TIME", r"([^0-9]?)%{HOUR}:%{MINUTE}(?::%{SECOND})([^0-9]?)"),
    ("DATESTAMP", r"%{DATE}[- ]%{TIME}"),
];

/// 매크로 이름 → 정규식 조각 테이블
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternLibrary {
    patterns: HashMap<String, String>,
}

impl PatternLibrary {
    /// 빈 라이브러리를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 내장 패턴으로 채워진 라이브러리를 생성합니다.
    pub fn builtin() -> Self {
        let mut library = Self::new();
        library.extend(
            BUILTIN_PATTERNS
                .iter()
                .map(|(name, fragment)| ((*name).to_owned(), (*fragment).to_owned())),
        );
        library
    }

    /// 패턴을 추가하거나 덮어씁니다.
    pub fn insert(&mut self, name: impl Into<String>, fragment: impl Into<String>) {
        self.patterns.insert(name.into(), fragment.into());
    }

    /// 여러 패턴을 추가하거나 덮어씁니다.
    pub fn extend<I>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.patterns.extend(patterns);
    }

    /// 이름으로 조각을 조회합니다.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.patterns.get(name).map(String::as_str)
    }

    /// 등록된 패턴 수
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// 이름순으로 정렬된 (이름, 조각) 목록
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .patterns
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// 여러 패턴 소스를 순서대로 로드합니다.
    ///
    /// 실패한 소스는 `tracing::error!`로 기록하고 건너뜁니다.
    /// 로드에 실패한 소스 수를 반환합니다.
    pub fn load_sources<S: AsRef<str>>(&mut self, sources: &[S]) -> usize {
        let mut failures = 0;
        for source in sources {
            let source = source.as_ref();
            match self.load_source(source) {
                Ok(count) => {
                    tracing::debug!(source, count, "loaded grok patterns");
                }
                Err(e) => {
                    failures += 1;
                    metrics::counter!(sluice_metrics::GROK_PATTERN_LOAD_FAILURES_TOTAL)
                        .increment(1);
                    tracing::error!(source, error = %e, "failed to load grok patterns, skipping");
                }
            }
        }
        failures
    }

    /// 단일 패턴 소스를 로드합니다. 로드된 패턴 수를 반환합니다.
    ///
    /// # Errors
    /// 파일/디렉토리를 읽을 수 없거나 HTTP 요청이 실패(비 2xx 포함)하면
    /// [`TransformError::PatternLoad`]
    pub fn load_source(&mut self, source: &str) -> Result<usize, TransformError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            let body = fetch_url(source)?;
            Ok(self.parse_text(&body, source))
        } else {
            self.load_path(Path::new(source))
        }
    }

    /// 파일 또는 디렉토리에서 패턴을 로드합니다.
    ///
    /// 디렉토리는 파일 이름순으로 모든 일반 파일을 읽습니다.
    /// 개별 파일 읽기 실패는 기록하고 건너뜁니다.
    pub fn load_path(&mut self, path: &Path) -> Result<usize, TransformError> {
        let load_error = |reason: String| TransformError::PatternLoad {
            source_name: path.display().to_string(),
            reason,
        };

        let metadata = std::fs::metadata(path).map_err(|e| load_error(e.to_string()))?;

        if metadata.is_file() {
            let content = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
            return Ok(self.parse_text(&content, &path.display().to_string()));
        }

        if !metadata.is_dir() {
            return Err(load_error("not a regular file or directory".to_owned()));
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(path).map_err(|e| load_error(e.to_string()))? {
            let entry = entry.map_err(|e| load_error(e.to_string()))?;
            let is_file = entry.file_type().is_ok_and(|t| t.is_file());
            if is_file {
                files.push(entry.path());
            }
        }
        files.sort();

        let mut count = 0;
        for file in files {
            match std::fs::read_to_string(&file) {
                Ok(content) => count += self.parse_text(&content, &file.display().to_string()),
                Err(e) => {
                    tracing::error!(
                        path = %file.display(),
                        error = %e,
                        "failed to read pattern file, skipping"
                    );
                }
            }
        }
        Ok(count)
    }

    /// 패턴 텍스트를 파싱하여 라이브러리에 추가합니다. 추가된 패턴 수를 반환합니다.
    pub fn parse_text(&mut self, text: &str, source_name: &str) -> usize {
        let mut count = 0;
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once(' ') {
                Some((name, fragment)) if !name.is_empty() => {
                    self.insert(name, fragment.trim());
                    count += 1;
                }
                _ => {
                    tracing::warn!(
                        source = source_name,
                        line = lineno + 1,
                        "pattern line has no 'NAME fragment' separator, skipping"
                    );
                }
            }
        }
        count
    }
}

fn fetch_url(url: &str) -> Result<String, TransformError> {
    let load_error = |reason: String| TransformError::PatternLoad {
        source_name: url.to_owned(),
        reason,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| load_error(e.to_string()))?;

    client
        .get(url)
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text())
        .map_err(|e| load_error(e.to_string()))
}
