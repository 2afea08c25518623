//! tracing 기반 로깅 초기화.
//!
//! API 서버와 CLI가 같은 경로를 사용합니다. 레벨 필터는 `RUST_LOG`가 있으면
//! 그 값을, 없으면 설정 파일의 `[logging].level`을 따릅니다.
//!
//! 출력 형식은 `pretty`(개발), `json`(로그 수집), `compact` 세 가지입니다.

use std::str::FromStr;

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::LoggingConfig;

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!(
                "Unknown log format: {} (expected pretty, json, or compact)",
                other
            )),
        }
    }
}

/// 로그를 쓸 스트림.
///
/// CLI는 결과(JSON 포함)를 stdout에 쓰므로 로그는 stderr로 보냅니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
}

/// 로깅 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` 지시문 (예: "info", "portfo_analytics=debug,info")
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
    /// span 진입/종료 이벤트 기록
    pub span_events: bool,
    /// 파일명과 줄 번호 표시
    pub with_file: bool,
    pub with_thread_ids: bool,
    /// 모듈 경로 표시
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new("info")
    }
}

impl LogConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::Pretty,
            output: LogOutput::Stdout,
            span_events: false,
            with_file: true,
            with_thread_ids: false,
            with_target: true,
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// 명령행 옵션처럼 값이 있을 때만 덮어씁니다.
    pub fn with_overrides(mut self, level: Option<&str>, format: Option<LogFormat>) -> Self {
        if let Some(level) = level.map(str::trim).filter(|l| !l.is_empty()) {
            self.level = level.to_string();
        }
        if let Some(format) = format {
            self.format = format;
        }
        self
    }

    /// `[logging]` 설정 섹션에서 생성합니다. 알 수 없는 형식은 `Pretty`.
    pub fn from_settings(settings: &LoggingConfig) -> Self {
        Self::new(settings.level.clone()).with_format(settings.format.parse().unwrap_or_default())
    }

    /// `RUST_LOG`, `LOG_FORMAT` 환경 변수에서 생성합니다.
    pub fn from_env() -> Self {
        let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|f| f.parse().ok())
            .unwrap_or_default();
        Self::new(level).with_format(format)
    }
}

fn fmt_layer<S, W>(config: &LogConfig, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer = fmt::layer()
        .with_writer(writer)
        .with_file(config.with_file)
        .with_line_number(config.with_file)
        .with_thread_ids(config.with_thread_ids)
        .with_target(config.with_target)
        .with_span_events(span_events);

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

/// 전역 subscriber를 설치합니다.
///
/// 이미 설치되어 있거나 레벨 지시문이 잘못되면 에러를 반환합니다.
///
/// ```no_run
/// use portfo_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("debug").with_format(LogFormat::Json)).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let layer = match config.output {
        LogOutput::Stdout => fmt_layer(&config, std::io::stdout),
        LogOutput::Stderr => fmt_layer(&config, std::io::stderr),
    };

    tracing_subscriber::registry().with(filter).with(layer).try_init()?;

    tracing::debug!(level = %config.level, format = ?config.format, output = ?config.output, "로깅 초기화 완료");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("Json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" compact ".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("fancy".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_from_settings() {
        let settings = LoggingConfig {
            level: "portfo_analytics=debug".to_string(),
            format: "JSON".to_string(),
        };
        let config = LogConfig::from_settings(&settings);
        assert_eq!(config.level, "portfo_analytics=debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Stdout);

        let unknown = LogConfig::from_settings(&LoggingConfig {
            level: "info".to_string(),
            format: "fancy".to_string(),
        });
        assert_eq!(unknown.format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let base = LogConfig::new("info").with_format(LogFormat::Json);

        let unchanged = base.clone().with_overrides(None, None);
        assert_eq!(unchanged, base);

        let blank = base.clone().with_overrides(Some("  "), None);
        assert_eq!(blank.level, "info");

        let changed = base
            .with_overrides(Some("debug"), Some(LogFormat::Compact))
            .with_output(LogOutput::Stderr);
        assert_eq!(changed.level, "debug");
        assert_eq!(changed.format, LogFormat::Compact);
        assert_eq!(changed.output, LogOutput::Stderr);
    }
}
