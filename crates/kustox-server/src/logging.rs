//! Logging setup for the result server.
//!
//! Presets pick a base set of `kustox::*` directives, `--log target=level`
//! flags refine them, and `RUST_LOG` replaces both when set.

use std::collections::BTreeMap;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const TARGET_PREFIX: &str = "kustox::";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: '{}'. Use 'text' or 'json'.", s)),
        }
    }
}

/// Base verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Store mutations, API calls and startup only.
    #[default]
    Production,
    Verbose,
    /// Adds per-request file-system operations.
    Debug,
    /// Adds listener registration and event fan-out.
    Trace,
    Quiet,
}

impl LogPreset {
    /// Most verbose flag wins, except `quiet` which overrides everything.
    pub fn from_flags(verbose: bool, debug: bool, trace: bool, quiet: bool) -> Self {
        match (quiet, trace, debug, verbose) {
            (true, ..) => LogPreset::Quiet,
            (_, true, ..) => LogPreset::Trace,
            (_, _, true, _) => LogPreset::Debug,
            (_, _, _, true) => LogPreset::Verbose,
            _ => LogPreset::Production,
        }
    }

    fn directives(self) -> &'static [&'static str] {
        match self {
            LogPreset::Production => &[
                "kustox::startup=info",
                "kustox::api=info",
                "kustox::ws=info",
                "kustox::store=info",
                "kustox::tree=warn",
                "kustox::events=warn",
                "tower_http=warn",
            ],
            LogPreset::Verbose => &["kustox=info", "tower_http=info"],
            LogPreset::Debug => &["kustox=debug", "kustox::events=info", "tower_http=debug"],
            LogPreset::Trace => &["kustox=trace", "tower_http=trace"],
            LogPreset::Quiet => &["kustox=warn", "tower_http=error"],
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub preset: LogPreset,
    /// Fully-qualified target -> level.
    pub overrides: BTreeMap<String, Level>,
    pub format: LogFormat,
}

impl LogConfig {
    pub fn new(preset: LogPreset, overrides: &[String], format: LogFormat) -> Self {
        let overrides = overrides
            .iter()
            .flat_map(|arg| arg.split(','))
            .filter_map(parse_override)
            .collect();

        Self {
            preset,
            overrides,
            format,
        }
    }

    /// Filter for the subscriber. `RUST_LOG` wins when present.
    pub fn build_filter(&self) -> EnvFilter {
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }

        EnvFilter::try_new(self.directives()).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    /// Preset directives followed by overrides, comma-joined.
    pub fn directives(&self) -> String {
        self.preset
            .directives()
            .iter()
            .map(|d| d.to_string())
            .chain(
                self.overrides
                    .iter()
                    .map(|(target, level)| format!("{}={}", target, level.to_string().to_ascii_lowercase())),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Parse `target=level`; short targets get the `kustox::` prefix.
fn parse_override(part: &str) -> Option<(String, Level)> {
    let (target, level) = part.split_once('=')?;
    let target = target.trim();
    let level = match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => return None,
    };

    let target = if target.starts_with(TARGET_PREFIX) || target == "kustox" || target == "tower_http" {
        target.to_string()
    } else {
        format!("{}{}", TARGET_PREFIX, target)
    };
    Some((target, level))
}

/// Install the global subscriber.
pub fn init(config: &LogConfig) {
    let registry = tracing_subscriber::registry().with(config.build_filter());

    match config.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_preset_priority() {
        assert_eq!(LogPreset::from_flags(true, true, true, true), LogPreset::Quiet);
        assert_eq!(LogPreset::from_flags(true, true, true, false), LogPreset::Trace);
        assert_eq!(LogPreset::from_flags(true, true, false, false), LogPreset::Debug);
        assert_eq!(LogPreset::from_flags(true, false, false, false), LogPreset::Verbose);
        assert_eq!(LogPreset::from_flags(false, false, false, false), LogPreset::Production);
    }

    #[test]
    fn test_overrides_are_prefixed() {
        let config = LogConfig::new(
            LogPreset::Production,
            &["store=debug".into(), "tree=trace,api=warning".into()],
            LogFormat::Text,
        );

        assert_eq!(config.overrides.get("kustox::store"), Some(&Level::DEBUG));
        assert_eq!(config.overrides.get("kustox::tree"), Some(&Level::TRACE));
        assert_eq!(config.overrides.get("kustox::api"), Some(&Level::WARN));
    }

    #[test]
    fn test_full_targets_and_garbage() {
        let config = LogConfig::new(
            LogPreset::Quiet,
            &["kustox::events=debug".into(), "tower_http=trace".into(), "bogus".into(), "store=loud".into()],
            LogFormat::Json,
        );

        assert_eq!(config.overrides.len(), 2);
        assert_eq!(config.overrides.get("kustox::events"), Some(&Level::DEBUG));
        assert_eq!(config.overrides.get("tower_http"), Some(&Level::TRACE));
    }

    #[test]
    fn test_directives_append_overrides_after_preset() {
        let config = LogConfig::new(LogPreset::Quiet, &["store=debug".into()], LogFormat::Text);
        assert_eq!(config.directives(), "kustox=warn,tower_http=error,kustox::store=debug");
    }
}
