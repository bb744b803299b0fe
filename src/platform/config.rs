// SoakGate - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// validation against the named constants.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for SoakGate configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/soakgate/ or %APPDATA%\SoakGate\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[thresholds]` section.
    pub thresholds: ThresholdsSection,
    /// `[log_scan]` section.
    pub log_scan: LogScanSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[thresholds]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ThresholdsSection {
    pub target_interval_secs: Option<f64>,
    pub min_sample_ratio: Option<f64>,
    pub max_drift_mb: Option<f64>,
    pub max_drift_pct: Option<f64>,
    pub trend_window_secs: Option<f64>,
    pub trend_min_fraction: Option<f64>,
}

/// `[log_scan]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LogScanSection {
    /// Replacement keyword list (case-insensitive).
    pub keywords: Option<Vec<String>>,
    /// Maximum number of flagged lines.
    pub max_issues: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Thresholds --
    pub target_interval_secs: f64,
    pub min_sample_ratio: f64,
    pub max_drift_mb: f64,
    pub max_drift_pct: f64,
    pub trend_window_secs: f64,
    pub trend_min_fraction: f64,

    // -- Log scan --
    pub log_keywords: Vec<String>,
    pub max_log_issues: usize,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_interval_secs: constants::TARGET_INTERVAL_SECS,
            min_sample_ratio: constants::MIN_SAMPLE_RATIO,
            max_drift_mb: constants::MAX_DRIFT_MB,
            max_drift_pct: constants::MAX_DRIFT_PCT,
            trend_window_secs: constants::TREND_WINDOW_SECS,
            trend_min_fraction: constants::TREND_MIN_NONNEG_FRACTION,
            log_keywords: constants::LOG_ISSUE_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
            max_log_issues: constants::MAX_LOG_ISSUES,
            log_level: None,
        }
    }
}

/// Load and validate a config file.
///
/// Returns the validated config and a list of non-fatal problems. A missing
/// file yields defaults silently, unless `explicit` is set (the user named
/// the file), in which case the absence is reported. Unreadable or
/// unparseable files yield defaults plus a problem.
pub fn load_config(config_path: &Path, explicit: bool) -> (AppConfig, Vec<ConfigError>) {
    let mut problems: Vec<ConfigError> = Vec::new();

    if !config_path.exists() {
        if explicit {
            problems.push(ConfigError::Io {
                path: config_path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            });
        } else {
            tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        }
        return (AppConfig::default(), problems);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            problems.push(ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            });
            return (AppConfig::default(), problems);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            problems.push(ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            });
            return (AppConfig::default(), problems);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config file");

    let config = validate(raw, &mut problems);
    if !problems.is_empty() {
        tracing::warn!(count = problems.len(), "Config validation produced warnings");
    }
    (config, problems)
}

/// Validate each raw field, accumulating every out-of-range value.
fn validate(raw: RawConfig, problems: &mut Vec<ConfigError>) -> AppConfig {
    let mut config = AppConfig::default();
    let t = &raw.thresholds;

    check_f64(
        "thresholds.target_interval_secs",
        t.target_interval_secs,
        constants::MIN_TARGET_INTERVAL_SECS,
        constants::MAX_TARGET_INTERVAL_SECS,
        &mut config.target_interval_secs,
        problems,
    );
    check_f64(
        "thresholds.min_sample_ratio",
        t.min_sample_ratio,
        0.0,
        1.0,
        &mut config.min_sample_ratio,
        problems,
    );
    check_f64(
        "thresholds.max_drift_mb",
        t.max_drift_mb,
        0.0,
        constants::ABSOLUTE_MAX_DRIFT_LIMIT,
        &mut config.max_drift_mb,
        problems,
    );
    check_f64(
        "thresholds.max_drift_pct",
        t.max_drift_pct,
        0.0,
        constants::ABSOLUTE_MAX_DRIFT_LIMIT,
        &mut config.max_drift_pct,
        problems,
    );
    check_f64(
        "thresholds.trend_window_secs",
        t.trend_window_secs,
        constants::MIN_TREND_WINDOW_SECS,
        constants::MAX_TREND_WINDOW_SECS,
        &mut config.trend_window_secs,
        problems,
    );

    // A zero fraction would flag every long series.
    if let Some(fraction) = t.trend_min_fraction {
        if fraction > 0.0 && fraction <= 1.0 {
            config.trend_min_fraction = fraction;
        } else {
            problems.push(ConfigError::ValueOutOfRange {
                field: "thresholds.trend_min_fraction".to_string(),
                value: fraction.to_string(),
                expected: "greater than 0 and at most 1".to_string(),
            });
        }
    }

    if let Some(keywords) = raw.log_scan.keywords {
        if !keywords.is_empty() && keywords.iter().all(|k| !k.trim().is_empty()) {
            config.log_keywords = keywords;
        } else {
            problems.push(ConfigError::ValueOutOfRange {
                field: "log_scan.keywords".to_string(),
                value: format!("{keywords:?}"),
                expected: "a non-empty list of non-empty strings".to_string(),
            });
        }
    }

    if let Some(max) = raw.log_scan.max_issues {
        if (1..=constants::ABSOLUTE_MAX_LOG_ISSUES).contains(&max) {
            config.max_log_issues = max;
        } else {
            problems.push(ConfigError::ValueOutOfRange {
                field: "log_scan.max_issues".to_string(),
                value: max.to_string(),
                expected: format!("1-{}", constants::ABSOLUTE_MAX_LOG_ISSUES),
            });
        }
    }

    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            problems.push(ConfigError::ValueOutOfRange {
                field: "logging.level".to_string(),
                value: level,
                expected: "error, warn, info, debug, trace".to_string(),
            });
        }
    }

    config
}

fn check_f64(
    field: &str,
    value: Option<f64>,
    min: f64,
    max: f64,
    target: &mut f64,
    problems: &mut Vec<ConfigError>,
) {
    let Some(v) = value else {
        return;
    };
    if (min..=max).contains(&v) {
        *target = v;
    } else {
        problems.push(ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value: v.to_string(),
            expected: format!("{min}-{max}"),
        });
    }
}
