// SoakGate - util/constants.rs
//
// Single source of truth for all named constants, thresholds, and defaults.
// Every threshold used by the analysis stages is defined here and nowhere
// else; tests override them through `SoakThresholds` / `LogScanConfig`.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "SoakGate";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "SoakGate";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Input schema
// =============================================================================

/// Columns that must be present in the CSV header row.
pub const REQUIRED_COLUMNS: &[&str] = &["timestamp", "elapsed_sec", "rss_kb", "rss_mb"];

/// Optional integer resource-counter columns: threads, fds, handles.
pub const COUNTER_COLUMNS: [&str; 3] = ["threads", "fds", "handles"];

/// Kilobytes per megabyte, used when back-filling `rss_mb` from `rss_kb`.
pub const KB_PER_MB: f64 = 1024.0;

// =============================================================================
// Sampling density
// =============================================================================

/// Nominal sampling period of the external sampler (seconds).
pub const TARGET_INTERVAL_SECS: f64 = 5.0;

/// Fraction of the expected sample count a run must reach to be trusted.
pub const MIN_SAMPLE_RATIO: f64 = 0.9;

/// Bounds for a user-configured sampling period (seconds).
pub const MIN_TARGET_INTERVAL_SECS: f64 = 0.1;
pub const MAX_TARGET_INTERVAL_SECS: f64 = 3_600.0;

// =============================================================================
// Drift thresholds
// =============================================================================

/// Absolute drift limit (MB). A run passes drift if it is within this OR
/// within `MAX_DRIFT_PCT`.
pub const MAX_DRIFT_MB: f64 = 5.0;

/// Relative drift limit (percent of the baseline RSS).
pub const MAX_DRIFT_PCT: f64 = 3.0;

/// Floor applied to the drift baseline so a zero minimum never divides by 0.
pub const DRIFT_BASE_EPSILON: f64 = 1e-6;

/// Upper bound for user-configured drift limits (both MB and percent).
pub const ABSOLUTE_MAX_DRIFT_LIMIT: f64 = 1_000_000.0;

// =============================================================================
// Trend detection
// =============================================================================

/// Minimum elapsed span (seconds) of a window evaluated for sustained growth.
pub const TREND_WINDOW_SECS: f64 = 30.0 * 60.0;

/// Fraction of non-negative RSS steps inside a window that flags a trend.
pub const TREND_MIN_NONNEG_FRACTION: f64 = 0.80;

/// Bounds for a user-configured trend window (seconds).
pub const MIN_TREND_WINDOW_SECS: f64 = 1.0;
pub const MAX_TREND_WINDOW_SECS: f64 = 7.0 * 24.0 * 3_600.0;

// =============================================================================
// Log scanning
// =============================================================================

/// Case-insensitive keywords that flag a line of the application log.
pub const LOG_ISSUE_KEYWORDS: &[&str] = &["warning", "timeout", "crash", "segfault", "exception"];

/// Maximum number of flagged log lines collected before scanning stops.
pub const MAX_LOG_ISSUES: usize = 5;

/// Hard upper bound on a user-configured issue cap.
pub const ABSOLUTE_MAX_LOG_ISSUES: usize = 1_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level. The report owns stdout, diagnostics go to stderr.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
