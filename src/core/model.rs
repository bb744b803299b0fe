// SoakGate - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants;
use serde::Serialize;

// =============================================================================
// Sample (one row of the sampler CSV)
// =============================================================================

/// A single observation of the process under test.
///
/// Every numeric field except `elapsed_sec` is independently optional:
/// `None` means the cell was absent or could not be parsed, which is
/// distinct from a legitimate zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// Display timestamp exactly as written by the sampler. Never parsed;
    /// ordering uses `elapsed_sec`.
    pub timestamp: String,

    /// Seconds since the observation started.
    pub elapsed_sec: f64,

    /// Resident memory in megabytes (back-filled from `rss_kb` when the
    /// `rss_mb` cell is empty).
    pub rss_mb: Option<f64>,

    /// Resident memory in kilobytes.
    pub rss_kb: Option<f64>,

    /// Thread count.
    pub threads: Option<u64>,

    /// Open file-descriptor count.
    pub fds: Option<u64>,

    /// Open handle count (Windows samplers).
    pub handles: Option<u64>,
}

// =============================================================================
// Thresholds
// =============================================================================

/// Every tunable limit used by the statistics engine, the trend detector
/// and the verdict composer.
///
/// `Default` yields the named constants from `util::constants`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoakThresholds {
    /// Nominal sampling period (seconds).
    pub target_interval_secs: f64,
    /// Fraction of the expected sample count required for a trusted run.
    pub min_sample_ratio: f64,
    /// Absolute drift limit (MB).
    pub max_drift_mb: f64,
    /// Relative drift limit (percent).
    pub max_drift_pct: f64,
    /// Minimum span of a trend window (seconds).
    pub trend_window_secs: f64,
    /// Non-negative step fraction at or above which a window flags a trend.
    pub trend_min_fraction: f64,
}

impl Default for SoakThresholds {
    fn default() -> Self {
        Self {
            target_interval_secs: constants::TARGET_INTERVAL_SECS,
            min_sample_ratio: constants::MIN_SAMPLE_RATIO,
            max_drift_mb: constants::MAX_DRIFT_MB,
            max_drift_pct: constants::MAX_DRIFT_PCT,
            trend_window_secs: constants::TREND_WINDOW_SECS,
            trend_min_fraction: constants::TREND_MIN_NONNEG_FRACTION,
        }
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Summary of one optional integer resource counter (threads, fds, handles)
/// over the samples where it was present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterSummary {
    pub first: u64,
    pub last: u64,
    pub min: u64,
    pub max: u64,
    /// Number of samples that carried the counter.
    pub samples: usize,
}

/// Aggregate statistics over a loaded series.
///
/// Undefined quantities (e.g. jitter with a single sample) are `NaN`; the
/// report renders them as `NaN` and the JSON export as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoakStats {
    pub min_rss: f64,
    pub max_rss: f64,
    pub avg_rss: f64,
    pub drift_mb: f64,
    pub drift_pct: f64,

    /// Elapsed span of the full series (last minus first `elapsed_sec`).
    pub actual_elapsed: f64,

    /// Median gap between consecutive samples.
    pub jitter_p50: f64,
    /// 95th percentile gap between consecutive samples.
    pub jitter_p95: f64,

    pub expected_samples: u64,
    pub required_samples: u64,

    /// Count of samples with a memory value (not the full series length).
    pub sample_count: usize,

    pub threads: Option<CounterSummary>,
    pub fds: Option<CounterSummary>,
    pub handles: Option<CounterSummary>,
}

// =============================================================================
// Verdict
// =============================================================================

/// Tri-state release-gate verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Review,
    Fail,
}

impl Verdict {
    /// Label used in the report's final line.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Review => "REVIEW",
            Verdict::Fail => "FAIL",
        }
    }

    /// Process exit status for this verdict. Only `Pass` is clean.
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Pass => 0,
            Verdict::Review | Verdict::Fail => 1,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
