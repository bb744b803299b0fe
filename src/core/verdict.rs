// SoakGate - core/verdict.rs
//
// Verdict composer: combines statistics, the trend flag and log findings
// into the release-gate verdict, and renders the fixed-format text report.

use crate::core::model::{SoakStats, SoakThresholds, Verdict};
use serde::Serialize;
use std::fmt::Write as _;

/// The individual gate checks behind a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateChecks {
    /// Enough memory-bearing samples for the observed span.
    pub sample_ok: bool,
    /// Drift within the absolute OR the relative limit.
    pub drift_ok: bool,
    /// No log findings.
    pub log_ok: bool,
}

impl GateChecks {
    pub fn evaluate(stats: &SoakStats, log_issues: &[String], thresholds: &SoakThresholds) -> Self {
        Self {
            sample_ok: stats.sample_count as u64 >= stats.required_samples,
            drift_ok: stats.drift_mb <= thresholds.max_drift_mb
                || stats.drift_pct <= thresholds.max_drift_pct,
            log_ok: log_issues.is_empty(),
        }
    }

    pub fn all_ok(&self) -> bool {
        self.sample_ok && self.drift_ok && self.log_ok
    }
}

/// Everything one analysis produced, ready to render or export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoakReport {
    pub stats: SoakStats,
    pub trend_review: bool,
    pub log_issues: Vec<String>,
    pub checks: GateChecks,
    pub verdict: Verdict,
}

impl SoakReport {
    pub fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }
}

/// A trend flag forces `Review`; otherwise all checks passing is `Pass`
/// and anything else is `Fail`.
pub fn derive_verdict(trend_review: bool, checks: &GateChecks) -> Verdict {
    if trend_review {
        Verdict::Review
    } else if checks.all_ok() {
        Verdict::Pass
    } else {
        Verdict::Fail
    }
}

/// Combine the stage outputs into a report.
pub fn compose(
    stats: SoakStats,
    trend_review: bool,
    log_issues: Vec<String>,
    thresholds: &SoakThresholds,
) -> SoakReport {
    let checks = GateChecks::evaluate(&stats, &log_issues, thresholds);
    let verdict = derive_verdict(trend_review, &checks);

    tracing::info!(
        sample_ok = checks.sample_ok,
        drift_ok = checks.drift_ok,
        log_ok = checks.log_ok,
        trend_review,
        verdict = %verdict,
        "Verdict composed"
    );

    SoakReport {
        stats,
        trend_review,
        log_issues,
        checks,
        verdict,
    }
}

/// Render the human-readable report, one line per field, ending with the
/// verdict line and a trailing newline.
pub fn render_report(report: &SoakReport) -> String {
    let s = &report.stats;
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Soak Summary:");
    let _ = writeln!(
        out,
        "  Samples           : {} (expected \u{2265} {})",
        s.sample_count, s.required_samples
    );
    let _ = writeln!(out, "  Duration (s)      : {:.1}", s.actual_elapsed);
    let _ = writeln!(
        out,
        "  RSS min / avg / max (MB): {} / {} / {}",
        fmt2(s.min_rss),
        fmt2(s.avg_rss),
        fmt2(s.max_rss)
    );
    let _ = writeln!(
        out,
        "  Drift (MB / %)    : {} MB / {}%",
        fmt2(s.drift_mb),
        fmt2(s.drift_pct)
    );
    let _ = writeln!(
        out,
        "  Jitter p50 / p95  : {}s / {}s",
        fmt2(s.jitter_p50),
        fmt2(s.jitter_p95)
    );
    let _ = writeln!(
        out,
        "  Trend review flag : {}",
        if report.trend_review { "YES" } else { "no" }
    );
    if !report.log_issues.is_empty() {
        let _ = writeln!(out, "  Log issues detected:");
        for issue in &report.log_issues {
            let _ = writeln!(out, "    - {issue}");
        }
    }
    let _ = writeln!(out, "Verdict: {}", report.verdict);
    out
}

/// Two decimals, `NaN` for undefined values.
fn fmt2(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.2}")
    }
}
