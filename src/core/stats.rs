// SoakGate - core/stats.rs
//
// Statistics engine: drift, sampling jitter, and sample-density figures
// over a loaded series.
// Core layer: pure computation over an in-memory slice.

use crate::core::model::{CounterSummary, Sample, SoakStats, SoakThresholds};
use crate::util::constants;
use crate::util::error::StatsError;

/// Compute the statistics record for a series sorted by `elapsed_sec`.
///
/// Memory figures use only samples with a defined `rss_mb`; elapsed span and
/// jitter use the full series.
///
/// # Errors
/// `NoMemoryData` if no sample carries a memory value.
pub fn compute_stats(
    samples: &[Sample],
    thresholds: &SoakThresholds,
) -> Result<SoakStats, StatsError> {
    let rss: Vec<f64> = samples.iter().filter_map(|s| s.rss_mb).collect();
    if rss.is_empty() {
        return Err(StatsError::NoMemoryData {
            samples: samples.len(),
        });
    }

    let min_rss = rss.iter().copied().fold(f64::INFINITY, f64::min);
    let max_rss = rss.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg_rss = rss.iter().sum::<f64>() / rss.len() as f64;
    let drift_mb = max_rss - min_rss;
    let base = if min_rss > 0.0 {
        min_rss
    } else {
        avg_rss.max(constants::DRIFT_BASE_EPSILON)
    };
    let drift_pct = drift_mb / base * 100.0;

    let actual_elapsed = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => last.elapsed_sec - first.elapsed_sec,
        _ => 0.0,
    };

    let gaps: Vec<f64> = samples
        .windows(2)
        .map(|w| w[1].elapsed_sec - w[0].elapsed_sec)
        .collect();
    let jitter_p50 = percentile(&gaps, 50);
    let jitter_p95 = percentile(&gaps, 95);

    let (expected_samples, required_samples) = sample_density(actual_elapsed, thresholds);

    let stats = SoakStats {
        min_rss,
        max_rss,
        avg_rss,
        drift_mb,
        drift_pct,
        actual_elapsed,
        jitter_p50,
        jitter_p95,
        expected_samples,
        required_samples,
        sample_count: rss.len(),
        threads: summarize_counter(samples.iter().filter_map(|s| s.threads)),
        fds: summarize_counter(samples.iter().filter_map(|s| s.fds)),
        handles: summarize_counter(samples.iter().filter_map(|s| s.handles)),
    };

    tracing::debug!(
        sample_count = stats.sample_count,
        drift_mb = stats.drift_mb,
        drift_pct = stats.drift_pct,
        actual_elapsed = stats.actual_elapsed,
        required_samples = stats.required_samples,
        "Statistics computed"
    );

    Ok(stats)
}

/// Expected and required sample counts for an observation span.
///
/// `expected = floor(span / interval)` (0 for a non-positive span) and
/// `required = floor(expected * min_sample_ratio)`.
pub fn sample_density(actual_elapsed: f64, thresholds: &SoakThresholds) -> (u64, u64) {
    let expected = if actual_elapsed > 0.0 {
        (actual_elapsed / thresholds.target_interval_secs).floor() as u64
    } else {
        0
    };
    let required = (expected as f64 * thresholds.min_sample_ratio).floor() as u64;
    (expected, required)
}

/// Inclusive-method percentile at a whole percent `pct` (1..=99).
///
/// The position `pct * (n - 1) / 100` is split into an integer index and a
/// remainder in hundredths, then the two neighbouring sorted values are
/// blended. One value returns itself; an empty slice is `NaN`.
pub fn percentile(values: &[f64], pct: u32) -> f64 {
    match values.len() {
        0 => f64::NAN,
        1 => values[0],
        n => {
            let mut sorted = values.to_vec();
            sorted.sort_by(f64::total_cmp);
            let scaled = pct as usize * (n - 1);
            let j = scaled / 100;
            let delta = (scaled % 100) as f64;
            (sorted[j] * (100.0 - delta) + sorted[j + 1] * delta) / 100.0
        }
    }
}

fn summarize_counter(values: impl Iterator<Item = u64>) -> Option<CounterSummary> {
    values.fold(None, |acc, v| {
        Some(match acc {
            None => CounterSummary {
                first: v,
                last: v,
                min: v,
                max: v,
                samples: 1,
            },
            Some(s) => CounterSummary {
                last: v,
                min: s.min.min(v),
                max: s.max.max(v),
                samples: s.samples + 1,
                ..s
            },
        })
    })
}
