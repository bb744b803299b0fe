// SoakGate - core/trend.rs
//
// Trend detector: flags sustained near-monotonic RSS growth that a min/max
// drift check misses (slow leaks under the drift limits, or a leak masked by
// an early one-off spike).
//
// A window is any pair of sample indices `start < end` whose elapsed span is
// at least the trend window. Its score is the fraction of the `end - start`
// RSS steps inside `[start, end)` that are non-negative. A step touching a
// sample without memory is undefined: it counts toward the step total but
// never as non-negative. The first window scoring at or above the threshold
// flags the series for review.

use crate::core::model::{Sample, SoakThresholds};

/// Location of the first qualifying window, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendHit {
    pub start: usize,
    pub end: usize,
    pub nonneg_fraction: f64,
}

/// Returns true if any window of at least `trend_window_secs` has a
/// non-negative step fraction of at least `trend_min_fraction`.
///
/// Series with fewer than two samples, or spanning less than the trend
/// window, are never flagged.
pub fn detect_trend(samples: &[Sample], thresholds: &SoakThresholds) -> bool {
    find_trend_window(samples, thresholds).is_some()
}

/// Scan every window meeting the minimum span and return the first one
/// whose non-negative step fraction reaches the threshold.
///
/// Windows are visited in `(start, end)` lexicographic order. For each start,
/// ends before the first index that satisfies the span are skipped without
/// being scored; that index only moves forward as `start` advances because
/// the series is sorted.
pub fn find_trend_window(samples: &[Sample], thresholds: &SoakThresholds) -> Option<TrendHit> {
    let n = samples.len();
    if n < 2 {
        return None;
    }
    let span = samples[n - 1].elapsed_sec - samples[0].elapsed_sec;
    if span < thresholds.trend_window_secs {
        tracing::debug!(
            span,
            window = thresholds.trend_window_secs,
            "Series too short for trend check"
        );
        return None;
    }

    let prefix = nonneg_prefix(samples);
    let mut first_end = 1;

    for start in 0..n - 1 {
        first_end = first_end.max(start + 1);
        while first_end < n
            && samples[first_end].elapsed_sec - samples[start].elapsed_sec
                < thresholds.trend_window_secs
        {
            first_end += 1;
        }
        if first_end == n {
            // Later starts only shrink the span.
            break;
        }

        for end in first_end..n {
            let total = end - start;
            let nonneg = prefix[end] - prefix[start];
            let fraction = nonneg as f64 / total as f64;
            if fraction >= thresholds.trend_min_fraction {
                tracing::info!(
                    start,
                    end,
                    start_sec = samples[start].elapsed_sec,
                    end_sec = samples[end].elapsed_sec,
                    fraction,
                    "Sustained RSS growth window found"
                );
                return Some(TrendHit {
                    start,
                    end,
                    nonneg_fraction: fraction,
                });
            }
        }
    }

    None
}

/// `prefix[i]` is the number of non-negative steps among the first `i`
/// steps, where step `k` goes from sample `k` to sample `k + 1`.
fn nonneg_prefix(samples: &[Sample]) -> Vec<usize> {
    let mut prefix = Vec::with_capacity(samples.len());
    prefix.push(0);
    let mut count = 0;
    for pair in samples.windows(2) {
        if let (Some(prev), Some(next)) = (pair[0].rss_mb, pair[1].rss_mb) {
            if next - prev >= 0.0 {
                count += 1;
            }
        }
        prefix.push(count);
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(step_secs: f64, rss: &[Option<f64>]) -> Vec<Sample> {
        rss.iter()
            .enumerate()
            .map(|(i, r)| Sample {
                timestamp: String::new(),
                elapsed_sec: i as f64 * step_secs,
                rss_mb: *r,
                rss_kb: None,
                threads: None,
                fds: None,
                handles: None,
            })
            .collect()
    }

    fn defined(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    /// Reference all-pairs scan used to cross-check the pruned scan.
    fn brute_force(samples: &[Sample], t: &SoakThresholds) -> bool {
        let n = samples.len();
        if n < 2 || samples[n - 1].elapsed_sec - samples[0].elapsed_sec < t.trend_window_secs {
            return false;
        }
        let prefix = nonneg_prefix(samples);
        for start in 0..n - 1 {
            for end in start + 1..n {
                if samples[end].elapsed_sec - samples[start].elapsed_sec < t.trend_window_secs {
                    continue;
                }
                let frac = (prefix[end] - prefix[start]) as f64 / (end - start) as f64;
                if frac >= t.trend_min_fraction {
                    return true;
                }
            }
        }
        false
    }

    #[test]
    fn test_monotonic_series_over_window_is_flagged() {
        // 361 samples every 5 s = exactly 30 minutes.
        let rss: Vec<f64> = (0..361).map(|i| 100.0 + i as f64 * 0.01).collect();
        let s = series(5.0, &defined(&rss));
        assert!(detect_trend(&s, &SoakThresholds::default()));
    }

    #[test]
    fn test_short_series_never_flagged() {
        // 29m55s of strictly increasing memory.
        let rss: Vec<f64> = (0..360).map(|i| 100.0 + i as f64).collect();
        let s = series(5.0, &defined(&rss));
        assert!(!detect_trend(&s, &SoakThresholds::default()));
    }

    #[test]
    fn test_too_few_samples_never_flagged() {
        let t = SoakThresholds::default();
        assert!(!detect_trend(&[], &t));
        assert!(!detect_trend(&series(5000.0, &defined(&[1.0])), &t));
    }

    #[test]
    fn test_flat_series_counts_as_nonnegative() {
        let s = series(200.0, &defined(&[50.0; 11]));
        assert!(detect_trend(&s, &SoakThresholds::default()));
    }

    #[test]
    fn test_oscillating_series_not_flagged() {
        let rss: Vec<f64> = (0..400)
            .map(|i| if i % 2 == 0 { 100.0 } else { 102.0 })
            .collect();
        let s = series(5.0, &defined(&rss));
        assert!(!detect_trend(&s, &SoakThresholds::default()));
    }

    #[test]
    fn test_exactly_eighty_percent_is_flagged() {
        // 10 steps over 2000 s, negatives at steps 0 and 8: the 1800 s
        // window (0, 9) scores 7/9, the full window (0, 10) scores 8/10.
        let rss = [10.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 15.0, 16.0];
        let s = series(200.0, &defined(&rss));
        let hit = find_trend_window(&s, &SoakThresholds::default()).unwrap();
        assert_eq!((hit.start, hit.end), (0, 10));
        assert_eq!(hit.nonneg_fraction, 0.8);
    }

    #[test]
    fn test_below_eighty_percent_not_flagged() {
        // Negatives at steps 0, 5 and 9: best qualifying window scores 7/9.
        let rss = [10.0, 9.0, 10.0, 11.0, 12.0, 13.0, 12.0, 13.0, 14.0, 15.0, 14.0];
        let s = series(200.0, &defined(&rss));
        assert!(!detect_trend(&s, &SoakThresholds::default()));
    }

    #[test]
    fn test_undefined_steps_do_not_count_as_nonnegative() {
        let rss = [
            Some(1.0),
            Some(2.0),
            Some(3.0),
            None,
            Some(4.0),
            Some(5.0),
            Some(6.0),
            None,
            Some(7.0),
            Some(8.0),
            Some(9.0),
        ];
        let s = series(200.0, &rss);
        assert!(!detect_trend(&s, &SoakThresholds::default()));
    }

    #[test]
    fn test_leak_masked_by_early_spike_is_flagged() {
        // Large spike in the first minute, then a slow climb for 40 minutes
        // that never reaches the spike: drift is set by the spike alone.
        let mut rss = vec![100.0, 180.0, 100.0];
        rss.extend((0..480).map(|i| 100.0 + i as f64 * 0.005));
        let s = series(5.0, &defined(&rss));
        assert!(detect_trend(&s, &SoakThresholds::default()));
    }

    #[test]
    fn test_window_threshold_overrides() {
        let rss: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let s = series(10.0, &defined(&rss));
        let short = SoakThresholds {
            trend_window_secs: 60.0,
            ..Default::default()
        };
        assert!(detect_trend(&s, &short));
        assert!(!detect_trend(&s, &SoakThresholds::default()));
    }

    #[test]
    fn test_matches_all_pairs_scan_on_irregular_series() {
        let t = SoakThresholds {
            trend_window_secs: 300.0,
            ..Default::default()
        };
        // Deterministic pseudo-random walk with irregular gaps.
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };
        for _ in 0..50 {
            let mut elapsed = 0.0;
            let mut rss = 100.0;
            let mut s = Vec::new();
            for _ in 0..60 {
                elapsed += (next() % 20) as f64;
                let r = next() % 10;
                rss += match r {
                    0..=3 => -1.0,
                    4 => 0.0,
                    _ => 1.0,
                };
                let value = if r == 9 && next() % 3 == 0 { None } else { Some(rss) };
                s.push(Sample {
                    timestamp: String::new(),
                    elapsed_sec: elapsed,
                    rss_mb: value,
                    rss_kb: None,
                    threads: None,
                    fds: None,
                    handles: None,
                });
            }
            assert_eq!(detect_trend(&s, &t), brute_force(&s, &t));
        }
    }
}
