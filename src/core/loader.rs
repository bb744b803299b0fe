// SoakGate - core/loader.rs
//
// Series loader: sampler CSV -> time-ordered Vec<Sample>.
// Core layer: accepts any Read, never touches the filesystem directly.
//
// Field-level parse failures are recovered as `None`; only a missing
// required column or a series with no usable row is an error.

use crate::core::model::Sample;
use crate::util::constants;
use crate::util::error::LoadError;
use csv::StringRecord;
use std::io::Read;
use std::path::Path;

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    timestamp: Option<usize>,
    elapsed_sec: Option<usize>,
    rss_kb: Option<usize>,
    rss_mb: Option<usize>,
    threads: Option<usize>,
    fds: Option<usize>,
    handles: Option<usize>,
}

impl ColumnIndex {
    /// Resolve column positions, failing if a required column is absent.
    fn from_headers(headers: &StringRecord, source: &Path) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = constants::REQUIRED_COLUMNS
            .iter()
            .filter(|&&name| find(name).is_none())
            .map(|name| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns {
                path: source.to_path_buf(),
                missing,
            });
        }

        let [threads, fds, handles] = constants::COUNTER_COLUMNS;
        Ok(Self {
            timestamp: find("timestamp"),
            elapsed_sec: find("elapsed_sec"),
            rss_kb: find("rss_kb"),
            rss_mb: find("rss_mb"),
            threads: find(threads),
            fds: find(fds),
            handles: find(handles),
        })
    }
}

/// Parse a sampler CSV into a series sorted by ascending `elapsed_sec`.
///
/// Rows whose `elapsed_sec` is not a finite number are dropped. The sort is
/// stable, so rows sharing an `elapsed_sec` keep their file order.
///
/// # Errors
/// * `MissingColumns` if the header lacks a required column.
/// * `EmptySeries` if no row survives.
/// * `Csv` / `Io` if the underlying reader fails.
pub fn parse_series<R: Read>(reader: R, source: &Path) -> Result<Vec<Sample>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| csv_error(e, source))?
        .clone();
    let columns = ColumnIndex::from_headers(&headers, source)?;

    let mut samples = Vec::new();
    let mut skipped: usize = 0;

    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(csv_error(e, source)),
            Err(e) => {
                // Undecodable or malformed row: same treatment as a bad elapsed_sec.
                tracing::debug!(row = row_idx + 1, error = %e, "Skipping unreadable CSV row");
                skipped += 1;
                continue;
            }
        };

        match parse_row(&record, &columns) {
            Some(sample) => samples.push(sample),
            None => {
                tracing::debug!(row = row_idx + 1, "Skipping row without numeric elapsed_sec");
                skipped += 1;
            }
        }
    }

    if samples.is_empty() {
        return Err(LoadError::EmptySeries {
            path: source.to_path_buf(),
        });
    }

    samples.sort_by(|a, b| a.elapsed_sec.total_cmp(&b.elapsed_sec));

    tracing::info!(
        path = %source.display(),
        samples = samples.len(),
        skipped,
        "Sample series loaded"
    );

    Ok(samples)
}

/// Build a `Sample` from one record, or `None` if `elapsed_sec` is unusable.
fn parse_row(record: &StringRecord, columns: &ColumnIndex) -> Option<Sample> {
    let elapsed_sec = parse_f64(cell(record, columns.elapsed_sec))?;

    let rss_kb = parse_f64(cell(record, columns.rss_kb));
    let rss_mb = match cell(record, columns.rss_mb).map(str::trim) {
        Some(raw) if !raw.is_empty() => parse_f64(Some(raw)),
        _ => rss_kb.map(|kb| kb / constants::KB_PER_MB),
    };

    Some(Sample {
        timestamp: cell(record, columns.timestamp).unwrap_or_default().to_string(),
        elapsed_sec,
        rss_mb,
        rss_kb,
        threads: parse_count(cell(record, columns.threads)),
        fds: parse_count(cell(record, columns.fds)),
        handles: parse_count(cell(record, columns.handles)),
    })
}

fn cell(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| record.get(i))
}

/// Parse a finite float. Empty, non-numeric, NaN and infinite cells are `None`.
fn parse_f64(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Best-effort integer counter parse; never an error.
fn parse_count(raw: Option<&str>) -> Option<u64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<u64>().ok())
}

fn csv_error(e: csv::Error, source: &Path) -> LoadError {
    LoadError::Csv {
        path: source.to_path_buf(),
        source: e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn load(content: &str) -> Result<Vec<Sample>, LoadError> {
        parse_series(content.as_bytes(), &PathBuf::from("test.csv"))
    }

    #[test]
    fn test_loads_and_sorts_by_elapsed() {
        let csv = "timestamp,elapsed_sec,rss_kb,rss_mb\n\
                   t2,10,,2.0\n\
                   t0,0,,1.0\n\
                   t1,5,,1.5\n";
        let samples = load(csv).unwrap();
        let elapsed: Vec<f64> = samples.iter().map(|s| s.elapsed_sec).collect();
        assert_eq!(elapsed, vec![0.0, 5.0, 10.0]);
        assert_eq!(samples[0].timestamp, "t0");
        assert_eq!(samples[2].rss_mb, Some(2.0));
    }

    #[test]
    fn test_sort_is_stable_for_equal_elapsed() {
        let csv = "timestamp,elapsed_sec,rss_kb,rss_mb\n\
                   b,5,,1\n\
                   first,0,,1\n\
                   c,5,,1\n";
        let samples = load(csv).unwrap();
        let order: Vec<&str> = samples.iter().map(|s| s.timestamp.as_str()).collect();
        assert_eq!(order, vec!["first", "b", "c"]);
    }

    #[test]
    fn test_missing_required_column_is_schema_error() {
        let csv = "timestamp,elapsed_sec,rss_kb\nt,0,1024\n";
        match load(csv) {
            Err(LoadError::MissingColumns { missing, .. }) => {
                assert_eq!(missing, vec!["rss_mb".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_reports_all_required_columns() {
        match load("") {
            Err(LoadError::MissingColumns { missing, .. }) => assert_eq!(missing.len(), 4),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_header_only_is_empty_series() {
        let result = load("timestamp,elapsed_sec,rss_kb,rss_mb\n");
        assert!(matches!(result, Err(LoadError::EmptySeries { .. })));
    }

    #[test]
    fn test_non_numeric_elapsed_rows_are_dropped() {
        let csv = "timestamp,elapsed_sec,rss_kb,rss_mb\n\
                   a,0,,1\n\
                   b,soon,,1\n\
                   c,,,1\n\
                   d,nan,,1\n\
                   e,10,,1\n";
        let samples = load(csv).unwrap();
        let names: Vec<&str> = samples.iter().map(|s| s.timestamp.as_str()).collect();
        assert_eq!(names, vec!["a", "e"]);
    }

    #[test]
    fn test_all_rows_invalid_is_empty_series() {
        let csv = "timestamp,elapsed_sec,rss_kb,rss_mb\na,x,,1\nb,y,,2\n";
        assert!(matches!(load(csv), Err(LoadError::EmptySeries { .. })));
    }

    #[test]
    fn test_rss_mb_backfilled_from_kb() {
        let csv = "timestamp,elapsed_sec,rss_kb,rss_mb\nt,0,2048,\n";
        let samples = load(csv).unwrap();
        assert_eq!(samples[0].rss_kb, Some(2048.0));
        assert_eq!(samples[0].rss_mb, Some(2.0));
    }

    #[test]
    fn test_bad_kb_with_good_mb_keeps_memory() {
        let csv = "timestamp,elapsed_sec,rss_kb,rss_mb\nt,0,oops,12.5\n";
        let samples = load(csv).unwrap();
        assert_eq!(samples[0].rss_kb, None);
        assert_eq!(samples[0].rss_mb, Some(12.5));
    }

    #[test]
    fn test_unparsable_mb_is_not_backfilled() {
        let csv = "timestamp,elapsed_sec,rss_kb,rss_mb\nt,0,2048,n/a\n";
        let samples = load(csv).unwrap();
        assert_eq!(samples[0].rss_mb, None);
        assert_eq!(samples[0].rss_kb, Some(2048.0));
    }

    #[test]
    fn test_no_memory_fields_keeps_row() {
        let csv = "timestamp,elapsed_sec,rss_kb,rss_mb\nt,0,,\n";
        let samples = load(csv).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].rss_mb, None);
    }

    #[test]
    fn test_counters_best_effort() {
        let csv = "timestamp,elapsed_sec,rss_kb,rss_mb,threads,fds,handles\n\
                   t,0,,1, 12 ,,many\n";
        let s = &load(csv).unwrap()[0];
        assert_eq!(s.threads, Some(12));
        assert_eq!(s.fds, None);
        assert_eq!(s.handles, None);
    }

    #[test]
    fn test_extra_columns_and_short_rows_tolerated() {
        let csv = "host,timestamp,elapsed_sec,rss_kb,rss_mb,threads\n\
                   box,t0,0,,1.0,4\n\
                   box,t1,5,1024\n";
        let samples = load(csv).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].threads, Some(4));
        assert_eq!(samples[1].rss_mb, Some(1.0));
        assert_eq!(samples[1].threads, None);
    }

    #[test]
    fn test_counter_columns_found_in_any_order() {
        let csv = "handles,fds,timestamp,elapsed_sec,rss_kb,rss_mb,threads\n\
                   7,64,t,0,,1,12\n";
        let s = &load(csv).unwrap()[0];
        assert_eq!((s.threads, s.fds, s.handles), (Some(12), Some(64), Some(7)));
    }

    #[test]
    fn test_negative_counters_and_non_finite_values_are_undefined() {
        let csv = "timestamp,elapsed_sec,rss_kb,rss_mb,threads,fds\n\
                   a,0,inf,nan,-3,2.5\n\
                   b,inf,,1,1,1\n";
        let samples = load(csv).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].rss_kb, None);
        assert_eq!(samples[0].rss_mb, None);
        assert_eq!(samples[0].threads, None);
        assert_eq!(samples[0].fds, None);
    }
}
