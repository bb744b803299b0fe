// SoakGate - app/analysis.rs
//
// Orchestrates one analysis run: load -> statistics -> trend -> log scan ->
// verdict. Opens the input files and hands readers to the core layer.
//
// Single-threaded and stateless: each call works on its own series.

use crate::core::export;
use crate::core::loader;
use crate::core::log_scan::{self, LogScanConfig};
use crate::core::model::{Sample, SoakThresholds};
use crate::core::stats;
use crate::core::trend;
use crate::core::verdict::{self, SoakReport};
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::util::error::{ExportError, LoadError, Result};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Inputs of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Sampler CSV.
    pub csv_path: PathBuf,
    /// Optional application log captured during the run.
    pub app_log: Option<PathBuf>,
}

/// Thresholds and scan settings for a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisSettings {
    pub thresholds: SoakThresholds,
    pub log_scan: LogScanConfig,
}

impl From<&AppConfig> for AnalysisSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            thresholds: SoakThresholds {
                target_interval_secs: config.target_interval_secs,
                min_sample_ratio: config.min_sample_ratio,
                max_drift_mb: config.max_drift_mb,
                max_drift_pct: config.max_drift_pct,
                trend_window_secs: config.trend_window_secs,
                trend_min_fraction: config.trend_min_fraction,
            },
            log_scan: LogScanConfig {
                keywords: config.log_keywords.clone(),
                max_issues: config.max_log_issues,
            },
        }
    }
}

/// Run the full pipeline for one request.
///
/// # Errors
/// Fails only if the series cannot be loaded or carries no memory data.
/// Log problems become findings in the report.
pub fn run_analysis(request: &AnalysisRequest, settings: &AnalysisSettings) -> Result<SoakReport> {
    tracing::info!(
        csv = %request.csv_path.display(),
        app_log = ?request.app_log,
        "Starting soak analysis"
    );

    let samples = load_series(&request.csv_path)?;
    let stats = stats::compute_stats(&samples, &settings.thresholds)?;
    let trend_review = trend::detect_trend(&samples, &settings.thresholds);
    let log_issues = scan_app_log(request.app_log.as_deref(), &settings.log_scan);

    Ok(verdict::compose(
        stats,
        trend_review,
        log_issues,
        &settings.thresholds,
    ))
}

/// Open and parse the sampler CSV.
pub fn load_series(path: &Path) -> std::result::Result<Vec<Sample>, LoadError> {
    let reader = fs::open_buffered(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    loader::parse_series(reader, path)
}

/// Scan the optional application log.
///
/// No path means no findings. A missing or unreadable file is reported as a
/// single finding rather than an error.
pub fn scan_app_log(path: Option<&Path>, config: &LogScanConfig) -> Vec<String> {
    let Some(path) = path else {
        return Vec::new();
    };

    if !fs::exists(path) {
        tracing::warn!(path = %path.display(), "Application log not found");
        return vec![format!("app log '{}' not found", path.display())];
    }

    let result = fs::open_buffered(path).and_then(|reader| log_scan::scan_lines(reader, config));
    match result {
        Ok(issues) => issues,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Application log unreadable");
            vec![format!("app log '{}' could not be read: {e}", path.display())]
        }
    }
}

/// Write the report as JSON to `path`, replacing any existing file.
pub fn write_json_report(report: &SoakReport, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    export::export_json(report, BufWriter::new(file), path)?;
    tracing::info!(path = %path.display(), "JSON summary written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_log_path_is_no_findings() {
        assert!(scan_app_log(None, &LogScanConfig::default()).is_empty());
    }

    #[test]
    fn test_missing_log_is_single_finding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.log");
        let issues = scan_app_log(Some(path.as_path()), &LogScanConfig::default());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("app log '"));
        assert!(issues[0].ends_with("' not found"));
    }

    #[test]
    fn test_directory_as_log_is_single_finding() {
        let dir = tempfile::tempdir().unwrap();
        let issues = scan_app_log(Some(dir.path()), &LogScanConfig::default());
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_settings_from_config() {
        let config = AppConfig {
            max_drift_mb: 9.0,
            max_log_issues: 2,
            ..Default::default()
        };
        let settings = AnalysisSettings::from(&config);
        assert_eq!(settings.thresholds.max_drift_mb, 9.0);
        assert_eq!(settings.log_scan.max_issues, 2);
        assert_eq!(
            AnalysisSettings::from(&AppConfig::default()),
            AnalysisSettings::default()
        );
    }

    #[test]
    fn test_missing_csv_is_io_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_series(&dir.path().join("none.csv"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
