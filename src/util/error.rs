// SoakGate - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Only load and statistics failures abort a run; everything else is
// recovered locally and surfaces as a finding or a warning.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all SoakGate operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum SoakError {
    /// The sample series could not be loaded.
    Load(LoadError),

    /// Statistics could not be derived from the loaded series.
    Stats(StatsError),

    /// Writing the JSON summary failed.
    Export(ExportError),
}

impl fmt::Display for SoakError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "{e}"),
            Self::Stats(e) => write!(f, "{e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
        }
    }
}

impl std::error::Error for SoakError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Stats(e) => Some(e),
            Self::Export(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Errors related to loading the sample CSV.
#[derive(Debug)]
pub enum LoadError {
    /// The header row lacks one or more required columns.
    MissingColumns { path: PathBuf, missing: Vec<String> },

    /// No data row survived `elapsed_sec` parsing.
    EmptySeries { path: PathBuf },

    /// The CSV reader failed (malformed quoting, unreadable header, ...).
    Csv { path: PathBuf, source: csv::Error },

    /// I/O error opening or reading the CSV.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumns { path, missing } => write!(
                f,
                "CSV '{}' missing required headers: {}",
                path.display(),
                missing.join(", ")
            ),
            Self::EmptySeries { path } => {
                write!(f, "CSV '{}' contains no valid samples", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV '{}' could not be read: {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Cannot open CSV '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<LoadError> for SoakError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

// ---------------------------------------------------------------------------
// Statistics errors
// ---------------------------------------------------------------------------

/// Errors related to deriving statistics.
#[derive(Debug)]
pub enum StatsError {
    /// No sample carries a usable memory value.
    NoMemoryData { samples: usize },
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMemoryData { samples } => write!(
                f,
                "No RSS data available in samples ({samples} samples, none with a memory value)"
            ),
        }
    }
}

impl std::error::Error for StatsError {}

impl From<StatsError> for SoakError {
    fn from(e: StatsError) -> Self {
        Self::Stats(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to writing the JSON summary.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error creating or writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for SoakError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
///
/// Never fatal: `load_config` returns these alongside a usable config and
/// the caller logs them as warnings.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for SoakGate results.
pub type Result<T> = std::result::Result<T, SoakError>;
