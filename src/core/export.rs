// SoakGate - core/export.rs
//
// JSON export of the composed soak report for pipeline consumption.
// Core layer: writes to any Write trait object.

use crate::core::verdict::SoakReport;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Write the report as pretty-printed JSON.
///
/// Undefined statistics (`NaN`) are written as `null`. The writer is
/// flushed before returning so buffered write failures surface here.
pub fn export_json<W: Write>(
    report: &SoakReport,
    mut writer: W,
    export_path: &Path,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, report).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    writeln!(writer).map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
