// SoakGate - core/log_scan.rs
//
// Keyword scan of the application log captured alongside the soak run.
// Core layer: reads from any BufRead; the app layer opens the file.

use crate::util::constants;
use std::io::{self, BufRead};

/// Keywords and cap for the log scan.
#[derive(Debug, Clone, PartialEq)]
pub struct LogScanConfig {
    /// Case-insensitive substrings that flag a line.
    pub keywords: Vec<String>,
    /// Scanning stops once this many lines have been flagged.
    pub max_issues: usize,
}

impl Default for LogScanConfig {
    fn default() -> Self {
        Self {
            keywords: constants::LOG_ISSUE_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
            max_issues: constants::MAX_LOG_ISSUES,
        }
    }
}

/// Collect up to `max_issues` lines containing any keyword, in file order.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. Invalid UTF-8 is replaced
/// rather than rejected. Flagged lines are returned trimmed with their
/// original casing.
pub fn scan_lines<R: BufRead>(mut reader: R, config: &LogScanConfig) -> io::Result<Vec<String>> {
    let keywords: Vec<String> = config
        .keywords
        .iter()
        .map(|k| k.to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    let mut issues = Vec::new();
    if config.max_issues == 0 || keywords.is_empty() {
        return Ok(issues);
    }

    let mut buf = Vec::new();
    let mut lines_read: u64 = 0;
    loop {
        buf.clear();
        if !read_line(&mut reader, &mut buf)? {
            break;
        }
        lines_read += 1;

        let line = String::from_utf8_lossy(&buf);
        let lower = line.to_lowercase();
        if keywords.iter().any(|k| lower.contains(k.as_str())) {
            issues.push(line.trim().to_string());
            if issues.len() >= config.max_issues {
                break;
            }
        }
    }

    tracing::debug!(lines_read, issues = issues.len(), "Log scan complete");
    Ok(issues)
}

/// Read one line into `buf` without its terminator. Returns false at EOF.
fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    let mut read_any = false;
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(read_any);
        }
        read_any = true;

        match available.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) => {
                let terminator = available[i];
                buf.extend_from_slice(&available[..i]);
                reader.consume(i + 1);
                if terminator == b'\r' && reader.fill_buf()?.first() == Some(&b'\n') {
                    reader.consume(1);
                }
                return Ok(true);
            }
            None => {
                let len = available.len();
                buf.extend_from_slice(available);
                reader.consume(len);
            }
        }
    }
}
