// SoakGate - platform/fs.rs
//
// Thin filesystem helpers. Handles are scoped to the caller's read and
// dropped as soon as it returns.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Open a file for buffered sequential reading.
pub fn open_buffered(path: &Path) -> io::Result<BufReader<File>> {
    let file = File::open(path)?;
    Ok(BufReader::new(file))
}

/// True if `path` names an existing filesystem entry.
pub fn exists(path: &Path) -> bool {
    path.exists()
}
