//! Maintenance helpers
//!
//! Whole-file copies for backup/restore and the CSV rendering used by
//! export. The engine decides which failures are logged and which are
//! surfaced; these helpers just report them.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Result, StoreError};
use crate::record::Record;

/// First line of every export
pub const CSV_HEADER: &str = "id,title,price,quantity";

/// CRC32 of a whole file
pub fn file_crc32(path: &Path) -> Result<u32> {
    let file = File::open(path).map_err(|e| StoreError::unavailable(path, e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize())
}

/// Copy `src` over `dst` (overwriting) and check both sides hash the same.
///
/// Returns the CRC32 of the copied contents.
pub fn copy_verified(src: &Path, dst: &Path) -> Result<u32> {
    fs::copy(src, dst)?;

    let expected = file_crc32(src)?;
    let actual = file_crc32(dst)?;
    if expected != actual {
        return Err(StoreError::MaintenanceFailure(format!(
            "Checksum mismatch copying {} to {}: {:08x} != {:08x}",
            src.display(),
            dst.display(),
            expected,
            actual
        )));
    }

    Ok(actual)
}

/// Render records as CSV text.
///
/// Titles are wrapped in double quotes as-is: quotes and commas inside a
/// title are not escaped.
pub fn render_csv(records: &[Record]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + records.len() * 32);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for record in records {
        out.push_str(&format!(
            "{},\"{}\",{},{}\n",
            record.id, record.title, record.price, record.quantity
        ));
    }

    out
}
