//! File helpers.

use crate::helpers::{hooked_adapter, loads};
use cells_json_core::{JsonValue, Result, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encode a value and write it to `path`, creating parent directories.
///
/// Every value goes through the serializer, so decimals, durations, paths
/// and structured objects are written like any other supported type. The
/// value is fully encoded before the file is created, so a failed conversion
/// leaves no file behind.
pub fn save_json(value: &Value, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let encoded = hooked_adapter()?.encode(value)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(encoded.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Read and decode the JSON document at `path`.
pub fn load_json(path: impl AsRef<Path>) -> Result<JsonValue> {
    let bytes = fs::read(path)?;
    loads(&bytes)
}
