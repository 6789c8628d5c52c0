use crate::error::{Result, WriterError};
pub use crate::log_info;
use serde::Serialize;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes records as JSON Lines: one JSON object per line, no enclosing
/// array, so consumers can read the file as an independent-record stream.
pub struct RecordWriter {
    path: PathBuf,
}

impl RecordWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Truncate the destination and write the given record(s).
    pub fn overwrite<T: Serialize>(&self, records: &T) -> Result<()> {
        self.ensure_parent()?;
        let file = File::create(&self.path).map_err(WriterError::Io)?;
        self.write_lines(file, records)
    }

    /// Append the given record(s), creating the file if missing.
    pub fn append<T: Serialize>(&self, records: &T) -> Result<()> {
        self.ensure_parent()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(WriterError::Io)?;
        self.write_lines(file, records)
    }

    /// A single record serializes to a JSON object and becomes one line; a
    /// sequence of records becomes one line per element. Any other shape is
    /// rejected. Lines are written independently, so a failure mid-sequence
    /// leaves the lines already written intact.
    fn write_lines<T: Serialize>(&self, file: File, records: &T) -> Result<()> {
        let value = serde_json::to_value(records).map_err(WriterError::Serialize)?;
        let mut writer = BufWriter::new(file);

        let written = match value {
            Value::Object(_) => {
                self.write_line(&mut writer, &value)?;
                1
            }
            Value::Array(items) => {
                for item in &items {
                    if !item.is_object() {
                        return Err(WriterError::InvalidInput(shape_of(item).to_string()).into());
                    }
                    self.write_line(&mut writer, item)?;
                }
                items.len()
            }
            other => {
                return Err(WriterError::InvalidInput(shape_of(&other).to_string()).into());
            }
        };

        writer.flush().map_err(WriterError::Io)?;
        log_info!("[writer] Wrote {} record(s) to {:?}", written, self.path);
        Ok(())
    }

    fn write_line(&self, writer: &mut BufWriter<File>, value: &Value) -> Result<()> {
        let line = serde_json::to_string(value).map_err(WriterError::Serialize)?;
        writeln!(writer, "{}", line).map_err(WriterError::Io)?;
        Ok(())
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !Path::new(parent).exists() {
                std::fs::create_dir_all(parent).map_err(WriterError::Io)?;
            }
        }
        Ok(())
    }
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a nested sequence",
        Value::Object(_) => "a record",
    }
}
