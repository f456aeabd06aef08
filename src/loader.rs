//! Source loading
//!
//! Reads JSON or TOML documents into the JSON value model, keeping the key
//! order of every mapping, and builds configuration trees from them.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::tree::ConfigTree;

/// Source document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    /// Detect by file extension; anything other than `.toml` is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Json,
        }
    }
}

/// Build a tree from an already-parsed value
pub fn import_config(value: Value) -> Result<ConfigTree> {
    ConfigTree::from_value(value)
}

pub fn import_config_from_str(contents: &str, format: Format) -> Result<ConfigTree> {
    import_config(parse_str(contents, format)?)
}

/// Read, parse and build a tree from a file
pub fn import_config_from_file(path: &Path) -> Result<ConfigTree> {
    import_config(read_value(path)?)
}

/// Read and parse a file, format detected from its extension
pub fn read_value(path: &Path) -> Result<Value> {
    let bytes = fs::read(path).map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), bytes = bytes.len(), "read config source");
    parse_bytes(&bytes, Format::from_path(path))
}

pub fn parse_bytes(bytes: &[u8], format: Format) -> Result<Value> {
    let contents = std::str::from_utf8(bytes)
        .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;
    parse_str(contents, format)
}

pub fn parse_str(contents: &str, format: Format) -> Result<Value> {
    match format {
        Format::Json => serde_json::from_str(contents)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e))),
        Format::Toml => {
            let table: toml::Table = toml::from_str(contents)
                .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
            toml_to_json(toml::Value::Table(table))
        }
    }
}

/// Convert a TOML value to the JSON value model
fn toml_to_json(toml: toml::Value) -> Result<Value> {
    Ok(match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| ConfigError::MalformedInput(format!("non-finite float {}", f)))?,
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(
            arr.into_iter()
                .map(toml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        toml::Value::Table(table) => {
            let mut map = serde_json::Map::new();
            for (key, value) in table {
                map.insert(key, toml_to_json(value)?);
            }
            Value::Object(map)
        }
    })
}
