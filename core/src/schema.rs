#![deny(missing_docs)]

//! # Schema Documents
//!
//! Reading the swagger document and persisting the remapped copy handed to
//! the base generator.

use crate::error::{AppError, AppResult};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Parses a schema document from text. The root must be an object.
pub fn parse_schema(text: &str) -> AppResult<Value> {
    let doc: Value = serde_json::from_str(text)?;
    if !doc.is_object() {
        return Err(AppError::InvalidSchema(
            "Schema document root must be an object".into(),
        ));
    }
    Ok(doc)
}

/// Reads a schema document from disk.
pub fn load_schema(path: &Path) -> AppResult<Value> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::General(format!("Failed to read schema {:?}: {}", path, e))
    })?;
    parse_schema(&text)
}

/// Writes the document with sorted keys and two-space indentation.
pub fn persist_schema(doc: &Value, path: &Path) -> AppResult<()> {
    let sorted = sort_keys(doc.clone());
    let mut text = serde_json::to_string_pretty(&sorted)?;
    text.push('\n');
    fs::write(path, text)
        .map_err(|e| AppError::General(format!("Failed to write schema {:?}: {}", path, e)))?;
    Ok(())
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
