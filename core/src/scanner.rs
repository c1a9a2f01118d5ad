#![deny(missing_docs)]

//! # Annotation Scanner
//!
//! Finds "proplist" fields in a schema document: array properties annotated
//! with a merge key and the `merge` patch strategy. Each hit names the
//! generated file and struct the patch engine has to visit.

use crate::config::GenConfig;
use crate::error::{AppError, AppResult};
use crate::naming::{module_file_path, split_type_name};
use serde_json::Value;
use std::path::PathBuf;

/// A schema field whose array elements form a set keyed by `merge_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProplistField {
    /// Fully-qualified type name, e.g. `k8sgencfg.v1_29.api.core.v1.PodSpec`.
    pub type_name: String,
    /// Module part of the type name.
    pub module_name: String,
    /// Struct name the base generator emitted.
    pub class_name: String,
    /// Property name as written in the schema.
    pub field_name: String,
    /// Property name (in the item schema) that must be unique.
    pub merge_key: String,
    /// Generated file, relative to the output root.
    pub module_path: PathBuf,
}

/// Returns every proplist field, in document order.
pub fn scan_proplists(doc: &Value, config: &GenConfig) -> AppResult<Vec<ProplistField>> {
    let definitions = doc
        .get("definitions")
        .ok_or_else(|| AppError::InvalidSchema("Schema has no 'definitions' section".into()))?
        .as_object()
        .ok_or_else(|| AppError::InvalidSchema("'definitions' must be an object".into()))?;

    let mut found = Vec::new();

    for (type_name, spec) in definitions {
        let Some(properties) = spec.get("properties").and_then(Value::as_object) else {
            continue;
        };

        for (field_name, field_spec) in properties {
            let Some(merge_key) = proplist_merge_key(field_spec, config) else {
                continue;
            };

            let (module_name, class_name) = split_type_name(type_name)?;
            tracing::debug!(type_name = %type_name, field = %field_name, merge_key, "proplist field");

            found.push(ProplistField {
                type_name: type_name.clone(),
                module_name: module_name.to_string(),
                class_name: class_name.to_string(),
                field_name: field_name.clone(),
                merge_key: merge_key.to_string(),
                module_path: module_file_path(module_name),
            });
        }
    }

    Ok(found)
}

/// The merge key of a field, if the field qualifies as a proplist.
fn proplist_merge_key<'a>(field_spec: &'a Value, config: &GenConfig) -> Option<&'a str> {
    let is_array = field_spec.get("type").and_then(Value::as_str) == Some("array");
    let strategy = field_spec
        .get(&config.strategy_annotation)
        .and_then(Value::as_str);
    let merge_key = field_spec
        .get(&config.merge_key_annotation)
        .and_then(Value::as_str);

    match (is_array, strategy, merge_key) {
        (true, Some(s), Some(key)) if s == config.merge_strategy => Some(key),
        _ => None,
    }
}
