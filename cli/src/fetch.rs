//! # Schema Fetch
//!
//! Obtains the upstream schema document, either over HTTP or from disk.

use crate::error::{CliError, CliResult};
use k8sgencfg_core::{load_schema, parse_schema};
use serde_json::Value;
use std::path::Path;

/// Downloads and parses the schema document at `url`.
#[cfg(feature = "client")]
pub fn download_schema(url: &str) -> CliResult<Value> {
    tracing::info!(url, "downloading schema");
    let mut response = ureq::get(url)
        .call()
        .map_err(|e| CliError::Http(format!("GET {} failed: {}", url, e)))?;
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| CliError::Http(format!("Failed to read response from {}: {}", url, e)))?;
    Ok(parse_schema(&body)?)
}

/// Stub used when the crate is built without the `client` feature.
#[cfg(not(feature = "client"))]
pub fn download_schema(url: &str) -> CliResult<Value> {
    Err(CliError::Http(format!(
        "Cannot download {}: built without the `client` feature; pass --swagger <PATH>",
        url
    )))
}

/// Reads the schema from a local file when given, downloads it otherwise.
pub fn obtain_schema(local: Option<&Path>, url: &str) -> CliResult<Value> {
    match local {
        Some(path) => {
            tracing::info!(path = ?path, "reading local schema");
            Ok(load_schema(path)?)
        }
        None => download_schema(url),
    }
}
