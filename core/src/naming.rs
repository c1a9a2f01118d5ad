#![deny(missing_docs)]

//! # Naming
//!
//! Deterministic mappings between schema names and the identifiers/paths the
//! base generator produces.

use crate::error::{AppError, AppResult};
use heck::ToSnakeCase;
use std::path::PathBuf;

/// Keywords that must be written as raw identifiers when used as field names.
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

/// Splits a fully-qualified type name into `(module, class)`.
///
/// `k8sgencfg.v1_29.api.core.v1.Pod` -> `("k8sgencfg.v1_29.api.core.v1", "Pod")`
pub fn split_type_name(fqdn: &str) -> AppResult<(&str, &str)> {
    fqdn.rsplit_once('.')
        .filter(|(module, class)| !module.is_empty() && !class.is_empty())
        .ok_or_else(|| {
            AppError::InvalidSchema(format!(
                "Type name '{}' is not module-qualified (expected 'module.path.ClassName')",
                fqdn
            ))
        })
}

/// File (relative to the output root) holding a module's generated source.
///
/// Dots become directory separators, hyphens become underscores.
pub fn module_file_path(module_name: &str) -> PathBuf {
    let mut path: PathBuf = module_name
        .replace('-', "_")
        .split('.')
        .collect();
    path.set_extension("rs");
    path
}

/// Rust field identifier the base generator emits for a schema property.
pub fn field_ident(schema_name: &str) -> String {
    let snake = schema_name.to_snake_case();
    if RUST_KEYWORDS.contains(&snake.as_str()) {
        format!("r#{}", snake)
    } else {
        snake
    }
}

/// Identifier text without a raw `r#` prefix, for composing method names.
pub fn bare_ident(ident: &str) -> &str {
    ident.strip_prefix("r#").unwrap_or(ident)
}

/// Package module name for an API version: `1.29` -> `v1_29`.
pub fn version_module(version: &str) -> String {
    format!("v{}", version.replace('.', "_"))
}
