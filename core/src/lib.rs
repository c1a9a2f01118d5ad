#![deny(missing_docs)]

//! # k8sgencfg Core
//!
//! Post-processing for Rust models generated from the Kubernetes API schema:
//! namespace remapping of the schema, merge-key "proplist" validation and
//! accessors spliced into generated structs, and import normalization of the
//! generated module tree.

/// Shared error types.
pub mod error;

/// Generator configuration.
pub mod config;

/// Schema-name to identifier/path mappings.
pub mod naming;

/// Schema document I/O.
pub mod schema;

/// Namespace remapping of schema documents.
pub mod remap;

/// Proplist discovery in schema documents.
pub mod scanner;

/// Declared list shape classification.
pub mod shape;

/// Source templates for injected code.
pub mod codegen;

/// Code patching utilities.
pub mod patcher;

/// Relative-to-absolute import rewriting and package markers.
pub mod imports;

pub use config::GenConfig;
pub use error::{AppError, AppResult};
pub use imports::{ensure_package_markers, make_imports_absolute};
pub use naming::version_module;
pub use patcher::{apply_proplist, patch_proplists, PatchInstruction};
pub use remap::remap_namespace;
pub use scanner::{scan_proplists, ProplistField};
pub use schema::{load_schema, parse_schema, persist_schema};
pub use shape::ListShape;
