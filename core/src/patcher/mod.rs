#![deny(missing_docs)]

//! # Code Patching
//!
//! Augments generated Rust models in place. Declarations are located through
//! the rust-analyzer syntax tree; new text is spliced at node boundaries and
//! the file is re-parsed before the next edit.
//!
//! - **files**: module-level edits (imports).
//! - **impls**: impl-block edits (hook, methods, statements before the tail).
//! - **workflows**: the proplist recipe and its file-level drivers.

mod attributes;
pub(crate) mod common;

/// File-level patching operations (e.g. imports).
pub mod files;

/// Impl-block patching operations (e.g. methods, injected statements).
pub mod impls;

/// High-level patching workflows.
pub mod workflows;

pub use files::{ensure_import, imported_paths};
pub use impls::{add_method, ensure_hook, ensure_inherent_impl, insert_before_tail};
pub use workflows::{
    apply_proplist, patch_module_file, patch_proplists, plan_instruction, PatchInstruction,
};
