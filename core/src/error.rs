//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};
use std::path::Path;

/// The Global Error Enum.
///
/// String errors default to `General`; every other string-carrying variant
/// must be constructed explicitly.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Schema or artifact JSON that could not be read or written.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Configuration file that could not be parsed.
    #[display("Config Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// A class or field declaration expected in generated source is absent.
    #[from(ignore)]
    #[display("Not Found: {_0}")]
    NotFound(String),

    /// A proplist field whose declared type is neither `Vec<T>` nor `Option<Vec<T>>`.
    #[from(ignore)]
    #[display("Unsupported Shape: {_0}")]
    UnsupportedShape(String),

    /// The schema document does not have the expected structure.
    #[from(ignore)]
    #[display("Invalid Schema: {_0}")]
    InvalidSchema(String),

    /// A relative `use` path that cannot be anchored at the output root.
    #[from(ignore)]
    #[display("Invalid Import: {_0}")]
    InvalidImport(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

impl AppError {
    /// Names the offending file in the message, keeping the variant.
    pub fn in_file(self, path: &Path) -> Self {
        let ctx = |msg: String| format!("{} (in {:?})", msg, path);
        match self {
            AppError::NotFound(m) => AppError::NotFound(ctx(m)),
            AppError::UnsupportedShape(m) => AppError::UnsupportedShape(ctx(m)),
            AppError::InvalidImport(m) => AppError::InvalidImport(ctx(m)),
            AppError::General(m) => AppError::General(ctx(m)),
            other => other,
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
