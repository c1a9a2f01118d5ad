#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use k8sgencfg_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Failure inside the schema/patch/import pipeline.
    #[display("{}", _0)]
    Core(AppError),

    /// The schema document could not be downloaded.
    #[from(ignore)]
    #[display("HTTP Error: {}", _0)]
    Http(String),

    /// An external program (base generator, formatter) failed.
    #[from(ignore)]
    #[display("Collaborator failed: {}", _0)]
    Collaborator(String),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// `General(String)` holds a `String`, which is not an `Error`, so a derived
/// `source()` would not compile.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_passes_through() {
        let err: CliError = AppError::InvalidSchema("no definitions".into()).into();
        assert!(matches!(err, CliError::Core(_)));
        assert_eq!(format!("{}", err), "Invalid Schema: no definitions");
    }

    #[test]
    fn test_string_is_general() {
        let err: CliError = String::from("boom").into();
        assert_eq!(format!("{}", err), "Operation failed: boom");
    }
}
