#![deny(missing_docs)]

//! # Collaborators
//!
//! Invocation of the external programs the pipeline depends on: the base
//! model generator that turns the schema into Rust modules, and `rustfmt`.

use crate::error::{CliError, CliResult};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use walkdir::WalkDir;

/// Interface for executing external commands.
///
/// Abstracted to allow mocking command execution in tests without requiring
/// the base generator or `rustfmt` to be installed.
pub trait CommandExecutor {
    /// Executes the command and returns the output.
    fn execute(&self, program: &str, args: &[&str]) -> CliResult<Output>;
}

/// Standard executor using `std::process::Command`.
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn execute(&self, program: &str, args: &[&str]) -> CliResult<Output> {
        let output = Command::new(program).args(args).output().map_err(|e| {
            CliError::Collaborator(format!("could not start `{}`: {}", program, e))
        })?;
        Ok(output)
    }
}

/// Runs the base generator on a schema file.
///
/// # Arguments
///
/// * `program` - Generator executable (e.g. "k8s-modelgen").
/// * `schema_path` - The remapped schema artifact.
/// * `output_root` - Root the generator writes its module tree into.
/// * `executor` - The command runner (use `ShellExecutor` for real execution).
pub fn run_base_generator<E: CommandExecutor>(
    program: &str,
    schema_path: &Path,
    output_root: &Path,
    executor: &E,
) -> CliResult<()> {
    // usage: <program> --input <schema.json> --output <root>
    let input = schema_path.to_string_lossy();
    let output = output_root.to_string_lossy();
    let args = vec!["--input", &input, "--output", &output];

    let cmd_result = executor.execute(program, &args)?;
    check_status(program, &cmd_result)
}

/// Formats every `.rs` file below `dir` with `rustfmt`.
///
/// Returns the number of files handed to the formatter.
pub fn format_tree<E: CommandExecutor>(dir: &Path, executor: &E) -> CliResult<usize> {
    let files: Vec<PathBuf> = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "rs"))
        .collect();

    if files.is_empty() {
        tracing::warn!(dir = ?dir, "no Rust files to format");
        return Ok(0);
    }

    let names: Vec<String> = files
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    let mut args: Vec<&str> = vec!["--edition", "2021"];
    args.extend(names.iter().map(String::as_str));

    let cmd_result = executor.execute("rustfmt", &args)?;
    check_status("rustfmt", &cmd_result)?;
    Ok(files.len())
}

fn check_status(program: &str, output: &Output) -> CliResult<()> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CliError::Collaborator(format!(
            "{} failed with status {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}
