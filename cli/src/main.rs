#![deny(missing_docs)]

//! # k8sgencfg CLI
//!
//! Generates Kubernetes configuration models for one API version: fetches
//! the swagger document, remaps its namespace, runs the base generator and
//! post-processes the generated package (proplist guards and accessors,
//! `mod.rs` markers, absolute imports, formatting).

use clap::Parser;
use k8sgencfg_core::GenConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::CliResult;
use crate::generator::ShellExecutor;

mod error;
mod fetch;
mod generator;
mod pipeline;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Kubernetes config model generator")]
struct Cli {
    #[clap(flatten)]
    generate: pipeline::GenerateArgs,

    /// YAML or JSON file overriding namespace, annotation and hook settings.
    #[clap(long, env = "K8SGENCFG_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[clap(long)]
    json_logs: bool,
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the `-v` count.
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,k8sgencfg_core=info,k8sgencfg=info".to_string(),
            2 => "info,k8sgencfg_core=debug,k8sgencfg=debug".to_string(),
            _ => "debug,k8sgencfg_core=trace,k8sgencfg=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let config = GenConfig::load(cli.config.as_deref())?;
    pipeline::execute(&cli.generate, &config, &ShellExecutor)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["k8sgencfg", "1.29"]).unwrap();
        assert_eq!(cli.generate.api_version, "1.29");
        assert_eq!(cli.generate.root, PathBuf::from("src"));
        assert_eq!(cli.generate.workdir, PathBuf::from("."));
        assert!(!cli.generate.no_gen);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "k8sgencfg",
            "1.30",
            "--root",
            "out",
            "--swagger",
            "swagger.json",
            "--no-gen",
            "--no-format",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.generate.root, PathBuf::from("out"));
        assert_eq!(cli.generate.swagger, Some(PathBuf::from("swagger.json")));
        assert!(cli.generate.no_gen && cli.generate.no_format);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_version_is_required() {
        assert!(Cli::try_parse_from(["k8sgencfg"]).is_err());
    }
}
