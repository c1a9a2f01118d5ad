#![deny(missing_docs)]

//! # Generate Command
//!
//! Implements the pipeline for one Kubernetes API version:
//!
//! 1. **Fetch**: download the swagger document (or read `--swagger`).
//! 2. **Remap**: move every `io.k8s` name under `<package_root>.<version_module>`.
//! 3. **Persist**: write the remapped document to `<workdir>/<version_module>.json`.
//! 4. **Generate**: run the base generator into a fresh package directory.
//! 5. **Patch**: inject guards and accessors for every merge-key proplist.
//! 6. **Normalize**: write `mod.rs` markers and anchor relative imports at `crate::`.
//! 7. **Format**: run `rustfmt` over the package.

use crate::error::{CliError, CliResult};
use crate::fetch::obtain_schema;
use crate::generator::{format_tree, run_base_generator, CommandExecutor};
use k8sgencfg_core::{
    ensure_package_markers, make_imports_absolute, patch_proplists, persist_schema,
    remap_namespace, scan_proplists, version_module, GenConfig,
};
use std::fs;
use std::path::PathBuf;

/// Arguments for the generate pipeline.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Kubernetes API version to generate (e.g. 1.29).
    #[clap(value_name = "VERSION")]
    pub api_version: String,

    /// Output root the package tree is generated into.
    #[clap(long, default_value = "src")]
    pub root: PathBuf,

    /// Directory receiving the remapped schema artifact.
    #[clap(long, default_value = ".")]
    pub workdir: PathBuf,

    /// Read the schema from this file instead of downloading it.
    #[clap(long)]
    pub swagger: Option<PathBuf>,

    /// Base generator executable.
    #[clap(long, env = "K8SGENCFG_GENERATOR", default_value = "k8s-modelgen")]
    pub generator: String,

    /// Skip the base generator step (only process existing files).
    #[clap(long)]
    pub no_gen: bool,

    /// Skip running rustfmt over the generated package.
    #[clap(long)]
    pub no_format: bool,
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Proplist fields found in the schema.
    pub proplists: usize,
    /// Patch cycles that changed a file.
    pub patched: usize,
    /// `mod.rs` files created or extended.
    pub markers: usize,
    /// Files whose imports were rewritten.
    pub rewritten: usize,
    /// Files handed to the formatter.
    pub formatted: usize,
}

/// Executes the generate pipeline.
///
/// # Arguments
///
/// * `args` - Command arguments.
/// * `config` - Namespace, annotation and hook settings.
/// * `executor` - Runner for the base generator and the formatter.
pub fn execute<E: CommandExecutor>(
    args: &GenerateArgs,
    config: &GenConfig,
    executor: &E,
) -> CliResult<RunSummary> {
    let vm = version_module(&args.api_version);
    let package_dir = args.root.join(&config.package_root).join(&vm);
    let mut summary = RunSummary::default();

    println!("Starting pipeline for Kubernetes {}...", args.api_version);

    let url = config.swagger_url_for(&args.api_version);
    let upstream = obtain_schema(args.swagger.as_deref(), &url)?;

    let target = config.target_namespace(&vm);
    tracing::info!(legacy = %config.legacy_namespace, target = %target, "remapping namespace");
    let doc = remap_namespace(upstream, &config.legacy_namespace, &target);

    fs::create_dir_all(&args.workdir)?;
    let artifact = args.workdir.join(format!("{}.json", vm));
    persist_schema(&doc, &artifact)?;
    println!("Wrote remapped schema to {:?}", artifact);

    if !args.no_gen {
        if package_dir.exists() {
            tracing::info!(dir = ?package_dir, "removing previous package");
            fs::remove_dir_all(&package_dir)?;
        }
        fs::create_dir_all(&args.root)?;
        println!("Generating models into {:?}...", args.root);
        run_base_generator(&args.generator, &artifact, &args.root, executor)?;
    } else {
        if !package_dir.is_dir() {
            return Err(CliError::General(format!(
                "Package directory not found: {:?} (--no-gen needs an existing tree)",
                package_dir
            )));
        }
        println!("Skipping model generation (--no-gen).");
    }

    let fields = scan_proplists(&doc, config)?;
    summary.proplists = fields.len();
    println!("Patching {} proplist fields...", fields.len());
    summary.patched = patch_proplists(&args.root, &fields, config)?;

    summary.markers = ensure_package_markers(&args.root, &package_dir)?;
    summary.rewritten = make_imports_absolute(&args.root, &package_dir)?;
    println!(
        "Normalized package {:?} ({} markers, {} files with rewritten imports)",
        package_dir, summary.markers, summary.rewritten
    );

    if !args.no_format {
        summary.formatted = format_tree(&package_dir, executor)?;
    } else {
        println!("Skipping formatting (--no-format).");
    }

    println!("Pipeline completed successfully.");
    tracing::info!(?summary, "run finished");
    Ok(summary)
}
