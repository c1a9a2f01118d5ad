#![deny(missing_docs)]

//! # Generator Configuration
//!
//! Names and annotations the pipeline keys off. Every field has a default
//! matching the upstream Kubernetes swagger document, so an empty config file
//! (or none at all) yields the standard behaviour.

use crate::error::AppResult;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Tunables for schema remapping, proplist detection and patching.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GenConfig {
    /// Namespace prefix used by the upstream schema (e.g. `io.k8s`).
    pub legacy_namespace: String,
    /// Top-level package the generated modules live under.
    pub package_root: String,
    /// Property annotation naming the merge key of a list.
    pub merge_key_annotation: String,
    /// Property annotation naming the patch strategy of a list.
    pub strategy_annotation: String,
    /// Strategy value that makes an annotated list a proplist.
    pub merge_strategy: String,
    /// Name of the serialization hook injected into generated structs.
    pub hook_name: String,
    /// Schema download URL; `{version}` is substituted.
    pub swagger_url: String,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            legacy_namespace: "io.k8s".into(),
            package_root: "k8sgencfg".into(),
            merge_key_annotation: "x-kubernetes-patch-merge-key".into(),
            strategy_annotation: "x-kubernetes-patch-strategy".into(),
            merge_strategy: "merge".into(),
            hook_name: "to_json".into(),
            swagger_url: "https://raw.githubusercontent.com/kubernetes/kubernetes/release-{version}/api/openapi-spec/swagger.json".into(),
        }
    }
}

impl GenConfig {
    /// Loads a config from a YAML (or JSON) file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(p) => {
                let text = fs::read_to_string(p)?;
                Self::from_yaml(&text)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parses a config document. Missing keys fall back to defaults.
    pub fn from_yaml(text: &str) -> AppResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Module path the schema namespace is remapped to for one version module.
    ///
    /// `k8sgencfg` + `v1_29` -> `k8sgencfg.v1_29`
    pub fn target_namespace(&self, version_module: &str) -> String {
        format!("{}.{}", self.package_root, version_module)
    }

    /// Download URL of the schema for an API version.
    pub fn swagger_url_for(&self, version: &str) -> String {
        self.swagger_url.replace("{version}", version)
    }
}
