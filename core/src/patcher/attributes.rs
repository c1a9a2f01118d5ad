//! # Attribute Operations
//!
//! Internal logic for reading `#[serde(...)]` attributes on generated fields.

use ra_ap_syntax::ast;
use ra_ap_syntax::{AstNode, SyntaxNode};
use regex::Regex;
use std::sync::OnceLock;

/// Returns the `rename = "..."` value of a `#[serde(...)]` attribute on the node.
pub(crate) fn serde_rename(node: &SyntaxNode) -> Option<String> {
    node.children()
        .filter_map(ast::Attr::cast)
        .filter_map(|attr| attr.meta())
        .filter(|meta| meta.path().is_some_and(|p| p.to_string() == "serde"))
        .filter_map(|meta| meta.token_tree())
        .find_map(|tt| parse_rename(&tt.to_string()))
}

fn parse_rename(content: &str) -> Option<String> {
    static RENAME_RE: OnceLock<Regex> = OnceLock::new();
    let rename_re =
        RENAME_RE.get_or_init(|| Regex::new(r#"\brename\s*=\s*"([^"]+)""#).expect("Invalid regex"));

    rename_re
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
