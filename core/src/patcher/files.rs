use crate::error::AppResult;
use crate::patcher::common::{check_needs_comma, parse_source};
use ra_ap_syntax::ast::{HasModuleItem, HasName};
use ra_ap_syntax::{ast, AstNode, SourceFile};

/// Ensures `use <module>::<name>;` is in effect for the file.
///
/// Nothing changes if the name is already imported, directly, inside a
/// `{..}` group, or through a glob. If a `use <module>::{..};` group exists
/// the name joins it; otherwise a new `use` goes right after the last
/// top-level `use`, or ahead of the first item when there is none.
pub fn ensure_import(source: &str, module: &str, name: &str) -> AppResult<String> {
    let file = parse_source(source);
    let wanted = format!("{}::{}", module, name);
    let glob = format!("{}::*", module);

    let imported = imported_paths(&file);
    if imported.iter().any(|p| *p == wanted || *p == glob) {
        return Ok(source.to_string());
    }

    let mut new_source = source.to_string();

    // Join an existing group for the same module
    let group = top_level_uses(&file).find_map(|u| {
        let tree = u.use_tree()?;
        let path = tree.path()?;
        if compact(&path.syntax().text().to_string()) != module {
            return None;
        }
        tree.use_tree_list()
    });
    if let Some(list) = group {
        if let Some(r_curly) = list.r_curly_token() {
            let insert_pos: usize = r_curly.text_range().start().into();
            let patch = if check_needs_comma(&r_curly) {
                format!(", {}", name)
            } else {
                name.to_string()
            };
            new_source.insert_str(insert_pos, &patch);
            return Ok(new_source);
        }
    }

    let statement = format!("use {};", wanted);
    match top_level_uses(&file).last() {
        Some(last_use) => {
            let insert_pos: usize = last_use.syntax().text_range().end().into();
            new_source.insert_str(insert_pos, &format!("\n{}", statement));
        }
        None => {
            let insert_pos: usize = file
                .items()
                .next()
                .map(|item| item.syntax().text_range().start().into())
                .unwrap_or(source.len());
            new_source.insert_str(insert_pos, &format!("{}\n\n", statement));
        }
    }

    Ok(new_source)
}

/// Every path brought into scope by top-level `use` items, groups expanded.
///
/// `use a::{b, c::*};` -> `["a::b", "a::c::*"]`. A rename that changes the
/// bound name is kept in the entry: `use a::b as c;` -> `["a::b as c"]`.
pub fn imported_paths(file: &SourceFile) -> Vec<String> {
    let mut paths = Vec::new();
    for u in top_level_uses(file) {
        if let Some(tree) = u.use_tree() {
            flatten_use_tree(&tree, "", &mut paths);
        }
    }
    paths
}

fn top_level_uses(file: &SourceFile) -> impl Iterator<Item = ast::Use> {
    file.items().filter_map(|item| match item {
        ast::Item::Use(u) => Some(u),
        _ => None,
    })
}

fn flatten_use_tree(tree: &ast::UseTree, prefix: &str, out: &mut Vec<String>) {
    let own = tree
        .path()
        .map(|p| compact(&p.syntax().text().to_string()))
        .unwrap_or_default();
    let full = match (prefix.is_empty(), own.is_empty()) {
        (true, _) => own,
        (false, true) => prefix.to_string(),
        (false, false) if own == "self" => prefix.to_string(),
        (false, false) => format!("{}::{}", prefix, own),
    };

    if let Some(list) = tree.use_tree_list() {
        for child in list.use_trees() {
            flatten_use_tree(&child, &full, out);
        }
    } else if tree.star_token().is_some() {
        out.push(if full.is_empty() {
            "*".to_string()
        } else {
            format!("{}::*", full)
        });
    } else {
        match tree.rename().map(|r| alias_name(&r)) {
            Some(alias) if !full.ends_with(&format!("::{}", alias)) && full != alias => {
                out.push(format!("{} as {}", full, alias));
            }
            _ => out.push(full),
        }
    }
}

fn alias_name(rename: &ast::Rename) -> String {
    rename
        .name()
        .map(|n| n.text().to_string())
        .unwrap_or_else(|| "_".to_string())
}

fn compact(path: &str) -> String {
    path.chars().filter(|c| !c.is_whitespace()).collect()
}
