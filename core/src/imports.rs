#![deny(missing_docs)]

//! # Import Normalization
//!
//! The base generator links modules with relative `use super::..` paths.
//! Once the tree is placed inside a crate those are rewritten to absolute
//! `crate::..` paths, and every directory on the way down from the output
//! root gets a `mod.rs` declaring its children so the modules are reachable.

use crate::error::{AppError, AppResult};
use crate::patcher::common::parse_source;
use ra_ap_syntax::ast::{self, HasModuleItem, HasName};
use ra_ap_syntax::{AstNode, TextRange};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File names that never become child module declarations.
const NON_MODULE_FILES: &[&str] = &["mod", "lib", "main"];

/// Ensures a `mod.rs` declaring all child modules exists in `dest`, in every
/// directory below it, and in every ancestor of `dest` up to (not including)
/// `root`.
///
/// Returns the number of `mod.rs` files created or extended.
pub fn ensure_package_markers(root: &Path, dest: &Path) -> AppResult<usize> {
    if dest == root || !dest.starts_with(root) {
        return Err(AppError::General(format!(
            "Package directory {:?} is not inside output root {:?}",
            dest, root
        )));
    }

    // Deepest first, so a parent sees the mod.rs of each child directory
    let mut dirs: Vec<PathBuf> = WalkDir::new(dest)
        .contents_first(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect();

    let mut current = dest.parent();
    while let Some(dir) = current {
        if dir == root {
            break;
        }
        dirs.push(dir.to_path_buf());
        current = dir.parent();
    }

    let mut touched = 0;
    for dir in dirs {
        if write_package_marker(&dir)? {
            touched += 1;
        }
    }
    tracing::debug!(dest = ?dest, touched, "package markers in place");
    Ok(touched)
}

/// Creates or extends `<dir>/mod.rs`. Returns whether the file changed.
fn write_package_marker(dir: &Path) -> AppResult<bool> {
    let children = child_modules(dir)?;
    let marker = dir.join("mod.rs");

    let existing = if marker.exists() {
        fs::read_to_string(&marker)?
    } else {
        String::new()
    };
    let updated = declare_modules(&existing, &children);

    if marker.exists() && updated == existing {
        return Ok(false);
    }
    fs::write(&marker, updated)
        .map_err(|e| AppError::General(format!("Failed to write file {:?}: {}", marker, e)))?;
    Ok(true)
}

/// Names of the modules a directory contributes: `*.rs` files (other than
/// `mod.rs`/`lib.rs`/`main.rs`) and subdirectories holding a `mod.rs`.
fn child_modules(dir: &Path) -> AppResult<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let name = if path.is_dir() {
            if !path.join("mod.rs").exists() {
                continue;
            }
            path.file_name().and_then(|n| n.to_str())
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            path.file_stem().and_then(|n| n.to_str())
        } else {
            None
        };

        if let Some(name) = name {
            if !NON_MODULE_FILES.contains(&name) {
                names.insert(name.to_string());
            }
        }
    }
    Ok(names)
}

/// Adds a `pub mod <name>;` for every child the source does not declare yet.
///
/// New declarations go after the last existing `mod` item, or at the end.
pub fn declare_modules(source: &str, children: &BTreeSet<String>) -> String {
    let file = parse_source(source);
    let modules: Vec<ast::Module> = file
        .items()
        .filter_map(|item| match item {
            ast::Item::Module(m) => Some(m),
            _ => None,
        })
        .collect();
    let declared: BTreeSet<String> = modules
        .iter()
        .filter_map(|m| m.name())
        .map(|n| n.text().to_string())
        .collect();

    let missing: Vec<String> = children
        .iter()
        .filter(|c| !declared.contains(*c))
        .map(|c| format!("pub mod {};", c))
        .collect();
    if missing.is_empty() {
        return source.to_string();
    }

    let mut new_source = source.to_string();
    match modules.last() {
        Some(last) => {
            let insert_pos: usize = last.syntax().text_range().end().into();
            new_source.insert_str(insert_pos, &format!("\n{}", missing.join("\n")));
        }
        None => {
            if !new_source.is_empty() && !new_source.ends_with('\n') {
                new_source.push('\n');
            }
            new_source.push_str(&missing.join("\n"));
            new_source.push('\n');
        }
    }
    new_source
}

/// Module path components of a source file relative to the output root.
///
/// `root/a/b/c.rs` -> `[a, b, c]`; `root/a/b/mod.rs` -> `[a, b]`
pub fn module_components(root: &Path, file: &Path) -> AppResult<Vec<String>> {
    let rel = file.strip_prefix(root).map_err(|_| {
        AppError::InvalidImport(format!("{:?} is not inside output root {:?}", file, root))
    })?;

    let mut components = Vec::new();
    if let Some(parent) = rel.parent() {
        for part in parent.components() {
            let part = part.as_os_str().to_str().ok_or_else(|| {
                AppError::InvalidImport(format!("Non UTF-8 path component in {:?}", file))
            })?;
            components.push(part.to_string());
        }
    }

    let stem = rel
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| AppError::InvalidImport(format!("Invalid module file name {:?}", file)))?;
    if stem != "mod" {
        components.push(stem.to_string());
    }
    Ok(components)
}

/// Rewrites top-level `use` paths starting with `super`/`self` so they are
/// anchored at `crate::`, given the module's own path components.
///
/// A path with N leading `super` segments drops the last N components of the
/// module path; `self` drops none. Sources without relative paths come back
/// unchanged.
pub fn absolutize_use_paths(source: &str, components: &[String]) -> AppResult<String> {
    let file = parse_source(source);
    let mut edits: Vec<(TextRange, String)> = Vec::new();

    for item in file.items() {
        if let ast::Item::Use(u) = item {
            if let Some(tree) = u.use_tree() {
                collect_relative_paths(&tree, components, &mut edits)?;
            }
        }
    }

    if edits.is_empty() {
        return Ok(source.to_string());
    }

    edits.sort_by_key(|(range, _)| std::cmp::Reverse(range.start()));
    let mut new_source = source.to_string();
    for (range, text) in edits {
        let start: usize = range.start().into();
        let end: usize = range.end().into();
        new_source.replace_range(start..end, &text);
    }
    Ok(new_source)
}

/// Only the outermost path of a use tree can be relative; nested `self`
/// inside a group refers to the group prefix and is left alone.
fn collect_relative_paths(
    tree: &ast::UseTree,
    components: &[String],
    edits: &mut Vec<(TextRange, String)>,
) -> AppResult<()> {
    match tree.path() {
        Some(path) => {
            if let Some(absolute) = absolute_path(&path, components)? {
                edits.push((path.syntax().text_range(), absolute));
            }
        }
        None => {
            if let Some(list) = tree.use_tree_list() {
                for child in list.use_trees() {
                    collect_relative_paths(&child, components, edits)?;
                }
            }
        }
    }
    Ok(())
}

fn absolute_path(path: &ast::Path, components: &[String]) -> AppResult<Option<String>> {
    let segments = path_segments(path);

    let level = segments.iter().take_while(|s| *s == "super").count();
    let consumed = match (level, segments.first().map(String::as_str)) {
        (0, Some("self")) => 1,
        (0, _) => return Ok(None),
        (n, _) => n,
    };

    if level > components.len() {
        return Err(AppError::InvalidImport(format!(
            "`{}` climbs {} levels above module `{}`",
            segments.join("::"),
            level,
            components.join("::")
        )));
    }

    let absolute: Vec<&str> = std::iter::once("crate")
        .chain(components[..components.len() - level].iter().map(String::as_str))
        .chain(segments[consumed..].iter().map(String::as_str))
        .collect();
    Ok(Some(absolute.join("::")))
}

fn path_segments(path: &ast::Path) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = Some(path.clone());
    while let Some(p) = current {
        if let Some(segment) = p.segment() {
            segments.push(segment.syntax().text().to_string());
        }
        current = p.qualifier();
    }
    segments.reverse();
    segments
}

/// Rewrites relative `use` paths in every `.rs` file below `dest`.
///
/// Returns the number of files rewritten.
pub fn make_imports_absolute(root: &Path, dest: &Path) -> AppResult<usize> {
    let mut rewritten = 0;

    for entry in WalkDir::new(dest).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || !path.extension().is_some_and(|ext| ext == "rs") {
            continue;
        }

        let components = module_components(root, path)?;
        let content = fs::read_to_string(path)?;
        let new_content =
            absolutize_use_paths(&content, &components).map_err(|e| e.in_file(path))?;

        if new_content != content {
            fs::write(path, new_content)
                .map_err(|e| AppError::General(format!("Failed to write file {:?}: {}", path, e)))?;
            tracing::debug!(path = ?path, "imports made absolute");
            rewritten += 1;
        }
    }

    tracing::info!(dest = ?dest, rewritten, "import normalization finished");
    Ok(rewritten)
}
