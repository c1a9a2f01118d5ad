use crate::error::{AppError, AppResult};
use crate::naming::field_ident;
use crate::patcher::attributes::serde_rename;
use ra_ap_edition::Edition;
use ra_ap_syntax::ast::{HasModuleItem, HasName};
use ra_ap_syntax::{ast, AstNode, SourceFile, SyntaxKind, SyntaxNode, SyntaxToken};

/// Parses a Rust module. Parse errors are tolerated, like rust-analyzer does.
pub(crate) fn parse_source(source: &str) -> SourceFile {
    SourceFile::parse(source, Edition::Edition2021).tree()
}

/// Finds a top-level struct definition by name in the source file.
pub(crate) fn find_struct(file: &SourceFile, name: &str) -> AppResult<ast::Struct> {
    file.items()
        .find_map(|item| match item {
            ast::Item::Struct(s) if s.name().is_some_and(|n| n.text() == name) => Some(s),
            _ => None,
        })
        .ok_or_else(|| AppError::NotFound(format!("Struct '{}' not found in source file", name)))
}

/// Finds the record field generated for a schema property.
///
/// Matches, in order: `#[serde(rename = "<schema_name>")]`, the snake_case
/// identifier of the property, the property name verbatim.
pub(crate) fn find_record_field(
    struct_def: &ast::Struct,
    schema_name: &str,
) -> AppResult<ast::RecordField> {
    let struct_name = struct_def
        .name()
        .map(|n| n.text().to_string())
        .unwrap_or_default();

    let fields: Vec<ast::RecordField> = match struct_def.field_list() {
        Some(ast::FieldList::RecordFieldList(l)) => l.fields().collect(),
        _ => {
            return Err(AppError::NotFound(format!(
                "Struct '{}' has no named fields (looking for '{}')",
                struct_name, schema_name
            )))
        }
    };

    let ident = field_ident(schema_name);
    let has_name = |f: &ast::RecordField, wanted: &str| f.name().is_some_and(|n| n.text() == wanted);

    fields
        .iter()
        .find(|f| serde_rename(f.syntax()).as_deref() == Some(schema_name))
        .or_else(|| fields.iter().find(|f| has_name(f, &ident)))
        .or_else(|| fields.iter().find(|f| has_name(f, schema_name)))
        .cloned()
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Field '{}' not found in struct '{}'",
                schema_name, struct_name
            ))
        })
}

/// Every inherent (non-trait) `impl` block of a type, in source order.
pub(crate) fn inherent_impls(file: &SourceFile, type_name: &str) -> Vec<ast::Impl> {
    file.items()
        .filter_map(|item| match item {
            ast::Item::Impl(i)
                if i.trait_().is_none()
                    && i.self_ty()
                        .is_some_and(|t| t.syntax().text().to_string() == type_name) =>
            {
                Some(i)
            }
            _ => None,
        })
        .collect()
}

/// Finds the first inherent (non-trait) `impl` block of a type.
pub(crate) fn find_inherent_impl(file: &SourceFile, type_name: &str) -> Option<ast::Impl> {
    inherent_impls(file, type_name).into_iter().next()
}

/// Finds a method across all inherent `impl` blocks of a type, together
/// with the block that declares it.
pub(crate) fn find_inherent_method(
    file: &SourceFile,
    type_name: &str,
    name: &str,
) -> Option<(ast::Impl, ast::Fn)> {
    inherent_impls(file, type_name)
        .into_iter()
        .find_map(|i| find_method(&i, name).map(|f| (i, f)))
}

/// Finds a method by name inside an `impl` block.
pub(crate) fn find_method(impl_def: &ast::Impl, name: &str) -> Option<ast::Fn> {
    impl_def.assoc_item_list()?.assoc_items().find_map(|item| match item {
        ast::AssocItem::Fn(f) if f.name().is_some_and(|n| n.text() == name) => Some(f),
        _ => None,
    })
}

/// Indentation of the line a node starts on, if the node starts a line.
pub(crate) fn line_indent(node: &SyntaxNode) -> Option<String> {
    let prev = node.first_token()?.prev_token()?;
    if prev.kind() != SyntaxKind::WHITESPACE {
        return None;
    }
    let text = prev.text();
    text.rfind('\n').map(|pos| text[pos + 1..].to_string())
}

/// Indents every line after the first by `indent`.
pub(crate) fn indent_tail_lines(block: &str, indent: &str) -> String {
    block
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Checks if a comma is needed before inserting a new element at the end of a list.
pub(crate) fn check_needs_comma(r_curly: &SyntaxToken) -> bool {
    let mut curr = r_curly.prev_token();
    while let Some(token) = curr {
        match token.kind() {
            SyntaxKind::WHITESPACE | SyntaxKind::COMMENT => {
                curr = token.prev_token();
            }
            SyntaxKind::L_CURLY | SyntaxKind::COMMA => {
                return false;
            }
            _ => {
                return true;
            }
        }
    }
    false
}
