use crate::codegen::render_hook;
use crate::error::{AppError, AppResult};
use crate::patcher::common::{
    find_inherent_impl, find_inherent_method, find_struct, indent_tail_lines, line_indent,
    parse_source,
};
use ra_ap_syntax::{AstNode, SyntaxKind};

/// Appends an empty `impl <Type> {}` directly after the struct unless an
/// inherent impl block already exists.
pub fn ensure_inherent_impl(source: &str, struct_name: &str) -> AppResult<String> {
    let file = parse_source(source);
    if find_inherent_impl(&file, struct_name).is_some() {
        return Ok(source.to_string());
    }

    let struct_def = find_struct(&file, struct_name)?;
    let indent = line_indent(struct_def.syntax()).unwrap_or_default();
    let insert_pos: usize = struct_def.syntax().text_range().end().into();

    let mut new_source = source.to_string();
    new_source.insert_str(
        insert_pos,
        &format!("\n\n{}impl {} {{\n{}}}", indent, struct_name, indent),
    );
    Ok(new_source)
}

/// Makes sure the type has the serialization hook, synthesizing it if needed.
pub fn ensure_hook(source: &str, struct_name: &str, hook_name: &str) -> AppResult<String> {
    let with_impl = ensure_inherent_impl(source, struct_name)?;
    add_method(&with_impl, struct_name, hook_name, &render_hook(hook_name))
}

/// Appends a method to the type's first inherent impl block unless any
/// inherent impl of the type already declares a method with that name.
///
/// `method_text` is rendered without base indentation.
pub fn add_method(
    source: &str,
    struct_name: &str,
    method_name: &str,
    method_text: &str,
) -> AppResult<String> {
    let file = parse_source(source);
    if find_inherent_method(&file, struct_name, method_name).is_some() {
        return Ok(source.to_string());
    }

    let impl_def = find_inherent_impl(&file, struct_name).ok_or_else(|| {
        AppError::NotFound(format!("No inherent impl block for '{}'", struct_name))
    })?;

    let item_list = impl_def.assoc_item_list().ok_or_else(|| {
        AppError::General(format!("Impl block of '{}' has no body", struct_name))
    })?;
    let r_curly = item_list
        .r_curly_token()
        .ok_or_else(|| AppError::General("Invalid impl syntax: missing '}'".into()))?;

    let impl_indent = line_indent(impl_def.syntax()).unwrap_or_default();
    let indent = format!("{}    ", impl_indent);
    let body = format!("{}{}", indent, indent_tail_lines(method_text, &indent));
    let is_empty = item_list.assoc_items().next().is_none();

    let mut insert_pos: usize = r_curly.text_range().start().into();
    let patch = match r_curly.prev_token() {
        // Keep the whitespace that puts `}` on its own line after the new method
        Some(prev) if prev.kind() == SyntaxKind::WHITESPACE && prev.text().contains('\n') => {
            insert_pos = prev.text_range().start().into();
            if is_empty {
                format!("\n{}", body)
            } else {
                format!("\n\n{}", body)
            }
        }
        _ => format!("\n{}\n{}", body, impl_indent),
    };

    let mut new_source = source.to_string();
    new_source.insert_str(insert_pos, &patch);
    Ok(new_source)
}

/// Inserts statements ahead of the final expression/statement of a method.
///
/// `statements` must begin with `marker`, a line comment; if the method body
/// already contains that comment the source is returned unchanged.
pub fn insert_before_tail(
    source: &str,
    struct_name: &str,
    method_name: &str,
    marker: &str,
    statements: &str,
) -> AppResult<String> {
    let file = parse_source(source);
    let (_, method) = find_inherent_method(&file, struct_name, method_name).ok_or_else(|| {
        AppError::NotFound(format!(
            "Method '{}' not found on '{}'",
            method_name, struct_name
        ))
    })?;
    let stmt_list = method
        .body()
        .and_then(|b| b.stmt_list())
        .ok_or_else(|| {
            AppError::General(format!(
                "Method '{}::{}' has no body",
                struct_name, method_name
            ))
        })?;

    let already_present = stmt_list
        .syntax()
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind() == SyntaxKind::COMMENT && t.text().trim() == marker);
    if already_present {
        return Ok(source.to_string());
    }

    let anchor = stmt_list
        .tail_expr()
        .map(|e| e.syntax().clone())
        .or_else(|| stmt_list.statements().last().map(|s| s.syntax().clone()))
        .ok_or_else(|| {
            AppError::General(format!(
                "Method '{}::{}' has no final statement to insert before",
                struct_name, method_name
            ))
        })?;

    let insert_pos: usize = anchor.text_range().start().into();
    let patch = match line_indent(&anchor) {
        Some(indent) => format!("{}\n{}", indent_tail_lines(statements, &indent), indent),
        None => {
            let method_indent = line_indent(method.syntax()).unwrap_or_default();
            let indent = format!("{}    ", method_indent);
            format!(
                "\n{}{}\n{}",
                indent,
                indent_tail_lines(statements, &indent),
                indent
            )
        }
    };

    let mut new_source = source.to_string();
    new_source.insert_str(insert_pos, &patch);
    Ok(new_source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_impl_created_after_struct() {
        let code = "pub struct Pod {\n    pub a: i32,\n}\n\npub struct Other;\n";
        let res = ensure_inherent_impl(code, "Pod").unwrap();
        assert_eq!(
            res,
            "pub struct Pod {\n    pub a: i32,\n}\n\nimpl Pod {\n}\n\npub struct Other;\n"
        );
        assert_eq!(ensure_inherent_impl(&res, "Pod").unwrap(), res);
    }

    #[test]
    fn test_impl_for_missing_struct() {
        assert!(matches!(
            ensure_inherent_impl("struct A;", "Pod").unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn test_ensure_hook_synthesizes_delegating_method() {
        let code = "pub struct Pod {\n    pub a: i32,\n}\n";
        let res = ensure_hook(code, "Pod", "to_json").unwrap();
        let expected = r#"pub struct Pod {
    pub a: i32,
}

impl Pod {
    /// Serializes `self`, rejecting values that break proplist invariants.
    pub fn to_json(&self) -> Result<Value, String> {
        serde_json::to_value(self).map_err(|e| e.to_string())
    }
}
"#;
        assert_eq!(res, expected);
        assert_eq!(ensure_hook(&res, "Pod", "to_json").unwrap(), res);
    }

    #[test]
    fn test_existing_hook_kept() {
        let code = "struct Pod;\nimpl Pod {\n    pub fn to_json(&self) -> Result<Value, String> {\n        todo!()\n    }\n}\n";
        assert_eq!(ensure_hook(code, "Pod", "to_json").unwrap(), code);
    }

    #[test]
    fn test_hook_in_later_impl_block_is_reused() {
        let code = r#"pub struct Pod {
    pub containers: Vec<Container>,
}

impl Pod {
    pub fn new() -> Self {
        Pod { containers: Vec::new() }
    }
}

impl Pod {
    pub fn to_json(&self) -> Result<Value, String> {
        serde_json::to_value(self).map_err(|e| e.to_string())
    }
}
"#;
        let res = ensure_hook(code, "Pod", "to_json").unwrap();
        assert_eq!(res, code);

        let res = insert_before_tail(&res, "Pod", "to_json", "// m", "// m\ncheck();").unwrap();
        assert_eq!(res.matches("fn to_json(").count(), 1);
        let guard = res.find("// m").unwrap();
        assert!(guard > res.find("pub fn to_json(").unwrap());
        assert!(guard > res.find("pub fn new(").unwrap());

        // A method living in the second block is not added to the first
        let again = add_method(&res, "Pod", "to_json", &render_hook("to_json")).unwrap();
        assert_eq!(again, res);
    }

    #[test]
    fn test_add_method_separates_with_blank_line() {
        let code = "struct A;\nimpl A {\n    fn a(&self) {}\n}\n";
        let res = add_method(code, "A", "b", "fn b(&self) {\n    todo!()\n}").unwrap();
        assert_eq!(
            res,
            "struct A;\nimpl A {\n    fn a(&self) {}\n\n    fn b(&self) {\n        todo!()\n    }\n}\n"
        );
    }

    #[test]
    fn test_add_method_into_single_line_impl() {
        let res = add_method("struct A;\nimpl A {}", "A", "b", "fn b(&self) {}").unwrap();
        assert_eq!(res, "struct A;\nimpl A {\n    fn b(&self) {}\n}");
    }

    #[test]
    fn test_insert_before_tail_expression() {
        let code = r#"impl Pod {
    fn to_json(&self) -> Result<Value, String> {
        serde_json::to_value(self).map_err(|e| e.to_string())
    }
}"#;
        let stmts = "// guard: x\nif self.x {\n    return Err(String::new());\n}";
        let res = insert_before_tail(code, "Pod", "to_json", "// guard: x", stmts).unwrap();
        let expected = r#"impl Pod {
    fn to_json(&self) -> Result<Value, String> {
        // guard: x
        if self.x {
            return Err(String::new());
        }
        serde_json::to_value(self).map_err(|e| e.to_string())
    }
}"#;
        assert_eq!(res, expected);
        assert_eq!(
            insert_before_tail(&res, "Pod", "to_json", "// guard: x", stmts).unwrap(),
            res
        );
    }

    #[test]
    fn test_insert_before_return_statement() {
        let code = "impl Pod {\n    fn to_json(&self) -> Result<Value, String> {\n        let v = 1;\n        return Ok(v.into());\n    }\n}";
        let res = insert_before_tail(code, "Pod", "to_json", "// m", "// m\ncheck();").unwrap();
        assert!(res.contains("let v = 1;\n        // m\n        check();\n        return Ok(v.into());"));
    }

    #[test]
    fn test_insert_into_empty_body_fails() {
        let code = "impl Pod {\n    fn to_json(&self) {}\n}";
        assert!(insert_before_tail(code, "Pod", "to_json", "// m", "// m").is_err());
    }

    #[test]
    fn test_insert_into_missing_method() {
        let code = "impl Pod {}";
        assert!(matches!(
            insert_before_tail(code, "Pod", "to_json", "// m", "// m").unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
