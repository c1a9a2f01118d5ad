use crate::codegen::{
    lookup_method_name, membership_method_name, non_empty_marker, render_lookup_method,
    render_membership_method, render_non_empty_guard, render_unique_guard, unique_marker,
};
use crate::config::GenConfig;
use crate::error::{AppError, AppResult};
use crate::naming::field_ident;
use crate::patcher::common::{find_record_field, find_struct, parse_source};
use crate::patcher::files::ensure_import;
use crate::patcher::impls::{add_method, ensure_hook, insert_before_tail};
use crate::scanner::ProplistField;
use crate::shape::{classify_list_type, ListShape};
use ra_ap_syntax::ast::HasName;
use ra_ap_syntax::AstNode;
use std::fs;
use std::path::Path;

/// Everything needed to patch one proplist field of one struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchInstruction {
    /// Struct owning the field.
    pub class_name: String,
    /// Field identifier as declared in the struct.
    pub field_ident: String,
    /// Identifier of the merge-key field on the element type.
    pub key_ident: String,
    /// Declared shape of the field, with its element type.
    pub shape: ListShape,
}

/// Locates the struct and field of a proplist in generated source and
/// classifies the field's declared type.
pub fn plan_instruction(source: &str, field: &ProplistField) -> AppResult<PatchInstruction> {
    let file = parse_source(source);

    let struct_def = find_struct(&file, &field.class_name).map_err(|_| {
        AppError::NotFound(format!(
            "Couldn't find struct {} in module {}",
            field.class_name, field.module_name
        ))
    })?;
    let record = find_record_field(&struct_def, &field.field_name).map_err(|_| {
        AppError::NotFound(format!(
            "Couldn't find field {} in struct {}",
            field.field_name, field.class_name
        ))
    })?;

    let ident = record
        .name()
        .map(|n| n.text().to_string())
        .ok_or_else(|| AppError::General(format!("Field '{}' has no name", field.field_name)))?;
    let ty = record.ty().ok_or_else(|| {
        AppError::UnsupportedShape(format!(
            "{}.{} has no type annotation",
            field.class_name, field.field_name
        ))
    })?;
    let shape = classify_list_type(&ty).ok_or_else(|| {
        AppError::UnsupportedShape(format!(
            "{}.{} is declared as `{}`; expected `Vec<T>` or `Option<Vec<T>>`",
            field.class_name,
            field.field_name,
            ty.syntax().text()
        ))
    })?;

    Ok(PatchInstruction {
        class_name: field.class_name.clone(),
        field_ident: ident,
        key_ident: field_ident(&field.merge_key),
        shape,
    })
}

/// Applies one proplist to a module's source: hook, imports, guards, accessors.
///
/// Every step checks for a previous application first, so patching an
/// already-patched source returns it unchanged.
pub fn apply_proplist(source: &str, field: &ProplistField, config: &GenConfig) -> AppResult<String> {
    let instr = plan_instruction(source, field)?;
    let class = instr.class_name.as_str();
    let hook = config.hook_name.as_str();

    let mut code = ensure_hook(source, class, hook)?;
    code = ensure_import(&code, "std::collections", "BTreeMap")?;
    code = ensure_import(&code, "serde_json", "Value")?;

    if instr.shape.is_required() {
        code = insert_before_tail(
            &code,
            class,
            hook,
            &non_empty_marker(&instr.field_ident),
            &render_non_empty_guard(&instr.field_ident),
        )?;
    }
    code = insert_before_tail(
        &code,
        class,
        hook,
        &unique_marker(&instr.field_ident, &instr.key_ident),
        &render_unique_guard(&instr.field_ident, &instr.key_ident, &instr.shape),
    )?;

    code = add_method(
        &code,
        class,
        &lookup_method_name(&instr.field_ident, &instr.key_ident),
        &render_lookup_method(&instr.field_ident, &instr.key_ident, &instr.shape),
    )?;
    code = add_method(
        &code,
        class,
        &membership_method_name(&instr.field_ident, &instr.key_ident),
        &render_membership_method(&instr.field_ident, &instr.key_ident, &instr.shape),
    )?;

    Ok(code)
}

/// Reads, patches and rewrites the module owning one proplist field.
///
/// Returns whether the file content changed.
pub fn patch_module_file(root: &Path, field: &ProplistField, config: &GenConfig) -> AppResult<bool> {
    let path = root.join(&field.module_path);
    let content = fs::read_to_string(&path).map_err(|e| {
        AppError::NotFound(format!(
            "Module file {:?} for {} could not be read: {}",
            path, field.type_name, e
        ))
    })?;

    let new_content = apply_proplist(&content, field, config).map_err(|e| e.in_file(&path))?;

    if new_content == content {
        tracing::debug!(path = ?path, class = %field.class_name, field = %field.field_name, "already patched");
        return Ok(false);
    }

    fs::write(&path, new_content)
        .map_err(|e| AppError::General(format!("Failed to write file {:?}: {}", path, e)))?;
    tracing::debug!(path = ?path, class = %field.class_name, field = %field.field_name, "patched proplist");
    Ok(true)
}

/// Patches every scanned proplist, one read-modify-write cycle per field.
///
/// Returns the number of cycles that changed a file.
pub fn patch_proplists(
    root: &Path,
    fields: &[ProplistField],
    config: &GenConfig,
) -> AppResult<usize> {
    let mut changed = 0;
    for field in fields {
        if patch_module_file(root, field, config)? {
            changed += 1;
        }
    }
    tracing::info!(fields = fields.len(), changed, "proplist patching finished");
    Ok(changed)
}
