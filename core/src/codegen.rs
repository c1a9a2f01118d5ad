#![deny(missing_docs)]

//! # Code Generation
//!
//! Source templates for everything the patch engine splices into generated
//! structs: the serialization hook, the proplist guards and the accessors.
//!
//! Templates are rendered without base indentation; the patcher indents them
//! to match the surrounding code. Field and key arguments are the Rust
//! identifiers as they appear in the struct (raw `r#` prefixes included).

use crate::naming::bare_ident;
use crate::shape::ListShape;

/// Marker comment opening the non-empty guard of a field.
pub fn non_empty_marker(field: &str) -> String {
    format!("// proplist guard: {} non-empty", bare_ident(field))
}

/// Marker comment opening the duplicate-key guard of a field.
pub fn unique_marker(field: &str, key: &str) -> String {
    format!(
        "// proplist guard: {} unique {}",
        bare_ident(field),
        bare_ident(key)
    )
}

/// Name of the lookup accessor: `get_<field>_by_<key>`.
pub fn lookup_method_name(field: &str, key: &str) -> String {
    format!("get_{}_by_{}", bare_ident(field), bare_ident(key))
}

/// Name of the membership accessor: `has_<field>_with_<key>`.
pub fn membership_method_name(field: &str, key: &str) -> String {
    format!("has_{}_with_{}", bare_ident(field), bare_ident(key))
}

/// The serialization hook, delegating to the `Serialize` impl.
pub fn render_hook(hook_name: &str) -> String {
    format!(
        r#"/// Serializes `self`, rejecting values that break proplist invariants.
pub fn {hook_name}(&self) -> Result<Value, String> {{
    serde_json::to_value(self).map_err(|e| e.to_string())
}}"#
    )
}

/// Guard rejecting an empty required list.
pub fn render_non_empty_guard(field: &str) -> String {
    let marker = non_empty_marker(field);
    let label = bare_ident(field);
    format!(
        r#"{marker}
if self.{field}.is_empty() {{
    return Err(format!(
        "{{:?}}.{label} is empty which is probably a mistake. Make the field optional if an empty list is intended.",
        self
    ));
}}"#
    )
}

/// Guard rejecting lists in which two elements share a merge-key value.
pub fn render_unique_guard(field: &str, key: &str, shape: &ListShape) -> String {
    let marker = unique_marker(field, key);
    let label = bare_ident(field);
    let iter = shape.iter_expr(field);
    format!(
        r#"{marker}
let mut counts_{label}: BTreeMap<String, usize> = BTreeMap::new();
for elmt in {iter} {{
    let key = serde_json::to_value(&elmt.{key}).map_err(|e| e.to_string())?;
    *counts_{label}.entry(key.to_string()).or_insert(0) += 1;
}}
let dup_{label}: Vec<String> = counts_{label}
    .into_iter()
    .filter(|(_, n)| *n > 1)
    .map(|(k, _)| k)
    .collect();
if !dup_{label}.is_empty() {{
    return Err(format!(
        "{{:?}}.{label} contains duplicated objects: [{{}}]",
        self,
        dup_{label}.join(", ")
    ));
}}"#
    )
}

/// Accessor returning the element whose merge key equals the argument.
pub fn render_lookup_method(field: &str, key: &str, shape: &ListShape) -> String {
    let name = lookup_method_name(field, key);
    let item = shape.item_type();
    let iter = shape.iter_expr(field);
    let label = bare_ident(key);
    format!(
        r#"/// Returns the element of `{field_label}` whose `{label}` equals the given value.
pub fn {name}(&self, {key}: impl Into<Value>) -> Result<&{item}, String> {{
    let {key} = {key}.into();
    for elmt in {iter} {{
        if serde_json::to_value(&elmt.{key}).ok().as_ref() == Some(&{key}) {{
            return Ok(elmt);
        }}
    }}
    Err(format!("No element with {label}={{}}", {key}))
}}"#,
        field_label = bare_ident(field),
    )
}

/// Accessor testing whether an element with the given merge key exists.
pub fn render_membership_method(field: &str, key: &str, shape: &ListShape) -> String {
    let name = membership_method_name(field, key);
    let iter = shape.iter_expr(field);
    format!(
        r#"/// Whether `{field_label}` holds an element whose `{label}` equals the given value.
pub fn {name}(&self, {key}: impl Into<Value>) -> bool {{
    let {key} = {key}.into();
    {iter}.any(|elmt| serde_json::to_value(&elmt.{key}).ok().as_ref() == Some(&{key}))
}}"#,
        field_label = bare_ident(field),
        label = bare_ident(key),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_method_names_drop_raw_prefix() {
        assert_eq!(lookup_method_name("conditions", "r#type"), "get_conditions_by_type");
        assert_eq!(
            membership_method_name("volume_mounts", "mount_path"),
            "has_volume_mounts_with_mount_path"
        );
    }

    #[test]
    fn test_render_hook() {
        let expected = r#"/// Serializes `self`, rejecting values that break proplist invariants.
pub fn to_json(&self) -> Result<Value, String> {
    serde_json::to_value(self).map_err(|e| e.to_string())
}"#;
        assert_eq!(render_hook("to_json"), expected);
    }

    #[test]
    fn test_non_empty_guard() {
        let guard = render_non_empty_guard("containers");
        assert!(guard.starts_with("// proplist guard: containers non-empty\n"));
        assert!(guard.contains("if self.containers.is_empty() {"));
        assert!(guard.contains("\"{:?}.containers is empty which is probably a mistake."));
    }

    #[test]
    fn test_unique_guard_optional_iterates_flattened() {
        let shape = ListShape::Optional("ContainerPort".into());
        let guard = render_unique_guard("ports", "container_port", &shape);
        assert!(guard.starts_with("// proplist guard: ports unique container_port\n"));
        assert!(guard.contains("for elmt in self.ports.iter().flatten() {"));
        assert!(guard.contains("serde_json::to_value(&elmt.container_port)"));
        assert!(guard.contains("\"{:?}.ports contains duplicated objects: [{}]\","));
    }

    #[test]
    fn test_lookup_method() {
        let shape = ListShape::Required("Container".into());
        let method = render_lookup_method("containers", "name", &shape);
        assert!(method.contains(
            "pub fn get_containers_by_name(&self, name: impl Into<Value>) -> Result<&Container, String> {"
        ));
        assert!(method.contains("for elmt in self.containers.iter() {"));
        assert!(method.contains("Err(format!(\"No element with name={}\", name))"));
    }

    #[test]
    fn test_membership_method_with_raw_key() {
        let shape = ListShape::Optional("PodCondition".into());
        let method = render_membership_method("conditions", "r#type", &shape);
        assert!(method
            .contains("pub fn has_conditions_with_type(&self, r#type: impl Into<Value>) -> bool {"));
        assert!(method.contains("self.conditions.iter().flatten().any(|elmt|"));
    }
}
