#![deny(missing_docs)]

//! # Namespace Remapping
//!
//! Retargets a schema document from its upstream namespace (e.g. `io.k8s`)
//! to the generated package root (e.g. `k8sgencfg.v1_29`) before the base
//! generator sees it. Both object keys (definition names) and string values
//! (`$ref` targets, descriptions) are rewritten.

use serde_json::{Map, Value};

/// Rewrites every key and string value containing `<legacy>.` so that the
/// prefix reads `<target>.` instead.
///
/// The document is consumed and rebuilt; key order is preserved. Strings and
/// keys without the prefix come back unchanged.
pub fn remap_namespace(doc: Value, legacy: &str, target: &str) -> Value {
    let remap = NamespaceRemap {
        needle: format!("{}.", legacy),
        replacement: format!("{}.", target),
    };
    remap.value(doc)
}

struct NamespaceRemap {
    needle: String,
    replacement: String,
}

impl NamespaceRemap {
    fn value(&self, value: Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.object(map)),
            Value::Array(items) => Value::Array(items.into_iter().map(|v| self.value(v)).collect()),
            Value::String(s) => Value::String(self.text(s)),
            other => other,
        }
    }

    fn object(&self, map: Map<String, Value>) -> Map<String, Value> {
        map.into_iter()
            .map(|(k, v)| (self.text(k), self.value(v)))
            .collect()
    }

    fn text(&self, s: String) -> String {
        if s.contains(&self.needle) {
            s.replace(&self.needle, &self.replacement)
        } else {
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contains_prefix(value: &Value, prefix: &str) -> bool {
        match value {
            Value::Object(map) => map
                .iter()
                .any(|(k, v)| k.contains(prefix) || contains_prefix(v, prefix)),
            Value::Array(items) => items.iter().any(|v| contains_prefix(v, prefix)),
            Value::String(s) => s.contains(prefix),
            _ => false,
        }
    }

    #[test]
    fn test_remaps_keys_and_refs() {
        let doc = json!({
            "definitions": {
                "io.k8s.api.core.v1.Pod": {
                    "properties": {
                        "spec": { "$ref": "#/definitions/io.k8s.api.core.v1.PodSpec" }
                    }
                }
            }
        });

        let out = remap_namespace(doc, "io.k8s", "k8sgencfg.v1_29");

        let pod = &out["definitions"]["k8sgencfg.v1_29.api.core.v1.Pod"];
        assert_eq!(
            pod["properties"]["spec"]["$ref"],
            "#/definitions/k8sgencfg.v1_29.api.core.v1.PodSpec"
        );
        assert!(out["definitions"].get("io.k8s.api.core.v1.Pod").is_none());
    }

    #[test]
    fn test_no_legacy_prefix_survives() {
        let doc = json!({
            "definitions": {
                "io.k8s.a.A": {
                    "allOf": [{ "$ref": "#/definitions/io.k8s.b.B" }],
                    "x-names": ["io.k8s.c.C", 3, null],
                    "nested": { "deeper": { "io.k8s.d.D": "io.k8s.e.E" } }
                }
            }
        });

        let out = remap_namespace(doc, "io.k8s", "pkg.v1");
        assert!(!contains_prefix(&out, "io.k8s."));
        assert_eq!(out["definitions"]["pkg.v1.a.A"]["x-names"][1], 3);
    }

    #[test]
    fn test_untouched_values_are_identical() {
        let doc = json!({
            "info": { "title": "Kubernetes", "version": "v1.29.0" },
            "io.k8sish": "io.k8s without dot",
            "count": 7,
            "flag": true
        });

        let out = remap_namespace(doc.clone(), "io.k8s", "pkg.v1");
        assert_eq!(out, doc);
    }

    #[test]
    fn test_key_order_preserved() {
        let doc = json!({ "z": 1, "io.k8s.m": 2, "a": 3 });
        let out = remap_namespace(doc, "io.k8s", "pkg");
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "pkg.m", "a"]);
    }
}
