use serde::Serialize;
use std::collections::BTreeMap;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct Container {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Pod {
    pub containers: Vec<Container>,
    #[serde(rename = "initContainers", skip_serializing_if = "Option::is_none")]
    pub init_containers: Option<Vec<Container>>,
}

impl Pod {
    /// Serializes `self`, rejecting values that break proplist invariants.
    pub fn to_json(&self) -> Result<Value, String> {
        // proplist guard: containers non-empty
        if self.containers.is_empty() {
            return Err(format!(
                "{:?}.containers is empty which is probably a mistake. Make the field optional if an empty list is intended.",
                self
            ));
        }
        // proplist guard: containers unique name
        let mut counts_containers: BTreeMap<String, usize> = BTreeMap::new();
        for elmt in self.containers.iter() {
            let key = serde_json::to_value(&elmt.name).map_err(|e| e.to_string())?;
            *counts_containers.entry(key.to_string()).or_insert(0) += 1;
        }
        let dup_containers: Vec<String> = counts_containers
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(k, _)| k)
            .collect();
        if !dup_containers.is_empty() {
            return Err(format!(
                "{:?}.containers contains duplicated objects: [{}]",
                self,
                dup_containers.join(", ")
            ));
        }
        // proplist guard: init_containers unique name
        let mut counts_init_containers: BTreeMap<String, usize> = BTreeMap::new();
        for elmt in self.init_containers.iter().flatten() {
            let key = serde_json::to_value(&elmt.name).map_err(|e| e.to_string())?;
            *counts_init_containers.entry(key.to_string()).or_insert(0) += 1;
        }
        let dup_init_containers: Vec<String> = counts_init_containers
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(k, _)| k)
            .collect();
        if !dup_init_containers.is_empty() {
            return Err(format!(
                "{:?}.init_containers contains duplicated objects: [{}]",
                self,
                dup_init_containers.join(", ")
            ));
        }
        serde_json::to_value(self).map_err(|e| e.to_string())
    }

    /// Returns the element of `containers` whose `name` equals the given value.
    pub fn get_containers_by_name(&self, name: impl Into<Value>) -> Result<&Container, String> {
        let name = name.into();
        for elmt in self.containers.iter() {
            if serde_json::to_value(&elmt.name).ok().as_ref() == Some(&name) {
                return Ok(elmt);
            }
        }
        Err(format!("No element with name={}", name))
    }

    /// Whether `containers` holds an element whose `name` equals the given value.
    pub fn has_containers_with_name(&self, name: impl Into<Value>) -> bool {
        let name = name.into();
        self.containers.iter().any(|elmt| serde_json::to_value(&elmt.name).ok().as_ref() == Some(&name))
    }

    /// Returns the element of `init_containers` whose `name` equals the given value.
    pub fn get_init_containers_by_name(&self, name: impl Into<Value>) -> Result<&Container, String> {
        let name = name.into();
        for elmt in self.init_containers.iter().flatten() {
            if serde_json::to_value(&elmt.name).ok().as_ref() == Some(&name) {
                return Ok(elmt);
            }
        }
        Err(format!("No element with name={}", name))
    }

    /// Whether `init_containers` holds an element whose `name` equals the given value.
    pub fn has_init_containers_with_name(&self, name: impl Into<Value>) -> bool {
        let name = name.into();
        self.init_containers.iter().flatten().any(|elmt| serde_json::to_value(&elmt.name).ok().as_ref() == Some(&name))
    }
}
