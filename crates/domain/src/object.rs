//! Host objects — the persisted shape of channels and states.
//!
//! The host platform owns these objects. The bridge only owns a narrow slice
//! of each one (`common.name` and `native`); every other field (icon, role
//! overrides, custom settings) belongs to the operator and must survive a
//! reconcile pass untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::RegistryId;

/// Whether an object represents a logical device or one of its states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Channel,
    State,
}

/// Operator-visible fields of a host object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonFields {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Host-owned fields the bridge never interprets.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A channel or state object as stored by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    #[serde(rename = "_id")]
    pub id: RegistryId,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub common: CommonFields,
    /// Device-specific configuration owned by the bridge.
    #[serde(default)]
    pub native: Map<String, Value>,
}

impl ObjectDescriptor {
    #[must_use]
    pub fn channel(id: RegistryId, name: impl Into<String>) -> Self {
        Self::new(id, EntryKind::Channel, name)
    }

    #[must_use]
    pub fn state(id: RegistryId, name: impl Into<String>) -> Self {
        Self::new(id, EntryKind::State, name)
    }

    fn new(id: RegistryId, kind: EntryKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            common: CommonFields {
                name: name.into(),
                ..CommonFields::default()
            },
            native: Map::new(),
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.common.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn with_common(mut self, key: impl Into<String>, value: Value) -> Self {
        self.common.extra.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn with_native(mut self, key: impl Into<String>, value: Value) -> Self {
        self.native.insert(key.into(), value);
        self
    }

    /// Overwrite only the fields the bridge owns with those of `desired`.
    pub fn merge_owned_fields(&mut self, desired: &Self) {
        self.common.name.clone_from(&desired.common.name);
        self.native.clone_from(&desired.native);
    }

    /// Command names declared in `native.commands`.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.native
            .get("commands")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `native.autoRepair` is set, accepting the loose forms hosts write.
    #[must_use]
    pub fn auto_repair(&self) -> bool {
        match self.native.get("autoRepair") {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n.abs() > f64::EPSILON),
            Some(Value::String(s)) => matches!(s.trim(), "true" | "1"),
            _ => false,
        }
    }
}
