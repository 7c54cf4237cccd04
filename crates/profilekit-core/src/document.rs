//! Untyped wire documents
//!
//! An [`UntypedDocument`] is the only shape ever exchanged with the store: a
//! self-describing mapping of field names to [`serde_json::Value`], which is
//! a tagged variant (`Null | Bool | Number | String | Array | Object`).
//! Fields the typed records don't know about are carried through untouched.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ListMeta;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{DecodeError, Result};
use crate::identity::{GroupVersionKind, ResourceIdentity};

/// Untyped resource document whose root is always a mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UntypedDocument(Map<String, JsonValue>);

impl UntypedDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap an existing mapping
    pub fn from_map(map: Map<String, JsonValue>) -> Self {
        Self(map)
    }

    /// Wrap a value, rejecting anything that is not a mapping
    pub fn from_value(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self(map)),
            other => Err(DecodeError::NotAMapping {
                found: value_type_name(&other),
            }),
        }
    }

    /// Parse JSON wire bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: JsonValue = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Serialize to JSON wire bytes
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.0)?)
    }

    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, JsonValue> {
        self.0
    }

    pub fn into_value(self) -> JsonValue {
        JsonValue::Object(self.0)
    }

    /// Get a value by dotted path (e.g., "spec.locationSpec.type")
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        parts.try_fold(self.0.get(first)?, |value, key| match value {
            JsonValue::Object(map) => map.get(key),
            _ => None,
        })
    }

    fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(JsonValue::as_str)
    }

    pub fn api_version(&self) -> Option<&str> {
        self.get_str("apiVersion")
    }

    pub fn kind(&self) -> Option<&str> {
        self.get_str("kind")
    }

    /// Group/version/kind declared by the envelope, if both fields are present
    pub fn gvk(&self) -> Option<GroupVersionKind> {
        Some(GroupVersionKind::from_api_version(
            self.api_version()?,
            self.kind()?,
        ))
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("metadata.name")
    }

    pub fn namespace(&self) -> Option<&str> {
        self.get_str("metadata.namespace")
    }

    pub fn resource_version(&self) -> Option<&str> {
        self.get_str("metadata.resourceVersion")
    }

    /// Fill in `apiVersion`/`kind` from `identity` where the store left them out
    pub fn ensure_envelope(&mut self, identity: &ResourceIdentity) {
        self.0
            .entry("apiVersion")
            .or_insert_with(|| JsonValue::String(identity.api_version()));
        self.0
            .entry("kind")
            .or_insert_with(|| JsonValue::String(identity.kind.to_string()));
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.set_metadata_field("namespace", JsonValue::String(namespace.into()));
    }

    pub fn set_resource_version(&mut self, resource_version: impl Into<String>) {
        self.set_metadata_field(
            "resourceVersion",
            JsonValue::String(resource_version.into()),
        );
    }

    /// Drop `metadata.resourceVersion`, leaving the rest of the metadata alone
    pub fn clear_resource_version(&mut self) {
        if let Some(JsonValue::Object(meta)) = self.0.get_mut("metadata") {
            meta.remove("resourceVersion");
        }
    }

    fn set_metadata_field(&mut self, key: &str, value: JsonValue) {
        match self.0.get_mut("metadata") {
            Some(JsonValue::Object(meta)) => {
                meta.insert(key.to_string(), value);
            }
            _ => {
                let mut meta = Map::new();
                meta.insert(key.to_string(), value);
                self.0.insert("metadata".to_string(), JsonValue::Object(meta));
            }
        }
    }

    /// Apply a JSON merge patch (RFC 7386)
    ///
    /// Rules:
    /// - Objects: recursive overlay, absent keys are left untouched
    /// - `null`: removes the key
    /// - Scalars and arrays: patch replaces target
    ///
    /// The patch itself must be a mapping so the document root stays one.
    pub fn merge_patch(&mut self, patch: &JsonValue) -> Result<()> {
        let JsonValue::Object(patch_map) = patch else {
            return Err(DecodeError::NotAMapping {
                found: value_type_name(patch),
            });
        };
        merge_into_map(&mut self.0, patch_map);
        Ok(())
    }
}

impl From<UntypedDocument> for JsonValue {
    fn from(doc: UntypedDocument) -> Self {
        doc.into_value()
    }
}

impl TryFrom<JsonValue> for UntypedDocument {
    type Error = DecodeError;

    fn try_from(value: JsonValue) -> Result<Self> {
        Self::from_value(value)
    }
}

/// Untyped collection as returned by the store's list call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UntypedList {
    /// Continuation token and list resource version
    pub metadata: ListMeta,
    /// Items in the order the store returned them
    pub items: Vec<UntypedDocument>,
}

impl UntypedList {
    pub fn new(items: Vec<UntypedDocument>) -> Self {
        Self {
            metadata: ListMeta::default(),
            items,
        }
    }
}

fn merge_into_map(target: &mut Map<String, JsonValue>, patch: &Map<String, JsonValue>) {
    for (key, patch_value) in patch {
        if patch_value.is_null() {
            target.remove(key);
            continue;
        }
        let entry = target.entry(key.clone()).or_insert(JsonValue::Null);
        merge_value(entry, patch_value);
    }
}

fn merge_value(target: &mut JsonValue, patch: &JsonValue) {
    match (target, patch) {
        (JsonValue::Object(target_map), JsonValue::Object(patch_map)) => {
            merge_into_map(target_map, patch_map);
        }
        (target, JsonValue::Object(patch_map)) => {
            let mut fresh = Map::new();
            merge_into_map(&mut fresh, patch_map);
            *target = JsonValue::Object(fresh);
        }
        (target, patch) => {
            *target = patch.clone();
        }
    }
}

/// Short name of a value's variant, for error messages
pub fn value_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "sequence",
        JsonValue::Object(_) => "mapping",
    }
}
