//! Typed records
//!
//! Typed records are the caller-facing projection of untyped documents. They
//! are only ever built from an [`UntypedDocument`](crate::UntypedDocument) by
//! the codec, and never sent back to the store as-is.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ListMeta, ObjectMeta};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::identity::ResourceIdentity;

/// A strongly-typed resource bound to one [`ResourceIdentity`]
pub trait TypedResource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Identity every decoded document must declare
    const IDENTITY: ResourceIdentity;

    fn metadata(&self) -> &ObjectMeta;

    fn metadata_mut(&mut self) -> &mut ObjectMeta;

    fn name(&self) -> Option<&str> {
        self.metadata().name.as_deref()
    }

    fn namespace(&self) -> Option<&str> {
        self.metadata().namespace.as_deref()
    }

    fn resource_version(&self) -> Option<&str> {
        self.metadata().resource_version.as_deref()
    }
}

/// The `apiVersion` / `kind` envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMeta {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
}

impl TypeMeta {
    /// Envelope for a single resource of this identity
    pub fn resource(identity: &ResourceIdentity) -> Self {
        Self {
            api_version: identity.api_version(),
            kind: identity.kind.to_string(),
        }
    }

    /// Envelope for a collection of this identity (`<Kind>List`)
    pub fn list(identity: &ResourceIdentity) -> Self {
        Self {
            api_version: identity.api_version(),
            kind: format!("{}List", identity.kind),
        }
    }
}

/// Kasten K10 location profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(flatten)]
    pub types: TypeMeta,

    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ObjectMeta,

    #[serde(default, deserialize_with = "null_as_default")]
    pub spec: ProfileSpec,
}

/// Profile body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSpec {
    /// Free-form location settings (credential, object store, ...)
    #[serde(default, deserialize_with = "null_as_default")]
    pub location_spec: Map<String, JsonValue>,

    /// Profile type, e.g. `Location`
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub type_: String,
}

impl Profile {
    /// Create a profile with an empty location spec
    pub fn new(name: &str, namespace: &str, type_: &str) -> Self {
        Self {
            types: TypeMeta::resource(&Self::IDENTITY),
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: ProfileSpec {
                location_spec: Map::new(),
                type_: type_.to_string(),
            },
        }
    }
}

impl TypedResource for Profile {
    const IDENTITY: ResourceIdentity = ResourceIdentity::PROFILE;

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

/// Typed collection returned by a list call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceList<K> {
    #[serde(flatten)]
    pub types: TypeMeta,

    #[serde(default)]
    pub metadata: ListMeta,

    pub items: Vec<K>,
}

impl<K> ResourceList<K> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Continuation token for the next page, if the store returned one
    pub fn continue_token(&self) -> Option<&str> {
        self.metadata.continue_.as_deref()
    }
}

impl<K> IntoIterator for ResourceList<K> {
    type Item = K;
    type IntoIter = std::vec::IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

pub type ProfileList = ResourceList<Profile>;

/// Read an explicit `null` the same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
