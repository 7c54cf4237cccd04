//! Mock resource access for testing
//!
//! This driver keeps documents in memory and behaves like the API server on
//! the points the typed operations rely on: resource versions bump on every
//! write, stale updates are rejected, merge patches overlay fields, and
//! listings come back in creation order.

use async_trait::async_trait;
use indexmap::IndexMap;
use profilekit_core::{DecodeError, ResourceIdentity, UntypedDocument, UntypedList};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ListMeta;

use super::{CallOptions, PatchKind, ResourceAccess, with_timeout};
use crate::error::{KubeError, Result, Target};

/// Message the API server returns for a stale resource version
const CONFLICT_MESSAGE: &str =
    "the object has been modified; please apply your changes to the latest version and try again";

/// In-memory resource access for testing
#[derive(Clone)]
pub struct MockResourceAccess {
    identity: ResourceIdentity,
    resource_name: String,
    state: Arc<RwLock<MockState>>,
    /// Track operation counts for assertions
    operations: Arc<RwLock<OperationCounts>>,
}

#[derive(Default)]
struct MockState {
    /// namespace -> name -> document, in creation order
    objects: HashMap<String, IndexMap<String, UntypedDocument>>,
    /// Last resource version handed out
    resource_version: u64,
    /// Number of upcoming gets followed by a simulated concurrent write
    interfering_gets: usize,
    /// Artificial delay applied to every call
    latency: Option<Duration>,
}

impl MockState {
    fn next_resource_version(&mut self) -> String {
        self.resource_version += 1;
        self.resource_version.to_string()
    }
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationCounts {
    pub gets: usize,
    pub lists: usize,
    pub creates: usize,
    pub updates: usize,
    pub patches: usize,
    pub deletes: usize,
}

impl OperationCounts {
    /// Total number of remote calls
    pub fn total(&self) -> usize {
        self.gets + self.lists + self.creates + self.updates + self.patches + self.deletes
    }
}

impl MockResourceAccess {
    /// Create a new empty mock store for `identity`
    pub fn new(identity: ResourceIdentity) -> Self {
        Self {
            identity,
            resource_name: identity.to_string(),
            state: Arc::new(RwLock::new(MockState::default())),
            operations: Arc::new(RwLock::new(OperationCounts::default())),
        }
    }

    /// Create with pre-populated documents, each stored in its own namespace
    pub fn with_documents(identity: ResourceIdentity, docs: Vec<UntypedDocument>) -> Self {
        let mock = Self::new(identity);
        {
            let mut state = mock.state_mut();
            for mut doc in docs {
                let (Some(namespace), Some(name)) =
                    (doc.namespace().map(str::to_string), doc.name().map(str::to_string))
                else {
                    continue;
                };
                let rv = state.next_resource_version();
                doc.set_resource_version(rv);
                state
                    .objects
                    .entry(namespace)
                    .or_default()
                    .insert(name, doc);
            }
        }
        mock
    }

    /// Delay every call by `latency`, to exercise timeouts
    pub fn with_latency(self, latency: Duration) -> Self {
        self.state_mut().latency = Some(latency);
        self
    }

    /// Simulate another writer modifying the object right after each of the next `count` gets
    pub fn interfere_after_gets(&self, count: usize) {
        self.state_mut().interfering_gets = count;
    }

    /// Simulate another writer: bump the stored object's resource version
    ///
    /// Returns the new resource version, or `None` if the object doesn't exist.
    pub fn touch(&self, namespace: &str, name: &str) -> Option<String> {
        let mut state = self.state_mut();
        touch_locked(&mut state, namespace, name)
    }

    /// Read a stored document without counting an operation
    pub fn document(&self, namespace: &str, name: &str) -> Option<UntypedDocument> {
        self.state()
            .objects
            .get(namespace)
            .and_then(|ns| ns.get(name))
            .cloned()
    }

    /// Count stored documents across namespaces
    pub fn document_count(&self) -> usize {
        self.state().objects.values().map(IndexMap::len).sum()
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.operations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reset operation counts
    pub fn reset_counts(&self) {
        let mut ops = self
            .operations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *ops = OperationCounts::default();
    }

    fn record(&self, count: impl FnOnce(&mut OperationCounts)) {
        let mut ops = self
            .operations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        count(&mut ops);
    }

    fn state(&self) -> RwLockReadGuard<'_, MockState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, MockState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    async fn simulate_latency(&self) {
        let latency = self.state().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn target<'a>(&'a self, namespace: &'a str, name: &'a str) -> Target<'a> {
        Target {
            resource: &self.resource_name,
            namespace,
            name,
        }
    }

    fn get_now(&self, namespace: &str, name: &str) -> Result<UntypedDocument> {
        let mut state = self.state_mut();
        let doc = state
            .objects
            .get(namespace)
            .and_then(|ns| ns.get(name))
            .cloned()
            .ok_or_else(|| self.target(namespace, name).not_found())?;

        if state.interfering_gets > 0 {
            state.interfering_gets -= 1;
            touch_locked(&mut state, namespace, name);
        }

        Ok(doc)
    }

    fn list_now(&self, namespace: &str) -> UntypedList {
        let state = self.state();
        let items = state
            .objects
            .get(namespace)
            .map(|ns| ns.values().cloned().collect())
            .unwrap_or_default();

        UntypedList {
            metadata: ListMeta {
                resource_version: Some(state.resource_version.to_string()),
                ..Default::default()
            },
            items,
        }
    }

    fn create_now(&self, namespace: &str, doc: &UntypedDocument) -> Result<UntypedDocument> {
        let name = require_name(doc)?;
        let mut state = self.state_mut();

        if state
            .objects
            .get(namespace)
            .is_some_and(|ns| ns.contains_key(name))
        {
            return Err(self.target(namespace, name).already_exists());
        }

        let mut stored = doc.clone();
        stored.set_namespace(namespace);
        stored.set_resource_version(state.next_resource_version());
        state
            .objects
            .entry(namespace.to_string())
            .or_default()
            .insert(name.to_string(), stored.clone());

        Ok(stored)
    }

    fn update_now(&self, namespace: &str, doc: &UntypedDocument) -> Result<UntypedDocument> {
        let name = require_name(doc)?;
        let target = self.target(namespace, name);
        let mut state = self.state_mut();

        let current = state
            .objects
            .get(namespace)
            .and_then(|ns| ns.get(name))
            .ok_or_else(|| target.not_found())?;

        // Custom resources don't allow unconditional updates
        let submitted = doc.resource_version().ok_or_else(|| {
            KubeError::Access(
                "metadata.resourceVersion: Invalid value: 0: must be specified for an update"
                    .to_string(),
            )
        })?;
        if current.resource_version() != Some(submitted) {
            return Err(target.conflict(CONFLICT_MESSAGE));
        }

        let mut stored = doc.clone();
        stored.set_namespace(namespace);
        stored.set_resource_version(state.next_resource_version());
        state
            .objects
            .entry(namespace.to_string())
            .or_default()
            .insert(name.to_string(), stored.clone());

        Ok(stored)
    }

    fn patch_now(&self, namespace: &str, name: &str, kind: PatchKind, patch: &[u8]) -> Result<()> {
        let target = self.target(namespace, name);

        if kind != PatchKind::Merge {
            return Err(KubeError::Access(format!(
                "the body of the request was in an unknown format - accepted media types include: application/json-patch+json, application/merge-patch+json, application/apply-patch+yaml (got {})",
                kind.content_type()
            )));
        }
        let patch: JsonValue = serde_json::from_slice(patch)
            .map_err(|e| KubeError::Access(format!("patch body is not valid JSON: {}", e)))?;

        let mut state = self.state_mut();
        let current = state
            .objects
            .get(namespace)
            .and_then(|ns| ns.get(name))
            .ok_or_else(|| target.not_found())?;

        // A resource version inside the patch acts as a precondition
        if let Some(JsonValue::String(expected)) = patch.pointer("/metadata/resourceVersion")
            && current.resource_version() != Some(expected.as_str())
        {
            return Err(target.conflict(CONFLICT_MESSAGE));
        }

        let mut patched = current.clone();
        patched
            .merge_patch(&patch)
            .map_err(|e| KubeError::Access(format!("invalid merge patch: {}", e)))?;
        if patched.name() != Some(name) {
            return Err(KubeError::Access(format!(
                "the name of the object ({}) does not match the name on the URL ({})",
                patched.name().unwrap_or(""),
                name
            )));
        }

        patched.set_namespace(namespace);
        patched.set_resource_version(state.next_resource_version());
        state
            .objects
            .entry(namespace.to_string())
            .or_default()
            .insert(name.to_string(), patched);

        Ok(())
    }

    fn delete_now(&self, namespace: &str, name: &str) -> Result<()> {
        let mut state = self.state_mut();
        state
            .objects
            .get_mut(namespace)
            .and_then(|ns| ns.shift_remove(name))
            .map(|_| ())
            .ok_or_else(|| self.target(namespace, name).not_found())
    }
}

fn touch_locked(state: &mut MockState, namespace: &str, name: &str) -> Option<String> {
    if !state
        .objects
        .get(namespace)
        .is_some_and(|ns| ns.contains_key(name))
    {
        return None;
    }
    let rv = state.next_resource_version();
    let doc = state.objects.get_mut(namespace)?.get_mut(name)?;
    doc.set_resource_version(rv.clone());
    Some(rv)
}

fn require_name(doc: &UntypedDocument) -> Result<&str> {
    doc.name().ok_or(KubeError::Decode(DecodeError::MissingField {
        field: "metadata.name",
    }))
}

#[async_trait]
impl ResourceAccess for MockResourceAccess {
    fn identity(&self) -> &ResourceIdentity {
        &self.identity
    }

    async fn get(
        &self,
        namespace: &str,
        name: &str,
        options: &CallOptions,
    ) -> Result<UntypedDocument> {
        self.record(|ops| ops.gets += 1);
        with_timeout(options, async {
            self.simulate_latency().await;
            self.get_now(namespace, name)
        })
        .await
    }

    async fn list(&self, namespace: &str, options: &CallOptions) -> Result<UntypedList> {
        self.record(|ops| ops.lists += 1);
        with_timeout(options, async {
            self.simulate_latency().await;
            Ok(self.list_now(namespace))
        })
        .await
    }

    async fn create(
        &self,
        namespace: &str,
        doc: &UntypedDocument,
        options: &CallOptions,
    ) -> Result<UntypedDocument> {
        self.record(|ops| ops.creates += 1);
        with_timeout(options, async {
            self.simulate_latency().await;
            self.create_now(namespace, doc)
        })
        .await
    }

    async fn update(
        &self,
        namespace: &str,
        doc: &UntypedDocument,
        options: &CallOptions,
    ) -> Result<UntypedDocument> {
        self.record(|ops| ops.updates += 1);
        with_timeout(options, async {
            self.simulate_latency().await;
            self.update_now(namespace, doc)
        })
        .await
    }

    async fn patch(
        &self,
        namespace: &str,
        name: &str,
        kind: PatchKind,
        patch: &[u8],
        options: &CallOptions,
    ) -> Result<()> {
        self.record(|ops| ops.patches += 1);
        with_timeout(options, async {
            self.simulate_latency().await;
            self.patch_now(namespace, name, kind, patch)
        })
        .await
    }

    async fn delete(&self, namespace: &str, name: &str, options: &CallOptions) -> Result<()> {
        self.record(|ops| ops.deletes += 1);
        with_timeout(options, async {
            self.simulate_latency().await;
            self.delete_now(namespace, name)
        })
        .await
    }
}
