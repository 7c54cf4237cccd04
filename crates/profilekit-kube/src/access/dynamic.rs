//! Kubernetes API driver
//!
//! Talks to the API server through `Api<DynamicObject>`, so no compiled-in
//! type is needed. The `ApiResource` is derived straight from the resource
//! identity instead of running discovery, which saves a round trip per call.

use async_trait::async_trait;
use kube::{
    Client,
    api::{Api, DeleteParams, DynamicObject, ListParams, Patch, PatchParams, PostParams},
    core::GroupVersionKind,
    discovery::ApiResource,
};
use profilekit_core::{DecodeError, ResourceIdentity, UntypedDocument, UntypedList};
use serde_json::value::RawValue;
use tracing::debug;

use super::{CallOptions, PatchKind, ResourceAccess, with_timeout};
use crate::error::{KubeError, Result, Target};

/// Resource access backed by a live Kubernetes API server
#[derive(Clone)]
pub struct DynamicAccess {
    /// Kubernetes client
    client: Client,
    /// Identity of the addressed collection
    identity: ResourceIdentity,
    /// API resource metadata derived from the identity
    api_resource: ApiResource,
    /// Rendered once for error messages
    resource_name: String,
}

impl DynamicAccess {
    /// Create a driver for `identity` using an existing client
    pub fn new(client: Client, identity: ResourceIdentity) -> Self {
        let gvk = GroupVersionKind::gvk(identity.group, identity.version, identity.kind);
        let api_resource = ApiResource::from_gvk_with_plural(&gvk, identity.plural);

        Self {
            client,
            identity,
            api_resource,
            resource_name: identity.to_string(),
        }
    }

    /// Create a driver using the default kubeconfig / in-cluster configuration
    pub async fn try_default(identity: ResourceIdentity) -> Result<Self> {
        let client = Client::try_default().await?;
        Ok(Self::new(client, identity))
    }

    /// Get the underlying Kubernetes client
    pub fn kube_client(&self) -> &Client {
        &self.client
    }

    fn api(&self, namespace: &str) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), namespace, &self.api_resource)
    }

    fn target<'a>(&'a self, namespace: &'a str, name: &'a str) -> Target<'a> {
        Target {
            resource: &self.resource_name,
            namespace,
            name,
        }
    }
}

/// Convert a store object to an untyped document
///
/// List items usually come back without `apiVersion`/`kind`; those are
/// restored from `identity` so the document still passes the identity check.
fn document_from(obj: DynamicObject, identity: &ResourceIdentity) -> Result<UntypedDocument> {
    let mut doc = UntypedDocument::from_value(serde_json::to_value(&obj)?)?;
    doc.ensure_envelope(identity);
    Ok(doc)
}

/// Convert an untyped document to the kube wire type
fn to_dynamic(doc: &UntypedDocument) -> Result<DynamicObject> {
    Ok(serde_json::from_value(doc.clone().into_value())?)
}

fn document_name(doc: &UntypedDocument) -> Result<&str> {
    doc.name().ok_or_else(|| {
        KubeError::Decode(DecodeError::MissingField {
            field: "metadata.name",
        })
    })
}

#[async_trait]
impl ResourceAccess for DynamicAccess {
    fn identity(&self) -> &ResourceIdentity {
        &self.identity
    }

    async fn get(
        &self,
        namespace: &str,
        name: &str,
        options: &CallOptions,
    ) -> Result<UntypedDocument> {
        debug!(resource = %self.resource_name, namespace, name, "get");

        let obj = with_timeout(options, async {
            self.api(namespace)
                .get(name)
                .await
                .map_err(|e| KubeError::from_api(e, self.target(namespace, name)))
        })
        .await?;

        document_from(obj, &self.identity)
    }

    async fn list(&self, namespace: &str, options: &CallOptions) -> Result<UntypedList> {
        debug!(resource = %self.resource_name, namespace, "list");

        let list = with_timeout(options, async {
            self.api(namespace)
                .list(&ListParams::default())
                .await
                .map_err(KubeError::Api)
        })
        .await?;

        let items = list
            .items
            .into_iter()
            .map(|obj| document_from(obj, &self.identity))
            .collect::<Result<Vec<_>>>()?;

        Ok(UntypedList {
            metadata: list.metadata,
            items,
        })
    }

    async fn create(
        &self,
        namespace: &str,
        doc: &UntypedDocument,
        options: &CallOptions,
    ) -> Result<UntypedDocument> {
        let name = document_name(doc)?;
        debug!(resource = %self.resource_name, namespace, name, "create");

        let obj = to_dynamic(doc)?;
        let created = with_timeout(options, async {
            self.api(namespace)
                .create(&PostParams::default(), &obj)
                .await
                .map_err(|e| KubeError::from_api(e, self.target(namespace, name)))
        })
        .await?;

        document_from(created, &self.identity)
    }

    async fn update(
        &self,
        namespace: &str,
        doc: &UntypedDocument,
        options: &CallOptions,
    ) -> Result<UntypedDocument> {
        let name = document_name(doc)?;
        debug!(
            resource = %self.resource_name,
            namespace,
            name,
            resource_version = doc.resource_version().unwrap_or(""),
            "update"
        );

        let obj = to_dynamic(doc)?;
        let updated = with_timeout(options, async {
            self.api(namespace)
                .replace(name, &PostParams::default(), &obj)
                .await
                .map_err(|e| KubeError::from_api(e, self.target(namespace, name)))
        })
        .await?;

        document_from(updated, &self.identity)
    }

    async fn patch(
        &self,
        namespace: &str,
        name: &str,
        kind: PatchKind,
        patch: &[u8],
        options: &CallOptions,
    ) -> Result<()> {
        debug!(
            resource = %self.resource_name,
            namespace,
            name,
            content_type = kind.content_type(),
            "patch"
        );

        // The body is forwarded untouched; it only has to be JSON text to be framed
        let body: Box<RawValue> = serde_json::from_slice(patch)
            .map_err(|e| KubeError::Access(format!("patch body is not valid JSON: {}", e)))?;
        let patch = match kind {
            PatchKind::Merge => Patch::Merge(body),
            PatchKind::Strategic => Patch::Strategic(body),
        };

        with_timeout(options, async {
            self.api(namespace)
                .patch(name, &PatchParams::default(), &patch)
                .await
                .map_err(|e| KubeError::from_api(e, self.target(namespace, name)))
        })
        .await?;

        Ok(())
    }

    async fn delete(&self, namespace: &str, name: &str, options: &CallOptions) -> Result<()> {
        debug!(resource = %self.resource_name, namespace, name, "delete");

        with_timeout(options, async {
            self.api(namespace)
                .delete(name, &DeleteParams::default())
                .await
                .map_err(|e| KubeError::from_api(e, self.target(namespace, name)))
        })
        .await?;

        Ok(())
    }
}
