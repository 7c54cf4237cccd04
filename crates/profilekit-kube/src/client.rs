//! Typed CRUD over a resource access driver
//!
//! [`ResourceClient`] is the typed face of a [`ResourceAccess`]: every call
//! goes through the untyped document form and is projected onto `K` on the
//! way back. The client holds no state besides its driver and configuration.

use std::marker::PhantomData;
use std::time::Duration;

use profilekit_core::{ResourceList, TypedResource, UntypedDocument, codec};
use tracing::{debug, warn};

use crate::access::{CallOptions, PatchKind, ResourceAccess};
use crate::error::{KubeError, Result};

/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Timeout applied to every remote call (`None` waits forever)
    pub timeout: Option<Duration>,

    /// Extra get/update rounds `update_with_document` runs after a conflict
    pub conflict_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            conflict_retries: 0,
        }
    }
}

impl ClientConfig {
    fn call_options(&self) -> CallOptions {
        CallOptions {
            timeout: self.timeout,
        }
    }
}

/// Typed CRUD operations for resources of kind `K`
pub struct ResourceClient<K: TypedResource, A: ResourceAccess> {
    access: A,
    config: ClientConfig,
    _kind: PhantomData<fn() -> K>,
}

/// Client for Kasten location profiles
pub type ProfileClient<A> = ResourceClient<profilekit_core::Profile, A>;

impl<K: TypedResource, A: ResourceAccess> ResourceClient<K, A> {
    /// Create a client with the default configuration
    ///
    /// Fails if the driver addresses a different resource type than `K`.
    pub fn new(access: A) -> Result<Self> {
        Self::with_config(access, ClientConfig::default())
    }

    /// Create a client with an explicit configuration
    pub fn with_config(access: A, config: ClientConfig) -> Result<Self> {
        if *access.identity() != K::IDENTITY {
            return Err(KubeError::InvalidConfig(format!(
                "driver addresses {}, client expects {}",
                access.identity(),
                K::IDENTITY
            )));
        }

        Ok(Self {
            access,
            config,
            _kind: PhantomData,
        })
    }

    /// Get the underlying driver
    pub fn access(&self) -> &A {
        &self.access
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch one resource by name
    pub async fn get(&self, namespace: &str, name: &str) -> Result<K> {
        let doc = self
            .access
            .get(namespace, name, &self.config.call_options())
            .await?;
        Ok(codec::into_typed(doc)?)
    }

    /// List every resource in a namespace, in the store's order
    pub async fn list(&self, namespace: &str) -> Result<ResourceList<K>> {
        let list = self
            .access
            .list(namespace, &self.config.call_options())
            .await?;
        Ok(codec::to_typed_list(list)?)
    }

    /// Create a resource from its textual document
    ///
    /// The document is decoded and checked before anything is sent.
    pub async fn create_with_document(&self, namespace: &str, text: &str) -> Result<K> {
        let mut doc = codec::decode_text(text, &K::IDENTITY)?;
        place_in_namespace(&mut doc, namespace)?;

        let created = self
            .access
            .create(namespace, &doc, &self.config.call_options())
            .await?;
        Ok(codec::into_typed(created)?)
    }

    /// Replace a resource with its textual document
    ///
    /// Reads the current resource to learn its resource version, then sends
    /// the document under that version. A write landing between the two
    /// calls makes the store reject the update with a conflict, which is
    /// returned unless `conflict_retries` allows another round.
    pub async fn update_with_document(&self, namespace: &str, text: &str) -> Result<K> {
        let mut doc = codec::decode_text(text, &K::IDENTITY)?;
        place_in_namespace(&mut doc, namespace)?;
        let name = doc.name().unwrap_or_default().to_string();
        let options = self.config.call_options();

        let mut attempt = 0;
        loop {
            let current = self.access.get(namespace, &name, &options).await?;
            match current.resource_version() {
                Some(rv) => doc.set_resource_version(rv),
                None => doc.clear_resource_version(),
            }
            debug!(
                namespace,
                name = %name,
                resource_version = doc.resource_version().unwrap_or(""),
                attempt,
                "updating from document"
            );

            match self.access.update(namespace, &doc, &options).await {
                Ok(updated) => return Ok(codec::into_typed(updated)?),
                Err(e) if e.is_conflict() && attempt < self.config.conflict_retries => {
                    attempt += 1;
                    warn!(
                        namespace,
                        name = %name,
                        attempt,
                        max = self.config.conflict_retries,
                        "update conflicted, retrying against the latest version"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Patch a resource; the body is forwarded without inspection
    pub async fn patch(
        &self,
        namespace: &str,
        name: &str,
        kind: PatchKind,
        patch: &[u8],
    ) -> Result<()> {
        self.access
            .patch(namespace, name, kind, patch, &self.config.call_options())
            .await
    }

    /// Delete a resource
    pub async fn delete(&self, namespace: &str, name: &str) -> Result<()> {
        self.access
            .delete(namespace, name, &self.config.call_options())
            .await
    }
}

/// Fill in the request namespace, or reject a document that names another one
fn place_in_namespace(doc: &mut UntypedDocument, namespace: &str) -> Result<()> {
    match doc.namespace() {
        Some(declared) if !declared.is_empty() && declared != namespace => {
            Err(KubeError::NamespaceMismatch {
                document: declared.to_string(),
                request: namespace.to_string(),
            })
        }
        _ => {
            doc.set_namespace(namespace);
            Ok(())
        }
    }
}
