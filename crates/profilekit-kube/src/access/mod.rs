//! Resource access drivers
//!
//! A [`ResourceAccess`] performs remote CRUD on untyped documents for one
//! namespace-scoped resource type. Two drivers are provided:
//! - **Dynamic**: talks to the Kubernetes API server through `kube::Api<DynamicObject>`
//! - **Mock**: in-memory store for tests, with server-side concurrency checks
//!
//! Every call is a single attempt. Nothing is cached and nothing is retried.

mod dynamic;
mod mock;

pub use dynamic::DynamicAccess;
pub use mock::{MockResourceAccess, OperationCounts};

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use profilekit_core::{ResourceIdentity, UntypedDocument, UntypedList};

use crate::error::{KubeError, Result};

/// Per-call options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Give up waiting for the store after this long
    pub timeout: Option<Duration>,
}

impl CallOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Patch strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchKind {
    /// JSON merge patch (RFC 7386): named fields overlay, absent fields stay
    Merge,
    /// Kubernetes strategic merge patch (not served for custom resources)
    Strategic,
}

impl PatchKind {
    /// Content type sent with the patch
    pub fn content_type(&self) -> &'static str {
        match self {
            PatchKind::Merge => "application/merge-patch+json",
            PatchKind::Strategic => "application/strategic-merge-patch+json",
        }
    }
}

impl std::str::FromStr for PatchKind {
    type Err = KubeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "merge" => Ok(PatchKind::Merge),
            "strategic" => Ok(PatchKind::Strategic),
            other => Err(KubeError::InvalidConfig(format!(
                "unknown patch type '{}' (expected 'merge' or 'strategic')",
                other
            ))),
        }
    }
}

/// Remote CRUD over untyped documents of a single resource type
///
/// Implementations must be Send + Sync for use across async tasks.
#[async_trait]
pub trait ResourceAccess: Send + Sync {
    /// Identity of the collection this driver addresses
    fn identity(&self) -> &ResourceIdentity;

    /// Fetch one resource by name
    async fn get(&self, namespace: &str, name: &str, options: &CallOptions)
    -> Result<UntypedDocument>;

    /// List all resources in a namespace, in the store's order
    async fn list(&self, namespace: &str, options: &CallOptions) -> Result<UntypedList>;

    /// Create a new resource
    async fn create(
        &self,
        namespace: &str,
        doc: &UntypedDocument,
        options: &CallOptions,
    ) -> Result<UntypedDocument>;

    /// Replace an existing resource
    ///
    /// The document must carry the resource version the caller last
    /// observed. The driver never fetches it implicitly.
    async fn update(
        &self,
        namespace: &str,
        doc: &UntypedDocument,
        options: &CallOptions,
    ) -> Result<UntypedDocument>;

    /// Patch a resource with a partial document, forwarded as-is
    async fn patch(
        &self,
        namespace: &str,
        name: &str,
        kind: PatchKind,
        patch: &[u8],
        options: &CallOptions,
    ) -> Result<()>;

    /// Delete a resource
    async fn delete(&self, namespace: &str, name: &str, options: &CallOptions) -> Result<()>;

    /// Check if a resource exists
    async fn exists(&self, namespace: &str, name: &str, options: &CallOptions) -> Result<bool> {
        match self.get(namespace, name, options).await {
            Ok(_) => Ok(true),
            Err(KubeError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Run a store call under the configured timeout
pub async fn with_timeout<T, F>(options: &CallOptions, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match options.timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| KubeError::Timeout(limit))?,
        None => call.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_kind_from_str() {
        assert_eq!("merge".parse::<PatchKind>().unwrap(), PatchKind::Merge);
        assert_eq!(
            "strategic".parse::<PatchKind>().unwrap(),
            PatchKind::Strategic
        );
        assert!("json".parse::<PatchKind>().is_err());
    }

    #[test]
    fn test_patch_kind_content_type() {
        assert_eq!(PatchKind::Merge.content_type(), "application/merge-patch+json");
        assert_eq!(
            PatchKind::Strategic.content_type(),
            "application/strategic-merge-patch+json"
        );
    }

    #[tokio::test]
    async fn test_with_timeout_elapses() {
        let options = CallOptions::with_timeout(Duration::from_millis(10));
        let result: Result<()> = with_timeout(&options, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(KubeError::Timeout(d)) if d == Duration::from_millis(10)));
    }

    #[tokio::test]
    async fn test_with_timeout_passes_through() {
        let result = with_timeout(&CallOptions::default(), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);

        let options = CallOptions::with_timeout(Duration::from_secs(5));
        let result: Result<()> =
            with_timeout(&options, async { Err(KubeError::Access("boom".into())) }).await;
        assert!(matches!(result, Err(KubeError::Access(_))));
    }
}
