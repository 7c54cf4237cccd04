//! Error types for profilekit-kube

use std::time::Duration;

use profilekit_core::DecodeError;
use thiserror::Error;

/// Result type for profilekit-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors that can occur while accessing resources
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Malformed input document, or a store response that doesn't fit the typed record
    #[error("invalid document: {0}")]
    Decode(#[from] DecodeError),

    /// Get, update, patch or delete on an absent resource
    #[error("{resource} '{name}' not found in namespace '{namespace}'")]
    NotFound {
        resource: String,
        name: String,
        namespace: String,
    },

    /// Create collided with an existing resource
    #[error("{resource} '{name}' already exists in namespace '{namespace}'")]
    AlreadyExists {
        resource: String,
        name: String,
        namespace: String,
    },

    /// Update carried a stale resource version
    #[error("conflict on {resource} '{name}' in namespace '{namespace}': {message}\nHint: the resource was modified concurrently, re-run the operation to apply against the latest version")]
    Conflict {
        resource: String,
        name: String,
        namespace: String,
        message: String,
    },

    /// The document namespace disagrees with the request namespace
    #[error("the namespace of the document ({document}) does not match the namespace of the request ({request})")]
    NamespaceMismatch { document: String, request: String },

    /// Kubernetes API error (transport, authorization, unclassified status)
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// Request rejected by the store without a Kubernetes status
    #[error("access error: {0}")]
    Access(String),

    /// Timeout
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for KubeError {
    fn from(e: serde_json::Error) -> Self {
        KubeError::Decode(DecodeError::Json(e))
    }
}

/// Coordinates of the resource a request targeted, for error reporting
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub resource: &'a str,
    pub namespace: &'a str,
    pub name: &'a str,
}

impl Target<'_> {
    pub fn not_found(&self) -> KubeError {
        KubeError::NotFound {
            resource: self.resource.to_string(),
            name: self.name.to_string(),
            namespace: self.namespace.to_string(),
        }
    }

    pub fn already_exists(&self) -> KubeError {
        KubeError::AlreadyExists {
            resource: self.resource.to_string(),
            name: self.name.to_string(),
            namespace: self.namespace.to_string(),
        }
    }

    pub fn conflict(&self, message: impl Into<String>) -> KubeError {
        KubeError::Conflict {
            resource: self.resource.to_string(),
            name: self.name.to_string(),
            namespace: self.namespace.to_string(),
            message: message.into(),
        }
    }
}

impl KubeError {
    /// Classify a Kubernetes API error by its status code
    ///
    /// - 404 → `NotFound`
    /// - 409 with reason `AlreadyExists` → `AlreadyExists`
    /// - other 409 → `Conflict`
    /// - anything else stays an `Api` error
    pub fn from_api(err: kube::Error, target: Target<'_>) -> Self {
        match err {
            kube::Error::Api(resp) if resp.code == 404 => target.not_found(),
            kube::Error::Api(resp) if resp.code == 409 && resp.reason == "AlreadyExists" => {
                target.already_exists()
            }
            kube::Error::Api(resp) if resp.code == 409 => target.conflict(resp.message),
            other => KubeError::Api(other),
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, KubeError::NotFound { .. })
    }

    /// Check if this is an optimistic-concurrency conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, KubeError::Conflict { .. })
    }

    /// Check if this is a remote failure that isn't otherwise classified
    pub fn is_access(&self) -> bool {
        matches!(self, KubeError::Api(_) | KubeError::Access(_))
    }
}
