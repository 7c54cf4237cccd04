//! Profilekit Kube - Kubernetes access for profilekit
//!
//! This crate provides:
//! - **Resource Access**: the [`ResourceAccess`] port with a live API driver and an in-memory mock
//! - **Typed CRUD**: [`ResourceClient`], decoding and projecting documents around every call
//! - **Errors**: store failures classified into not-found, already-exists and conflict

pub mod access;
pub mod client;
pub mod error;

pub use access::{
    CallOptions, DynamicAccess, MockResourceAccess, OperationCounts, PatchKind, ResourceAccess,
};
pub use client::{ClientConfig, DEFAULT_TIMEOUT, ProfileClient, ResourceClient};
pub use error::{KubeError, Result};
