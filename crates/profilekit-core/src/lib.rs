//! Profilekit Core - Core types for typed access to dynamically-typed resources
//!
//! This crate provides the foundational types used throughout profilekit:
//! - `ResourceIdentity`: group/version/kind and group/version/resource descriptors
//! - `UntypedDocument`: the self-describing wire document
//! - `Profile`: the typed record for Kasten location profiles
//! - `codec`: conversions between text, untyped documents and typed records

pub mod codec;
pub mod document;
pub mod error;
pub mod identity;
pub mod profile;

pub use codec::{decode_text, into_typed, to_document, to_typed, to_typed_list, to_wire};
pub use document::{UntypedDocument, UntypedList};
pub use error::DecodeError;
pub use identity::{GroupVersionKind, GroupVersionResource, ResourceIdentity};
pub use profile::{Profile, ProfileList, ProfileSpec, ResourceList, TypeMeta, TypedResource};
