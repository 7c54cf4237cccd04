//! Resource identities
//!
//! A [`ResourceIdentity`] names one resource type in the store. It yields two
//! descriptors from the same fields, so they can never drift apart:
//! - [`GroupVersionKind`]: what a document declares in its envelope
//! - [`GroupVersionResource`]: which remote collection a request targets

use std::fmt;

/// Static identity of a resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceIdentity {
    /// API group (empty for the core group)
    pub group: &'static str,
    /// API version within the group
    pub version: &'static str,
    /// Kind declared in document envelopes
    pub kind: &'static str,
    /// Plural resource name used in request paths
    pub plural: &'static str,
}

impl ResourceIdentity {
    /// Kasten K10 location profile
    pub const PROFILE: ResourceIdentity = ResourceIdentity::new(
        "config.kio.kasten.io",
        "v1alpha1",
        "Profile",
        "profiles",
    );

    pub const fn new(
        group: &'static str,
        version: &'static str,
        kind: &'static str,
        plural: &'static str,
    ) -> Self {
        Self {
            group,
            version,
            kind,
            plural,
        }
    }

    /// Envelope descriptor used to type-check decoded documents
    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind {
            group: self.group.to_string(),
            version: self.version.to_string(),
            kind: self.kind.to_string(),
        }
    }

    /// Collection descriptor used to address requests
    pub fn gvr(&self) -> GroupVersionResource {
        GroupVersionResource {
            group: self.group.to_string(),
            version: self.version.to_string(),
            resource: self.plural.to_string(),
        }
    }

    /// Render the `apiVersion` field: `group/version`, or `version` for the core group
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.to_string()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// Check whether a document envelope declares this identity
    pub fn matches(&self, api_version: &str, kind: &str) -> bool {
        GroupVersionKind::from_api_version(api_version, kind) == self.gvk()
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.plural)
        } else {
            write!(f, "{}.{}", self.plural, self.group)
        }
    }
}

/// Group, version and kind of a document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    /// Split an `apiVersion` field into group and version
    ///
    /// - "apps/v1" -> group="apps", version="v1"
    /// - "v1" -> group="", version="v1" (core API)
    pub fn from_api_version(api_version: &str, kind: &str) -> Self {
        let (group, version) = match api_version.rsplit_once('/') {
            Some((g, v)) => (g.to_string(), v.to_string()),
            None => (String::new(), api_version.to_string()),
        };

        Self {
            group,
            version,
            kind: kind.to_string(),
        }
    }

    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version(), self.kind)
    }
}

/// Group, version and plural resource name of a collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionResource {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl fmt::Display for GroupVersionResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}/{}", self.version, self.resource)
        } else {
            write!(f, "{}/{}, Resource={}", self.group, self.version, self.resource)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_identity_descriptors_agree() {
        let id = ResourceIdentity::PROFILE;
        let gvk = id.gvk();
        let gvr = id.gvr();

        assert_eq!(gvk.group, gvr.group);
        assert_eq!(gvk.version, gvr.version);
        assert_eq!(gvk.kind, "Profile");
        assert_eq!(gvr.resource, "profiles");
        assert_eq!(id.api_version(), "config.kio.kasten.io/v1alpha1");
    }

    #[test]
    fn test_gvk_from_api_version() {
        let gvk = GroupVersionKind::from_api_version("apps/v1", "Deployment");
        assert_eq!(gvk.group, "apps");
        assert_eq!(gvk.version, "v1");
        assert_eq!(gvk.kind, "Deployment");

        let core = GroupVersionKind::from_api_version("v1", "ConfigMap");
        assert_eq!(core.group, "");
        assert_eq!(core.version, "v1");
        assert_eq!(core.api_version(), "v1");
    }

    #[test]
    fn test_identity_matches() {
        let id = ResourceIdentity::PROFILE;
        assert!(id.matches("config.kio.kasten.io/v1alpha1", "Profile"));
        assert!(!id.matches("config.kio.kasten.io/v1beta1", "Profile"));
        assert!(!id.matches("config.kio.kasten.io/v1alpha1", "Policy"));
        assert!(!id.matches("v1alpha1", "Profile"));
    }

    #[test]
    fn test_core_group_identity() {
        let id = ResourceIdentity::new("", "v1", "ConfigMap", "configmaps");
        assert_eq!(id.api_version(), "v1");
        assert_eq!(id.to_string(), "configmaps");
        assert!(id.matches("v1", "ConfigMap"));
    }

    #[test]
    fn test_display() {
        let id = ResourceIdentity::PROFILE;
        assert_eq!(id.to_string(), "profiles.config.kio.kasten.io");
        assert_eq!(
            id.gvk().to_string(),
            "config.kio.kasten.io/v1alpha1, Kind=Profile"
        );
    }
}
